//! Writer round-trip: parse then write must reproduce the input verbatim.

use widl_emitter::write;
use widl_parser::parse;

fn roundtrip(source: &str) {
    let document = parse(source).unwrap_or_else(|e| panic!("expected {source:?} to parse: {e}"));
    assert_eq!(write(&document), source, "round-trip failed for {source:?}");
}

#[test]
fn empty_and_trivia_only_inputs_roundtrip() {
    roundtrip("");
    roundtrip("   \n\t ");
    roundtrip("//comment\n");
    roundtrip("/* block */ // line\n");
}

#[test]
fn definitions_roundtrip_with_odd_spacing() {
    roundtrip("interface Foo { };");
    roundtrip("interface   Foo\n{\n};\n");
    roundtrip("[Exposed=Window]\ninterface Foo : Bar { };  // trailing\n");
    roundtrip("partial interface mixin M { };");
    roundtrip("callback interface CI {\n  const short C = -1;\n};");
    roundtrip("callback Handler = void (DOMString reason, optional long code = 0);");
}

#[test]
fn members_roundtrip() {
    roundtrip(concat!(
        "interface Sink {\n",
        "  const unsigned long long MAX = 0xffff;\n",
        "  constructor(long a, DOMString... rest);\n",
        "  static readonly attribute double rate;\n",
        "  stringifier attribute DOMString label;\n",
        "  stringifier;\n",
        "  async iterable<DOMString>(long hint);\n",
        "  readonly maplike<DOMString, (long or double)>;\n",
        "  inherit attribute float gain;\n",
        "  getter double (unsigned long index);\n",
        "  void send(optional Payload data = {}, [Clamp] octet flags);\n",
        "};\n",
    ));
}

#[test]
fn dictionaries_enums_and_typedefs_roundtrip() {
    roundtrip("dictionary D : Base { required long x; DOMString s = \"hi\"; sequence<long> xs = []; boolean b = true; double d = -Infinity; any v = null; };");
    roundtrip("enum Mode { \"open\",\n  \"closed\",  /* dangling */ };");
    roundtrip("typedef [EnforceRange] unsigned long Size;\ntypedef (Node or DOMString)? Target;");
    roundtrip("Window includes WindowEventHandlers;");
    roundtrip("namespace Tools { void trace(DOMString message); };");
}

#[test]
fn extended_attribute_forms_roundtrip() {
    roundtrip("[Exposed=(Window,Worker), PutForwards=name, Throws] interface A { };");
    roundtrip("[NamedConstructor=Image(unsigned long width)] interface B { };");
    roundtrip("[IntAttr=42, FloatAttr=1.5, StringAttr=\"x\", ListAttr=(1,2)] interface C { };");
}

#[test]
fn generics_and_unions_roundtrip() {
    roundtrip("interface G { Promise<void> close(); attribute FrozenArray<long> xs; void put(record<DOMString, sequence<long?>> map); };");
    roundtrip("typedef (long or (double or DOMString)) Deep;");
}
