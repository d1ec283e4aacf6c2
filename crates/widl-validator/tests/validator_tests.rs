//! Validator rules, recursive analyses, and autofix behavior.

use widl_emitter::write;
use widl_parser::{parse, Document, NodeData, NodeIndex};
use widl_validator::{
    apply, dictionary_includes_required_field, idl_type_includes_dictionary, validate, Definitions,
    Diagnostic, DiagnosticKind,
};

fn parse_ok(source: &str) -> Document {
    parse(source).unwrap_or_else(|e| panic!("expected {source:?} to parse: {e}"))
}

fn diagnostics(source: &str) -> Vec<Diagnostic> {
    validate(&parse_ok(source))
}

fn kinds(source: &str) -> Vec<DiagnosticKind> {
    diagnostics(source).iter().map(|d| d.kind).collect()
}

fn find_definition(document: &Document, name: &str) -> NodeIndex {
    document
        .definitions
        .iter()
        .copied()
        .find(|&d| document.arena[d].data.definition_name() == Some(name))
        .unwrap_or_else(|| panic!("no definition named {name}"))
}

// =========================================================================
// require-exposed
// =========================================================================

#[test]
fn interfaces_without_exposed_get_a_fixable_diagnostic() {
    let diagnostics = diagnostics("interface Foo { };");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::RequireExposed);
    assert!(diagnostics[0].fix.is_some());
    assert!(diagnostics[0].message.contains("inside `interface Foo`"));
}

#[test]
fn exposed_and_no_interface_object_both_satisfy_the_rule() {
    assert!(kinds("[Exposed=Window] interface A { };").is_empty());
    assert!(kinds("[NoInterfaceObject] interface A { };").is_empty());
}

#[test]
fn partial_interfaces_are_exempt_from_require_exposed() {
    assert!(kinds("partial interface A { };").is_empty());
}

#[test]
fn namespaces_need_exposed_too() {
    assert_eq!(kinds("namespace N { };"), vec![DiagnosticKind::RequireExposed]);
    assert!(kinds("[Exposed=Window] namespace N { };").is_empty());
}

#[test]
fn exposed_autofix_creates_the_block_on_its_own_line() {
    let mut document = parse_ok("interface Foo { };\n");
    let diagnostics = validate(&document);
    let fix = diagnostics[0].fix.expect("require-exposed carries a fix");
    apply(&mut document, &fix).expect("fix applies");
    assert_eq!(write(&document), "[Exposed=Window]\ninterface Foo { };\n");
}

#[test]
fn exposed_autofix_preserves_existing_indentation() {
    let mut document = parse_ok("  interface Foo { };\n");
    let diagnostics = validate(&document);
    let fix = diagnostics[0].fix.expect("require-exposed carries a fix");
    apply(&mut document, &fix).expect("fix applies");
    assert_eq!(write(&document), "  [Exposed=Window]\n  interface Foo { };\n");
}

#[test]
fn exposed_autofix_prepends_to_an_existing_block() {
    let mut document = parse_ok("[SecureContext] interface Foo { };");
    let diagnostics = validate(&document);
    let fix = diagnostics[0].fix.expect("require-exposed carries a fix");
    apply(&mut document, &fix).expect("fix applies");
    assert_eq!(
        write(&document),
        "[Exposed=Window, SecureContext] interface Foo { };"
    );
}

// =========================================================================
// constructor-member
// =========================================================================

#[test]
fn legacy_constructor_attribute_is_reported_once_per_occurrence() {
    let kinds = kinds("[Exposed=Window, Constructor, Constructor(long x)] interface B { };");
    assert_eq!(
        kinds,
        vec![
            DiagnosticKind::ConstructorMember,
            DiagnosticKind::ConstructorMember
        ]
    );
}

#[test]
fn constructor_autofix_moves_arguments_into_a_member() {
    let mut document = parse_ok("[Exposed=Window, Constructor(long x)] interface Bar { };");
    let diagnostics = validate(&document);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::ConstructorMember);
    let fix = diagnostics[0].fix.expect("constructor-member carries a fix");
    apply(&mut document, &fix).expect("fix applies");

    let written = write(&document);
    assert!(written.contains("constructor(long x);"), "got: {written}");
    assert!(!written.contains("Constructor("), "got: {written}");
    assert!(written.starts_with("[Exposed=Window]"), "got: {written}");

    let interface = find_definition(&document, "Bar");
    match &document.arena[interface].data {
        NodeData::Interface(data) => {
            assert_eq!(
                document.arena[data.members[0]].data.kind_str(),
                "constructor"
            );
        }
        _ => panic!("expected an interface"),
    }
}

#[test]
fn constructor_autofix_lands_after_existing_constructors() {
    let source = concat!(
        "[Exposed=Window, Constructor(long x)]\n",
        "interface Bar {\n",
        "  constructor();\n",
        "  void f();\n",
        "};\n",
    );
    let mut document = parse_ok(source);
    let fix = validate(&document)[0].fix.expect("fix expected");
    apply(&mut document, &fix).expect("fix applies");
    let interface = find_definition(&document, "Bar");
    let members = match &document.arena[interface].data {
        NodeData::Interface(data) => data.members.clone(),
        _ => panic!("expected an interface"),
    };
    let kinds: Vec<&str> = members
        .iter()
        .map(|&m| document.arena[m].data.kind_str())
        .collect();
    assert_eq!(kinds, vec!["constructor", "constructor", "operation"]);
    // Indentation copied from the existing members.
    let written = write(&document);
    assert!(written.contains("\n  constructor(long x);"), "got: {written}");
}

// =========================================================================
// no-constructible-global / incomplete-op
// =========================================================================

#[test]
fn global_interfaces_cannot_be_constructible() {
    let kinds = kinds(
        "[Exposed=Window, Global=Window, LegacyFactoryFunction=F()] interface G { constructor(); };",
    );
    assert_eq!(
        kinds,
        vec![
            DiagnosticKind::NoConstructibleGlobal,
            DiagnosticKind::NoConstructibleGlobal
        ]
    );
}

#[test]
fn regular_operations_must_be_named() {
    let kinds = kinds("[Exposed=Window] interface I { void (); };");
    assert_eq!(kinds, vec![DiagnosticKind::IncompleteOp]);
}

#[test]
fn getters_may_be_nameless() {
    let diagnostics = diagnostics("[Exposed=Window] interface I { getter long (long x); };");
    assert!(diagnostics
        .iter()
        .all(|d| d.kind != DiagnosticKind::IncompleteOp));
}

// =========================================================================
// no-duplicate / no-cross-overload
// =========================================================================

#[test]
fn duplicate_definition_names_are_reported() {
    let kinds = kinds("[Exposed=Window] interface A { }; [Exposed=Window] interface A { };");
    assert_eq!(kinds, vec![DiagnosticKind::NoDuplicate]);
}

#[test]
fn partial_operations_may_not_shadow_base_operations() {
    let source = concat!(
        "[Exposed=Window] interface A { void f(); };\n",
        "partial interface A { void f(); };\n",
    );
    assert_eq!(kinds(source), vec![DiagnosticKind::NoCrossOverload]);
}

#[test]
fn mixin_operations_collide_through_includes() {
    let source = concat!(
        "[Exposed=Window] interface A { void f(); };\n",
        "interface mixin M { void f(); };\n",
        "A includes M;\n",
    );
    assert_eq!(kinds(source), vec![DiagnosticKind::NoCrossOverload]);
}

// =========================================================================
// Dictionary analyses
// =========================================================================

#[test]
fn typedef_chains_resolve_to_their_dictionary() {
    let source = concat!(
        "dictionary D { required long x; };\n",
        "typedef D T;\n",
        "dictionary E { T t; };\n",
    );
    let document = parse_ok(source);
    let mut defs = Definitions::build(&document);
    let d = find_definition(&document, "D");
    let e = find_definition(&document, "E");
    let field_type = match &document.arena[e].data {
        NodeData::Dictionary(data) => match &document.arena[data.members[0]].data {
            NodeData::Field(field) => field.idl_type.expect("field has a type"),
            _ => panic!("expected a field"),
        },
        _ => panic!("expected a dictionary"),
    };
    let inclusion = idl_type_includes_dictionary(&document, &mut defs, field_type, false)
        .expect("T ultimately names a dictionary");
    assert_eq!(inclusion.dictionary, d);
    assert_eq!(inclusion.reference, field_type);
    assert!(dictionary_includes_required_field(&document, &mut defs, d));
}

#[test]
fn required_fields_are_found_through_inheritance() {
    let source = concat!(
        "dictionary Base { required long x; };\n",
        "dictionary Derived : Base { };\n",
    );
    let document = parse_ok(source);
    let mut defs = Definitions::build(&document);
    let derived = find_definition(&document, "Derived");
    assert!(dictionary_includes_required_field(
        &document, &mut defs, derived
    ));
}

#[test]
fn cyclic_typedefs_terminate_with_no_dictionary() {
    let source = "typedef Foo Bar;\ntypedef Bar Foo;\n";
    let document = parse_ok(source);
    let mut defs = Definitions::build(&document);
    let foo = find_definition(&document, "Foo");
    let target = match &document.arena[foo].data {
        NodeData::Typedef(data) => data.idl_type.expect("typedef has a type"),
        _ => panic!("expected a typedef"),
    };
    // First pass seeds the cache, second pass reads it; both say no.
    assert!(idl_type_includes_dictionary(&document, &mut defs, target, false).is_none());
    assert!(idl_type_includes_dictionary(&document, &mut defs, target, false).is_none());
}

#[test]
fn cyclic_dictionary_inheritance_terminates() {
    let source = concat!(
        "dictionary A : B { };\n",
        "dictionary B : A { };\n",
        "dictionary C : A { required long x; };\n",
    );
    let document = parse_ok(source);
    let mut defs = Definitions::build(&document);
    let a = find_definition(&document, "A");
    let c = find_definition(&document, "C");
    assert!(!dictionary_includes_required_field(&document, &mut defs, a));
    assert!(dictionary_includes_required_field(&document, &mut defs, c));
}

#[test]
fn unknown_superclass_counts_as_required() {
    let document = parse_ok("dictionary D : Mystery { };");
    let mut defs = Definitions::build(&document);
    let d = find_definition(&document, "D");
    assert!(dictionary_includes_required_field(&document, &mut defs, d));
}

// =========================================================================
// Dictionary-argument rules
// =========================================================================

#[test]
fn trailing_dictionary_arguments_must_be_optional() {
    let source = concat!(
        "dictionary Options { long x; };\n",
        "[Exposed=Window] interface I { void f(Options opts); };\n",
    );
    let mut document = parse_ok(source);
    let diagnostics = validate(&document);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::DictArgOptional);
    let fix = diagnostics[0].fix.expect("dict-arg-optional carries a fix");
    apply(&mut document, &fix).expect("fix applies");
    assert!(write(&document).contains("void f(optional Options opts)"));
}

#[test]
fn required_fields_waive_the_optionality_rule() {
    let source = concat!(
        "dictionary Options { required long x; };\n",
        "[Exposed=Window] interface I { void f(Options opts); };\n",
    );
    assert!(kinds(source).is_empty());
}

#[test]
fn non_trailing_dictionary_arguments_are_left_alone() {
    let source = concat!(
        "dictionary Options { long x; };\n",
        "[Exposed=Window] interface I { void f(Options opts, long rest); };\n",
    );
    assert!(kinds(source).is_empty());
}

#[test]
fn optional_dictionary_arguments_need_a_default() {
    let source = concat!(
        "dictionary Options { long x; };\n",
        "[Exposed=Window] interface I { void f(optional Options opts); };\n",
    );
    let mut document = parse_ok(source);
    let diagnostics = validate(&document);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::DictArgDefault);
    let fix = diagnostics[0].fix.expect("dict-arg-default carries a fix");
    apply(&mut document, &fix).expect("fix applies");
    assert!(write(&document).contains("optional Options opts = {}"));
}

#[test]
fn nullable_dictionary_arguments_are_rejected() {
    let source = concat!(
        "dictionary Options { long x; };\n",
        "[Exposed=Window] interface I { void f(Options? opts); };\n",
    );
    assert_eq!(kinds(source), vec![DiagnosticKind::NoNullableDictArg]);
}

#[test]
fn nullable_unions_may_not_include_dictionaries() {
    let source = concat!(
        "dictionary Options { long x; };\n",
        "typedef (Options or DOMString)? Mixed;\n",
    );
    assert_eq!(kinds(source), vec![DiagnosticKind::NoNullableUnionDict]);
}

// =========================================================================
// Diagnostic shape
// =========================================================================

#[test]
fn diagnostics_render_a_context_window_with_a_caret() {
    let diagnostics = diagnostics("interface Foo { };");
    let context = &diagnostics[0].context;
    assert!(context.starts_with("Validation error at line 1"), "got: {context}");
    assert!(context.contains('^'), "got: {context}");
    assert_eq!(diagnostics[0].line, 1);
}

#[test]
fn diagnostics_appear_in_tree_walk_order() {
    let source = concat!(
        "interface A { void (); };\n",
        "namespace N { };\n",
    );
    assert_eq!(
        kinds(source),
        vec![
            DiagnosticKind::RequireExposed,
            DiagnosticKind::IncompleteOp,
            DiagnosticKind::RequireExposed,
        ]
    );
}
