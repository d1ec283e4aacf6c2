//! Parser structure and backtracking tests.

use widl_parser::{first_token, parse, Document, NodeData, NodeIndex};
use widl_scanner::SyntaxError;

fn parse_ok(source: &str) -> Document {
    parse(source).unwrap_or_else(|e| panic!("expected {source:?} to parse: {e}"))
}

fn parse_err(source: &str) -> SyntaxError {
    match parse(source) {
        Ok(_) => panic!("expected {source:?} to fail"),
        Err(error) => error,
    }
}

fn single_definition(document: &Document) -> NodeIndex {
    assert_eq!(document.definitions.len(), 1);
    document.definitions[0]
}

// =========================================================================
// Definitions
// =========================================================================

#[test]
fn empty_interface_parses_with_name_and_no_members() {
    let document = parse_ok("interface Foo { };");
    let definition = single_definition(&document);
    match &document.arena[definition].data {
        NodeData::Interface(data) => {
            assert_eq!(data.name(), "Foo");
            assert!(data.members.is_empty());
            assert!(!data.partial());
        }
        other => panic!("expected an interface, got {}", other.kind_str()),
    }
}

#[test]
fn definition_kinds_are_distinguished() {
    let document = parse_ok(concat!(
        "interface I { };\n",
        "interface mixin M { };\n",
        "callback interface CI { const short C = 0; };\n",
        "callback CB = void (long x);\n",
        "partial interface I { };\n",
        "dictionary D { };\n",
        "namespace N { };\n",
        "enum E { \"a\" };\n",
        "typedef long T;\n",
        "I includes M;\n",
    ));
    let kinds: Vec<&str> = document
        .definitions
        .iter()
        .map(|&d| document.arena[d].data.kind_str())
        .collect();
    assert_eq!(
        kinds,
        vec![
            "interface",
            "interface mixin",
            "callback interface",
            "callback",
            "interface",
            "dictionary",
            "namespace",
            "enum",
            "typedef",
            "includes",
        ]
    );
    assert!(document.arena[document.definitions[4]].data.is_partial());
}

#[test]
fn inheritance_is_recorded_with_its_colon() {
    let document = parse_ok("interface B { };\ninterface A : B { };");
    match &document.arena[document.definitions[1]].data {
        NodeData::Interface(data) => {
            assert_eq!(data.inheritance(), Some("B"));
            assert!(data.tokens.colon.is_some());
        }
        _ => panic!("expected an interface"),
    }
}

#[test]
fn escaped_names_are_unescaped_for_lookup_but_kept_in_tokens() {
    let document = parse_ok("interface _Foo { };");
    match &document.arena[single_definition(&document)].data {
        NodeData::Interface(data) => {
            assert_eq!(data.name(), "Foo");
            assert_eq!(data.tokens.name.as_ref().map(|t| t.value.as_str()), Some("_Foo"));
        }
        _ => panic!("expected an interface"),
    }
}

// =========================================================================
// Members and ordering
// =========================================================================

#[test]
fn member_variety_parses_into_the_expected_kinds() {
    let document = parse_ok(concat!(
        "interface I {\n",
        "  const unsigned long long C = 0xFF;\n",
        "  constructor(long a);\n",
        "  static void f();\n",
        "  stringifier;\n",
        "  iterable<long>;\n",
        "  readonly maplike<DOMString, long>;\n",
        "  inherit attribute double cadence;\n",
        "  getter long (long index);\n",
        "  void g(optional long a = 1, long... rest);\n",
        "};",
    ));
    let definition = single_definition(&document);
    let members = match &document.arena[definition].data {
        NodeData::Interface(data) => data.members.clone(),
        _ => panic!("expected an interface"),
    };
    let kinds: Vec<&str> = members
        .iter()
        .map(|&m| document.arena[m].data.kind_str())
        .collect();
    assert_eq!(
        kinds,
        vec![
            "const",
            "constructor",
            "operation",
            "operation",
            "iterable",
            "maplike",
            "attribute",
            "operation",
            "operation",
        ]
    );
}

#[test]
fn nameless_getter_keeps_its_special_and_arguments() {
    let document = parse_ok("interface I { getter long (long x); };");
    let definition = single_definition(&document);
    let members = match &document.arena[definition].data {
        NodeData::Interface(data) => data.members.clone(),
        _ => panic!("expected an interface"),
    };
    match &document.arena[members[0]].data {
        NodeData::Operation(data) => {
            assert_eq!(data.special(), "getter");
            assert_eq!(data.name(), "");
            assert_eq!(data.arguments.len(), 1);
        }
        _ => panic!("expected an operation"),
    }
}

#[test]
fn bare_stringifier_is_an_operation_with_no_return_type() {
    let document = parse_ok("interface I { stringifier; };");
    let definition = single_definition(&document);
    let members = match &document.arena[definition].data {
        NodeData::Interface(data) => data.members.clone(),
        _ => panic!("expected an interface"),
    };
    match &document.arena[members[0]].data {
        NodeData::Operation(data) => {
            assert_eq!(data.special(), "stringifier");
            assert!(data.idl_type.is_none());
            assert!(data.arguments.is_empty());
        }
        _ => panic!("expected an operation"),
    }
}

#[test]
fn dictionary_fields_record_required_and_defaults() {
    let document = parse_ok("dictionary D { required long x; long y = 2; sequence<long> zs = []; };");
    let definition = single_definition(&document);
    let members = match &document.arena[definition].data {
        NodeData::Dictionary(data) => data.members.clone(),
        _ => panic!("expected a dictionary"),
    };
    match &document.arena[members[0]].data {
        NodeData::Field(field) => {
            assert!(field.required());
            assert!(field.default.is_none());
        }
        _ => panic!("expected a field"),
    }
    match &document.arena[members[1]].data {
        NodeData::Field(field) => assert!(field.default.is_some()),
        _ => panic!("expected a field"),
    }
}

// =========================================================================
// Backtracking
// =========================================================================

#[test]
fn includes_statement_backtracks_cleanly_from_a_lone_identifier() {
    let error = parse_err("Foo;");
    assert_eq!(error.bare_message, "Unrecognised tokens");
}

#[test]
fn iterable_like_unconsumes_readonly_for_the_attribute_parser() {
    // The iterable-like attempt consumes `readonly`, finds no maplike or
    // setlike, and must restore the cursor so the attribute parser can
    // re-consume it.
    let document = parse_ok("interface I { readonly setlike<long>; readonly attribute long x; };");
    let definition = single_definition(&document);
    let members = match &document.arena[definition].data {
        NodeData::Interface(data) => data.members.clone(),
        _ => panic!("expected an interface"),
    };
    assert_eq!(document.arena[members[0]].data.kind_str(), "setlike");
    assert_eq!(document.arena[members[1]].data.kind_str(), "attribute");
}

#[test]
fn stray_extended_attributes_are_rejected() {
    let error = parse_err("[Exposed=Window]");
    assert_eq!(error.bare_message, "Stray extended attributes");
}

// =========================================================================
// Lists
// =========================================================================

#[test]
fn enum_values_allow_a_dangling_comma() {
    let document = parse_ok("enum E { \"a\", \"b\", };");
    let definition = single_definition(&document);
    match &document.arena[definition].data {
        NodeData::Enum(data) => assert_eq!(data.values.len(), 2),
        _ => panic!("expected an enum"),
    }
}

#[test]
fn argument_lists_reject_a_dangling_comma() {
    let error = parse_err("interface I { void f(long a,); };");
    assert_eq!(error.bare_message, "Trailing comma in arguments list");
}

#[test]
fn enum_values_without_commas_are_an_error() {
    let error = parse_err("enum E { \"a\" \"b\" };");
    assert_eq!(error.bare_message, "No comma between enum values");
}

// =========================================================================
// Types
// =========================================================================

#[test]
fn nullable_twice_is_an_error() {
    let error = parse_err("interface I { attribute long?? x; };");
    assert_eq!(error.bare_message, "Can't nullable more than once");
}

#[test]
fn attribute_sequence_types_are_rejected_at_the_sequence_token() {
    let error = parse_err("interface mixin M { attribute sequence<long> xs; };");
    assert_eq!(error.bare_message, "Attributes cannot accept sequence types");
    // The caret points at `sequence`, not at the token after the type.
    assert!(error.context.contains('^'));
}

#[test]
fn attribute_record_types_are_rejected() {
    let error = parse_err("interface I { attribute record<DOMString, long> m; };");
    assert_eq!(error.bare_message, "Attributes cannot accept record types");
}

#[test]
fn union_types_require_at_least_two_members() {
    let error = parse_err("typedef (long) T;");
    assert_eq!(
        error.bare_message,
        "At least two types are expected in a union type but found less"
    );
}

#[test]
fn promise_cannot_be_nullable() {
    let error = parse_err("interface I { void f(Promise<void>? p); };");
    assert_eq!(error.bare_message, "Promise type cannot be nullable");
}

#[test]
fn record_keys_must_be_string_types() {
    let error = parse_err("typedef record<long, long> M;");
    assert_eq!(
        error.bare_message,
        "Record key must be one of: ByteString, DOMString, USVString"
    );
}

#[test]
fn unsigned_prefix_commits_to_an_integer_base() {
    let error = parse_err("interface I { attribute unsigned double x; };");
    assert_eq!(error.bare_message, "Failed to parse integer type");
}

// =========================================================================
// Tree invariants
// =========================================================================

fn reachable(document: &Document) -> Vec<NodeIndex> {
    let mut stack: Vec<NodeIndex> = document.definitions.clone();
    let mut seen = Vec::new();
    while let Some(index) = stack.pop() {
        seen.push(index);
        stack.extend(document.arena[index].data.children());
    }
    seen
}

const TREE_SAMPLE: &str = concat!(
    "[Exposed=Window, Constructor(long x)]\n",
    "interface Sample : Base {\n",
    "  const octet MAX = 0xff;\n",
    "  attribute (long or DOMString)? mixed;\n",
    "  void send(optional Payload data = {}, DOMString... rest);\n",
    "  async iterable<DOMString>(long hint);\n",
    "};\n",
    "dictionary Payload { required ByteString body; };\n",
);

#[test]
fn every_reachable_node_is_linked_to_its_parent() {
    let document = parse_ok(TREE_SAMPLE);
    for index in reachable(&document) {
        for child in document.arena[index].data.children() {
            assert_eq!(
                document.arena[child].parent,
                Some(index),
                "child {} of {} lost its parent link",
                document.arena[child].data.kind_str(),
                document.arena[index].data.kind_str(),
            );
        }
    }
}

#[test]
fn no_two_nodes_share_a_source_token() {
    let document = parse_ok(TREE_SAMPLE);
    let mut seen = std::collections::HashSet::new();
    for index in reachable(&document) {
        for token_index in role_token_indices(&document, index) {
            assert!(
                seen.insert(token_index),
                "token {token_index} stored in two roles"
            );
        }
    }
}

/// Every token index held directly by a node's token dictionary.
fn role_token_indices(document: &Document, index: NodeIndex) -> Vec<u32> {
    use widl_scanner::Token;
    fn push(out: &mut Vec<u32>, token: &Option<Token>) {
        if let Some(token) = token {
            out.push(token.index);
        }
    }
    let mut out = Vec::new();
    match &document.arena[index].data {
        NodeData::Interface(d)
        | NodeData::Mixin(d)
        | NodeData::CallbackInterface(d)
        | NodeData::Dictionary(d)
        | NodeData::Namespace(d) => {
            let t = &d.tokens;
            for token in [
                &t.callback,
                &t.partial,
                &t.base,
                &t.mixin,
                &t.name,
                &t.colon,
                &t.inheritance,
                &t.open,
                &t.close,
                &t.termination,
            ] {
                push(&mut out, token);
            }
        }
        NodeData::Constant(d) => {
            let t = &d.tokens;
            for token in [&t.base, &t.name, &t.assign, &t.value, &t.termination] {
                push(&mut out, token);
            }
        }
        NodeData::Constructor(d) => {
            let t = &d.tokens;
            for token in [&t.base, &t.open, &t.close, &t.termination] {
                push(&mut out, token);
            }
        }
        NodeData::Attribute(d) => {
            let t = &d.tokens;
            for token in [&t.special, &t.readonly, &t.base, &t.name, &t.termination] {
                push(&mut out, token);
            }
        }
        NodeData::Operation(d) => {
            let t = &d.tokens;
            for token in [&t.special, &t.name, &t.open, &t.close, &t.termination] {
                push(&mut out, token);
            }
        }
        NodeData::IterableLike(d) => {
            let t = &d.tokens;
            for token in [
                &t.readonly,
                &t.r#async,
                &t.base,
                &t.open,
                &t.close,
                &t.args_open,
                &t.args_close,
                &t.termination,
            ] {
                push(&mut out, token);
            }
        }
        NodeData::Field(d) => {
            let t = &d.tokens;
            for token in [&t.required, &t.name, &t.termination] {
                push(&mut out, token);
            }
        }
        NodeData::Argument(d) => {
            let t = &d.tokens;
            for token in [&t.optional, &t.variadic, &t.name, &t.separator] {
                push(&mut out, token);
            }
        }
        NodeData::Type(d) => {
            let t = &d.tokens;
            for token in [
                &t.prefix,
                &t.base,
                &t.postfix,
                &t.open,
                &t.close,
                &t.nullable,
                &t.separator,
            ] {
                push(&mut out, token);
            }
        }
        NodeData::Default(d) => {
            push(&mut out, &d.tokens.assign);
            for token in &d.expression {
                out.push(token.index);
            }
        }
        NodeData::Enum(d) => {
            let t = &d.tokens;
            for token in [&t.base, &t.name, &t.open, &t.close, &t.termination] {
                push(&mut out, token);
            }
        }
        NodeData::EnumValue(d) => {
            push(&mut out, &d.tokens.value);
            push(&mut out, &d.tokens.separator);
        }
        NodeData::Typedef(d) => {
            let t = &d.tokens;
            for token in [&t.base, &t.name, &t.termination] {
                push(&mut out, token);
            }
        }
        NodeData::Includes(d) => {
            let t = &d.tokens;
            for token in [&t.target, &t.includes, &t.mixin, &t.termination] {
                push(&mut out, token);
            }
        }
        NodeData::CallbackFunction(d) => {
            let t = &d.tokens;
            for token in [&t.base, &t.name, &t.assign, &t.open, &t.close, &t.termination] {
                push(&mut out, token);
            }
        }
        NodeData::ExtendedAttributes(d) => {
            push(&mut out, &d.tokens.open);
            push(&mut out, &d.tokens.close);
        }
        NodeData::ExtendedAttribute(d) => {
            let t = &d.tokens;
            for token in [
                &t.name,
                &t.assign,
                &t.secondary_name,
                &t.open,
                &t.close,
                &t.separator,
            ] {
                push(&mut out, token);
            }
        }
        NodeData::WrappedToken(d) => {
            push(&mut out, &d.tokens.value);
            push(&mut out, &d.tokens.separator);
        }
    }
    out
}

#[test]
fn a_nodes_position_is_its_lowest_reachable_token() {
    let document = parse_ok("[Exposed=Window] interface A { };");
    let definition = document.definitions[0];
    let first = first_token(&document.arena, definition).expect("definition has tokens");
    assert_eq!(first.value, "[");
    assert_eq!(first.index, 0);
}
