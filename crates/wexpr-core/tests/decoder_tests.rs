use wexpr_core::{decode, decode_into, Codec, Key, Value, WexprError};

fn map(entries: Vec<(&str, Value)>) -> Value {
    Value::Map(
        entries
            .into_iter()
            .map(|(k, v)| (Key::String(k.to_string()), v))
            .collect(),
    )
}

fn num(n: f64) -> Value {
    Value::Number(n)
}

fn s(text: &str) -> Value {
    Value::String(text.to_string())
}

/// Assert a decode fails and the rendered diagnostic matches exactly.
fn assert_decode_error(source: &str, expected: &str) {
    let error = decode(source).expect_err("decode should fail");
    assert_eq!(
        error.to_string(),
        expected,
        "diagnostic mismatch for {source:?}"
    );
}

// ============================================================================
// Scalars
// ============================================================================

#[test]
fn decode_null_word() {
    assert_eq!(decode("null").unwrap(), Value::Null);
}

#[test]
fn decode_nil_word() {
    assert_eq!(decode("nil").unwrap(), Value::Null);
}

#[test]
fn decode_bool_words() {
    assert_eq!(decode("true").unwrap(), Value::Bool(true));
    assert_eq!(decode("false").unwrap(), Value::Bool(false));
}

#[test]
fn decode_integer() {
    assert_eq!(decode("42").unwrap(), num(42.0));
}

#[test]
fn decode_negative_integer() {
    assert_eq!(decode("-7").unwrap(), num(-7.0));
}

#[test]
fn decode_float() {
    assert_eq!(decode("3.14").unwrap(), num(3.14));
}

#[test]
fn decode_bareword_as_string() {
    assert_eq!(decode("hello").unwrap(), s("hello"));
}

#[test]
fn decode_bareword_with_symbols() {
    // `=`, `.`, `-`, `{`, `}` are all ordinary word bytes
    assert_eq!(decode("a=b.c{d}-e").unwrap(), s("a=b.c{d}-e"));
}

#[test]
fn decode_quoted_string() {
    assert_eq!(decode("\"hello world\"").unwrap(), s("hello world"));
}

#[test]
fn decode_quoted_empty_string() {
    assert_eq!(decode("\"\"").unwrap(), s(""));
}

#[test]
fn decode_quoted_string_with_escapes() {
    assert_eq!(
        decode(r#""a\nb\tc\r\"d\\e""#).unwrap(),
        s("a\nb\tc\r\"d\\e")
    );
}

#[test]
fn decode_quoted_string_spanning_lines() {
    assert_eq!(decode("\"a\nb\"").unwrap(), s("a\nb"));
}

#[test]
fn decode_binary_blob() {
    assert_eq!(decode("<aGk=>").unwrap(), Value::Binary(b"hi".to_vec()));
}

#[test]
fn decode_binary_unpadded() {
    assert_eq!(decode("<aGk>").unwrap(), Value::Binary(b"hi".to_vec()));
}

#[test]
fn decode_binary_with_misplaced_padding() {
    // Permissive decode: `=` carries no information wherever it appears
    assert_eq!(decode("<aG=k>").unwrap(), Value::Binary(b"hi".to_vec()));
}

#[test]
fn decode_non_utf8_string_becomes_binary() {
    let source = b"\"\xFF\xFE\"";
    assert_eq!(
        decode(source).unwrap(),
        Value::Binary(vec![0xFF, 0xFE])
    );
}

// ============================================================================
// Comments and whitespace
// ============================================================================

#[test]
fn decode_skips_line_comments() {
    assert_eq!(decode("; leading\n42 ; trailing").unwrap(), num(42.0));
}

#[test]
fn decode_skips_block_comments() {
    assert_eq!(decode(";(-- before --) 42 ;(-- after --)").unwrap(), num(42.0));
}

#[test]
fn decode_block_comment_spanning_lines() {
    assert_eq!(decode(";(-- a\nb\nc --)\n7").unwrap(), num(7.0));
}

#[test]
fn decode_whitespace_only_separators() {
    assert_eq!(
        decode("#(\t1\r\n2  3\n)").unwrap(),
        Value::Array(vec![num(1.0), num(2.0), num(3.0)])
    );
}

// ============================================================================
// Arrays
// ============================================================================

#[test]
fn decode_empty_array() {
    assert_eq!(decode("#()").unwrap(), Value::Array(vec![]));
}

#[test]
fn decode_flat_array() {
    assert_eq!(
        decode("#(1 two \"three\")").unwrap(),
        Value::Array(vec![num(1.0), s("two"), s("three")])
    );
}

#[test]
fn decode_nested_arrays() {
    assert_eq!(
        decode("#(#(1 2) #())").unwrap(),
        Value::Array(vec![
            Value::Array(vec![num(1.0), num(2.0)]),
            Value::Array(vec![]),
        ])
    );
}

#[test]
fn decode_array_of_keywords() {
    assert_eq!(
        decode("#(true false nil null)").unwrap(),
        Value::Array(vec![
            Value::Bool(true),
            Value::Bool(false),
            Value::Null,
            Value::Null,
        ])
    );
}

// ============================================================================
// Maps
// ============================================================================

#[test]
fn decode_empty_map() {
    assert_eq!(decode("@()").unwrap(), Value::Map(vec![]));
}

#[test]
fn decode_flat_map() {
    assert_eq!(
        decode("@(a 1 b two)").unwrap(),
        map(vec![("a", num(1.0)), ("b", s("two"))])
    );
}

#[test]
fn decode_map_with_quoted_keys() {
    assert_eq!(
        decode("@(\"a key\" 1)").unwrap(),
        map(vec![("a key", num(1.0))])
    );
}

#[test]
fn decode_map_with_numeric_keys() {
    assert_eq!(
        decode("@(1 one 5 five)").unwrap(),
        Value::Map(vec![
            (Key::Number(1.0), s("one")),
            (Key::Number(5.0), s("five")),
        ])
    );
}

#[test]
fn decode_map_numeric_key_distinct_from_string_key() {
    let value = decode("@(1 a \"1\" b)").unwrap();
    assert_eq!(value.map_get(&Key::Number(1.0)), Some(&s("a")));
    assert_eq!(value.map_get(&Key::String("1".into())), Some(&s("b")));
}

#[test]
fn decode_nested_map() {
    assert_eq!(
        decode("@(outer @(inner 1))").unwrap(),
        map(vec![("outer", map(vec![("inner", num(1.0))]))])
    );
}

#[test]
fn decode_map_duplicate_key_overwrites() {
    assert_eq!(decode("@(a 1 a 2)").unwrap(), map(vec![("a", num(2.0))]));
}

#[test]
fn decode_map_duplicate_container_key_merges() {
    // A second map value for the same key fills in the existing container
    assert_eq!(
        decode("@(a @(x 1) a @(y 2))").unwrap(),
        map(vec![("a", map(vec![("x", num(1.0)), ("y", num(2.0))]))])
    );
}

#[test]
fn decode_map_scalar_then_container_replaces() {
    assert_eq!(
        decode("@(a 1 a @(x 2))").unwrap(),
        map(vec![("a", map(vec![("x", num(2.0))]))])
    );
}

// ============================================================================
// References
// ============================================================================

#[test]
fn decode_reference_in_array() {
    assert_eq!(
        decode("#([x] 5 *[x])").unwrap(),
        Value::Array(vec![num(5.0), num(5.0)])
    );
}

#[test]
fn decode_reference_definition_is_transparent() {
    assert_eq!(decode("[x] 5").unwrap(), num(5.0));
}

#[test]
fn decode_reference_in_map_value_position() {
    assert_eq!(
        decode("@(a [x] 1 b *[x])").unwrap(),
        map(vec![("a", num(1.0)), ("b", num(1.0))])
    );
}

#[test]
fn decode_reference_def_with_inner_whitespace() {
    assert_eq!(decode("[ x ] 3").unwrap(), num(3.0));
}

#[test]
fn decode_reference_def_in_key_position() {
    // The definition names both the map entry and the reference
    assert_eq!(
        decode("@( [root] @( val 1 ) child *[root] )").unwrap(),
        map(vec![
            ("root", map(vec![("val", num(1.0))])),
            ("child", map(vec![("val", num(1.0))])),
        ])
    );
}

#[test]
fn decode_reference_to_container_is_shared_structurally() {
    let value = decode("#([x] #(1 2) *[x])").unwrap();
    let inner = Value::Array(vec![num(1.0), num(2.0)]);
    assert_eq!(value, Value::Array(vec![inner.clone(), inner]));
}

#[test]
fn decode_reference_redefinition_warns_twice() {
    let mut codec = Codec::new();
    let value = codec.decode("#([x] 1 [x] 2 *[x])").unwrap();
    assert_eq!(value, Value::Array(vec![num(1.0), num(2.0), num(2.0)]));
    assert_eq!(codec.warnings().len(), 2);
    assert!(codec.warnings()[0].contains("Redefining reference [x]"));
    assert!(codec.warnings()[1].contains("Reference [x] was previously defined here"));
}

#[test]
fn decode_warnings_reset_between_calls() {
    let mut codec = Codec::new();
    codec.decode("#([x] 1 [x] 2)").unwrap();
    assert_eq!(codec.warnings().len(), 2);
    codec.decode("#()").unwrap();
    assert!(codec.warnings().is_empty());
}

#[test]
fn undefined_reference_diagnostic() {
    assert_decode_error(
        "@(a *[b])",
        "1:5:Syntax Error: Reference [b] is undefined.\n@(a *[b])\n     ^~~~",
    );
}

// ============================================================================
// Prepopulated roots
// ============================================================================

#[test]
fn decode_into_array_merges_and_keeps_extra_slots() {
    let root = Value::Array(vec![
        Value::Null,
        Value::Null,
        Value::Null,
        num(5.0),
        Value::Null,
        s("String"),
    ]);
    assert_eq!(
        decode_into("#(1 2 3 4 5)", root).unwrap(),
        Value::Array(vec![
            num(1.0),
            num(2.0),
            num(3.0),
            num(4.0),
            num(5.0),
            s("String"),
        ])
    );
}

#[test]
fn decode_into_map_overwrites_and_keeps_extra_entries() {
    let root = map(vec![("a", num(0.0)), ("b", num(2.0))]);
    assert_eq!(
        decode_into("@(a 1)", root).unwrap(),
        map(vec![("a", num(1.0)), ("b", num(2.0))])
    );
}

#[test]
fn decode_into_merges_nested_containers() {
    let root = map(vec![("sub", map(vec![("y", num(2.0))]))]);
    assert_eq!(
        decode_into("@(sub @(x 1))", root).unwrap(),
        map(vec![("sub", map(vec![("y", num(2.0)), ("x", num(1.0))]))])
    );
}

#[test]
fn decode_into_shape_mismatch_discards_root() {
    let root = map(vec![("kept", num(1.0))]);
    assert_eq!(decode_into("#(1)", root).unwrap(), Value::Array(vec![num(1.0)]));
}

#[test]
fn decode_into_scalar_document_discards_root() {
    let root = map(vec![("kept", num(1.0))]);
    assert_eq!(decode_into("5", root).unwrap(), num(5.0));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn map_key_wrong_kind_diagnostic() {
    assert_decode_error(
        "@(#() asdf)",
        "1:3:Syntax Error: Expected map key as word, number, or string but instead found array.\n@(#() asdf)\n   ^~",
    );
}

#[test]
fn invalid_escape_diagnostic() {
    assert_decode_error(
        "\"asdf \\a\"",
        "1:7:Syntax Error: Invalid escape sequence in string.\n\"asdf \\a\"\n       ^~",
    );
}

#[test]
fn garbage_at_end_of_file() {
    let error = decode("1 2").expect_err("trailing token should fail");
    assert_eq!(
        error.to_string(),
        "1:3:Syntax Error: Garbage at end of file\n1 2\n   ^"
    );
}

#[test]
fn unterminated_map_reports_unexpected_end() {
    let error = decode("@(a").expect_err("open map should fail");
    assert!(error.to_string().contains("Syntax Error: File ended unexpectedly"));
}

#[test]
fn empty_input_reports_unexpected_end() {
    let error = decode("").expect_err("empty input should fail");
    assert!(error.to_string().contains("Syntax Error: File ended unexpectedly"));
}

#[test]
fn close_scope_at_top_level_is_an_error() {
    let error = decode(")").expect_err("stray close should fail");
    assert!(error
        .to_string()
        .contains("Syntax Error: Expected value but instead found close scope."));
}

#[test]
fn map_key_without_value_is_an_error() {
    let error = decode("@(a)").expect_err("keyless close should fail");
    assert!(error
        .to_string()
        .contains("Syntax Error: Expected value for map key but instead found close scope."));
}

#[test]
fn non_utf8_map_key_is_an_error() {
    let error = decode(b"@(\"\xFF\" 1)" as &[u8]).expect_err("bad key should fail");
    assert!(error
        .to_string()
        .contains("Syntax Error: Map key is not valid UTF-8."));
}

#[test]
fn unknown_token_diagnostic() {
    assert_decode_error("]", "1:1:Syntax error: Unknown token\n]\n ^");
}

#[test]
fn unterminated_string_reports_end_of_file() {
    let error = decode("\"abc").expect_err("open string should fail");
    assert!(error
        .to_string()
        .contains("Syntax Error: String not closed before end of file"));
}

#[test]
fn last_error_is_observable_on_codec() {
    let mut codec = Codec::new();
    assert!(codec.decode("@(").is_err());
    assert!(matches!(codec.last_error(), Some(WexprError::Syntax(_))));
    codec.decode("1").unwrap();
    assert!(codec.last_error().is_none());
}
