use serde_json::{json, Value};
use tpl_core::{classify, parse_lenient, repair, ClassifyError, EnvValue};

/// Helper: classify and expect a structured result, returned as JSON for comparison.
fn structured(raw: &str) -> Value {
    match classify(raw) {
        EnvValue::Structured(value) => value.into(),
        EnvValue::Plain(s) => panic!("expected structured value for {raw:?}, got plain {s:?}"),
    }
}

/// Helper: classify and expect the raw string back unchanged.
fn assert_plain(raw: &str) {
    assert_eq!(
        classify(raw),
        EnvValue::Plain(raw.to_string()),
        "expected {raw:?} to stay plain"
    );
}

// ============================================================================
// Plain text (not candidates)
// ============================================================================

#[test]
fn plain_word_stays_plain() {
    assert_plain("bar");
}

#[test]
fn empty_string_stays_empty() {
    assert_plain("");
}

#[test]
fn whitespace_only_stays_untrimmed() {
    assert_plain("   ");
    assert_plain("\t\n");
}

#[test]
fn large_number_is_not_promoted() {
    assert_plain("59614658972");
}

#[test]
fn null_literal_is_not_promoted() {
    assert_plain("null");
}

#[test]
fn booleans_are_not_promoted() {
    assert_plain("true");
    assert_plain("false");
}

#[test]
fn number_like_text_stays_plain() {
    assert_plain("1.0-123");
    assert_plain("-7");
    assert_plain("3.14");
}

#[test]
fn unicode_and_special_characters_stay_plain() {
    assert_plain("500\u{20ac}");
    assert_plain("?&>=:/");
    assert_plain("\\.\\/");
    assert_plain("key:value");
}

#[test]
fn plain_values_are_not_trimmed() {
    assert_plain("  padded  ");
    assert_plain(" x{a:b}");
}

// ============================================================================
// Strictly valid JSON (no repair)
// ============================================================================

#[test]
fn valid_json_object_parses_strictly() {
    let value = structured(r#"{"abc":123,"def":["a","b","c"],"ghi":"[{,!?!,}]"}"#);
    assert_eq!(
        value,
        json!({"abc": 123, "def": ["a", "b", "c"], "ghi": "[{,!?!,}]"})
    );
}

#[test]
fn nested_numbers_stay_numbers() {
    let value = structured(r#"{"abc":123,"ratio":0.5}"#);
    assert!(value["abc"].is_u64());
    assert!(value["ratio"].is_f64());
    assert_eq!(structured("[1,2,3]"), json!([1, 2, 3]));
}

#[test]
fn nested_literals_are_kept() {
    assert_eq!(structured("[true,false,null]"), json!([true, false, null]));
}

#[test]
fn empty_containers() {
    assert_eq!(structured("[]"), json!([]));
    assert_eq!(structured("{}"), json!({}));
}

#[test]
fn quoted_string_becomes_string() {
    assert_eq!(structured(r#""hello world""#), json!("hello world"));
    assert_eq!(structured(r#""123""#), json!("123"));
}

#[test]
fn valid_json_is_not_repaired() {
    // A strict parse wins, so the `::` escape is not collapsed here.
    assert_eq!(structured(r#"{"a":"x::y"}"#), json!({"a": "x::y"}));
}

#[test]
fn leading_whitespace_is_allowed() {
    assert_eq!(structured("  [\"a\"]  "), json!(["a"]));
}

// ============================================================================
// Repaired JSON-like values
// ============================================================================

#[test]
fn bare_array() {
    assert_eq!(structured("[foo,bar]"), json!(["foo", "bar"]));
}

#[test]
fn bare_object() {
    assert_eq!(
        structured("{foo:bar,bar:foo}"),
        json!({"foo": "bar", "bar": "foo"})
    );
}

#[test]
fn object_with_array_value() {
    assert_eq!(
        structured("{foo:[bar,baz]}"),
        json!({"foo": ["bar", "baz"]})
    );
}

#[test]
fn single_character_tokens() {
    assert_eq!(structured("[a,b,c]"), json!(["a", "b", "c"]));
    assert_eq!(structured("{a:b,c:d}"), json!({"a": "b", "c": "d"}));
}

#[test]
fn nested_arrays() {
    assert_eq!(
        structured("[foo,[bar,baz]]"),
        json!(["foo", ["bar", "baz"]])
    );
}

#[test]
fn nested_objects() {
    assert_eq!(structured("{a:{b:c}}"), json!({"a": {"b": "c"}}));
}

#[test]
fn double_colon_escapes_urls() {
    let value = structured(
        "{google:[https:://google.com,http:://google.de],github:https:://github.com}",
    );
    assert_eq!(
        value,
        json!({
            "google": ["https://google.com", "http://google.de"],
            "github": "https://github.com"
        })
    );
}

#[test]
fn triple_colon_collapses_one_pair() {
    // `:::` is one `::` escape followed by a literal `:`, leaving `::`.
    assert_eq!(
        structured("{google:[https::://google.com]}"),
        json!({"google": ["https:://google.com"]})
    );
}

#[test]
fn repaired_scalars_become_strings() {
    assert_eq!(structured("[a,1]"), json!(["a", "1"]));
    assert_eq!(structured("{a:true}"), json!({"a": "true"}));
    assert_eq!(structured("{a:null}"), json!({"a": "null"}));
}

#[test]
fn spaces_inside_tokens_are_kept() {
    assert_eq!(structured("{foo: bar}"), json!({"foo": " bar"}));
}

// ============================================================================
// Fallback to plain text
// ============================================================================

#[test]
fn unterminated_string_falls_back() {
    assert_plain("\"unterminated");
}

#[test]
fn unbalanced_object_falls_back() {
    assert_plain("{foo:bar");
    assert_plain("[foo,bar");
}

#[test]
fn garbage_after_opener_falls_back() {
    assert_plain("{{{");
    assert_plain("[[[");
}

#[test]
fn nesting_past_the_parser_limit_falls_back() {
    let deep = format!("{}{}", "[".repeat(200), "]".repeat(200));
    assert_plain(&deep);
    assert!(matches!(parse_lenient(&deep), Err(ClassifyError::Json(_))));

    let shallow = format!("{}{}", "[".repeat(100), "]".repeat(100));
    assert!(classify(&shallow).is_structured());
}

#[test]
fn lone_surrogate_escape_falls_back() {
    assert_plain(r#""\ud800""#);
    assert_plain(r#"["\udc00"]"#);
}

#[test]
fn lone_comma_is_quoted_as_a_string() {
    // Both comma passes fire, producing the one-element array `[","]`.
    assert_eq!(structured("[,]"), json!([","]));
}

#[test]
fn fallback_reason_is_reported() {
    assert!(matches!(
        parse_lenient("plain"),
        Err(ClassifyError::NotCandidate)
    ));
    assert!(matches!(
        parse_lenient("{foo:bar"),
        Err(ClassifyError::Json(_))
    ));
}

// ============================================================================
// Repair passes
// ============================================================================

#[test]
fn repair_quotes_every_bare_token() {
    assert_eq!(repair("[foo,bar]"), r#"["foo","bar"]"#);
    assert_eq!(repair("{foo:bar,bar:foo}"), r#"{"foo":"bar","bar":"foo"}"#);
}

#[test]
fn repair_leaves_valid_json_alone() {
    let json = r#"{"abc":["a","b"],"def":{"g":"h"}}"#;
    assert_eq!(repair(json), json);
}

#[test]
fn repair_collapses_double_colons_last() {
    assert_eq!(
        repair("{github:https:://github.com}"),
        r#"{"github":"https://github.com"}"#
    );
}
