//! Document-level conformance tests.
//!
//! Drives the public entry points end to end: text in, value tree out.
//!
//! # Properties Tested
//!
//! - Lossless round trip through the value model, including exact numbers
//! - Escape and surrogate-pair decoding
//! - Longest-match number lexing
//! - Duplicate key rejection
//! - Incremental array streaming
//! - Value construction from native data

use exact_json::{
    parse_str, stream_str, to_value, Error, ErrorKind, Lexer, Limits, Native, Number, Pull,
    StrSource, TokenKind, Value,
};
use serde::Serialize;

fn parse(input: &str) -> Result<Value, Error> {
    parse_str(input, Limits::default())
}

/// Render a value back to document text.
fn render(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let members: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}:{}", serde_json::to_string(k).unwrap(), render(v)))
                .collect();
            format!("{{{}}}", members.join(","))
        }
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(render).collect();
            format!("[{}]", items.join(","))
        }
        Value::String(s) => serde_json::to_string(s).unwrap(),
        Value::Number(_) | Value::Boolean(_) => value.as_displayable_text().unwrap(),
        Value::Null => "null".to_string(),
    }
}

fn first_string(input: &str) -> Result<String, Error> {
    let value = parse(input)?;
    Ok(value.get_index(0).unwrap().as_string().unwrap().to_string())
}

// ============================================================================
// Round Trip
// ============================================================================

#[test]
fn roundtrip_is_lossless() {
    let inputs = [
        r#"{"a":1,"b":[true,false,null]}"#,
        r#"[123456789012345678901234567890,-0.000125,1.5e-7,2E+3]"#,
        r#"{"s":"quote \" slash \\ tab \t \u00e9 \u00E9 \uD834\uDD1E","nested":{"x":[[],{}]}}"#,
        r#"[-98765432109876543210.123456789]"#,
    ];

    for input in inputs {
        let first = parse(input).unwrap();
        let text = render(&first);
        let second = parse(&text).unwrap_or_else(|e| panic!("re-parse of {text:?} failed: {e}"));
        assert_eq!(first, second, "round trip changed {input}");
    }
}

#[test]
fn roundtrip_keeps_thirty_digits() {
    let value = parse("[123456789012345678901234567890]").unwrap();
    assert_eq!(render(&value), "[123456789012345678901234567890]");
}

// ============================================================================
// Escapes
// ============================================================================

#[test]
fn escapes_decode_to_characters() {
    let decoded = first_string(r#"["\"\\\/\b\f\n\r\t"]"#).unwrap();
    assert_eq!(decoded, "\"\\/\u{8}\u{c}\n\r\t");
}

#[test]
fn unicode_escapes_decode() {
    assert_eq!(first_string(r#"["\u0041\u00e9\u4E2D"]"#).unwrap(), "A\u{e9}\u{4e2d}");
}

#[test]
fn duplicate_keys_compared_after_unescaping() {
    let err = parse(r#"{"a": 1, "\u0061": 2}"#).unwrap_err();
    assert!(matches!(err, Error::DuplicateKey(ref k) if k == "a"), "{err}");
}

#[test]
fn illegal_escapes_rejected() {
    assert!(matches!(first_string(r#"["\x"]"#), Err(Error::IllegalEscape(_))));
    assert!(matches!(first_string(r#"["\u12G4"]"#), Err(Error::IllegalEscape(_))));
    assert!(matches!(parse(r#"["\u12"#), Err(Error::IncompleteEscape(_))));
    assert!(matches!(parse("[\"\u{1}\"]"), Err(Error::ControlCharacter(1))));
    assert!(matches!(parse(r#"["open"#), Err(Error::IncompleteString(_))));
}

// ============================================================================
// Surrogate Pairs
// ============================================================================

#[test]
fn surrogate_pair_decodes_to_one_code_point() {
    let decoded = first_string(r#"["\uD834\udd1e"]"#).unwrap();
    assert_eq!(decoded.chars().count(), 1);
    assert_eq!(decoded, "\u{1D11E}");
}

#[test]
fn lone_high_surrogate_at_end_is_surrogate_error() {
    let err = parse(r#"["\uD834"#).unwrap_err();
    assert!(matches!(err, Error::UnpairedHighSurrogate(_)), "{err}");
    assert_eq!(err.kind(), ErrorKind::Lexical);
}

#[test]
fn high_surrogate_then_non_surrogate_rejected() {
    let err = parse(r#"["\uD834\u0061"]"#).unwrap_err();
    assert!(matches!(err, Error::InvalidSurrogatePair(_)), "{err}");
}

#[test]
fn lone_low_surrogate_rejected() {
    let err = parse(r#"["\uDD1E"]"#).unwrap_err();
    assert!(matches!(err, Error::UnpairedLowSurrogate(_)), "{err}");
}

// ============================================================================
// Number Lexing
// ============================================================================

#[test]
fn number_lexing_stops_at_trailing_garbage() {
    let mut lexer = Lexer::new(StrSource::new("1.25e2a"), Limits::default());
    let token = lexer.pull().unwrap().unwrap();
    assert_eq!(token.kind(), TokenKind::Number);
    assert_eq!(token.text(), "1.25e2");
    assert!(matches!(lexer.pull(), Err(Error::InvalidCharacter('a'))));
}

#[test]
fn malformed_numbers_rejected() {
    for input in ["[-]", "[1.]", "[1e]", "[1.e5]", "[-a]"] {
        let err = parse(input).unwrap_err();
        assert!(
            matches!(err, Error::InvalidNumber(_)),
            "{input} gave {err}"
        );
    }
}

#[test]
fn lenient_literal_matching() {
    let mut lexer = Lexer::new(StrSource::new("null1"), Limits::default());
    assert_eq!(lexer.pull().unwrap().unwrap().kind(), TokenKind::Null);
    assert_eq!(lexer.pull().unwrap().unwrap().text(), "1");

    assert!(matches!(parse("[nul]"), Err(Error::InvalidLiteral(_))));
    assert!(matches!(parse("[tru"), Err(Error::InvalidLiteral(_))));
}

// ============================================================================
// Structure
// ============================================================================

#[test]
fn duplicate_key_names_the_key() {
    let err = parse(r#"{"foo":1,"foo":2}"#).unwrap_err();
    assert_eq!(err.code(), 202);
    assert!(err.to_string().contains("foo"), "{err}");
}

#[test]
fn structural_errors_carry_context() {
    let err = parse(r#"{"price": 1, "qty" 2}"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
    assert!(err.to_string().contains("qty"), "{err}");

    let err = parse("[1, 2 3]").unwrap_err();
    assert!(err.to_string().contains("element 1"), "{err}");
}

// ============================================================================
// Lazy Arrays
// ============================================================================

#[test]
fn lazy_array_yields_valid_prefix() {
    let mut values = stream_str("[1,2,bad]", Limits::default()).unwrap();
    assert_eq!(values.pull().unwrap(), Some(Value::from(1)));
    assert_eq!(values.pull().unwrap(), Some(Value::from(2)));
    assert!(values.pull().is_err());
}

#[test]
fn lazy_array_ends_after_last_element() {
    let mut values = stream_str("[1,2,3]", Limits::default()).unwrap();
    for expected in 1..=3 {
        assert_eq!(values.pull().unwrap(), Some(Value::from(expected)));
    }
    assert_eq!(values.pull().unwrap(), None);
    assert_eq!(values.pull().unwrap(), None, "End of input should be sticky");
}

#[test]
fn lazy_array_defers_parsing() {
    // The malformed tail is never reached while only the head is pulled
    let mut values = stream_str(r#"[{"ok":true}, {"broken"}]"#, Limits::default()).unwrap();
    let head = values.pull().unwrap().unwrap();
    assert_eq!(head.get("ok"), Some(&Value::TRUE));
}

// ============================================================================
// End-to-End Scenarios
// ============================================================================

#[test]
fn scenario_object_with_array() {
    let value = parse(r#"{"a":1,"b":[true,false,null]}"#).unwrap();
    let expected: Value = [
        ("a", Value::from(1)),
        ("b", Value::from(vec![Value::TRUE, Value::FALSE, Value::NULL])),
    ]
    .into_iter()
    .collect();
    assert_eq!(value, expected);
}

#[test]
fn scenario_empty_input() {
    let err = parse("").unwrap_err();
    assert_eq!(err.to_string(), "empty document");
}

#[test]
fn scenario_stream_one_at_a_time() {
    let values: Vec<Value> = stream_str("[1,2,3]", Limits::default())
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(values, vec![Value::from(1), Value::from(2), Value::from(3)]);
}

#[test]
fn scenario_bad_surrogate_pair() {
    assert!(matches!(
        parse(r#"["\uD834\u0061"]"#),
        Err(Error::InvalidSurrogatePair(_))
    ));
}

#[test]
fn scenario_exact_decimal() {
    let value = parse("[123456789012345678901234567890.5]").unwrap();
    let number = value.get_index(0).unwrap().as_number().unwrap();
    let expected = Number::from_literal("1234567890123456789012345678905e-1", 16).unwrap();
    assert_eq!(number, &expected);
    assert!(!number.is_integer());
    assert_eq!(number.to_string(), "123456789012345678901234567890.5");
}

// ============================================================================
// Value Model
// ============================================================================

#[test]
fn visit_converts_leaves() {
    let value = parse(r#"{"n":[0.5,2],"s":"x","b":true,"z":null}"#).unwrap();
    let native = value.visit(str::len, |n| n.to_f64().unwrap(), |b| !b);

    let Native::Map(map) = native else {
        panic!("expected map");
    };
    assert_eq!(
        map["n"],
        Native::Seq(vec![Native::Number(0.5), Native::Number(2.0)])
    );
    assert_eq!(map["s"], Native::String(1));
    assert_eq!(map["b"], Native::Boolean(false));
    assert_eq!(map["z"], Native::Null);
}

#[test]
fn wrong_variant_access_fails() {
    let value = parse(r#"{"a":"text"}"#).unwrap();
    let err = value.get("a").unwrap().as_number().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Value);
    assert!(value.as_array().is_err());
}

#[derive(Serialize)]
struct Reading {
    sensor: &'static str,
    values: Vec<i64>,
    calibrated: bool,
    offset: Option<u32>,
}

#[test]
fn native_data_matches_parsed_document() {
    let built = to_value(&Reading {
        sensor: "t1",
        values: vec![-4, 0, 12],
        calibrated: true,
        offset: None,
    })
    .unwrap();
    let parsed =
        parse(r#"{"sensor":"t1","values":[-4,0,12],"calibrated":true,"offset":null}"#).unwrap();
    assert_eq!(built, parsed);
}
