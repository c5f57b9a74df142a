/// Property-Based Roundtrip Tests
///
/// Uses the `proptest` crate to generate random JSON values, serialize them
/// with serde_json, and verify that parsing then rendering with ujson yields
/// the same JSON value.
///
/// Strategies generate:
/// - Random strings (ASCII, unicode, and the escapes serde_json emits)
/// - Random numbers (integers and floats with few decimal places)
/// - Random booleans and null
/// - Random objects and arrays (up to 3 levels deep, empties included)
///
/// Control characters other than newline and tab are left out: serde_json
/// writes them as `\u00XX`, which the decoder turns back into raw characters.
use proptest::prelude::*;
use serde_json::{Map, Number, Value};
use ujson_core::{parse, Access, Kind, Node};

// ============================================================================
// Strategies for generating JSON values
// ============================================================================

fn arb_key() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z_][a-zA-Z0-9_]{0,15}").unwrap()
}

fn arb_json_string() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,30}",
        prop::string::string_regex("[a-zA-Z0-9:,\\[\\]{}\\-\\./ ]{0,20}").unwrap(),
        Just("".to_string()),
        Just("true".to_string()),
        Just("null".to_string()),
        Just("42".to_string()),
        Just("caf\u{00e9}".to_string()),
        Just("\u{4f60}\u{597d}".to_string()),
        Just("line1\nline2".to_string()),
        Just("col1\tcol2".to_string()),
        Just("path\\to\\file".to_string()),
        Just("say \"hi\"".to_string()),
        Just("ends with backslash\\".to_string()),
    ]
}

fn arb_json_integer() -> impl Strategy<Value = Value> {
    (-1_000_000i64..1_000_000i64).prop_map(|n| Value::Number(Number::from(n)))
}

/// Floats built as integer / 10^n so that their shortest decimal form is exact.
fn arb_json_float() -> impl Strategy<Value = Value> {
    (-100_000_000i64..100_000_000i64, 1u32..5u32).prop_filter_map(
        "must be a non-integral finite f64",
        |(mantissa, decimals)| {
            let f = mantissa as f64 / 10f64.powi(decimals as i32);
            if f.fract() == 0.0 {
                return None;
            }
            Number::from_f64(f).map(Value::Number)
        },
    )
}

fn arb_primitive() -> impl Strategy<Value = Value> {
    prop_oneof![
        4 => arb_json_string().prop_map(Value::String),
        3 => arb_json_integer(),
        1 => arb_json_float(),
        1 => any::<bool>().prop_map(Value::Bool),
        1 => Just(Value::Null),
    ]
}

fn arb_json_value_inner(depth: u32) -> impl Strategy<Value = Value> {
    if depth == 0 {
        arb_primitive().boxed()
    } else {
        prop_oneof![
            4 => arb_primitive(),
            2 => prop::collection::vec((arb_key(), arb_json_value_inner(depth - 1)), 0..5)
                .prop_map(|pairs| Value::Object(pairs.into_iter().collect::<Map<_, _>>())),
            2 => prop::collection::vec(arb_json_value_inner(depth - 1), 0..5)
                .prop_map(Value::Array),
        ]
        .boxed()
    }
}

fn arb_json_value() -> impl Strategy<Value = Value> {
    arb_json_value_inner(3)
}

fn arb_access() -> impl Strategy<Value = Access> {
    prop_oneof![
        Just(Access::Immutable),
        Just(Access::ValueOnly),
        Just(Access::All),
    ]
}

fn all_nodes_have(node: &Node, access: Access) -> bool {
    node.access() == access && node.children().iter().all(|c| all_nodes_have(c, access))
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// parse → render preserves the JSON value.
    #[test]
    fn roundtrip_preserves_json(value in arb_json_value()) {
        let json_str = serde_json::to_string(&value).unwrap();
        let rendered = parse(&json_str, Access::All).unwrap().render();
        let roundtripped: Value = serde_json::from_str(&rendered).unwrap();
        prop_assert_eq!(
            &value,
            &roundtripped,
            "Roundtrip failed!\n  JSON in:  {}\n  rendered: {}",
            json_str,
            rendered
        );
    }

    /// Pretty-printed input parses just like compact input.
    #[test]
    fn pretty_input_parses_identically(value in arb_json_value()) {
        let compact = parse(&serde_json::to_string(&value).unwrap(), Access::All).unwrap();
        let pretty = parse(&serde_json::to_string_pretty(&value).unwrap(), Access::All).unwrap();
        prop_assert_eq!(compact, pretty);
    }

    /// Rendering a parsed tree is a fixed point.
    #[test]
    fn render_is_idempotent(value in arb_json_value()) {
        let once = parse(&serde_json::to_string(&value).unwrap(), Access::All).unwrap().render();
        let twice = parse(&once, Access::All).unwrap().render();
        prop_assert_eq!(once, twice);
    }

    /// Output never ends with a newline.
    #[test]
    fn no_trailing_newline(value in arb_json_value()) {
        let rendered = parse(&serde_json::to_string(&value).unwrap(), Access::All).unwrap().render();
        prop_assert!(!rendered.ends_with('\n'), "unexpected trailing newline: {:?}", rendered);
    }

    /// Every node of a parsed tree carries the requested access level.
    #[test]
    fn parse_stamps_access_everywhere(value in arb_json_value(), access in arb_access()) {
        let node = parse(&serde_json::to_string(&value).unwrap(), access).unwrap();
        prop_assert!(all_nodes_have(&node, access));
    }

    /// Immutable trees reject scalar updates and stay unchanged.
    #[test]
    fn immutable_rejects_updates(value in arb_json_value()) {
        let mut node = parse(&serde_json::to_string(&value).unwrap(), Access::Immutable).unwrap();
        let before = node.clone();
        if node.kind() == Kind::Object {
            let keys: Vec<String> = node.keys().map(str::to_string).collect();
            for key in keys {
                prop_assert!(node.update_child(key.as_str(), 1).is_err());
            }
        }
        prop_assert!(node.set("k", 1).is_err());
        prop_assert_eq!(node, before);
    }

    /// serde serialization agrees with the rendered text.
    #[test]
    fn serialize_matches_render(value in arb_json_value()) {
        let node = parse(&serde_json::to_string(&value).unwrap(), Access::All).unwrap();
        let compact: Value = serde_json::from_str(&serde_json::to_string(&node).unwrap()).unwrap();
        let rendered: Value = serde_json::from_str(&node.render()).unwrap();
        prop_assert_eq!(&compact, &rendered);
        prop_assert_eq!(&compact, &value);
    }

    /// Trees built from values render back to the same value.
    #[test]
    fn from_value_renders_valid_json(value in arb_json_value()) {
        let rendered = Node::from_value(value.clone(), Access::All).render();
        let reparsed: Value = serde_json::from_str(&rendered).unwrap();
        prop_assert_eq!(reparsed, value);
    }

    /// The parser never panics on arbitrary text.
    #[test]
    fn parse_never_panics(text in "\\PC{0,64}") {
        let _ = parse(&text, Access::All);
    }
}
