use confxml::xml::{self, XmlOptions};
use confxml::{from_str, Document, ErrorKind, Map, Value};
use proptest::prelude::*;
use rstest::rstest;

fn map(source: &str) -> Map {
    match from_str(source).unwrap() {
        Document::Map(map) => map,
        Document::Seq(_) => panic!("expected a top-level dictionary"),
    }
}

fn field(source: &str, key: &str) -> Value {
    map(source).get(key).cloned().unwrap()
}

fn error(source: &str) -> ErrorKind {
    from_str(source).unwrap_err().kind()
}

#[test]
fn test_number() {
    assert_eq!(Value::Int(42), field("$[value: 42]", "value"));
}

#[test]
fn test_string() {
    assert_eq!(
        Value::from("Hello, World!"),
        field("$[message: q(Hello, World!)]", "message")
    );
}

#[test]
fn test_array() {
    assert_eq!(
        Value::Seq(vec![1.into(), 2.into(), "three".into()]),
        field("$[items: {1, 2, q(three)}]", "items")
    );
}

#[test]
fn test_nested_dictionary_keeps_order() {
    let Value::Map(user) = field("$[user: $[name: q(Alice), age: 30]]", "user") else {
        panic!("expected a dictionary");
    };
    let keys: Vec<_> = user.keys().map(|key| key.as_str()).collect();
    assert_eq!(vec!["name", "age"], keys);
    assert_eq!(Some(&Value::from("Alice")), user.get("name"));
    assert_eq!(Some(&Value::Int(30)), user.get("age"));
}

#[test]
fn test_top_level_order() {
    let keys: Vec<_> = map("$[a: 1, b: 2, c: 3]")
        .keys()
        .map(|key| key.to_string())
        .collect();
    assert_eq!(vec!["a", "b", "c"], keys);
}

#[rstest]
#[case("let MAX = 100;\n$[v: |MAX|]", Value::Int(100))]
#[case("let MAX = 100;\n$[v: MAX]", Value::Int(100))]
#[case("let A = 10;\nlet B = 20;\n$[v: |A + B|]", Value::Int(30))]
#[case("let X = -42;\n$[v: |abs(X)|]", Value::Int(42))]
#[case("let S = q(text);\n$[v: |S|]", Value::from("text"))]
#[case("$[v: |7|]", Value::Int(7))]
#[case("let A = 1;\n$[v: ||A||]", Value::Int(1))]
#[case("let A = 1;\nlet B = ||A||;\n$[v: B]", Value::Int(1))]
#[case("$[v: A]\nlet A = 1;", Value::Int(1))]
#[case("let A = 1; \\ first\nlet A = 2; \\ second wins\n$[v: A]", Value::Int(2))]
fn test_constants_and_expressions(#[case] source: &str, #[case] expected: Value) {
    assert_eq!(expected, field(source, "v"));
}

#[test]
fn test_nested_structures() {
    let source = r"
        \ nested configuration
        let DEFAULT = q(unknown);
        $[
          config: $[
            db: $[host: q(localhost), port: 5432],
            features: {q(auth), q(logging)},
            fallback: |DEFAULT|
          ]
        ]
    ";
    let Value::Map(config) = field(source, "config") else {
        panic!("expected a dictionary");
    };
    let Some(Value::Map(db)) = config.get("db") else {
        panic!("expected a dictionary");
    };
    assert_eq!(Some(&Value::from("localhost")), db.get("host"));
    assert_eq!(Some(&Value::Int(5432)), db.get("port"));
    assert_eq!(
        Some(&Value::Seq(vec!["auth".into(), "logging".into()])),
        config.get("features")
    );
    assert_eq!(Some(&Value::from("unknown")), config.get("fallback"));
}

#[rstest]
#[case("", Document::Map(Map::new()))]
#[case("  \\ nothing but a comment", Document::Map(Map::new()))]
#[case("$[]", Document::Map(Map::new()))]
#[case("{}", Document::Seq(vec![]))]
#[case("{1, , 2,}", Document::Seq(vec![1.into(), 2.into()]))]
#[case("$[a: 1,]", Document::Map([("a", Value::Int(1))].into_iter().collect()))]
#[case("let A = 1;", Document::Map(Map::new()))]
fn test_empty_forms(#[case] source: &str, #[case] expected: Document) {
    assert_eq!(expected, from_str(source).unwrap());
}

#[test]
fn test_duplicate_key_replaces_value_in_place() {
    let keys: Vec<_> = map("$[a: 1, b: 2, a: 3]")
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect();
    assert_eq!(
        vec![("a".to_string(), Value::Int(3)), ("b".to_string(), Value::Int(2))],
        keys
    );
}

#[rstest]
#[case("$[v: ]", ErrorKind::EmptyValue)]
#[case("$[v: ||]", ErrorKind::EmptyValue)]
#[case("$[v]", ErrorKind::EmptyValue)]
#[case("$[v: q(abc]", ErrorKind::UnclosedLiteral)]
#[case("$[v: {1, 2]", ErrorKind::MismatchedDelimiter)]
#[case("$[v: {1, 2", ErrorKind::UnclosedLiteral)]
#[case("$[v: |A", ErrorKind::UnclosedLiteral)]
#[case("$[v: 1", ErrorKind::UnclosedLiteral)]
#[case("{1}}", ErrorKind::MismatchedDelimiter)]
#[case("$[2v: 1]", ErrorKind::InvalidKeyName)]
#[case("$[a-b: 1]", ErrorKind::InvalidKeyName)]
#[case("$[a b: 1]", ErrorKind::InvalidKeyName)]
#[case("$[: 1]", ErrorKind::InvalidKeyName)]
#[case("$[v: |UNDEF|]", ErrorKind::UndefinedReference)]
#[case("$[v: UNDEF]", ErrorKind::UndefinedReference)]
#[case("$[v: 1 2]", ErrorKind::UnknownValueForm)]
#[case("$[v: A + 1]", ErrorKind::UnknownValueForm)]
#[case("$[v: abs(1)]", ErrorKind::UnknownValueForm)]
#[case("$[v: @]", ErrorKind::UnknownValueForm)]
#[case("$[v: 1: 2]", ErrorKind::UnknownValueForm)]
#[case("$[v: |1 + 2 + 3|]", ErrorKind::UnknownValueForm)]
#[case("$[v: |{1}|]", ErrorKind::UnknownValueForm)]
#[case("$[v: |abs(q(x))|]", ErrorKind::TypeMismatch)]
#[case("$[v: |q(a) + q(b)|]", ErrorKind::TypeMismatch)]
#[case("$[v: 9223372036854775808]", ErrorKind::IntegerOverflow)]
#[case("42", ErrorKind::InvalidRoot)]
#[case("q(text)", ErrorKind::InvalidRoot)]
#[case("$[a: 1] $[b: 2]", ErrorKind::TrailingInput)]
#[case("{1} extra", ErrorKind::TrailingInput)]
fn test_errors(#[case] source: &str, #[case] kind: ErrorKind) {
    assert_eq!(kind, error(source));
}

#[rstest]
#[case("$[v: ]", "Empty value")]
#[case("$[v: q(abc]", "Unclosed string: q(abc]")]
#[case("$[2v: 1]", "Invalid key name: 2v")]
#[case("$[v: |UNDEF|]", "Undefined constant: UNDEF")]
#[case("$[v: what ever]", "Unknown value: what ever")]
fn test_error_messages(#[case] source: &str, #[case] message: &str) {
    assert_eq!(message, from_str(source).unwrap_err().to_string());
}

#[test]
fn test_deep_nesting_is_rejected() {
    let source = format!("$[v: {}1{}]", "{".repeat(1000), "}".repeat(1000));
    assert_eq!(ErrorKind::TooDeep, error(&source));
}

#[test]
fn test_top_level_array_renders_indexed_items() {
    let document = from_str("{q(a), {1, 2}}").unwrap();
    let options = XmlOptions {
        indent: None,
        ..XmlOptions::default()
    };
    let xml = xml::to_string(&document, &options).unwrap();
    assert!(xml.ends_with(concat!(
        r#"<config><items><item index="0">a</item>"#,
        r#"<item index="1"><item>1</item><item>2</item></item></items></config>"#
    )));
}

proptest! {
    #[test]
    fn integers_round_trip(n: i64) {
        let source = format!("$[v: {n}]");
        prop_assert_eq!(Value::Int(n), field(&source, "v"));
    }

    #[test]
    fn strings_round_trip(s in "[^)\\\\\n\r;]*") {
        let source = format!("$[v: q({s})]");
        prop_assert_eq!(Value::from(s.as_str()), field(&source, "v"));
    }

    #[test]
    fn integers_render_as_decimal_text(n: i64) {
        let document = from_str(&format!("$[v: {n}]")).unwrap();
        let options = XmlOptions { indent: None, ..XmlOptions::default() };
        let xml = xml::to_string(&document, &options).unwrap();
        let expected = format!("<v>{n}</v>");
        prop_assert!(xml.contains(&expected));
    }
}
