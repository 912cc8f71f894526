use field_path::{binding::decode_token, Env, FieldPath, PathCodec, PathSeed, Parser};
use serde::{de::DeserializeSeed, Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct Column {
    label: String,
    #[serde(default, with = "field_path::binding::optional")]
    source: Option<FieldPath>,
}

fn column(json: &str) -> Result<Column, serde_json::Error> {
    serde_json::from_str(json)
}

#[test]
fn bound_path() {
    let col = column(r#"{"label": "zip", "source": "customer.address[0].zip"}"#).unwrap();
    let want = FieldPath::compound(["customer", "address"])
        .and_then(|p| p.with_child_index(0))
        .and_then(|p| p.with_child_field("zip"))
        .unwrap();
    assert_eq!(col.source, Some(want));
}

#[test]
fn empty_string_is_no_path() {
    let col = column(r#"{"label": "x", "source": ""}"#).unwrap();
    assert_eq!(col.source, None);
}

#[test]
fn null_is_no_path() {
    let col = column(r#"{"label": "x", "source": null}"#).unwrap();
    assert_eq!(col.source, None);
}

#[test]
fn missing_is_no_path() {
    let col = column(r#"{"label": "x"}"#).unwrap();
    assert_eq!(col.source, None);
}

#[test]
fn expression_is_rejected() {
    let err = column(r#"{"label": "x", "source": "1+1"}"#).unwrap_err();
    assert!(err.to_string().contains("not a field path"));
}

#[test]
fn parse_failure_is_rejected() {
    let err = column(r#"{"label": "x", "source": "a..b"}"#).unwrap_err();
    assert!(err.to_string().contains("failed to parse \"a..b\""));
}

#[test]
fn non_string_is_rejected() {
    assert!(column(r#"{"label": "x", "source": 12}"#).is_err());
}

#[test]
fn serialize_then_deserialize() {
    let col = Column {
        label: String::from("odd"),
        source: FieldPath::compound(["a", "b c"]).ok(),
    };
    let json = serde_json::to_string(&col).unwrap();
    assert_eq!(json, r#"{"label":"odd","source":"`a`.`b c`"}"#);

    let back = column(&json).unwrap();
    assert_eq!(back.source, col.source);

    let none = Column {
        label: String::from("none"),
        source: None,
    };
    let json = serde_json::to_string(&none).unwrap();
    assert_eq!(json, r#"{"label":"none","source":null}"#);
    assert_eq!(column(&json).unwrap().source, None);
}

#[test]
fn seed_uses_injected_codec() {
    let mut env = Env::standard();
    env.max_index = 3;
    let codec = PathCodec::new(Parser::new(env));

    let mut de = serde_json::Deserializer::from_str(r#""a[3]""#);
    assert!(PathSeed::new(&codec).deserialize(&mut de).unwrap().is_some());

    let mut de = serde_json::Deserializer::from_str(r#""a[4]""#);
    assert!(PathSeed::new(&codec).deserialize(&mut de).is_err());

    // the standard codec has a much larger limit
    assert!(column(r#"{"label": "x", "source": "a[4]"}"#).unwrap().source.is_some());
}

#[test]
fn raw_tokens() {
    let codec = PathCodec::default();
    assert_eq!(decode_token(&codec, None), Ok(None));
    assert_eq!(decode_token(&codec, Some("")), Ok(None));
    assert!(decode_token(&codec, Some("a.b")).unwrap().is_some());
    assert!(decode_token(&codec, Some("lower(a)")).is_err());
}
