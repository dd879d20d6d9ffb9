use graphson_core::{
    DEFAULT_MAX_DEPTH, DecoderOptions, Error, GValue, GraphSONReader, GraphSONVersion,
    TaggedValue,
};
use rstest::rstest;

fn read(version: GraphSONVersion, text: &str) -> Result<GValue, Error> {
    GraphSONReader::new(version).read_object(text)
}

#[rstest]
#[case(r#"{"@type":"g:Int32"}"#)]
#[case(r#"{"@value":1}"#)]
#[case(r#"{"@type":"g:Int32","@value":1,"extra":true}"#)]
#[case(r#"{"@type":7,"@value":1}"#)]
fn test_malformed_envelopes(#[case] text: &str) {
    let err = read(GraphSONVersion::V3, text).unwrap_err();
    assert!(
        matches!(err, Error::MalformedEnvelope { .. }),
        "Expected MalformedEnvelope, got {:?}",
        err
    );
}

#[test]
fn test_envelope_keys_are_plain_under_v1() {
    let value = read(GraphSONVersion::V1, r#"{"@type":"g:Int32","@value":1}"#).unwrap();
    assert_eq!(
        value,
        GValue::map([("@type", GValue::from("g:Int32")), ("@value", GValue::Int32(1))])
    );
}

#[test]
fn test_unknown_tag() {
    let err = read(GraphSONVersion::V3, r#"[1,{"@type":"g:Nope","@value":{}}]"#).unwrap_err();
    match err {
        Error::UnknownTypeTag { tag, version, path } => {
            assert_eq!(tag, "g:Nope");
            assert_eq!(version, GraphSONVersion::V3);
            assert_eq!(path, "$[1]");
        }
        other => panic!("Expected UnknownTypeTag, got {:?}", other),
    }
}

#[rstest]
#[case(r#"{"@type":"g:Int32","@value":"one"}"#, "g:Int32")]
#[case(r#"{"@type":"g:Int32","@value":5000000000}"#, "g:Int32")]
#[case(r#"{"@type":"g:UUID","@value":"not-a-uuid"}"#, "g:UUID")]
#[case(r#"{"@type":"gx:Char","@value":"ab"}"#, "gx:Char")]
#[case(r#"{"@type":"g:Bytecode","@value":{"steps":[]}}"#, "g:Bytecode")]
#[case(r#"{"@type":"g:Bytecode","@value":{"step":[[]]}}"#, "g:Bytecode")]
#[case(r#"{"@type":"g:Vertex","@value":{"label":"person"}}"#, "g:Vertex")]
#[case(r#"{"@type":"g:SubgraphStrategy","@value":[]}"#, "g:SubgraphStrategy")]
fn test_type_mismatch(#[case] text: &str, #[case] expected_tag: &str) {
    let err = read(GraphSONVersion::V3, text).unwrap_err();
    match err {
        Error::TypeMismatch { tag, .. } => assert_eq!(tag, expected_tag),
        other => panic!("Expected TypeMismatch, got {:?}", other),
    }
}

#[test]
fn test_mismatch_path_points_into_nested_bytecode() {
    let text = r#"{"@type":"g:SubgraphStrategy","@value":{"vertices":{"@type":"g:Bytecode","@value":{"step":[["has",{"@type":"g:Int32","@value":"x"}]]}}}}"#;
    let err = read(GraphSONVersion::V2, text).unwrap_err();
    assert_eq!(
        err.path(),
        Some("$<g:SubgraphStrategy>.vertices<g:Bytecode>.step[0][1]<g:Int32>")
    );
}

#[test]
fn test_recursion_limit_while_reading_json() {
    let text = format!("{}{}", "[".repeat(30), "]".repeat(30));
    let reader = GraphSONReader::new(GraphSONVersion::V2).with_options(DecoderOptions {
        max_depth: 10,
        ..DecoderOptions::default()
    });
    let err = reader.read_object(&text).unwrap_err();
    assert!(matches!(err, Error::RecursionLimitExceeded { limit: 10, .. }));
}

#[test]
fn test_recursion_limit_while_parsing_tagged_text() {
    let text = format!("{}{}", "[".repeat(60), "]".repeat(60));
    let err = TaggedValue::parse(&text, false, 10).unwrap_err();
    assert!(matches!(err, Error::RecursionLimitExceeded { limit: 10, .. }));
}

#[rstest]
#[case(200)]
#[case(5000)]
fn test_deep_text_hits_recursion_limit_not_json_error(#[case] levels: usize) {
    let text = format!("{}{}", "[".repeat(levels), "]".repeat(levels));
    let err = read(GraphSONVersion::V3, &text).unwrap_err();
    assert!(
        matches!(err, Error::RecursionLimitExceeded { limit, .. } if limit == DEFAULT_MAX_DEPTH),
        "Expected RecursionLimitExceeded, got {:?}",
        err
    );
}

#[test]
fn test_configured_depth_beyond_json_parser_default() {
    let text = format!("{}{}", "[".repeat(150), "]".repeat(150));
    let reader = GraphSONReader::new(GraphSONVersion::V3).with_options(DecoderOptions {
        max_depth: 200,
        ..DecoderOptions::default()
    });
    let mut value = reader.read_object(&text).unwrap();
    let mut levels = 0;
    while let GValue::List(mut items) = value {
        levels += 1;
        value = items.pop().unwrap_or(GValue::Null);
    }
    assert_eq!(levels, 150);
}

#[test]
fn test_invalid_json() {
    let err = read(GraphSONVersion::V3, "{not json").unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}
