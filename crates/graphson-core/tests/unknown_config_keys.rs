use graphson_core::{
    DecoderOptions, Error, GValue, GraphSONReader, GraphSONVersion, GraphSONWriter, Strategy,
    UnknownKeyPolicy,
};

const WITH_UNKNOWN_KEY: &str =
    r#"{"@type":"g:SubgraphStrategy","@value":{"colour":"red","edges":"x"}}"#;

#[test]
fn test_unknown_key_is_ignored_by_default() {
    let reader = GraphSONReader::new(GraphSONVersion::V3);
    let outcome = reader.read_detailed(WITH_UNKNOWN_KEY).unwrap();
    assert_eq!(
        outcome.value,
        GValue::Strategy(Strategy::subgraph().with("edges", "x"))
    );
    assert_eq!(outcome.ignored_config_keys.len(), 1);
    let ignored = &outcome.ignored_config_keys[0];
    assert_eq!(ignored.strategy, "SubgraphStrategy");
    assert_eq!(ignored.key, "colour");
    assert_eq!(ignored.path, "$<g:SubgraphStrategy>.colour");
}

#[test]
fn test_unknown_key_is_rejected_on_request() {
    let reader = GraphSONReader::new(GraphSONVersion::V3).with_options(DecoderOptions {
        unknown_config_keys: UnknownKeyPolicy::Reject,
        ..DecoderOptions::default()
    });
    let err = reader.read_object(WITH_UNKNOWN_KEY).unwrap_err();
    match err {
        Error::UnknownConfigurationKey {
            strategy,
            key,
            path,
        } => {
            assert_eq!(strategy, "SubgraphStrategy");
            assert_eq!(key, "colour");
            assert_eq!(path, "$<g:SubgraphStrategy>.colour");
        }
        other => panic!("Expected UnknownConfigurationKey, got {:?}", other),
    }
}

#[test]
fn test_open_strategy_accepts_any_key() {
    let reader = GraphSONReader::new(GraphSONVersion::V3).with_options(DecoderOptions {
        unknown_config_keys: UnknownKeyPolicy::Reject,
        ..DecoderOptions::default()
    });
    let value = reader
        .read_object(r#"{"@type":"g:OptionsStrategy","@value":{"anything":"goes"}}"#)
        .unwrap();
    assert_eq!(
        value,
        GValue::Strategy(Strategy::options().with("anything", "goes"))
    );
}

#[test]
fn test_unknown_key_cannot_be_written() {
    let strategy = Strategy::subgraph().with("colour", "red");
    let err = GraphSONWriter::new(GraphSONVersion::V3)
        .write_object(&strategy.into())
        .unwrap_err();
    match err {
        Error::UnsupportedValue { type_name, path } => {
            assert!(type_name.contains("colour"));
            assert_eq!(path, "$<g:SubgraphStrategy>");
        }
        other => panic!("Expected UnsupportedValue, got {:?}", other),
    }
}
