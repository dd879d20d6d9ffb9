use graphson_core::{Bytecode, GValue, GraphSONReader, GraphSONVersion, GraphSONWriter, Strategy};
use rstest::rstest;

fn has_marko() -> Bytecode {
    Bytecode::new().with_step("has", ["name".into(), "marko".into()])
}

#[rstest]
#[case(GraphSONVersion::V2)]
#[case(GraphSONVersion::V3)]
fn test_empty_subgraph_strategy(#[case] version: GraphSONVersion) {
    let json = GraphSONWriter::new(version)
        .write_object(&Strategy::subgraph().into())
        .unwrap();
    assert_eq!(json, r#"{"@type":"g:SubgraphStrategy","@value":{}}"#);
}

#[rstest]
#[case(GraphSONVersion::V2)]
#[case(GraphSONVersion::V3)]
fn test_subgraph_strategy_with_vertices(#[case] version: GraphSONVersion) {
    let strategy = Strategy::subgraph().with("vertices", has_marko());
    let json = GraphSONWriter::new(version)
        .write_object(&strategy.into())
        .unwrap();
    assert_eq!(
        json,
        r#"{"@type":"g:SubgraphStrategy","@value":{"vertices":{"@type":"g:Bytecode","@value":{"step":[["has","name","marko"]]}}}}"#
    );
}

#[test]
fn test_v1_strategy_is_plain_mapping() {
    let writer = GraphSONWriter::new(GraphSONVersion::V1);
    assert_eq!(writer.write_object(&Strategy::subgraph().into()).unwrap(), "{}");

    let strategy = Strategy::subgraph().with("vertices", has_marko());
    assert_eq!(
        writer.write_object(&strategy.into()).unwrap(),
        r#"{"vertices":{"step":[["has","name","marko"]]}}"#
    );
}

#[rstest]
#[case(GraphSONVersion::V2)]
#[case(GraphSONVersion::V3)]
fn test_strategy_round_trip(#[case] version: GraphSONVersion) {
    let strategy = GValue::from(
        Strategy::subgraph()
            .with("vertices", has_marko())
            .with("checkAdjacentVertices", false),
    );
    let json = GraphSONWriter::new(version).write_object(&strategy).unwrap();
    let read = GraphSONReader::new(version).read_object(&json).unwrap();
    assert_eq!(read, strategy);
}

#[rstest]
#[case(GraphSONVersion::V2)]
#[case(GraphSONVersion::V3)]
fn test_configuration_keeps_insertion_order(#[case] version: GraphSONVersion) {
    let strategy = Strategy::partition()
        .with("writePartition", "a")
        .with("partitionKey", "_partition");
    let json = GraphSONWriter::new(version)
        .write_object(&strategy.into())
        .unwrap();
    assert_eq!(
        json,
        r#"{"@type":"g:PartitionStrategy","@value":{"writePartition":"a","partitionKey":"_partition"}}"#
    );
}

#[test]
fn test_default_valued_keys_are_omitted() {
    let strategy = Strategy::partition()
        .with("partitionKey", "_partition")
        .with("includeMetaProperties", false);
    let json = GraphSONWriter::new(GraphSONVersion::V3)
        .write_object(&strategy.into())
        .unwrap();
    assert_eq!(
        json,
        r#"{"@type":"g:PartitionStrategy","@value":{"partitionKey":"_partition"}}"#
    );
}

#[test]
fn test_strategy_inside_bytecode() {
    let bytecode = Bytecode::new()
        .with_source("withStrategies", [Strategy::read_only().into()])
        .with_step("V", []);
    let json = GraphSONWriter::new(GraphSONVersion::V3)
        .write_object(&bytecode.into())
        .unwrap();
    assert_eq!(
        json,
        r#"{"@type":"g:Bytecode","@value":{"source":[["withStrategies",{"@type":"g:ReadOnlyStrategy","@value":{}}]],"step":[["V"]]}}"#
    );
}
