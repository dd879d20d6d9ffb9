use graphson_core::{
    Binding, Bytecode, DEFAULT_MAX_DEPTH, EnumKind, Error, GValue, GraphSONReader,
    GraphSONVersion, GraphSONWriter, Lambda, Predicate, Strategy, TraversalEnum,
};
use rstest::rstest;

fn round_trip(version: GraphSONVersion, value: &GValue) -> GValue {
    let json = GraphSONWriter::new(version).write_object(value).unwrap();
    GraphSONReader::new(version).read_object(&json).unwrap()
}

fn direction(literal: &str) -> GValue {
    TraversalEnum::new(EnumKind::Direction, literal).unwrap().into()
}

#[rstest]
#[case(GraphSONVersion::V2)]
#[case(GraphSONVersion::V3)]
fn test_nested_bytecode_round_trip(#[case] version: GraphSONVersion) {
    let inner = Bytecode::new().with_step("out", ["knows".into()]).with_step("has", [
        "age".into(),
        Predicate::gt(30).into(),
    ]);
    let bytecode = Bytecode::new()
        .with_source("withStrategies", [Strategy::subgraph()
            .with("vertices", Bytecode::new().with_step("hasLabel", ["person".into()]))
            .into()])
        .with_step("V", [])
        .with_step("where", [inner.into()])
        .with_step("to", [direction("OUT")])
        .with_step("values", ["name".into()]);
    let value = GValue::from(bytecode);
    assert_eq!(round_trip(version, &value), value);
}

/// `levels` bytecodes, each but the innermost holding the next in a `where`.
fn nested_where(levels: usize) -> GValue {
    let mut bytecode = Bytecode::new().with_step("V", []);
    for _ in 1..levels {
        bytecode = Bytecode::new().with_step("where", [bytecode.into()]);
    }
    bytecode.into()
}

#[rstest]
#[case(GraphSONVersion::V2, DEFAULT_MAX_DEPTH - 1)]
#[case(GraphSONVersion::V3, DEFAULT_MAX_DEPTH - 1)]
#[case(GraphSONVersion::V3, DEFAULT_MAX_DEPTH)]
fn test_deep_bytecode_written_is_readable(
    #[case] version: GraphSONVersion,
    #[case] levels: usize,
) {
    let value = nested_where(levels);
    assert_eq!(round_trip(version, &value), value);
}

#[test]
fn test_bytecode_past_depth_limit_is_not_written() {
    let err = GraphSONWriter::new(GraphSONVersion::V3)
        .write_object(&nested_where(DEFAULT_MAX_DEPTH + 1))
        .unwrap_err();
    assert!(
        matches!(err, Error::RecursionLimitExceeded { limit, .. } if limit == DEFAULT_MAX_DEPTH),
        "Expected RecursionLimitExceeded, got {:?}",
        err
    );
}

#[rstest]
#[case(GraphSONVersion::V2)]
#[case(GraphSONVersion::V3)]
fn test_program_carriers_round_trip(#[case] version: GraphSONVersion) {
    let bytecode = Bytecode::new()
        .with_step("V", [Binding::new("x", 1).into()])
        .with_step("map", [Lambda::new("it.get().value('name')").into()])
        .with_step("has", [
            "name".into(),
            GValue::TextP(Predicate::starting_with("ma").or(Predicate::containing("rk"))),
        ])
        .with_step("has", ["age".into(), Predicate::within([29.into(), 32.into()]).into()]);
    let value = GValue::from(bytecode);
    assert_eq!(round_trip(version, &value), value);
}

#[test]
fn test_instruction_arguments_are_tagged_in_place() {
    let bytecode = Bytecode::new().with_step("limit", [GValue::Int64(5)]);
    let json = GraphSONWriter::new(GraphSONVersion::V2)
        .write_object(&bytecode.into())
        .unwrap();
    assert_eq!(
        json,
        r#"{"@type":"g:Bytecode","@value":{"step":[["limit",{"@type":"g:Int64","@value":5}]]}}"#
    );
}

#[test]
fn test_v1_bytecode_needs_a_hint() {
    let bytecode = GValue::from(Bytecode::new().with_step("V", []).with_step("out", ["knows".into()]));
    let json = GraphSONWriter::new(GraphSONVersion::V1)
        .write_object(&bytecode)
        .unwrap();
    assert_eq!(json, r#"{"step":[["V"],["out","knows"]]}"#);

    let reader = GraphSONReader::new(GraphSONVersion::V1);
    assert!(matches!(reader.read_object(&json).unwrap(), GValue::Map(_)));
    assert_eq!(reader.read_as("g:Bytecode", &json).unwrap(), bytecode);
}
