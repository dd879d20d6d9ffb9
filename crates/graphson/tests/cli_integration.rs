use graphson::commands::{convert_text, registered_tags, run_convert, run_validate, validate_text};
use graphson_core::{GraphSONConfig, GraphSONVersion, UnknownKeyPolicy};

const V2_STRATEGY: &str = r#"{"@type":"g:SubgraphStrategy","@value":{"vertices":{"@type":"g:Bytecode","@value":{"step":[["has","age",{"@type":"g:Int32","@value":30}]]}}}}"#;

#[test]
fn test_convert_v2_to_v1() -> anyhow::Result<()> {
    let converted = convert_text(
        V2_STRATEGY,
        GraphSONVersion::V2,
        GraphSONVersion::V1,
        &GraphSONConfig::default(),
    )?;
    assert_eq!(converted, r#"{"vertices":{"step":[["has","age",30]]}}"#);
    Ok(())
}

#[test]
fn test_convert_v2_to_v3_is_identical_for_shared_tags() -> anyhow::Result<()> {
    let converted = convert_text(
        V2_STRATEGY,
        GraphSONVersion::V2,
        GraphSONVersion::V3,
        &GraphSONConfig::default(),
    )?;
    assert_eq!(converted, V2_STRATEGY);
    Ok(())
}

#[test]
fn test_run_convert_writes_output_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("in.json");
    let output = dir.path().join("out.json");
    std::fs::write(&input, V2_STRATEGY)?;

    let code = run_convert(
        Some(GraphSONVersion::V2),
        GraphSONVersion::V1,
        Some(input),
        Some(output.clone()),
        false,
        &GraphSONConfig::default(),
    )
    .unwrap();
    assert_eq!(code, None);
    assert_eq!(
        std::fs::read_to_string(&output)?,
        r#"{"vertices":{"step":[["has","age",30]]}}"#
    );
    Ok(())
}

#[test]
fn test_run_convert_missing_input_fails() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let code = run_convert(
        None,
        GraphSONVersion::V3,
        Some(dir.path().join("absent.json")),
        None,
        false,
        &GraphSONConfig::default(),
    )
    .unwrap();
    assert_eq!(code, Some(1));
    Ok(())
}

#[test]
fn test_validate_reports_path() {
    let text = r#"{"@type":"g:SubgraphStrategy","@value":{"vertices":{"@type":"g:List","@value":[]}}}"#;
    let err = validate_text(text, GraphSONVersion::V2, &GraphSONConfig::default()).unwrap_err();
    assert_eq!(err.path(), Some("$<g:SubgraphStrategy>.vertices"));
    assert!(validate_text(text, GraphSONVersion::V3, &GraphSONConfig::default()).is_ok());
}

#[test]
fn test_validate_honours_configured_policy() {
    let text = r#"{"@type":"g:SubgraphStrategy","@value":{"colour":"red"}}"#;
    let lenient = validate_text(text, GraphSONVersion::V3, &GraphSONConfig::default()).unwrap();
    assert_eq!(lenient.ignored_config_keys.len(), 1);

    let strict = GraphSONConfig {
        unknown_config_keys: UnknownKeyPolicy::Reject,
        ..GraphSONConfig::default()
    };
    assert!(validate_text(text, GraphSONVersion::V3, &strict).is_err());
}

#[test]
fn test_run_validate_exit_codes() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let good = dir.path().join("good.json");
    let bad = dir.path().join("bad.json");
    std::fs::write(&good, V2_STRATEGY)?;
    std::fs::write(&bad, r#"{"@type":"g:Nope","@value":1}"#)?;

    let config = GraphSONConfig::default();
    assert_eq!(run_validate(Some(GraphSONVersion::V2), Some(good), true, &config).unwrap(), None);
    assert_eq!(
        run_validate(Some(GraphSONVersion::V2), Some(bad), true, &config).unwrap(),
        Some(1)
    );
    Ok(())
}

#[test]
fn test_config_file_drives_defaults() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("graphson.toml");
    std::fs::write(&path, "[graphson]\nversion = \"v2\"\npretty = true\n")?;
    let config = GraphSONConfig::load(&path)?;

    let converted = convert_text(V2_STRATEGY, config.version, GraphSONVersion::V3, &config)?;
    assert!(converted.contains('\n'));
    Ok(())
}

#[test]
fn test_registered_tags() {
    let v2 = registered_tags(GraphSONVersion::V2);
    assert!(v2.iter().any(|t| t == "g:Int32"));
    assert!(!v2.iter().any(|t| t == "g:List"));
    assert!(registered_tags(GraphSONVersion::V3).iter().any(|t| t == "gx:Instant"));
}
