//! Validate Command
//!
//! Decode a document under one GraphSON version and report the outcome.

use graphson_core::{GraphSONConfig, GraphSONReader, GraphSONVersion, ReadOutcome};
use serde::Serialize;
use starbase::AppResult;
use std::path::PathBuf;

use super::{describe_input, read_input};

/// JSON output for validate command
#[derive(Debug, Serialize)]
pub struct ValidateResult {
    pub success: bool,
    pub input: String,
    pub version: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ValidateResult {
    fn success(input: &str, version: GraphSONVersion, outcome: &ReadOutcome) -> Self {
        Self {
            success: true,
            input: input.to_string(),
            version: version.to_string(),
            warnings: outcome
                .ignored_config_keys
                .iter()
                .map(|k| format!("ignored {} key '{}' at {}", k.strategy, k.key, k.path))
                .collect(),
            error: None,
            path: None,
        }
    }

    fn error(input: &str, version: GraphSONVersion, error: &graphson_core::Error) -> Self {
        Self {
            success: false,
            input: input.to_string(),
            version: version.to_string(),
            warnings: Vec::new(),
            error: Some(error.to_string()),
            path: error.path().map(str::to_string),
        }
    }
}

pub fn validate_text(
    text: &str,
    version: GraphSONVersion,
    config: &GraphSONConfig,
) -> graphson_core::Result<ReadOutcome> {
    GraphSONReader::new(version)
        .with_options(config.decoder_options())
        .read_detailed(text)
}

/// Run the validate command.
pub fn run_validate(
    version: Option<GraphSONVersion>,
    input: Option<PathBuf>,
    json: bool,
    config: &GraphSONConfig,
) -> AppResult {
    let version = version.unwrap_or(config.version);
    let input_str = describe_input(&input);

    let text = match read_input(input.as_deref()) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("{:#}", e);
            return Ok(Some(1));
        }
    };

    let result = match validate_text(&text, version, config) {
        Ok(outcome) => ValidateResult::success(&input_str, version, &outcome),
        Err(e) => ValidateResult::error(&input_str, version, &e),
    };

    if json {
        match serde_json::to_string_pretty(&result) {
            Ok(rendered) => println!("{}", rendered),
            Err(e) => {
                eprintln!("Failed to render result: {}", e);
                return Ok(Some(1));
            }
        }
    } else if result.success {
        for warning in &result.warnings {
            eprintln!("warning: {}", warning);
        }
        println!("{} is valid GraphSON {}", input_str, version);
    } else if let Some(error) = &result.error {
        eprintln!("{} is not valid GraphSON {}: {}", input_str, version, error);
    }

    Ok(if result.success { None } else { Some(1) })
}
