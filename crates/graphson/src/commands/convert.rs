//! Convert Command
//!
//! Decode a document under one GraphSON version and re-encode it under
//! another.

use graphson_core::{GraphSONConfig, GraphSONReader, GraphSONVersion, GraphSONWriter};
use starbase::AppResult;
use std::path::PathBuf;
use tracing::{debug, warn};

use super::{read_input, write_output};

/// Convert GraphSON text from `from` to `to`. Strategy configuration keys
/// dropped while reading are logged.
pub fn convert_text(
    text: &str,
    from: GraphSONVersion,
    to: GraphSONVersion,
    config: &GraphSONConfig,
) -> graphson_core::Result<String> {
    let reader = GraphSONReader::new(from).with_options(config.decoder_options());
    let outcome = reader.read_detailed(text)?;
    for ignored in &outcome.ignored_config_keys {
        warn!(
            strategy = %ignored.strategy,
            key = %ignored.key,
            path = %ignored.path,
            "dropped unknown strategy configuration key"
        );
    }
    debug!(%from, %to, "re-encoding document");
    GraphSONWriter::new(to)
        .with_max_depth(config.max_depth)
        .pretty(config.pretty)
        .write_object(&outcome.value)
}

/// Run the convert command.
///
/// `from` defaults to the configured version; `pretty` overrides the
/// configured setting when given.
pub fn run_convert(
    from: Option<GraphSONVersion>,
    to: GraphSONVersion,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    pretty: bool,
    config: &GraphSONConfig,
) -> AppResult {
    let from = from.unwrap_or(config.version);
    let config = GraphSONConfig {
        pretty: pretty || config.pretty,
        ..config.clone()
    };

    let text = match read_input(input.as_deref()) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("{:#}", e);
            return Ok(Some(1));
        }
    };

    let converted = match convert_text(&text, from, to, &config) {
        Ok(converted) => converted,
        Err(e) => {
            eprintln!("Conversion from {} to {} failed: {}", from, to, e);
            return Ok(Some(1));
        }
    };

    if let Err(e) = write_output(output.as_deref(), &converted) {
        eprintln!("{:#}", e);
        return Ok(Some(1));
    }
    Ok(None)
}
