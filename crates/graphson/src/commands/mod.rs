pub mod convert;
pub mod tags;
pub mod validate;

pub use convert::*;
pub use tags::*;
pub use validate::*;

use anyhow::Context;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Read the document from `input`, or stdin when absent.
pub(crate) fn read_input(input: Option<&Path>) -> anyhow::Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

/// Write `content` to `output`, or stdout when absent.
pub(crate) fn write_output(output: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{}", content);
            Ok(())
        }
    }
}

pub(crate) fn describe_input(input: &Option<PathBuf>) -> String {
    input
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<stdin>".to_string())
}
