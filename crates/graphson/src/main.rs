use clap::{Parser, Subcommand};
use graphson::commands::{run_convert, run_tags, run_validate};
use graphson::logging::init_tracing;
use graphson_core::{GraphSONConfig, GraphSONVersion};
use miette::{IntoDiagnostic, WrapErr};
use starbase::{App, AppResult, AppSession};
use std::path::PathBuf;

/// GraphSON CLI - convert and validate GraphSON documents
#[derive(Parser)]
#[command(name = "graphson")]
#[command(about = "Convert and validate GraphSON v1/v2/v3 documents", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (TOML with a [graphson] table)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Subcommand)]
enum Commands {
    /// Re-encode a document under another GraphSON version
    Convert {
        /// Version of the input (defaults to the configured version)
        #[arg(long)]
        from: Option<GraphSONVersion>,
        /// Version to write
        #[arg(long)]
        to: GraphSONVersion,
        /// Input file (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
    /// Check that a document decodes under a GraphSON version
    Validate {
        /// Version to validate against (defaults to the configured version)
        #[arg(long)]
        version: Option<GraphSONVersion>,
        /// Input file (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the type tags registered for a GraphSON version
    Tags {
        #[arg(long, default_value_t = GraphSONVersion::V3)]
        version: GraphSONVersion,
    },
}

/// Application session for GraphSON CLI
#[derive(Clone)]
struct GraphSONSession {
    command: Commands,
    config: GraphSONConfig,
}

#[async_trait::async_trait]
impl AppSession for GraphSONSession {
    async fn execute(&mut self) -> AppResult {
        match &self.command {
            Commands::Convert {
                from,
                to,
                input,
                output,
                pretty,
            } => run_convert(
                *from,
                *to,
                input.clone(),
                output.clone(),
                *pretty,
                &self.config,
            ),
            Commands::Validate {
                version,
                input,
                json,
            } => run_validate(*version, input.clone(), *json, &self.config),
            Commands::Tags { version } => run_tags(*version),
        }
    }
}

#[tokio::main]
async fn main() -> starbase::MainResult {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => GraphSONConfig::load(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to load {}", path.display()))?,
        None => GraphSONConfig::default(),
    };

    let session = GraphSONSession {
        command: cli.command,
        config,
    };

    let exit_code = App::default()
        .run(
            session,
            |mut session| async move { session.execute().await },
        )
        .await?;

    Ok(std::process::ExitCode::from(exit_code))
}
