use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use chatrelay::attachments::{self, ProcessedFileView, UploadedAttachment};
use chatrelay::chat::compose::attachment_block;
use chatrelay::config::Config;
use chatrelay::gateway;
use chatrelay::providers::OpenRouterProvider;

/// `chatrelay` - chat relay with attachment support.
#[derive(Parser, Debug)]
#[command(name = "chatrelay")]
#[command(version)]
#[command(about = "Relay chat conversations and their attachments to an LLM provider.")]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP gateway
    Serve {
        /// Host to bind (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Configuration helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Run local files through the attachment normalizer and print the
    /// block that would be appended to the message
    Inspect {
        /// Files to process, in order
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Print the processed files as JSON instead
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the JSON schema of config.toml
    Schema,
    /// Print the effective configuration as TOML
    Show,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "chatrelay", &mut std::io::stdout());
            Ok(())
        }
        Commands::Config { command } => match command {
            ConfigCommands::Schema => {
                let schema = Config::json_schema();
                println!("{}", serde_json::to_string_pretty(&schema)?);
                Ok(())
            }
            ConfigCommands::Show => {
                let mut config = load_config(cli.config.as_deref())?;
                if config.provider.api_key.is_some() {
                    config.provider.api_key = Some("***".into());
                }
                print!("{}", toml::to_string_pretty(&config)?);
                Ok(())
            }
        },
        Commands::Inspect { files, json } => {
            let config = load_config(cli.config.as_deref())?;
            inspect(&files, json, config.attachments.max_file_chars)
        }
        Commands::Serve { host, port } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(host) = host {
                config.gateway.host = host;
            }
            if let Some(port) = port {
                config.gateway.port = port;
            }
            let provider = OpenRouterProvider::new(&config.provider)?;
            gateway::serve(&config, Arc::new(provider)).await
        }
    }
}

fn load_config(path: Option<&str>) -> Result<Config> {
    Config::load(path).context("Failed to load configuration")
}

fn inspect(paths: &[PathBuf], json: bool, max_file_chars: usize) -> Result<()> {
    let mut uploads = Vec::with_capacity(paths.len());
    for path in paths {
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = attachments::extract::guess_mime_type(&name);
        uploads.push(UploadedAttachment::new(name, mime_type, data));
    }

    let processed = attachments::process_files(uploads);
    if json {
        let views: Vec<_> = processed.iter().map(ProcessedFileView::from).collect();
        println!("{}", serde_json::to_string_pretty(&views)?);
    } else {
        print!("{}", attachment_block(&processed, max_file_chars));
    }
    Ok(())
}
