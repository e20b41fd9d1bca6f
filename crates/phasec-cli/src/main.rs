mod compile_cmd;
mod config;
mod config_cmd;
mod fill_cmd;
mod init_cmd;
mod interactive;
#[cfg(test)]
mod test_util;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use phasec_core::{Provider, Workspace};

use config::{CliOverrides, PhasecConfig};

#[derive(Parser)]
#[command(
    name = "phasec",
    version,
    about = "Schema-driven project planning: spec in, phased plan out"
)]
struct Cli {
    /// Workspace directory (overrides PHASEC_DIR env var and the config file)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Describe a project interactively and write spec.json
    Init,
    /// Validate a spec and write an empty plan skeleton
    Compile {
        /// Spec file to compile (default: <dir>/spec.json)
        path: Option<PathBuf>,
    },
    /// Fill every phase of the plan using a language model
    Fill {
        /// Backend to use: anthropic or openai (overrides PHASEC_PROVIDER)
        #[arg(long)]
        provider: Option<Provider>,
        /// Model name (overrides PHASEC_MODEL)
        #[arg(long)]
        model: Option<String>,
    },
    /// Config file management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write a config file with every setting at its default
    Init {
        /// Provider whose defaults to write
        #[arg(long, default_value = "anthropic")]
        provider: Provider,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Print the resolved configuration
    Show,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Init => {
            let resolved = PhasecConfig::resolve(&CliOverrides {
                dir: cli.dir,
                ..Default::default()
            })?;
            init_cmd::run_init(&Workspace::new(resolved.workspace_dir))
        }
        Commands::Compile { path } => {
            let resolved = PhasecConfig::resolve(&CliOverrides {
                dir: cli.dir,
                ..Default::default()
            })?;
            compile_cmd::run_compile(&Workspace::new(resolved.workspace_dir), path.as_deref())
        }
        Commands::Fill { provider, model } => {
            let resolved = PhasecConfig::resolve(&CliOverrides {
                dir: cli.dir,
                provider,
                model,
            })?;
            fill_cmd::run_fill(
                &Workspace::new(resolved.workspace_dir),
                &resolved.generator,
            )
            .await
        }
        Commands::Config { command } => {
            let overrides = CliOverrides {
                dir: cli.dir,
                ..Default::default()
            };
            config_cmd::run_config_command(command, &overrides)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
