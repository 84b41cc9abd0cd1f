use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use solstice_config::{
    ConfigLoadError, ConfigLoader, ConfigSource, LoggingSettings, init_tracing,
};

#[derive(Parser)]
#[command(
    name = "solstice-config",
    about = "Inspect and validate Solstice gallery configuration"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the resolved configuration
    Show {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, value_enum, default_value = "toml")]
        format: OutputFormat,
    },
    /// Validate configuration and report warnings
    Check {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Toml,
    Json,
}

fn loader(config: Option<PathBuf>) -> ConfigLoader {
    match config {
        Some(path) => ConfigLoader::new().with_config_path(path),
        None => ConfigLoader::new(),
    }
}

fn describe(source: &ConfigSource) -> String {
    match source {
        ConfigSource::Default => "built-in defaults".to_string(),
        ConfigSource::EnvInline => "SOLSTICE_CONFIG_JSON".to_string(),
        ConfigSource::EnvPath(path) => {
            format!("{} (SOLSTICE_CONFIG_PATH)", path.display())
        }
        ConfigSource::File(path) => path.display().to_string(),
    }
}

fn main() -> Result<ExitCode> {
    init_tracing(&LoggingSettings {
        filter: "warn".to_string(),
    });

    let cli = Cli::parse();
    match cli.command {
        Command::Show { config, format } => {
            let load = loader(config)
                .load()
                .context("failed to load configuration")?;
            let rendered = match format {
                OutputFormat::Toml => toml::to_string_pretty(&load.config)
                    .context("failed to render configuration as TOML")?,
                OutputFormat::Json => serde_json::to_string_pretty(&load.config)
                    .context("failed to render configuration as JSON")?,
            };
            eprintln!("source: {}", describe(&load.metadata.source));
            println!("{rendered}");
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { config } => match loader(config).load() {
            Ok(load) => {
                println!("config source: {}", describe(&load.metadata.source));
                if load.metadata.env_file_loaded {
                    println!(".env merged");
                }
                for key in &load.metadata.overrides {
                    println!("override: {key}");
                }
                if load.warnings.is_empty() {
                    println!("configuration OK");
                } else {
                    for warning in load.warnings.iter() {
                        println!("warning: {warning}");
                    }
                }
                Ok(ExitCode::SUCCESS)
            }
            Err(ConfigLoadError::GuardRail(err)) => {
                eprintln!("guard rail violated: {err}");
                Ok(ExitCode::FAILURE)
            }
            Err(err) => Err(err).context("failed to load configuration"),
        },
    }
}
