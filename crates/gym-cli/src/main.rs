// Gym management console
//
// Design Decision: Use clap derive for argument parsing, as the screens it replaces were forms.
// Design Decision: Support text/json/yaml output formats for scripting.
// Design Decision: One FileKeyValueStore per invocation, injected into every domain API.

mod commands;
mod output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use gym_core::{FileKeyValueStore, Gym, GymConfig, GymError, ValidationErrors};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gym")]
#[command(about = "Gym management console - schedule classes and manage the member roster")]
#[command(version)]
pub struct Cli {
    /// JSON file holding the local store
    #[arg(long, env = "GYM_STORAGE_PATH")]
    pub storage: Option<PathBuf>,

    /// Output format
    #[arg(long, short, default_value = "text", value_parser = ["text", "json", "yaml"])]
    pub output: String,

    /// Do not seed empty collections with sample data
    #[arg(long)]
    pub no_seed: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check credentials at the login gate
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Schedule and manage classes
    Classes {
        #[command(subcommand)]
        command: commands::classes::ClassesCommand,
    },

    /// Manage the member roster
    Members {
        #[command(subcommand)]
        command: commands::members::MembersCommand,
    },

    /// Print a lookup list (states, cities, districts, payment-plans, class-types, class-statuses)
    Lookups {
        /// Collection name
        collection: String,
    },

    /// Populate empty collections with sample data
    Seed,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gym_cli=info,gym_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Err(err) => match err.downcast_ref::<GymError>() {
            Some(GymError::Validation(errors)) => {
                eprintln!("{}", format_validation(errors));
                std::process::exit(2);
            }
            _ => Err(err),
        },
        ok => ok,
    }
}

/// One `field: message` line per rejected field
fn format_validation(errors: &ValidationErrors) -> String {
    let mut lines = vec!["Validation failed:".to_string()];
    lines.extend(
        errors
            .errors()
            .iter()
            .map(|e| format!("  {}: {}", e.field, e.message)),
    );
    lines.join("\n")
}

async fn run(cli: Cli) -> Result<()> {
    let config = GymConfig::from_env()?;
    let output_format = output::OutputFormat::from_str(&cli.output);

    let path = cli.storage.clone().unwrap_or_else(|| config.storage_path());
    let kv = FileKeyValueStore::open(&path)
        .with_context(|| format!("Failed to open storage: {}", path.display()))?;
    let gym = Gym::new(Arc::new(kv));
    tracing::debug!(path = %path.display(), "Storage ready");

    let seeder = gym.seeder().with_rng_seed(config.seed_rng);
    if let Commands::Seed = cli.command {
        return commands::seed::run(&seeder, output_format).await;
    }
    if !cli.no_seed && config.seed_on_start() {
        seeder.seed_if_empty(Utc::now()).await?;
    }

    match cli.command {
        Commands::Login { email, password } => {
            commands::login::run(output_format, email, password)
        }
        Commands::Classes { command } => commands::classes::run(command, &gym, output_format).await,
        Commands::Members { command } => commands::members::run(command, &gym, output_format).await,
        Commands::Lookups { collection } => {
            commands::lookups::run(&gym, output_format, &collection).await
        }
        Commands::Seed => Ok(()),
    }
}
