//! Quaymaster CLI - The Quaymaster Who Torture-Tests Your Registry
//!
//! Run duration-bounded probes against a registry's introspection API to
//! verify consistency and health under concurrent load.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use quaymaster::config::{Config, Suite};
use quaymaster::orchestrator;
use quaymaster::probes::PROBES;

/// Quaymaster - the quaymaster who torture-tests your registry
#[derive(Debug, Parser)]
#[command(name = "quaymaster")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run probes against a registry
    Run {
        /// Path to run configuration file
        #[arg(short, long)]
        config: Option<String>,

        /// Registry base URL
        #[arg(long)]
        url: Option<String>,

        /// Basic auth username
        #[arg(long)]
        username: Option<String>,

        /// Basic auth password
        #[arg(long)]
        password: Option<String>,

        /// Run duration in seconds
        #[arg(short, long)]
        duration: Option<u64>,

        /// Stress worker count
        #[arg(short, long)]
        workers: Option<usize>,

        /// Which optional probes to include
        #[arg(short, long, value_enum)]
        suite: Option<Suite>,
    },

    /// Generate a default configuration file
    Init {
        /// Output file path
        #[arg(short, long, default_value = "quaymaster.yaml")]
        output: String,
    },

    /// List available probes
    List,

    /// Validate a configuration file
    Validate {
        /// Path to configuration file
        #[arg(short, long, default_value = "quaymaster.yaml")]
        config: String,
    },
}

fn setup_logging(verbose: bool, json: bool) {
    let env_filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.json);

    match cli.command {
        Commands::Run {
            config,
            url,
            username,
            password,
            duration,
            workers,
            suite,
        } => {
            run_probes(
                config.as_deref(),
                url,
                username,
                password,
                duration,
                workers,
                suite,
            )
            .await
        }

        Commands::Init { output } => init_config(&output),

        Commands::List => {
            list_probes();
            Ok(())
        }

        Commands::Validate { config } => validate_config(&config),
    }
}

/// Run probes with the resolved configuration
#[allow(clippy::too_many_arguments)]
async fn run_probes(
    config_path: Option<&str>,
    url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    duration: Option<u64>,
    workers: Option<usize>,
    suite: Option<Suite>,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => {
            tracing::info!(config = %path, "Loading configuration");
            Config::from_file(path).with_context(|| format!("Failed to load config from {path}"))?
        }
        None => Config::default(),
    };

    // CLI flags win over the config file
    if let Some(url) = url {
        config.target.base_url = url;
    }
    if let Some(username) = username {
        config.target.username = Some(username);
    }
    if let Some(password) = password {
        config.target.password = Some(password);
    }
    if let Some(duration) = duration {
        config.run.duration = Duration::from_secs(duration);
    }
    if let Some(workers) = workers {
        config.run.workers = workers;
    }
    if let Some(suite) = suite {
        config.run.suite = suite;
    }

    tracing::info!(
        target = %config.target.base_url,
        suite = %config.run.suite,
        duration_secs = config.run.duration.as_secs(),
        "Target configured"
    );

    orchestrator::run(&config).await?;
    Ok(())
}

/// Generate a default configuration file
fn init_config(output: &str) -> Result<()> {
    let config = Config::default_config();
    let yaml = config.to_yaml().context("Failed to serialize config")?;

    std::fs::write(output, &yaml).with_context(|| format!("Failed to write config to {output}"))?;

    tracing::info!(path = %output, "Configuration file created");
    println!("Created {output}");
    println!();
    println!("Edit the file to configure your target, then run:");
    println!("  quaymaster run --config {output}");

    Ok(())
}

/// List available probes
fn list_probes() {
    println!("Available probes:");
    println!();

    for (name, probe) in PROBES.iter() {
        println!("  {name:15} - {}", probe.description());
    }

    println!();
    println!("Health and session sampling always run; select the rest with:");
    println!("  quaymaster run --suite monitor|consistency|stress|all");
}

/// Validate a configuration file
fn validate_config(config_path: &str) -> Result<()> {
    tracing::info!(config = %config_path, "Validating configuration");

    let config = Config::from_file(config_path)
        .with_context(|| format!("Failed to load config from {config_path}"))?;

    println!("Configuration is valid!");
    println!();
    println!("Target: {}", config.target.base_url);
    match &config.target.username {
        Some(username) => println!("Auth: basic ({username})"),
        None => println!("Auth: anonymous"),
    }
    println!();
    println!("Duration: {}s", config.run.duration.as_secs());
    println!("Workers: {}", config.run.workers);
    println!("Suite: {}", config.run.suite);

    if !config.probes.is_empty() {
        println!();
        println!("Probes configured: {}", config.probes.len());
        for (name, probe_config) in &config.probes {
            let status = if probe_config.enabled {
                "enabled"
            } else {
                "disabled"
            };
            println!("  - {name}: {status}");
        }
    }

    Ok(())
}
