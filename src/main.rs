use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use uatu_stockcheck::config::DEFAULT_CONFIG_PATH;
use uatu_stockcheck::core::JsonStateStore;
use uatu_stockcheck::plugins::{EmailNotifier, LogNotifier, Notifier};
use uatu_stockcheck::{AppConfig, Checker, FailureReporter, HttpFetcher, RunOutcome, SourceRegistry};

/// Checks retailer pages once and emails when listing counts change.
#[derive(Parser, Debug)]
#[command(name = "uatu-stockcheck", version, about)]
struct Cli {
    /// TOML file describing sources and notification settings
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Override the configured state file
    #[arg(long)]
    state_file: Option<String>,

    /// Log alerts instead of emailing them
    #[arg(long)]
    dry_run: bool,

    #[arg(short, long)]
    verbose: bool,
}

async fn check_once(
    config: &AppConfig,
    state_file: &str,
    notifier: Arc<dyn Notifier>,
) -> uatu_stockcheck::Result<RunOutcome> {
    let registry = SourceRegistry::from_config(&config.sources)?;
    let fetcher = HttpFetcher::new(&config.fetch)?;
    let store = JsonStateStore::new(state_file);

    Checker::new(registry, Arc::new(fetcher), notifier, Arc::new(store))
        .with_subject(config.subject.clone())
        .run()
        .await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("uatu_stockcheck={}", level).parse()?),
        )
        .init();

    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;

    let notifier: Arc<dyn Notifier> = match (&config.smtp, cli.dry_run) {
        (_, true) => Arc::new(LogNotifier::new()),
        (Some(smtp), false) => Arc::new(EmailNotifier::new(smtp.clone())?),
        (None, false) => {
            anyhow::bail!("No [smtp] section configured; pass --dry-run to log alerts instead")
        }
    };

    let state_file = cli.state_file.unwrap_or_else(|| config.state_file.clone());
    let reporter =
        FailureReporter::new(Arc::clone(&notifier)).with_subject(config.failure_subject.clone());

    let outcome = reporter
        .watch(check_once(&config, &state_file, Arc::clone(&notifier)))
        .await?;

    match outcome {
        RunOutcome::Unchanged { results } => {
            info!("Checked {} source(s), no changes", results.len());
        }
        RunOutcome::Alerted { results, digest } => {
            info!(
                "Checked {} source(s), alerted on {}",
                results.len(),
                digest.len()
            );
        }
    }

    Ok(())
}
