use crate::cli::args::{Cli, Commands};
use crate::collectors::{CurrentCollector, HistoricalCollector};
use crate::config::{CollectMode, CollectorConfig};
use crate::error::{CollectorError, Result};
use crate::utils::progress::ProgressReporter;
use tracing::{info, Level};

pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Effective configuration: file and environment, then command line overrides
pub fn resolve_config(cli: &Cli) -> Result<CollectorConfig> {
    let mut config = CollectorConfig::load(cli.config.as_deref())?;

    if let Some(max_workers) = cli.max_workers {
        config = config.with_max_workers(max_workers);
    }

    if let Some(Commands::Historical {
        years, collect_all, ..
    }) = &cli.command
    {
        if !years.is_empty() {
            config = config.with_years(years.clone());
        }
        if *collect_all {
            config = config.with_collect_mode(CollectMode::All);
        }
    }

    config.validated()
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;
    let quiet = cli.quiet;

    match cli.command.unwrap_or_default() {
        Commands::Current { locations } => {
            info!("Fetching current data for {} locations", locations.len());

            let values = tokio::task::spawn_blocking(move || {
                let progress = ProgressReporter::new_spinner("Fetching current data...", quiet);
                let collector = CurrentCollector::from_config(&config)?;
                let values = collector.get_with_progress(&locations, Some(&progress))?;
                progress.finish_with_message(&format!("Fetched {} stations", values.len()));
                Ok::<_, CollectorError>(values)
            })
            .await??;

            println!("{}", serde_json::to_string_pretty(&values)?);
        }

        Commands::Historical { locations, .. } => {
            info!(
                "Fetching historical data for {} locations, years {:?}",
                locations.len(),
                config.years
            );

            let results = tokio::task::spawn_blocking(move || {
                let progress =
                    ProgressReporter::new_spinner("Searching historical archives...", quiet);
                let collector = HistoricalCollector::from_config(config)?;
                let results = collector.get_with_progress(&locations, Some(&progress))?;
                let found = results.iter().filter(|r| r.is_some()).count();
                progress.finish_with_message(&format!(
                    "Found data for {}/{} locations",
                    found,
                    results.len()
                ));
                Ok::<_, CollectorError>(results)
            })
            .await??;

            println!("{}", serde_json::to_string_pretty(&results)?);
        }
    }

    Ok(())
}
