//! Subcommand dispatch

use anyhow::{Context, Result};
use mealdeck_analytics::{
    filter_users, ingest, paginate, AnalyticsEngine, CollectionSource, DashboardReport,
    EngineSettings, LoadProgress, ReviewFilter,
};
use mealdeck_common::{init_logging, StoreClient};
use mealdeck_config::{validation::validate_log_level, Config, ConfigLoader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cli::{Args, Command, OutputFormat};
use crate::report;

/// Resolve the configuration for this invocation
pub fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => ConfigLoader::load().context("Failed to load configuration")?,
    };

    if let Some(level) = &args.log_level {
        validate_log_level(level).map_err(|_| {
            anyhow::anyhow!(
                "Invalid --log-level '{}': expected trace, debug, info, warn, error or target=level directives",
                level
            )
        })?;
        config.logging.level = level.clone();
    }

    Ok(config)
}

/// Run one admin command to completion
pub async fn run(args: Args) -> Result<()> {
    let config = resolve_config(&args)?;
    init_logging((&config.logging).into())?;
    debug!(store = %config.store.url, "Configuration loaded");

    let client = StoreClient::new((&config.store).into())?;
    let output = execute(&args.command, &config, &client).await?;
    print!("{}", output);

    Ok(())
}

/// Execute a command against a collection source and return what to print
pub async fn execute<S>(command: &Command, config: &Config, source: &S) -> Result<String>
where
    S: CollectionSource + Probe,
{
    match command {
        Command::Dashboard { format } => {
            let report = dashboard(config, source).await;
            match format {
                OutputFormat::Text => Ok(report::render_dashboard(&report)),
                OutputFormat::Json => {
                    let mut json = serde_json::to_string_pretty(&report)?;
                    json.push('\n');
                    Ok(json)
                }
            }
        }
        Command::Reviews {
            search,
            rating,
            page,
        } => {
            // same ingestion check as the dashboard, so counts agree
            let load = ingest(source.fetch_all_reviews().await?);
            let reviews = load.records();

            let mut filter = ReviewFilter::new();
            if let Some(search) = search {
                filter = filter.with_search(search.as_str());
            }
            if let Some(rating) = rating {
                filter = filter.with_rating(*rating);
            }

            let matching = filter.apply(reviews);
            let page = paginate(&matching, *page, config.analytics.reviews_per_page);
            Ok(report::render_reviews(&page, reviews))
        }
        Command::Users { search } => {
            let users = source.fetch_all_users().await?;
            let listed = filter_users(&users, search.as_deref().unwrap_or_default());
            Ok(report::render_users(&listed))
        }
        Command::Check => {
            if source.probe().await {
                Ok(format!("Data store at {} is reachable\n", config.store.url))
            } else {
                anyhow::bail!("Data store at {} is not reachable", config.store.url)
            }
        }
    }
}

async fn dashboard<S>(config: &Config, source: &S) -> DashboardReport
where
    S: CollectionSource + ?Sized,
{
    let engine = AnalyticsEngine::new(EngineSettings::from(&config.analytics));
    let settings = engine.settings();
    debug!(top_n = settings.top_n, orphan_policy = ?settings.orphan_policy, "Building dashboard");
    let (tx, mut rx) = mpsc::unbounded_channel();

    let progress = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                LoadProgress::Collection {
                    collection,
                    state,
                    completed,
                    total,
                } => {
                    info!(%collection, ?state, "Loaded {}/{} collections", completed, total);
                }
                LoadProgress::Complete { loaded, failed } => {
                    if failed > 0 {
                        warn!(loaded, failed, "Some collections could not be loaded");
                    } else {
                        info!(loaded, "All collections loaded");
                    }
                }
            }
        }
    });

    let report = engine.run(source, Some(tx)).await;
    if let Err(e) = progress.await {
        warn!("Progress reporter stopped early: {}", e);
    }

    report
}

/// Reachability check for a collection source
#[async_trait::async_trait]
pub trait Probe {
    async fn probe(&self) -> bool;
}

#[async_trait::async_trait]
impl Probe for StoreClient {
    async fn probe(&self) -> bool {
        self.test_connection().await
    }
}
