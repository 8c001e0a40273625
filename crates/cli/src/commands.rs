use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDateTime};
use tracing::{error, info};

use linkmill_core::{Config, TIMESTAMP_FORMAT};
use linkmill_ingest::{collect_links, Fetcher};
use linkmill_schedule::{evaluate_service, ScheduleConfig, ServiceId};
use linkmill_storage::{rotate_if_large, S3Backend, StorageBackend, TsvExporter, TsvStore};

/// Group configured sources by service, preserving declaration order.
fn sources_by_service(config: &Config) -> Vec<(ServiceId, Vec<String>)> {
    let mut groups: Vec<(ServiceId, Vec<String>)> = Vec::new();
    for source in &config.fetch.sources {
        let service = ServiceId::new(source.service.clone());
        match groups.iter_mut().find(|(s, _)| *s == service) {
            Some((_, urls)) => urls.push(source.url.clone()),
            None => groups.push((service, vec![source.url.clone()])),
        }
    }
    groups
}

/// One evaluation pass over every configured service. A failing service is
/// logged and skipped; the remaining services still run.
pub async fn tick(config: &Config, schedule: &ScheduleConfig) -> Result<()> {
    let groups = sources_by_service(config);
    if groups.is_empty() {
        info!("no sources configured (LINKMILL_SOURCES is empty), nothing to do");
        return Ok(());
    }

    let now = Local::now().naive_local();
    let store = TsvStore::new(&config.storage.data_dir)?;
    let fetcher = Fetcher::new(&config.fetch)?;

    for (service, urls) in groups {
        let result = evaluate_service(&service, now, schedule);
        let Some(window) = result.window else {
            info!(service = %service, pattern = %result.pattern, "no trigger this tick");
            continue;
        };

        let (since, until) = window.format();
        info!(
            service = %service,
            pattern = %result.pattern,
            lookback_minutes = result.lookback_minutes,
            %since,
            %until,
            "trigger"
        );

        if let Err(e) = scrape_service(config, &store, &fetcher, &urls, window.until).await {
            error!(service = %service, error = %e, "scrape failed, continuing");
        }
    }

    Ok(())
}

async fn scrape_service(
    config: &Config,
    store: &TsvStore,
    fetcher: &Fetcher,
    urls: &[String],
    now: NaiveDateTime,
) -> Result<()> {
    let path = store.daily_path(now.date());
    let next_id = store.next_id(&path)?;
    let records = collect_links(fetcher, urls, next_id, now).await?;
    store.append(&path, &records)?;
    rotate_if_large(&path, config.storage.rotate_max_bytes())?;
    Ok(())
}

/// Dry run: print one JSON line per service, no fetching or writes.
pub fn plan(config: &Config, schedule: &ScheduleConfig, now_override: Option<&str>) -> Result<()> {
    let now = match now_override {
        Some(text) => NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
            .with_context(|| format!("--now must be {TIMESTAMP_FORMAT}, got `{text}`"))?,
        None => Local::now().naive_local(),
    };

    for (service, _) in sources_by_service(config) {
        let result = evaluate_service(&service, now, schedule);
        let formatted = result.window.map(|w| w.format());
        let line = serde_json::json!({
            "service": result.service.as_str(),
            "pattern": result.pattern,
            "triggered": result.triggered,
            "lookback_minutes": result.lookback_minutes,
            "since": formatted.as_ref().map(|(since, _)| since),
            "until": formatted.as_ref().map(|(_, until)| until),
        });
        println!("{line}");
    }

    Ok(())
}

/// Merge daily files into the combined file, rotating the old combined
/// file aside first when it has grown too large.
pub fn merge(config: &Config) -> Result<()> {
    let store = TsvStore::new(&config.storage.data_dir)?;
    let files = store.daily_files()?;
    if files.is_empty() {
        info!("no daily files to merge");
        return Ok(());
    }

    let dest = store.combined_path();
    rotate_if_large(&dest, config.storage.rotate_max_bytes())?;
    let rows = store.merge_dedup(&files, &dest)?;
    info!(rows, dest = %dest.display(), "merge complete");
    Ok(())
}

/// Upload daily and combined TSV files to S3.
pub async fn export(config: &Config) -> Result<()> {
    if !config.aws.is_configured() {
        bail!("S3 export requires S3_BUCKET (and AWS credentials) to be set");
    }

    let backend = StorageBackend::S3(S3Backend::new(&config.aws)?);
    let store = TsvStore::new(&config.storage.data_dir)?;

    let mut files = store.daily_files()?;
    let combined = store.combined_path();
    if combined.exists() {
        files.push(combined);
    }
    if files.is_empty() {
        info!("no TSV files to export");
        return Ok(());
    }

    let (uploaded, skipped) = TsvExporter::export_files(&backend, &files).await?;
    info!(uploaded, skipped, "export complete");
    Ok(())
}
