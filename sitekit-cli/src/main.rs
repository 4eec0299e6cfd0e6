use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use url::Url;

use langswap::{Catalog, StaticDocument, Switcher, SwitcherConfig};
use precache::{
    BucketStore, CacheService, DiskStore, HttpFetcher, Manifest, ServiceConfig, create_client,
};

mod cli;
mod error;

use cli::{CliArgs, Command};
use error::AppError;

fn main() {
    if let Err(e) = bootstrap() {
        eprintln!("Error: {e}");
        // Log the full error for debugging
        error!(error = ?e, "Application failed");
        std::process::exit(1);
    }
}

#[tokio::main]
async fn bootstrap() -> Result<(), AppError> {
    // Parse command-line arguments
    let args = CliArgs::parse();

    // Setup logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| AppError::Initialization(e.to_string()))?;

    match args.command {
        Command::Warm {
            manifest,
            version,
            cache_dir,
            origin,
        } => warm(manifest, version, cache_dir, origin).await,
        Command::Fetch {
            request,
            version,
            cache_dir,
            origin,
            output,
        } => fetch(request, version, cache_dir, origin, output).await,
        Command::Status { version, cache_dir } => status(version, cache_dir).await,
        Command::Swap {
            catalog,
            page,
            lang,
            write,
        } => swap(catalog, page, lang, write),
        Command::Audit { catalog } => audit(catalog),
    }
}

/// Build a disk-backed cache service for the given generation.
fn disk_service(
    version: String,
    manifest: Manifest,
    cache_dir: PathBuf,
    origin: &str,
) -> Result<CacheService<DiskStore, HttpFetcher>, AppError> {
    let origin =
        Url::parse(origin).map_err(|e| AppError::InvalidInput(format!("origin: {e}")))?;

    let config = ServiceConfig::new(version, manifest).with_origin(origin);
    let client = create_client(&config)?;
    let fetcher = HttpFetcher::new(client, config.origin.clone());
    let store = DiskStore::new(cache_dir);

    Ok(CacheService::new(config, store, fetcher))
}

async fn warm(
    manifest_path: PathBuf,
    version: String,
    cache_dir: PathBuf,
    origin: String,
) -> Result<(), AppError> {
    let manifest = Manifest::from_json(&tokio::fs::read(&manifest_path).await?)
        .map_err(|e| AppError::InvalidInput(format!("manifest: {e}")))?;
    if manifest.is_empty() {
        return Err(AppError::InvalidInput("manifest has no URLs".to_owned()));
    }

    info!(version = %version, urls = manifest.len(), "warming cache generation");
    let mut service = disk_service(version, manifest, cache_dir, &origin)?;

    service.install().await?;
    let evicted = service.activate().await?;
    info!(bucket = %service.version(), evicted, "cache generation live");
    Ok(())
}

async fn fetch(
    request: String,
    version: String,
    cache_dir: PathBuf,
    origin: String,
    output: Option<PathBuf>,
) -> Result<(), AppError> {
    let mut service = disk_service(version, Manifest::default(), cache_dir, &origin)?;
    if !service.resume().await? {
        return Err(AppError::InvalidInput(format!(
            "no bucket named {} in the cache dir; run warm first",
            service.version()
        )));
    }

    let served = service.fetch(&request).await?;
    info!(
        source = ?served.source,
        status = served.response.status,
        bytes = served.response.len(),
        "request served"
    );

    match output {
        Some(path) => {
            tokio::fs::write(&path, &served.response.body).await?;
            info!(path = %path.display(), "body written");
        }
        None => std::io::stdout().write_all(&served.response.body)?,
    }
    Ok(())
}

async fn status(version: String, cache_dir: PathBuf) -> Result<(), AppError> {
    let store = DiskStore::new(cache_dir);
    let mut buckets = store.list().await?;
    buckets.sort();

    if buckets.is_empty() {
        info!("no cache buckets");
        return Ok(());
    }

    for name in &buckets {
        let entries = store.urls(name).await?;
        info!(
            bucket = %name,
            entries = entries.len(),
            stale = *name != version,
            "bucket"
        );
    }
    Ok(())
}

fn swap(
    catalog_path: PathBuf,
    page_path: PathBuf,
    lang: String,
    write: bool,
) -> Result<(), AppError> {
    let catalog = Catalog::from_json(&std::fs::read(&catalog_path)?)?;
    let mut document = StaticDocument::from_json(&std::fs::read(&page_path)?)
        .map_err(|e| AppError::InvalidInput(format!("page: {e}")))?;

    let mut codes: Vec<String> = catalog.languages().map(str::to_owned).collect();
    codes.sort_unstable();
    let config = SwitcherConfig::cycle(codes).with_default_language(lang.clone());

    let mut switcher = Switcher::new(catalog, config)?;
    let report = switcher.set_language(&lang, &mut document)?;
    info!(
        language = %report.language,
        applied = report.applied,
        missing = report.missing.len(),
        "swap complete"
    );

    let json = document
        .to_json()
        .map_err(|e| AppError::InvalidInput(format!("page: {e}")))?;
    if write {
        std::fs::write(&page_path, &json)?;
        info!(path = %page_path.display(), "page rewritten in place");
    } else {
        let mut stdout = std::io::stdout();
        stdout.write_all(&json)?;
        stdout.write_all(b"\n")?;
    }
    Ok(())
}

fn audit(catalog_path: PathBuf) -> Result<(), AppError> {
    let catalog = Catalog::from_json(&std::fs::read(&catalog_path)?)?;
    let findings = catalog.audit();

    if findings.is_empty() {
        info!("catalog keys are aligned across all languages");
        return Ok(());
    }

    for finding in &findings {
        warn!(key = %finding.key, missing_in = ?finding.missing_in, "missing translation");
    }
    info!(keys = findings.len(), "catalog audit found gaps");
    Ok(())
}
