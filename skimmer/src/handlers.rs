use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use skimmer_core::config::{ServiceConfig, expand_path};
use skimmer_core::data::SqliteStore;
use skimmer_core::error::Result as StoreResult;
use skimmer_core::report::{
    ReportFormat, generate_json_report, generate_page_report, generate_stats_report, save_report,
};
use skimmer_core::service::{CacheMode, ExtractionService, service_info};
use skimmer_core::store::{KeyValueStore, MemoryStore};
use skimmer_scanner::HttpFetcher;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;
use url::Url;

/// Installs the stderr log subscriber. Debug output with `verbose`,
/// warnings only otherwise.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    // Ignore a second install attempt (tests call handlers repeatedly)
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Parse a single line as a URL, trying to add http:// if needed
pub fn parse_url_line(line: &str) -> Option<Url> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    // Try to parse as-is
    if let Ok(url) = Url::parse(line)
        && url.has_host()
    {
        return Some(url);
    }

    // Try adding http://
    Url::parse(&format!("http://{}", line))
        .ok()
        .filter(|url| url.has_host())
}

/// Splits a target into its scheme and the scheme-less remainder used as
/// the page path, e.g. `https://example.com/blog` → (`https`, `example.com/blog`).
pub fn split_target(target: &str) -> Result<(String, String), String> {
    let url = parse_url_line(target).ok_or_else(|| format!("Invalid target URL '{}'", target))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(format!("Unsupported scheme '{}' in '{}'", url.scheme(), target));
    }

    let rest = url
        .as_str()
        .strip_prefix(&format!("{}://", url.scheme()))
        .unwrap_or(url.as_str());
    let rest = rest.split('#').next().unwrap_or(rest);
    Ok((url.scheme().to_string(), rest.to_string()))
}

/// Store chosen for a run: the on-disk cache, or memory when persistence is
/// disabled or the database cannot be opened.
pub enum CacheBackend {
    Sqlite(SqliteStore),
    Memory(MemoryStore),
}

impl CacheBackend {
    pub fn open(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return CacheBackend::Memory(MemoryStore::new());
        };
        match SqliteStore::open(path) {
            Ok(store) => CacheBackend::Sqlite(store),
            Err(e) => {
                warn!(
                    "Could not open cache at {}: {}; using an in-memory cache",
                    path.display(),
                    e
                );
                CacheBackend::Memory(MemoryStore::new())
            }
        }
    }

    pub fn close(self) {
        if let CacheBackend::Sqlite(store) = self
            && let Err(e) = store.close()
        {
            warn!("Failed to close cache database: {}", e);
        }
    }
}

impl KeyValueStore for CacheBackend {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        match self {
            CacheBackend::Sqlite(store) => store.get(key),
            CacheBackend::Memory(store) => store.get(key),
        }
    }

    fn set(&self, key: &str, value: &[u8], ttl_minutes: u64) -> StoreResult<()> {
        match self {
            CacheBackend::Sqlite(store) => store.set(key, value, ttl_minutes),
            CacheBackend::Memory(store) => store.set(key, value, ttl_minutes),
        }
    }
}

fn spinner(quiet: bool, message: String) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message);
    pb
}

fn report_format(args: &ArgMatches) -> ReportFormat {
    args.get_one::<String>("format")
        .and_then(|format| ReportFormat::from_str(format))
        .unwrap_or(ReportFormat::Json)
}

fn target(args: &ArgMatches) -> Result<(String, String)> {
    let target = args
        .get_one::<String>("TARGET")
        .ok_or_else(|| anyhow!("A target URL is required"))?;
    split_target(target).map_err(|e| anyhow!(e))
}

fn config_from(args: &ArgMatches) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    if let Some(timeout) = args.get_one::<u64>("timeout") {
        config = config.with_timeout(*timeout);
    }
    if let Ok(Some(store)) = args.try_get_one::<String>("store") {
        config = config.with_store_path(store);
    }
    config
}

/// Prints `content` or writes it to the `--output` file.
fn emit(args: &ArgMatches, content: &str) -> Result<()> {
    match args.get_one::<PathBuf>("output") {
        Some(path) => {
            save_report(content, path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("{} Saved to {}", "✓".green().bold(), path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

pub fn handle_init(args: &ArgMatches) -> Result<()> {
    let db_path = args
        .get_one::<String>("PATH")
        .map(|path| expand_path(path))
        .ok_or_else(|| anyhow!("A database path is required"))?;
    let force = args.get_flag("force");

    if SqliteStore::exists(&db_path) {
        if !force {
            println!(
                "{} Cache already exists at {} (use --force to recreate it)",
                "→".blue(),
                db_path.display().to_string().bright_white()
            );
            return Ok(());
        }
        SqliteStore::drop(&db_path)
            .with_context(|| format!("Failed to delete {}", db_path.display()))?;
        println!("{} Existing cache removed", "✓".green().bold());
    }

    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("Failed to create cache at {}", db_path.display()))?;
    store.close().context("Failed to close the new cache database")?;

    println!(
        "{} Cache initialized: {}",
        "✓".green().bold(),
        db_path.display().to_string().bright_white()
    );
    Ok(())
}

pub async fn handle_blog(args: &ArgMatches, quiet: bool) -> Result<()> {
    let (scheme, path) = target(args)?;
    let config = config_from(args);
    let mode = if args.get_flag("refresh") {
        CacheMode::Refresh
    } else {
        CacheMode::Cached
    };
    let store_path = (!args.get_flag("no-store")).then_some(config.store_path.as_path());

    let fetcher = HttpFetcher::with_options(&config.fetch).context("Failed to build HTTP client")?;
    let backend = CacheBackend::open(store_path);
    let service = ExtractionService::new(fetcher, backend).with_ttl_minutes(config.ttl_minutes);

    let pb = spinner(quiet, format!("Reading {}://{}", scheme, path));
    let (page, cached) = service.read_blog_page(&path, &scheme, mode).await;
    pb.finish_and_clear();
    service.into_store().close();

    if !quiet {
        let cache_type = if cached { "store".green() } else { "-".dimmed() };
        eprintln!("cached: {}", cache_type);
    }

    let content = match report_format(args) {
        ReportFormat::Json => generate_json_report(&page)?,
        ReportFormat::Text => generate_page_report(&page),
    };
    emit(args, &content)
}

pub async fn handle_discover(args: &ArgMatches, quiet: bool) -> Result<()> {
    let (scheme, path) = target(args)?;
    let config = config_from(args);

    let fetcher = HttpFetcher::with_options(&config.fetch).context("Failed to build HTTP client")?;
    let service = ExtractionService::new(fetcher, MemoryStore::new());

    let pb = spinner(quiet, format!("Analyzing {}://{}", scheme, path));
    let stats = service.discover_page(&path, &scheme).await;
    pb.finish_and_clear();

    let content = match report_format(args) {
        ReportFormat::Json => generate_json_report(&stats)?,
        ReportFormat::Text => generate_stats_report(&stats),
    };
    emit(args, &content)
}

pub fn handle_info() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&service_info())?);
    Ok(())
}
