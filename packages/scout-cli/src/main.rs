use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use draft_scout::{
    ClientConfig, CrawlReport, FsPageCache, JsonStore, PageCache, Pipeline, PlayerStore,
    RateLimitedClient,
};

#[derive(Parser)]
#[command(name = "scout", version, about = "Crawl draft prospects and their college stats")]
struct Cli {
    /// Directory raw pages are cached under
    #[arg(long, global = true, default_value = "cache")]
    cache_dir: PathBuf,

    /// JSON file enriched players are written to
    #[arg(long, global = true, default_value = "data/players.json")]
    out: PathBuf,

    /// Write to this SQLite database instead of the JSON file
    #[cfg(feature = "sqlite")]
    #[arg(long, global = true)]
    sqlite: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Crawl one year's draft-eligible prospects
    Prospects {
        #[arg(long)]
        year: i32,
    },

    /// Crawl draft histories for a range of years (inclusive)
    Draft {
        #[arg(long)]
        from: i32,

        /// Last year to crawl; defaults to `--from`
        #[arg(long)]
        to: Option<i32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,draft_scout=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let cli = Cli::parse();

    let config = ClientConfig::from_env().context("Failed to load client configuration")?;
    tracing::info!(
        cooldown_secs = config.cooldown.as_secs(),
        max_requests = config.max_requests,
        "Configuration loaded"
    );

    let client = RateLimitedClient::from_config(config).context("Failed to build HTTP client")?;
    let cache = FsPageCache::new(&cli.cache_dir);

    let reports = match sqlite_url(&cli) {
        Some(url) => crawl_into_sqlite(&cli.command, client, cache, &url).await?,
        None => {
            let store = JsonStore::new(&cli.out);
            run(&cli.command, Pipeline::new(client, cache, store)).await?
        }
    };
    report(reports)
}

#[cfg(feature = "sqlite")]
fn sqlite_url(cli: &Cli) -> Option<String> {
    cli.sqlite.clone()
}

#[cfg(not(feature = "sqlite"))]
fn sqlite_url(_cli: &Cli) -> Option<String> {
    None
}

#[cfg(feature = "sqlite")]
async fn crawl_into_sqlite(
    command: &Command,
    client: RateLimitedClient,
    cache: FsPageCache,
    url: &str,
) -> Result<Vec<CrawlReport>> {
    let store = draft_scout::SqliteStore::new(url)
        .await
        .with_context(|| format!("Failed to open database {url}"))?;
    run(command, Pipeline::new(client, cache, store)).await
}

#[cfg(not(feature = "sqlite"))]
async fn crawl_into_sqlite(
    _command: &Command,
    _client: RateLimitedClient,
    _cache: FsPageCache,
    _url: &str,
) -> Result<Vec<CrawlReport>> {
    bail!("this build has no SQLite support")
}

async fn run<K, S>(
    command: &Command,
    mut pipeline: Pipeline<RateLimitedClient, K, S>,
) -> Result<Vec<CrawlReport>>
where
    K: PageCache,
    S: PlayerStore,
{
    match *command {
        Command::Prospects { year } => Ok(vec![pipeline
            .crawl_prospects(year)
            .await
            .with_context(|| format!("Prospect crawl for {year} failed"))?]),
        Command::Draft { from, to } => {
            let to = to.unwrap_or(from);
            if to < from {
                bail!("--to ({to}) must not be before --from ({from})");
            }
            Ok(pipeline.crawl_draft_years(from..=to).await)
        }
    }
}

fn report(reports: Vec<CrawlReport>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&reports)?);

    let failed: usize = reports.iter().map(|r| r.failed.len()).sum();
    if failed > 0 {
        tracing::warn!(failed, "Some athletes could not be enriched");
    }
    Ok(())
}
