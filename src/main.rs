use anyhow::Context;
use clap::Parser;
use craigslist_scraper::browser::BrowserSession;
use craigslist_scraper::config::Config;
use craigslist_scraper::fetch::RetryingSource;
use craigslist_scraper::progress::LogProgress;
use craigslist_scraper::table::{write_csv_path, FailurePolicy};
use craigslist_scraper::{Extractor, ItemSelection, SearchQuery, SellerType};
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config as LogConfig, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::{Path, PathBuf};

const LOG_CONFIG_PATH: &str = "log4rs.yml";

/// Scrape a craigslist vehicle search into a CSV table
#[derive(Parser, Debug)]
#[command(name = "craigslist_scraper", version)]
#[command(about = "Scrape a craigslist vehicle search into a CSV table", long_about = None)]
struct Args {
    /// Search keywords, e.g. "tesla model s"
    #[arg(short = 'q', long)]
    search_term: String,

    /// Seller type: all/owner/dealer (or cta/cto/ctd)
    #[arg(short = 't', long)]
    seller_type: Option<SellerType>,

    /// craigslist sub-site, e.g. sfbay
    #[arg(long)]
    site: Option<String>,

    /// Chrome/Chromium executable
    #[arg(short, long)]
    browser_path: Option<PathBuf>,

    /// Extract only this many listings
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Draw the listings at random (with replacement); needs --count
    #[arg(long, requires = "count")]
    random: bool,

    /// Seed for --random
    #[arg(long, requires = "random")]
    seed: Option<u64>,

    /// CSV output file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Leave failed listings out of the table instead of keeping a blank row
    #[arg(long)]
    exclude_failed: bool,

    /// Config file (default: ./config.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) -> anyhow::Result<()> {
    if !verbose && Path::new(LOG_CONFIG_PATH).exists() {
        return log4rs::init_file(LOG_CONFIG_PATH, Default::default());
    }

    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {h({l})} {t} - {m}{n}")))
        .build();
    let config = LogConfig::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))?;
    log4rs::init_config(config)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    let mut cfg = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    if let Some(site) = args.site {
        cfg.scrape.site = site;
    }
    if let Some(seller_type) = args.seller_type {
        cfg.scrape.seller_type = seller_type;
    }
    if let Some(path) = args.browser_path {
        cfg.browser.executable_path = Some(path);
    }
    if let Some(output) = args.output {
        cfg.scrape.output = output;
    }
    if args.exclude_failed {
        cfg.scrape.failure_policy = FailurePolicy::Exclude;
    }

    let query = SearchQuery::new(cfg.scrape.site.clone(), cfg.scrape.seller_type, args.search_term);
    log::info!(
        "Searching {} ({}) for {:?}",
        query.site(),
        query.seller_type(),
        query.search_term()
    );

    let session = BrowserSession::start(cfg.browser_config()).context("Failed to start browser")?;
    let source = RetryingSource::new(session, cfg.retry_policy());
    let extractor = Extractor::new(query, source)?;

    let selection = ItemSelection {
        n: args.count,
        random: args.random,
        seed: args.seed,
    };
    let mut progress = LogProgress::new();
    let table = extractor.get_all_item_info(&selection, cfg.scrape.failure_policy, &mut progress);

    write_csv_path(&table, &cfg.scrape.output)?;
    log::info!(
        "Wrote {} row(s) x {} column(s) to {}",
        table.len(),
        table.columns.len(),
        cfg.scrape.output.display()
    );

    Ok(())
}
