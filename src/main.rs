mod crawler;
mod fetcher;
mod logging;
mod parser;
mod runner;
mod settings;
mod sheets;

use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::crawler::SiteCrawler;
use crate::fetcher::HttpFetcher;
use crate::parser::patterns;
use crate::runner::RunOptions;
use crate::settings::Settings;
use crate::sheets::GoogleSheetsStore;

#[derive(Parser)]
#[command(
    name = "site_contacts",
    about = "Pull owner and contact details from business websites into a spreadsheet"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl every domain in the sheet and fill in the contact columns
    Run {
        /// Max rows to process (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Sheet row to start at (row 1 is the header)
        #[arg(long, default_value = "2")]
        start_row: usize,
        /// Seconds to pause after each domain (overrides settings)
        #[arg(long)]
        delay: Option<u64>,
        /// Log planned cell updates without writing them
        #[arg(long)]
        dry_run: bool,
    },
    /// Crawl a single domain and print what was found
    Site {
        domain: String,
    },
    /// Print the extraction rule table
    Patterns,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let t0 = Instant::now();

    let result = match cli.command {
        Commands::Run {
            limit,
            start_row,
            delay,
            dry_run,
        } => {
            let settings = load_settings()?;
            let sheet_id = settings
                .sheet_id
                .as_deref()
                .context("No spreadsheet configured: set SHEET_ID or CONTACTS_SHEET_ID")?;
            let store = GoogleSheetsStore::new(sheet_id, &settings.credentials_path)?;
            let fetcher = HttpFetcher::new(&settings.user_agent, settings.request_timeout())?;

            let options = RunOptions {
                extract: settings.extract_options(),
                columns: settings.columns.clone(),
                domain_column: settings.domain_column,
                delay: delay.map(Duration::from_secs).unwrap_or_else(|| settings.delay()),
                start_row,
                limit,
                dry_run,
            };
            info!("Pattern table v{}", patterns::PATTERN_VERSION);
            runner::process_rows(&store, &fetcher, &options).await?;
            Ok(())
        }
        Commands::Site { domain } => {
            let settings = load_settings()?;
            let fetcher = HttpFetcher::new(&settings.user_agent, settings.request_timeout())?;
            let crawler = SiteCrawler::new(&fetcher, settings.extract_options());
            let findings = crawler.crawl(&domain).await?;
            println!("{}", serde_json::to_string_pretty(&findings)?);
            Ok(())
        }
        Commands::Patterns => {
            print_patterns();
            Ok(())
        }
    };

    // stdout carries the `site` JSON
    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", format_duration(elapsed));
    }

    result
}

/// Settings and logging are only set up for commands that touch the network.
fn load_settings() -> anyhow::Result<Settings> {
    let settings = Settings::load()?;
    logging::init(&settings.log_styles);
    Ok(settings)
}

fn print_patterns() {
    println!("Pattern table v{}", patterns::PATTERN_VERSION);
    println!("\nOwner name (first match wins, case-insensitive):");
    for (i, p) in patterns::OWNER_NAME_PATTERNS.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, p);
    }
    println!("\nEmail (case-insensitive): {}", patterns::EMAIL_PATTERN);
    println!("Phone: {}", patterns::PHONE_PATTERN);
    println!("\nSocial links (first marker wins):");
    for platform in patterns::Platform::ALL {
        println!("  {:<10} {}", platform.as_str(), platform.marker());
    }
    println!("\nads.txt: domainowner=<name>, contact=<email>");
    println!("Guessed paths: {}", crawler::GUESSED_PATHS.join(" "));
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

// ── Tests ──
