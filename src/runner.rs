use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};

use crate::crawler::SiteCrawler;
use crate::fetcher::PageSource;
use crate::parser::ExtractOptions;
use crate::sheets::{self, ColumnMap, RowStore};

/// First sheet row holding data; row 1 is the header.
pub const FIRST_DATA_ROW: usize = 2;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub extract: ExtractOptions,
    pub columns: ColumnMap,
    /// 0-based index of the domain cell.
    pub domain_column: usize,
    /// Pause after each crawled domain.
    pub delay: Duration,
    /// 1-based sheet row to start from.
    pub start_row: usize,
    pub limit: Option<usize>,
    pub dry_run: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            extract: ExtractOptions::default(),
            columns: ColumnMap::default(),
            domain_column: 2,
            delay: Duration::from_secs(5),
            start_row: FIRST_DATA_ROW,
            limit: None,
            dry_run: false,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub rows: usize,
    pub crawled: usize,
    pub failed: usize,
    pub skipped: usize,
    pub cells_written: usize,
}

/// Crawl the domain of every data row and write findings back to the sheet.
///
/// A domain that fails is logged and the batch moves on; a failed sheet
/// write ends the run.
pub async fn process_rows(
    store: &dyn RowStore,
    source: &dyn PageSource,
    options: &RunOptions,
) -> Result<RunStats> {
    let rows = store.read_rows().await.context("Failed to read spreadsheet rows")?;
    let start = options.start_row.max(FIRST_DATA_ROW);
    let pending: Vec<(usize, Vec<String>)> = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| (i + 1, row))
        .filter(|(index, _)| *index >= start)
        .take(options.limit.unwrap_or(usize::MAX))
        .collect();

    let crawler = SiteCrawler::new(source, options.extract);
    let mut stats = RunStats::default();

    let pb = ProgressBar::new(pending.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    for (index, row) in pending {
        stats.rows += 1;
        pb.inc(1);

        let Some(domain) = row
            .get(options.domain_column)
            .map(|d| d.trim())
            .filter(|d| !d.is_empty())
        else {
            stats.skipped += 1;
            continue;
        };

        info!("Processing domain from row {}: {}", index, domain);
        let findings = match crawler.crawl(domain).await {
            Ok(findings) => findings,
            Err(e) => {
                error!("Error processing domain {} in row {}: {:#}", domain, index, e);
                stats.failed += 1;
                continue;
            }
        };
        stats.crawled += 1;

        let updates = sheets::plan_updates(index, &findings, &options.columns);
        if options.dry_run {
            for u in &updates {
                info!("[dry run] row {} col {} ({}) <- {}", u.row, u.column, u.field, u.value);
            }
        } else {
            stats.cells_written += sheets::write_updates(store, &updates)
                .await
                .with_context(|| format!("Failed to write results for row {index}"))?;
        }

        if !options.delay.is_zero() {
            tokio::time::sleep(options.delay).await;
        }
    }

    pb.finish_and_clear();
    info!(
        "Done: {} rows ({} crawled, {} failed, {} skipped), {} cells written",
        stats.rows, stats.crawled, stats.failed, stats.skipped, stats.cells_written
    );
    Ok(stats)
}

// ── Tests ──
