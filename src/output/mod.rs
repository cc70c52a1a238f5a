//! Output module for writing crawl results
//!
//! This module handles:
//! - Writing the exported graph as JSON
//! - Writing the per-identity crawl report as JSON
//! - Printing crawl statistics to the console

pub mod stats;

pub use stats::print_report;

use crate::config::OutputConfig;
use crate::crawler::{CrawlReport, ThreadCrawl};
use crate::ThreadwebError;
use std::path::Path;

/// Writes the crawl report as JSON
///
/// # Arguments
///
/// * `report` - The finished crawl report
/// * `path` - Destination file, replaced if it exists
/// * `pretty` - Pretty-print the JSON
pub fn write_report(report: &CrawlReport, path: &Path, pretty: bool) -> Result<(), ThreadwebError> {
    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    std::fs::write(path, json)?;

    tracing::info!("Crawl report written to {}", path.display());
    Ok(())
}

/// Writes every configured output of a finished crawl
///
/// The graph always goes to `graph-path`; the report only when
/// `report-path` is set.
pub fn write_outputs(crawl: &ThreadCrawl, config: &OutputConfig) -> Result<(), ThreadwebError> {
    if crawl.graph.is_empty() {
        tracing::warn!(
            "No edges reached min weight {}; writing an empty graph",
            config.min_weight
        );
    }
    crawl
        .graph
        .write_json(Path::new(&config.graph_path), config.pretty)?;

    if let Some(report_path) = &config.report_path {
        write_report(&crawl.report, Path::new(report_path), config.pretty)?;
    }

    Ok(())
}
