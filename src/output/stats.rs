//! Crawl statistics for console output

use crate::crawler::CrawlReport;
use crate::state::UnitState;
use std::fmt;

impl fmt::Display for CrawlReport {
    /// Plain-text crawl summary, as printed at the end of a run
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.total();

        writeln!(f, "=== Crawl Statistics ===\n")?;

        writeln!(f, "Overview:")?;
        writeln!(f, "  Identities crawled: {}", total)?;
        writeln!(f, "  Tokens recorded: {}", self.total_tokens())?;
        writeln!(f, "  Duration: {:.2}s", self.duration_seconds())?;
        if self.timed_out {
            writeln!(f, "  Deadline reached: outstanding units were cancelled")?;
        }
        writeln!(f)?;

        writeln!(f, "Units by State:")?;
        for state in UnitState::terminal_states() {
            let count = self.count(state);
            if count == 0 {
                continue;
            }
            writeln!(f, "  {}: {} ({:.1}%)", state, count, percentage(count, total))?;
        }
        writeln!(f)?;

        let unrecorded: Vec<_> = self
            .units
            .iter()
            .filter(|(_, unit)| unit.state != UnitState::Recorded)
            .collect();
        if !unrecorded.is_empty() {
            writeln!(f, "Unrecorded Identities ({}):", unrecorded.len())?;
            for (identity, unit) in unrecorded {
                match &unit.message {
                    Some(message) => writeln!(f, "  - {} [{}]: {}", identity, unit.state, message)?,
                    None => writeln!(f, "  - {} [{}]", identity, unit.state)?,
                }
            }
            writeln!(f)?;
        }

        let recorded = self.recorded();
        write!(
            f,
            "Success Rate: {:.1}% ({} / {} identities recorded)",
            percentage(recorded, total),
            recorded,
            total
        )
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total > 0 {
        (count as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

/// Prints crawl statistics to stdout
pub fn print_report(report: &CrawlReport) {
    println!("{}", report);
}
