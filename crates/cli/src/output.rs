//! Terminal rendering of position stats.

use lp_stats_domain::{FeesToClaim, PositionStatsEntry};
use prettytable::{Table, row};

/// Builds a table with one row per position.
pub fn stats_table(entries: &[PositionStatsEntry]) -> Table {
    let mut table = Table::new();
    table.set_titles(row![
        "ID",
        "Closed",
        "Deposited USD",
        "Collected A",
        "Collected B",
        "Collected USD",
        "Fees A",
        "Fees B",
        "Error"
    ]);

    for entry in entries {
        match entry {
            PositionStatsEntry::Report(report) => {
                let (fees_a, fees_b) = match &report.fees_to_claim {
                    FeesToClaim::Quoted(q) => (q.fees_a.to_string(), q.fees_b.to_string()),
                    FeesToClaim::Unavailable {} => ("-".to_string(), "-".to_string()),
                };
                table.add_row(row![
                    report.id,
                    report.closed,
                    report.deposited_usd_total,
                    report.collected_fees.token_a,
                    report.collected_fees.token_b,
                    report.collected_fees.in_usd,
                    fees_a,
                    fees_b,
                    report.fees_error.as_deref().unwrap_or("")
                ]);
            }
            PositionStatsEntry::Failed(failed) => {
                table.add_row(row![failed.id, "", "", "", "", "", "", "", failed.error]);
            }
        }
    }
    table
}
