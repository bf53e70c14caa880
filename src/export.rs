// Bet filtering, console report rendering, CSV export.
//
// Filtering and the summary work on full-precision values; numbers are
// rounded to one decimal only where they leave the program (report text,
// CSV cells).

use crate::engine::{SlateProjection, SlateReport};
use crate::model::edge::{CONFIDENCE_THRESHOLD_PCT, EDGE_THRESHOLD_PCT};
use std::cmp::Ordering;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::info;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error writing {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

// ---------------------------------------------------------------------------
// Bet filtering
// ---------------------------------------------------------------------------

/// Restrict the filter to one side of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BetDirection {
    Over,
    Under,
}

/// Qualification cutoffs for the picks list.
#[derive(Debug, Clone, Copy)]
pub struct FilterThresholds {
    /// Minimum |edge| in percent; the comparison is strict, so an edge of
    /// exactly this value does not qualify.
    pub min_edge_pct: f64,
    /// Minimum confidence in percent (inclusive).
    pub min_confidence_pct: f64,
}

impl Default for FilterThresholds {
    fn default() -> Self {
        FilterThresholds {
            min_edge_pct: EDGE_THRESHOLD_PCT,
            min_confidence_pct: CONFIDENCE_THRESHOLD_PCT,
        }
    }
}

/// Select the slate rows worth betting, strongest edge first.
///
/// A row qualifies when its confidence meets the threshold and its edge
/// strictly clears the edge threshold on the requested side (either side
/// when `direction` is `None`).
pub fn filter_bets<'a>(
    rows: &'a [SlateProjection],
    thresholds: &FilterThresholds,
    direction: Option<BetDirection>,
) -> Vec<&'a SlateProjection> {
    let mut bets: Vec<&SlateProjection> = rows
        .iter()
        .filter(|r| r.edge.confidence_pct >= thresholds.min_confidence_pct)
        .filter(|r| match direction {
            Some(BetDirection::Over) => r.edge.edge_pct > thresholds.min_edge_pct,
            Some(BetDirection::Under) => r.edge.edge_pct < -thresholds.min_edge_pct,
            None => r.edge.edge_pct.abs() > thresholds.min_edge_pct,
        })
        .collect();
    bets.sort_by(|a, b| {
        b.edge
            .edge_pct
            .abs()
            .partial_cmp(&a.edge.edge_pct.abs())
            .unwrap_or(Ordering::Equal)
    });
    bets
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Aggregate view of the qualifying bets. `avg_edge_pct` is the signed mean,
/// so a slate of offsetting overs and unders averages toward zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BetSummary {
    pub total_bets: usize,
    pub avg_edge_pct: f64,
    pub avg_confidence_pct: f64,
    pub over_bets: usize,
    pub under_bets: usize,
}

pub fn summarize_bets(bets: &[&SlateProjection]) -> BetSummary {
    if bets.is_empty() {
        return BetSummary {
            total_bets: 0,
            avg_edge_pct: 0.0,
            avg_confidence_pct: 0.0,
            over_bets: 0,
            under_bets: 0,
        };
    }

    let total = bets.len();
    let avg_edge_pct = bets.iter().map(|b| b.edge.edge_pct).sum::<f64>() / total as f64;
    let avg_confidence_pct =
        bets.iter().map(|b| b.edge.confidence_pct).sum::<f64>() / total as f64;
    let over_bets = bets.iter().filter(|b| b.edge.edge_pct > 0.0).count();

    BetSummary {
        total_bets: total,
        avg_edge_pct,
        avg_confidence_pct,
        over_bets,
        under_bets: total - over_bets,
    }
}

// ---------------------------------------------------------------------------
// Console report
// ---------------------------------------------------------------------------

/// Render the slate report for stdout.
pub fn render_report(
    report: &SlateReport,
    bets: &[&SlateProjection],
    summary: &BetSummary,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Top Betting Opportunities for {}", report.date);
    let _ = writeln!(out, "{}", "=".repeat(80));

    if bets.is_empty() {
        let _ = writeln!(
            out,
            "\nNo qualifying bets on this slate ({} starts scored, {} skipped).",
            report.rows.len(),
            report.skips.len()
        );
        return out;
    }

    let _ = writeln!(out, "\nSummary:");
    let _ = writeln!(out, "Total Bets: {}", summary.total_bets);
    let _ = writeln!(out, "Average Edge: {:.1}%", summary.avg_edge_pct);
    let _ = writeln!(out, "Average Confidence: {:.1}%", summary.avg_confidence_pct);
    let _ = writeln!(out, "Over Bets: {}", summary.over_bets);
    let _ = writeln!(out, "Under Bets: {}", summary.under_bets);

    let _ = writeln!(out, "\nDetailed Picks:");
    for bet in bets {
        let _ = writeln!(out, "\n{} ({} vs {})", bet.pitcher, bet.team, bet.opponent);
        let _ = writeln!(
            out,
            "Projected Ks: {:.1} | Book Line: {:.1} ({})",
            bet.projected_strikeouts, bet.line.line, bet.line.book
        );
        let _ = writeln!(
            out,
            "Edge: {:.1}% | Confidence: {:.1}%",
            bet.edge.edge_pct, bet.edge.confidence_pct
        );
        let _ = writeln!(out, "Recommendation: {}", bet.edge.recommendation.label());
        if let Some(time) = &bet.game_time {
            let _ = writeln!(out, "Game Time: {}", time);
        }
        let _ = writeln!(out, "{}", "-".repeat(40));
    }

    out
}

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

const CSV_HEADER: [&str; 10] = [
    "pitcher",
    "team",
    "opponent",
    "game_time",
    "home_away",
    "projected_k",
    "book_line",
    "edge_pct",
    "confidence_pct",
    "recommendation",
];

/// Write every scored row (not just qualifying bets) to
/// `<dir>/strikeout_props_<date>.csv`, strongest edge first. Returns the
/// path written.
pub fn export_csv(report: &SlateReport, dir: &Path) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir).map_err(|e| ExportError::Io {
        path: dir.display().to_string(),
        source: e,
    })?;
    let path = dir.join(format!("strikeout_props_{}.csv", report.date));

    let file = std::fs::File::create(&path).map_err(|e| ExportError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let mut writer = csv::Writer::from_writer(file);

    let csv_err = |e: csv::Error| ExportError::Csv {
        path: path.display().to_string(),
        source: e,
    };

    writer.write_record(CSV_HEADER).map_err(csv_err)?;

    let mut rows: Vec<&SlateProjection> = report.rows.iter().collect();
    rows.sort_by(|a, b| {
        b.edge
            .edge_pct
            .abs()
            .partial_cmp(&a.edge.edge_pct.abs())
            .unwrap_or(Ordering::Equal)
    });

    for row in rows {
        let projected = format!("{:.1}", row.projected_strikeouts);
        let book_line = format!("{:.1}", row.line.line);
        let edge_pct = format!("{:.1}", row.edge.edge_pct);
        let confidence_pct = format!("{:.1}", row.edge.confidence_pct);
        writer
            .write_record([
                row.pitcher.as_str(),
                row.team.as_str(),
                row.opponent.as_str(),
                row.game_time.as_deref().unwrap_or(""),
                if row.is_home { "Home" } else { "Away" },
                projected.as_str(),
                book_line.as_str(),
                edge_pct.as_str(),
                confidence_pct.as_str(),
                row.edge.recommendation.label(),
            ])
            .map_err(csv_err)?;
    }

    writer.flush().map_err(|e| ExportError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    info!("exported {} rows to {}", report.rows.len(), path.display());
    Ok(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
