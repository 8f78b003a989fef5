// 📋 Report Model - Final shaped snapshot handed to the rendering sink
// Pure assembly and sorting; all numbers were computed by the aggregator

use crate::aggregate::AggregateOutput;
use crate::ingest::Record;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// REPORT TYPES
// ============================================================================

/// One summary line per matched show.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRow {
    pub show_key: String,
    pub total_a: BigDecimal,
    pub total_b: BigDecimal,
    pub difference: BigDecimal,
    pub difference_pct: BigDecimal,
    pub match_quality: u8,
}

/// One (show, episode, song) line across all matched shows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownRow {
    pub show_key: String,
    pub episode: String,
    pub song: String,
    pub network: String,
    pub amount_a: BigDecimal,
    pub amount_b: BigDecimal,
}

/// Immutable result snapshot for one reconciliation run.
///
/// `summary` is sorted by difference descending (stable: equal differences
/// keep the aggregator's show order). The rendering sink reads this and
/// nothing else.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportModel {
    pub summary: Vec<SummaryRow>,
    pub episode_breakdown: Vec<BreakdownRow>,
    pub unmatched_a_detail: Vec<Record>,
    pub unmatched_b_detail: Vec<Record>,
}

// ============================================================================
// BUILDER
// ============================================================================

/// Shape aggregator output into the final report model.
pub fn build_report(output: AggregateOutput) -> ReportModel {
    let mut summary = Vec::with_capacity(output.matched.len());
    let mut episode_breakdown = Vec::new();

    for show in output.matched {
        summary.push(SummaryRow {
            show_key: show.show_key.clone(),
            total_a: show.total_a,
            total_b: show.total_b,
            difference: show.difference,
            difference_pct: show.difference_pct,
            match_quality: show.match_quality,
        });

        for row in show.per_episode {
            episode_breakdown.push(BreakdownRow {
                show_key: show.show_key.clone(),
                episode: row.episode,
                song: row.song,
                network: row.network,
                amount_a: row.amount_a,
                amount_b: row.amount_b,
            });
        }
    }

    // Vec::sort_by is stable, so ties keep aggregator order
    summary.sort_by(|a, b| b.difference.cmp(&a.difference));

    ReportModel {
        summary,
        episode_breakdown,
        unmatched_a_detail: output.unmatched_a_detail,
        unmatched_b_detail: output.unmatched_b_detail,
    }
}

// ============================================================================
// TESTS
// ============================================================================
