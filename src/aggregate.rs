// 💰 Aggregation Engine - Per-show and per-episode financial facts
// Sums are exact BigDecimal arithmetic; rounding happens only at rendering

use crate::ingest::Record;
use crate::matcher::MatchResult;
use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// AGGREGATE TYPES
// ============================================================================

/// Grouping key inside one matched show: (episode-or-program name, song title)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EpisodeKey {
    pub episode: String,
    pub song: String,
}

/// One (episode, song) row with per-source sums.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeRow {
    pub episode: String,
    pub song: String,
    /// First non-empty network/service seen for this key
    pub network: String,
    pub amount_a: BigDecimal,
    pub amount_b: BigDecimal,
}

/// Financial facts for one matched show.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowAggregate {
    pub show_key: String,
    pub match_quality: u8,
    pub total_a: BigDecimal,
    pub total_b: BigDecimal,
    /// |total_a - total_b|
    pub difference: BigDecimal,
    /// difference / max(total_a, total_b), 0 when both totals are 0
    pub difference_pct: BigDecimal,
    /// Rows in first-seen order (Source A rows first, then Source B rows
    /// that introduced new keys)
    pub per_episode: Vec<EpisodeRow>,
}

/// Aggregator output: matched shows in the matcher's (lexicographic)
/// iteration order, plus the unmatched records projected verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateOutput {
    pub matched: Vec<ShowAggregate>,
    pub unmatched_a_detail: Vec<Record>,
    pub unmatched_b_detail: Vec<Record>,
}

// ============================================================================
// AGGREGATION ENGINE
// ============================================================================

pub struct AggregationEngine;

impl AggregationEngine {
    pub fn new() -> Self {
        AggregationEngine
    }

    /// Compute per-show totals, per-episode sums, and discrepancy figures
    /// for every entry of `match_result`.
    ///
    /// A matched show with zero records on one side is valid: that side's
    /// total is 0 and the difference equals the other side's total.
    pub fn aggregate(
        &self,
        match_result: &MatchResult,
        records_a: &[Record],
        records_b: &[Record],
    ) -> AggregateOutput {
        let mut output = AggregateOutput::default();

        for matched in match_result.matched.values() {
            let side_a: Vec<&Record> = records_a
                .iter()
                .filter(|r| r.show_key == matched.show_key)
                .collect();
            let side_b: Vec<&Record> = records_b
                .iter()
                .filter(|r| r.show_key == matched.key_b)
                .collect();

            output.matched.push(aggregate_show(
                &matched.show_key,
                matched.match_quality,
                &side_a,
                &side_b,
            ));
        }

        for key in &match_result.unmatched_a {
            for record in records_a.iter().filter(|r| &r.show_key == key) {
                output.unmatched_a_detail.push(record.clone());
            }
        }
        for key in &match_result.unmatched_b {
            for record in records_b.iter().filter(|r| &r.show_key == key) {
                output.unmatched_b_detail.push(record.clone());
            }
        }

        output
    }
}

impl Default for AggregationEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn aggregate_show(
    show_key: &str,
    match_quality: u8,
    side_a: &[&Record],
    side_b: &[&Record],
) -> ShowAggregate {
    let mut total_a = BigDecimal::zero();
    let mut total_b = BigDecimal::zero();

    // (episode, song) rows in first-seen order
    let mut rows: Vec<EpisodeRow> = Vec::new();
    let mut index: HashMap<EpisodeKey, usize> = HashMap::new();

    for record in side_a {
        total_a += record.amount.clone();
        let row = episode_row(&mut rows, &mut index, record);
        row.amount_a += record.amount.clone();
    }
    for record in side_b {
        total_b += record.amount.clone();
        let row = episode_row(&mut rows, &mut index, record);
        row.amount_b += record.amount.clone();
    }

    let difference = (&total_a - &total_b).abs();
    let larger = total_a.clone().max(total_b.clone());
    let difference_pct = if larger > BigDecimal::zero() {
        &difference / &larger
    } else {
        BigDecimal::zero()
    };

    ShowAggregate {
        show_key: show_key.to_string(),
        match_quality,
        total_a,
        total_b,
        difference,
        difference_pct,
        per_episode: rows,
    }
}

/// Find or create the row for a record's (episode, song) key, carrying the
/// first non-empty network seen.
fn episode_row<'a>(
    rows: &'a mut Vec<EpisodeRow>,
    index: &mut HashMap<EpisodeKey, usize>,
    record: &Record,
) -> &'a mut EpisodeRow {
    let key = EpisodeKey {
        episode: record.episode.clone(),
        song: record.song_raw.clone(),
    };

    let pos = *index.entry(key).or_insert_with(|| {
        rows.push(EpisodeRow {
            episode: record.episode.clone(),
            song: record.song_raw.clone(),
            network: String::new(),
            amount_a: BigDecimal::zero(),
            amount_b: BigDecimal::zero(),
        });
        rows.len() - 1
    });

    let row = &mut rows[pos];
    if row.network.is_empty() && !record.network.is_empty() {
        row.network = record.network.clone();
    }
    row
}

// ============================================================================
// TESTS
// ============================================================================
