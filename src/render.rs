// 🖨️ Rendering Sink - ReportModel → CSV sheets
// Presentation boundary: money rounds half-even to 2dp, percentages to 4dp.
// The model itself carries full precision and is never mutated here.

use crate::report::ReportModel;
use anyhow::{Context, Result};
use bigdecimal::{BigDecimal, RoundingMode};
use std::path::Path;

pub const SUMMARY_FILE: &str = "summary.csv";
pub const BREAKDOWN_FILE: &str = "episode_breakdown.csv";
pub const ONLY_IN_ASCAP_FILE: &str = "only_in_ascap.csv";
pub const ONLY_IN_BMI_FILE: &str = "only_in_bmi.csv";

/// Write the four report sheets into `dir` (created if absent).
pub fn write_report(model: &ReportModel, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create report directory: {}", dir.display()))?;

    write_summary(model, &dir.join(SUMMARY_FILE))?;
    write_breakdown(model, &dir.join(BREAKDOWN_FILE))?;
    write_unmatched(&model.unmatched_a_detail, &dir.join(ONLY_IN_ASCAP_FILE))?;
    write_unmatched(&model.unmatched_b_detail, &dir.join(ONLY_IN_BMI_FILE))?;

    Ok(())
}

fn write_summary(model: &ReportModel, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    wtr.write_record([
        "Show Name",
        "ASCAP Amount",
        "BMI Amount",
        "Difference",
        "Difference %",
        "Match Quality",
    ])?;

    for row in &model.summary {
        wtr.write_record([
            row.show_key.clone(),
            money(&row.total_a),
            money(&row.total_b),
            money(&row.difference),
            percent(&row.difference_pct),
            row.match_quality.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

fn write_breakdown(model: &ReportModel, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    wtr.write_record([
        "Show Name",
        "Episode Title",
        "Song Title",
        "Network",
        "ASCAP Amount",
        "BMI Amount",
        "Difference",
    ])?;

    for row in &model.episode_breakdown {
        let difference = (&row.amount_a - &row.amount_b).abs();
        wtr.write_record([
            row.show_key.clone(),
            row.episode.clone(),
            row.song.clone(),
            row.network.clone(),
            money(&row.amount_a),
            money(&row.amount_b),
            money(&difference),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

fn write_unmatched(records: &[crate::ingest::Record], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    wtr.write_record(["Show Name", "Episode", "Song Title", "Network", "Amount"])?;

    for record in records {
        wtr.write_record([
            record.show_raw.clone(),
            record.episode.clone(),
            record.song_raw.clone(),
            record.network.clone(),
            money(&record.amount),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Round half-even to cents for display.
fn money(value: &BigDecimal) -> String {
    value.with_scale_round(2, RoundingMode::HalfEven).to_string()
}

/// Round half-even to four places (ratio, not a "%"-formatted string).
fn percent(value: &BigDecimal) -> String {
    value.with_scale_round(4, RoundingMode::HalfEven).to_string()
}

// ============================================================================
// TESTS
// ============================================================================
