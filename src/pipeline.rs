// ⚙️ Pipeline - Records in, ReportModel out
// Normalizer keys are already on the records; this wires matcher →
// aggregator → report builder for one synchronous run.

use crate::aggregate::AggregationEngine;
use crate::ingest::{Record, Source};
use crate::matcher::MatchEngine;
use crate::report::{build_report, ReportModel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Non-fatal conditions noticed during a run. The engine still produces a
/// complete (possibly empty) report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReconWarning {
    /// One input batch held zero records
    EmptyInput(Source),
}

impl std::fmt::Display for ReconWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReconWarning::EmptyInput(source) => {
                write!(f, "{} input contains no records", source.name())
            }
        }
    }
}

/// Result of one reconciliation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconOutcome {
    pub report: ReportModel,
    pub warnings: Vec<ReconWarning>,
}

/// Run the full reconciliation over two schema-mapped record batches.
///
/// Deterministic function of its inputs: fresh entities every run, nothing
/// shared, no I/O.
pub fn run(match_engine: &MatchEngine, records_a: &[Record], records_b: &[Record]) -> ReconOutcome {
    let mut warnings = Vec::new();
    if records_a.is_empty() {
        warnings.push(ReconWarning::EmptyInput(Source::Ascap));
    }
    if records_b.is_empty() {
        warnings.push(ReconWarning::EmptyInput(Source::Bmi));
    }

    let keys_a: BTreeSet<String> = records_a.iter().map(|r| r.show_key.clone()).collect();
    let keys_b: BTreeSet<String> = records_b.iter().map(|r| r.show_key.clone()).collect();

    let match_result = match_engine.match_shows(&keys_a, &keys_b);
    let aggregate = AggregationEngine::new().aggregate(&match_result, records_a, records_b);

    ReconOutcome {
        report: build_report(aggregate),
        warnings,
    }
}

// ============================================================================
// TESTS
// ============================================================================
