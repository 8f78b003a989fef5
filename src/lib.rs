// Earnings Reconciliation - Core Library
// Exposes all modules for use in the CLI, upload server, and tests

pub mod normalize;
pub mod ingest;
pub mod matcher;
pub mod aggregate;
pub mod report;
pub mod pipeline;
pub mod render;

// Re-export commonly used types
pub use normalize::{normalize_show, normalize_title};
pub use ingest::{
    AscapParser, BmiParser, Record, RoyaltyParser, SchemaError, Source,
};
pub use matcher::{similarity, MatchEngine, MatchResult, MatchedShow};
pub use aggregate::{
    AggregateOutput, AggregationEngine, EpisodeKey, EpisodeRow, ShowAggregate,
};
pub use report::{build_report, BreakdownRow, ReportModel, SummaryRow};
pub use pipeline::{run, ReconOutcome, ReconWarning};
pub use render::write_report;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
