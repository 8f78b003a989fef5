// 🏗️ Ingestion Layer - CSV → typed Record
// One parser per licensing organization, fixed column schemas.
// Schema binding happens here, once; the engine never sees raw column names.

use crate::normalize::{normalize_show, normalize_title};
use anyhow::{Context, Result};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

// ============================================================================
// SOURCE
// ============================================================================

/// Which licensing organization reported a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    Ascap,
    Bmi,
}

impl Source {
    /// Human-readable name for display
    pub fn name(&self) -> &str {
        match self {
            Source::Ascap => "ASCAP",
            Source::Bmi => "BMI",
        }
    }

    /// Short code for internal use
    pub fn code(&self) -> &str {
        match self {
            Source::Ascap => "A",
            Source::Bmi => "B",
        }
    }

    /// Required columns for this source's statement exports.
    /// Order: show, episode/program, song/work title, amount, network.
    pub fn required_columns(&self) -> [&'static str; 5] {
        match self {
            Source::Ascap => [
                "Series or Film/Attraction",
                "Program Name",
                "Work Title",
                "Dollars",
                "Network Service",
            ],
            Source::Bmi => [
                "SHOW NAME",
                "EPISODE NAME",
                "TITLE NAME",
                "ROYALTY AMOUNT",
                "PERF SOURCE",
            ],
        }
    }
}

// ============================================================================
// RECORD
// ============================================================================

/// One schema-mapped royalty row from one source. Immutable once parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub source: Source,
    pub show_raw: String,
    /// Derived via the normalizer, never hand-set
    pub show_key: String,
    pub episode: String,
    pub song_raw: String,
    /// Derived via the normalizer, never hand-set
    pub song_key: String,
    pub network: String,
    pub amount: BigDecimal,
}

impl Record {
    /// Build a record, deriving the normalized keys from the raw names.
    pub fn new(
        source: Source,
        show_raw: String,
        episode: String,
        song_raw: String,
        network: String,
        amount: BigDecimal,
    ) -> Self {
        let show_key = normalize_show(&show_raw);
        let song_key = normalize_title(&song_raw);
        Record {
            source,
            show_raw,
            show_key,
            episode,
            song_raw,
            song_key,
            network,
            amount,
        }
    }
}

// ============================================================================
// SCHEMA ERROR
// ============================================================================

/// Ingestion-layer failure. The reconciliation engine itself never raises
/// these; a batch that reaches the engine is already schema-mapped.
#[derive(Debug, Clone)]
pub enum SchemaError {
    /// A required column is absent from the header row
    MissingColumn { source: Source, column: &'static str },
    /// The amount column held something that is not money
    InvalidAmount {
        source: Source,
        line: usize,
        value: String,
    },
    /// The CSV itself could not be read (ragged row, bad encoding, ...)
    Malformed {
        source: Source,
        line: usize,
        message: String,
    },
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaError::MissingColumn { source, column } => {
                write!(f, "{} file is missing required column '{}'", source.name(), column)
            }
            SchemaError::InvalidAmount { source, line, value } => {
                write!(
                    f,
                    "{} file line {}: unreadable amount '{}'",
                    source.name(),
                    line,
                    value
                )
            }
            SchemaError::Malformed { source, line, message } => {
                write!(f, "{} file line {}: {}", source.name(), line, message)
            }
        }
    }
}

impl std::error::Error for SchemaError {}

// ============================================================================
// PARSERS
// ============================================================================

/// Parser for one organization's statement export.
pub trait RoyaltyParser {
    /// Parse an already-open CSV stream into schema-mapped records.
    fn parse_reader<R: Read>(&self, reader: R) -> std::result::Result<Vec<Record>, SchemaError>;

    /// Which source this parser handles
    fn source(&self) -> Source;

    /// Parse a CSV file from disk.
    fn parse(&self, file_path: &Path) -> Result<Vec<Record>> {
        let file = std::fs::File::open(file_path)
            .with_context(|| format!("Failed to open file: {}", file_path.display()))?;
        let records = self.parse_reader(file).with_context(|| {
            format!(
                "Failed to parse {} statement: {}",
                self.source().name(),
                file_path.display()
            )
        })?;
        Ok(records)
    }
}

/// ASCAP statement parser (columns per `Source::Ascap`)
pub struct AscapParser;

/// BMI statement parser (columns per `Source::Bmi`)
pub struct BmiParser;

impl RoyaltyParser for AscapParser {
    fn parse_reader<R: Read>(&self, reader: R) -> std::result::Result<Vec<Record>, SchemaError> {
        parse_source(Source::Ascap, reader)
    }

    fn source(&self) -> Source {
        Source::Ascap
    }
}

impl RoyaltyParser for BmiParser {
    fn parse_reader<R: Read>(&self, reader: R) -> std::result::Result<Vec<Record>, SchemaError> {
        parse_source(Source::Bmi, reader)
    }

    fn source(&self) -> Source {
        Source::Bmi
    }
}

/// Shared CSV walk: resolve the five required headers once, then map rows.
fn parse_source<R: Read>(source: Source, reader: R) -> std::result::Result<Vec<Record>, SchemaError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| SchemaError::Malformed {
            source,
            line: 1,
            message: e.to_string(),
        })?
        .clone();

    let columns = source.required_columns();
    let mut idx = [0usize; 5];
    for (slot, column) in columns.iter().copied().enumerate() {
        idx[slot] = headers
            .iter()
            .position(|h| h.trim() == column)
            .ok_or(SchemaError::MissingColumn { source, column })?;
    }
    let [show_idx, episode_idx, song_idx, amount_idx, network_idx] = idx;

    let mut records = Vec::new();
    for (row_num, result) in rdr.records().enumerate() {
        // +2: rows are 1-indexed and the header occupies line 1
        let line = row_num + 2;
        let row = result.map_err(|e| SchemaError::Malformed {
            source,
            line,
            message: e.to_string(),
        })?;

        let cell = |i: usize| row.get(i).unwrap_or("").trim().to_string();

        let amount_cell = cell(amount_idx);
        let amount = parse_amount(&amount_cell).ok_or_else(|| SchemaError::InvalidAmount {
            source,
            line,
            value: amount_cell.clone(),
        })?;

        records.push(Record::new(
            source,
            cell(show_idx),
            cell(episode_idx),
            cell(song_idx),
            cell(network_idx),
            amount,
        ));
    }

    Ok(records)
}

/// Parse a money cell into an exact decimal.
///
/// Accepts plain numbers plus the usual statement decorations: `$` sign,
/// thousands commas, surrounding whitespace. A blank cell reads as zero.
fn parse_amount(cell: &str) -> Option<BigDecimal> {
    let cleaned: String = cell
        .chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Some(BigDecimal::from(0));
    }

    BigDecimal::from_str(&cleaned).ok()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const ASCAP_CSV: &str = "\
Series or Film/Attraction,Program Name,Work Title,Dollars,Network Service
(Comm/Promo) Late Night,Episode 12,Opening Theme,\"$1,250.50\",NBC
Late Night,Episode 13,Closing Theme,99.50,NBC
";

    const BMI_CSV: &str = "\
SHOW NAME,EPISODE NAME,TITLE NAME,ROYALTY AMOUNT,PERF SOURCE
late night,Ep 12,Opening Theme,1250.50,Cable
";

    #[test]
    fn test_ascap_parse_and_keys() {
        let records = AscapParser.parse_reader(ASCAP_CSV.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.source, Source::Ascap);
        assert_eq!(first.show_raw, "(Comm/Promo) Late Night");
        assert_eq!(first.show_key, "late night");
        assert_eq!(first.song_key, "opening theme");
        assert_eq!(first.network, "NBC");
        assert_eq!(first.amount, BigDecimal::from_str("1250.50").unwrap());
    }

    #[test]
    fn test_bmi_parse() {
        let records = BmiParser.parse_reader(BMI_CSV.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source, Source::Bmi);
        assert_eq!(records[0].show_key, "late night");
        assert_eq!(records[0].network, "Cable");
    }

    #[test]
    fn test_column_order_does_not_matter() {
        let shuffled = "\
ROYALTY AMOUNT,SHOW NAME,PERF SOURCE,TITLE NAME,EPISODE NAME
10.00,My Show,Radio,My Song,Ep 1
";
        let records = BmiParser.parse_reader(shuffled.as_bytes()).unwrap();
        assert_eq!(records[0].show_raw, "My Show");
        assert_eq!(records[0].amount, BigDecimal::from(10));
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let bad = "SHOW NAME,EPISODE NAME,TITLE NAME,PERF SOURCE\na,b,c,d\n";
        let err = BmiParser.parse_reader(bad.as_bytes()).unwrap_err();
        match err {
            SchemaError::MissingColumn { source, column } => {
                assert_eq!(source, Source::Bmi);
                assert_eq!(column, "ROYALTY AMOUNT");
            }
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_amount_is_schema_error() {
        let bad = "\
SHOW NAME,EPISODE NAME,TITLE NAME,ROYALTY AMOUNT,PERF SOURCE
My Show,Ep 1,My Song,not-money,Radio
";
        let err = BmiParser.parse_reader(bad.as_bytes()).unwrap_err();
        match err {
            SchemaError::InvalidAmount { line, value, .. } => {
                assert_eq!(line, 2);
                assert_eq!(value, "not-money");
            }
            other => panic!("expected InvalidAmount, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_amount_reads_as_zero() {
        let csv = "\
SHOW NAME,EPISODE NAME,TITLE NAME,ROYALTY AMOUNT,PERF SOURCE
My Show,Ep 1,My Song,,Radio
";
        let records = BmiParser.parse_reader(csv.as_bytes()).unwrap();
        assert_eq!(records[0].amount, BigDecimal::from(0));
    }

    #[test]
    fn test_empty_file_with_headers() {
        let csv = "SHOW NAME,EPISODE NAME,TITLE NAME,ROYALTY AMOUNT,PERF SOURCE\n";
        let records = BmiParser.parse_reader(csv.as_bytes()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_amount_decorations() {
        assert_eq!(parse_amount("$1,250.50"), BigDecimal::from_str("1250.50").ok());
        assert_eq!(parse_amount(" 99.50 "), BigDecimal::from_str("99.50").ok());
        assert_eq!(parse_amount("-12.00"), BigDecimal::from_str("-12.00").ok());
        assert_eq!(parse_amount(""), Some(BigDecimal::from(0)));
        assert_eq!(parse_amount("abc"), None);
    }
}
