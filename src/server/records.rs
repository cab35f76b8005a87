//! Transaction records: CSV schema validation and aggregation.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

/// Why a row failed validation. One variant per schema rule.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RecordError {
    #[error("id must not be empty")]
    EmptyId,
    #[error("amount is not a number: '{0}'")]
    InvalidAmount(String),
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(f64),
    #[error("kind must be 'debit' or 'credit', got '{0}'")]
    InvalidKind(String),
    #[error("date must be YYYY-MM-DD, got '{0}'")]
    InvalidDate(String),
}

/// Transaction direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Debit,
    Credit,
}

/// A raw CSV row before validation. Every field is a string so that a
/// malformed value is counted as an invalid row instead of failing the parse.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default, alias = "type")]
    pub kind: String,
    #[serde(default)]
    pub date: String,
}

/// A validated transaction row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: String,
    pub amount: f64,
    pub kind: TxKind,
    pub date: String,
}

impl RawRecord {
    /// Validates this row against the transaction schema.
    pub fn validate(&self) -> Result<Transaction, RecordError> {
        let id = self.id.trim();
        if id.is_empty() {
            return Err(RecordError::EmptyId);
        }

        let amount: f64 = self
            .amount
            .trim()
            .parse()
            .map_err(|_| RecordError::InvalidAmount(self.amount.clone()))?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(RecordError::NonPositiveAmount(amount));
        }

        let kind = match self.kind.trim().to_lowercase().as_str() {
            "debit" => TxKind::Debit,
            "credit" => TxKind::Credit,
            other => return Err(RecordError::InvalidKind(other.to_string())),
        };

        let date = self.date.trim();
        if !is_valid_date(date) {
            return Err(RecordError::InvalidDate(date.to_string()));
        }

        Ok(Transaction { id: id.to_string(), amount, kind, date: date.to_string() })
    }
}

/// Checks the YYYY-MM-DD shape with plausible month and day ranges.
fn is_valid_date(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return false;
    }

    let digits_at = |range: std::ops::Range<usize>| bytes[range].iter().all(u8::is_ascii_digit);
    if !digits_at(0..4) || !digits_at(5..7) || !digits_at(8..10) {
        return false;
    }

    // Shape check only, no calendar arithmetic
    let month: u32 = s[5..7].parse().unwrap_or(0);
    let day: u32 = s[8..10].parse().unwrap_or(0);
    (1..=12).contains(&month) && (1..=31).contains(&day)
}

/// Debit/credit totals over the accepted rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregates {
    pub total_debits: f64,
    pub total_credits: f64,
    pub net_balance: f64,
}

/// JSON summary returned by the conversion endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub filename: String,
    pub total_records: usize,
    pub valid_records: usize,
    pub invalid_records: usize,
    pub aggregated: Aggregates,
    /// First few accepted rows, as a preview of the converted data
    pub sample: Vec<Transaction>,
}

/// How many accepted rows the report echoes back.
const SAMPLE_SIZE: usize = 5;

/// Parses and validates CSV text into a conversion report.
///
/// Invalid rows are counted and excluded from aggregation, never fatal.
pub fn convert(filename: &str, csv_text: &str) -> ConversionReport {
    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());

    let mut valid: Vec<Transaction> = Vec::new();
    let mut invalid_count = 0usize;
    let mut total_count = 0usize;
    let mut total_debits = 0.0f64;
    let mut total_credits = 0.0f64;

    for row in reader.deserialize::<RawRecord>() {
        total_count += 1;

        let record = match row {
            Ok(raw) => raw,
            Err(e) => {
                trace!("Row {} rejected by CSV reader: {}", total_count, e);
                invalid_count += 1;
                continue;
            }
        };

        match record.validate() {
            Ok(tx) => {
                match tx.kind {
                    TxKind::Debit => total_debits += tx.amount,
                    TxKind::Credit => total_credits += tx.amount,
                }
                valid.push(tx);
            }
            Err(e) => {
                trace!("Row {} invalid: {}", total_count, e);
                invalid_count += 1;
            }
        }
    }

    debug!(
        "Converted {}: {} rows, {} valid, {} invalid",
        filename,
        total_count,
        valid.len(),
        invalid_count
    );

    let sample: Vec<Transaction> = valid.iter().take(SAMPLE_SIZE).cloned().collect();

    ConversionReport {
        filename: filename.to_string(),
        total_records: total_count,
        valid_records: valid.len(),
        invalid_records: invalid_count,
        aggregated: Aggregates {
            total_debits: round2(total_debits),
            total_credits: round2(total_credits),
            net_balance: round2(total_credits - total_debits),
        },
        sample,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
