//! Sample sequence numbering with financial-year suffixes
//!
//! Sample sequence numbers are persisted as `"{n}/{yy}-{yy}"`, e.g. `"7/25-26"`.
//! The financial year runs April to March: a date in January, February or
//! March belongs to the year that started the previous April.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{WorkflowError, WorkflowResult};

/// Most samples one sampling entry may cover
pub const MAX_SAMPLE_COUNT: u32 = 10_000;

/// An April-to-March financial year, identified by its starting calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FinancialYear {
    start_year: i32,
}

impl FinancialYear {
    pub fn new(start_year: i32) -> Self {
        Self { start_year }
    }

    pub fn of(date: NaiveDate) -> Self {
        // chrono months are 1-based: 1..=3 is January to March
        let start_year = if date.month() <= 3 {
            date.year() - 1
        } else {
            date.year()
        };
        Self { start_year }
    }

    pub fn start_year(self) -> i32 {
        self.start_year
    }

    /// The `/yy-yy` suffix appended to sequence numbers.
    pub fn suffix(self) -> String {
        format!("/{self}")
    }
}

impl fmt::Display for FinancialYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start_year.rem_euclid(100),
            (self.start_year + 1).rem_euclid(100)
        )
    }
}

pub fn financial_year_suffix(date: NaiveDate) -> String {
    FinancialYear::of(date).suffix()
}

pub fn format_sequence(number: u32, date: NaiveDate) -> String {
    format!("{number}{}", financial_year_suffix(date))
}

/// Split a formatted sequence into its number and `/yy-yy` suffix.
///
/// A bare number (no suffix) is accepted and yields an empty suffix.
pub fn parse_sequence(formatted: &str) -> WorkflowResult<(u32, String)> {
    let formatted = formatted.trim();
    let (number, suffix) = match formatted.split_once('/') {
        Some((number, year)) => {
            validate_year_label(formatted, year)?;
            (number, format!("/{year}"))
        }
        None => (formatted, String::new()),
    };

    let number = canonical_number(number).ok_or_else(|| {
        WorkflowError::invalid(
            "sequence",
            format!("'{formatted}' does not start with a sequence number"),
        )
    })?;

    Ok((number, suffix))
}

/// Parse digits written the way `format_sequence` writes them: no sign and
/// no leading zeros.
fn canonical_number(text: &str) -> Option<u32> {
    let number = text.parse::<u32>().ok()?;
    (number.to_string() == text).then_some(number)
}

fn validate_year_label(formatted: &str, year: &str) -> WorkflowResult<()> {
    let bad = || {
        WorkflowError::invalid(
            "sequence",
            format!("'{formatted}' has a malformed financial year suffix"),
        )
    };

    let (first, second) = year.split_once('-').ok_or_else(bad)?;
    let first = canonical_number(first).ok_or_else(bad)?;
    let second = canonical_number(second).ok_or_else(bad)?;
    if first >= 100 || second != (first + 1) % 100 {
        return Err(bad());
    }
    Ok(())
}

/// Inclusive range of sample sequence numbers within one financial year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRange {
    start: u32,
    end: u32,
    suffix: String,
}

impl SequenceRange {
    /// Range of `count` samples starting at `start`, suffixed by the
    /// financial year of `date`.
    pub fn from_count(start: u32, count: u32, date: NaiveDate) -> WorkflowResult<Self> {
        if count == 0 {
            return Err(WorkflowError::invalid(
                "sample_count",
                "at least one sample is required",
            ));
        }
        if count > MAX_SAMPLE_COUNT {
            return Err(WorkflowError::invalid(
                "sample_count",
                format!("{count} samples exceeds the limit of {MAX_SAMPLE_COUNT}"),
            ));
        }
        let end = start
            .checked_add(count - 1)
            .ok_or_else(|| WorkflowError::invalid("sample_count", "sequence overflows"))?;
        Ok(Self {
            start,
            end,
            suffix: financial_year_suffix(date),
        })
    }

    /// Rebuild a range from its stored, formatted endpoints.
    pub fn parse(start: &str, end: &str) -> WorkflowResult<Self> {
        let (start_num, start_suffix) = parse_sequence(start)?;
        let (end_num, end_suffix) = parse_sequence(end)?;
        if start_suffix != end_suffix {
            return Err(WorkflowError::invalid(
                "sequence_end",
                format!("'{end}' is not in the same financial year as '{start}'"),
            ));
        }
        if end_num < start_num {
            return Err(WorkflowError::invalid(
                "sequence_end",
                format!("'{end}' is before '{start}'"),
            ));
        }
        if u64::from(end_num) - u64::from(start_num) >= u64::from(MAX_SAMPLE_COUNT) {
            return Err(WorkflowError::invalid(
                "sequence_end",
                format!("'{start}'..'{end}' covers more than {MAX_SAMPLE_COUNT} samples"),
            ));
        }
        Ok(Self {
            start: start_num,
            end: end_num,
            suffix: start_suffix,
        })
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn formatted_start(&self) -> String {
        format!("{}{}", self.start, self.suffix)
    }

    pub fn formatted_end(&self) -> String {
        format!("{}{}", self.end, self.suffix)
    }

    /// Number of samples in the range, never zero
    pub fn count(&self) -> u32 {
        self.end - self.start + 1
    }

    pub fn contains(&self, number: u32) -> bool {
        (self.start..=self.end).contains(&number)
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }
}

/// How well a trash-sample map covers a sampling range
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrashCoverage {
    /// Sequence numbers in the range with no sample
    pub missing: Vec<u32>,
    /// Sample keys that fall outside the range
    pub out_of_range: Vec<u32>,
}

impl TrashCoverage {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.out_of_range.is_empty()
    }
}

pub fn trash_coverage(range: &SequenceRange, samples: &BTreeMap<u32, f64>) -> TrashCoverage {
    TrashCoverage {
        missing: range.iter().filter(|n| !samples.contains_key(n)).collect(),
        out_of_range: samples
            .keys()
            .copied()
            .filter(|n| !range.contains(*n))
            .collect(),
    }
}
