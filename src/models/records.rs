use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ids::{ContractId, HistoryId, UserId};

/// Chairman verdict on an approval gate.
///
/// `Modify` is only meaningful at the payment gate, where it rolls the
/// contract back to the Manager for resubmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    Approve,
    Reject,
    Modify,
}

impl Decision {
    pub fn is_approve(self) -> bool {
        self == Decision::Approve
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Approve => write!(f, "Approve"),
            Decision::Reject => write!(f, "Reject"),
            Decision::Modify => write!(f, "Modify"),
        }
    }
}

impl std::str::FromStr for Decision {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "approve" | "approved" => Ok(Decision::Approve),
            "reject" | "rejected" => Ok(Decision::Reject),
            "modify" | "rollback" => Ok(Decision::Modify),
            _ => anyhow::bail!("Invalid decision: {s}. Use: approve, reject, modify"),
        }
    }
}

/// The three Chairman approval gates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gate {
    Quality,
    Cts,
    Payment,
}

impl Gate {
    pub fn stage_number(self) -> u8 {
        match self {
            Gate::Quality => 2,
            Gate::Cts => 4,
            Gate::Payment => 5,
        }
    }

    pub fn allows(self, decision: Decision) -> bool {
        match self {
            Gate::Quality | Gate::Cts => decision != Decision::Modify,
            Gate::Payment => true,
        }
    }
}

/// One row of a Chairman decision table (stage 2, 4 or 5)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub decision: Decision,
    pub remarks: Option<String>,
    pub decided_by: UserId,
    pub decided_at: DateTime<Utc>,
}

impl DecisionRecord {
    pub fn is_approve(&self) -> bool {
        self.decision.is_approve()
    }
}

/// Average fibre-quality parameters reported by the Manager at stage 2
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityAverages {
    pub uhml: f64,
    pub ui: f64,
    pub strength: f64,
    pub elongation: f64,
    pub mic: f64,
    pub rd: f64,
    pub plus_b: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage2Report {
    pub variety: String,
    pub price: f64,
    pub report_date: NaiveDate,
    pub report_document_path: Option<String>,
    pub averages: QualityAverages,
    pub remarks: Option<String>,
    pub entered_by: UserId,
    pub uploaded_at: DateTime<Utc>,
}

/// Stage 3 sampling block. Sequence numbers are stored formatted
/// (`"7/25-26"`); the numeric part is recovered with
/// [`crate::sequence::parse_sequence`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sampling {
    pub sequence_start: String,
    pub sequence_end: String,
    pub lot_number: Option<String>,
    pub arrival_date: NaiveDate,
    pub entered_by: UserId,
}

/// Stage 4 CTS testing block. `mic_value` is the completion sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CtsResults {
    pub mic_value: f64,
    pub strength: f64,
    pub uhml: f64,
    pub ui_percent: f64,
    pub sfi: Option<f64>,
    pub elongation: f64,
    pub rd: f64,
    pub plus_b: f64,
    pub colour_grade: Option<String>,
    pub mat: Option<f64>,
    pub sci: Option<i64>,
    pub trash_percent: f64,
    pub moisture_percent: Option<f64>,
    pub test_date: NaiveDate,
    pub confirmation_date: Option<NaiveDate>,
    pub remarks: Option<String>,
    pub report_document_path: Option<String>,
    /// Trash percentage per sample, keyed by numeric sequence id
    #[serde(default)]
    pub trash_percent_samples: BTreeMap<u32, f64>,
    pub entered_by: UserId,
    pub entered_at: DateTime<Utc>,
}

/// The merged stage 3/4 row: sampling fields plus CTS fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub sampling: Option<Sampling>,
    pub cts: Option<CtsResults>,
}

impl SampleRecord {
    pub fn has_sampling(&self) -> bool {
        self.sampling.is_some()
    }

    pub fn has_cts(&self) -> bool {
        self.cts.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequisition {
    pub invoice_value: Decimal,
    pub tds_amount: Decimal,
    pub cash_discount: Decimal,
    pub net_amount_paid: Decimal,
    pub bank_name: String,
    pub branch: String,
    pub account_no: String,
    pub ifsc_code: String,
    pub payment_mode: String,
    pub rtgs_reference_no: Option<String>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Everything persisted for one contract past stage 1.
///
/// This is the immutable snapshot the derivation engine reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractRecords {
    pub report2: Option<Stage2Report>,
    pub decision2: Option<DecisionRecord>,
    pub sample3_4: Option<SampleRecord>,
    pub decision4: Option<DecisionRecord>,
    pub payment5: Option<PaymentRequisition>,
    pub decision5: Option<DecisionRecord>,
}

impl ContractRecords {
    pub fn decision(&self, gate: Gate) -> Option<&DecisionRecord> {
        match gate {
            Gate::Quality => self.decision2.as_ref(),
            Gate::Cts => self.decision4.as_ref(),
            Gate::Payment => self.decision5.as_ref(),
        }
    }

    pub fn is_approved(&self, gate: Gate) -> bool {
        self.decision(gate).is_some_and(DecisionRecord::is_approve)
    }

    pub fn sampling(&self) -> Option<&Sampling> {
        self.sample3_4.as_ref().and_then(|s| s.sampling.as_ref())
    }

    pub fn cts(&self) -> Option<&CtsResults> {
        self.sample3_4.as_ref().and_then(|s| s.cts.as_ref())
    }
}

/// Append-only audit row, one per accepted transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: HistoryId,
    pub contract_id: ContractId,
    pub stage_number: u8,
    pub action: String,
    pub performed_by: UserId,
    pub remarks: Option<String>,
    pub action_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_parse_accepts_legacy_labels() {
        assert_eq!("Approve".parse::<Decision>().unwrap(), Decision::Approve);
        assert_eq!("rollback".parse::<Decision>().unwrap(), Decision::Modify);
        assert!("maybe".parse::<Decision>().is_err());
    }

    #[test]
    fn test_gate_vocabulary() {
        assert!(!Gate::Quality.allows(Decision::Modify));
        assert!(!Gate::Cts.allows(Decision::Modify));
        assert!(Gate::Payment.allows(Decision::Modify));
        assert!(Gate::Quality.allows(Decision::Reject));
    }

    #[test]
    fn test_trash_samples_serialize_with_numeric_keys() {
        let mut samples = BTreeMap::new();
        samples.insert(3u32, 1.25);
        let json = serde_json::to_string(&samples).unwrap();
        assert_eq!(json, r#"{"3":1.25}"#);
        let back: BTreeMap<u32, f64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(&3), Some(&1.25));
    }
}
