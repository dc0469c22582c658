//! Action payloads as submitted, and their validation into typed records
//!
//! Every form field is optional at the serde level so that a missing field
//! surfaces as a `Validation` error naming it, rather than as a parse error.
//! [`parse_form`] does the same for a field of the wrong type.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::config::WorkflowSettings;
use crate::error::{WorkflowError, WorkflowResult};
use crate::models::{
    Actor, CtsResults, Decision, DecisionRecord, Gate, NewContract, NewVendor,
    PaymentRequisition, QualityAverages, Sampling, Stage2Report, VendorId,
};
use crate::sequence::SequenceRange;

fn required<T>(value: Option<T>, field: &str) -> WorkflowResult<T> {
    value.ok_or_else(|| WorkflowError::missing(field))
}

fn required_text(value: Option<String>, field: &str) -> WorkflowResult<String> {
    optional_text(value).ok_or_else(|| WorkflowError::missing(field))
}

/// Trimmed text, with blank strings treated as absent
fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn finite(value: Option<f64>, field: &str) -> WorkflowResult<f64> {
    let value = required(value, field)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(WorkflowError::invalid(field, "must be a finite number"))
    }
}

fn positive(value: Option<f64>, field: &str) -> WorkflowResult<f64> {
    let value = finite(value, field)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(WorkflowError::invalid(field, "must be greater than zero"))
    }
}

fn percent(value: f64, field: &str) -> WorkflowResult<f64> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(WorkflowError::invalid(field, format!("{value} is not a percentage")))
    }
}

fn optional_finite(value: Option<f64>, field: &str) -> WorkflowResult<Option<f64>> {
    value.map(|v| finite(Some(v), field)).transpose()
}

fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Parse a JSON form. A malformed document is a `Validation` error on
/// `payload`; a well-formed one whose field has the wrong type is a
/// `Validation` error on that field.
pub fn parse_form<T: DeserializeOwned>(content: &str) -> WorkflowResult<T> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| WorkflowError::invalid("payload", e.to_string()))?;
    let Value::Object(fields) = &value else {
        return Err(WorkflowError::invalid("payload", "expected a JSON object"));
    };

    serde_json::from_value(value.clone()).map_err(|err| {
        let field = fields
            .iter()
            .find(|(key, field_value)| {
                let mut single = Map::new();
                single.insert((*key).clone(), (*field_value).clone());
                serde_json::from_value::<T>(Value::Object(single)).is_err()
            })
            .map_or("payload", |(key, _)| key.as_str());
        WorkflowError::invalid(field, err.to_string())
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VendorForm {
    pub name: Option<String>,
    pub gst_number: Option<String>,
    pub state: Option<String>,
    pub vendor_type: Option<String>,
    pub is_privileged: Option<bool>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

impl VendorForm {
    pub fn validate(self) -> WorkflowResult<NewVendor> {
        Ok(NewVendor {
            name: required_text(self.name, "name")?,
            gst_number: optional_text(self.gst_number),
            state: optional_text(self.state),
            vendor_type: optional_text(self.vendor_type),
            is_privileged: self.is_privileged.unwrap_or(false),
            email: optional_text(self.email),
            phone_number: optional_text(self.phone_number),
            address: optional_text(self.address),
        })
    }
}

/// Stage 1 contract entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractForm {
    pub vendor_id: Option<VendorId>,
    pub cotton_type: Option<String>,
    pub quality: Option<String>,
    pub quantity: Option<f64>,
    pub price: Option<f64>,
    pub document_path: Option<String>,
    pub entry_date: Option<NaiveDate>,
}

impl ContractForm {
    pub fn validate(self, actor: Actor) -> WorkflowResult<NewContract> {
        Ok(NewContract {
            vendor_id: required(self.vendor_id, "vendor_id")?,
            cotton_type: required_text(self.cotton_type, "cotton_type")?,
            quality: optional_text(self.quality),
            quantity: positive(self.quantity, "quantity")?,
            price: positive(self.price, "price")?,
            document_path: optional_text(self.document_path),
            entry_date: required(self.entry_date, "entry_date")?,
            entered_by: actor.id,
        })
    }
}

/// Stage 2 quality report with the seven averages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityReportForm {
    pub variety: Option<String>,
    pub price: Option<f64>,
    pub report_date: Option<NaiveDate>,
    pub report_document_path: Option<String>,
    pub uhml: Option<f64>,
    pub ui: Option<f64>,
    pub strength: Option<f64>,
    pub elongation: Option<f64>,
    pub mic: Option<f64>,
    pub rd: Option<f64>,
    pub plus_b: Option<f64>,
    pub remarks: Option<String>,
}

impl QualityReportForm {
    pub fn validate(self, actor: Actor, now: DateTime<Utc>) -> WorkflowResult<Stage2Report> {
        let averages = QualityAverages {
            uhml: finite(self.uhml, "uhml")?,
            ui: finite(self.ui, "ui")?,
            strength: finite(self.strength, "strength")?,
            elongation: finite(self.elongation, "elongation")?,
            mic: finite(self.mic, "mic")?,
            rd: finite(self.rd, "rd")?,
            plus_b: finite(self.plus_b, "plus_b")?,
        };

        Ok(Stage2Report {
            variety: required_text(self.variety, "variety")?,
            price: positive(self.price, "price")?,
            report_date: required(self.report_date, "report_date")?,
            report_document_path: optional_text(self.report_document_path),
            averages,
            remarks: optional_text(self.remarks),
            entered_by: actor.id,
            uploaded_at: now,
        })
    }
}

/// A Chairman verdict on one of the three gates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionForm {
    pub decision: Option<Decision>,
    pub remarks: Option<String>,
}

impl DecisionForm {
    pub fn new(decision: Decision) -> Self {
        Self {
            decision: Some(decision),
            remarks: None,
        }
    }

    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    pub fn validate(
        self,
        gate: Gate,
        actor: Actor,
        now: DateTime<Utc>,
    ) -> WorkflowResult<DecisionRecord> {
        let decision = required(self.decision, "decision")?;
        if !gate.allows(decision) {
            return Err(WorkflowError::invalid(
                "decision",
                format!(
                    "{decision} is not accepted at stage {}; use Approve or Reject",
                    gate.stage_number()
                ),
            ));
        }

        Ok(DecisionRecord {
            decision,
            remarks: optional_text(self.remarks),
            decided_by: actor.id,
            decided_at: now,
        })
    }
}

/// Stage 3 sampling entry. The end of the range is computed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingForm {
    pub sequence_start: Option<u32>,
    pub sample_count: Option<u32>,
    pub arrival_date: Option<NaiveDate>,
    pub lot_number: Option<String>,
}

impl SamplingForm {
    /// Returns the stored sampling block and the numeric range it covers.
    /// The financial year of `arrival_date` supplies the suffix.
    pub fn validate(self, actor: Actor) -> WorkflowResult<(Sampling, SequenceRange)> {
        let start = required(self.sequence_start, "sequence_start")?;
        let count = required(self.sample_count, "sample_count")?;
        let arrival_date = required(self.arrival_date, "arrival_date")?;
        let range = SequenceRange::from_count(start, count, arrival_date)?;

        let sampling = Sampling {
            sequence_start: range.formatted_start(),
            sequence_end: range.formatted_end(),
            lot_number: optional_text(self.lot_number),
            arrival_date,
            entered_by: actor.id,
        };
        Ok((sampling, range))
    }
}

/// Stage 4 CTS laboratory results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CtsForm {
    pub mic_value: Option<f64>,
    pub strength: Option<f64>,
    pub uhml: Option<f64>,
    pub ui_percent: Option<f64>,
    pub sfi: Option<f64>,
    pub elongation: Option<f64>,
    pub rd: Option<f64>,
    pub plus_b: Option<f64>,
    pub colour_grade: Option<String>,
    pub mat: Option<f64>,
    pub sci: Option<i64>,
    pub trash_percent: Option<f64>,
    pub moisture_percent: Option<f64>,
    pub test_date: Option<NaiveDate>,
    pub confirmation_date: Option<NaiveDate>,
    pub remarks: Option<String>,
    pub report_document_path: Option<String>,
    pub trash_percent_samples: Option<BTreeMap<u32, f64>>,
}

impl CtsForm {
    pub fn validate(self, actor: Actor, now: DateTime<Utc>) -> WorkflowResult<CtsResults> {
        let trash_percent_samples = self.trash_percent_samples.unwrap_or_default();
        for (id, value) in &trash_percent_samples {
            percent(*value, "trash_percent_samples").map_err(|_| {
                WorkflowError::invalid(
                    "trash_percent_samples",
                    format!("sample {id}: {value} is not a percentage"),
                )
            })?;
        }

        let moisture_percent = self
            .moisture_percent
            .map(|v| percent(v, "moisture_percent"))
            .transpose()?;

        Ok(CtsResults {
            mic_value: finite(self.mic_value, "mic_value")?,
            strength: finite(self.strength, "strength")?,
            uhml: finite(self.uhml, "uhml")?,
            ui_percent: finite(self.ui_percent, "ui_percent")?,
            sfi: optional_finite(self.sfi, "sfi")?,
            elongation: finite(self.elongation, "elongation")?,
            rd: finite(self.rd, "rd")?,
            plus_b: finite(self.plus_b, "plus_b")?,
            colour_grade: optional_text(self.colour_grade),
            mat: optional_finite(self.mat, "mat")?,
            sci: self.sci,
            trash_percent: percent(
                required(self.trash_percent, "trash_percent")?,
                "trash_percent",
            )?,
            moisture_percent,
            test_date: required(self.test_date, "test_date")?,
            confirmation_date: self.confirmation_date,
            remarks: optional_text(self.remarks),
            report_document_path: optional_text(self.report_document_path),
            trash_percent_samples,
            entered_by: actor.id,
            entered_at: now,
        })
    }
}

/// Stage 5 payment requisition. TDS and net amount are computed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentForm {
    pub invoice_value: Option<Decimal>,
    pub cash_discount: Option<Decimal>,
    pub bank_name: Option<String>,
    pub branch: Option<String>,
    pub account_no: Option<String>,
    pub ifsc_code: Option<String>,
    pub payment_mode: Option<String>,
    pub rtgs_reference_no: Option<String>,
}

impl PaymentForm {
    pub fn validate(
        self,
        actor: Actor,
        now: DateTime<Utc>,
        settings: &WorkflowSettings,
    ) -> WorkflowResult<PaymentRequisition> {
        let invoice_value = round_money(required(self.invoice_value, "invoice_value")?);
        if invoice_value <= Decimal::ZERO {
            return Err(WorkflowError::invalid(
                "invoice_value",
                "must be greater than zero",
            ));
        }

        let cash_discount = round_money(self.cash_discount.unwrap_or(Decimal::ZERO));
        if cash_discount < Decimal::ZERO {
            return Err(WorkflowError::invalid("cash_discount", "must not be negative"));
        }

        let tds_amount = round_money(invoice_value * settings.tds_rate);
        let net_amount_paid = invoice_value - tds_amount - cash_discount;
        if net_amount_paid < Decimal::ZERO {
            return Err(WorkflowError::invalid(
                "cash_discount",
                format!("discount {cash_discount} exceeds the payable amount"),
            ));
        }

        Ok(PaymentRequisition {
            invoice_value,
            tds_amount,
            cash_discount,
            net_amount_paid,
            bank_name: required_text(self.bank_name, "bank_name")?,
            branch: required_text(self.branch, "branch")?,
            account_no: required_text(self.account_no, "account_no")?,
            ifsc_code: required_text(self.ifsc_code, "ifsc_code")?.to_uppercase(),
            payment_mode: optional_text(self.payment_mode)
                .unwrap_or_else(|| settings.default_payment_mode.clone()),
            rtgs_reference_no: optional_text(self.rtgs_reference_no),
            created_by: actor.id,
            created_at: now,
            updated_at: now,
        })
    }
}
