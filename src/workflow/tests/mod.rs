//! Workflow tests, grouped by concern.
//!
//! Shared fixtures drive a contract to a given point of the workflow through
//! the public API, so every test starts from records the validator accepted.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::*;
use crate::config::WorkflowSettings;
use crate::error::{ErrorKind, WorkflowError};
use crate::models::{Actor, ContractId, Decision, StageStatus, VendorId};
use crate::store::MemoryStore;

mod concurrency;
mod gates;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn manager() -> Actor {
    Actor::manager(1)
}

pub fn chairman() -> Actor {
    Actor::chairman(2)
}

pub fn contract_form(vendor_id: VendorId) -> ContractForm {
    ContractForm {
        vendor_id: Some(vendor_id),
        cotton_type: Some("Shankar-6".into()),
        quality: Some("29mm".into()),
        quantity: Some(100.0),
        price: Some(56500.0),
        document_path: None,
        entry_date: Some(date(2025, 10, 1)),
    }
}

pub fn report_form() -> QualityReportForm {
    QualityReportForm {
        variety: Some("Shankar-6".into()),
        price: Some(56500.0),
        report_date: Some(date(2025, 10, 5)),
        report_document_path: None,
        uhml: Some(29.1),
        ui: Some(81.5),
        strength: Some(29.8),
        elongation: Some(5.6),
        mic: Some(4.3),
        rd: Some(76.2),
        plus_b: Some(8.4),
        remarks: None,
    }
}

pub fn sampling_form(start: u32, count: u32) -> SamplingForm {
    SamplingForm {
        sequence_start: Some(start),
        sample_count: Some(count),
        arrival_date: Some(date(2025, 10, 18)),
        lot_number: Some("LOT-7".into()),
    }
}

pub fn cts_form(samples: &[(u32, f64)]) -> CtsForm {
    CtsForm {
        mic_value: Some(4.2),
        strength: Some(29.5),
        uhml: Some(28.9),
        ui_percent: Some(81.0),
        elongation: Some(5.4),
        rd: Some(76.0),
        plus_b: Some(8.1),
        trash_percent: Some(2.5),
        test_date: Some(date(2025, 10, 25)),
        trash_percent_samples: Some(samples.iter().copied().collect::<BTreeMap<_, _>>()),
        ..CtsForm::default()
    }
}

pub fn payment_form(invoice: i64) -> PaymentForm {
    PaymentForm {
        invoice_value: Some(Decimal::from(invoice)),
        cash_discount: None,
        bank_name: Some("State Bank".into()),
        branch: Some("Rajkot".into()),
        account_no: Some("0012345".into()),
        ifsc_code: Some("SBIN0000123".into()),
        payment_mode: None,
        rtgs_reference_no: None,
    }
}

pub fn approve() -> DecisionForm {
    DecisionForm::new(Decision::Approve)
}

pub fn expect_kind<T: std::fmt::Debug>(result: Result<T, WorkflowError>, kind: ErrorKind) {
    match result {
        Err(err) => assert_eq!(err.kind(), kind, "unexpected error: {err}"),
        Ok(value) => panic!("expected {kind} error, got {value:?}"),
    }
}

/// Points of the workflow a fixture contract can be driven to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Point {
    Created,
    Reported,
    QualityApproved,
    Sampled,
    CtsEntered,
    CtsApproved,
    PaymentEntered,
    Closed,
}

pub struct Fixture {
    pub wf: Workflow<MemoryStore>,
    pub vendor: VendorId,
}

impl Point {
    const ORDER: [Point; 7] = [
        Point::Reported,
        Point::QualityApproved,
        Point::Sampled,
        Point::CtsEntered,
        Point::CtsApproved,
        Point::PaymentEntered,
        Point::Closed,
    ];
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_settings(WorkflowSettings::default())
    }

    pub fn with_settings(settings: WorkflowSettings) -> Self {
        let wf = Workflow::new(MemoryStore::new(), settings);
        let vendor = wf
            .register_vendor(VendorForm {
                name: Some("Acme Ginning".into()),
                gst_number: Some("24ABCDE1234F1Z5".into()),
                ..VendorForm::default()
            })
            .unwrap()
            .id;
        Self { wf, vendor }
    }

    pub fn contract_at(&self, point: Point) -> ContractId {
        let id = self
            .wf
            .create_contract(manager(), contract_form(self.vendor))
            .unwrap()
            .contract_id;

        for step in Point::ORDER.into_iter().take_while(|p| *p <= point) {
            self.advance(id, step);
        }
        id
    }

    /// Perform the single action that reaches `to`.
    pub fn advance(&self, id: ContractId, to: Point) {
        let wf = &self.wf;
        let result = match to {
            Point::Created => return,
            Point::Reported => wf.submit_stage2_report(manager(), id, report_form()),
            Point::QualityApproved => wf.decide_stage2(chairman(), id, approve()),
            Point::Sampled => wf.submit_stage3_sampling(manager(), id, sampling_form(1, 3)),
            Point::CtsEntered => {
                wf.submit_stage4_cts(manager(), id, cts_form(&[(1, 2.1), (2, 2.4), (3, 2.2)]))
            }
            Point::CtsApproved => wf.decide_stage4(chairman(), id, approve()),
            Point::PaymentEntered => wf.submit_stage5_payment(manager(), id, payment_form(250_000)),
            Point::Closed => wf.decide_stage5(chairman(), id, approve()),
        };
        result.unwrap();
    }

    pub fn status(&self, id: ContractId) -> (u8, StageStatus) {
        let detail = self.wf.contract_detail(id).unwrap();
        (detail.current.stage, detail.current.status)
    }
}
