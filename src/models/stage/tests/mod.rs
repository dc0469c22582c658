use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::models::records::{
    ContractRecords, CtsResults, Decision, DecisionRecord, PaymentRequisition, QualityAverages,
    SampleRecord, Sampling, Stage2Report,
};
use crate::models::UserId;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn decision(decision: Decision) -> DecisionRecord {
    DecisionRecord {
        decision,
        remarks: None,
        decided_by: UserId::new(2),
        decided_at: Utc.with_ymd_and_hms(2025, 10, 20, 9, 0, 0).unwrap(),
    }
}

fn report() -> Stage2Report {
    Stage2Report {
        variety: "Shankar-6".to_string(),
        price: 52000.0,
        report_date: date(2025, 10, 15),
        report_document_path: None,
        averages: QualityAverages {
            uhml: 29.1,
            ui: 81.5,
            strength: 29.8,
            elongation: 5.6,
            mic: 4.2,
            rd: 76.0,
            plus_b: 8.9,
        },
        remarks: None,
        entered_by: UserId::new(1),
        uploaded_at: Utc.with_ymd_and_hms(2025, 10, 15, 12, 0, 0).unwrap(),
    }
}

fn sampling() -> Sampling {
    Sampling {
        sequence_start: "1/25-26".to_string(),
        sequence_end: "10/25-26".to_string(),
        lot_number: Some("LOT-7".to_string()),
        arrival_date: date(2025, 10, 18),
        entered_by: UserId::new(1),
    }
}

fn cts() -> CtsResults {
    CtsResults {
        mic_value: 4.3,
        strength: 29.5,
        uhml: 29.0,
        ui_percent: 81.0,
        sfi: None,
        elongation: 5.5,
        rd: 75.5,
        plus_b: 9.0,
        colour_grade: Some("31-1".to_string()),
        mat: None,
        sci: Some(140),
        trash_percent: 2.1,
        moisture_percent: None,
        test_date: date(2025, 10, 22),
        confirmation_date: None,
        remarks: None,
        report_document_path: None,
        trash_percent_samples: BTreeMap::new(),
        entered_by: UserId::new(1),
        entered_at: Utc.with_ymd_and_hms(2025, 10, 22, 15, 0, 0).unwrap(),
    }
}

fn payment() -> PaymentRequisition {
    let now = Utc.with_ymd_and_hms(2025, 10, 25, 10, 0, 0).unwrap();
    PaymentRequisition {
        invoice_value: Decimal::new(1_000_000, 2),
        tds_amount: Decimal::new(1_000, 2),
        cash_discount: Decimal::ZERO,
        net_amount_paid: Decimal::new(999_000, 2),
        bank_name: "State Bank".to_string(),
        branch: "Rajkot".to_string(),
        account_no: "001122".to_string(),
        ifsc_code: "SBIN0001".to_string(),
        payment_mode: "RTGS".to_string(),
        rtgs_reference_no: None,
        created_by: UserId::new(1),
        created_at: now,
        updated_at: now,
    }
}

/// Records for a contract that has passed every gate up to and including `upto`.
///
/// Stage numbers follow the glossary: 2 quality report, 3 sampling, 4 CTS,
/// 5 payment. Each gate's decision is added as Approve when the next stage
/// is included.
fn records_upto(upto: u8) -> ContractRecords {
    let mut records = ContractRecords::default();
    if upto >= 2 {
        records.report2 = Some(report());
    }
    if upto >= 3 {
        records.decision2 = Some(decision(Decision::Approve));
        records.sample3_4 = Some(SampleRecord {
            sampling: Some(sampling()),
            cts: None,
        });
    }
    if upto >= 4 {
        if let Some(sample) = records.sample3_4.as_mut() {
            sample.cts = Some(cts());
        }
    }
    if upto >= 5 {
        records.decision4 = Some(decision(Decision::Approve));
        records.payment5 = Some(payment());
    }
    records
}

mod rollback;
