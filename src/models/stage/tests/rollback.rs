use crate::models::records::Decision;
use crate::models::stage::{derive_stage, DerivedStage, StageStatus};

use super::{decision, records_upto};

#[test]
fn test_modify_requests_rollback() {
    let mut records = records_upto(5);
    records.decision5 = Some(decision(Decision::Modify));
    assert_eq!(
        derive_stage(&records),
        DerivedStage::new(5, StageStatus::RollbackRequested)
    );
}

#[test]
fn test_resubmission_reopens_gate() {
    let mut records = records_upto(5);
    records.decision5 = Some(decision(Decision::Modify));
    assert_eq!(
        derive_stage(&records).status,
        StageStatus::RollbackRequested
    );

    // Resubmission replaces the requisition and deletes the decision row
    records.decision5 = None;
    assert_eq!(
        derive_stage(&records),
        DerivedStage::new(5, StageStatus::PendingChairmanApproval)
    );
}

#[test]
fn test_reject_at_payment_gate_stays_pending() {
    let mut records = records_upto(5);
    records.decision5 = Some(decision(Decision::Reject));
    assert_eq!(
        derive_stage(&records),
        DerivedStage::new(5, StageStatus::PendingChairmanApproval)
    );
}

#[test]
fn test_rollback_without_payment_row() {
    // A Modify decision is checked before the payment row
    let mut records = records_upto(4);
    records.decision4 = Some(decision(Decision::Approve));
    records.decision5 = Some(decision(Decision::Modify));
    assert_eq!(
        derive_stage(&records).status,
        StageStatus::RollbackRequested
    );
}
