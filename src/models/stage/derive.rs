use tracing::debug;

use crate::models::records::{ContractRecords, Decision, DecisionRecord, SampleRecord};

use super::types::{DerivationRule, DerivedStage};

/// Version of the cascade order. Reordering rules changes the status reported
/// for existing data, so any change to the cascade must bump this.
pub const DERIVATION_VERSION: u32 = 1;

fn decided(record: Option<&DecisionRecord>, decision: Decision) -> bool {
    record.is_some_and(|r| r.decision == decision)
}

/// Find the first cascade rule matching the records.
///
/// Later-stage records are trusted to exist only after their predecessor
/// gate passed; that invariant is enforced by the transition validator and
/// not re-checked here. Rejected decisions fall through to the same rule as
/// "no decision yet".
pub fn matching_rule(records: &ContractRecords) -> DerivationRule {
    let decision5 = records.decision5.as_ref();
    let decision4 = records.decision4.as_ref();
    let decision2 = records.decision2.as_ref();
    let sample = records.sample3_4.as_ref();

    if decided(decision5, Decision::Approve) {
        DerivationRule::PaymentApproved
    } else if decided(decision5, Decision::Modify) {
        DerivationRule::PaymentRollback
    } else if records.payment5.is_some() {
        DerivationRule::PaymentEntered
    } else if decided(decision4, Decision::Approve) {
        DerivationRule::CtsApproved
    } else if sample.is_some_and(SampleRecord::has_cts) {
        DerivationRule::CtsEntered
    } else if sample.is_some_and(SampleRecord::has_sampling) {
        DerivationRule::SamplingEntered
    } else if decided(decision2, Decision::Approve) {
        DerivationRule::QualityApproved
    } else if records.report2.is_some() {
        DerivationRule::QualityReported
    } else {
        DerivationRule::Created
    }
}

/// Derive the current stage and status of a contract from its records.
///
/// Pure and total: every combination of records yields exactly one result.
pub fn derive_stage(records: &ContractRecords) -> DerivedStage {
    let rule = matching_rule(records);
    let derived = rule.outcome();
    debug!(rule = rule.index(), stage = derived.stage, status = %derived.status, "derived stage");
    derived
}
