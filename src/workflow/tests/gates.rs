use super::*;

#[test]
fn test_forbidden_before_any_other_check() {
    let fx = Fixture::new();
    let id = fx.contract_at(Point::Created);

    // Wrong role on a missing contract with an empty payload: role wins.
    expect_kind(
        fx.wf
            .decide_stage2(manager(), ContractId::new(999), DecisionForm::default()),
        ErrorKind::Forbidden,
    );
    expect_kind(
        fx.wf.submit_stage2_report(chairman(), id, report_form()),
        ErrorKind::Forbidden,
    );

    assert_eq!(fx.wf.history(id).unwrap().len(), 1);
    assert_eq!(fx.status(id), (2, StageStatus::PendingQualityEntry));
}

#[test]
fn test_validation_before_lookup() {
    let fx = Fixture::new();
    expect_kind(
        fx.wf
            .decide_stage2(chairman(), ContractId::new(999), DecisionForm::default()),
        ErrorKind::Validation,
    );
    expect_kind(
        fx.wf.decide_stage2(chairman(), ContractId::new(999), approve()),
        ErrorKind::NotFound,
    );
}

#[test]
fn test_create_requires_existing_vendor() {
    let fx = Fixture::new();
    expect_kind(
        fx.wf.create_contract(manager(), contract_form(VendorId::new(404))),
        ErrorKind::NotFound,
    );
    assert!(fx.wf.list_contracts().unwrap().is_empty());
}

#[test]
fn test_sampling_without_quality_approval_conflicts() {
    let fx = Fixture::new();
    let id = fx.contract_at(Point::Reported);

    expect_kind(
        fx.wf.submit_stage3_sampling(manager(), id, sampling_form(1, 10)),
        ErrorKind::Conflict,
    );
    assert!(fx.wf.contract_detail(id).unwrap().records.sample3_4.is_none());
}

#[test]
fn test_decide_without_submission_conflicts() {
    let fx = Fixture::new();
    let id = fx.contract_at(Point::Created);
    expect_kind(fx.wf.decide_stage2(chairman(), id, approve()), ErrorKind::Conflict);

    let id = fx.contract_at(Point::Sampled);
    expect_kind(fx.wf.decide_stage4(chairman(), id, approve()), ErrorKind::Conflict);

    let id = fx.contract_at(Point::CtsApproved);
    expect_kind(fx.wf.decide_stage5(chairman(), id, approve()), ErrorKind::Conflict);
}

#[test]
fn test_cts_requires_sampling() {
    let fx = Fixture::new();
    let id = fx.contract_at(Point::QualityApproved);
    expect_kind(
        fx.wf.submit_stage4_cts(manager(), id, cts_form(&[])),
        ErrorKind::Conflict,
    );
}

#[test]
fn test_payment_requires_cts_approval() {
    let fx = Fixture::new();
    let id = fx.contract_at(Point::CtsEntered);
    expect_kind(
        fx.wf.submit_stage5_payment(manager(), id, payment_form(1000)),
        ErrorKind::Conflict,
    );
}

#[test]
fn test_second_approve_conflicts_and_keeps_row() {
    let fx = Fixture::new();
    let id = fx.contract_at(Point::QualityApproved);
    let before = fx.wf.contract_detail(id).unwrap().records.decision2;

    expect_kind(
        fx.wf
            .decide_stage2(chairman(), id, approve().with_remarks("again")),
        ErrorKind::Conflict,
    );

    let after = fx.wf.contract_detail(id).unwrap().records.decision2;
    assert_eq!(before, after);
}

#[test]
fn test_reject_twice_is_idempotent() {
    let fx = Fixture::new();
    let id = fx.contract_at(Point::Reported);
    let reject = DecisionForm::new(Decision::Reject).with_remarks("staple too short");

    let first = fx.wf.decide_stage2(chairman(), id, reject.clone()).unwrap();
    let second = fx.wf.decide_stage2(chairman(), id, reject).unwrap();

    assert_eq!(first.current, second.current);
    assert_eq!(second.current.status, StageStatus::PendingChairmanApproval);

    let decision = fx.wf.contract_detail(id).unwrap().records.decision2.unwrap();
    assert_eq!(decision.decision, Decision::Reject);
    assert_eq!(decision.remarks.as_deref(), Some("staple too short"));
}

#[test]
fn test_reject_then_resubmit_then_approve() {
    let fx = Fixture::new();
    let id = fx.contract_at(Point::Reported);

    fx.wf
        .decide_stage2(chairman(), id, DecisionForm::new(Decision::Reject))
        .unwrap();
    fx.wf.submit_stage2_report(manager(), id, report_form()).unwrap();
    let outcome = fx.wf.decide_stage2(chairman(), id, approve()).unwrap();

    assert_eq!(outcome.current.status, StageStatus::PendingSampling);
}

#[test]
fn test_report_locked_after_approval() {
    let fx = Fixture::new();
    let id = fx.contract_at(Point::QualityApproved);
    expect_kind(
        fx.wf.submit_stage2_report(manager(), id, report_form()),
        ErrorKind::Conflict,
    );
}

#[test]
fn test_modify_rejected_at_cts_gate() {
    let fx = Fixture::new();
    let id = fx.contract_at(Point::CtsEntered);
    expect_kind(
        fx.wf
            .decide_stage4(chairman(), id, DecisionForm::new(Decision::Modify)),
        ErrorKind::Validation,
    );
    assert!(fx.wf.contract_detail(id).unwrap().records.decision4.is_none());
}

#[test]
fn test_closed_contract_rejects_payment_resubmission() {
    let fx = Fixture::new();
    let id = fx.contract_at(Point::Closed);

    expect_kind(
        fx.wf.submit_stage5_payment(manager(), id, payment_form(1000)),
        ErrorKind::Conflict,
    );
    expect_kind(fx.wf.decide_stage5(chairman(), id, approve()), ErrorKind::Conflict);
    assert_eq!(fx.status(id), (6, StageStatus::Closed));
}
