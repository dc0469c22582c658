use cottonflow::models::{Decision, DerivedStage, StageStatus};
use cottonflow::workflow::DecisionForm;
use cottonflow::ErrorKind;

use super::helpers::*;

#[test]
fn test_create_through_sampling() {
    let env = TestEnv::new();
    let wf = env.workflow();
    let vendor = register_vendor(&wf);
    let id = create_contract(&env, &wf, vendor);

    let outcome = wf.submit_stage2_report(env.manager(), id, report()).unwrap();
    assert_eq!(
        outcome.current,
        DerivedStage::new(2, StageStatus::PendingChairmanApproval)
    );

    let outcome = wf
        .decide_stage2(env.chairman(), id, DecisionForm::new(Decision::Approve))
        .unwrap();
    assert_eq!(
        outcome.current,
        DerivedStage::new(3, StageStatus::PendingSampling)
    );

    let outcome = wf
        .submit_stage3_sampling(env.manager(), id, sampling(1, 10))
        .unwrap();
    assert_eq!(
        outcome.current,
        DerivedStage::new(4, StageStatus::PendingCtsEntry)
    );

    let detail = wf.contract_detail(id).unwrap();
    let stored = detail.records.sampling().unwrap();
    assert_eq!(stored.sequence_start, "1/25-26");
    assert_eq!(stored.sequence_end, "10/25-26");
}

#[test]
fn test_full_lifecycle_closes_after_rollback() {
    let env = TestEnv::new();
    let wf = env.workflow();
    let vendor = register_vendor(&wf);
    let id = create_contract(&env, &wf, vendor);
    let approve = || DecisionForm::new(Decision::Approve);

    wf.submit_stage2_report(env.manager(), id, report()).unwrap();
    wf.decide_stage2(env.chairman(), id, approve()).unwrap();
    wf.submit_stage3_sampling(env.manager(), id, sampling(5, 3)).unwrap();
    wf.submit_stage4_cts(env.manager(), id, cts(&[5, 6, 7])).unwrap();
    wf.decide_stage4(env.chairman(), id, approve()).unwrap();
    wf.submit_stage5_payment(env.manager(), id, payment(1_430_000))
        .unwrap();

    let outcome = wf
        .decide_stage5(
            env.chairman(),
            id,
            DecisionForm::new(Decision::Modify).with_remarks("add RTGS reference"),
        )
        .unwrap();
    assert_eq!(outcome.current.status, StageStatus::RollbackRequested);
    assert_eq!(wf.summary().unwrap().attention, 1);

    let mut corrected = payment(1_430_000);
    corrected.rtgs_reference_no = Some("BARBR52025102400001".into());
    let outcome = wf.submit_stage5_payment(env.manager(), id, corrected).unwrap();
    assert_eq!(
        outcome.current,
        DerivedStage::new(5, StageStatus::PendingChairmanApproval)
    );

    let outcome = wf.decide_stage5(env.chairman(), id, approve()).unwrap();
    assert_eq!(outcome.current, DerivedStage::new(6, StageStatus::Closed));

    let view = wf.payment_details(id).unwrap().unwrap();
    assert_eq!(view.tds_amount.to_string(), "1430.00");
    assert_eq!(view.net_amount_paid.to_string(), "1428570.00");
    assert_eq!(view.lot_no.as_deref(), Some("5/25-26"));

    let history = wf.history(id).unwrap();
    assert_eq!(history.len(), 10);
    assert_eq!(history.last().unwrap().action, "Approve");

    let err = wf
        .submit_stage5_payment(env.manager(), id, payment(1))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[test]
fn test_roles_enforced_through_directory() {
    let env = TestEnv::new();
    let wf = env.workflow();
    let vendor = register_vendor(&wf);
    let id = create_contract(&env, &wf, vendor);
    wf.submit_stage2_report(env.manager(), id, report()).unwrap();

    let err = wf
        .decide_stage2(env.manager(), id, DecisionForm::new(Decision::Approve))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    assert_eq!(env.users.resolve("auditor").unwrap_err().kind(), ErrorKind::Forbidden);
}
