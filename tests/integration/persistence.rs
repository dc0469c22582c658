use std::thread;

use cottonflow::models::{Decision, StageStatus};
use cottonflow::store::RecordStore;
use cottonflow::workflow::DecisionForm;
use cottonflow::ErrorKind;

use super::helpers::*;

#[test]
fn test_state_survives_reopen() {
    let env = TestEnv::new();
    let id = {
        let wf = env.workflow();
        let vendor = register_vendor(&wf);
        let id = create_contract(&env, &wf, vendor);
        wf.submit_stage2_report(env.manager(), id, report()).unwrap();
        id
    };

    let wf = env.workflow();
    let rows = wf.list_contracts().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].contract.id, id);
    assert_eq!(rows[0].current.status, StageStatus::PendingChairmanApproval);
    assert_eq!(rows[0].vendor_name.as_deref(), Some("Saurashtra Ginners"));
    assert_eq!(wf.history(id).unwrap().len(), 2);
}

#[test]
fn test_failed_action_leaves_document_untouched() {
    let env = TestEnv::new();
    let wf = env.workflow();
    let vendor = register_vendor(&wf);
    let id = create_contract(&env, &wf, vendor);

    let path = env.data_dir.contracts_dir().join(format!("{id}.json"));
    let before = std::fs::read_to_string(&path).unwrap();

    let err = wf
        .submit_stage3_sampling(env.manager(), id, sampling(1, 10))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_concurrent_decisions_on_separate_handles() {
    let env = TestEnv::new();
    let id = {
        let wf = env.workflow();
        let vendor = register_vendor(&wf);
        let id = create_contract(&env, &wf, vendor);
        wf.submit_stage2_report(env.manager(), id, report()).unwrap();
        id
    };

    let results: Vec<Result<(), ErrorKind>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let env = &env;
                scope.spawn(move || {
                    let wf = env.workflow();
                    wf.decide_stage2(env.chairman(), id, DecisionForm::new(Decision::Approve))
                        .map(|_| ())
                        .map_err(|e| e.kind())
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .all(|r| r.is_ok() || *r == Err(ErrorKind::Conflict)));

    let wf = env.workflow();
    let approvals = wf
        .store()
        .history(id)
        .unwrap()
        .into_iter()
        .filter(|h| h.action == "Approve")
        .count();
    assert_eq!(approvals, 1);
}

#[test]
fn test_ids_keep_increasing_across_handles() {
    let env = TestEnv::new();
    let first = {
        let wf = env.workflow();
        let vendor = register_vendor(&wf);
        create_contract(&env, &wf, vendor)
    };

    let wf = env.workflow();
    let vendor = wf.list_vendors().unwrap()[0].id;
    let second = create_contract(&env, &wf, vendor);
    assert!(second > first);
    assert!(env.temp.path().join(".cottonflow/counters.json").exists());
}
