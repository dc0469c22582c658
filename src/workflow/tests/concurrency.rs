use super::*;
use std::sync::Barrier;
use std::thread;

#[test]
fn test_concurrent_approvals_accept_exactly_one() {
    let fx = Fixture::new();
    let id = fx.contract_at(Point::Reported);
    let barrier = Barrier::new(8);

    let results: Vec<WorkflowResultKind> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    fx.wf
                        .decide_stage2(chairman(), id, approve())
                        .map_err(|e| e.kind())
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let accepted = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(ErrorKind::Conflict)))
        .count();
    assert_eq!(accepted, 1);
    assert_eq!(conflicts, 7);

    let approvals = fx
        .wf
        .history(id)
        .unwrap()
        .iter()
        .filter(|h| h.action == "Approve")
        .count();
    assert_eq!(approvals, 1);
}

type WorkflowResultKind = Result<TransitionOutcome, ErrorKind>;

#[test]
fn test_independent_contracts_progress_in_parallel() {
    let fx = Fixture::new();
    let ids: Vec<ContractId> = (0..4).map(|_| fx.contract_at(Point::Created)).collect();

    thread::scope(|scope| {
        for &id in &ids {
            let fx = &fx;
            scope.spawn(move || {
                fx.advance(id, Point::Reported);
                fx.advance(id, Point::QualityApproved);
            });
        }
    });

    for id in ids {
        assert_eq!(fx.status(id), (3, StageStatus::PendingSampling));
    }
}
