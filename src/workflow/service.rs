use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::WorkflowSettings;
use crate::error::{WorkflowError, WorkflowResult};
use crate::models::{
    derive_stage, Actor, Contract, ContractId, DerivedStage, Gate, HistoryId, Vendor,
};
use crate::sequence::{trash_coverage, SequenceRange};
use crate::store::{Committed, ContractTxn, HistoryDraft, RecordStore};

use super::action::Action;
use super::forms::{
    ContractForm, CtsForm, DecisionForm, PaymentForm, QualityReportForm, SamplingForm,
    VendorForm,
};
use super::validator::{check_precondition, check_role, ActionKind};

/// Result of an accepted transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionOutcome {
    pub contract_id: ContractId,
    pub history_id: HistoryId,
    /// Derived stage before the action; `None` for creation
    pub previous: Option<DerivedStage>,
    pub current: DerivedStage,
}

/// The contract approval workflow over a record store.
///
/// Every mutating method follows the same order of checks: role, payload,
/// contract lookup, stage precondition. Only then does it mutate, inside a
/// single store transaction that also appends the history row.
pub struct Workflow<S: RecordStore> {
    store: S,
    settings: WorkflowSettings,
}

impl<S: RecordStore> Workflow<S> {
    pub fn new(store: S, settings: WorkflowSettings) -> Self {
        Self { store, settings }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &WorkflowSettings {
        &self.settings
    }

    /// Validate and apply one action on behalf of `actor`.
    pub fn attempt_transition(
        &self,
        actor: Actor,
        action: Action,
    ) -> WorkflowResult<TransitionOutcome> {
        let kind = action.kind();
        let target = action.contract_id();

        let result = self.dispatch(actor, action);
        match &result {
            Ok(outcome) => info!(
                action = %kind,
                contract_id = %outcome.contract_id,
                actor = %actor.id,
                stage = outcome.current.stage,
                status = %outcome.current.status,
                "transition accepted"
            ),
            Err(err) => warn!(
                action = %kind,
                contract_id = ?target.map(ContractId::get),
                actor = %actor.id,
                kind = %err.kind(),
                error = %err,
                "transition rejected"
            ),
        }
        result
    }

    fn dispatch(&self, actor: Actor, action: Action) -> WorkflowResult<TransitionOutcome> {
        check_role(action.kind(), actor.role)?;
        let now = Utc::now();

        match action {
            Action::CreateContract(form) => self.apply_create(actor, form),

            Action::SubmitStage2Report(id, form) => {
                let report = form.validate(actor, now)?;
                self.apply(ActionKind::SubmitStage2Report, id, actor, None, move |txn| {
                    txn.upsert_stage2_report(report);
                    Ok(())
                })
            }

            Action::DecideStage2(id, form) => self.apply_decision(Gate::Quality, id, actor, form),
            Action::DecideStage4(id, form) => self.apply_decision(Gate::Cts, id, actor, form),
            Action::DecideStage5(id, form) => self.apply_decision(Gate::Payment, id, actor, form),

            Action::SubmitStage3Sampling(id, form) => {
                let (sampling, _) = form.validate(actor)?;
                self.apply(ActionKind::SubmitStage3Sampling, id, actor, None, move |txn| {
                    txn.upsert_sampling(sampling);
                    Ok(())
                })
            }

            Action::SubmitStage4Cts(id, form) => {
                let cts = form.validate(actor, now)?;
                let strict = self.settings.require_full_trash_coverage;
                self.apply(ActionKind::SubmitStage4Cts, id, actor, None, move |txn| {
                    check_trash_samples(txn, &cts.trash_percent_samples, strict)?;
                    txn.upsert_cts(cts);
                    Ok(())
                })
            }

            Action::SubmitStage5Payment(id, form) => {
                let mut payment = form.validate(actor, now, &self.settings)?;
                self.apply(ActionKind::SubmitStage5Payment, id, actor, None, move |txn| {
                    if let Some(existing) = txn.payment() {
                        payment.created_by = existing.created_by;
                        payment.created_at = existing.created_at;
                    }
                    txn.upsert_payment(payment);
                    txn.delete_stage5_decision();
                    Ok(())
                })
            }
        }
    }

    fn apply_create(&self, actor: Actor, form: ContractForm) -> WorkflowResult<TransitionOutcome> {
        let contract = form.validate(actor)?;
        if self.store.get_vendor(contract.vendor_id)?.is_none() {
            return Err(WorkflowError::vendor_not_found(contract.vendor_id));
        }

        let (action, remarks) = entry_label(ActionKind::CreateContract)?;
        let draft = HistoryDraft::new(1, action, actor).with_remarks(Some(remarks.to_string()));
        let committed = self.store.insert_contract(contract, draft)?;

        outcome(committed.value.id, None, &committed)
    }

    fn apply_decision(
        &self,
        gate: Gate,
        id: ContractId,
        actor: Actor,
        form: DecisionForm,
    ) -> WorkflowResult<TransitionOutcome> {
        let kind = match gate {
            Gate::Quality => ActionKind::DecideStage2,
            Gate::Cts => ActionKind::DecideStage4,
            Gate::Payment => ActionKind::DecideStage5,
        };
        let record = form.validate(gate, actor, Utc::now())?;
        let label = HistoryDraft::new(gate.stage_number(), record.decision.to_string(), actor)
            .with_remarks(record.remarks.clone());

        self.apply(kind, id, actor, Some(label), move |txn| {
            txn.upsert_decision(gate, record);
            Ok(())
        })
    }

    /// Run `mutate` after the stage precondition of `kind`, appending the
    /// history row in the same transaction.
    fn apply<F>(
        &self,
        kind: ActionKind,
        id: ContractId,
        actor: Actor,
        history: Option<HistoryDraft>,
        mutate: F,
    ) -> WorkflowResult<TransitionOutcome>
    where
        F: FnOnce(&mut ContractTxn) -> WorkflowResult<()>,
    {
        let history = match history {
            Some(draft) => draft,
            None => {
                let (action, remarks) = entry_label(kind)?;
                HistoryDraft::new(kind.stage_number(), action, actor)
                    .with_remarks(Some(remarks.to_string()))
            }
        };

        let committed = self.store.transact(id, |txn| {
            let previous = derive_stage(txn.records());
            check_precondition(kind, id, txn.records())?;
            mutate(txn)?;
            txn.append_history(history);
            Ok(previous)
        })?;

        outcome(id, Some(committed.value), &committed)
    }

    pub fn create_contract(
        &self,
        actor: Actor,
        form: ContractForm,
    ) -> WorkflowResult<TransitionOutcome> {
        self.attempt_transition(actor, Action::CreateContract(form))
    }

    pub fn submit_stage2_report(
        &self,
        actor: Actor,
        id: ContractId,
        form: QualityReportForm,
    ) -> WorkflowResult<TransitionOutcome> {
        self.attempt_transition(actor, Action::SubmitStage2Report(id, form))
    }

    pub fn decide_stage2(
        &self,
        actor: Actor,
        id: ContractId,
        form: DecisionForm,
    ) -> WorkflowResult<TransitionOutcome> {
        self.attempt_transition(actor, Action::DecideStage2(id, form))
    }

    pub fn submit_stage3_sampling(
        &self,
        actor: Actor,
        id: ContractId,
        form: SamplingForm,
    ) -> WorkflowResult<TransitionOutcome> {
        self.attempt_transition(actor, Action::SubmitStage3Sampling(id, form))
    }

    pub fn submit_stage4_cts(
        &self,
        actor: Actor,
        id: ContractId,
        form: CtsForm,
    ) -> WorkflowResult<TransitionOutcome> {
        self.attempt_transition(actor, Action::SubmitStage4Cts(id, form))
    }

    pub fn decide_stage4(
        &self,
        actor: Actor,
        id: ContractId,
        form: DecisionForm,
    ) -> WorkflowResult<TransitionOutcome> {
        self.attempt_transition(actor, Action::DecideStage4(id, form))
    }

    pub fn submit_stage5_payment(
        &self,
        actor: Actor,
        id: ContractId,
        form: PaymentForm,
    ) -> WorkflowResult<TransitionOutcome> {
        self.attempt_transition(actor, Action::SubmitStage5Payment(id, form))
    }

    pub fn decide_stage5(
        &self,
        actor: Actor,
        id: ContractId,
        form: DecisionForm,
    ) -> WorkflowResult<TransitionOutcome> {
        self.attempt_transition(actor, Action::DecideStage5(id, form))
    }

    /// Add a vendor. Either role may register vendors.
    pub fn register_vendor(&self, form: VendorForm) -> WorkflowResult<Vendor> {
        let vendor = self.store.insert_vendor(form.validate()?)?;
        info!(vendor_id = %vendor.id, name = %vendor.name, "vendor registered");
        Ok(vendor)
    }

    pub fn list_vendors(&self) -> WorkflowResult<Vec<Vendor>> {
        self.store.list_vendors()
    }

    pub(super) fn require_contract(&self, id: ContractId) -> WorkflowResult<Contract> {
        self.store
            .get_contract(id)?
            .ok_or_else(|| WorkflowError::contract_not_found(id))
    }
}

fn entry_label(kind: ActionKind) -> WorkflowResult<(&'static str, &'static str)> {
    kind.entry_label()
        .ok_or_else(|| WorkflowError::Persistence(format!("{kind} has no history label")))
}

fn outcome<T>(
    contract_id: ContractId,
    previous: Option<DerivedStage>,
    committed: &Committed<T>,
) -> WorkflowResult<TransitionOutcome> {
    let history_id = committed
        .history
        .last()
        .map(|entry| entry.id)
        .ok_or_else(|| {
            WorkflowError::Persistence(format!("contract {contract_id}: no history row recorded"))
        })?;

    Ok(TransitionOutcome {
        contract_id,
        history_id,
        previous,
        current: derive_stage(&committed.records),
    })
}

/// Trash samples must be keyed inside the stored sampling range. Gaps in
/// coverage are rejected only when `strict` is set.
fn check_trash_samples(
    txn: &ContractTxn,
    samples: &std::collections::BTreeMap<u32, f64>,
    strict: bool,
) -> WorkflowResult<()> {
    let Some(sampling) = txn.records().sampling() else {
        return Ok(());
    };
    let range = SequenceRange::parse(&sampling.sequence_start, &sampling.sequence_end)?;
    let coverage = trash_coverage(&range, samples);

    if !coverage.out_of_range.is_empty() {
        return Err(WorkflowError::invalid(
            "trash_percent_samples",
            format!(
                "samples {:?} are outside the sampling range {}..{}",
                coverage.out_of_range,
                range.formatted_start(),
                range.formatted_end()
            ),
        ));
    }

    if !coverage.missing.is_empty() {
        if strict {
            return Err(WorkflowError::invalid(
                "trash_percent_samples",
                format!("missing samples {:?}", coverage.missing),
            ));
        }
        warn!(
            contract_id = %txn.contract().id,
            missing = ?coverage.missing,
            "trash samples do not cover the sampling range"
        );
    }

    Ok(())
}
