//! Record store interface
//!
//! The workflow core reads and writes stage records only through
//! [`RecordStore`]. Every mutation of an existing contract goes through
//! [`RecordStore::transact`], which hands the caller a [`ContractTxn`] working
//! copy under the contract's lock and commits it only if the closure returns
//! `Ok`. History rows appended inside the transaction commit with it.

pub mod file;
pub mod memory;

use chrono::{DateTime, Utc};

use crate::error::WorkflowResult;
use crate::models::{
    Actor, Contract, ContractId, ContractRecords, CtsResults, DecisionRecord, Gate, HistoryEntry,
    NewContract, NewVendor, PaymentRequisition, SampleRecord, Sampling, Stage2Report, Vendor,
    VendorId,
};

pub use file::FileStore;
pub use memory::MemoryStore;

pub trait RecordStore: Send + Sync {
    fn insert_vendor(&self, vendor: NewVendor) -> WorkflowResult<Vendor>;

    fn get_vendor(&self, id: VendorId) -> WorkflowResult<Option<Vendor>>;

    /// All vendors, ordered by name
    fn list_vendors(&self) -> WorkflowResult<Vec<Vendor>>;

    /// Insert a contract together with its stage 1 history row.
    fn insert_contract(
        &self,
        contract: NewContract,
        history: HistoryDraft,
    ) -> WorkflowResult<Committed<Contract>>;

    fn get_contract(&self, id: ContractId) -> WorkflowResult<Option<Contract>>;

    /// All contracts, newest (highest id) first
    fn list_contracts(&self) -> WorkflowResult<Vec<Contract>>;

    /// One aggregate read of every stage record of a contract.
    fn load_records(&self, id: ContractId) -> WorkflowResult<ContractRecords>;

    /// History rows of a contract in insertion order
    fn history(&self, id: ContractId) -> WorkflowResult<Vec<HistoryEntry>>;

    /// Run `f` as one atomic read-modify-write over a contract's records.
    ///
    /// Fails with `NotFound` if the contract does not exist. Nothing is
    /// written when `f` returns an error.
    fn transact<T, F>(&self, id: ContractId, f: F) -> WorkflowResult<Committed<T>>
    where
        F: FnOnce(&mut ContractTxn) -> WorkflowResult<T>;
}

/// Result of a committed transaction
#[derive(Debug, Clone)]
pub struct Committed<T> {
    pub value: T,
    /// History rows appended by the transaction, with ids assigned
    pub history: Vec<HistoryEntry>,
    /// Record set as committed
    pub records: ContractRecords,
}

/// A history row before the store assigns its id
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryDraft {
    pub stage_number: u8,
    pub action: String,
    pub actor: Actor,
    pub remarks: Option<String>,
}

impl HistoryDraft {
    pub fn new(stage_number: u8, action: impl Into<String>, actor: Actor) -> Self {
        Self {
            stage_number,
            action: action.into(),
            actor,
            remarks: None,
        }
    }

    pub fn with_remarks(mut self, remarks: Option<String>) -> Self {
        self.remarks = remarks;
        self
    }

    pub(crate) fn into_entry(
        self,
        id: crate::models::HistoryId,
        contract_id: ContractId,
        at: DateTime<Utc>,
    ) -> HistoryEntry {
        HistoryEntry {
            id,
            contract_id,
            stage_number: self.stage_number,
            action: self.action,
            performed_by: self.actor.id,
            remarks: self.remarks,
            action_date: at,
        }
    }
}

/// Working copy of one contract's records inside a transaction.
///
/// One get/upsert pair per stage entity. Upserts overwrite every field of
/// the existing row.
#[derive(Debug)]
pub struct ContractTxn {
    contract: Contract,
    records: ContractRecords,
    history: Vec<HistoryDraft>,
    now: DateTime<Utc>,
    dirty: bool,
}

impl ContractTxn {
    pub(crate) fn begin(contract: Contract, records: ContractRecords, now: DateTime<Utc>) -> Self {
        Self {
            contract,
            records,
            history: Vec::new(),
            now,
            dirty: false,
        }
    }

    /// Consume the transaction. `updated_at` is touched when anything changed.
    pub(crate) fn finish(mut self) -> TxnChanges {
        if self.dirty {
            self.contract.updated_at = self.now;
        }
        TxnChanges {
            contract: self.contract,
            records: self.records,
            history: self.history,
            now: self.now,
            dirty: self.dirty,
        }
    }

    /// Timestamp shared by every write in this transaction
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn records(&self) -> &ContractRecords {
        &self.records
    }

    pub fn stage2_report(&self) -> Option<&Stage2Report> {
        self.records.report2.as_ref()
    }

    pub fn upsert_stage2_report(&mut self, report: Stage2Report) {
        self.records.report2 = Some(report);
        self.dirty = true;
    }

    pub fn decision(&self, gate: Gate) -> Option<&DecisionRecord> {
        self.records.decision(gate)
    }

    pub fn upsert_decision(&mut self, gate: Gate, decision: DecisionRecord) {
        let slot = match gate {
            Gate::Quality => &mut self.records.decision2,
            Gate::Cts => &mut self.records.decision4,
            Gate::Payment => &mut self.records.decision5,
        };
        *slot = Some(decision);
        self.dirty = true;
    }

    pub fn delete_stage5_decision(&mut self) -> Option<DecisionRecord> {
        let removed = self.records.decision5.take();
        if removed.is_some() {
            self.dirty = true;
        }
        removed
    }

    pub fn sample(&self) -> Option<&SampleRecord> {
        self.records.sample3_4.as_ref()
    }

    /// Write the sampling fields, creating the merged stage 3/4 row if needed.
    pub fn upsert_sampling(&mut self, sampling: Sampling) {
        self.records
            .sample3_4
            .get_or_insert_with(SampleRecord::default)
            .sampling = Some(sampling);
        self.dirty = true;
    }

    /// Write the CTS fields onto the merged stage 3/4 row.
    pub fn upsert_cts(&mut self, cts: CtsResults) {
        self.records
            .sample3_4
            .get_or_insert_with(SampleRecord::default)
            .cts = Some(cts);
        self.dirty = true;
    }

    pub fn payment(&self) -> Option<&PaymentRequisition> {
        self.records.payment5.as_ref()
    }

    pub fn upsert_payment(&mut self, payment: PaymentRequisition) {
        self.records.payment5 = Some(payment);
        self.dirty = true;
    }

    pub fn append_history(&mut self, draft: HistoryDraft) {
        self.history.push(draft);
        self.dirty = true;
    }
}

/// Everything a store needs to persist after a successful transaction
#[derive(Debug)]
pub(crate) struct TxnChanges {
    pub contract: Contract,
    pub records: ContractRecords,
    pub history: Vec<HistoryDraft>,
    pub now: DateTime<Utc>,
    pub dirty: bool,
}
