//! In-memory record store
//!
//! Each contract lives behind its own mutex, so transactions on different
//! contracts never contend. The outer map lock is only held long enough to
//! look up or insert an entry.

use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use crate::error::{WorkflowError, WorkflowResult};
use crate::models::{
    Contract, ContractId, ContractRecords, HistoryEntry, HistoryId, NewContract, NewVendor, Vendor,
    VendorId,
};

use super::{Committed, ContractTxn, HistoryDraft, RecordStore};

#[derive(Debug)]
struct ContractEntry {
    contract: Contract,
    records: ContractRecords,
    history: Vec<HistoryEntry>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    vendors: RwLock<BTreeMap<VendorId, Vendor>>,
    contracts: RwLock<BTreeMap<ContractId, Arc<Mutex<ContractEntry>>>>,
    next_vendor: AtomicU64,
    next_contract: AtomicU64,
    next_history: AtomicU64,
}

fn poisoned<T>(_: T) -> WorkflowError {
    WorkflowError::Persistence("in-memory store lock poisoned".to_string())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(counter: &AtomicU64) -> u64 {
        counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn entry(&self, id: ContractId) -> WorkflowResult<Arc<Mutex<ContractEntry>>> {
        let contracts = self.contracts.read().map_err(poisoned)?;
        contracts
            .get(&id)
            .cloned()
            .ok_or_else(|| WorkflowError::contract_not_found(id))
    }

    fn lock(entry: &Mutex<ContractEntry>) -> WorkflowResult<MutexGuard<'_, ContractEntry>> {
        entry.lock().map_err(poisoned)
    }
}

impl RecordStore for MemoryStore {
    fn insert_vendor(&self, vendor: NewVendor) -> WorkflowResult<Vendor> {
        let id = VendorId::new(Self::allocate(&self.next_vendor));
        let vendor = vendor.into_vendor(id, Utc::now());
        self.vendors
            .write()
            .map_err(poisoned)?
            .insert(id, vendor.clone());
        Ok(vendor)
    }

    fn get_vendor(&self, id: VendorId) -> WorkflowResult<Option<Vendor>> {
        Ok(self.vendors.read().map_err(poisoned)?.get(&id).cloned())
    }

    fn list_vendors(&self) -> WorkflowResult<Vec<Vendor>> {
        let mut vendors: Vec<Vendor> = self
            .vendors
            .read()
            .map_err(poisoned)?
            .values()
            .cloned()
            .collect();
        vendors.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(vendors)
    }

    fn insert_contract(
        &self,
        contract: NewContract,
        history: HistoryDraft,
    ) -> WorkflowResult<Committed<Contract>> {
        let now = Utc::now();
        let id = ContractId::new(Self::allocate(&self.next_contract));
        let contract = contract.into_contract(id, now);
        let entry = history.into_entry(HistoryId::new(Self::allocate(&self.next_history)), id, now);

        self.contracts.write().map_err(poisoned)?.insert(
            id,
            Arc::new(Mutex::new(ContractEntry {
                contract: contract.clone(),
                records: ContractRecords::default(),
                history: vec![entry.clone()],
            })),
        );

        Ok(Committed {
            value: contract,
            history: vec![entry],
            records: ContractRecords::default(),
        })
    }

    fn get_contract(&self, id: ContractId) -> WorkflowResult<Option<Contract>> {
        match self.entry(id) {
            Ok(entry) => Ok(Some(Self::lock(&entry)?.contract.clone())),
            Err(WorkflowError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn list_contracts(&self) -> WorkflowResult<Vec<Contract>> {
        let entries: Vec<Arc<Mutex<ContractEntry>>> = self
            .contracts
            .read()
            .map_err(poisoned)?
            .values()
            .rev()
            .cloned()
            .collect();

        entries
            .iter()
            .map(|entry| -> WorkflowResult<Contract> { Ok(Self::lock(entry)?.contract.clone()) })
            .collect()
    }

    fn load_records(&self, id: ContractId) -> WorkflowResult<ContractRecords> {
        let entry = self.entry(id)?;
        let records = Self::lock(&entry)?.records.clone();
        Ok(records)
    }

    fn history(&self, id: ContractId) -> WorkflowResult<Vec<HistoryEntry>> {
        let entry = self.entry(id)?;
        let history = Self::lock(&entry)?.history.clone();
        Ok(history)
    }

    fn transact<T, F>(&self, id: ContractId, f: F) -> WorkflowResult<Committed<T>>
    where
        F: FnOnce(&mut ContractTxn) -> WorkflowResult<T>,
    {
        let entry = self.entry(id)?;
        let mut guard = Self::lock(&entry)?;

        let mut txn = ContractTxn::begin(guard.contract.clone(), guard.records.clone(), Utc::now());
        let value = f(&mut txn)?;
        let changes = txn.finish();

        let history: Vec<HistoryEntry> = changes
            .history
            .into_iter()
            .map(|draft| {
                let history_id = HistoryId::new(Self::allocate(&self.next_history));
                draft.into_entry(history_id, id, changes.now)
            })
            .collect();

        if changes.dirty {
            guard.contract = changes.contract;
            guard.records = changes.records.clone();
            guard.history.extend(history.iter().cloned());
        }

        Ok(Committed {
            value,
            history,
            records: changes.records,
        })
    }
}
