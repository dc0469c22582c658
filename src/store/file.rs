//! File-backed record store
//!
//! Layout under the data directory:
//! - `contracts/{id}.json` - contract, stage records and history in one document
//! - `contracts/{id}.lock` - advisory lock guarding that document
//! - `vendors.json`, `counters.json` - guarded by `registry.lock`
//!
//! A transaction holds the contract's exclusive lock for the whole
//! read-modify-write and publishes the document with an atomic rename, so
//! the stage rows and the history rows of one action land together.
//! Lock order is always contract lock before registry lock.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

use crate::error::{WorkflowError, WorkflowResult};
use crate::fs::locking::{atomic_write, read_if_exists, FileLock};
use crate::fs::DataDir;
use crate::models::{
    Contract, ContractId, ContractRecords, HistoryEntry, HistoryId, NewContract, NewVendor, Vendor,
    VendorId,
};

use super::{Committed, ContractTxn, HistoryDraft, RecordStore};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ContractDocument {
    contract: Contract,
    #[serde(default)]
    records: ContractRecords,
    #[serde(default)]
    history: Vec<HistoryEntry>,
}

/// Last allocated id per entity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Counters {
    #[serde(default)]
    vendor: u64,
    #[serde(default)]
    contract: u64,
    #[serde(default)]
    history: u64,
}

#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: DataDir,
}

impl FileStore {
    /// Open a store rooted at `data_dir`, creating the layout if missing.
    pub fn open(data_dir: DataDir) -> Result<Self> {
        data_dir.ensure()?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &DataDir {
        &self.data_dir
    }

    fn document_path(&self, id: ContractId) -> PathBuf {
        self.data_dir.contracts_dir().join(format!("{id}.json"))
    }

    fn lock_path(&self, id: ContractId) -> PathBuf {
        self.data_dir.contracts_dir().join(format!("{id}.lock"))
    }

    fn read_document(&self, id: ContractId) -> Result<Option<ContractDocument>> {
        let path = self.document_path(id);
        let Some(content) = read_if_exists(&path)? else {
            return Ok(None);
        };
        let document = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse contract document: {}", path.display()))?;
        Ok(Some(document))
    }

    fn write_document(&self, document: &ContractDocument) -> Result<()> {
        let path = self.document_path(document.contract.id);
        let content = serde_json::to_string_pretty(document)
            .with_context(|| format!("Failed to serialize contract {}", document.contract.id))?;
        atomic_write(&path, &content)
    }

    /// Read a document under the shared lock. `None` if the contract does not exist.
    fn read_locked(&self, id: ContractId) -> Result<Option<ContractDocument>> {
        if !self.document_path(id).exists() {
            return Ok(None);
        }
        let _lock = FileLock::shared(&self.lock_path(id))?;
        self.read_document(id)
    }

    fn load_counters(&self) -> Result<Counters> {
        let path = self.data_dir.counters_path();
        match read_if_exists(&path)? {
            Some(content) => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse counters: {}", path.display())),
            None => Ok(Counters::default()),
        }
    }

    fn save_counters(&self, counters: &Counters) -> Result<()> {
        let content =
            serde_json::to_string_pretty(counters).context("Failed to serialize counters")?;
        atomic_write(&self.data_dir.counters_path(), &content)
    }

    /// Allocate ids under the registry lock.
    fn allocate<T>(&self, f: impl FnOnce(&mut Counters) -> T) -> Result<T> {
        let _lock = FileLock::exclusive(&self.data_dir.registry_lock_path())?;
        let mut counters = self.load_counters()?;
        let allocated = f(&mut counters);
        self.save_counters(&counters)?;
        Ok(allocated)
    }

    fn allocate_history_ids(&self, count: usize) -> Result<Vec<HistoryId>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        self.allocate(|counters| {
            (0..count)
                .map(|_| {
                    counters.history += 1;
                    HistoryId::new(counters.history)
                })
                .collect()
        })
    }

    fn load_vendors(&self) -> Result<Vec<Vendor>> {
        let path = self.data_dir.vendors_path();
        match read_if_exists(&path)? {
            Some(content) => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse vendors: {}", path.display())),
            None => Ok(Vec::new()),
        }
    }

    fn insert_vendor_inner(&self, vendor: NewVendor) -> Result<Vendor> {
        let _lock = FileLock::exclusive(&self.data_dir.registry_lock_path())?;
        let mut counters = self.load_counters()?;
        let mut vendors = self.load_vendors()?;

        counters.vendor += 1;
        let vendor = vendor.into_vendor(VendorId::new(counters.vendor), Utc::now());
        vendors.push(vendor.clone());

        let content =
            serde_json::to_string_pretty(&vendors).context("Failed to serialize vendors")?;
        atomic_write(&self.data_dir.vendors_path(), &content)?;
        self.save_counters(&counters)?;
        Ok(vendor)
    }

    fn list_vendors_inner(&self) -> Result<Vec<Vendor>> {
        let _lock = FileLock::shared(&self.data_dir.registry_lock_path())?;
        let mut vendors = self.load_vendors()?;
        vendors.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(vendors)
    }

    fn insert_contract_inner(
        &self,
        contract: NewContract,
        history: HistoryDraft,
    ) -> Result<Committed<Contract>> {
        let (contract_id, history_id) = self.allocate(|counters| {
            counters.contract += 1;
            counters.history += 1;
            (
                ContractId::new(counters.contract),
                HistoryId::new(counters.history),
            )
        })?;

        let now = Utc::now();
        let contract = contract.into_contract(contract_id, now);
        let entry = history.into_entry(history_id, contract_id, now);
        let document = ContractDocument {
            contract: contract.clone(),
            records: ContractRecords::default(),
            history: vec![entry.clone()],
        };

        let _lock = FileLock::exclusive(&self.lock_path(contract_id))?;
        self.write_document(&document)?;

        Ok(Committed {
            value: contract,
            history: vec![entry],
            records: ContractRecords::default(),
        })
    }

    fn contract_ids(&self) -> Result<Vec<ContractId>> {
        let dir = self.data_dir.contracts_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&dir)
            .with_context(|| format!("Failed to read contracts directory: {}", dir.display()))?;

        let mut ids = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            match path.file_stem().and_then(|s| s.to_str()).map(str::parse::<ContractId>) {
                Some(Ok(id)) => ids.push(id),
                _ => warn!(path = %path.display(), "skipping unrecognized contract file"),
            }
        }
        ids.sort_unstable_by(|a, b| b.cmp(a));
        Ok(ids)
    }
}

impl RecordStore for FileStore {
    fn insert_vendor(&self, vendor: NewVendor) -> WorkflowResult<Vendor> {
        self.insert_vendor_inner(vendor)
            .map_err(WorkflowError::persistence)
    }

    fn get_vendor(&self, id: VendorId) -> WorkflowResult<Option<Vendor>> {
        let vendors = self
            .list_vendors_inner()
            .map_err(WorkflowError::persistence)?;
        Ok(vendors.into_iter().find(|v| v.id == id))
    }

    fn list_vendors(&self) -> WorkflowResult<Vec<Vendor>> {
        self.list_vendors_inner()
            .map_err(WorkflowError::persistence)
    }

    fn insert_contract(
        &self,
        contract: NewContract,
        history: HistoryDraft,
    ) -> WorkflowResult<Committed<Contract>> {
        self.insert_contract_inner(contract, history)
            .map_err(WorkflowError::persistence)
    }

    fn get_contract(&self, id: ContractId) -> WorkflowResult<Option<Contract>> {
        let document = self.read_locked(id).map_err(WorkflowError::persistence)?;
        Ok(document.map(|d| d.contract))
    }

    /// Files whose names are not contract ids are skipped. A contract
    /// document that fails to load fails the whole listing.
    fn list_contracts(&self) -> WorkflowResult<Vec<Contract>> {
        let ids = self.contract_ids().map_err(WorkflowError::persistence)?;
        let mut contracts = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(document) = self.read_locked(id).map_err(WorkflowError::persistence)? {
                contracts.push(document.contract);
            }
        }
        Ok(contracts)
    }

    fn load_records(&self, id: ContractId) -> WorkflowResult<ContractRecords> {
        self.read_locked(id)
            .map_err(WorkflowError::persistence)?
            .map(|d| d.records)
            .ok_or_else(|| WorkflowError::contract_not_found(id))
    }

    fn history(&self, id: ContractId) -> WorkflowResult<Vec<HistoryEntry>> {
        self.read_locked(id)
            .map_err(WorkflowError::persistence)?
            .map(|d| d.history)
            .ok_or_else(|| WorkflowError::contract_not_found(id))
    }

    fn transact<T, F>(&self, id: ContractId, f: F) -> WorkflowResult<Committed<T>>
    where
        F: FnOnce(&mut ContractTxn) -> WorkflowResult<T>,
    {
        if !self.document_path(id).exists() {
            return Err(WorkflowError::contract_not_found(id));
        }

        let _lock = FileLock::exclusive(&self.lock_path(id)).map_err(WorkflowError::persistence)?;
        let document = self
            .read_document(id)
            .map_err(WorkflowError::persistence)?
            .ok_or_else(|| WorkflowError::contract_not_found(id))?;

        let mut txn = ContractTxn::begin(document.contract, document.records, Utc::now());
        let value = f(&mut txn)?;
        let changes = txn.finish();

        if !changes.dirty {
            return Ok(Committed {
                value,
                history: Vec::new(),
                records: changes.records,
            });
        }

        let ids = self
            .allocate_history_ids(changes.history.len())
            .map_err(WorkflowError::persistence)?;
        let appended: Vec<HistoryEntry> = changes
            .history
            .into_iter()
            .zip(ids)
            .map(|(draft, history_id)| draft.into_entry(history_id, id, changes.now))
            .collect();

        let mut history = document.history;
        history.extend(appended.iter().cloned());
        let updated = ContractDocument {
            contract: changes.contract,
            records: changes.records,
            history,
        };
        self.write_document(&updated)
            .map_err(WorkflowError::persistence)?;

        Ok(Committed {
            value,
            history: appended,
            records: updated.records,
        })
    }
}
