//! Read-only views over contracts. Nothing here mutates the store.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::WorkflowResult;
use crate::models::stage::{matching_rule, DerivationRule};
use crate::models::{
    Contract, ContractId, ContractRecords, DerivedStage, HistoryEntry, StatusCategory, Vendor,
    VendorId,
};
use crate::sequence::{trash_coverage, SequenceRange, TrashCoverage};
use crate::store::RecordStore;

use super::service::Workflow;

/// One row of the contract listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractSummary {
    pub contract: Contract,
    pub vendor_name: Option<String>,
    pub gst_number: Option<String>,
    #[serde(flatten)]
    pub current: DerivedStage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractDetail {
    pub contract: Contract,
    pub vendor: Option<Vendor>,
    pub records: ContractRecords,
    pub current: DerivedStage,
    pub rule: DerivationRule,
    /// Present once both sampling and CTS results exist
    pub trash_coverage: Option<TrashCoverage>,
}

/// Payment summary of one contract, joined across stages
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentDetails {
    pub contract_id: ContractId,
    pub party_name: Option<String>,
    pub cotton_type: String,
    pub variety: Option<String>,
    pub contract_rate: f64,
    pub quantity: f64,
    pub lot_no: Option<String>,
    pub arrival_date: Option<NaiveDate>,
    pub invoice_value: Decimal,
    pub tds_amount: Decimal,
    pub cash_discount: Decimal,
    pub net_amount_paid: Decimal,
    pub bank_name: String,
    pub branch: String,
    pub account_no: String,
    pub ifsc_code: String,
    pub payment_mode: String,
    pub rtgs_reference_no: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Contract counts per dashboard category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    pub attention: usize,
}

impl StatusSummary {
    fn count(&mut self, category: StatusCategory) {
        self.total += 1;
        match category {
            StatusCategory::Pending => self.pending += 1,
            StatusCategory::Completed => self.completed += 1,
            StatusCategory::Attention => self.attention += 1,
        }
    }
}

impl<S: RecordStore> Workflow<S> {
    /// All contracts with vendor and derived status, newest first.
    pub fn list_contracts(&self) -> WorkflowResult<Vec<ContractSummary>> {
        let vendors: BTreeMap<VendorId, Vendor> = self
            .store()
            .list_vendors()?
            .into_iter()
            .map(|v| (v.id, v))
            .collect();

        self.store()
            .list_contracts()?
            .into_iter()
            .map(|contract| -> WorkflowResult<ContractSummary> {
                let records = self.store().load_records(contract.id)?;
                let vendor = vendors.get(&contract.vendor_id);
                Ok(ContractSummary {
                    vendor_name: vendor.map(|v| v.name.clone()),
                    gst_number: vendor.and_then(|v| v.gst_number.clone()),
                    current: crate::models::derive_stage(&records),
                    contract,
                })
            })
            .collect()
    }

    pub fn contract_detail(&self, id: ContractId) -> WorkflowResult<ContractDetail> {
        let contract = self.require_contract(id)?;
        let records = self.store().load_records(id)?;
        let vendor = self.store().get_vendor(contract.vendor_id)?;

        let rule = matching_rule(&records);
        let coverage = match (records.sampling(), records.cts()) {
            (Some(sampling), Some(cts)) => {
                let range = SequenceRange::parse(&sampling.sequence_start, &sampling.sequence_end)?;
                Some(trash_coverage(&range, &cts.trash_percent_samples))
            }
            _ => None,
        };

        Ok(ContractDetail {
            contract,
            vendor,
            current: rule.outcome(),
            rule,
            trash_coverage: coverage,
            records,
        })
    }

    /// History rows in the order they were recorded.
    pub fn history(&self, id: ContractId) -> WorkflowResult<Vec<HistoryEntry>> {
        self.store().history(id)
    }

    /// `None` until a payment requisition has been entered.
    pub fn payment_details(&self, id: ContractId) -> WorkflowResult<Option<PaymentDetails>> {
        let contract = self.require_contract(id)?;
        let records = self.store().load_records(id)?;
        let Some(payment) = records.payment5.as_ref() else {
            return Ok(None);
        };
        let vendor = self.store().get_vendor(contract.vendor_id)?;
        let sampling = records.sampling();

        Ok(Some(PaymentDetails {
            contract_id: contract.id,
            party_name: vendor.map(|v| v.name),
            variety: records.report2.as_ref().map(|r| r.variety.clone()),
            contract_rate: contract.price,
            quantity: contract.quantity,
            lot_no: sampling.map(|s| s.sequence_start.clone()),
            arrival_date: sampling.map(|s| s.arrival_date),
            invoice_value: payment.invoice_value,
            tds_amount: payment.tds_amount,
            cash_discount: payment.cash_discount,
            net_amount_paid: payment.net_amount_paid,
            bank_name: payment.bank_name.clone(),
            branch: payment.branch.clone(),
            account_no: payment.account_no.clone(),
            ifsc_code: payment.ifsc_code.clone(),
            payment_mode: payment.payment_mode.clone(),
            rtgs_reference_no: payment.rtgs_reference_no.clone(),
            created_at: payment.created_at,
            cotton_type: contract.cotton_type,
        }))
    }

    pub fn summary(&self) -> WorkflowResult<StatusSummary> {
        let mut summary = StatusSummary::default();
        for row in self.list_contracts()? {
            summary.count(row.current.status.category());
        }
        Ok(summary)
    }
}
