use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ContractId, UserId, VendorId};

/// A cotton purchase contract, created at stage 1.
///
/// Only `updated_at` changes after creation; all later stage data lives in
/// the per-stage records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    pub vendor_id: VendorId,
    pub cotton_type: String,
    pub quality: Option<String>,
    pub quantity: f64,
    pub price: f64,
    pub document_path: Option<String>,
    pub entry_date: NaiveDate,
    pub entered_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for a new contract; the store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewContract {
    pub vendor_id: VendorId,
    pub cotton_type: String,
    pub quality: Option<String>,
    pub quantity: f64,
    pub price: f64,
    pub document_path: Option<String>,
    pub entry_date: NaiveDate,
    pub entered_by: UserId,
}

impl NewContract {
    pub fn into_contract(self, id: ContractId, now: DateTime<Utc>) -> Contract {
        Contract {
            id,
            vendor_id: self.vendor_id,
            cotton_type: self.cotton_type,
            quality: self.quality,
            quantity: self.quantity,
            price: self.price,
            document_path: self.document_path,
            entry_date: self.entry_date,
            entered_by: self.entered_by,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: VendorId,
    pub name: String,
    pub gst_number: Option<String>,
    pub state: Option<String>,
    pub vendor_type: Option<String>,
    #[serde(default)]
    pub is_privileged: bool,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Vendor fields before the store assigns an id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewVendor {
    pub name: String,
    pub gst_number: Option<String>,
    pub state: Option<String>,
    pub vendor_type: Option<String>,
    pub is_privileged: bool,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

impl NewVendor {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn into_vendor(self, id: VendorId, now: DateTime<Utc>) -> Vendor {
        Vendor {
            id,
            name: self.name,
            gst_number: self.gst_number,
            state: self.state,
            vendor_type: self.vendor_type,
            is_privileged: self.is_privileged,
            email: self.email,
            phone_number: self.phone_number,
            address: self.address,
            created_at: now,
        }
    }
}
