pub mod contract;
pub mod ids;
pub mod records;
pub mod role;
pub mod stage;

pub use contract::{Contract, NewContract, NewVendor, Vendor};
pub use ids::{ContractId, HistoryId, UserId, VendorId};
pub use records::{
    ContractRecords, CtsResults, Decision, DecisionRecord, Gate, HistoryEntry,
    PaymentRequisition, QualityAverages, SampleRecord, Sampling, Stage2Report,
};
pub use role::{Actor, Role};
pub use stage::{derive_stage, DerivedStage, StageStatus, StatusCategory};
