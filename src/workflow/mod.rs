//! Contract approval workflow
//!
//! [`Workflow`] is the only writer of stage records. It validates each
//! [`Action`] against the actor's role and the contract's derived stage,
//! applies the resulting mutation in one store transaction and reports the
//! stage before and after.

mod action;
mod forms;
mod queries;
mod service;
mod validator;

#[cfg(test)]
mod tests;

pub use action::Action;
pub use forms::{
    parse_form, ContractForm, CtsForm, DecisionForm, PaymentForm, QualityReportForm,
    SamplingForm, VendorForm,
};
pub use queries::{ContractDetail, ContractSummary, PaymentDetails, StatusSummary};
pub use service::{TransitionOutcome, Workflow};
pub use validator::{check_precondition, check_role, ActionKind};
