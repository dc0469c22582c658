use crate::models::ContractId;

use super::forms::{
    ContractForm, CtsForm, DecisionForm, PaymentForm, QualityReportForm, SamplingForm,
};
use super::validator::ActionKind;

/// A requested workflow transition with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    CreateContract(ContractForm),
    SubmitStage2Report(ContractId, QualityReportForm),
    DecideStage2(ContractId, DecisionForm),
    SubmitStage3Sampling(ContractId, SamplingForm),
    SubmitStage4Cts(ContractId, CtsForm),
    DecideStage4(ContractId, DecisionForm),
    SubmitStage5Payment(ContractId, PaymentForm),
    DecideStage5(ContractId, DecisionForm),
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::CreateContract(_) => ActionKind::CreateContract,
            Action::SubmitStage2Report(..) => ActionKind::SubmitStage2Report,
            Action::DecideStage2(..) => ActionKind::DecideStage2,
            Action::SubmitStage3Sampling(..) => ActionKind::SubmitStage3Sampling,
            Action::SubmitStage4Cts(..) => ActionKind::SubmitStage4Cts,
            Action::DecideStage4(..) => ActionKind::DecideStage4,
            Action::SubmitStage5Payment(..) => ActionKind::SubmitStage5Payment,
            Action::DecideStage5(..) => ActionKind::DecideStage5,
        }
    }

    /// Target contract, `None` for creation
    pub fn contract_id(&self) -> Option<ContractId> {
        match self {
            Action::CreateContract(_) => None,
            Action::SubmitStage2Report(id, _)
            | Action::DecideStage2(id, _)
            | Action::SubmitStage3Sampling(id, _)
            | Action::SubmitStage4Cts(id, _)
            | Action::DecideStage4(id, _)
            | Action::SubmitStage5Payment(id, _)
            | Action::DecideStage5(id, _) => Some(*id),
        }
    }
}
