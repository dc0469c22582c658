//! Role and stage preconditions for each workflow action

use std::fmt;

use crate::error::{WorkflowError, WorkflowResult};
use crate::models::{ContractId, ContractRecords, Decision, Gate, Role};

/// The eight workflow actions, without their payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    CreateContract,
    SubmitStage2Report,
    DecideStage2,
    SubmitStage3Sampling,
    SubmitStage4Cts,
    DecideStage4,
    SubmitStage5Payment,
    DecideStage5,
}

impl ActionKind {
    pub const ALL: [ActionKind; 8] = [
        ActionKind::CreateContract,
        ActionKind::SubmitStage2Report,
        ActionKind::DecideStage2,
        ActionKind::SubmitStage3Sampling,
        ActionKind::SubmitStage4Cts,
        ActionKind::DecideStage4,
        ActionKind::SubmitStage5Payment,
        ActionKind::DecideStage5,
    ];

    pub fn role(self) -> Role {
        match self {
            ActionKind::DecideStage2 | ActionKind::DecideStage4 | ActionKind::DecideStage5 => {
                Role::Chairman
            }
            _ => Role::Manager,
        }
    }

    /// Stage number recorded in history for this action.
    pub fn stage_number(self) -> u8 {
        match self {
            ActionKind::CreateContract => 1,
            ActionKind::SubmitStage2Report | ActionKind::DecideStage2 => 2,
            ActionKind::SubmitStage3Sampling => 3,
            ActionKind::SubmitStage4Cts | ActionKind::DecideStage4 => 4,
            ActionKind::SubmitStage5Payment | ActionKind::DecideStage5 => 5,
        }
    }

    /// Gate decided by this action, for the three Chairman actions.
    pub fn gate(self) -> Option<Gate> {
        match self {
            ActionKind::DecideStage2 => Some(Gate::Quality),
            ActionKind::DecideStage4 => Some(Gate::Cts),
            ActionKind::DecideStage5 => Some(Gate::Payment),
            _ => None,
        }
    }

    /// History label for the Manager data-entry actions. Decisions use the
    /// decision itself as the label.
    pub fn entry_label(self) -> Option<(&'static str, &'static str)> {
        match self {
            ActionKind::CreateContract => Some(("Created", "Contract Created")),
            ActionKind::SubmitStage2Report => Some((
                "Quality Entry",
                "Manager entered quality reports (Averages)",
            )),
            ActionKind::SubmitStage3Sampling => {
                Some(("Sampling Entry", "Sampling details entered"))
            }
            ActionKind::SubmitStage4Cts => Some(("CTS Entry", "CTS results entered")),
            ActionKind::SubmitStage5Payment => {
                Some(("Payment Entry", "Payment requisition entered"))
            }
            _ => None,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::CreateContract => "CreateContract",
            ActionKind::SubmitStage2Report => "SubmitStage2Report",
            ActionKind::DecideStage2 => "DecideStage2",
            ActionKind::SubmitStage3Sampling => "SubmitStage3Sampling",
            ActionKind::SubmitStage4Cts => "SubmitStage4CTS",
            ActionKind::DecideStage4 => "DecideStage4",
            ActionKind::SubmitStage5Payment => "SubmitStage5Payment",
            ActionKind::DecideStage5 => "DecideStage5",
        };
        f.write_str(name)
    }
}

pub fn check_role(kind: ActionKind, role: Role) -> WorkflowResult<()> {
    let required = kind.role();
    if role == required {
        Ok(())
    } else {
        Err(WorkflowError::Forbidden(format!(
            "{kind} requires the {required} role, caller is {role}"
        )))
    }
}

/// Check the stage precondition of `kind` against the current records.
///
/// `CreateContract` has no record precondition and always passes.
pub fn check_precondition(
    kind: ActionKind,
    contract_id: ContractId,
    records: &ContractRecords,
) -> WorkflowResult<()> {
    let conflict = |message: &str| Err(WorkflowError::conflict(contract_id, message));

    match kind {
        ActionKind::CreateContract => Ok(()),

        ActionKind::SubmitStage2Report => {
            if records.is_approved(Gate::Quality) {
                return conflict("quality report is already approved");
            }
            Ok(())
        }

        ActionKind::SubmitStage3Sampling => {
            if !records.is_approved(Gate::Quality) {
                return conflict("sampling requires an approved quality report");
            }
            Ok(())
        }

        ActionKind::SubmitStage4Cts => {
            if records.sampling().is_none() {
                return conflict("CTS entry requires sampling details");
            }
            Ok(())
        }

        ActionKind::SubmitStage5Payment => {
            let decision5 = records.decision5.as_ref().map(|d| d.decision);
            if decision5 == Some(Decision::Approve) {
                return conflict("payment is already approved; the contract is closed");
            }
            if !records.is_approved(Gate::Cts) && decision5 != Some(Decision::Modify) {
                return conflict("payment entry requires approved CTS results or a rollback");
            }
            Ok(())
        }

        ActionKind::DecideStage2 => check_gate(
            contract_id,
            records,
            Gate::Quality,
            records.report2.is_some(),
            "no quality report to decide",
        ),

        ActionKind::DecideStage4 => check_gate(
            contract_id,
            records,
            Gate::Cts,
            records.cts().is_some(),
            "no CTS results to decide",
        ),

        ActionKind::DecideStage5 => check_gate(
            contract_id,
            records,
            Gate::Payment,
            records.payment5.is_some(),
            "no payment requisition to decide",
        ),
    }
}

fn check_gate(
    contract_id: ContractId,
    records: &ContractRecords,
    gate: Gate,
    has_submission: bool,
    missing: &str,
) -> WorkflowResult<()> {
    if !has_submission {
        return Err(WorkflowError::conflict(contract_id, missing));
    }
    if records.is_approved(gate) {
        return Err(WorkflowError::conflict(
            contract_id,
            format!("stage {} is already approved", gate.stage_number()),
        ));
    }
    Ok(())
}
