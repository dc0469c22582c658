//! Stage 2 to 5 data entry and Chairman decisions.

use anyhow::Result;

use crate::fs::DataDir;
use crate::models::{ContractId, Decision};
use crate::workflow::{Action, DecisionForm, SamplingForm};

use super::common::{read_payload, Context};
use super::display;
use std::path::Path;

fn run(data_dir: &DataDir, user: Option<&str>, verb: &str, action: Action) -> Result<()> {
    let ctx = Context::open(data_dir)?;
    let actor = ctx.actor(user)?;
    let outcome = ctx.workflow.attempt_transition(actor, action)?;
    display::print_outcome(verb, &outcome);
    Ok(())
}

fn decision_form(decision: Decision, remarks: Option<String>) -> DecisionForm {
    DecisionForm {
        decision: Some(decision),
        remarks,
    }
}

pub fn quality_report(
    data_dir: &DataDir,
    user: Option<&str>,
    id: ContractId,
    payload: &Path,
) -> Result<()> {
    let form = read_payload(payload)?;
    run(data_dir, user, "Quality report saved for", Action::SubmitStage2Report(id, form))
}

pub fn decide(
    data_dir: &DataDir,
    user: Option<&str>,
    stage: u8,
    id: ContractId,
    decision: Decision,
    remarks: Option<String>,
) -> Result<()> {
    let form = decision_form(decision, remarks);
    let action = match stage {
        2 => Action::DecideStage2(id, form),
        4 => Action::DecideStage4(id, form),
        5 => Action::DecideStage5(id, form),
        other => anyhow::bail!("Stage {other} has no Chairman decision"),
    };
    run(data_dir, user, &format!("{decision}:"), action)
}

pub fn sampling(
    data_dir: &DataDir,
    user: Option<&str>,
    id: ContractId,
    form: SamplingForm,
) -> Result<()> {
    run(data_dir, user, "Sampling saved for", Action::SubmitStage3Sampling(id, form))
}

pub fn cts(data_dir: &DataDir, user: Option<&str>, id: ContractId, payload: &Path) -> Result<()> {
    let form = read_payload(payload)?;
    run(data_dir, user, "CTS results saved for", Action::SubmitStage4Cts(id, form))
}

pub fn payment(
    data_dir: &DataDir,
    user: Option<&str>,
    id: ContractId,
    payload: &Path,
) -> Result<()> {
    let form = read_payload(payload)?;
    run(data_dir, user, "Payment requisition saved for", Action::SubmitStage5Payment(id, form))
}
