//! Contract creation and read-only contract views.

use anyhow::Result;
use colored::Colorize;

use crate::fs::DataDir;
use crate::models::ContractId;
use crate::workflow::ContractForm;

use super::common::{print_json, Context};
use super::display;

pub fn create(data_dir: &DataDir, user: Option<&str>, form: ContractForm) -> Result<()> {
    let ctx = Context::open(data_dir)?;
    let actor = ctx.actor(user)?;
    let outcome = ctx.workflow.create_contract(actor, form)?;
    display::print_outcome("Created", &outcome);
    Ok(())
}

pub fn list(data_dir: &DataDir, json: bool) -> Result<()> {
    let ctx = Context::open(data_dir)?;
    let rows = ctx.workflow.list_contracts()?;
    if json {
        return print_json(&rows);
    }
    display::print_contract_list(&rows);
    Ok(())
}

pub fn show(data_dir: &DataDir, id: ContractId, json: bool) -> Result<()> {
    let ctx = Context::open(data_dir)?;
    let detail = ctx.workflow.contract_detail(id)?;
    if json {
        return print_json(&detail);
    }
    display::print_detail(&detail);
    Ok(())
}

pub fn history(data_dir: &DataDir, id: ContractId, json: bool) -> Result<()> {
    let ctx = Context::open(data_dir)?;
    let entries = ctx.workflow.history(id)?;
    if json {
        return print_json(&entries);
    }
    display::print_history(&entries);
    Ok(())
}

pub fn payment(data_dir: &DataDir, id: ContractId, json: bool) -> Result<()> {
    let ctx = Context::open(data_dir)?;
    match ctx.workflow.payment_details(id)? {
        Some(view) if json => print_json(&view),
        Some(view) => {
            display::print_payment(&view);
            Ok(())
        }
        None => {
            println!(
                "{} No payment requisition for contract {id} yet.",
                "○".yellow()
            );
            Ok(())
        }
    }
}

pub fn summary(data_dir: &DataDir, json: bool) -> Result<()> {
    let ctx = Context::open(data_dir)?;
    let summary = ctx.workflow.summary()?;
    if json {
        return print_json(&summary);
    }
    display::print_summary(&summary);
    Ok(())
}
