use anyhow::Result;
use colored::Colorize;

use crate::fs::DataDir;
use crate::workflow::VendorForm;

use super::common::{print_json, Context};

pub fn add(data_dir: &DataDir, form: VendorForm) -> Result<()> {
    let ctx = Context::open(data_dir)?;
    let vendor = ctx.workflow.register_vendor(form)?;
    println!(
        "{} Vendor {} registered: {}",
        "✓".green(),
        vendor.id.to_string().bold(),
        vendor.name
    );
    Ok(())
}

pub fn list(data_dir: &DataDir, json: bool) -> Result<()> {
    let ctx = Context::open(data_dir)?;
    let vendors = ctx.workflow.list_vendors()?;
    if json {
        return print_json(&vendors);
    }

    if vendors.is_empty() {
        println!("{}", "No vendors registered.".dimmed());
        return Ok(());
    }
    for vendor in vendors {
        let flag = if vendor.is_privileged { " ★" } else { "" };
        println!(
            "{:>4}  {}{}  {}",
            vendor.id,
            vendor.name,
            flag.yellow(),
            vendor.gst_number.as_deref().unwrap_or("").dimmed()
        );
    }
    Ok(())
}
