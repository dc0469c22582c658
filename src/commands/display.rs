use colored::{ColoredString, Colorize};

use crate::models::{DerivedStage, HistoryEntry, StageStatus, StatusCategory};
use crate::sequence::TrashCoverage;
use crate::workflow::{
    ContractDetail, ContractSummary, PaymentDetails, StatusSummary, TransitionOutcome,
};

/// Status label colored by dashboard category
pub fn status_label(status: StageStatus) -> ColoredString {
    match status.category() {
        StatusCategory::Completed => status.label().green(),
        StatusCategory::Attention => status.label().red(),
        StatusCategory::Pending => status.label().yellow(),
    }
}

pub fn stage_label(stage: DerivedStage) -> String {
    format!("Stage {} ({})", stage.stage, status_label(stage.status))
}

pub fn print_outcome(verb: &str, outcome: &TransitionOutcome) {
    let transition = match outcome.previous {
        Some(previous) if previous != outcome.current => {
            format!("{} → {}", stage_label(previous), stage_label(outcome.current))
        }
        _ => stage_label(outcome.current),
    };
    println!(
        "{} {} contract {}: {}",
        "✓".green(),
        verb,
        outcome.contract_id.to_string().bold(),
        transition
    );
}

pub fn print_contract_list(rows: &[ContractSummary]) {
    if rows.is_empty() {
        println!("{}", "No contracts yet.".dimmed());
        return;
    }

    println!(
        "{:>5}  {:<24} {:<14} {:>9}  {}",
        "ID".bold(),
        "Vendor".bold(),
        "Cotton".bold(),
        "Qty".bold(),
        "Status".bold()
    );
    for row in rows {
        println!(
            "{:>5}  {:<24} {:<14} {:>9}  {}",
            row.contract.id,
            truncate(row.vendor_name.as_deref().unwrap_or("?"), 24),
            truncate(&row.contract.cotton_type, 14),
            row.contract.quantity,
            stage_label(row.current)
        );
    }
}

pub fn print_detail(detail: &ContractDetail) {
    let contract = &detail.contract;
    println!("{} {}", "Contract".bold(), contract.id.to_string().bold());
    println!("  Status:     {}", stage_label(detail.current));
    if let Some(vendor) = &detail.vendor {
        let gst = vendor.gst_number.as_deref().unwrap_or("-");
        println!("  Vendor:     {} (GST {gst})", vendor.name);
    }
    println!("  Cotton:     {}", contract.cotton_type);
    if let Some(quality) = &contract.quality {
        println!("  Quality:    {quality}");
    }
    println!("  Quantity:   {}", contract.quantity);
    println!("  Price:      {}", contract.price);
    println!("  Entered:    {}", contract.entry_date);

    let records = &detail.records;
    if let Some(report) = &records.report2 {
        let a = report.averages;
        println!("\n  {} ({})", "Quality report".bold(), report.report_date);
        println!(
            "    variety {}  uhml {}  ui {}  strength {}  elong {}  mic {}  rd {}  +b {}",
            report.variety, a.uhml, a.ui, a.strength, a.elongation, a.mic, a.rd, a.plus_b
        );
    }
    for (stage, decision) in [
        (2, &records.decision2),
        (4, &records.decision4),
        (5, &records.decision5),
    ] {
        if let Some(decision) = decision {
            let remarks = decision.remarks.as_deref().unwrap_or("");
            println!("  Stage {stage} decision: {} {remarks}", decision.decision);
        }
    }
    if let Some(sampling) = records.sampling() {
        println!(
            "\n  {} {} .. {} (arrived {})",
            "Sampling".bold(),
            sampling.sequence_start,
            sampling.sequence_end,
            sampling.arrival_date
        );
    }
    if let Some(cts) = records.cts() {
        println!(
            "  {} mic {}  strength {}  uhml {}  trash {}% ({})",
            "CTS".bold(),
            cts.mic_value,
            cts.strength,
            cts.uhml,
            cts.trash_percent,
            cts.test_date
        );
    }
    if let Some(coverage) = &detail.trash_coverage {
        print_coverage(coverage);
    }
    if let Some(payment) = &records.payment5 {
        println!(
            "\n  {} invoice {}  tds {}  discount {}  net {} via {}",
            "Payment".bold(),
            payment.invoice_value,
            payment.tds_amount,
            payment.cash_discount,
            payment.net_amount_paid,
            payment.payment_mode
        );
    }
}

fn print_coverage(coverage: &TrashCoverage) {
    if coverage.is_complete() {
        println!("  Trash samples: {}", "complete".green());
    } else {
        println!(
            "  Trash samples: {} missing {:?}",
            "⚠".yellow(),
            coverage.missing
        );
    }
}

pub fn print_history(entries: &[HistoryEntry]) {
    for entry in entries {
        println!(
            "{}  stage {}  {:<16} by user {}  {}",
            entry.action_date.format("%Y-%m-%d %H:%M"),
            entry.stage_number,
            entry.action.cyan(),
            entry.performed_by,
            entry.remarks.as_deref().unwrap_or("").dimmed()
        );
    }
}

pub fn print_payment(view: &PaymentDetails) {
    println!("{} {}", "Payment for contract".bold(), view.contract_id);
    println!("  Party:        {}", view.party_name.as_deref().unwrap_or("-"));
    println!("  Cotton:       {} / {}", view.cotton_type, view.variety.as_deref().unwrap_or("-"));
    println!("  Rate / Qty:   {} / {}", view.contract_rate, view.quantity);
    println!("  Lot:          {}", view.lot_no.as_deref().unwrap_or("-"));
    println!("  Invoice:      {}", view.invoice_value);
    println!("  TDS:          {}", view.tds_amount);
    println!("  Discount:     {}", view.cash_discount);
    println!("  Net paid:     {}", view.net_amount_paid.to_string().bold());
    println!(
        "  Bank:         {}, {} A/c {} IFSC {}",
        view.bank_name, view.branch, view.account_no, view.ifsc_code
    );
    println!(
        "  Mode:         {} {}",
        view.payment_mode,
        view.rtgs_reference_no.as_deref().unwrap_or("")
    );
}

pub fn print_summary(summary: &StatusSummary) {
    println!("{}", "Contracts".bold());
    println!("  Total:     {}", summary.total);
    println!("  Pending:   {}", summary.pending.to_string().yellow());
    println!("  Closed:    {}", summary.completed.to_string().green());
    println!("  Rollback:  {}", summary.attention.to_string().red());
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
