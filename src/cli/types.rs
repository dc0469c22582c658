use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use cottonflow::models::{ContractId, Decision, VendorId};

#[derive(Parser)]
#[command(name = "cottonflow")]
#[command(about = "Cotton purchase contract approval workflow", long_about = None)]
#[command(version)]
#[command(subcommand_help_heading = "Commands")]
pub struct Cli {
    /// Data directory (default: $COTTONFLOW_DATA_DIR or .cottonflow)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Configured username to act as
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the data directory and a default cottonflow.toml
    Init,

    /// Vendor registry
    Vendor {
        #[command(subcommand)]
        command: VendorCommands,
    },

    /// Stage 1 entry and contract views
    Contract {
        #[command(subcommand)]
        command: ContractCommands,
    },

    /// Count contracts per status category
    Summary {
        #[arg(long)]
        json: bool,
    },

    /// Stage 2: quality report and Chairman decision
    Stage2 {
        #[command(subcommand)]
        command: Stage2Commands,
    },

    /// Stage 3: sampling
    Stage3 {
        #[command(subcommand)]
        command: Stage3Commands,
    },

    /// Stage 4: CTS results and Chairman decision
    Stage4 {
        #[command(subcommand)]
        command: Stage4Commands,
    },

    /// Stage 5: payment requisition and Chairman decision
    Stage5 {
        #[command(subcommand)]
        command: Stage5Commands,
    },
}

#[derive(Subcommand)]
pub enum VendorCommands {
    /// Register a vendor
    Add {
        name: String,

        #[arg(long)]
        gst: Option<String>,

        #[arg(long)]
        state: Option<String>,

        #[arg(long)]
        vendor_type: Option<String>,

        #[arg(long)]
        privileged: bool,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        address: Option<String>,
    },

    /// List vendors by name
    List {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ContractCommands {
    /// Create a contract (Manager)
    Create {
        #[arg(long)]
        vendor: VendorId,

        #[arg(long)]
        cotton_type: String,

        #[arg(long)]
        quantity: f64,

        #[arg(long)]
        price: f64,

        /// Entry date (YYYY-MM-DD)
        #[arg(long)]
        entry_date: chrono::NaiveDate,

        #[arg(long)]
        quality: Option<String>,

        /// Path to the signed contract document
        #[arg(long)]
        document: Option<String>,
    },

    /// List contracts with their current status, newest first
    List {
        #[arg(long)]
        json: bool,
    },

    /// Show a contract with all stage records
    Show {
        id: ContractId,

        #[arg(long)]
        json: bool,
    },

    /// Show the stage history of a contract
    History {
        id: ContractId,

        #[arg(long)]
        json: bool,
    },

    /// Show the payment summary of a contract
    Payment {
        id: ContractId,

        #[arg(long)]
        json: bool,
    },
}

/// A Chairman verdict on one gate
#[derive(Args)]
pub struct DecideArgs {
    pub id: ContractId,

    /// approve, reject or modify (modify only at stage 5)
    pub decision: Decision,

    #[arg(long)]
    pub remarks: Option<String>,
}

/// A JSON payload file for a data-entry stage
#[derive(Args)]
pub struct PayloadArgs {
    pub id: ContractId,

    /// JSON payload file, or '-' for stdin
    #[arg(long)]
    pub payload: PathBuf,
}

#[derive(Subcommand)]
pub enum Stage2Commands {
    /// Submit the quality report averages (Manager)
    Report(PayloadArgs),

    /// Decide the quality report (Chairman)
    Decide(DecideArgs),
}

#[derive(Subcommand)]
pub enum Stage3Commands {
    /// Enter sampling details (Manager)
    Sample {
        id: ContractId,

        /// First sequence number
        #[arg(long)]
        start: u32,

        /// Number of samples
        #[arg(long)]
        count: u32,

        /// Arrival date (YYYY-MM-DD); decides the financial year suffix
        #[arg(long)]
        arrival_date: chrono::NaiveDate,

        #[arg(long)]
        lot: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum Stage4Commands {
    /// Submit CTS laboratory results (Manager)
    Cts(PayloadArgs),

    /// Decide the CTS results (Chairman)
    Decide(DecideArgs),
}

#[derive(Subcommand)]
pub enum Stage5Commands {
    /// Submit or resubmit the payment requisition (Manager)
    Payment(PayloadArgs),

    /// Decide the payment requisition (Chairman)
    Decide(DecideArgs),
}
