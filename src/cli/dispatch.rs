use anyhow::Result;
use cottonflow::commands::{contract, init, stage, vendor};
use cottonflow::fs::DataDir;
use cottonflow::workflow::{ContractForm, SamplingForm, VendorForm};

use super::types::{
    Commands, ContractCommands, Stage2Commands, Stage3Commands, Stage4Commands, Stage5Commands,
    VendorCommands,
};

pub fn dispatch(command: Commands, data_dir: &DataDir, user: Option<&str>) -> Result<()> {
    match command {
        Commands::Init => init::execute(data_dir),
        Commands::Vendor { command } => match command {
            VendorCommands::Add {
                name,
                gst,
                state,
                vendor_type,
                privileged,
                email,
                phone,
                address,
            } => vendor::add(
                data_dir,
                VendorForm {
                    name: Some(name),
                    gst_number: gst,
                    state,
                    vendor_type,
                    is_privileged: Some(privileged),
                    email,
                    phone_number: phone,
                    address,
                },
            ),
            VendorCommands::List { json } => vendor::list(data_dir, json),
        },
        Commands::Contract { command } => match command {
            ContractCommands::Create {
                vendor,
                cotton_type,
                quantity,
                price,
                entry_date,
                quality,
                document,
            } => contract::create(
                data_dir,
                user,
                ContractForm {
                    vendor_id: Some(vendor),
                    cotton_type: Some(cotton_type),
                    quality,
                    quantity: Some(quantity),
                    price: Some(price),
                    document_path: document,
                    entry_date: Some(entry_date),
                },
            ),
            ContractCommands::List { json } => contract::list(data_dir, json),
            ContractCommands::Show { id, json } => contract::show(data_dir, id, json),
            ContractCommands::History { id, json } => contract::history(data_dir, id, json),
            ContractCommands::Payment { id, json } => contract::payment(data_dir, id, json),
        },
        Commands::Summary { json } => contract::summary(data_dir, json),
        Commands::Stage2 { command } => match command {
            Stage2Commands::Report(args) => {
                stage::quality_report(data_dir, user, args.id, &args.payload)
            }
            Stage2Commands::Decide(args) => {
                stage::decide(data_dir, user, 2, args.id, args.decision, args.remarks)
            }
        },
        Commands::Stage3 { command } => match command {
            Stage3Commands::Sample {
                id,
                start,
                count,
                arrival_date,
                lot,
            } => stage::sampling(
                data_dir,
                user,
                id,
                SamplingForm {
                    sequence_start: Some(start),
                    sample_count: Some(count),
                    arrival_date: Some(arrival_date),
                    lot_number: lot,
                },
            ),
        },
        Commands::Stage4 { command } => match command {
            Stage4Commands::Cts(args) => stage::cts(data_dir, user, args.id, &args.payload),
            Stage4Commands::Decide(args) => {
                stage::decide(data_dir, user, 4, args.id, args.decision, args.remarks)
            }
        },
        Commands::Stage5 { command } => match command {
            Stage5Commands::Payment(args) => {
                stage::payment(data_dir, user, args.id, &args.payload)
            }
            Stage5Commands::Decide(args) => {
                stage::decide(data_dir, user, 5, args.id, args.decision, args.remarks)
            }
        },
    }
}
