use clap::Parser;
use colored::Colorize;
use cottonflow::commands::common::load_config;
use cottonflow::fs::DataDir;
use cottonflow::{logging, WorkflowError};
use std::process::ExitCode;

mod cli;

use cli::{dispatch, Cli};

/// Exit code for failures that are not workflow errors
const GENERIC_FAILURE: u8 = 1;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let data_dir = DataDir::resolve(cli.data_dir.as_deref());

    let level = load_config(&data_dir)
        .map(|config| config.log.level)
        .unwrap_or_else(|_| "info".to_string());
    logging::init(&level);

    match dispatch(cli.command, &data_dir, cli.user.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "Error:".red().bold());
            let code = err
                .downcast_ref::<WorkflowError>()
                .map(|e| e.kind().exit_code())
                .and_then(|code| u8::try_from(code).ok())
                .unwrap_or(GENERIC_FAILURE);
            ExitCode::from(code)
        }
    }
}
