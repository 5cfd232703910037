mod app;
mod config;
mod error;
mod logging;
mod models;
mod parser;
mod report;
mod repository;
mod utils;

use app::TimeTrackingApp;
use clap::Parser;
use colored::*;
use error::{AppError, Result};
use models::{Cli, Command};
use parser::{help, SystemClock};
use repository::SqliteTimeEntries;
use std::process::ExitCode;
use tracing::error;

fn main() -> ExitCode {
    // Parse arguments
    let cli: Cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            eprintln!("{}", err.to_string().bright_red());
            if let AppError::Parse(_) = err {
                eprintln!();
                eprintln!("{}", help());
            }
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let command = parser::parse(&cli.args, &SystemClock)?;

    // Help needs no database
    if matches!(command, Command::Help) {
        println!("{}", help());
        return Ok(());
    }

    // Get db path
    let db_path = config::database_path(cli.database)?;
    config::create_parent_dir_if_not_exists(&db_path)?;

    // DB connection
    let app = TimeTrackingApp::new(SqliteTimeEntries::open(&db_path)?);
    let output = app.execute(&command)?;

    match command {
        Command::AddTimeEntry { .. } => println!("{}", output.green()),
        _ => println!("{}", output),
    }
    Ok(())
}
