//! Command-line shell over the HR core.
//!
//! Reads configuration from `HRSYSTEM_*` environment variables and prints
//! rosters or the increment-due notification list.

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use hrsystem_core::{
    core_version, init_logging, HrConfig, IncrementPolicy, IncrementRule, RosterService,
};
use log::info;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "hrsystem", version, about = "HR record manager")]
struct Cli {
    /// Record store file; overrides HRSYSTEM_DB_PATH.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Prints the core version.
    Version,
    /// Lists employees ordered by id.
    Employees,
    /// Lists departments ordered by name, marking those still referenced.
    Departments,
    /// Lists employees due for a salary increment.
    Due {
        /// Reference date (YYYY-MM-DD); defaults to today.
        #[arg(long)]
        on: Option<NaiveDate>,
        /// Apply this policy to every employee, ignoring stored policies.
        #[arg(long)]
        global: Option<IncrementPolicy>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("hrsystem: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = HrConfig::from_env()?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(log_dir) = config.log_dir.as_deref().and_then(|dir| dir.to_str()) {
        init_logging(config.log_level, log_dir)?;
    }

    if let Command::Version = cli.command {
        println!("hrsystem_core version={}", core_version());
        return Ok(());
    }

    let service = RosterService::new(config.file_store());
    service.reload_all()?;
    info!(
        "event=roster_load module=cli status=ok db_path={}",
        service.store().path().display()
    );

    match cli.command {
        Command::Version => {}
        Command::Employees => {
            for employee in service.employees().items() {
                let join_date = employee
                    .join_date
                    .map_or_else(|| "-".to_string(), |date| date.to_string());
                let policy = employee.increment_policy.map_or("-", IncrementPolicy::as_str);
                println!(
                    "{}\t{}\t{}\t{:.2}\t{}\t{}",
                    employee.id,
                    employee.name,
                    employee.department,
                    employee.salary,
                    join_date,
                    policy
                );
            }
        }
        Command::Departments => {
            for department in service.departments().items() {
                let in_use = service.is_department_in_use(&department.name)?;
                println!(
                    "{}\t{}\t{}",
                    department.id,
                    department.name,
                    if in_use { "in use" } else { "-" }
                );
            }
        }
        Command::Due { on, global } => {
            let reference = on.unwrap_or_else(|| Local::now().date_naive());
            let rule = match (global, config.increment_rule) {
                (Some(policy), _) => IncrementRule::Global(policy),
                (None, rule) => rule,
            };
            let due = service.employees_due(reference, rule);
            info!(
                "event=increment_due module=cli status=ok due_count={}",
                due.len()
            );
            if due.is_empty() {
                println!("No employees are due for an increment on {reference}.");
            }
            for entry in due {
                println!("{}", entry.summary());
            }
        }
    }
    Ok(())
}
