use std::error::Error;
use std::fmt::{Display, Formatter};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{check, query};
use crate::exit_codes;

#[derive(Debug)]
pub enum CliError {
    Runtime(String),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Runtime(message) => write!(f, "{message}"),
        }
    }
}

impl Error for CliError {}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "taint-engine", version, about = "Taint-flow issue engine driver")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Check(check::CheckArgs),
    Query(query::QueryArgs),
}

pub fn run() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(value) => value,
        Err(err) => {
            let code = exit_codes::clap_exit(err.exit_code());
            let _ = err.print();
            return code;
        }
    };

    match dispatch(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err}");
            exit_codes::internal_error()
        }
    }
}

fn dispatch(cli: Cli) -> Result<ExitCode, CliError> {
    match cli.command {
        Command::Check(args) => check::run(args),
        Command::Query(args) => query::run(args),
    }
}
