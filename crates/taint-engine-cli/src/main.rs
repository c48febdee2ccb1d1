#![forbid(unsafe_code)]

mod cli;
mod commands;
mod fixtures;
#[cfg(feature = "parallel")]
mod scheduler;

fn main() -> std::process::ExitCode {
    cli::run()
}
