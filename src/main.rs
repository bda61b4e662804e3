use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;

use cluster_pool::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cluster_pool::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            ExitCode::from(e.exit_code())
        }
    }
}
