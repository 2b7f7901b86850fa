//! Cityreg CLI Binary
//!
//! Command-line interface for the city and agent registry.

use cityreg::logging::init_logging;
use cityreg::tooling::cli::{Cli, CliContext};
use clap::Parser;
use owo_colors::OwoColorize;
use std::process;

fn main() {
    let cli = Cli::parse();

    let context = match CliContext::new(cli.workspace.clone(), cli.config.clone()) {
        Ok(ctx) => ctx.with_caller(cli.caller),
        Err(e) => {
            eprintln!("{} {}", "Error initializing workspace:".red().bold(), e);
            process::exit(1);
        }
    };

    let logging = cli.logging_config(&context.config().logging);
    if let Err(e) = init_logging(Some(&logging)) {
        eprintln!("{} {}", "Error initializing logging:".red().bold(), e);
        process::exit(1);
    }

    match context.execute(&cli.command) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(1);
        }
    }
}
