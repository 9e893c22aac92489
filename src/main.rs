use clap::Parser;
use colored::*;
use health_influx::cli::{self, Args};
use std::process;

fn main() {
    let args = Args::parse();
    cli::setup_logging(&args);

    match cli::run(&args) {
        Ok(stats) => {
            if !args.quiet {
                cli::print_summary(&stats);
            }
            process::exit(0);
        }
        Err(error) => {
            eprintln!("{} {:#}", "Error:".bright_red().bold(), error);
            process::exit(1);
        }
    }
}
