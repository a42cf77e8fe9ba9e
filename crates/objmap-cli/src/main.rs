//! objmap-suggest: propose mapping configuration for two type definitions.

use std::io;

use clap::Parser;
use objmap_cli::cli::Cli;
use objmap_cli::commands::{emit, run_suggest};
use objmap_cli::logging::init_logging;
use objmap_cli::summary::print_summary;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = cli.log_config();
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run_suggest(&cli) {
        Ok(suggestion) => {
            print_summary(&suggestion);
            eprintln!("\n--- Generated JSON ---");
            eprintln!("Copy the following JSON into your 'mappings' array:\n");
            match emit(&suggestion, &mut io::stdout().lock()) {
                Ok(()) => 0,
                Err(error) => {
                    eprintln!("error: {error:#}");
                    1
                }
            }
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}
