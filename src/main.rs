//! Main entry point for the mapdiff CLI

use clap::Parser;
use mapdiff::cli::Cli;
use mapdiff::commands::execute_command;

fn main() {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // Parse command line arguments
    let cli = Cli::parse();

    // Set up verbose logging if requested
    if cli.verbose {
        log::set_max_level(log::LevelFilter::Debug);
    }

    // Execute the command
    if let Err(e) = execute_command(cli.command, cli.workspace.as_deref()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
