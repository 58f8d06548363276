use clap::{CommandFactory, Parser};
use facility_reconciler::cli::{args::Args, commands};
use std::process;

fn main() {
    // Pick up GOOGLE_MAPS_API_KEY and friends from a local .env before clap reads the environment
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    if args.command.is_none() {
        let _ = Args::command().print_help();
        println!();
        process::exit(0);
    }

    if let Err(error) = commands::shared::setup_logging(&args) {
        eprintln!("Error: {}", error);
        process::exit(1);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        tokio::select! {
            result = commands::run(args) => result,
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nReceived CTRL+C, stopping. Checkpointed master rows are kept.");
                process::exit(130);
            }
        }
    });

    match result {
        // Budget exhaustion is a normal finish
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
