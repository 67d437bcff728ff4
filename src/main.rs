use clap::Parser;
use std::process;
use taf_processor::cli::{args::Args, commands};
use tokio_util::sync::CancellationToken;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    // Create async runtime and run the main command logic with signal handling
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        // Create cancellation token for coordinating graceful shutdown
        let cancellation_token = CancellationToken::new();

        // Set up graceful shutdown handling
        let shutdown_signal = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install CTRL+C signal handler");

            // Cancel all operations when Ctrl+C is received
            cancellation_token.cancel();
        };

        // Run the main command with cancellation support
        tokio::select! {
            result = commands::run(args, cancellation_token.clone()) => {
                result
            }
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, shutting down gracefully...");
                Err(taf_processor::Error::processing_interrupted(
                    "Processing interrupted by user".to_string()
                ))
            }
        }
    });

    match result {
        Ok(report) => {
            // The command has already printed its summary; a report with
            // failed units or driver invocations exits non-zero so batch
            // schedulers notice.
            process::exit(if report.is_clean() { 0 } else { 1 });
        }
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("Error: {:#}", error);
            if commands::is_critical_error(&error) {
                process::exit(2);
            }
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("TAF Processor - Aviation Forecast Verification Pipeline");
    println!("=======================================================");
    println!();
    println!("Decode Terminal Aerodrome Forecast bulletins, load them into");
    println!("per-source SQLite stores, and drive the statistics tool over");
    println!("each comparison pair, station, and month.");
    println!();
    println!("USAGE:");
    println!("    taf-processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    run         Decode, load, and verify in one pass (main command)");
    println!("    load        Decode bulletins and load the stores only");
    println!("    verify      Run the statistics driver over existing stores");
    println!("    reset       Drop and recreate per-source stores");
    println!("    report      Show row counts for loaded stores");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Full pipeline with the default config file:");
    println!("    taf-processor run");
    println!();
    println!("    # Load one quarter with an explicit config and more workers:");
    println!("    taf-processor load --config ops.toml --start 2023-08-01 --end 2023-11-01 \\");
    println!("                       --parallel-units 8");
    println!();
    println!("    # Re-verify without re-loading, then inspect the stores:");
    println!("    taf-processor verify --config ops.toml");
    println!("    taf-processor report --format json");
    println!();
    println!("    # Start over for one source:");
    println!("    taf-processor reset --sources o2 --yes");
    println!();
    println!("For detailed help on any command, use:");
    println!("    taf-processor <COMMAND> --help");
}
