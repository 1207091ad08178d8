//! Handover Index CLI - Main binary entry point

use handover_index::cli::args::{CliArgs, parse_args};
use handover_index::cli::output::{format_json, format_text};
use handover_index::{Error, ReportConfig, Stage};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

fn main() {
    // Initialize logger (controlled by RUST_LOG environment variable)
    // Example: RUST_LOG=info handover-index D:\Handover
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("ERROR - Did you pass the target path as a command line argument?");
        eprintln!("Use --help for usage information");
        process::exit(2);
    }

    match args[1].as_str() {
        "--help" | "-h" => {
            print_help();
            return;
        }
        "--version" | "-v" => {
            print_version();
            return;
        }
        _ => {}
    }

    let cli_args = match parse_args(&args) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Use --help for usage information");
            process::exit(2);
        }
    };

    process::exit(handle_run(&cli_args));
}

fn handle_run(args: &CliArgs) -> i32 {
    let mut config = ReportConfig::default();

    if let Some(path) = &args.metadata {
        config.metadata_path = PathBuf::from(path);
    }
    if let Some(path) = &args.vba_project {
        config.vba_project = Some(PathBuf::from(path));
    }
    if let Some(name) = &args.output_name {
        config.output_file_name.clone_from(name);
    }

    if !args.quiet {
        config.stage_notifier = Some(Arc::new(|stage: Stage| eprintln!("{stage}")));
        eprintln!("Target: {}", args.target);
    }

    let summary = match handover_index::generate_report(&args.target, &config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("ERROR - {e}");
            return exit_code(&e);
        }
    };

    if args.json {
        println!("{}", format_json(&summary));
    } else {
        println!("{}", format_text(&summary));
    }

    0
}

fn exit_code(error: &Error) -> i32 {
    match error {
        Error::InvalidInput(_) => 2,
        Error::Metadata { .. } | Error::MissingColumns(_) => 3,
        Error::Render(_) | Error::Io(_) => 4,
    }
}

fn print_help() {
    println!("Handover Index - Spreadsheet index of a directory tree joined with document metadata");
    println!();
    println!("USAGE:");
    println!("    handover-index <TARGET> [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --metadata <FILE>         Metadata export (default: metadata.xls next to the executable)");
    println!("    --vba-project <FILE>      Macro project to embed (default: vbaProject.bin next to the executable)");
    println!("    --output-name <NAME>      Workbook file name (default: Handover Index.xlsm)");
    println!("    --json                    Emit a machine-readable run summary");
    println!("    --quiet                   Suppress progress output");
    println!("    -h, --help                Show this help message");
    println!("    -v, --version             Show version information");
    println!();
    println!("METADATA:");
    println!("    A spreadsheet (.xls, .xlsx, .xlsm, .xlsb, .ods) or Parquet export whose first");
    println!("    row names the columns. 'Document No', 'File Name' and 'File' are required;");
    println!("    every other column is copied into the Data sheet.");
    println!();
    println!("EXIT CODES:");
    println!("    0  Workbook written");
    println!("    2  Missing or invalid target");
    println!("    3  Metadata export missing, unreadable or incomplete");
    println!("    4  Workbook could not be written");
    println!();
    println!("EXAMPLES:");
    println!("    handover-index D:\\Handover");
    println!("    handover-index /srv/handover --metadata exports/metadata.xlsx --json");
    println!("    handover-index /srv/handover --metadata exports/metadata.parquet --quiet");
}

fn print_version() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_DATE: &str = env!("GIT_DATE");
    const BUILD_TARGET: &str = env!("BUILD_TARGET");

    println!("handover-index {VERSION}");
    println!("Commit: {GIT_HASH} ({GIT_DATE})");
    println!("Target: {BUILD_TARGET}");

    #[cfg(debug_assertions)]
    println!("Build: debug");
    #[cfg(not(debug_assertions))]
    println!("Build: release");
}
