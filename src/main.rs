use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use software_audit::{
    config::Config,
    model::{OsFamily, Source},
    output::ExportFormat,
    publish,
    scanner::get_scanner,
    Inventory, PackageDb, PublishOptions, ScanResult, SnapshotStore, StoreTargets, SystemHost,
};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
}

#[derive(Parser)]
#[command(name = "software-audit")]
#[command(author, version, about = "Inventory installed software on this machine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan installed software and write reports
    Scan {
        /// Write report.csv
        #[arg(long)]
        csv: bool,

        /// Write report.json
        #[arg(long)]
        json: bool,

        /// Print a table to stdout
        #[arg(long)]
        table: bool,

        /// Print every selected format to stdout instead of writing files
        #[arg(long)]
        stdout: bool,

        /// Directory for report files
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Don't replace the stored inventory for this host
        #[arg(long)]
        no_store: bool,
    },

    /// List sources and whether they are available here
    ListSources,

    /// Show or create config file
    Config {
        /// Generate default config file
        #[arg(long)]
        init: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Remove all stored host snapshots and database rows
    ClearSnapshots,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

async fn run() -> Result<u8> {
    let cli = Cli::parse();
    let (config, config_error) = Config::load_lenient();
    init_logging(&config);
    if let Some(e) = config_error {
        warn!(
            path = %Config::config_path().display(),
            error = %format!("{:#}", e),
            "ignoring config file, using defaults"
        );
    }

    match cli.command {
        Commands::Scan {
            csv,
            json,
            table,
            stdout,
            output_dir,
            no_store,
        } => {
            let mut formats = Vec::new();
            if csv {
                formats.push(ExportFormat::Csv);
            }
            if json {
                formats.push(ExportFormat::Json);
            }
            if table {
                formats.push(ExportFormat::Table);
            }
            if formats.is_empty() {
                formats = config.default_formats.clone();
            }

            let store = (config.store_snapshots && !no_store).then(|| StoreTargets {
                database: config.database_path(),
                snapshots: SnapshotStore::new(),
            });
            let options = PublishOptions {
                formats,
                output_dir: output_dir.unwrap_or_else(|| config.output_dir.clone()),
                to_stdout: stdout,
                store,
            };

            run_scan(&options).await
        }
        Commands::ListSources => {
            list_sources();
            Ok(exit_codes::SUCCESS)
        }
        Commands::Config { init, path } => {
            handle_config(init, path)?;
            Ok(exit_codes::SUCCESS)
        }
        Commands::ClearSnapshots => {
            SnapshotStore::new().clear()?;
            let database = config.database_path();
            if database.exists() {
                let removed = PackageDb::open(&database)?.clear()?;
                debug!(removed, "database rows removed");
            }
            println!("Snapshots cleared.");
            Ok(exit_codes::SUCCESS)
        }
    }
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_scan(options: &PublishOptions) -> Result<u8> {
    let started = Instant::now();
    let os = OsFamily::detect();
    debug!(%os, "detected operating system");

    let inventory = Inventory::new(SystemHost::new());
    let result = scan_with_progress(&inventory, os).await?;
    let elapsed = started.elapsed();

    let published = publish(&result, options)?;

    eprintln!(
        "Found {} packages on {} ({}) in {:.1}s",
        result.records.len(),
        result.host,
        result.os,
        elapsed.as_secs_f64()
    );
    if let Some(path) = &published.database {
        eprintln!("Inventory stored in: {}", path.display());
    }
    for path in &published.reports {
        eprintln!("Report written to: {}", path.display());
    }
    for failure in &published.failures {
        eprintln!("Error: {} report failed: {:#}", failure.format, failure.error);
    }

    if published.has_failures() {
        Ok(exit_codes::ERROR)
    } else {
        Ok(exit_codes::SUCCESS)
    }
}

/// Runs the scan, showing a spinner when stderr is a terminal.
async fn scan_with_progress(inventory: &Inventory<SystemHost>, os: OsFamily) -> Result<ScanResult> {
    if !std::io::stderr().is_terminal() {
        return Ok(inventory.scan(os).await);
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = inventory
        .scan_with(os, |scanner| {
            pb.set_message(format!("Scanning {}...", scanner.name()));
        })
        .await;

    pb.finish_and_clear();
    Ok(result)
}

fn list_sources() {
    let host = SystemHost::new();
    let os = OsFamily::detect();

    println!("Detected OS family: {}", os);
    println!();
    println!("Available sources:");
    println!();

    for source in Source::ALL {
        let scanner = get_scanner(source);
        let available = if scanner.is_available(&host) { "yes" } else { "no" };
        let location = match source.program() {
            Some(program) => program,
            None => "HKLM/HKCU ...\\CurrentVersion\\Uninstall",
        };

        println!(
            "  {:<16} {:<28} [available: {}]",
            source.as_str(),
            scanner.name(),
            available
        );
        println!("  {:<16} Reads: {}", "", location);
        println!();
    }
}

fn handle_config(init: bool, show_path: bool) -> Result<()> {
    let config_path = Config::config_path();

    if show_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if init {
        if config_path.exists() {
            println!("Config file already exists at: {}", config_path.display());
            return Ok(());
        }

        let config = Config::default();
        config.save()?;
        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Default configuration:");
        println!("{}", Config::generate_default_config());
        return Ok(());
    }

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        println!("Config file: {}", config_path.display());
        println!();
        println!("{}", content);
    } else {
        println!("No config file found.");
        println!("Run 'software-audit config --init' to create one.");
        println!();
        println!("Config path: {}", config_path.display());
    }

    Ok(())
}
