// Tue Jan 13 2026 - Alex

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use module_discovery::{
    discovery::{CandidateStatus, DiscoveryEngine, DiscoveryReport},
    fault::AggregatedDiscoveryFailure,
    utils::{config::RootEntry, format_duration, logging::init_logging, ConfigFile, LoggingUtils},
    TraversalMode,
};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Discovers loadable modules under a set of root directories", long_about = None)]
struct Args {
    /// Root directories to search
    roots: Vec<PathBuf>,

    /// Only look at files directly inside each root
    #[arg(long)]
    top_level: bool,

    /// File names to exclude (case-insensitive)
    #[arg(long, num_args = 1..)]
    exclude: Vec<String>,

    #[arg(long)]
    exclude_system: bool,

    /// Keep satellite resource modules
    #[arg(long)]
    keep_resources: bool,

    /// Keep only modules exporting a concrete type assignable to one of these
    #[arg(long, num_args = 1..)]
    assignable_to: Vec<String>,

    #[arg(long, num_args = 1..)]
    extension: Vec<String>,

    /// Fail when any candidate faults
    #[arg(long)]
    strict: bool,

    #[arg(short, long)]
    threads: Option<usize>,

    #[arg(long)]
    sequential: bool,

    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the JSON report here
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Append log records to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(long)]
    no_color: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.no_color {
        colored::control::set_override(false);
    }
    match &args.log_file {
        Some(path) => LoggingUtils::init_logger_with_file(LoggingUtils::level_from_verbosity(args.verbose), path)
            .with_context(|| format!("cannot open log file {}", path.display()))?,
        None => init_logging(args.verbose, !args.no_color),
    }

    let (file, base) = match &args.config {
        Some(path) => {
            let file = ConfigFile::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?;
            let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
            (file, base)
        }
        None => (ConfigFile::new(), PathBuf::new()),
    };

    let file = apply_args(file, &args)?;
    let config = file.to_loader_config(&base);

    println!("{} Searching {} root(s)", "[*]".blue(), config.roots.len());
    for (root, mode) in &config.roots {
        println!("    {} ({:?})", root.display(), mode);
    }

    let engine = DiscoveryEngine::new(config).context("invalid discovery configuration")?;

    let start_time = Instant::now();
    let report = match engine.discover() {
        Ok(report) => report,
        Err(failure) => {
            print_failure(&failure);
            std::process::exit(1);
        }
    };

    print_report(&report);

    if let Some(output) = &args.output {
        save_report(&report, output)
            .with_context(|| format!("failed to write report to {}", output.display()))?;
        println!("{} Report saved to: {}", "[+]".green(), output.display());
    }

    println!(
        "{} Discovery complete in {}",
        "[+]".green(),
        format_duration(start_time.elapsed())
    );

    Ok(())
}

fn apply_args(mut file: ConfigFile, args: &Args) -> anyhow::Result<ConfigFile> {
    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    let mode = if args.top_level {
        TraversalMode::TopLevelOnly
    } else {
        TraversalMode::Recursive
    };

    for root in &args.roots {
        file.roots.push(RootEntry {
            path: cwd.join(root),
            mode,
        });
    }

    if args.keep_resources {
        file.criteria.exclude_resource_modules = false;
    }
    if args.exclude_system {
        file.criteria.exclude_system_binaries = true;
    }
    file.criteria.exclude_file_names.extend(args.exclude.iter().cloned());
    file.criteria.require_assignable_to.extend(args.assignable_to.iter().cloned());

    if !args.extension.is_empty() {
        file.extensions = args.extension.clone();
    }
    if args.strict {
        file.rethrow_on_fault = true;
    }
    if args.threads.is_some() {
        file.threads = args.threads;
    }
    if args.sequential {
        file.parallel = false;
    }

    file.validate()?;
    Ok(file)
}

fn print_report(report: &DiscoveryReport) {
    println!();
    println!("{}", "Discovery Summary".cyan().bold());
    println!("{}", "-".repeat(40).cyan());

    let counts = report.status_counts();
    for status in [
        CandidateStatus::Loaded,
        CandidateStatus::ExcludedByPath,
        CandidateStatus::RejectedByReflection,
        CandidateStatus::Faulted,
    ] {
        let count = counts.get(&status).copied().unwrap_or(0);
        println!("  {:<24} {}", status.as_str(), count.to_string().green());
    }
    println!();

    if report.accepted().is_empty() {
        println!("{} No modules accepted", "[!]".yellow());
    } else {
        println!("{}", report.accepted_listing());
    }

    for fault in report.faults() {
        eprintln!("{} {}", "[!]".red(), fault);
    }
}

fn print_failure(failure: &AggregatedDiscoveryFailure) {
    eprintln!("{} {}", "[!]".red(), failure);
    for fault in failure.faults() {
        eprintln!("    {}", fault);
    }
}

fn save_report(report: &DiscoveryReport, path: &Path) -> anyhow::Result<()> {
    let json_string = serde_json::to_string_pretty(&report.to_json())?;

    let mut file = File::create(path)?;
    file.write_all(json_string.as_bytes())?;

    Ok(())
}
