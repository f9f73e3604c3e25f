// crosscheck CLI - reconciliation reports over ledger/CRM exports
// Thin shell around crosscheck-recon: argument parsing, config loading,
// report destination plumbing, exit codes. No reconciliation logic here.

mod exit_codes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crosscheck_recon::report::{write_compare_reports, RunStamp};
use crosscheck_recon::{run_compare, run_fund_check, ReconError, ReportConfig};

use exit_codes::{exit_code_for, EXIT_CLEAN, EXIT_DISCREPANCIES};

#[derive(Parser)]
#[command(name = "crosscheck")]
#[command(about = "Reconcile two financial exports and report where they disagree")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two exports by canonical key (exit 0 = reconciled, exit 1 = discrepancies)
    #[command(after_help = "\
Writes missing_report_<timestamp>.csv and differ_report_<timestamp>.csv to the
output directory. Both files of one run share the same timestamp.

Examples:
  crosscheck compare ledger.csv crm.csv
  crosscheck compare ledger.csv crm.csv -o reports/
  crosscheck compare ledger.csv crm.csv --config columns.toml --json")]
    Compare {
        /// First export file
        file1: PathBuf,

        /// Second export file
        file2: PathBuf,

        /// Report destination directory (default: current directory)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Compare-column override (accepted; comparison currently always
        /// uses the configured amount column)
        #[arg(long, value_name = "COLUMN")]
        compare: Option<String>,

        /// Column-mapping config (TOML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the full report as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Quiet mode - suppress the stderr summary
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Check fund allocations for consistency between pledge and payment exports
    #[command(after_help = "\
Role assignment is by row count: the larger export is treated as the payments
data, the smaller as the pledge data.

Examples:
  crosscheck fund-check payments.csv pledges.csv
  crosscheck fund-check payments.csv pledges.csv --json")]
    FundCheck {
        /// First export file
        file1: PathBuf,

        /// Second export file
        file2: PathBuf,

        /// Column-mapping config (TOML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the full report as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Quiet mode - suppress the stderr summary
        #[arg(long, short = 'q')]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Compare {
            file1,
            file2,
            output,
            compare,
            config,
            json,
            quiet,
        } => cmd_compare(&file1, &file2, output, compare, config, json, quiet),
        Commands::FundCheck {
            file1,
            file2,
            config,
            json,
            quiet,
        } => cmd_fund_check(&file1, &file2, config, json, quiet),
    };

    ExitCode::from(code)
}

fn load_config(path: Option<&Path>) -> Result<ReportConfig, ReconError> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| ReconError::Io(format!("{}: {e}", path.display())))?;
            ReportConfig::from_toml(&raw)
        }
        None => Ok(ReportConfig::default()),
    }
}

fn report_error(err: &ReconError) -> u8 {
    eprintln!("error: {err}");
    exit_code_for(err)
}

fn cmd_compare(
    file1: &Path,
    file2: &Path,
    output: Option<PathBuf>,
    compare: Option<String>,
    config_path: Option<PathBuf>,
    json: bool,
    quiet: bool,
) -> u8 {
    let config = match load_config(config_path.as_deref()) {
        Ok(config) => config,
        Err(err) => return report_error(&err),
    };

    if let Some(column) = &compare {
        if !quiet {
            eprintln!(
                "note: --compare {column} is accepted but not applied; the comparison \
                 uses the configured amount column '{}'",
                config.compare.amount_column
            );
        }
    }

    let report = match run_compare(file1, file2, &config) {
        Ok(report) => report,
        Err(err) => return report_error(&err),
    };

    let dir = output
        .or_else(|| config.output.dir.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    let stamp = RunStamp::now();
    let (missing_path, differ_path) = match write_compare_reports(&report, &dir, &stamp) {
        Ok(paths) => paths,
        Err(err) => return report_error(&err),
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(body) => println!("{body}"),
            Err(err) => {
                eprintln!("error: {err}");
                return exit_codes::EXIT_IO;
            }
        }
    }

    if !quiet {
        eprintln!(
            "missing: {}, variances: {}",
            report.missing.len(),
            report.variances.len()
        );
        eprintln!("wrote {}", missing_path.display());
        eprintln!("wrote {}", differ_path.display());
    }

    if report.is_clean() {
        EXIT_CLEAN
    } else {
        EXIT_DISCREPANCIES
    }
}

fn cmd_fund_check(
    file1: &Path,
    file2: &Path,
    config_path: Option<PathBuf>,
    json: bool,
    quiet: bool,
) -> u8 {
    let config = match load_config(config_path.as_deref()) {
        Ok(config) => config,
        Err(err) => return report_error(&err),
    };

    let report = match run_fund_check(file1, file2, &config) {
        Ok(report) => report,
        Err(err) => return report_error(&err),
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(body) => println!("{body}"),
            Err(err) => {
                eprintln!("error: {err}");
                return exit_codes::EXIT_IO;
            }
        }
    } else {
        // Inconsistent identifiers, one per line, machine-consumable.
        for id in report.pledge_flags.iter().chain(&report.confirmed) {
            println!("{id}");
        }
    }

    if !quiet {
        eprintln!(
            "pledge-side flags: {}, payment-side flags: {}, confirmed after second pass: {}",
            report.pledge_flags.len(),
            report.payment_flags.len(),
            report.confirmed.len()
        );
        if !report.pledge_not_found.is_empty() || !report.payment_not_found.is_empty() {
            eprintln!(
                "identifiers without a counterpart (informational): {}",
                report.pledge_not_found.len() + report.payment_not_found.len()
            );
        }
    }

    if report.is_clean() {
        EXIT_CLEAN
    } else {
        EXIT_DISCREPANCIES
    }
}
