//! Command-line front ends shared by the `roster-extract` and
//! `roster-derive` binaries: argument parsing, logging bootstrap and the
//! mapping from [`RosterError`] to process exit codes.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::batch::{BatchOptions, BatchRunner};
use crate::config::{ConfigLoader, RosterConfig};
use crate::error::{RosterError, RosterResult};
use crate::pipeline::{
    DerivedDatasets, FixedVariance, SeededVariance, StaffDirectory, VarianceSource, read_shift_csv,
};

/// Input directory used when none is given.
pub const DEFAULT_INPUT_DIR: &str = "fixtures/shift_pdfs/pdf_output";
/// Canonical CSV path used when none is given.
pub const DEFAULT_OUTPUT_CSV: &str = "fixtures/shift_pdfs/csv_output/shifts.csv";

const EXTRACT_USAGE: &str = "\
Usage: roster-extract [INPUT_DIR] [OUTPUT_CSV] [OPTIONS]

Extracts shift rosters (.pdf, .csv, .tsv) found under INPUT_DIR into one
deduplicated canonical CSV.

Arguments:
  INPUT_DIR    Directory searched recursively [default: fixtures/shift_pdfs/pdf_output]
  OUTPUT_CSV   Canonical CSV path [default: fixtures/shift_pdfs/csv_output/shifts.csv]

Options:
  --config DIR   Load extraction.yaml, stores.yaml and policy.yaml from DIR
  --raw PATH     Also write every extracted row before deduplication
  -h, --help     Print this help

Exit codes: 0 ok, 1 failure, 2 usage, 3 configuration, 4 input missing, 5 output unwritable";

const DERIVE_USAGE: &str = "\
Usage: roster-derive SHIFT_CSV OUTPUT_DIR [OPTIONS]

Generates synthetic work_hours.csv, payroll.csv, payroll_audit.json,
sales_actual.csv and sales_forecast.csv from a canonical shift CSV.

Options:
  --staff PATH   staff_name,staff_id CSV used to fill staff ids
  --seed N       Seed the variance generator for reproducible output
  --exact        No variance: actual times equal the schedule
  --config DIR   Load extraction.yaml, stores.yaml and policy.yaml from DIR
  -h, --help     Print this help

Exit codes: 0 ok, 1 failure, 2 usage, 3 configuration, 4 input missing, 5 output unwritable";

/// Result of parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<T> {
    /// Run with the parsed arguments.
    Run(T),
    /// Print usage and exit successfully.
    Help,
}

/// Arguments of `roster-extract`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractArgs {
    /// Batch input and output paths.
    pub options: BatchOptions,
    /// Configuration directory; the built-in configuration if absent.
    pub config_dir: Option<PathBuf>,
}

/// Arguments of `roster-derive`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeriveArgs {
    /// Canonical shift CSV to read.
    pub shift_csv: PathBuf,
    /// Directory for the generated files.
    pub output_dir: PathBuf,
    /// Optional staff directory CSV.
    pub staff_csv: Option<PathBuf>,
    /// Variance seed.
    pub seed: Option<u64>,
    /// Disable variance entirely.
    pub exact: bool,
    /// Configuration directory; the built-in configuration if absent.
    pub config_dir: Option<PathBuf>,
}

/// Installs the tracing subscriber.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Log lines go to
/// stderr so stdout carries only the run summary.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn usage(message: impl Into<String>) -> RosterError {
    RosterError::Usage {
        message: message.into(),
    }
}

fn option_value<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> RosterResult<String> {
    args.next()
        .ok_or_else(|| usage(format!("Missing value for {}", flag)))
}

/// Parses `roster-extract` arguments (without the program name).
///
/// # Examples
///
/// ```
/// use roster_ingest::cli::{Command, parse_extract_args};
///
/// let args = ["in", "out.csv", "--raw", "raw.csv"].map(String::from);
/// let Command::Run(parsed) = parse_extract_args(args).unwrap() else { panic!() };
/// assert_eq!(parsed.options.input_dir.to_str(), Some("in"));
/// assert_eq!(parsed.options.raw_csv.unwrap().to_str(), Some("raw.csv"));
/// ```
pub fn parse_extract_args<I>(args: I) -> RosterResult<Command<ExtractArgs>>
where
    I: IntoIterator<Item = String>,
{
    let mut positional = Vec::new();
    let mut raw_csv = None;
    let mut config_dir = None;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--raw" => raw_csv = Some(PathBuf::from(option_value(&mut args, "--raw")?)),
            "--config" => config_dir = Some(PathBuf::from(option_value(&mut args, "--config")?)),
            "-h" | "--help" => return Ok(Command::Help),
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return Err(usage(format!("Unknown option: {}", flag)));
            }
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    if positional.len() > 2 {
        return Err(usage(format!(
            "Expected at most 2 positional arguments, got {}",
            positional.len()
        )));
    }
    let mut positional = positional.into_iter();
    let input_dir = positional
        .next()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_DIR));
    let output_csv = positional
        .next()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_CSV));

    Ok(Command::Run(ExtractArgs {
        options: BatchOptions {
            input_dir,
            output_csv,
            raw_csv,
        },
        config_dir,
    }))
}

/// Parses `roster-derive` arguments (without the program name).
pub fn parse_derive_args<I>(args: I) -> RosterResult<Command<DeriveArgs>>
where
    I: IntoIterator<Item = String>,
{
    let mut positional = Vec::new();
    let mut staff_csv = None;
    let mut seed = None;
    let mut exact = false;
    let mut config_dir = None;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--staff" => staff_csv = Some(PathBuf::from(option_value(&mut args, "--staff")?)),
            "--seed" => {
                let value = option_value(&mut args, "--seed")?;
                seed = Some(
                    value
                        .parse()
                        .map_err(|_| usage(format!("Invalid seed: {}", value)))?,
                );
            }
            "--exact" => exact = true,
            "--config" => config_dir = Some(PathBuf::from(option_value(&mut args, "--config")?)),
            "-h" | "--help" => return Ok(Command::Help),
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return Err(usage(format!("Unknown option: {}", flag)));
            }
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    if exact && seed.is_some() {
        return Err(usage("--exact and --seed cannot be combined"));
    }
    let [shift_csv, output_dir]: [PathBuf; 2] = positional
        .try_into()
        .map_err(|_| usage("Expected SHIFT_CSV and OUTPUT_DIR"))?;

    Ok(Command::Run(DeriveArgs {
        shift_csv,
        output_dir,
        staff_csv,
        seed,
        exact,
        config_dir,
    }))
}

/// Loads configuration from `dir`, or the built-in configuration.
pub fn load_config(dir: Option<&Path>) -> RosterResult<RosterConfig> {
    let loader = match dir {
        Some(dir) => ConfigLoader::load(dir)?,
        None => ConfigLoader::builtin()?,
    };
    Ok(loader.into_config())
}

fn exit_with(error: &RosterError) -> ExitCode {
    eprintln!("error: {}", error);
    ExitCode::from(error.exit_code())
}

/// Entry point of `roster-extract`.
///
/// The batch summary is printed whenever extraction ran, including when the
/// output could not be written.
pub fn extract_main() -> ExitCode {
    init_logging();

    let args = match parse_extract_args(std::env::args().skip(1)) {
        Ok(Command::Run(args)) => args,
        Ok(Command::Help) => {
            println!("{}", EXTRACT_USAGE);
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{}", EXTRACT_USAGE);
            return exit_with(&e);
        }
    };

    let runner = match load_config(args.config_dir.as_deref()).and_then(|c| BatchRunner::new(&c)) {
        Ok(runner) => runner,
        Err(e) => return exit_with(&e),
    };

    match runner.run(&args.options) {
        Ok((outcome, written)) => {
            print!("{}", outcome.report);
            match written {
                Ok(()) => {
                    info!(output = %args.options.output_csv.display(), "Wrote canonical CSV");
                    ExitCode::SUCCESS
                }
                Err(e) => exit_with(&e),
            }
        }
        Err(e) => exit_with(&e),
    }
}

/// What a `roster-derive` run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeriveOutcome {
    /// Files written, in dataset order.
    pub written: Vec<PathBuf>,
    /// Staff names the directory had no id for, sorted.
    pub unmatched_staff: Vec<String>,
}

/// Runs `roster-derive` with parsed arguments.
pub fn run_derive(args: &DeriveArgs) -> RosterResult<DeriveOutcome> {
    let config = load_config(args.config_dir.as_deref())?;
    let shifts = read_shift_csv(&args.shift_csv)?;

    let marker = &config.extraction().employment_marker;
    let mut directory = match &args.staff_csv {
        Some(path) => StaffDirectory::load(path, marker)?,
        None => StaffDirectory::empty(),
    };

    let mut variance: Box<dyn VarianceSource> = match (args.exact, args.seed) {
        (true, _) => Box::new(FixedVariance),
        (false, Some(seed)) => Box::new(SeededVariance::new(seed)),
        (false, None) => Box::new(SeededVariance::from_entropy()),
    };

    let datasets = DerivedDatasets::derive(&shifts, &config, &mut directory, variance.as_mut());
    let written = datasets.write_to(&args.output_dir)?;
    Ok(DeriveOutcome {
        written,
        unmatched_staff: directory.misses().iter().cloned().collect(),
    })
}

/// Entry point of `roster-derive`.
///
/// Written files go to stdout, one per line, followed by any staff names
/// the directory could not match.
pub fn derive_main() -> ExitCode {
    init_logging();

    let args = match parse_derive_args(std::env::args().skip(1)) {
        Ok(Command::Run(args)) => args,
        Ok(Command::Help) => {
            println!("{}", DERIVE_USAGE);
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{}", DERIVE_USAGE);
            return exit_with(&e);
        }
    };

    match run_derive(&args) {
        Ok(outcome) => {
            for path in &outcome.written {
                println!("{}", path.display());
            }
            if !outcome.unmatched_staff.is_empty() {
                println!("Staff without id: {}", outcome.unmatched_staff.len());
                for name in &outcome.unmatched_staff {
                    println!("  - {}", name);
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => exit_with(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_extract_defaults() {
        let Command::Run(parsed) = parse_extract_args(args(&[])).unwrap() else {
            panic!("expected run");
        };
        assert_eq!(parsed.options.input_dir, PathBuf::from(DEFAULT_INPUT_DIR));
        assert_eq!(parsed.options.output_csv, PathBuf::from(DEFAULT_OUTPUT_CSV));
        assert_eq!(parsed.options.raw_csv, None);
        assert_eq!(parsed.config_dir, None);
    }

    #[test]
    fn test_extract_options_anywhere() {
        let Command::Run(parsed) =
            parse_extract_args(args(&["--config", "cfg", "in", "out.csv"])).unwrap()
        else {
            panic!("expected run");
        };
        assert_eq!(parsed.config_dir, Some(PathBuf::from("cfg")));
        assert_eq!(parsed.options.output_csv, PathBuf::from("out.csv"));
    }

    #[test]
    fn test_extract_usage_errors() {
        for bad in [&["--raw"][..], &["--verbose"], &["a", "b", "c"]] {
            let err = parse_extract_args(args(bad)).unwrap_err();
            assert_eq!(err.exit_code(), 2, "{:?}", bad);
        }
        assert_eq!(parse_extract_args(args(&["-h"])).unwrap(), Command::Help);
    }

    #[test]
    fn test_derive_args() {
        let Command::Run(parsed) =
            parse_derive_args(args(&["shifts.csv", "out", "--seed", "42", "--staff", "staff.csv"]))
                .unwrap()
        else {
            panic!("expected run");
        };
        assert_eq!(parsed.shift_csv, PathBuf::from("shifts.csv"));
        assert_eq!(parsed.output_dir, PathBuf::from("out"));
        assert_eq!(parsed.seed, Some(42));
        assert_eq!(parsed.staff_csv, Some(PathBuf::from("staff.csv")));
        assert!(!parsed.exact);
    }

    #[test]
    fn test_derive_usage_errors() {
        for bad in [
            &["shifts.csv"][..],
            &["a", "b", "c"],
            &["a", "b", "--seed", "x"],
            &["a", "b", "--seed", "1", "--exact"],
        ] {
            let err = parse_derive_args(args(bad)).unwrap_err();
            assert_eq!(err.exit_code(), 2, "{:?}", bad);
        }
    }

    #[test]
    fn test_derive_reports_unmatched_staff() {
        let dir = tempfile::tempdir().unwrap();
        let shift_csv = dir.path().join("shifts.csv");
        std::fs::write(
            &shift_csv,
            "tenant_code,store_name,plan_year,plan_month,shift_date,staff_name,employment_type,work_location,start_time,end_time,break_minutes,notes\n\
             STAND_BANH_MI,Atelier,2025,10,2025-10-01,田中,MONTHLY,,9:00,13:00,0,\n\
             STAND_BANH_MI,Atelier,2025,10,2025-10-01,佐藤,HOURLY,,10:00,14:00,0,\n\
             STAND_BANH_MI,Atelier,2025,10,2025-10-02,佐藤,HOURLY,,10:00,14:00,0,\n",
        )
        .unwrap();
        let staff_csv = dir.path().join("staff.csv");
        std::fs::write(&staff_csv, "staff_name,staff_id\n田中,E001\n").unwrap();

        let outcome = run_derive(&DeriveArgs {
            shift_csv,
            output_dir: dir.path().join("out"),
            staff_csv: Some(staff_csv),
            seed: None,
            exact: true,
            config_dir: None,
        })
        .unwrap();

        assert_eq!(outcome.written.len(), 5);
        assert!(outcome.written.iter().all(|path| path.exists()));
        assert_eq!(outcome.unmatched_staff, vec!["佐藤".to_string()]);
    }

    #[test]
    fn test_load_config_missing_dir() {
        let err = load_config(Some(Path::new("/nonexistent/roster-config"))).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
