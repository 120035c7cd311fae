//! Generates synthetic work-hours, payroll and sales files from a shift CSV.

use std::process::ExitCode;

fn main() -> ExitCode {
    roster_ingest::cli::derive_main()
}
