//! Extracts roster documents into one canonical shift CSV.

use std::process::ExitCode;

fn main() -> ExitCode {
    roster_ingest::cli::extract_main()
}
