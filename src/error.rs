//! Error types for roster ingestion.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure that can occur while loading configuration, reading
//! roster documents and writing canonical output.

use thiserror::Error;

/// The main error type for roster ingestion.
///
/// Document-level variants ([`RosterError::DocumentUnreadable`] and
/// [`RosterError::NoTables`]) are recoverable: the batch orchestrator turns
/// them into skipped-document entries and moves on to the next document.
///
/// # Example
///
/// ```
/// use roster_ingest::error::RosterError;
///
/// let error = RosterError::ConfigNotFound {
///     path: "/missing/stores.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/stores.yaml");
/// ```
#[derive(Debug, Error)]
pub enum RosterError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but violates an invariant.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// What was wrong with the configuration.
        message: String,
    },

    /// The input directory or file does not exist.
    #[error("Input not found: {path}")]
    InputNotFound {
        /// The missing input path.
        path: String,
    },

    /// A source document could not be opened or decoded.
    #[error("Unreadable document '{path}': {message}")]
    DocumentUnreadable {
        /// The document path.
        path: String,
        /// The underlying read or decode failure.
        message: String,
    },

    /// A source document contained no table grid.
    #[error("No extractable tables in '{path}'")]
    NoTables {
        /// The document path.
        path: String,
    },

    /// A CSV file could not be read or written.
    #[error("CSV error in '{path}': {message}")]
    Csv {
        /// The CSV file path.
        path: String,
        /// The underlying CSV failure.
        message: String,
    },

    /// The output location could not be written.
    #[error("Cannot write output '{path}': {message}")]
    OutputUnwritable {
        /// The output path.
        path: String,
        /// The underlying I/O failure.
        message: String,
    },

    /// Command-line arguments were invalid.
    #[error("Usage error: {message}")]
    Usage {
        /// What was wrong with the arguments.
        message: String,
    },
}

impl RosterError {
    /// Returns true if this error only affects a single document.
    pub fn is_document_level(&self) -> bool {
        matches!(
            self,
            RosterError::DocumentUnreadable { .. } | RosterError::NoTables { .. }
        )
    }

    /// Returns the process exit code for this error.
    ///
    /// | code | meaning |
    /// |------|---------|
    /// | 2 | invalid command-line usage |
    /// | 3 | configuration missing or invalid |
    /// | 4 | input missing |
    /// | 5 | output unwritable |
    /// | 1 | any other failure |
    pub fn exit_code(&self) -> u8 {
        match self {
            RosterError::Usage { .. } => 2,
            RosterError::ConfigNotFound { .. }
            | RosterError::ConfigParseError { .. }
            | RosterError::InvalidConfig { .. } => 3,
            RosterError::InputNotFound { .. } => 4,
            RosterError::OutputUnwritable { .. } => 5,
            RosterError::DocumentUnreadable { .. }
            | RosterError::NoTables { .. }
            | RosterError::Csv { .. } => 1,
        }
    }
}

/// A type alias for Results that return RosterError.
pub type RosterResult<T> = Result<T, RosterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = RosterError::ConfigNotFound {
            path: "/missing/file.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/file.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = RosterError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_no_tables_displays_path() {
        let error = RosterError::NoTables {
            path: "roster.pdf".to_string(),
        };
        assert_eq!(error.to_string(), "No extractable tables in 'roster.pdf'");
    }

    #[test]
    fn test_document_level_errors() {
        assert!(
            RosterError::NoTables {
                path: "a.pdf".to_string()
            }
            .is_document_level()
        );
        assert!(
            RosterError::DocumentUnreadable {
                path: "a.pdf".to_string(),
                message: "truncated".to_string(),
            }
            .is_document_level()
        );
        assert!(
            !RosterError::OutputUnwritable {
                path: "out.csv".to_string(),
                message: "read-only".to_string(),
            }
            .is_document_level()
        );
    }

    #[test]
    fn test_exit_codes_are_distinct_per_category() {
        let usage = RosterError::Usage {
            message: "unknown flag".to_string(),
        };
        let config = RosterError::InvalidConfig {
            message: "deductions exceed gross".to_string(),
        };
        let input = RosterError::InputNotFound {
            path: "/nope".to_string(),
        };
        let output = RosterError::OutputUnwritable {
            path: "/ro/out.csv".to_string(),
            message: "permission denied".to_string(),
        };

        assert_eq!(usage.exit_code(), 2);
        assert_eq!(config.exit_code(), 3);
        assert_eq!(input.exit_code(), 4);
        assert_eq!(output.exit_code(), 5);
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<RosterError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_input_not_found() -> RosterResult<()> {
            Err(RosterError::InputNotFound {
                path: "/test".to_string(),
            })
        }

        fn propagates_error() -> RosterResult<()> {
            returns_input_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
