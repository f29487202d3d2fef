// ⚠️ Errors - validation and storage failures
//
// Validation errors are user-facing: their Display text is shown as-is in the
// dashboard's error line. Storage errors are fatal at start-up.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// VALIDATION ERRORS
// ============================================================================

/// Rejected user input. Raised before any mutation of the store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A required field was missing or blank
    #[error("{}", empty_message(.0))]
    EmptyInput(Field),

    #[error("Invalid date format: \"{0}\" (expected YYYY-MM-DD)")]
    InvalidDateFormat(String),

    #[error("{field} must be a number, got \"{value}\"")]
    NonNumericAmount { field: Field, value: String },

    #[error("Income and Expenses must be non-negative numbers ({field} was {value})")]
    NegativeAmount { field: Field, value: f64 },
}

/// Input field a validation error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Date,
    Income,
    Expenses,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Date => "Date",
            Field::Income => "Income",
            Field::Expenses => "Expenses",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn empty_message(field: &Field) -> String {
    match field {
        Field::Date => "Please select a date.".to_string(),
        other => format!("Please enter a value for {}.", other),
    }
}

// ============================================================================
// STORAGE ERRORS
// ============================================================================

/// Failure of a store operation: rejected input, or trouble with the backing CSV file
#[derive(Error, Debug)]
pub enum StoreError {
    /// Input rejected before any mutation; the store is unchanged
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// The file exists but a row (or the header) cannot be turned into a record
    #[error("corrupt data file at line {line}: {reason}")]
    Corrupt { line: u64, reason: String },
}

impl StoreError {
    /// The validation error behind this failure, if it is one
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            StoreError::Invalid(err) => Some(err),
            _ => None,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}
