//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Monthly balance routines for solar-hydrogen planning."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CalcEngineError>;

/// Structural problems with the monthly input table.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchemaError {
    #[error("profile must contain exactly {expected} months, found {found}")]
    RowCount { expected: usize, found: usize },
    #[error("input table is missing required column '{column}'")]
    MissingColumn { column: String },
    #[error("month label at row {row} is empty")]
    EmptyMonth { row: usize },
    #[error("month label '{label}' appears more than once")]
    DuplicateMonth { label: String },
    #[error("row {row}: column '{column}' value '{raw}' is not a number")]
    InvalidNumber {
        row: usize,
        column: String,
        raw: String,
    },
}

/// A parameter or input value outside its documented domain.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{field} = {value} is out of range (expected {expected})")]
pub struct RangeError {
    pub field: String,
    pub value: f64,
    pub expected: &'static str,
}

impl RangeError {
    pub fn new(field: impl Into<String>, value: f64, expected: &'static str) -> Self {
        Self {
            field: field.into(),
            value,
            expected,
        }
    }
}

/// Raised before any computation when the profile or parameters are malformed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
    #[error("range error: {0}")]
    Range(#[from] RangeError),
}

impl ValidationError {
    /// Name of the offending field or column, when the error refers to one.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::Range(err) => Some(err.field.as_str()),
            ValidationError::Schema(SchemaError::MissingColumn { column })
            | ValidationError::Schema(SchemaError::InvalidNumber { column, .. }) => {
                Some(column.as_str())
            }
            ValidationError::Schema(_) => Some("month"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CalcEngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("unsupported input format: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("serialization error: {0}")]
    SerializationFailed(#[from] serde_json::Error),
    #[error("yaml serialization error: {0}")]
    YamlSerializationFailed(#[from] serde_yaml::Error),
    #[error("toml parse error: {0}")]
    TomlParseFailed(#[from] toml::de::Error),
    #[error("toml serialization error: {0}")]
    TomlSerializationFailed(#[from] toml::ser::Error),
}

impl From<SchemaError> for CalcEngineError {
    fn from(err: SchemaError) -> Self {
        CalcEngineError::Validation(err.into())
    }
}

impl From<RangeError> for CalcEngineError {
    fn from(err: RangeError) -> Self {
        CalcEngineError::Validation(err.into())
    }
}
