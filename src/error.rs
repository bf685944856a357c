use thiserror::Error;

/// Errors surfaced by the engine and the report binary.
///
/// Only structural problems with the input table reach a caller of the
/// engine. Missing columns, malformed cells and zero denominators are
/// folded into numeric defaults instead.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid table structure: {message}{}", at_line(.line))]
    Structure { message: String, line: Option<u64> },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(String),
}

impl ReportError {
    pub(crate) fn structure(message: impl Into<String>) -> Self {
        Self::Structure {
            message: message.into(),
            line: None,
        }
    }
}

fn at_line(line: &Option<u64>) -> String {
    line.map(|n| format!(" (line {n})")).unwrap_or_default()
}

impl From<config::ConfigError> for ReportError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
