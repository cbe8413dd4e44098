//! Domain error types.
//!
//! Two classes of failure exist and must not be confused:
//! - configuration/catalog defects (unknown indicator, bad operator, bad
//!   parameters, too little history) abort the request, and
//! - data absence at evaluation time (missing column, warm-up NaN,
//!   unresolvable reference) never raises — conditions fail closed instead.
//! Only the first class appears here.

/// A parse error with position information for condition expressions.
#[derive(Debug, Clone, thiserror::Error)]
#[error("parse error at position {position}: {message}")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    /// Format the error with a caret pointing at the error position in the input.
    pub fn display_with_context(&self, input: &str) -> String {
        let caret = " ".repeat(self.position) + "^";
        format!(
            "{input}\n{caret}\n{err}",
            input = input,
            caret = caret,
            err = self
        )
    }
}

/// Top-level error type for sigtrader.
#[derive(Debug, thiserror::Error)]
pub enum SigtraderError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    ConditionParse(#[from] ParseError),

    #[error("unsupported indicator: {name}")]
    UnsupportedIndicator { name: String },

    #[error("invalid comparison operator: {operator}")]
    InvalidComparisonOperator { operator: String },

    #[error("invalid reference format: {reference}")]
    InvalidReferenceFormat { reference: String },

    #[error("invalid parameter for {indicator}: {reason}")]
    InvalidParameter { indicator: String, reason: String },

    #[error("insufficient data for {indicator}: have {bars} bars, need {minimum}")]
    InsufficientData {
        indicator: String,
        bars: usize,
        minimum: usize,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for SigtraderError {
    fn from(err: csv::Error) -> Self {
        SigtraderError::Data {
            reason: format!("CSV error: {}", err),
        }
    }
}

impl From<&SigtraderError> for std::process::ExitCode {
    fn from(err: &SigtraderError) -> Self {
        let code: u8 = match err {
            SigtraderError::Io(_) => 1,
            SigtraderError::ConfigParse { .. }
            | SigtraderError::ConfigMissing { .. }
            | SigtraderError::ConfigInvalid { .. } => 2,
            SigtraderError::Data { .. } => 3,
            SigtraderError::ConditionParse(_)
            | SigtraderError::InvalidComparisonOperator { .. }
            | SigtraderError::InvalidReferenceFormat { .. }
            | SigtraderError::InvalidParameter { .. } => 4,
            SigtraderError::UnsupportedIndicator { .. }
            | SigtraderError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
