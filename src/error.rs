use thiserror::Error;

pub type CalcResult<T> = Result<T, CalcError>;

#[derive(Error, Debug)]
pub enum CalcError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Empty selection: {0}")]
    EmptySelection(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CalcError {
    /// Shorthand for the most common failure: a malformed call.
    pub fn invalid(message: impl Into<String>) -> Self {
        CalcError::InvalidArgument(message.into())
    }

    /// Prefix the message with the failing function's name, keeping the variant
    pub fn in_function(self, function: &str) -> Self {
        let prefix = |message: String| format!("{}: {}", function, message);
        match self {
            CalcError::InvalidArgument(m) => CalcError::InvalidArgument(prefix(m)),
            CalcError::EmptySelection(m) => CalcError::EmptySelection(prefix(m)),
            CalcError::NotFound(m) => CalcError::NotFound(prefix(m)),
            CalcError::Parse(m) => CalcError::Parse(prefix(m)),
            other => other,
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, CalcError::InvalidArgument(_))
    }
}
