//! Error types for parameter validation and schedule computation

use thiserror::Error;

/// Reasons the engine refuses to produce a schedule
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    #[error("projection horizon of {months} months exceeds the limit of {limit}")]
    HorizonTooLong { months: u32, limit: u32 },
}

impl EngineError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }
}

/// Errors raised while loading parameter files
#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("failed to read parameters: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON parameters: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed scenario CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("scenario `{scenario}` rejected: {source}")]
    Invalid {
        scenario: String,
        #[source]
        source: EngineError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_message() {
        let err = EngineError::invalid("principal", "must be non-negative, got -1");
        assert_eq!(
            err.to_string(),
            "invalid parameter `principal`: must be non-negative, got -1"
        );
    }
}
