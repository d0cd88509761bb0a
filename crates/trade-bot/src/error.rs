//! Error types for trading dialog operations

use thiserror::Error;

/// Trading bot specific errors
///
/// None of these are fatal to the process. The bot converts them into a
/// user-facing message at the turn boundary.
#[derive(Debug, Error)]
pub enum TradeError {
    /// Price or quantity could not be uniquely determined from the input
    #[error("Ambiguous order: {0}")]
    ParseAmbiguous(String),

    /// No known stock matched the input
    #[error("Unknown ticker in: {0}")]
    UnknownTicker(String),

    /// The broker reported a non-success status
    #[error("Broker failure: {0}")]
    BrokerFailure(String),

    /// No backing record exists for the requested key
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A sell order exceeds the quantity held
    #[error("Insufficient holdings of {ticker}: held {held}, requested {requested}")]
    InsufficientHoldings {
        ticker: String,
        held: u64,
        requested: u64,
    },

    /// A buy would take a position beyond what can be represented
    #[error("Position in {ticker} is too large: held {held}, buying {requested}")]
    PositionLimit {
        ticker: String,
        held: u64,
        requested: u64,
    },

    /// Negative amount or rate passed to pricing
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Malformed slash command
    #[error("Command error: {0}")]
    CommandError(String),

    /// Conversation state could not be read or written
    #[error("State error: {0}")]
    StateError(String),

    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl TradeError {
    /// Whether the error only means "no record yet"
    pub fn is_not_found(&self) -> bool {
        matches!(self, TradeError::NotFound(_))
    }
}

/// Result type alias for trading operations
pub type Result<T> = std::result::Result<T, TradeError>;

impl From<trade_utils::EnvError> for TradeError {
    fn from(err: trade_utils::EnvError) -> Self {
        TradeError::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TradeError::UnknownTicker("buy 3 ACME".to_string());
        assert_eq!(err.to_string(), "Unknown ticker in: buy 3 ACME");

        let err = TradeError::InsufficientHoldings {
            ticker: "MSFT".to_string(),
            held: 5,
            requested: 10,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient holdings of MSFT: held 5, requested 10"
        );
    }

    #[test]
    fn test_not_found_check() {
        assert!(TradeError::NotFound("alice".to_string()).is_not_found());
        assert!(!TradeError::Other("boom".to_string()).is_not_found());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: TradeError = io.into();
        assert!(matches!(err, TradeError::Io(_)));
    }
}
