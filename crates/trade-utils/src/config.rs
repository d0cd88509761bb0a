//! Environment configuration helpers

use std::str::FromStr;
use thiserror::Error;

/// Error raised when an environment variable holds an unparseable value
#[derive(Debug, Error)]
#[error("Invalid value for {key}: '{value}'")]
pub struct EnvError {
    /// Variable name
    pub key: String,
    /// Raw value found in the environment
    pub value: String,
}

/// Parse an optional variable
///
/// Returns `Ok(None)` when the variable is unset or blank, and an error when it
/// is set to something `T` cannot parse.
pub fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>, EnvError> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| EnvError {
                key: key.to_string(),
                value: raw,
            }),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_parse_unset() {
        let value: Option<u32> = env_parse("TRADE_UTILS_TEST_UNSET_NUMBER").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_error_display() {
        let err = EnvError {
            key: "TRADEBOT_DECIMALS".to_string(),
            value: "two".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid value for TRADEBOT_DECIMALS: 'two'");
    }
}
