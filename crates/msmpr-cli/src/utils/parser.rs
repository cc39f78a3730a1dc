use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    MissingSeparator(String),

    #[error("Key cannot be empty in '{0}'.")]
    EmptyKey(String),

    #[error("Invalid {expected} value for {key}: '{value}'")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },

    #[error(
        "Unsupported configuration key for --set: '{0}'. Expected one of settings-file, results-dir, solver.initial-guess, solver.relative-tolerance, solver.max-iterations, sampling.mesh-size, sampling.cutoff-factor."
    )]
    UnsupportedKey(String),
}

/// Splits `KEY=VALUE` at the first `=`, trimming both sides.
pub fn parse_key_value(raw: &str) -> Result<(&str, &str), ParseError> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| ParseError::MissingSeparator(raw.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ParseError::EmptyKey(raw.to_string()));
    }
    Ok((key, value.trim()))
}

/// Parses `value` as `T`, naming `key` and the expected kind on failure.
pub fn parse_value<T: FromStr>(
    key: &str,
    value: &str,
    expected: &'static str,
) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected,
    })
}
