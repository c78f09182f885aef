// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::StoredValue;

/// The stored value cannot be read as a number
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotNumericError {
    #[error("Current value is a non-numeric string")]
    NonNumericString,

    #[error("Current value is not a number")]
    NotANumber,
}

/// Converts the current value of a field into the number to increment.
///
/// Precedence is fixed:
/// - absent field reads as `0.0`
/// - integers convert with `as f64`
/// - floats pass through untouched
/// - strings go through a strict decimal parse
/// - anything else is rejected
pub fn normalize(raw: Option<&StoredValue>) -> Result<f64, NotNumericError> {
    match raw {
        None => Ok(0.0),
        Some(StoredValue::Integer(integer)) => Ok(*integer as f64),
        Some(StoredValue::Float(float)) => Ok(*float),
        Some(StoredValue::String(text)) => parse_decimal(text),
        Some(StoredValue::Other(_)) => Err(NotNumericError::NotANumber),
    }
}

fn parse_decimal(text: &str) -> Result<f64, NotNumericError> {
    match text.parse::<f64>() {
        // "inf" and "NaN" parse, but they are not decimals
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(NotNumericError::NonNumericString),
    }
}
