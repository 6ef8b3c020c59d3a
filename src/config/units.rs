//! Size and duration literal grammars.
//!
//! # Size literals
//! - `"0"` on its own
//! - `<number><unit>` where `number` is a non-negative decimal and `unit` is
//!   one of `B`, `KB`, `MB`, `GB`, `TB`, `PB`, `EB` (or the `KiB`..`EiB`
//!   spellings)
//!
//! # Design Decisions
//! - All size units are base-2, matching how Prometheus reads
//!   `enforcedBodySizeLimit` (1KB = 1024B)
//! - Durations follow the Prometheus grammar: unit-ordered
//!   `[<n>y][<n>w][<n>d][<n>h][<n>m][<n>s][<n>ms]` with no whitespace, or `0`

use std::time::Duration;
use thiserror::Error;

/// Bytes in one mebibyte.
pub const MIB: u64 = 1024 * 1024;

const SIZE_UNITS: &[(&str, u64)] = &[
    ("B", 1),
    ("KB", 1 << 10),
    ("KiB", 1 << 10),
    ("MB", 1 << 20),
    ("MiB", 1 << 20),
    ("GB", 1 << 30),
    ("GiB", 1 << 30),
    ("TB", 1 << 40),
    ("TiB", 1 << 40),
    ("PB", 1 << 50),
    ("PiB", 1 << 50),
    ("EB", 1 << 60),
    ("EiB", 1 << 60),
];

/// Duration units in the order they must appear, with their size in
/// milliseconds. A year is 365 days.
const DURATION_UNITS: &[(&str, u64)] = &[
    ("y", 365 * 24 * 60 * 60 * 1000),
    ("w", 7 * 24 * 60 * 60 * 1000),
    ("d", 24 * 60 * 60 * 1000),
    ("h", 60 * 60 * 1000),
    ("m", 60 * 1000),
    ("s", 1000),
    ("ms", 1),
];

/// Errors produced while parsing a unit literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    /// The literal was empty.
    #[error("empty value")]
    Empty,

    /// No unit suffix followed the number.
    #[error("missing unit in {0:?}")]
    MissingUnit(String),

    /// The unit suffix is not part of the grammar.
    #[error("unknown unit {unit:?} in {input:?}")]
    UnknownUnit { input: String, unit: String },

    /// The numeric part could not be read.
    #[error("invalid number in {0:?}")]
    InvalidNumber(String),

    /// The value does not fit in 64 bits.
    #[error("{0:?} is too large")]
    Overflow(String),

    /// The duration literal could not be parsed.
    #[error("invalid duration {input:?}: {reason}")]
    Duration { input: String, reason: String },
}

/// Parse a size literal into a byte count.
pub fn parse_size(input: &str) -> Result<u64, UnitError> {
    let literal = input.trim();
    if literal.is_empty() {
        return Err(UnitError::Empty);
    }
    if literal == "0" {
        return Ok(0);
    }

    let split = literal
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .ok_or_else(|| UnitError::MissingUnit(literal.to_string()))?;
    let (number, unit) = literal.split_at(split);

    if number.is_empty() || number.chars().filter(|&c| c == '.').count() > 1 {
        return Err(UnitError::InvalidNumber(literal.to_string()));
    }

    let multiplier = SIZE_UNITS
        .iter()
        .find(|(name, _)| *name == unit)
        .map(|(_, multiplier)| *multiplier)
        .ok_or_else(|| UnitError::UnknownUnit {
            input: literal.to_string(),
            unit: unit.to_string(),
        })?;

    match number.split_once('.') {
        None => {
            let whole: u64 = number
                .parse()
                .map_err(|_| UnitError::InvalidNumber(literal.to_string()))?;
            whole
                .checked_mul(multiplier)
                .ok_or_else(|| UnitError::Overflow(literal.to_string()))
        }
        Some(_) => {
            let value: f64 = number
                .parse()
                .map_err(|_| UnitError::InvalidNumber(literal.to_string()))?;
            let bytes = (value * multiplier as f64).round();
            if !bytes.is_finite() || bytes >= u64::MAX as f64 {
                return Err(UnitError::Overflow(literal.to_string()));
            }
            Ok(bytes as u64)
        }
    }
}

/// Render a byte count as whole mebibytes, rounding up.
pub fn format_mib_ceil(bytes: u64) -> String {
    format!("{}MB", bytes.div_ceil(MIB))
}

/// Parse a Prometheus duration such as `15s` or `1m30s`.
pub fn parse_duration(input: &str) -> Result<Duration, UnitError> {
    if input.is_empty() {
        return Err(UnitError::Empty);
    }
    if input == "0" {
        return Ok(Duration::ZERO);
    }

    let invalid = |reason: &str| UnitError::Duration {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let mut rest = input;
    let mut next_unit = 0;
    let mut millis: u64 = 0;
    while !rest.is_empty() {
        let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        if digits == 0 {
            return Err(invalid("expected a number"));
        }
        let (number, tail) = rest.split_at(digits);
        let unit_len = tail.find(|c: char| c.is_ascii_digit()).unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);

        let offset = DURATION_UNITS[next_unit..]
            .iter()
            .position(|(name, _)| *name == unit)
            .ok_or_else(|| {
                if DURATION_UNITS.iter().any(|(name, _)| *name == unit) {
                    invalid("units must appear once, largest first")
                } else if unit.is_empty() {
                    invalid("missing unit")
                } else {
                    invalid("unknown unit")
                }
            })?;
        let (_, scale) = DURATION_UNITS[next_unit + offset];
        next_unit += offset + 1;

        let value: u64 = number
            .parse()
            .map_err(|_| UnitError::Overflow(input.to_string()))?;
        millis = value
            .checked_mul(scale)
            .and_then(|part| millis.checked_add(part))
            .ok_or_else(|| UnitError::Overflow(input.to_string()))?;
        rest = tail;
    }

    Ok(Duration::from_millis(millis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size_units() {
        assert_eq!(parse_size("0"), Ok(0));
        assert_eq!(parse_size("512B"), Ok(512));
        assert_eq!(parse_size("10KB"), Ok(10 * 1024));
        assert_eq!(parse_size("48MB"), Ok(48 * MIB));
        assert_eq!(parse_size("2GiB"), Ok(2 * 1024 * MIB));
        assert_eq!(parse_size("1.5MB"), Ok(3 * MIB / 2));
    }

    #[test]
    fn test_parse_size_rejects_bad_literals() {
        assert!(matches!(parse_size("10EUR"), Err(UnitError::UnknownUnit { .. })));
        assert!(matches!(parse_size("1024"), Err(UnitError::MissingUnit(_))));
        assert!(matches!(parse_size("MB"), Err(UnitError::InvalidNumber(_))));
        assert!(matches!(parse_size("1.2.3MB"), Err(UnitError::InvalidNumber(_))));
        assert!(matches!(parse_size("100000EB"), Err(UnitError::Overflow(_))));
        assert_eq!(parse_size("  "), Err(UnitError::Empty));
    }

    #[test]
    fn test_format_mib_ceil() {
        assert_eq!(format_mib_ceil(48 * MIB), "48MB");
        assert_eq!(format_mib_ceil(80_000_000), "77MB");
        assert_eq!(format_mib_ceil(1), "1MB");
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("15s"), Ok(Duration::from_secs(15)));
        assert_eq!(parse_duration("10m"), Ok(Duration::from_secs(600)));
        assert_eq!(parse_duration("1m30s"), Ok(Duration::from_secs(90)));
        assert_eq!(parse_duration("1h5ms"), Ok(Duration::from_millis(3_600_005)));
        assert_eq!(parse_duration("1y"), Ok(Duration::from_secs(365 * 24 * 3600)));
        assert_eq!(parse_duration("0"), Ok(Duration::ZERO));
        assert!(parse_duration("1234www").is_err());
        assert_eq!(parse_duration(""), Err(UnitError::Empty));
    }

    #[test]
    fn test_parse_duration_rejects_non_prometheus_spellings() {
        for literal in ["30sec", "1 min", "2minutes", "15s 0ms", " 15s", "30s1m", "1m1m", "15", "-5s", "1.5s"] {
            assert!(
                matches!(parse_duration(literal), Err(UnitError::Duration { .. })),
                "{literal:?} must be rejected"
            );
        }
    }
}
