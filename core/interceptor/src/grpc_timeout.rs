// Copyright AGNTCY Contributors (https://github.com/agntcy)
// SPDX-License-Identifier: Apache-2.0

//! Codec for the `grpc-timeout` request header.
//!
//! The value is an ASCII integer of at most 8 digits followed by a unit:
//! `H` hours, `M` minutes, `S` seconds, `m` milliseconds, `u` microseconds,
//! `n` nanoseconds.

use std::time::Duration;

use crate::errors::TimeoutError;

pub const GRPC_TIMEOUT_HEADER: &str = "grpc-timeout";

const MAX_DIGITS: usize = 8;
const MAX_VALUE: u128 = 99_999_999;

// Finest unit first.
const UNITS: [(u128, char); 6] = [
    (1, 'n'),
    (1_000, 'u'),
    (1_000_000, 'm'),
    (1_000_000_000, 'S'),
    (60_000_000_000, 'M'),
    (3_600_000_000_000, 'H'),
];

/// Encode a duration using the finest unit whose value fits in 8 digits.
/// Durations beyond `99999999H` saturate.
pub fn encode(timeout: Duration) -> String {
    let nanos = timeout.as_nanos();

    for (scale, unit) in UNITS {
        let value = nanos / scale;
        if value <= MAX_VALUE {
            return format!("{}{}", value, unit);
        }
    }

    format!("{}H", MAX_VALUE)
}

/// Decode a `grpc-timeout` header value.
pub fn decode(value: &str) -> Result<Duration, TimeoutError> {
    let unit = value.chars().last().ok_or(TimeoutError::Empty)?;
    let digits = &value[..value.len() - unit.len_utf8()];

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimeoutError::InvalidValue(value.to_string()));
    }
    if digits.len() > MAX_DIGITS {
        return Err(TimeoutError::TooLong(digits.len()));
    }

    let amount: u64 = digits
        .parse()
        .map_err(|_| TimeoutError::InvalidValue(value.to_string()))?;

    let timeout = match unit {
        'H' => Duration::from_secs(amount * 3600),
        'M' => Duration::from_secs(amount * 60),
        'S' => Duration::from_secs(amount),
        'm' => Duration::from_millis(amount),
        'u' => Duration::from_micros(amount),
        'n' => Duration::from_nanos(amount),
        other => return Err(TimeoutError::InvalidUnit(other)),
    };

    Ok(timeout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        assert_eq!(encode(Duration::ZERO), "0n");
        assert_eq!(encode(Duration::from_nanos(250)), "250n");
        assert_eq!(encode(Duration::from_millis(50)), "50000000n");
        assert_eq!(encode(Duration::from_secs(5)), "5000000u");
        assert_eq!(encode(Duration::from_secs(30)), "30000000u");
        assert_eq!(encode(Duration::from_secs(3600)), "3600000m");
        assert_eq!(encode(Duration::from_secs(1_000_000)), "1000000S");
        assert_eq!(encode(Duration::from_secs(u64::MAX)), "99999999H");
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode("1H").unwrap(), Duration::from_secs(3600));
        assert_eq!(decode("2M").unwrap(), Duration::from_secs(120));
        assert_eq!(decode("5S").unwrap(), Duration::from_secs(5));
        assert_eq!(decode("250m").unwrap(), Duration::from_millis(250));
        assert_eq!(decode("7u").unwrap(), Duration::from_micros(7));
        assert_eq!(decode("99999999n").unwrap(), Duration::from_nanos(99_999_999));
        assert_eq!(decode("00000001S").unwrap(), Duration::from_secs(1));
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(decode(""), Err(TimeoutError::Empty));
        assert_eq!(decode("S"), Err(TimeoutError::InvalidValue("S".to_string())));
        assert_eq!(decode("100"), Err(TimeoutError::InvalidUnit('0')));
        assert_eq!(decode("10s"), Err(TimeoutError::InvalidUnit('s')));
        assert_eq!(decode("123456789S"), Err(TimeoutError::TooLong(9)));
        assert_eq!(
            decode("-1S"),
            Err(TimeoutError::InvalidValue("-1S".to_string()))
        );
        assert_eq!(decode("1é"), Err(TimeoutError::InvalidUnit('é')));
    }

    #[test]
    fn test_encoded_values_decode() {
        for timeout in [
            Duration::from_millis(1),
            Duration::from_secs(5),
            Duration::from_secs(90),
            Duration::from_secs(7200),
        ] {
            assert_eq!(decode(&encode(timeout)).unwrap(), timeout);
        }
    }
}
