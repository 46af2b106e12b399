use std::time::Duration;

use serde::{Deserialize, Deserializer};

/// Parse a Go style duration such as `10s`, `500ms`, `1m30s` or `2h`.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("empty duration".to_owned());
    }

    let mut total = Duration::ZERO;
    let mut rest = input;
    while !rest.is_empty() {
        let digits_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        if digits_end == 0 {
            return Err(format!("invalid duration '{}': expected a number", input));
        }
        let value: u64 = rest[..digits_end]
            .parse()
            .map_err(|e| format!("invalid duration '{}': {}", input, e))?;
        rest = &rest[digits_end..];

        let unit_end = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
        let unit = &rest[..unit_end];
        rest = &rest[unit_end..];

        let part = match unit {
            "ns" => Duration::from_nanos(value),
            "us" | "µs" => Duration::from_micros(value),
            "ms" => Duration::from_millis(value),
            "s" => Duration::from_secs(value),
            "m" => Duration::from_secs(value.checked_mul(60).ok_or_else(|| overflow(input))?),
            "h" => Duration::from_secs(value.checked_mul(3600).ok_or_else(|| overflow(input))?),
            "" => return Err(format!("invalid duration '{}': missing unit", input)),
            other => return Err(format!("invalid duration '{}': unknown unit '{}'", input, other)),
        };
        total = total.checked_add(part).ok_or_else(|| overflow(input))?;
    }
    Ok(total)
}

fn overflow(input: &str) -> String {
    format!("invalid duration '{}': overflow", input)
}

pub fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_duration(&raw).map_err(serde::de::Error::custom)
}
