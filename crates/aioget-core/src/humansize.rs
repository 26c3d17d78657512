//! Human-readable sizes, rates and durations for progress lines.

use std::time::Duration;

use crate::error::SizeError;

const SUFFIXES_1000: [&str; 9] = ["B", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];
const SUFFIXES_1024: [&str; 9] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB", "ZiB", "YiB"];

/// Unit system for [`approximate_size`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Units {
    /// 1 KiB = 1024 bytes.
    #[default]
    Binary,
    /// 1 KB = 1000 bytes.
    Decimal,
}

impl Units {
    pub fn from_binary_flag(binary: bool) -> Self {
        if binary {
            Units::Binary
        } else {
            Units::Decimal
        }
    }

    fn multiple(self) -> f64 {
        match self {
            Units::Binary => 1024.0,
            Units::Decimal => 1000.0,
        }
    }

    fn suffixes(self) -> &'static [&'static str] {
        match self {
            Units::Binary => &SUFFIXES_1024,
            Units::Decimal => &SUFFIXES_1000,
        }
    }
}

/// Formats `size` bytes with one decimal digit, truncated, in the largest unit
/// that keeps the value below one multiple.
///
/// # Examples
///
/// - `approximate_size(0.0, Units::Binary)` → `"0.0B"`
/// - `approximate_size(1536.0, Units::Binary)` → `"1.5KiB"`
/// - `approximate_size(1000.0, Units::Decimal)` → `"1.0KB"`
pub fn approximate_size(size: f64, units: Units) -> Result<String, SizeError> {
    if size.is_nan() || size.is_infinite() {
        return Err(SizeError::NotFinite);
    }
    if size < 0.0 {
        return Err(SizeError::Negative(size));
    }

    let multiple = units.multiple();
    let mut value = size;
    for suffix in units.suffixes() {
        if value < multiple {
            return Ok(format!("{:.1}{}", truncate_tenths(value), suffix));
        }
        value /= multiple;
    }
    Err(SizeError::Overflow(size))
}

/// Formats a byte rate as `<size>/s`.
pub fn approximate_rate(bytes_per_sec: f64, units: Units) -> Result<String, SizeError> {
    Ok(format!("{}/s", approximate_size(bytes_per_sec, units)?))
}

/// Formats whole seconds as `H:MM:SS`, prefixed with `N day(s), ` past 24h.
pub fn format_eta(eta: Duration) -> String {
    let total = eta.as_secs();
    let days = total / 86_400;
    let rem = total % 86_400;
    let clock = format!("{}:{:02}:{:02}", rem / 3600, (rem % 3600) / 60, rem % 60);
    match days {
        0 => clock,
        1 => format!("1 day, {}", clock),
        n => format!("{} days, {}", n, clock),
    }
}

/// Drops everything past the first decimal digit so `{:.1}` never rounds up.
fn truncate_tenths(value: f64) -> f64 {
    (value * 10.0).floor() / 10.0
}
