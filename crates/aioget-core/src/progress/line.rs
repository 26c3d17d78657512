//! One-line progress rendering.
//!
//! Layout: `name pct% [====>    ] current/total  rate/s  eta H:MM:SS`. The bar
//! takes whatever width the fixed columns and the name leave over and is
//! omitted when the total size is unknown.

use crate::error::TransferError;
use crate::humansize::{approximate_rate, approximate_size, format_eta, Units};

use super::ProgressEvent;

/// Columns used by everything except the name and the bar body.
pub const FIXED_COLUMNS: usize = 55;

const UNKNOWN: &str = "unknown";

/// Display strings for one event, each formatted on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFields {
    pub percent: String,
    pub current: String,
    pub total: String,
    pub rate: String,
    pub eta: String,
}

impl DisplayFields {
    pub fn from_event(event: &ProgressEvent, units: Units) -> Self {
        let percent = event
            .percent
            .map(|p| p.to_string())
            .unwrap_or_else(|| "?".to_string());
        let current = size_or_placeholder(event.bytes_transferred as f64, units);
        let total = event
            .total_size
            .map(|t| size_or_placeholder(t as f64, units))
            .unwrap_or_else(|| UNKNOWN.to_string());
        let rate = approximate_rate(event.current_rate, units).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "rate not formattable");
            "?/s".to_string()
        });
        let eta = event
            .eta
            .map(format_eta)
            .unwrap_or_else(|| UNKNOWN.to_string());
        Self {
            percent,
            current,
            total,
            rate,
            eta,
        }
    }
}

fn size_or_placeholder(size: f64, units: Units) -> String {
    approximate_size(size, units).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "size not formattable");
        "?".to_string()
    })
}

/// Renders `event` for a terminal `width` columns wide (0 = unlimited, no bar).
pub fn render_line(event: &ProgressEvent, width: usize, units: Units) -> String {
    let f = DisplayFields::from_event(event, units);
    let name = &*event.destination_name;
    let avail = width.saturating_sub(name.chars().count() + FIXED_COLUMNS);
    let bar = match event.fraction() {
        Some(fraction) if avail > 0 => format!("[{}] ", bar(fraction, avail)),
        _ => String::new(),
    };
    let line = format!(
        "{} {:^4}% {}{:^9}/{:^9} {:^11} eta{:^10}",
        name, f.percent, bar, f.current, f.total, f.rate, f.eta
    );
    fit(line, width)
}

/// Row content for a transfer that ended in `error`.
pub fn render_failed_line(name: &str, error: &TransferError, width: usize) -> String {
    fit(format!("{} failed ({}): {}", name, error.kind(), error), width)
}

fn bar(fraction: f64, width: usize) -> String {
    let shaded = ((fraction * width as f64).floor() as usize).min(width);
    let filled = shaded.saturating_sub(1);
    let mut out = String::with_capacity(width);
    out.push_str(&"=".repeat(filled));
    out.push('>');
    out.push_str(&" ".repeat(width - filled - 1));
    out
}

fn fit(line: String, width: usize) -> String {
    if width == 0 || line.chars().count() <= width {
        line
    } else {
        line.chars().take(width).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn half_done() -> ProgressEvent {
        ProgressEvent {
            destination_name: Arc::from("a.bin"),
            percent: Some(50),
            bytes_transferred: 5120,
            total_size: Some(10240),
            current_rate: 2048.0,
            eta: Some(Duration::from_secs(3)),
        }
    }

    #[test]
    fn fields_are_formatted_independently() {
        let f = DisplayFields::from_event(&half_done(), Units::Binary);
        assert_eq!(f.percent, "50");
        assert_eq!(f.current, "5.0KiB");
        assert_eq!(f.total, "10.0KiB");
        assert_eq!(f.rate, "2.0KiB/s");
        assert_eq!(f.eta, "0:00:03");
    }

    #[test]
    fn unknown_size_fields() {
        let mut ev = half_done();
        ev.percent = None;
        ev.total_size = None;
        ev.eta = None;
        let f = DisplayFields::from_event(&ev, Units::Binary);
        assert_eq!(f.percent, "?");
        assert_eq!(f.total, "unknown");
        assert_eq!(f.eta, "unknown");
    }

    #[test]
    fn bar_fills_the_leftover_width() {
        let width = "a.bin".len() + FIXED_COLUMNS + 10;
        let line = render_line(&half_done(), width, Units::Binary);
        assert!(line.contains("[====>     ]"), "line: {:?}", line);
        assert_eq!(line.chars().count(), width);
    }

    #[test]
    fn full_bar_at_completion() {
        let mut ev = half_done();
        ev.bytes_transferred = 10240;
        ev.percent = Some(100);
        let width = "a.bin".len() + FIXED_COLUMNS + 4;
        let line = render_line(&ev, width, Units::Binary);
        assert!(line.contains("[===>]"), "line: {:?}", line);
        assert!(line.contains("100 %"));
    }

    #[test]
    fn no_bar_when_size_unknown() {
        let mut ev = half_done();
        ev.total_size = None;
        ev.percent = None;
        let line = render_line(&ev, 200, Units::Binary);
        assert!(!line.contains('['));
        assert!(line.contains("unknown"));
    }

    #[test]
    fn narrow_terminal_truncates() {
        let line = render_line(&half_done(), 20, Units::Binary);
        assert_eq!(line.chars().count(), 20);
        assert!(line.starts_with("a.bin"));
    }

    #[test]
    fn failed_line_names_the_error() {
        let err = TransferError::network("HTTP 404");
        let line = render_failed_line("a.bin", &err, 0);
        assert_eq!(line, "a.bin failed (network): network: HTTP 404");
    }
}
