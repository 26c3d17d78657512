//! Smoothed throughput and ETA from cumulative byte counts.
//!
//! The estimator does no I/O and never reads the clock itself: callers pass
//! `now` with every sample, which keeps it deterministic under test.

use std::time::{Duration, Instant};

/// Default minimum wall time between two committed rate samples.
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(500);
/// Default number of rate samples averaged into one ETA.
pub const DEFAULT_ETA_WINDOW: usize = 3;

/// Rate and ETA as last computed by [`RateEstimator::sample`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSample {
    /// Bytes per second over the last committed window (0 until the first commit).
    pub rate: f64,
    /// Time remaining; `None` when the total is unknown or the transfer stalled.
    pub eta: Option<Duration>,
}

/// Throughput estimator owned by exactly one transfer.
#[derive(Debug, Clone)]
pub struct RateEstimator {
    total_size: Option<u64>,
    interval: Duration,
    eta_window: usize,
    window_start_time: Instant,
    window_start_bytes: u64,
    recent_rates: Vec<f64>,
    last: RateSample,
}

impl RateEstimator {
    /// Starts an estimator whose first window opens at `started_at` with zero bytes.
    pub fn new(started_at: Instant, total_size: Option<u64>) -> Self {
        Self::with_params(
            started_at,
            total_size,
            DEFAULT_SAMPLE_INTERVAL,
            DEFAULT_ETA_WINDOW,
        )
    }

    pub fn with_params(
        started_at: Instant,
        total_size: Option<u64>,
        interval: Duration,
        eta_window: usize,
    ) -> Self {
        let eta_window = eta_window.max(1);
        Self {
            total_size,
            interval,
            eta_window,
            window_start_time: started_at,
            window_start_bytes: 0,
            recent_rates: Vec::with_capacity(eta_window),
            last: RateSample {
                rate: 0.0,
                eta: None,
            },
        }
    }

    /// Records that `bytes_so_far` bytes have arrived by `now`.
    ///
    /// Within `interval` of the previous commit the previous figures are
    /// returned untouched. Otherwise a new rate is committed, and once
    /// `eta_window` rates have piled up they are averaged into a fresh ETA and
    /// discarded.
    pub fn sample(&mut self, now: Instant, bytes_so_far: u64) -> RateSample {
        let elapsed = now.saturating_duration_since(self.window_start_time);
        if elapsed <= self.interval {
            return self.last;
        }

        let delta = bytes_so_far.saturating_sub(self.window_start_bytes);
        let rate = delta as f64 / elapsed.as_secs_f64();
        self.recent_rates.push(rate);
        self.window_start_time = now;
        self.window_start_bytes = bytes_so_far;
        self.last.rate = rate;

        if self.recent_rates.len() >= self.eta_window {
            let mean = self.recent_rates.iter().sum::<f64>() / self.recent_rates.len() as f64;
            self.recent_rates.clear();
            self.last.eta = self
                .total_size
                .and_then(|total| eta_from_mean(total.saturating_sub(bytes_so_far), mean));
        }

        self.last
    }

    /// Figures returned by the most recent sample.
    pub fn last(&self) -> RateSample {
        self.last
    }

    /// Rates committed since the last ETA computation.
    pub fn pending_rates(&self) -> &[f64] {
        &self.recent_rates
    }
}

/// Whole seconds remaining at `mean` bytes/sec; `None` for a stalled transfer.
fn eta_from_mean(remaining: u64, mean: f64) -> Option<Duration> {
    if mean <= 0.0 || !mean.is_finite() {
        return None;
    }
    let secs = (remaining as f64 / mean).floor();
    if secs.is_finite() && secs < u64::MAX as f64 {
        Some(Duration::from_secs(secs as u64))
    } else {
        None
    }
}
