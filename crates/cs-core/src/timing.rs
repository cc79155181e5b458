//! Lightweight stage timing utilities.
//!
//! Timers measure where a dashboard request spends its time. They are
//! disabled by default and switched on either programmatically or with the
//! `CS_TIMING` environment variable; results are emitted through `tracing`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

static ENABLED: AtomicBool = AtomicBool::new(false);

/// Enable stage timing globally.
pub fn enable_timing() {
    ENABLED.store(true, Ordering::Relaxed);
}

/// Disable stage timing globally.
pub fn disable_timing() {
    ENABLED.store(false, Ordering::Relaxed);
}

/// Check if timing is enabled.
pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed) || std::env::var("CS_TIMING").is_ok()
}

/// A simple timer that measures elapsed time.
pub struct Timer {
    label: &'static str,
    start: Instant,
    enabled: bool,
}

impl Timer {
    /// Create and start a new timer with the given label.
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
            enabled: is_enabled(),
        }
    }

    /// Stop the timer and return elapsed time in seconds.
    /// If timing is disabled, returns None.
    pub fn stop(self) -> Option<f64> {
        if self.enabled {
            Some(self.start.elapsed().as_secs_f64())
        } else {
            None
        }
    }

    /// Stop the timer and log the result if enabled.
    pub fn stop_and_log(self) -> Option<f64> {
        let label = self.label;
        let elapsed = self.stop();
        if let Some(elapsed_s) = elapsed {
            tracing::info!(stage = label, elapsed_s, "stage timing");
        }
        elapsed
    }
}

/// Per-request stage durations, in seconds.
#[derive(Debug, Clone, Default)]
pub struct StageTimings {
    pub simulate_s: f64,
    pub resample_s: f64,
    pub assemble_s: f64,
}

impl StageTimings {
    pub fn total_s(&self) -> f64 {
        self.simulate_s + self.resample_s + self.assemble_s
    }

    /// Log a summary of the durations when timing is enabled.
    pub fn log_summary(&self) {
        if !is_enabled() {
            return;
        }
        tracing::info!(
            simulate_s = self.simulate_s,
            resample_s = self.resample_s,
            assemble_s = self.assemble_s,
            total_s = self.total_s(),
            "stage timing summary"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enabled_timer_reports_elapsed() {
        enable_timing();
        let timer = Timer::start("test");
        let elapsed = timer.stop();
        assert!(elapsed.is_some_and(|s| s >= 0.0));
    }

    #[test]
    fn stage_total_sums_parts() {
        let t = StageTimings {
            simulate_s: 1.0,
            resample_s: 0.25,
            assemble_s: 0.5,
        };
        assert!((t.total_s() - 1.75).abs() < 1e-12);
    }
}
