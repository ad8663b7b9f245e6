//! Progress estimation
//!
//! Decides when a status line is due and what it says. The cadence is
//! self-calibrating: after every emission the number of samples to skip
//! before the next one is recomputed from the measured time per sample,
//! so updates land roughly once per second on slow and fast devices alike.

use std::fmt;
use std::time::Duration;

/// Samples processed before the first status line.
pub const INITIAL_COUNTDOWN: u64 = 10;

/// Cadence state for one scan
#[derive(Debug, Clone)]
pub struct ProgressState {
    sample_count: u64,
    countdown: u64,
}

impl ProgressState {
    /// Creates the state for a scan of `sample_count` requested samples
    pub fn new(sample_count: u64) -> Self {
        Self {
            sample_count,
            countdown: INITIAL_COUNTDOWN,
        }
    }

    /// Samples still to be processed before the next update
    pub fn countdown(&self) -> u64 {
        self.countdown
    }

    /// Records one processed sample.
    ///
    /// `elapsed` is the wall time since the scan started and `samples_done`
    /// counts this sample. Returns an update when one is due.
    pub fn tick(
        &mut self,
        elapsed: Duration,
        samples_done: u64,
        bad_blocks: u64,
    ) -> Option<ProgressUpdate> {
        if self.countdown > 0 {
            self.countdown -= 1;
            return None;
        }

        self.countdown = samples_per_second(elapsed, samples_done);

        let percent = if self.sample_count == 0 {
            100.0
        } else {
            samples_done as f64 / self.sample_count as f64 * 100.0
        };

        Some(ProgressUpdate {
            percent,
            elapsed,
            bad_blocks,
        })
    }
}

/// round(1 / time_per_sample), or the initial countdown when nothing measurable has elapsed
fn samples_per_second(elapsed: Duration, samples_done: u64) -> u64 {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 || samples_done == 0 {
        return INITIAL_COUNTDOWN;
    }

    let time_per_sample = secs / samples_done as f64;
    (1.0 / time_per_sample).round() as u64
}

/// One status line worth of progress
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    /// Percentage of requested samples processed (0.0 - 100.0)
    pub percent: f64,
    /// Wall time since the scan started
    pub elapsed: Duration,
    /// Bad blocks found so far
    pub bad_blocks: u64,
}

impl fmt::Display for ProgressUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2}% done, {} elapsed. ({} errors)",
            self.percent,
            format_elapsed(self.elapsed.as_secs()),
            self.bad_blocks
        )
    }
}

/// Formats whole seconds as `H:MM:SS` from one hour on, `M:SS` below.
pub fn format_elapsed(total_secs: u64) -> String {
    let secs = total_secs % 60;
    let mins = (total_secs / 60) % 60;
    let hours = total_secs / 3600;

    if hours > 0 {
        format!("{hours}:{mins:02}:{secs:02}")
    } else {
        format!("{mins}:{secs:02}")
    }
}
