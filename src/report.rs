//! Scan reporting
//!
//! The sampler pushes its observations into a [`ScanSink`] as they happen;
//! bad block indices are never collected. [`ConsoleSink`] is the
//! console implementation used by the binary.

use crate::core::SampleError;
use crate::logging;
use crate::progress::ProgressUpdate;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde::Serialize;
use std::fmt;
use std::io::{self, IsTerminal, Write};

/// Receiver for events produced while a scan runs
pub trait ScanSink {
    /// A sampled block did not match the target value. Indices arrive in increasing order.
    fn bad_block(&mut self, index: u64) -> io::Result<()>;

    /// A sampled block could not be read whole and was skipped.
    fn skipped_block(&mut self, index: u64, cause: &SampleError);

    /// A status update is due.
    fn progress(&mut self, update: &ProgressUpdate);
}

/// Aggregate outcome of a completed scan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    pub block_size: usize,
    pub target_value: u8,
    pub block_count: u64,
    pub stride: u64,
    pub samples_requested: u64,
    pub samples_visited: u64,
    pub samples_skipped: u64,
    pub bad_blocks: u64,
    pub elapsed_secs: f64,
}

impl ScanSummary {
    /// True when no sampled block mismatched
    pub fn is_clean(&self) -> bool {
        self.bad_blocks == 0
    }

    /// Samples that were read whole and compared
    pub fn samples_verified(&self) -> u64 {
        self.samples_visited - self.samples_skipped
    }
}

impl fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            write!(f, "No bad blocks found.")
        } else {
            write!(f, "Found {} bad blocks!", self.bad_blocks)
        }
    }
}

/// How the status line is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMode {
    /// No status line
    Off,
    /// `\r`-terminated lines written to the diagnostic writer
    Plain,
    /// An indicatif line redrawn in place on the terminal
    Terminal,
}

impl StatusMode {
    /// `Terminal` when stderr is a terminal, `Plain` when it is redirected.
    pub fn detect(enabled: bool) -> Self {
        if !enabled {
            Self::Off
        } else if io::stderr().is_terminal() {
            Self::Terminal
        } else {
            Self::Plain
        }
    }
}

/// Console sink: bad block indices on `out`, skip notices and the status line on `err`.
pub struct ConsoleSink<W: Write, E: Write> {
    out: W,
    err: E,
    mode: StatusMode,
    bar: Option<ProgressBar>,
    /// A status line is on screen without a line break after it
    pending: bool,
}

impl<W: Write, E: Write> ConsoleSink<W, E> {
    /// Creates a sink writing indices to `out` and diagnostics to `err`.
    ///
    /// In [`StatusMode::Terminal`] the status line is drawn on the process
    /// stderr, so `err` should be stderr as well.
    pub fn new(out: W, err: E, mode: StatusMode) -> Self {
        let bar = (mode == StatusMode::Terminal).then(|| {
            let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
            bar.set_style(
                ProgressStyle::with_template("{msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            logging::set_progress_bar(Some(bar.clone()));
            bar
        });

        Self {
            out,
            err,
            mode,
            bar,
            pending: false,
        }
    }

    /// Moves past the status line so whatever follows starts on a fresh line.
    fn break_status_line(&mut self) {
        if self.pending {
            let _ = writeln!(self.err);
            let _ = self.err.flush();
            self.pending = false;
        }
    }

    /// Leaves the last status line in place and releases the terminal.
    pub fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            if self.pending {
                bar.finish();
            } else {
                bar.finish_and_clear();
            }
            logging::set_progress_bar(None);
        }
        self.break_status_line();
    }

    /// Writes the final summary to `out`.
    pub fn write_summary(&mut self, summary: &ScanSummary, json: bool) -> io::Result<()> {
        self.finish();
        if json {
            serde_json::to_writer_pretty(&mut self.out, summary)?;
            writeln!(self.out)?;
        } else {
            writeln!(self.out, "{summary}")?;
        }
        self.out.flush()
    }
}

impl<W: Write, E: Write> ScanSink for ConsoleSink<W, E> {
    fn bad_block(&mut self, index: u64) -> io::Result<()> {
        match &self.bar {
            Some(bar) => bar.suspend(|| writeln!(self.out, "{index}")),
            None => {
                self.break_status_line();
                writeln!(self.out, "{index}")
            }
        }
    }

    fn skipped_block(&mut self, index: u64, cause: &SampleError) {
        tracing::debug!("Skipping block {}: {}", index, cause);
        match &self.bar {
            Some(bar) => {
                let _ = bar.suspend(|| writeln!(self.err, "Couldn't read block {index}!"));
            }
            None => {
                self.break_status_line();
                let _ = writeln!(self.err, "Couldn't read block {index}!");
            }
        }
    }

    fn progress(&mut self, update: &ProgressUpdate) {
        match self.mode {
            StatusMode::Off => {}
            StatusMode::Plain => {
                let _ = write!(self.err, "{update}\r");
                let _ = self.err.flush();
                self.pending = true;
            }
            StatusMode::Terminal => {
                if let Some(bar) = &self.bar {
                    bar.set_message(update.to_string());
                    bar.tick();
                    self.pending = true;
                }
            }
        }
    }
}

impl<W: Write, E: Write> Drop for ConsoleSink<W, E> {
    fn drop(&mut self) {
        self.finish();
    }
}
