//! Sampling orchestration
//!
//! Picks an evenly spaced, deterministic subset of blocks, reads and
//! verifies each one and streams the results to a [`ScanSink`].

use crate::core::{BlockSource, DiskReader, Result, SampleError, ScanConfig, read_block};
use crate::progress::ProgressState;
use crate::report::{ScanSink, ScanSummary};
use crate::verify::{block_matches, first_mismatch};
use std::path::Path;
use std::time::Instant;

/// Which blocks a scan visits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplePlan {
    block_count: u64,
    sample_count: u64,
    stride: u64,
}

impl SamplePlan {
    /// Spreads `sample_count` samples over `block_count` blocks.
    ///
    /// When more samples are requested than there are blocks the stride is
    /// 1 and every block is visited once.
    pub fn new(block_count: u64, sample_count: u64) -> Result<Self> {
        if sample_count == 0 {
            return Err(SampleError::invalid("n_samples", "must be greater than 0"));
        }

        Ok(Self {
            block_count,
            sample_count,
            stride: (block_count / sample_count).max(1),
        })
    }

    pub fn block_count(&self) -> u64 {
        self.block_count
    }

    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    /// Gap in blocks between consecutive samples
    pub fn stride(&self) -> u64 {
        self.stride
    }

    /// More samples were requested than the device has blocks
    pub fn is_oversubscribed(&self) -> bool {
        self.sample_count > self.block_count
    }

    /// Number of positions [`positions`](Self::positions) yields
    pub fn len(&self) -> u64 {
        self.block_count.div_ceil(self.stride).min(self.sample_count)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Block indices to sample, in increasing order
    pub fn positions(&self) -> impl Iterator<Item = u64> + use<> {
        let stride = self.stride;
        let block_count = self.block_count;
        let limit = usize::try_from(self.sample_count).unwrap_or(usize::MAX);

        std::iter::successors(Some(0u64), move |&index| index.checked_add(stride))
            .take_while(move |&index| index < block_count)
            .take(limit)
    }
}

/// Drives one scan over a block source
pub struct Sampler {
    config: ScanConfig,
}

impl Sampler {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Samples `source` and reports every mismatch and skipped read to `sink`.
    ///
    /// Reads that come back short are skipped and counted neither good nor
    /// bad. Only failing to allocate the block buffer or to write a bad
    /// block index aborts the scan.
    pub fn run<S, K>(&self, source: &mut S, sink: &mut K) -> Result<ScanSummary>
    where
        S: BlockSource + ?Sized,
        K: ScanSink + ?Sized,
    {
        let start = Instant::now();
        let block_size = self.config.block_size();
        let target = self.config.target_value();
        let plan = SamplePlan::new(source.block_count(block_size), self.config.sample_count())?;

        tracing::info!(
            "Sampling {} of {} blocks ({} bytes each, stride {}) for value {:#04x}",
            plan.len(),
            plan.block_count(),
            block_size,
            plan.stride(),
            target
        );
        if plan.is_oversubscribed() {
            tracing::warn!(
                "{} samples requested but only {} blocks available; checking every block",
                plan.sample_count(),
                plan.block_count()
            );
        }

        let mut buffer = allocate_block_buffer(block_size)?;
        let mut progress = ProgressState::new(plan.sample_count());
        let mut visited = 0u64;
        let mut skipped = 0u64;
        let mut bad_blocks = 0u64;

        for index in plan.positions() {
            visited += 1;

            match read_block(source, index, &mut buffer) {
                Ok(bytes_read) if bytes_read == block_size => {
                    if !block_matches(&buffer, target) {
                        tracing::debug!(
                            "Block {} differs at byte {:?}",
                            index,
                            first_mismatch(&buffer, target)
                        );
                        bad_blocks += 1;
                        sink.bad_block(index)?;
                    }
                }
                Ok(bytes_read) => {
                    skipped += 1;
                    sink.skipped_block(
                        index,
                        &SampleError::ShortRead {
                            index,
                            bytes_read,
                            expected: block_size,
                        },
                    );
                }
                Err(e) => {
                    skipped += 1;
                    sink.skipped_block(index, &SampleError::Io(e));
                }
            }

            if let Some(update) = progress.tick(start.elapsed(), visited, bad_blocks) {
                sink.progress(&update);
            }
        }

        let elapsed = start.elapsed();
        tracing::info!(
            "Scan complete: {} bad, {} skipped of {} samples in {:.2}s",
            bad_blocks,
            skipped,
            visited,
            elapsed.as_secs_f64()
        );

        Ok(ScanSummary {
            device: None,
            block_size,
            target_value: target,
            block_count: plan.block_count(),
            stride: plan.stride(),
            samples_requested: plan.sample_count(),
            samples_visited: visited,
            samples_skipped: skipped,
            bad_blocks,
            elapsed_secs: elapsed.as_secs_f64(),
        })
    }
}

fn allocate_block_buffer(size: usize) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(size)
        .map_err(|_| SampleError::Allocation { size })?;
    buffer.resize(size, 0);
    Ok(buffer)
}

/// Opens the device at `path` and samples it.
pub fn scan_path<K>(path: impl AsRef<Path>, config: &ScanConfig, sink: &mut K) -> Result<ScanSummary>
where
    K: ScanSink + ?Sized,
{
    let mut reader = DiskReader::open(path)?;
    let mut summary = Sampler::new(*config).run(&mut reader, sink)?;
    summary.device = Some(reader.path().display().to_string());
    Ok(summary)
}

/// Samples the device at `path`, returning the number of bad blocks found.
pub fn scan<K>(path: impl AsRef<Path>, config: &ScanConfig, sink: &mut K) -> Result<u64>
where
    K: ScanSink + ?Sized,
{
    scan_path(path, config, sink).map(|summary| summary.bad_blocks)
}
