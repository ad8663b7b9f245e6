//! Scan configuration
//!
//! The validated parameters a scan runs with. Construction is the only
//! place where zero block sizes or sample counts are rejected, so the
//! sampler never has to re-check them.

use super::error::{Result, SampleError};

/// Immutable parameters of one scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    block_size: usize,
    target_value: u8,
    sample_count: u64,
}

impl ScanConfig {
    /// Creates a configuration, rejecting a zero block size or sample count
    pub fn new(block_size: usize, target_value: u8, sample_count: u64) -> Result<Self> {
        if block_size == 0 {
            return Err(SampleError::invalid("block_size", "must be greater than 0"));
        }
        if sample_count == 0 {
            return Err(SampleError::invalid("n_samples", "must be greater than 0"));
        }

        Ok(Self {
            block_size,
            target_value,
            sample_count,
        })
    }

    /// Size of one block in bytes
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Byte value every sampled block is expected to contain
    pub fn target_value(&self) -> u8 {
        self.target_value
    }

    /// Number of blocks requested to be sampled
    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }
}
