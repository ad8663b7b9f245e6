use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while sampling a block device
#[derive(Error, Debug)]
pub enum SampleError {
    #[error("Invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Error opening block device {}", path.display())]
    DeviceOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error allocating memory: could not reserve a {size} byte block buffer")]
    Allocation { size: usize },

    #[error("Couldn't read block {index}! ({bytes_read} of {expected} bytes)")]
    ShortRead {
        index: u64,
        bytes_read: usize,
        expected: usize,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl SampleError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SampleError>;
