//! Device access, scan configuration and the error taxonomy.

pub mod config;
pub mod device;
pub mod error;
pub mod io;

pub use config::ScanConfig;
pub use device::DiskReader;
pub use error::{Result, SampleError};
pub use io::{BlockSource, read_block};
