pub mod cli;
pub mod core;
pub mod logging;
pub mod progress;
pub mod report;
pub mod sampler;
pub mod verify;

pub use crate::core::{BlockSource, DiskReader, SampleError, ScanConfig};
pub use progress::{ProgressState, ProgressUpdate, format_elapsed};
pub use report::{ConsoleSink, ScanSink, ScanSummary, StatusMode};
pub use sampler::{SamplePlan, Sampler, scan, scan_path};
pub use verify::block_matches;
