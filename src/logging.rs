//! Logging setup
//!
//! Log records and diagnostics share stderr with the in-place status line,
//! so everything written there goes through the registered progress bar,
//! which is hidden for the duration of the write.

use indicatif::ProgressBar;
use parking_lot::Mutex;
use std::io::IsTerminal;
use std::sync::LazyLock;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// The status line currently drawn on stderr, if any.
static PROGRESS_BAR: LazyLock<Mutex<Option<ProgressBar>>> = LazyLock::new(|| Mutex::new(None));

/// Registers (or with `None`, clears) the bar that stderr output must suspend.
pub fn set_progress_bar(bar: Option<ProgressBar>) {
    *PROGRESS_BAR.lock() = bar;
}

/// Writes a line to stderr without tearing the status line.
pub fn eprintln(message: impl AsRef<str>) {
    let message = message.as_ref();
    match PROGRESS_BAR.lock().as_ref() {
        Some(bar) => bar.suspend(|| eprintln!("{message}")),
        None => eprintln!("{message}"),
    }
}

struct ProgressBarWriter;

impl std::io::Write for ProgressBarWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let out_str = String::from_utf8_lossy(buf);
        let out_str = out_str
            .strip_suffix("\r\n")
            .or_else(|| out_str.strip_suffix('\n'))
            .unwrap_or(out_str.as_ref());

        eprintln(out_str);

        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Installs the global subscriber.
///
/// With `default` set, that level is used and `RUST_LOG` is ignored;
/// otherwise `RUST_LOG` applies, falling back to WARN.
pub fn setup_logging(default: Option<LevelFilter>) -> Result<(), TryInitError> {
    let filter = match default {
        Some(level) => EnvFilter::builder()
            .with_default_directive(level.into())
            .parse_lossy(""),
        None => EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy(),
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .compact()
        .without_time()
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(|| ProgressBarWriter)
        .with_filter(filter);

    tracing_subscriber::registry().with(stderr_layer).try_init()
}
