use crate::core::{Result, ScanConfig};
use clap::Parser;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

/// samplemem - spot-check that a block device is filled with one byte value
///
/// Reads N_SAMPLES blocks spread evenly across the device and reports every
/// sampled block containing a byte other than VALUE_TO_CHECK. Numbers may be
/// given in decimal, hexadecimal (0x prefix) or octal (leading 0).
#[derive(Parser, Debug)]
#[command(name = "samplemem")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Statistically verify that a block device is uniformly filled with one value")]
pub struct Cli {
    /// Path to the block device or image file (e.g., /dev/sdb, disk.img)
    pub block_device: PathBuf,

    /// Block size in bytes
    #[arg(value_parser = parse_block_size)]
    pub block_size: usize,

    /// Byte value every block should contain (0-255)
    #[arg(value_parser = parse_byte)]
    pub value_to_check: u8,

    /// Number of blocks to sample
    #[arg(value_parser = parse_sample_count)]
    pub n_samples: u64,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    pub debug: bool,

    /// Do not draw the progress line
    #[arg(short, long)]
    pub quiet: bool,

    /// Print the final summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn scan_config(&self) -> Result<ScanConfig> {
        ScanConfig::new(self.block_size, self.value_to_check, self.n_samples)
    }

    /// Log level requested on the command line; `None` defers to `RUST_LOG`
    pub fn log_level(&self) -> Option<LevelFilter> {
        if self.debug {
            Some(LevelFilter::DEBUG)
        } else if self.verbose {
            Some(LevelFilter::INFO)
        } else {
            None
        }
    }
}

/// Parses an unsigned integer the way `strtoumax` does with base 0:
/// `0x`/`0X` is hexadecimal, a leading `0` is octal, anything else decimal.
/// The whole string must be consumed.
pub fn parse_uint(s: &str) -> std::result::Result<u64, String> {
    let (digits, radix) = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (hex, 16)
    } else if s.len() > 1 && s.starts_with('0') {
        (&s[1..], 8)
    } else {
        (s, 10)
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(format!("invalid number - {s}"));
    }

    u64::from_str_radix(digits, radix).map_err(|_| format!("too large - {s}"))
}

fn parse_block_size(s: &str) -> std::result::Result<usize, String> {
    let value = parse_uint(s)?;
    let value = usize::try_from(value).map_err(|_| format!("too large - {value}"))?;
    if value == 0 {
        return Err("must be greater than 0".to_string());
    }
    Ok(value)
}

fn parse_byte(s: &str) -> std::result::Result<u8, String> {
    let value = parse_uint(s)?;
    u8::try_from(value).map_err(|_| format!("too large - {value} (maximum is 255)"))
}

fn parse_sample_count(s: &str) -> std::result::Result<u64, String> {
    match parse_uint(s)? {
        0 => Err("must be greater than 0".to_string()),
        value => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uint_radixes() {
        assert_eq!(parse_uint("16"), Ok(16));
        assert_eq!(parse_uint("0x10"), Ok(16));
        assert_eq!(parse_uint("0XfF"), Ok(255));
        assert_eq!(parse_uint("010"), Ok(8));
        assert_eq!(parse_uint("0"), Ok(0));
    }

    #[test]
    fn test_parse_uint_rejects_garbage() {
        assert!(parse_uint("").is_err());
        assert!(parse_uint("12ab").is_err());
        assert!(parse_uint("0x").is_err());
        assert!(parse_uint("09").is_err());
        assert!(parse_uint("-1").is_err());
        assert!(parse_uint("+5").is_err());
        assert!(parse_uint(" 5").is_err());
    }

    #[test]
    fn test_parse_uint_overflow() {
        let err = parse_uint("18446744073709551616").unwrap_err();
        assert!(err.starts_with("too large"));
    }

    #[test]
    fn test_parse_byte_range() {
        assert_eq!(parse_byte("255"), Ok(255));
        assert_eq!(parse_byte("0xAA"), Ok(0xAA));
        assert!(parse_byte("256").is_err());
    }

    #[test]
    fn test_zero_sizes_rejected() {
        assert!(parse_block_size("0").is_err());
        assert!(parse_sample_count("0").is_err());
        assert_eq!(parse_block_size("0x1000"), Ok(4096));
    }

    #[test]
    fn test_cli_positionals() {
        let cli = Cli::try_parse_from(["samplemem", "/dev/sdb", "4096", "0xff", "1000"]).unwrap();
        assert_eq!(cli.block_device, PathBuf::from("/dev/sdb"));
        assert_eq!(cli.block_size, 4096);
        assert_eq!(cli.value_to_check, 0xFF);
        assert_eq!(cli.n_samples, 1000);
        assert_eq!(cli.log_level(), None);

        let config = cli.scan_config().unwrap();
        assert_eq!(config.sample_count(), 1000);
    }

    #[test]
    fn test_cli_missing_argument() {
        assert!(Cli::try_parse_from(["samplemem", "/dev/sdb", "4096", "0"]).is_err());
    }

    #[test]
    fn test_cli_log_level() {
        let cli = Cli::try_parse_from(["samplemem", "-d", "img", "512", "0", "1"]).unwrap();
        assert_eq!(cli.log_level(), Some(LevelFilter::DEBUG));
    }
}
