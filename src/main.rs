use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::process::ExitCode;

use samplemem::cli::Cli;
use samplemem::report::{ConsoleSink, ScanSummary, StatusMode};
use samplemem::{SampleError, logging, sampler};

/// Exit status when the scan completed but found bad blocks
const EXIT_BAD_BLOCKS: u8 = 2;
/// Exit status for parameter, open and allocation failures
const EXIT_FAILURE: u8 = 1;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_FAILURE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(e) = logging::setup_logging(cli.log_level()) {
        eprintln!("Failed to set up logging: {e}");
    }

    match run(&cli) {
        Ok(summary) if summary.is_clean() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(EXIT_BAD_BLOCKS),
        Err(e) => {
            if matches!(
                e.downcast_ref::<SampleError>(),
                Some(SampleError::InvalidParameter { .. })
            ) {
                logging::eprintln(
                    "Usage: samplemem <block_device> <block_size> <value_to_check> <n_samples>",
                );
            }
            logging::eprintln(format!("Error: {e:#}"));
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run(cli: &Cli) -> Result<ScanSummary> {
    let config = cli.scan_config()?;

    tracing::debug!("Scanning {} with {:?}", cli.block_device.display(), config);

    let mut sink = ConsoleSink::new(
        io::stdout().lock(),
        io::stderr(),
        StatusMode::detect(!cli.quiet),
    );
    let summary = sampler::scan_path(&cli.block_device, &config, &mut sink)?;

    sink.write_summary(&summary, cli.json)
        .context("Failed to write scan summary")?;

    Ok(summary)
}
