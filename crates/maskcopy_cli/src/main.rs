mod cli;

use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use crate::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    maskcopy_log::init_logging(maskcopy_log::level_from_verbosity(cli.verbose, cli.quiet));

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("Run failed: {e:?}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let spec_cp_request = cli.to_request();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    maskcopy_io_fs::copy_matching(&spec_cp_request, &mut out)
        .with_context(|| format!("Failed to copy from {}", cli.src.display()))?;
    out.flush().context("Failed to flush stdout")?;
    Ok(())
}
