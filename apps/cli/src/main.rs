use clap::Parser;
use penmark_cli::args::Cli;
use penmark_logger::Logger;
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = penmark_cli::load(&cli)?;

    let _logger = Logger::from_config(env!("CARGO_PKG_NAME"), &config.logging, cli.verbose)?;

    let outcome = penmark_cli::run(&cli, &config, &mut std::io::stdout().lock())?;
    Ok(ExitCode::from(outcome.exit_code()))
}
