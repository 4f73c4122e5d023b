use std::process::ExitCode;

use clap::Parser;

mod cli;
mod config;
mod error;
mod prompt;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    let settings = match config::load(&cli.global) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(err.exit_code());
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "smartspend={level},engine={level}",
            level = settings.level
        ))
        .with_writer(std::io::stderr)
        .init();

    match cli::run(cli.command, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!("command failed: {err:?}");
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
