//! Entry point of the Zappy AI: validates the command-line arguments and reports the outcome.

use {
    anyhow::Context,
    std::{io, process::ExitCode},
    zappy_ai::{
        args::{self, Outcome},
        logging::{self, LogMode},
    },
};

pub fn main() -> anyhow::Result<ExitCode> {
    //
    // Parse the command-line arguments.
    // Unlike `clap::Parser::parse`, this never exits the program. The outcome decides what
    // is printed and which exit code is returned.
    //

    let outcome = args::process(std::env::args_os().skip(1));

    //
    // Install the logger. Only a successful parse can pick where records go.
    //

    let log_mode = match &outcome {
        Outcome::Ready(config) => config.log_mode,
        Outcome::Help | Outcome::Error(_) => LogMode::Console,
    };
    logging::init(log_mode).context("Failed to initialize logging")?;

    //
    // Print the usage message and the error, if any.
    //

    args::report(&outcome, &mut io::stdout().lock(), &mut io::stderr().lock())
        .context("Failed to write to the standard streams")?;

    match &outcome {
        Outcome::Help => log::debug!("Usage requested"),
        Outcome::Error(err) => log::debug!("Invalid command-line arguments: {err}"),
        Outcome::Ready(config) => {
            log::info!(
                "Starting Zappy AI for team `{}` on {}:{}",
                config.name,
                config.host,
                config.port,
            );
            log::debug!("Configuration: {config:?}");
        }
    }

    Ok(ExitCode::from(outcome.exit_code()))
}
