use std::process::ExitCode;

use clap::Parser;
use common::telemetry::{get_tracing_subscriber, init_tracing_subscriber};
use profile_setup::{cli::Cli, configuration::get_configuration};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Logs go to stderr, stdout is kept for the command output
    let tracing_subscriber =
        get_tracing_subscriber("profile_setup".into(), "warn".into(), std::io::stderr);
    init_tracing_subscriber(tracing_subscriber);

    let cli = Cli::parse();

    let configuration = match get_configuration() {
        Ok(configuration) => configuration,
        Err(error) => {
            eprintln!("Failed to read configuration: {}", error);
            return ExitCode::FAILURE;
        }
    };

    profile_setup::cli::run(cli, configuration).await
}
