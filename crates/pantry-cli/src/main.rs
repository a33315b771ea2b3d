mod commands;

use std::process::ExitCode;

use pantry_core::client::PantryClient;
use pantry_core::config::ClientConfig;
use tracing_subscriber::EnvFilter;

use crate::commands::Command;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("{message}\n\n{}", commands::USAGE);
            return ExitCode::from(2);
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(error) => {
            eprintln!("Failed to create Tokio runtime: {error}");
            return ExitCode::FAILURE;
        }
    };

    let config = ClientConfig::from_env();
    let client = match PantryClient::from_config(&config) {
        Ok(client) => client,
        Err(error) => {
            eprintln!("Failed to initialize client: {}", error.user_message());
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(commands::run(&client, command)) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("{}", error.user_message());
            ExitCode::FAILURE
        }
    }
}
