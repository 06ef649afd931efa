//! ffs binary entrypoint.
//!
//! This is the main entry point for the `ffs` command-line tool.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ffs_cli::cli::{Cli, Commands};
use ffs_cli::commands::{AuthCommand, ModelCommand, ServerCommand};
use ffs_cli::output::{Format, OutputFormat};
use ffs_cli::state::ClientState;

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), ffs_cli::CliError> {
    let format = OutputFormat::new(Format::from_flag(cli.json));
    let state = ClientState::new(cli.server, cli.cluster, cli.quiet);
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Model { command } => {
            ModelCommand::new(&state).execute(&mut stdout, &format, &command)
        }
        Commands::Server { command } => {
            ServerCommand::new(&state).execute(&mut stdout, &format, &command)
        }
        Commands::Auth { command } => {
            AuthCommand::new(&state).execute(&mut stdout, &format, &command)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ffs_cli::cli::{ModelCommands, ServerCommands};

    #[test]
    fn cli_parses_server_health() {
        let cli = Cli::parse_from(["ffs", "server", "health"]);
        assert!(matches!(
            cli.command,
            Commands::Server {
                command: ServerCommands::Health
            }
        ));
    }

    #[test]
    fn cli_parses_model_list_with_globals() {
        let cli = Cli::parse_from(["ffs", "--json", "--quiet", "model", "list"]);
        assert!(cli.json);
        assert!(cli.quiet);
        assert!(matches!(
            cli.command,
            Commands::Model {
                command: ModelCommands::List { .. }
            }
        ));
    }
}
