//! Server command implementation.

use std::io::Write;

use crate::cli::ServerCommands;
use crate::error::CliError;
use crate::output::{HealthView, OutputFormat};
use crate::state::ClientState;

/// Server command executor.
pub struct ServerCommand<'a> {
    state: &'a ClientState,
}

impl<'a> ServerCommand<'a> {
    /// Create a new server command.
    #[must_use]
    pub fn new(state: &'a ClientState) -> Self {
        Self { state }
    }

    /// Execute a server subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation fails.
    pub fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &ServerCommands,
    ) -> Result<(), CliError> {
        match command {
            ServerCommands::Health => {
                let report = self.state.client()?.health_check()?;
                format.write(writer, &HealthView(report))
            }
        }
    }
}
