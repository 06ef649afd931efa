//! Credential management command implementation.
//!
//! `login` writes a credential file, `show` reports which credentials the
//! other commands would use, and `logout` removes the user-wide file. None
//! of these touch the network.

use std::io::Write;

use ffs_sphere::{credentials, Credentials};

use crate::cli::AuthCommands;
use crate::error::CliError;
use crate::output::{AuthStatus, Message, OutputFormat};
use crate::state::ClientState;

/// Auth command executor.
pub struct AuthCommand<'a> {
    state: &'a ClientState,
}

impl<'a> AuthCommand<'a> {
    /// Create a new auth command.
    #[must_use]
    pub fn new(state: &'a ClientState) -> Self {
        Self { state }
    }

    /// Execute an auth subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation fails.
    pub fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &AuthCommands,
    ) -> Result<(), CliError> {
        match command {
            AuthCommands::Login { api_key, project } => {
                self.login(writer, format, api_key, *project)
            }
            AuthCommands::Show => self.show(writer, format),
            AuthCommands::Logout => self.logout(writer, format),
        }
    }

    fn login<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        api_key: &str,
        project: bool,
    ) -> Result<(), CliError> {
        if api_key.trim().is_empty() {
            return Err(CliError::InvalidArgument("API key cannot be empty".into()));
        }

        let stored = Credentials {
            api_key: api_key.to_string(),
            base_url: self.state.server().map(str::to_string),
        };
        let path = if project {
            credentials::project_credential_path()
        } else {
            credentials::home_credential_path()
                .ok_or_else(|| CliError::Config("could not determine home directory".into()))?
        };
        credentials::store(&stored, &path)?;

        format.write(
            writer,
            &Message::success(format!("Stored API key in {}", path.display())),
        )
    }

    fn show<W: Write>(&self, writer: &mut W, format: &OutputFormat) -> Result<(), CliError> {
        let (resolved, source) = credentials::resolve()?;
        let status = AuthStatus {
            source: source.to_string(),
            api_key: mask_key(&resolved.api_key),
            base_url: resolved.base_url,
        };
        format.write(writer, &status)
    }

    fn logout<W: Write>(&self, writer: &mut W, format: &OutputFormat) -> Result<(), CliError> {
        let path = credentials::home_credential_path()
            .ok_or_else(|| CliError::Config("could not determine home directory".into()))?;
        if credentials::remove(&path)? {
            format.write(
                writer,
                &Message::success(format!("Removed {}", path.display())),
            )
        } else {
            format.write(writer, &Message::info("No stored credentials."))
        }
    }
}

/// Mask an API key for display, keeping just enough to recognize it.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len().max(4));
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_key_keeps_ends_of_long_keys() {
        assert_eq!(mask_key("sk-abcdefghijklmnop"), "sk-a...mnop");
    }

    #[test]
    fn mask_key_hides_short_keys_entirely() {
        assert_eq!(mask_key("secret"), "******");
        assert_eq!(mask_key("abc"), "****");
    }

    #[test]
    fn mask_key_handles_multibyte_keys() {
        // Never panics on non-ASCII input.
        let masked = mask_key("ключ-аутентификации");
        assert!(masked.starts_with("ключ"));
        assert!(masked.contains("..."));
    }
}
