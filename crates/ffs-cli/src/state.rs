//! Process-local client state.

use std::cell::OnceCell;

use tracing::debug;

use ffs_sphere::{credentials, SphereClient, DEFAULT_BASE_URL};

use crate::error::CliError;

/// Shared state for one CLI invocation: the resolved global options plus a
/// lazily-constructed API client.
///
/// The client is only built (and credentials only resolved) the first time a
/// command actually needs to talk to the server, so commands like `auth
/// login` work with no credentials present.
#[derive(Debug)]
pub struct ClientState {
    server: Option<String>,
    cluster: Option<String>,
    quiet: bool,
    client: OnceCell<SphereClient>,
}

impl ClientState {
    /// Create state from the parsed global options.
    #[must_use]
    pub fn new(server: Option<String>, cluster: Option<String>, quiet: bool) -> Self {
        Self {
            server,
            cluster,
            quiet,
            client: OnceCell::new(),
        }
    }

    /// The `--server` override, if given.
    #[must_use]
    pub fn server(&self) -> Option<&str> {
        self.server.as_deref()
    }

    /// Whether minimal output was requested.
    #[must_use]
    pub fn quiet(&self) -> bool {
        self.quiet
    }

    /// The API client, built on first use.
    ///
    /// The server URL is taken from the `--server` flag (or `FFS_SERVER`),
    /// falling back to the credential file's `base_url` and then the
    /// built-in default.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials cannot be resolved or the client
    /// cannot be built.
    pub fn client(&self) -> Result<&SphereClient, CliError> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }

        let (resolved, source) = credentials::resolve()?;
        debug!(source = %source, "resolved credentials");

        let base_url = self
            .server
            .clone()
            .or_else(|| resolved.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let client =
            SphereClient::new(base_url, resolved.api_key)?.with_cluster(self.cluster.clone());
        Ok(self.client.get_or_init(|| client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_global_options() {
        let state = ClientState::new(
            Some("https://staging.example.com".into()),
            Some("gpu-west".into()),
            true,
        );
        assert_eq!(state.server(), Some("https://staging.example.com"));
        assert!(state.quiet());
    }

    #[test]
    fn defaults_are_empty() {
        let state = ClientState::new(None, None, false);
        assert_eq!(state.server(), None);
        assert!(!state.quiet());
    }
}
