//! Credential resolution and storage.
//!
//! An API key is looked up in three places, first hit wins:
//!
//! 1. The `FEATRIX_API_KEY` environment variable.
//! 2. A `.featrix.key` file found by walking from the working directory up
//!    to the filesystem root (per-project credentials).
//! 3. `$HOME/.featrix.key` (user-wide credentials).
//!
//! Credential files are either a JSON object (`{"api_key": "...",
//! "base_url": "..."}`) or plain `key=value` lines. The JSON form is what
//! this module writes; the key=value form is accepted for hand-edited files.

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SphereError};

/// Name of the credential file searched for in project directories and `$HOME`.
pub const CREDENTIAL_FILE_NAME: &str = ".featrix.key";

/// Environment variable consulted before any credential file.
pub const API_KEY_ENV: &str = "FEATRIX_API_KEY";

/// Stored API credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// API key presented to the server as a bearer token.
    pub api_key: String,

    /// Optional server URL pinned alongside the key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Where a set of credentials was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// The `FEATRIX_API_KEY` environment variable.
    Environment,
    /// A credential file found walking up from the working directory.
    ProjectFile(PathBuf),
    /// The credential file in the home directory.
    HomeFile(PathBuf),
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Environment => write!(f, "${API_KEY_ENV}"),
            Self::ProjectFile(path) => write!(f, "project file {}", path.display()),
            Self::HomeFile(path) => write!(f, "home file {}", path.display()),
        }
    }
}

/// Resolve credentials from the process environment and filesystem.
///
/// # Errors
///
/// Returns an error if no credentials exist anywhere, or if a candidate
/// file exists but is unreadable or invalid.
pub fn resolve() -> Result<(Credentials, CredentialSource)> {
    let cwd = env::current_dir()?;
    let env_key = env::var(API_KEY_ENV).ok();
    resolve_from(env_key.as_deref(), &cwd, dirs::home_dir().as_deref())
}

/// Resolve credentials from explicit inputs.
///
/// This is [`resolve`] with the environment, working directory, and home
/// directory passed in, so the search order can be exercised directly.
///
/// # Errors
///
/// Same conditions as [`resolve`].
pub fn resolve_from(
    env_key: Option<&str>,
    start_dir: &Path,
    home_dir: Option<&Path>,
) -> Result<(Credentials, CredentialSource)> {
    if let Some(key) = env_key {
        let key = key.trim();
        if !key.is_empty() {
            debug!("using API key from ${}", API_KEY_ENV);
            return Ok((
                Credentials {
                    api_key: key.to_string(),
                    base_url: None,
                },
                CredentialSource::Environment,
            ));
        }
    }

    for dir in start_dir.ancestors() {
        let candidate = dir.join(CREDENTIAL_FILE_NAME);
        if candidate.is_file() {
            let credentials = load(&candidate)?;
            debug!(path = %candidate.display(), "loaded project credentials");
            return Ok((credentials, CredentialSource::ProjectFile(candidate)));
        }
    }

    if let Some(home) = home_dir {
        let candidate = home.join(CREDENTIAL_FILE_NAME);
        if candidate.is_file() {
            let credentials = load(&candidate)?;
            debug!(path = %candidate.display(), "loaded home credentials");
            return Ok((credentials, CredentialSource::HomeFile(candidate)));
        }
    }

    Err(SphereError::CredentialsNotFound {
        searched: searched_locations(start_dir, home_dir),
    })
}

/// Load and parse a credential file.
///
/// # Errors
///
/// Returns an error if the file is unreadable or does not contain an
/// `api_key`.
pub fn load(path: &Path) -> Result<Credentials> {
    let content = fs::read_to_string(path).map_err(|source| SphereError::CredentialsUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content, path)
}

/// Write credentials to `path` in the canonical JSON form.
///
/// On unix the file is created with mode 0600.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn store(credentials: &Credentials, path: &Path) -> Result<()> {
    let mut payload =
        serde_json::to_string_pretty(credentials).map_err(|e| SphereError::InvalidCredentials {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    payload.push('\n');
    fs::write(path, payload)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(path, perms)?;
    }

    Ok(())
}

/// Delete a stored credential file.
///
/// Returns `true` if a file was removed, `false` if none existed.
///
/// # Errors
///
/// Returns an error for any failure other than the file being absent.
pub fn remove(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(SphereError::Io(e)),
    }
}

/// Path of the user-wide credential file, if a home directory exists.
#[must_use]
pub fn home_credential_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CREDENTIAL_FILE_NAME))
}

/// Path of a project-local credential file in the working directory.
#[must_use]
pub fn project_credential_path() -> PathBuf {
    PathBuf::from(CREDENTIAL_FILE_NAME)
}

fn parse(content: &str, path: &Path) -> Result<Credentials> {
    let credentials = if content.trim_start().starts_with('{') {
        serde_json::from_str::<Credentials>(content).map_err(|e| {
            SphereError::InvalidCredentials {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?
    } else {
        parse_key_value(content, path)?
    };

    if credentials.api_key.trim().is_empty() {
        return Err(SphereError::InvalidCredentials {
            path: path.to_path_buf(),
            reason: "api_key is empty".into(),
        });
    }
    Ok(credentials)
}

fn parse_key_value(content: &str, path: &Path) -> Result<Credentials> {
    let mut api_key = None;
    let mut base_url = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(SphereError::InvalidCredentials {
                path: path.to_path_buf(),
                reason: format!("expected key=value, got '{line}'"),
            });
        };
        match key.trim() {
            "api_key" => api_key = Some(value.trim().to_string()),
            "base_url" => base_url = Some(value.trim().to_string()),
            // Unknown keys are tolerated so the file can carry extra notes.
            _ => {}
        }
    }

    let api_key = api_key.ok_or_else(|| SphereError::InvalidCredentials {
        path: path.to_path_buf(),
        reason: "missing api_key".into(),
    })?;
    Ok(Credentials { api_key, base_url })
}

fn searched_locations(start_dir: &Path, home_dir: Option<&Path>) -> String {
    let mut parts = vec![
        format!("${API_KEY_ENV}"),
        format!(
            "{CREDENTIAL_FILE_NAME} in {} and its parents",
            start_dir.display()
        ),
    ];
    if let Some(home) = home_dir {
        parts.push(home.join(CREDENTIAL_FILE_NAME).display().to_string());
    }
    parts.join(", ")
}
