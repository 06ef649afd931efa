//! CLI error types.

use std::fmt;

use ffs_sphere::SphereError;

/// CLI-specific errors.
#[derive(Debug)]
pub enum CliError {
    /// Invalid configuration.
    Config(String),
    /// Invalid command argument.
    InvalidArgument(String),
    /// A remote API call failed.
    Sphere(SphereError),
    /// Model training ended in an error.
    TrainingFailed {
        /// The model whose training failed.
        model_id: String,
    },
    /// The wait loop gave up before training finished.
    WaitTimeout {
        /// Configured timeout in seconds.
        seconds: u64,
        /// The model's status at the time of the timeout.
        status: String,
    },
    /// The user declined a confirmation prompt.
    Aborted,
    /// Output formatting error.
    Format(String),
    /// IO error.
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {msg}"),
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::Sphere(e) => write!(f, "{e}"),
            Self::TrainingFailed { model_id } => write!(f, "training failed: {model_id}"),
            Self::WaitTimeout { seconds, status } => {
                write!(f, "timeout after {seconds}s (last status: {status})")
            }
            Self::Aborted => write!(f, "aborted"),
            Self::Format(msg) => write!(f, "format error: {msg}"),
            Self::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Sphere(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<SphereError> for CliError {
    fn from(err: SphereError) -> Self {
        Self::Sphere(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_config() {
        let err = CliError::Config("no home directory".into());
        assert_eq!(err.to_string(), "configuration error: no home directory");
    }

    #[test]
    fn display_training_failed() {
        let err = CliError::TrainingFailed {
            model_id: "fm-9".into(),
        };
        assert_eq!(err.to_string(), "training failed: fm-9");
    }

    #[test]
    fn display_wait_timeout() {
        let err = CliError::WaitTimeout {
            seconds: 3600,
            status: "training".into(),
        };
        assert_eq!(err.to_string(), "timeout after 3600s (last status: training)");
    }

    #[test]
    fn sphere_error_converts_and_keeps_message() {
        let sphere = SphereError::Api {
            operation: "refresh",
            status: 404,
            message: "not found".into(),
        };
        let err = CliError::from(sphere);
        assert!(err.to_string().contains("refresh"));
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe");
        let err = CliError::from(io_err);
        assert!(matches!(err, CliError::Io(_)));
    }
}
