//! Error types for the execution adapters.
//!
//! These never leave the adapters: both adapters fold them into
//! [`cockpit_core::ExecutionResult::Failed`].

use std::time::Duration;

use thiserror::Error;

/// Errors raised while running a local command.
#[derive(Debug, Error)]
pub enum RunError {
    /// The executable could not be found.
    #[error("Command '{program}' not found. Make sure it is installed and on your PATH.")]
    NotFound {
        /// The program that was looked up.
        program: String,
    },

    /// The command did not finish within the configured bound.
    #[error("Command '{program}' timed out after {}s", .timeout.as_secs())]
    TimedOut {
        /// The program that was killed.
        program: String,
        /// The bound that elapsed.
        timeout: Duration,
    },

    /// Any other failure to spawn or wait for the process.
    #[error("Failed to run '{program}': {source}")]
    Io {
        /// The program being run.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl RunError {
    /// Classify an I/O error raised while spawning `program`.
    #[must_use]
    pub fn from_io(program: &str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound {
                program: program.to_string(),
            }
        } else {
            Self::Io {
                program: program.to_string(),
                source,
            }
        }
    }

    /// Returns true if the executable was missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors raised by an HTTP transport before a status code is available.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Request failed inside the HTTP client (DNS, connect, timeout, body read).
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// Connection-level failure reported by a non-reqwest transport.
    #[error("{0}")]
    Connection(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_io_errors_are_classified() {
        let err = RunError::from_io(
            "claude",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "Command 'claude' not found. Make sure it is installed and on your PATH."
        );

        let err = RunError::from_io(
            "claude",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn timeout_message_names_the_bound() {
        let err = RunError::TimedOut {
            program: "gemini".into(),
            timeout: Duration::from_secs(60),
        };
        assert_eq!(err.to_string(), "Command 'gemini' timed out after 60s");
    }
}
