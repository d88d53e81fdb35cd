//! Typed errors for the import workflow.
//!
//! Every fatal condition of a run surfaces as an [`ImportError`]. Non-fatal
//! conditions (icon upload, assignment) are logged and collected as report
//! warnings instead.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

use crate::upload::ArtifactKind;

pub type Result<T, E = ImportError> = std::result::Result<T, E>;

/// Coarse classification used by callers that only care about the failure family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Precondition,
    Config,
    Transport,
    Status,
    Malformed,
    NotFound,
    Io,
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("did not receive a {0} path from the importer summary")]
    MissingArtifact(ArtifactKind),

    #[error("invalid configuration for `{setting}`: {reason}")]
    InvalidConfig { setting: &'static str, reason: String },

    #[error("request failed while trying to {step}")]
    Transport {
        step: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unable to {step}: server answered HTTP {status}")]
    UnexpectedStatus { step: String, status: StatusCode },

    #[error("unexpected response while trying to {step}: {detail}")]
    MalformedResponse { step: String, detail: String },

    #[error("unable to resolve {what} `{identifier}`")]
    NotFound {
        what: &'static str,
        identifier: String,
    },

    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ImportError {
    pub fn config(setting: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            setting,
            reason: reason.into(),
        }
    }

    pub fn transport(step: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            step: step.into(),
            source,
        }
    }

    pub fn status(step: impl Into<String>, status: StatusCode) -> Self {
        Self::UnexpectedStatus {
            step: step.into(),
            status,
        }
    }

    pub fn malformed(step: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::MalformedResponse {
            step: step.into(),
            detail: detail.into(),
        }
    }

    pub fn not_found(what: &'static str, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            what,
            identifier: identifier.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingArtifact(_) => ErrorKind::Precondition,
            Self::InvalidConfig { .. } => ErrorKind::Config,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::UnexpectedStatus { .. } => ErrorKind::Status,
            Self::MalformedResponse { .. } => ErrorKind::Malformed,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }
}
