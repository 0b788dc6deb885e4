use std::path::PathBuf;

use strum::{Display, IntoStaticStr};
use thiserror::Error;

/// Failures of the login/download/install pipeline.
///
/// Messages are shown to the user verbatim, so they must never carry the
/// secret, an anti-forgery token or a response body.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no csrf_token field found on the {page} page")]
    TokenMissing { page: &'static str },

    #[error("login failed: the site rejected the username or password")]
    AuthenticationFailed,

    #[error("not logged in when opening the tests of task {task}")]
    NotAuthenticated { task: String },

    #[error("the site did not return a test archive (HTTP {status})")]
    DownloadRejected { status: u16 },

    #[error("downloaded archive is not a valid zip file: {0}")]
    CorruptArchive(#[from] zip::result::ZipError),

    #[error("cannot write to {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Stable name of each failure, independent of the message details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
pub enum FailureKind {
    TokenMissing,
    AuthenticationFailed,
    NotAuthenticated,
    DownloadRejected,
    CorruptArchive,
    #[strum(serialize = "IOFailure")]
    IoFailure,
    Transport,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::TokenMissing { .. } => FailureKind::TokenMissing,
            Error::AuthenticationFailed => FailureKind::AuthenticationFailed,
            Error::NotAuthenticated { .. } => FailureKind::NotAuthenticated,
            Error::DownloadRejected { .. } => FailureKind::DownloadRejected,
            Error::CorruptArchive(_) => FailureKind::CorruptArchive,
            Error::Io { .. } => FailureKind::IoFailure,
            Error::Transport { .. } => FailureKind::Transport,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn transport(url: &str, source: reqwest::Error) -> Self {
        Error::Transport {
            url: url.to_string(),
            source,
        }
    }
}
