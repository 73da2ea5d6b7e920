//! Error types for the DDNS reconciler
//!
//! Every failure in this workspace is fatal to the current invocation. The
//! types here only describe *what* went wrong and *where*; deciding the
//! process exit status is left to the binary.

use std::fmt;

use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// A step of the reconciliation pipeline, used to label failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Resolving the caller's public IP
    ResolveIp,
    /// Listing record ids matching the identity
    Lookup,
    /// Reading the single record found by the lookup
    FetchDetail,
    /// Creating a missing record
    Create,
    /// Updating a stale record
    Update,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::ResolveIp => "resolve-ip",
            Step::Lookup => "lookup",
            Step::FetchDetail => "fetch-detail",
            Step::Create => "create",
            Step::Update => "update",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A network call could not complete or returned a non-2xx status
    Transport,
    /// A response body could not be read or decoded into the expected shape
    Read,
    /// Configuration is missing or invalid
    Config,
    /// A local failure unrelated to the network or the configuration
    Internal,
}

/// Core error type for the DDNS system
#[derive(Error, Debug)]
pub enum Error {
    /// The request could not complete (connectivity, timeout, non-2xx status)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body could not be consumed or has the wrong shape
    #[error("Read error: {0}")]
    Read(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON decoding errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Local I/O errors (configuration file access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Provider-specific transport error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// A failure attributed to a pipeline step
    #[error("{step} failed: {source}")]
    Step {
        step: Step,
        #[source]
        source: Box<Error>,
    },

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a read error
    pub fn read(msg: impl Into<String>) -> Self {
        Self::Read(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Attribute this error to a pipeline step
    pub fn at(self, step: Step) -> Self {
        Self::Step {
            step,
            source: Box::new(self),
        }
    }

    /// The step this error was attributed to, if any
    pub fn step(&self) -> Option<Step> {
        match self {
            Self::Step { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// Classify the error, looking through step context
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) | Self::Provider { .. } => ErrorKind::Transport,
            Self::Read(_) | Self::Json(_) => ErrorKind::Read,
            Self::Config(_) | Self::Io(_) => ErrorKind::Config,
            Self::Other(_) => ErrorKind::Internal,
            Self::Step { source, .. } => source.kind(),
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
