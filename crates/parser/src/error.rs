use thiserror::Error;

/// Result type for vote parsing operations
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors that can occur while locating or resolving votes
#[derive(Error, Debug)]
pub enum ParseError {
    /// Vote text matched no player and flagging is enabled
    #[error("Unresolved vote: {vote:?} matches no player")]
    UnresolvedVote { vote: String },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Roster cannot be used for resolution
    #[error("Invalid roster: {0}")]
    InvalidRoster(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ParseError {
    /// Create an unresolved vote error
    pub fn unresolved(vote: impl Into<String>) -> Self {
        Self::UnresolvedVote { vote: vote.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an invalid roster error
    pub fn invalid_roster(msg: impl Into<String>) -> Self {
        Self::InvalidRoster(msg.into())
    }

    /// Whether this error reports an unresolved vote (as opposed to misuse)
    #[must_use]
    pub const fn is_unresolved(&self) -> bool {
        matches!(self, Self::UnresolvedVote { .. })
    }
}
