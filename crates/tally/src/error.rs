use thiserror::Error;

pub type Result<T> = std::result::Result<T, TallyError>;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("Unknown player: {0}")]
    UnknownPlayer(String),

    #[error("Alias {0:?} belongs to more than one slot")]
    DuplicateAlias(String),

    #[error("Slot {0} has no aliases")]
    EmptySlot(usize),

    #[error("Malformed event directive: {0:?}")]
    InvalidDirective(String),

    #[error("Post {post} arrived after post {last}; posts must be strictly increasing")]
    OutOfOrder { post: u64, last: u64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Parse(#[from] votecount_parser::ParseError),

    /// A failure while processing a post, with the audit log up to that point
    #[error("Processing post {post} failed: {source}")]
    Post {
        post: u64,
        source: Box<TallyError>,
        log: Vec<String>,
    },
}

impl TallyError {
    pub fn unknown_player(name: impl Into<String>) -> Self {
        Self::UnknownPlayer(name.into())
    }

    pub fn invalid_directive(directive: impl Into<String>) -> Self {
        Self::InvalidDirective(directive.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Attach the post number and audit log to a processing failure
    pub fn in_post(self, post: u64, log: &[String]) -> Self {
        match self {
            already @ Self::Post { .. } => already,
            other => Self::Post {
                post,
                source: Box::new(other),
                log: log.to_vec(),
            },
        }
    }

    /// Audit log captured when the failure happened (empty if none was attached)
    #[must_use]
    pub fn audit_log(&self) -> &[String] {
        match self {
            Self::Post { log, .. } => log,
            _ => &[],
        }
    }

    /// The underlying failure, unwrapping post context
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Post { source, .. } => source.root(),
            other => other,
        }
    }
}
