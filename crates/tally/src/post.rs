use serde::{Deserialize, Serialize};

/// A single forum post, as handed to the phase counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Display name of the poster
    pub author: String,
    /// Raw post markup
    pub content: String,
    /// Thread-wide post number; strictly increasing within a phase
    pub number: u64,
}

impl Post {
    pub fn new(author: impl Into<String>, content: impl Into<String>, number: u64) -> Self {
        Self {
            author: author.into(),
            content: content.into(),
            number,
        }
    }
}
