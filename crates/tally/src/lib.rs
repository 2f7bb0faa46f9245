//! # Votecount Tally
//!
//! Vote bookkeeping for one phase of a forum mafia game.
//!
//! ## Architecture
//!
//! ```text
//! Post stream (ascending numbers)
//!     │
//!     └──> PhaseCounter
//!          ├─> EventSchedule: kill > replace > reset > votecount reset > vote
//!          ├─> VoteLocator + PlayerResolver (votecount-parser)
//!          └─> TallyEngine
//!               ├─> stable SlotIds, buckets in arrival order
//!               ├─> weighted majority locks the choice
//!               └─> audit log + TallySnapshot
//!
//! replay_phase: PhaseCounter + moderator posts → PhaseOutcome
//! ```
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use votecount_parser::{WordList, WordSegmenter};
//! use votecount_tally::{replay_phase, Choice, PhaseCounter, Post};
//!
//! let segmenter = WordSegmenter::new(Arc::new(WordList::default()));
//! let counter = PhaseCounter::with_roster([["Hiraki"], ["Dekes"], ["Xtoxm"]], segmenter).unwrap();
//!
//! let posts = vec![
//!     Post::new("Hiraki", r#"<span class="noboldsig">Vote: Dekes</span>"#, 1),
//!     Post::new("Xtoxm", r#"<span class="noboldsig">vote dekes</span>"#, 2),
//! ];
//! let outcome = replay_phase(counter, &posts, &[]).unwrap();
//! assert_eq!(outcome.choice, Some(Choice::Player("Dekes".to_string())));
//! ```

mod config;
mod counter;
mod error;
mod event;
mod post;
mod replay;
mod tally;

pub use config::{PhaseConfig, TallyConfig};
pub use counter::PhaseCounter;
pub use error::{Result, TallyError};
pub use event::{Directive, EventSchedule};
pub use post::Post;
pub use replay::{replay_phase, PhaseOutcome, Transition};
pub use tally::{
    Bucket, Choice, Slot, SlotId, TallyEngine, TallySnapshot, Target, NOT_VOTING_LABEL,
    NO_LYNCH_LABEL,
};
