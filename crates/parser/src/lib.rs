//! # Votecount Parser
//!
//! Finds vote declarations in forum posts and resolves their free-text
//! targets to roster names, the way a human moderator would.
//!
//! ## Architecture
//!
//! ```text
//! Post markup
//!     │
//!     ├──> VoteLocator
//!     │    ├─> Select bold spans / bold styles / vote tags
//!     │    ├─> Skip quoted content, read outermost signals only
//!     │    └─> Anchor on the last "vote" keyword → RawVote
//!     │
//!     └──> PlayerResolver
//!          ├─> UNVOTE / votecount requests short-circuit
//!          ├─> Stage cascade (first unique hit wins)
//!          │     distance → containment → word runs → acronym
//!          └─> Unresolved: drop, nearest match, or error
//! ```
//!
//! Acronyms come from [`WordSegmenter`], which splits names into words
//! known to an injected [`Lexicon`].
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use votecount_parser::{
//!     PlayerResolver, Resolution, ResolverConfig, VoteLocator, WordList, WordSegmenter,
//! };
//!
//! let segmenter = WordSegmenter::new(Arc::new(WordList::from_words(["the", "man", "himself"])));
//! let resolver = PlayerResolver::new(
//!     ["Xtoxm", "moose200x", "themanhimself"],
//!     &segmenter,
//!     ResolverConfig::default(),
//! )
//! .unwrap();
//!
//! let locator = VoteLocator::default();
//! let votes = locator.find_votes(r#"<span class="noboldsig">Vote: Moose</span>"#);
//! let target = resolver.resolve(&votes[0]).unwrap();
//! assert_eq!(target, Some(Resolution::Player("moose200x".to_string())));
//! ```

mod config;
mod error;
mod lexicon;
mod locator;
mod normalize;
mod resolver;
mod segment;
mod stage;

pub use config::{LocatorConfig, ResolverConfig};
pub use error::{ParseError, Result};
pub use lexicon::{Lexicon, Lexicons, SharedLexicon, WordList};
pub use locator::{PostMarkup, RawVote, VoteLocator, UNVOTE};
pub use normalize::{edit_distance, normalize, substring_distance};
pub use resolver::{PlayerResolver, Resolution, NO_LYNCH};
pub use segment::WordSegmenter;
pub use stage::{first_unique_hit, unique_hit, MatchStage, RosterEntry, VoteText};
