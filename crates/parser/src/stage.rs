use serde::{Deserialize, Serialize};

use crate::normalize::{edit_distance, normalize, substring_distance};

/// One step of the player-matching cascade.
///
/// Each stage is a pure predicate over (vote text, roster entry). The
/// resolver applies stages in order and accepts the first one that is
/// satisfied by exactly one roster entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchStage {
    /// Whole vote text within `max_distance` of the name
    Distance { max_distance: usize },

    /// The name contains a substring within `max_distance` of the vote text
    NameContainsVote { max_distance: usize },

    /// The vote text, or a contiguous run of its words, is within
    /// `max_distance` of the name ("PlayerX's replacement")
    VoteContainsName { max_distance: usize },

    /// The alphabetic part of the vote is within `max_distance` of the
    /// acronym derived from the name's word segmentation
    Acronym { max_distance: usize },
}

impl MatchStage {
    /// Default cascade: tight rules first, permissive rules last
    #[must_use]
    pub fn default_cascade() -> Vec<Self> {
        vec![
            Self::Distance { max_distance: 0 },
            Self::NameContainsVote { max_distance: 0 },
            Self::NameContainsVote { max_distance: 1 },
            Self::Distance { max_distance: 1 },
            Self::Distance { max_distance: 2 },
            Self::VoteContainsName { max_distance: 0 },
            Self::VoteContainsName { max_distance: 1 },
            Self::VoteContainsName { max_distance: 2 },
            Self::Acronym { max_distance: 1 },
        ]
    }

    /// Whether `entry` satisfies this stage for `vote`
    #[must_use]
    pub fn matches(&self, vote: &VoteText, entry: &RosterEntry) -> bool {
        match *self {
            Self::Distance { max_distance } => {
                edit_distance(&vote.lower, &entry.lower) <= max_distance
            }
            Self::NameContainsVote { max_distance } => {
                substring_distance(&vote.lower, &entry.lower) <= max_distance
            }
            Self::VoteContainsName { max_distance } => {
                let longest = entry.lower.chars().count() + max_distance;
                vote.phrases(longest)
                    .any(|phrase| edit_distance(phrase, &entry.lower) <= max_distance)
            }
            Self::Acronym { max_distance } => {
                !entry.acronym.is_empty()
                    && edit_distance(&vote.letters, &entry.acronym) <= max_distance
            }
        }
    }

    /// Indices of every roster entry satisfying this stage
    #[must_use]
    pub fn candidates(&self, vote: &VoteText, roster: &[RosterEntry]) -> Vec<usize> {
        roster
            .iter()
            .enumerate()
            .filter(|(_, entry)| self.matches(vote, entry))
            .map(|(idx, _)| idx)
            .collect()
    }
}

impl std::fmt::Display for MatchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Distance { max_distance } => write!(f, "distance<={max_distance}"),
            Self::NameContainsVote { max_distance } => {
                write!(f, "name-contains-vote<={max_distance}")
            }
            Self::VoteContainsName { max_distance } => {
                write!(f, "vote-contains-name<={max_distance}")
            }
            Self::Acronym { max_distance } => write!(f, "acronym<={max_distance}"),
        }
    }
}

/// Index of the single item satisfying `predicate`, or `None` on zero or
/// several hits.
pub fn unique_hit<T>(items: &[T], mut predicate: impl FnMut(&T) -> bool) -> Option<usize> {
    let mut hit = None;
    for (idx, item) in items.iter().enumerate() {
        if predicate(item) {
            if hit.is_some() {
                return None;
            }
            hit = Some(idx);
        }
    }
    hit
}

/// Run `stages` in order; the first stage with exactly one hit wins.
///
/// Returns the winning stage together with the index of the matched item.
pub fn first_unique_hit<S, T>(
    stages: &[S],
    items: &[T],
    mut predicate: impl FnMut(&S, &T) -> bool,
) -> Option<(usize, usize)> {
    stages.iter().enumerate().find_map(|(stage_idx, stage)| {
        unique_hit(items, |item| predicate(stage, item)).map(|item_idx| (stage_idx, item_idx))
    })
}

/// Vote text prepared once for every stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteText {
    /// Trimmed, lower-cased vote text
    pub lower: String,
    /// Alphabetic characters only, lower-cased
    pub letters: String,
    /// Words of `lower` joined by single spaces
    spaced: String,
    /// Byte range of each word in `spaced`
    words: Vec<(usize, usize)>,
}

impl VoteText {
    pub fn new(raw: &str) -> Self {
        let lower = raw.trim().to_lowercase();
        let letters = normalize(&lower);
        let mut spaced = String::with_capacity(lower.len());
        let mut words = Vec::new();
        for word in lower.split_whitespace() {
            if !spaced.is_empty() {
                spaced.push(' ');
            }
            let start = spaced.len();
            spaced.push_str(word);
            words.push((start, spaced.len()));
        }
        Self {
            lower,
            letters,
            spaced,
            words,
        }
    }

    /// Contiguous runs of words, at most `max_chars` characters long.
    ///
    /// Runs only grow as they extend to the right, so each start stops at
    /// the first run over the limit.
    pub fn phrases(&self, max_chars: usize) -> impl Iterator<Item = &str> + '_ {
        self.words.iter().enumerate().flat_map(move |(idx, &(start, _))| {
            self.words[idx..]
                .iter()
                .map(move |&(_, end)| &self.spaced[start..end])
                .take_while(move |phrase| phrase.chars().count() <= max_chars)
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }
}

/// A roster name prepared for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    /// Name as written in the roster
    pub display: String,
    /// Lower-cased name
    pub lower: String,
    /// Lower-cased acronym from the best word segmentation (may be empty)
    pub acronym: String,
}

impl RosterEntry {
    pub fn new(display: impl Into<String>, acronym: impl Into<String>) -> Self {
        let display = display.into();
        Self {
            lower: display.to_lowercase(),
            acronym: acronym.into().to_lowercase(),
            display,
        }
    }
}
