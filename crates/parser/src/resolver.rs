use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::ResolverConfig;
use crate::error::{ParseError, Result};
use crate::locator::{RawVote, UNVOTE};
use crate::normalize::{edit_distance, has_prefix_ci, normalize};
use crate::segment::WordSegmenter;
use crate::stage::{first_unique_hit, unique_hit, RosterEntry, VoteText};

/// Sentinel target meaning "no elimination this phase".
pub const NO_LYNCH: &str = "NO LYNCH";

/// The identity a vote was resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    /// Retract the current vote
    Unvote,
    /// Vote for no elimination
    NoLynch,
    /// Vote for the named player (as written in the roster)
    Player(String),
}

impl Resolution {
    /// Parse a target string, mapping the `UNVOTE` and `NO LYNCH` sentinels
    pub fn from_target(target: &str) -> Self {
        match target {
            UNVOTE => Self::Unvote,
            NO_LYNCH => Self::NoLynch,
            name => Self::Player(name.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unvote => UNVOTE,
            Self::NoLynch => NO_LYNCH,
            Self::Player(name) => name,
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps free-text vote targets onto roster names.
///
/// The roster is prepared once: lower-cased names behind a synthetic
/// `NO LYNCH` pseudo-player, each with the acronym of its best word
/// segmentation. Resolution then walks the configured stage cascade and
/// accepts the first stage that singles out exactly one entry.
#[derive(Debug, Clone)]
pub struct PlayerResolver {
    roster: Vec<RosterEntry>,
    config: ResolverConfig,
    count_is_a_name: bool,
}

impl PlayerResolver {
    pub fn new<I, S>(players: I, segmenter: &WordSegmenter, config: ResolverConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        config.validate()?;

        let mut roster = vec![RosterEntry::new(NO_LYNCH, segmenter.acronym(NO_LYNCH))];
        let mut seen: HashSet<String> = HashSet::from([NO_LYNCH.to_lowercase()]);
        for player in players {
            let name = player.as_ref().trim();
            if name.is_empty() {
                return Err(ParseError::invalid_roster("player names must not be blank"));
            }
            if !seen.insert(name.to_lowercase()) {
                return Err(ParseError::invalid_roster(format!(
                    "player name {name:?} appears more than once (or is reserved)"
                )));
            }
            roster.push(RosterEntry::new(name, segmenter.acronym(name)));
        }

        let count_is_a_name = roster[1..]
            .iter()
            .any(|entry| has_prefix_ci(&normalize(&entry.lower), &config.count_prefix));

        Ok(Self {
            roster,
            config,
            count_is_a_name,
        })
    }

    /// Real player names, in roster order
    pub fn players(&self) -> impl Iterator<Item = &str> {
        self.roster[1..].iter().map(|entry| entry.display.as_str())
    }

    /// Derived acronym of a roster name (empty when it has no segmentation)
    #[must_use]
    pub fn acronym(&self, player: &str) -> Option<&str> {
        let lower = player.to_lowercase();
        self.roster
            .iter()
            .find(|entry| entry.lower == lower)
            .map(|entry| entry.acronym.as_str())
    }

    /// Resolve a located vote
    pub fn resolve(&self, vote: &RawVote) -> Result<Option<Resolution>> {
        match vote {
            RawVote::Unvote => Ok(Some(Resolution::Unvote)),
            RawVote::Target(text) => self.resolve_target(text),
        }
    }

    /// Resolve a vote string; the literal `UNVOTE` is the retraction sentinel
    pub fn resolve_text(&self, text: &str) -> Result<Option<Resolution>> {
        self.resolve(&RawVote::from_text(text))
    }

    fn resolve_target(&self, text: &str) -> Result<Option<Resolution>> {
        let vote = VoteText::new(text);
        if vote.is_empty() {
            log::debug!("empty vote target ignored");
            return Ok(None);
        }

        if !self.count_is_a_name && has_prefix_ci(&normalize(text), &self.config.count_prefix) {
            log::debug!("{text:?} is a votecount request, not a vote");
            return Ok(None);
        }

        let hit = first_unique_hit(&self.config.stages, &self.roster, |stage, entry| {
            stage.matches(&vote, entry)
        });
        if let Some((stage_idx, entry_idx)) = hit {
            let resolution = self.resolution_at(entry_idx);
            log::debug!(
                "resolved {text:?} to {resolution} via {}",
                self.config.stages[stage_idx]
            );
            return Ok(Some(resolution));
        }

        let idiom = self.is_non_vote_idiom(&vote);
        if self.config.nearest_match_fallback && !idiom {
            if let Some(entry_idx) = self.nearest(&vote) {
                let resolution = self.resolution_at(entry_idx);
                log::debug!("resolved {text:?} to closest name {resolution}");
                return Ok(Some(resolution));
            }
        }

        if self.config.flag_unmatched_votes && !idiom {
            return Err(ParseError::unresolved(text));
        }

        log::warn!("dropping vote {text:?}: no unique player match");
        Ok(None)
    }

    /// Recognised phrases that look like votes but never name a player
    fn is_non_vote_idiom(&self, vote: &VoteText) -> bool {
        has_prefix_ci(&vote.lower, &self.config.count_prefix)
            || self.config.ignored_phrases.iter().any(|phrase| {
                edit_distance(&vote.lower, phrase) <= self.config.ignored_phrase_distance
            })
    }

    /// The unique entry at minimal whole-string distance
    fn nearest(&self, vote: &VoteText) -> Option<usize> {
        let distances: Vec<usize> = self
            .roster
            .iter()
            .map(|entry| edit_distance(&vote.lower, &entry.lower))
            .collect();
        let best = *distances.iter().min()?;
        unique_hit(&distances, |distance| *distance == best)
    }

    fn resolution_at(&self, entry_idx: usize) -> Resolution {
        if entry_idx == 0 {
            Resolution::NoLynch
        } else {
            Resolution::Player(self.roster[entry_idx].display.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::WordList;
    use crate::stage::MatchStage;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn segmenter() -> WordSegmenter {
        WordSegmenter::new(Arc::new(WordList::from_words([
            "no", "lynch", "the", "man", "him", "self", "himself",
        ])))
    }

    fn resolver(players: &[&str], config: ResolverConfig) -> PlayerResolver {
        PlayerResolver::new(players.iter().copied(), &segmenter(), config).unwrap()
    }

    fn player(name: &str) -> Option<Resolution> {
        Some(Resolution::Player(name.to_string()))
    }

    #[test]
    fn unvote_sentinel_short_circuits() {
        let r = resolver(&["Unvote"], ResolverConfig::strict());
        assert_eq!(r.resolve_text("UNVOTE").unwrap(), Some(Resolution::Unvote));
        assert_eq!(r.resolve(&RawVote::Unvote).unwrap(), Some(Resolution::Unvote));
    }

    #[test]
    fn exact_match_ignores_case() {
        let r = resolver(&["Hiraki", "Mariyta"], ResolverConfig::default());
        assert_eq!(r.resolve_text("hiraki").unwrap(), player("Hiraki"));
    }

    #[test]
    fn no_lynch_is_a_pseudo_player() {
        let r = resolver(&["singersigner", "AGar"], ResolverConfig::default());
        assert_eq!(r.resolve_text("No Lynch").unwrap(), Some(Resolution::NoLynch));
        assert_eq!(r.resolve_text("NL").unwrap(), Some(Resolution::NoLynch));
    }

    #[test]
    fn containment_beats_distance() {
        let r = resolver(&["Xtoxm", "moose200x"], ResolverConfig::default());
        assert_eq!(r.resolve_text("Moose").unwrap(), player("moose200x"));
    }

    #[test]
    fn tolerates_one_misspelling() {
        let r = resolver(&["Mariyta", "moose200x"], ResolverConfig::default());
        assert_eq!(r.resolve_text("Moos200x").unwrap(), player("moose200x"));
    }

    #[test]
    fn near_duplicates_stay_unresolved() {
        let r = resolver(&["alpha1", "alpha2"], ResolverConfig::default());
        assert_eq!(r.resolve_text("alpha").unwrap(), None);

        let strict = resolver(&["alpha1", "alpha2"], ResolverConfig::strict());
        let err = strict.resolve_text("alpha").unwrap_err();
        assert!(err.is_unresolved());
    }

    #[test]
    fn votecount_requests_are_not_votes() {
        let r = resolver(&["moose200x"], ResolverConfig::strict());
        assert_eq!(r.resolve_text("count?").unwrap(), None);
        assert_eq!(r.resolve_text("Count please").unwrap(), None);
    }

    #[test]
    fn count_prefix_is_a_vote_when_a_player_is_named_count() {
        let r = resolver(&["Count Olaf", "moose200x"], ResolverConfig::default());
        assert_eq!(r.resolve_text("count olaf").unwrap(), player("Count Olaf"));
    }

    #[test]
    fn deadline_extension_is_never_flagged() {
        let r = resolver(&["singersigner", "Guderian"], ResolverConfig::strict());
        assert_eq!(r.resolve_text("Deadline Extention").unwrap(), None);
    }

    #[test]
    fn unmatched_votes_raise_only_when_flagged() {
        let lenient = resolver(&["Guderian", "Rhinox"], ResolverConfig::default());
        assert_eq!(lenient.resolve_text("zzzzzzzz").unwrap(), None);

        let strict = resolver(&["Guderian", "Rhinox"], ResolverConfig::strict());
        match strict.resolve_text("zzzzzzzz") {
            Err(ParseError::UnresolvedVote { vote }) => assert_eq!(vote, "zzzzzzzz"),
            other => panic!("expected unresolved vote error, got {other:?}"),
        }
    }

    #[test]
    fn long_rambling_votes_resolve_promptly() {
        let r = resolver(&["Hiraki", "Mariyta"], ResolverConfig::default());
        let rambling = vec!["blah"; 500].join(" ");
        let started = std::time::Instant::now();
        assert_eq!(r.resolve_text(&rambling).unwrap(), None);
        assert_eq!(
            r.resolve_text(&format!("{rambling} mariyta")).unwrap(),
            player("Mariyta")
        );
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
    }

    #[test]
    fn nearest_fallback_picks_unique_closest() {
        let config = ResolverConfig {
            stages: vec![MatchStage::Distance { max_distance: 0 }],
            ..ResolverConfig::lenient()
        };
        let r = resolver(&["Guderian", "Rhinox"], config.clone());
        assert_eq!(r.resolve_text("Gudrain").unwrap(), player("Guderian"));

        // equally distant names are never guessed
        let tied = resolver(&["abcd", "abce"], config);
        assert_eq!(tied.resolve_text("abcx").unwrap(), None);
    }

    #[test]
    fn empty_target_is_ignored() {
        let r = resolver(&["Guderian"], ResolverConfig::strict());
        assert_eq!(r.resolve_text("   ").unwrap(), None);
    }

    #[test]
    fn acronyms_are_precomputed() {
        let r = resolver(&["themanhimself", "Kingcheese"], ResolverConfig::default());
        assert_eq!(r.acronym("TheManHimself"), Some("tmh"));
        assert_eq!(r.acronym("kingcheese"), Some(""));
        assert_eq!(r.acronym("nobody"), None);
        assert_eq!(r.players().collect::<Vec<_>>(), vec!["themanhimself", "Kingcheese"]);
    }

    #[test]
    fn rejects_duplicate_and_reserved_names() {
        let dup = PlayerResolver::new(["Hiraki", "hiraki"], &segmenter(), ResolverConfig::default());
        assert!(matches!(dup, Err(ParseError::InvalidRoster(_))));

        let reserved = PlayerResolver::new(["No Lynch"], &segmenter(), ResolverConfig::default());
        assert!(matches!(reserved, Err(ParseError::InvalidRoster(_))));

        let blank = PlayerResolver::new([" "], &segmenter(), ResolverConfig::default());
        assert!(matches!(blank, Err(ParseError::InvalidRoster(_))));
    }

    #[test]
    fn rejects_invalid_config() {
        let config = ResolverConfig {
            stages: Vec::new(),
            ..Default::default()
        };
        let result = PlayerResolver::new(["Hiraki"], &segmenter(), config);
        assert!(matches!(result, Err(ParseError::InvalidConfig(_))));
    }

    #[test]
    fn resolution_parses_sentinels() {
        assert_eq!(Resolution::from_target("UNVOTE"), Resolution::Unvote);
        assert_eq!(Resolution::from_target("NO LYNCH"), Resolution::NoLynch);
        assert_eq!(Resolution::from_target("Hiraki"), Resolution::Player("Hiraki".into()));
        assert_eq!(Resolution::NoLynch.to_string(), "NO LYNCH");
    }
}
