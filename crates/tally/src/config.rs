use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use votecount_parser::{LocatorConfig, ResolverConfig};

use crate::error::{Result, TallyError};

/// Tally rules for one phase
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TallyConfig {
    /// NO LYNCH also wins on exactly half of the active slots
    pub less_one_for_mislynch: bool,
    /// Aliases of slots whose vote counts twice
    pub double_voters: Vec<String>,
}

/// Everything needed to count one phase: roster, schedule and rule sets.
///
/// Loaded from JSON by the CLI:
///
/// ```json
/// {
///   "slots": [["Hiraki"], ["Nul", "Amor"]],
///   "events": { "42": ["Hiraki killed"] },
///   "tally": { "less_one_for_mislynch": true },
///   "moderators": ["Mod"]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseConfig {
    /// Ordered slots; the first alias of each is canonical
    pub slots: Vec<Vec<String>>,
    /// Post number -> directives applied before that post's votes
    #[serde(default)]
    pub events: BTreeMap<u64, Vec<String>>,
    #[serde(default)]
    pub tally: TallyConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub locator: LocatorConfig,
    /// Posters whose posts mark the day/night transition during replay
    #[serde(default)]
    pub moderators: Vec<String>,
}

impl PhaseConfig {
    pub fn new<I, S>(slots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            slots: slots
                .into_iter()
                .map(|slot| slot.into_iter().map(Into::into).collect())
                .collect(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.slots.is_empty() {
            return Err(TallyError::invalid_config("phase has no slots"));
        }
        self.resolver.validate()?;
        self.locator.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_minimal_phase_json() {
        let json = r#"{ "slots": [["Hiraki"], ["Nul", "Amor"]] }"#;
        let config: PhaseConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.slots.len(), 2);
        assert_eq!(config.tally, TallyConfig::default());
        assert_eq!(config.resolver, ResolverConfig::default());
        assert!(config.events.is_empty());
        config.validate().unwrap();
    }

    #[test]
    fn event_keys_are_post_numbers() {
        let json = r#"{
            "slots": [["A"], ["B"]],
            "events": { "17": ["A killed"], "9": ["votecount reset"] },
            "tally": { "double_voters": ["B"] }
        }"#;
        let config: PhaseConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.events.keys().copied().collect::<Vec<_>>(), vec![9, 17]);
        assert_eq!(config.tally.double_voters, vec!["B"]);
    }

    #[test]
    fn empty_roster_is_invalid() {
        let config = PhaseConfig::new(Vec::<Vec<String>>::new());
        assert!(matches!(config.validate(), Err(TallyError::InvalidConfig(_))));
    }
}
