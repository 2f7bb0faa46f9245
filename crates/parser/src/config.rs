use serde::{Deserialize, Serialize};

use crate::error::{ParseError, Result};
use crate::stage::MatchStage;

/// Configuration for player resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Matching stages, tried in order
    pub stages: Vec<MatchStage>,

    /// Raise an error for votes no stage can resolve instead of dropping them
    pub flag_unmatched_votes: bool,

    /// After every stage failed, fall back to the unique closest name
    pub nearest_match_fallback: bool,

    /// Votes starting with this prefix are votecount requests
    pub count_prefix: String,

    /// Phrases that are never votes for a player ("deadline extension")
    pub ignored_phrases: Vec<String>,

    /// Edit distance within which a vote counts as an ignored phrase
    pub ignored_phrase_distance: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            stages: MatchStage::default_cascade(),
            flag_unmatched_votes: false,
            nearest_match_fallback: false,
            count_prefix: "count".to_string(),
            ignored_phrases: vec!["deadline extension".to_string()],
            ignored_phrase_distance: 2,
        }
    }
}

impl ResolverConfig {
    /// Strict config for offline validation: unresolved votes are errors
    pub fn strict() -> Self {
        Self {
            flag_unmatched_votes: true,
            ..Default::default()
        }
    }

    /// Lenient config: always guess the closest name when unambiguous
    pub fn lenient() -> Self {
        Self {
            nearest_match_fallback: true,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.stages.is_empty() {
            return Err(ParseError::invalid_config(
                "at least one matching stage is required",
            ));
        }

        if self.count_prefix.trim().is_empty() {
            return Err(ParseError::invalid_config("count_prefix must not be empty"));
        }

        if let Some(phrase) = self.ignored_phrases.iter().find(|p| p.trim().is_empty()) {
            return Err(ParseError::invalid_config(format!(
                "ignored phrase {phrase:?} is blank"
            )));
        }

        Ok(())
    }
}

/// Configuration for locating vote declarations in post markup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Classes of explicit vote tags (`[vote]` BBCode)
    pub vote_classes: Vec<String>,

    /// Classes of bold spans
    pub bold_classes: Vec<String>,

    /// Inline style fragments marking bold text (whitespace-insensitive)
    pub bold_styles: Vec<String>,

    /// Element names whose content is quoted from another post
    pub quote_tags: Vec<String>,

    /// Classes whose content is quoted from another post
    pub quote_classes: Vec<String>,

    /// Only accept a "vote" keyword that ends within this many leading characters
    pub anchor_window: Option<usize>,

    /// Treat raw `[b]`/`[/b]` left in top-level text as bold markup
    pub broken_bold_tags: bool,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            vote_classes: vec!["bbvote".to_string()],
            bold_classes: vec!["noboldsig".to_string()],
            bold_styles: vec!["font-weight:bold".to_string()],
            quote_tags: vec!["blockquote".to_string()],
            quote_classes: vec!["quotecontent".to_string()],
            anchor_window: None,
            broken_bold_tags: false,
        }
    }
}

impl LocatorConfig {
    /// Config mirroring how moderators read votes: the keyword must lead
    /// the bold text, and broken bold tags still count
    pub fn moderator_like() -> Self {
        Self {
            anchor_window: Some(7),
            broken_bold_tags: true,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.vote_classes.is_empty() && self.bold_classes.is_empty() && self.bold_styles.is_empty()
        {
            return Err(ParseError::invalid_config(
                "no vote-signal classes or styles configured",
            ));
        }

        if let Some(window) = self.anchor_window {
            if window < 4 {
                return Err(ParseError::invalid_config(format!(
                    "anchor_window ({window}) cannot be shorter than the \"vote\" keyword"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs_valid() {
        assert!(ResolverConfig::default().validate().is_ok());
        assert!(LocatorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_preset_configs_valid() {
        assert!(ResolverConfig::strict().validate().is_ok());
        assert!(ResolverConfig::lenient().validate().is_ok());
        assert!(LocatorConfig::moderator_like().validate().is_ok());
    }

    #[test]
    fn test_resolver_validation() {
        let mut config = ResolverConfig::default();

        config.stages.clear();
        assert!(config.validate().is_err());

        config.stages = MatchStage::default_cascade();
        config.count_prefix = "  ".to_string();
        assert!(config.validate().is_err());

        config.count_prefix = "count".to_string();
        config.ignored_phrases.push(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_locator_validation() {
        let mut config = LocatorConfig {
            anchor_window: Some(3),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.anchor_window = None;
        config.vote_classes.clear();
        config.bold_classes.clear();
        config.bold_styles.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: ResolverConfig =
            serde_json::from_str(r#"{"flag_unmatched_votes": true}"#).unwrap();
        assert!(config.flag_unmatched_votes);
        assert_eq!(config.stages, MatchStage::default_cascade());
        assert_eq!(config.count_prefix, "count");
    }
}
