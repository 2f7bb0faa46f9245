use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use votecount_parser::{Lexicons, LocatorConfig, ResolverConfig, WordList, WordSegmenter};
use votecount_tally::{PhaseConfig, Post};

/// A phase file: the phase configuration plus a `posts` array to replay
#[derive(Debug)]
pub struct PhaseFile {
    pub config: PhaseConfig,
    pub posts: Vec<Post>,
}

impl PhaseFile {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read phase file {}", path.display()))?;
        let mut value: Value = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?;

        // `posts` is split off by hand: flattening would break the numeric event keys.
        let posts = match value.as_object_mut().and_then(|obj| obj.remove("posts")) {
            Some(posts) => serde_json::from_value(posts).context("Invalid `posts` array")?,
            None => Vec::new(),
        };
        let config: PhaseConfig = serde_json::from_value(value)
            .with_context(|| format!("Invalid phase file {}", path.display()))?;
        config.validate().context("Invalid phase configuration")?;

        log::debug!("loaded {} posts from {}", posts.len(), path.display());
        Ok(Self { config, posts })
    }
}

/// Resolver/locator settings that replace the phase file's sections
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Overrides {
    pub resolver: Option<ResolverConfig>,
    pub locator: Option<LocatorConfig>,
}

impl Overrides {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let overrides: Self = toml::from_str(&raw)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        if let Some(resolver) = &overrides.resolver {
            resolver.validate().context("Invalid [resolver] section")?;
        }
        if let Some(locator) = &overrides.locator {
            locator.validate().context("Invalid [locator] section")?;
        }
        log::debug!("loaded overrides from {}", path.display());
        Ok(overrides)
    }

    pub fn apply(self, config: &mut PhaseConfig) {
        if let Some(resolver) = self.resolver {
            config.resolver = resolver;
        }
        if let Some(locator) = self.locator {
            config.locator = locator;
        }
    }

    pub fn resolver_or(&self, fallback: ResolverConfig) -> ResolverConfig {
        self.resolver.clone().unwrap_or(fallback)
    }

    pub fn locator_or_default(&self) -> LocatorConfig {
        self.locator.clone().unwrap_or_default()
    }
}

/// Segmenter over the union of the given word lists
pub fn segmenter(paths: &[PathBuf]) -> Result<WordSegmenter> {
    let mut lexicons = Lexicons::new();
    for path in paths {
        let words = WordList::from_path(path)
            .with_context(|| format!("Failed to load word list {}", path.display()))?;
        lexicons = lexicons.with(words);
    }
    if paths.is_empty() {
        log::debug!("no word lists given; acronym matching is disabled");
    }
    Ok(WordSegmenter::new(Arc::new(lexicons)))
}
