use votecount_parser::{PlayerResolver, PostMarkup, ResolverConfig, VoteLocator, WordSegmenter};

use crate::config::PhaseConfig;
use crate::error::{Result, TallyError};
use crate::event::{Directive, EventSchedule};
use crate::post::Post;
use crate::tally::{Choice, TallyEngine, TallySnapshot};

/// Drives a [`TallyEngine`] over the posts of one phase.
///
/// Per post: scheduled directives first (in priority order), then the
/// author's votes if the author holds an active slot. Once a choice is made
/// the remaining posts are skipped.
#[derive(Debug)]
pub struct PhaseCounter {
    tally: TallyEngine,
    resolver: PlayerResolver,
    segmenter: WordSegmenter,
    resolver_config: ResolverConfig,
    locator: VoteLocator,
    events: EventSchedule,
    last_post: Option<u64>,
    decided_at: Option<u64>,
}

impl PhaseCounter {
    pub fn new(config: &PhaseConfig, segmenter: WordSegmenter) -> Result<Self> {
        config.validate()?;
        let tally = TallyEngine::new(&config.slots, &config.tally)?;
        let events = EventSchedule::parse(&config.events)?;
        let resolver = PlayerResolver::new(tally.aliases(), &segmenter, config.resolver.clone())?;

        log::debug!(
            "phase counter ready: {} slots, {} scheduled directives",
            tally.slots().len(),
            events.len()
        );
        Ok(Self {
            tally,
            resolver,
            segmenter,
            resolver_config: config.resolver.clone(),
            locator: VoteLocator::new(config.locator.clone()),
            events,
            last_post: None,
            decided_at: None,
        })
    }

    /// Counter with default resolver and locator settings
    pub fn with_roster<I, S>(slots: I, segmenter: WordSegmenter) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self::new(&PhaseConfig::new(slots), segmenter)
    }

    #[must_use]
    pub const fn tally(&self) -> &TallyEngine {
        &self.tally
    }

    #[must_use]
    pub const fn resolver(&self) -> &PlayerResolver {
        &self.resolver
    }

    #[must_use]
    pub fn choice(&self) -> Option<&Choice> {
        self.tally.choice()
    }

    /// Post whose processing produced the choice
    #[must_use]
    pub const fn decided_at(&self) -> Option<u64> {
        self.decided_at
    }

    #[must_use]
    pub fn snapshot(&self) -> TallySnapshot {
        self.tally.snapshot()
    }

    #[must_use]
    pub fn log(&self) -> &[String] {
        self.tally.log()
    }

    /// Process one post; failures carry the audit log up to this post
    pub fn process_post(&mut self, post: &Post) -> Result<()> {
        if let Some(last) = self.last_post {
            if post.number <= last {
                return Err(TallyError::OutOfOrder {
                    post: post.number,
                    last,
                });
            }
        }
        self.last_post = Some(post.number);

        if self.tally.choice().is_some() {
            return Ok(());
        }

        self.apply_post(post)
            .map_err(|err| err.in_post(post.number, self.tally.log()))?;

        if self.tally.choice().is_some() {
            self.decided_at = Some(post.number);
        }
        Ok(())
    }

    fn apply_post(&mut self, post: &Post) -> Result<()> {
        self.process_events(post.number)?;

        if !self.tally.is_active(&post.author) {
            log::trace!("post {} by {} is not from a player", post.number, post.author);
            return Ok(());
        }

        let markup = PostMarkup::parse(&post.content);
        let votes: Vec<_> = self.locator.votes(&markup).collect();
        for raw in votes {
            if let Some(target) = self.resolver.resolve(&raw)? {
                self.tally.update(&post.author, &target, post.number)?;
            }
        }
        Ok(())
    }

    fn process_events(&mut self, post: u64) -> Result<()> {
        let directives = self.events.at(post).to_vec();
        let mut roster_changed = false;
        for directive in &directives {
            log::debug!("applying {directive:?} at post {post}");
            match directive {
                Directive::Kill { player } => {
                    self.tally.kill_player(player, post)?;
                    roster_changed = true;
                }
                Directive::Replace {
                    replacement,
                    existing,
                } => {
                    self.tally.replace_player(existing, replacement, post)?;
                    roster_changed = true;
                }
                Directive::ResetPlayer { player } => self.tally.reset_player(player, post)?,
                Directive::ResetTally => self.tally.reset(post),
                Directive::Vote { voter, target } => self.tally.update(voter, target, post)?,
            }
        }
        if roster_changed {
            self.rebuild_resolver()?;
        }
        Ok(())
    }

    fn rebuild_resolver(&mut self) -> Result<()> {
        self.resolver = PlayerResolver::new(
            self.tally.aliases(),
            &self.segmenter,
            self.resolver_config.clone(),
        )?;
        Ok(())
    }
}
