use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use votecount_parser::{Resolution, NO_LYNCH};

use crate::config::TallyConfig;
use crate::error::{Result, TallyError};

/// Bucket label for slots without a current vote
pub const NOT_VOTING_LABEL: &str = "Not Voting";
/// Bucket label for votes for no elimination
pub const NO_LYNCH_LABEL: &str = "No Lynch";

/// Stable slot identity; survives eliminations of other slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(usize);

/// One roster position, possibly filled by several players over time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    id: SlotId,
    aliases: Vec<String>,
}

impl Slot {
    #[must_use]
    pub const fn id(&self) -> SlotId {
        self.id
    }

    /// Canonical (first) alias
    #[must_use]
    pub fn name(&self) -> &str {
        &self.aliases[0]
    }

    #[must_use]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    fn answers_to(&self, alias: &str) -> bool {
        self.aliases.iter().any(|a| same_name(a, alias))
    }
}

/// Player names compare under Unicode lower-casing.
pub(crate) fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// What a slot is currently voting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    NotVoting,
    NoLynch,
    Player(SlotId),
}

/// The phase decision once a bucket reaches majority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum Choice {
    NoLynch,
    /// Canonical name of the chosen slot
    Player(String),
}

impl Choice {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::NoLynch => NO_LYNCH,
            Self::Player(name) => name,
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Choice> for String {
    fn from(choice: Choice) -> Self {
        choice.as_str().to_string()
    }
}

/// Current vote state of a phase.
///
/// Slots are kept in display order and addressed through stable [`SlotId`]s;
/// eliminating a slot only drops its id, so every surviving vote keeps
/// pointing at the right slot. Each bucket remembers the order its voters
/// arrived in, which is the order they are rendered.
#[derive(Debug, Clone)]
pub struct TallyEngine {
    slots: Vec<Slot>,
    positions: HashMap<SlotId, usize>,
    votes: HashMap<SlotId, Target>,
    buckets: HashMap<Target, Vec<SlotId>>,
    double_voters: HashSet<SlotId>,
    less_one_for_mislynch: bool,
    choice: Option<Choice>,
    log: Vec<String>,
}

impl TallyEngine {
    /// Start a phase with every slot not voting
    pub fn new<I, S>(slots: I, config: &TallyConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator,
        S::Item: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut roster = Vec::new();
        for (idx, aliases) in slots.into_iter().enumerate() {
            let aliases: Vec<String> = aliases
                .into_iter()
                .map(|alias| alias.as_ref().trim().to_string())
                .collect();
            if aliases.is_empty() {
                return Err(TallyError::EmptySlot(idx));
            }
            for alias in &aliases {
                if alias.is_empty() {
                    return Err(TallyError::invalid_config(format!(
                        "slot {idx} has a blank alias"
                    )));
                }
                if !seen.insert(alias.to_lowercase()) {
                    return Err(TallyError::DuplicateAlias(alias.clone()));
                }
            }
            roster.push(Slot {
                id: SlotId(idx),
                aliases,
            });
        }

        let mut engine = Self {
            positions: HashMap::new(),
            votes: roster.iter().map(|s| (s.id, Target::NotVoting)).collect(),
            buckets: HashMap::from([
                (Target::NotVoting, roster.iter().map(Slot::id).collect()),
                (Target::NoLynch, Vec::new()),
            ]),
            slots: roster,
            double_voters: HashSet::new(),
            less_one_for_mislynch: config.less_one_for_mislynch,
            choice: None,
            log: Vec::new(),
        };
        for slot in &engine.slots {
            engine.buckets.insert(Target::Player(slot.id), Vec::new());
        }
        engine.reindex();

        for name in &config.double_voters {
            let id = engine.find(name)?;
            engine.double_voters.insert(id);
        }

        log::debug!("tally initialized with {} slots", engine.slots.len());
        Ok(engine)
    }

    /// Active slots in display order
    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Display position of an active slot
    #[must_use]
    pub fn position(&self, id: SlotId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    #[must_use]
    pub fn slot(&self, id: SlotId) -> Option<&Slot> {
        self.position(id).map(|pos| &self.slots[pos])
    }

    /// Whether an alias belongs to an active slot
    #[must_use]
    pub fn is_active(&self, alias: &str) -> bool {
        self.slots.iter().any(|slot| slot.answers_to(alias))
    }

    /// Aliases of every active slot, in display order
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.slots
            .iter()
            .flat_map(|slot| slot.aliases.iter().map(String::as_str))
    }

    #[must_use]
    pub fn choice(&self) -> Option<&Choice> {
        self.choice.as_ref()
    }

    #[must_use]
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Current target of the slot answering to `alias`
    pub fn target_of(&self, alias: &str) -> Result<Target> {
        let id = self.find(alias)?;
        Ok(self.votes.get(&id).copied().unwrap_or(Target::NotVoting))
    }

    /// Record a vote by `voter`; [`Resolution::Unvote`] retracts
    pub fn update(&mut self, voter: &str, target: &Resolution, post: u64) -> Result<()> {
        let voter_id = self.find(voter)?;
        let target = match target {
            Resolution::Unvote => Target::NotVoting,
            Resolution::NoLynch => Target::NoLynch,
            Resolution::Player(name) => Target::Player(self.find(name)?),
        };

        self.move_vote(voter_id, target);
        let line = format!(
            "{} voted {} in post {post}",
            self.name_of(voter_id),
            self.target_name(target)
        );
        self.record(line);
        self.check_threshold(target, post);
        Ok(())
    }

    /// Retract a single slot's vote
    pub fn reset_player(&mut self, player: &str, post: u64) -> Result<()> {
        self.update(player, &Resolution::Unvote, post)
    }

    /// Retract every vote
    pub fn reset(&mut self, post: u64) {
        let ids: Vec<SlotId> = self.slots.iter().map(Slot::id).collect();
        for id in ids {
            self.move_vote(id, Target::NotVoting);
        }
        self.record(format!("votecount reset in post {post}"));
    }

    /// Remove a slot; anyone voting for it goes back to not voting
    pub fn kill_player(&mut self, player: &str, post: u64) -> Result<()> {
        let killed = self.find(player)?;

        let stranded = self
            .buckets
            .remove(&Target::Player(killed))
            .unwrap_or_default();
        for voter in stranded {
            self.move_vote(voter, Target::NotVoting);
        }

        if let Some(target) = self.votes.remove(&killed) {
            if let Some(bucket) = self.buckets.get_mut(&target) {
                bucket.retain(|&id| id != killed);
            }
        }
        self.double_voters.remove(&killed);

        let name = self.name_of(killed).to_string();
        self.slots.retain(|slot| slot.id != killed);
        self.reindex();
        self.record(format!("{name} killed in post {post}"));
        Ok(())
    }

    /// Hand a live slot to a new player, keeping its votes
    pub fn replace_player(&mut self, existing: &str, replacement: &str, post: u64) -> Result<()> {
        let id = self.find(existing)?;
        let replacement = replacement.trim();
        if replacement.is_empty() {
            return Err(TallyError::invalid_directive(format!(
                "{replacement} replaced {existing}"
            )));
        }
        if self.is_active(replacement) {
            return Err(TallyError::DuplicateAlias(replacement.to_string()));
        }

        if let Some(pos) = self.position(id) {
            self.slots[pos].aliases.push(replacement.to_string());
        }
        self.record(format!("{replacement} replaced {existing} in post {post}"));
        Ok(())
    }

    /// Ordered buckets for rendering
    #[must_use]
    pub fn snapshot(&self) -> TallySnapshot {
        let mut buckets: Vec<Bucket> = self
            .slots
            .iter()
            .map(|slot| self.bucket(Target::Player(slot.id), slot.name()))
            .collect();
        buckets.push(self.bucket(Target::NotVoting, NOT_VOTING_LABEL));
        buckets.push(self.bucket(Target::NoLynch, NO_LYNCH_LABEL));
        TallySnapshot { buckets }
    }

    fn bucket(&self, target: Target, label: &str) -> Bucket {
        let voters = self
            .buckets
            .get(&target)
            .map(|ids| {
                ids.iter()
                    .flat_map(|&id| {
                        let copies = if self.double_voters.contains(&id) { 2 } else { 1 };
                        std::iter::repeat(self.name_of(id).to_string()).take(copies)
                    })
                    .collect()
            })
            .unwrap_or_default();
        Bucket {
            target: label.to_string(),
            voters,
        }
    }

    fn check_threshold(&mut self, target: Target, post: u64) {
        if self.choice.is_some() {
            return;
        }
        let choice = match target {
            Target::NotVoting => return,
            Target::NoLynch => Choice::NoLynch,
            Target::Player(id) => Choice::Player(self.name_of(id).to_string()),
        };

        let weighted = self.weight(target);
        let active = self.slots.len();
        let majority = 2 * weighted > active;
        let half_for_no_lynch =
            target == Target::NoLynch && self.less_one_for_mislynch && 2 * weighted == active;
        if majority || half_for_no_lynch {
            log::debug!("{choice} reached {weighted} of {active} votes");
            self.record(format!("{choice} reached majority in post {post}"));
            self.choice = Some(choice);
        }
    }

    fn weight(&self, target: Target) -> usize {
        self.buckets.get(&target).map_or(0, |voters| {
            voters
                .iter()
                .map(|id| if self.double_voters.contains(id) { 2 } else { 1 })
                .sum()
        })
    }

    fn move_vote(&mut self, voter: SlotId, target: Target) {
        if let Some(previous) = self.votes.insert(voter, target) {
            if let Some(bucket) = self.buckets.get_mut(&previous) {
                bucket.retain(|&id| id != voter);
            }
        }
        self.buckets.entry(target).or_default().push(voter);
    }

    fn find(&self, alias: &str) -> Result<SlotId> {
        let alias = alias.trim();
        self.slots
            .iter()
            .find(|slot| slot.answers_to(alias))
            .map(Slot::id)
            .ok_or_else(|| TallyError::unknown_player(alias))
    }

    fn name_of(&self, id: SlotId) -> &str {
        self.slot(id).map_or("?", Slot::name)
    }

    fn target_name(&self, target: Target) -> &str {
        match target {
            Target::NotVoting => votecount_parser::UNVOTE,
            Target::NoLynch => NO_LYNCH,
            Target::Player(id) => self.name_of(id),
        }
    }

    fn reindex(&mut self) {
        self.positions = self
            .slots
            .iter()
            .enumerate()
            .map(|(pos, slot)| (slot.id, pos))
            .collect();
    }

    fn record(&mut self, line: String) {
        log::debug!("{line}");
        self.log.push(line);
    }
}

impl fmt::Display for TallyEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.snapshot().fmt(f)
    }
}

/// Voters behind one target, double-voters listed twice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub target: String,
    pub voters: Vec<String>,
}

/// Rendered tally: player buckets in display order, then "Not Voting" and
/// "No Lynch".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallySnapshot {
    pub buckets: Vec<Bucket>,
}

impl TallySnapshot {
    #[must_use]
    pub fn voters_for(&self, target: &str) -> Option<&[String]> {
        self.buckets
            .iter()
            .find(|bucket| bucket.target == target)
            .map(|bucket| bucket.voters.as_slice())
    }

    /// Weighted vote total across all buckets
    #[must_use]
    pub fn total_votes(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.voters.len()).sum()
    }
}

impl fmt::Display for TallySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bucket in self.buckets.iter().filter(|b| !b.voters.is_empty()) {
            writeln!(
                f,
                "{} ({}): {}",
                bucket.target,
                bucket.voters.len(),
                bucket.voters.join(", ")
            )?;
        }
        Ok(())
    }
}
