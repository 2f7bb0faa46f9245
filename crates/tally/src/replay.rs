use serde::Serialize;

use crate::counter::PhaseCounter;
use crate::error::{Result, TallyError};
use crate::post::Post;
use crate::tally::{same_name, Choice, TallySnapshot};

/// Post range of the moderator posts that close a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub start: u64,
    pub end: u64,
}

impl Transition {
    fn new(start: u64, end: u64) -> Result<Self> {
        if end < start {
            return Err(TallyError::invalid_config(format!(
                "transition ends at post {end} before it starts at post {start}"
            )));
        }
        Ok(Self { start, end })
    }
}

/// Result of replaying one phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseOutcome {
    pub choice: Option<Choice>,
    /// Post that decided the phase
    pub decided_at: Option<u64>,
    pub transition: Option<Transition>,
    pub snapshot: TallySnapshot,
    pub log: Vec<String>,
}

/// Replay `posts` through `counter`.
///
/// After the choice is made, the first unbroken run of moderator posts is
/// taken as the day/night transition; the first non-moderator post after
/// that run ends the replay.
pub fn replay_phase<'a, I>(
    mut counter: PhaseCounter,
    posts: I,
    moderators: &[String],
) -> Result<PhaseOutcome>
where
    I: IntoIterator<Item = &'a Post>,
{
    let is_moderator = |author: &str| moderators.iter().any(|m| same_name(m, author));
    let mut run: Option<(u64, u64)> = None;

    for post in posts {
        if counter.choice().is_none() {
            counter.process_post(post)?;
            continue;
        }
        match (run, is_moderator(&post.author)) {
            (None, true) => run = Some((post.number, post.number)),
            (Some((start, _)), true) => run = Some((start, post.number)),
            (Some(_), false) => break,
            (None, false) => {}
        }
    }

    let transition = run.map(|(start, end)| Transition::new(start, end)).transpose()?;
    if let (Some(decided), Some(t)) = (counter.decided_at(), transition) {
        log::info!(
            "phase decided at post {decided}; transition posts {}..={}",
            t.start,
            t.end
        );
    }

    Ok(PhaseOutcome {
        choice: counter.choice().cloned(),
        decided_at: counter.decided_at(),
        transition,
        snapshot: counter.snapshot(),
        log: counter.log().to_vec(),
    })
}
