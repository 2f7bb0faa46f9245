use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use votecount_parser::Resolution;

use crate::error::{Result, TallyError};

/// An out-of-band moderator action scheduled for a specific post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `"<name> killed"`
    Kill { player: String },
    /// `"<new> replaced <old>"`
    Replace { replacement: String, existing: String },
    /// `"<name> reset"`
    ResetPlayer { player: String },
    /// `"votecount reset"`
    ResetTally,
    /// `"<voter> voted <target>"`
    Vote { voter: String, target: Resolution },
}

impl Directive {
    /// Application order within one post; lower runs first
    #[must_use]
    pub const fn priority(&self) -> u8 {
        match self {
            Self::Kill { .. } => 0,
            Self::Replace { .. } => 1,
            Self::ResetPlayer { .. } => 2,
            Self::ResetTally => 3,
            Self::Vote { .. } => 4,
        }
    }
}

impl FromStr for Directive {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        if text.eq_ignore_ascii_case("votecount reset") {
            return Ok(Self::ResetTally);
        }
        if let Some((voter, target)) = text.split_once(" voted ") {
            return Ok(Self::Vote {
                voter: name(voter, s)?,
                target: Resolution::from_target(&name(target, s)?),
            });
        }
        if let Some((replacement, existing)) = text.split_once(" replaced ") {
            return Ok(Self::Replace {
                replacement: name(replacement, s)?,
                existing: name(existing, s)?,
            });
        }
        if let Some(player) = text.strip_suffix(" killed") {
            return Ok(Self::Kill {
                player: name(player, s)?,
            });
        }
        if let Some(player) = text.strip_suffix(" reset") {
            return Ok(Self::ResetPlayer {
                player: name(player, s)?,
            });
        }
        Err(TallyError::invalid_directive(s))
    }
}

fn name(part: &str, directive: &str) -> Result<String> {
    let part = part.trim();
    if part.is_empty() {
        return Err(TallyError::invalid_directive(directive));
    }
    Ok(part.to_string())
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kill { player } => write!(f, "{player} killed"),
            Self::Replace {
                replacement,
                existing,
            } => write!(f, "{replacement} replaced {existing}"),
            Self::ResetPlayer { player } => write!(f, "{player} reset"),
            Self::ResetTally => f.write_str("votecount reset"),
            Self::Vote { voter, target } => write!(f, "{voter} voted {target}"),
        }
    }
}

/// Directives keyed by the post they apply to, each list in application order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventSchedule {
    by_post: BTreeMap<u64, Vec<Directive>>,
}

impl EventSchedule {
    /// Parse every directive up front so a malformed one fails before replay
    pub fn parse(raw: &BTreeMap<u64, Vec<String>>) -> Result<Self> {
        let mut by_post = BTreeMap::new();
        for (&post, directives) in raw {
            let mut parsed = directives
                .iter()
                .map(|d| d.parse::<Directive>())
                .collect::<Result<Vec<_>>>()?;
            parsed.sort_by_key(Directive::priority);
            by_post.insert(post, parsed);
        }
        Ok(Self { by_post })
    }

    /// Directives scheduled for a post (empty if none)
    #[must_use]
    pub fn at(&self, post: u64) -> &[Directive] {
        self.by_post.get(&post).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_post.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_post.values().map(Vec::len).sum()
    }
}
