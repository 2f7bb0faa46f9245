use scraper::node::Element;
use scraper::{ElementRef, Html, Node};

use crate::config::LocatorConfig;

/// Sentinel text for a retracted vote.
pub const UNVOTE: &str = "UNVOTE";

const VOTE_KEYWORD: &str = "vote";
const UNVOTE_KEYWORD: &str = "unvote";

/// A vote declaration found in a post, before player resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawVote {
    /// The declaration retracts the author's vote
    Unvote,
    /// Free text naming the intended target
    Target(String),
}

impl RawVote {
    /// Interpret a string, mapping the literal `UNVOTE` sentinel
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text == UNVOTE {
            Self::Unvote
        } else {
            Self::Target(text)
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unvote => UNVOTE,
            Self::Target(text) => text,
        }
    }
}

impl std::fmt::Display for RawVote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed markup of a single post.
///
/// Parsing is lenient: any input produces a tree, so malformed posts simply
/// yield no votes.
pub struct PostMarkup {
    html: Html,
}

impl PostMarkup {
    pub fn parse(content: &str) -> Self {
        let html = Html::parse_fragment(content);
        if !html.errors.is_empty() {
            log::trace!("post markup parsed with {} recoverable errors", html.errors.len());
        }
        Self { html }
    }
}

/// Finds vote declarations in post markup.
///
/// Vote-signal elements are bold spans, bold inline styles and explicit vote
/// tags. Elements inside quotations are skipped, and when signals nest only
/// the outermost one is read. Within an element the last "vote" keyword is
/// the anchor: the text after it is the target, unless the keyword is the
/// tail of an "unvote".
#[derive(Debug, Clone)]
pub struct VoteLocator {
    config: LocatorConfig,
    bold_styles: Vec<String>,
}

impl VoteLocator {
    pub fn new(config: LocatorConfig) -> Self {
        let bold_styles = config.bold_styles.iter().map(|s| compact_style(s)).collect();
        Self {
            config,
            bold_styles,
        }
    }

    /// Lazily yield the post's votes in document order
    pub fn votes<'a>(&'a self, post: &'a PostMarkup) -> impl Iterator<Item = RawVote> + 'a {
        post.html
            .root_element()
            .descendants()
            .flat_map(move |node| match node.value() {
                Node::Element(_) => ElementRef::wrap(node)
                    .filter(|el| self.is_live_signal(*el))
                    .map(|el| self.live_text(el))
                    .into_iter()
                    .collect::<Vec<_>>(),
                Node::Text(text) if self.config.broken_bold_tags => {
                    let parent = node.parent().and_then(ElementRef::wrap);
                    if parent.is_some_and(is_top_level) {
                        broken_bold_texts(text)
                    } else {
                        Vec::new()
                    }
                }
                _ => Vec::new(),
            })
            .filter_map(move |text| self.extract(&text))
    }

    /// Parse `content` and collect its votes
    #[must_use]
    pub fn find_votes(&self, content: &str) -> Vec<RawVote> {
        let post = PostMarkup::parse(content);
        self.votes(&post).collect()
    }

    /// Whether the post declares at least one vote
    #[must_use]
    pub fn includes_vote(&self, post: &PostMarkup) -> bool {
        self.votes(post).next().is_some()
    }

    /// Read the vote (if any) out of one vote-signal element's text
    #[must_use]
    pub fn extract(&self, text: &str) -> Option<RawVote> {
        let text = text.trim_start();
        // ASCII lowering keeps byte offsets aligned with `text`.
        let lower = text.to_ascii_lowercase();

        if let Some(window) = self.config.anchor_window {
            let end = lower
                .char_indices()
                .nth(window)
                .map_or(lower.len(), |(idx, _)| idx);
            if !lower[..end].contains(VOTE_KEYWORD) {
                return None;
            }
        }

        let vote_at = lower.rfind(VOTE_KEYWORD)?;
        let unvote_at = lower.rfind(UNVOTE_KEYWORD);
        if unvote_at.is_some_and(|at| at + 2 == vote_at) {
            return Some(RawVote::Unvote);
        }

        let target = text[vote_at + VOTE_KEYWORD.len()..]
            .replace(':', " ")
            .trim()
            .to_string();
        Some(RawVote::Target(target))
    }

    fn is_live_signal(&self, el: ElementRef<'_>) -> bool {
        if !self.is_signal(el.value()) {
            return false;
        }
        // Quoted text is never a live vote; nested signals are read through
        // their outermost ancestor.
        !el.ancestors()
            .filter_map(ElementRef::wrap)
            .any(|ancestor| self.is_quote(ancestor.value()) || self.is_signal(ancestor.value()))
    }

    /// Text of a signal element, minus any quotation nested inside it
    fn live_text(&self, el: ElementRef<'_>) -> String {
        el.descendants()
            .filter_map(|node| match node.value() {
                Node::Text(text) => {
                    let quoted = node
                        .ancestors()
                        .take_while(|ancestor| ancestor.id() != el.id())
                        .filter_map(ElementRef::wrap)
                        .any(|ancestor| self.is_quote(ancestor.value()));
                    (!quoted).then_some(&**text)
                }
                _ => None,
            })
            .collect()
    }

    fn is_signal(&self, el: &Element) -> bool {
        let class_hit = el.classes().any(|class| {
            self.config
                .vote_classes
                .iter()
                .chain(&self.config.bold_classes)
                .any(|known| known == class)
        });
        class_hit
            || el.attr("style").is_some_and(|style| {
                let style = compact_style(style);
                self.bold_styles.iter().any(|marker| style.contains(marker.as_str()))
            })
    }

    fn is_quote(&self, el: &Element) -> bool {
        self.config
            .quote_tags
            .iter()
            .any(|tag| tag.eq_ignore_ascii_case(el.name()))
            || el
                .classes()
                .any(|class| self.config.quote_classes.iter().any(|known| known == class))
    }
}

impl Default for VoteLocator {
    fn default() -> Self {
        Self::new(LocatorConfig::default())
    }
}

fn compact_style(style: &str) -> String {
    style
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Text directly in the post body or in a top-level paragraph
fn is_top_level(parent: ElementRef<'_>) -> bool {
    match parent.value().name() {
        "html" | "body" => true,
        "p" => parent
            .parent()
            .and_then(ElementRef::wrap)
            .is_some_and(|grand| matches!(grand.value().name(), "html" | "body")),
        _ => false,
    }
}

/// Bold runs delimited by BBCode that the forum failed to render
fn broken_bold_texts(text: &str) -> Vec<String> {
    const OPEN: &str = "[b]";
    const CLOSE: &str = "[/b]";

    match (text.find(OPEN), text.find(CLOSE)) {
        (Some(open), Some(close)) if open < close => {
            vec![text[open + OPEN.len()..close].trim().to_string()]
        }
        (open, close) => {
            let mut texts = Vec::new();
            if let Some(close) = close {
                texts.push(text[..close].trim().to_string());
            }
            if let Some(open) = open {
                texts.push(text[open + OPEN.len()..].trim().to_string());
            }
            texts
        }
    }
}
