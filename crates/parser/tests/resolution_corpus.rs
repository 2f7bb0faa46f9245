use std::sync::Arc;

use pretty_assertions::assert_eq;
use votecount_parser::{
    PlayerResolver, Resolution, ResolverConfig, VoteLocator, WordList, WordSegmenter,
};

const GAME_1087: &[&str] = &[
    "Beefster",
    "werewolf555",
    "Hiraki",
    "Substrike22",
    "Antihero",
    "Lateralus22",
    "caelum",
    "boberz",
    "Mariyta",
    "brokenscraps",
    "LordChronos",
    "AntB",
    "pappums rat",
    "Mr Wright",
    "Ant_to_the_max",
    "Dekes",
    "Empking",
    "Xtoxm",
    "moose200x",
];

const GAME_1098: &[&str] = &[
    "EmpTyger",
    "Nul",
    "Substrike22",
    "Llamarble",
    "Pinewolf",
    "Amor",
    "Scott Brosius",
    "Internet Stranger",
    "themanhimself",
    "Guderian",
    "RobCapone",
    "Shattered Viewpoint",
    "chkflip",
    "WeirdRa",
    "brokenscraps",
    "Kingcheese",
];

const GAME_1094: &[&str] = &[
    "singersigner",
    "Nachomamma8",
    "ConfidAnon",
    "AGar",
    "Powerrox93",
    "Guderian",
    "Rhinox",
    "iamausername",
    "sims5487",
    "Seraphim",
    "mothrax",
    "Blood Queen",
    "Thor665",
    "Reckamonic",
    "Lateralus22",
    "Carrotcake",
];

fn segmenter() -> WordSegmenter {
    WordSegmenter::new(Arc::new(WordList::from_words([
        "no", "lynch", "the", "man", "him", "self", "himself", "scott", "bro", "sius", "king",
        "cheese", "pine", "wolf", "broken", "scraps", "internet", "stranger",
    ])))
}

fn resolver(players: &[&str], config: ResolverConfig) -> PlayerResolver {
    PlayerResolver::new(players.iter().copied(), &segmenter(), config).expect("valid roster")
}

fn resolve(players: &[&str], vote: &str) -> Option<Resolution> {
    resolver(players, ResolverConfig::strict())
        .resolve_text(vote)
        .expect("vote should resolve")
}

fn from_post(players: &[&str], content: &str) -> Vec<String> {
    let resolver = resolver(players, ResolverConfig::default());
    VoteLocator::default()
        .find_votes(content)
        .iter()
        .filter_map(|vote| resolver.resolve(vote).expect("lenient resolver"))
        .map(|resolution| resolution.to_string())
        .collect()
}

fn player(name: &str) -> Option<Resolution> {
    Some(Resolution::Player(name.to_string()))
}

#[test]
fn vote_in_bold_font() {
    let content = r#"<span class="noboldsig">Vote: Mariyta</span>"#;
    assert_eq!(from_post(GAME_1087, content), vec!["Mariyta"]);
}

#[test]
fn bold_vote_in_longer_post() {
    let content = r#"And that's nine.<br><br>Ohai, Mariyta!<br><br><span class="noboldsig">Vote: Mariyta</span>"#;
    assert_eq!(from_post(GAME_1087, content), vec!["Mariyta"]);
}

#[test]
fn bold_vote_followed_by_text() {
    let content = r#"<span class="noboldsig">Vote: Ant_to_the_max</span><br><br>There is not enough room in this town for both Ants!"#;
    assert_eq!(from_post(GAME_1087, content), vec!["Ant_to_the_max"]);
}

#[test]
fn vote_with_misspelled_name() {
    let content = r#"<span class="noboldsig"> Vote: Moos200x </span>"#;
    assert_eq!(from_post(GAME_1087, content), vec!["moose200x"]);
}

#[test]
fn vote_without_colon() {
    let content = r#"<span class="noboldsig">vote hiraki</span>"#;
    assert_eq!(from_post(GAME_1087, content), vec!["Hiraki"]);
}

#[test]
fn vote_tag_with_spaced_name() {
    let content = r#"<span class="bbvote" title="This is an official vote.">VOTE: Mr Wright</span>"#;
    assert_eq!(from_post(GAME_1087, content), vec!["Mr Wright"]);
}

#[test]
fn quoted_vote_is_ignored() {
    let content = r#"<blockquote><span class="noboldsig">vote hiraki</span></blockquote>"#;
    assert!(from_post(GAME_1087, content).is_empty());
}

#[test]
fn partial_name_with_equal_edit_distances() {
    let content = r#"<span class="noboldsig">Vote: Moose</span>"#;
    assert_eq!(from_post(&["Xtoxm", "moose200x"], content), vec!["moose200x"]);
}

#[test]
fn unvote_tag_names_nobody() {
    let content = r#"<span class="bbvote" title="This is an official unvote.">UNVOTE: Mr Wright</span>"#;
    assert_eq!(from_post(&["Xtoxm", "moose200x"], content), vec!["UNVOTE"]);
}

#[test]
fn multiline_unvote_then_vote() {
    let content = r#"<span class="noboldsig">Unvote;<br>Vote: Substrike22</span>"#;
    assert_eq!(from_post(&["Substrike22"], content), vec!["Substrike22"]);
}

#[test]
fn deadline_extension_is_not_a_vote() {
    let content = r#"<span class="noboldsig">Vote: Deadline Extention</span>"#;
    assert!(from_post(GAME_1094, content).is_empty());
    assert_eq!(resolve(GAME_1094, "Deadline Extention"), None);
}

#[test]
fn vote_for_no_lynch() {
    let content = r#"<span class="noboldsig">Vote: No Lynch</span>"#;
    assert_eq!(from_post(GAME_1094, content), vec!["NO LYNCH"]);
}

#[test]
fn abbreviation_after_unvote() {
    let content = concat!(
        r#"<span class="bbvote" title="This is an official unvote.">UNVOTE: Amor</span><br>"#,
        r#"<span class="bbvote" title="This is an official vote.">VOTE: TMHS</span>"#
    );
    assert_eq!(from_post(GAME_1098, content), vec!["UNVOTE", "themanhimself"]);
}

#[test]
fn acronym_of_compound_name() {
    assert_eq!(resolve(GAME_1098, "TMHS"), player("themanhimself"));
}

#[test]
fn acronym_of_spaced_name() {
    let players = [
        "EmpTyger",
        "Nul",
        "Substrike22",
        "Amor",
        "Scott Brosius",
        "Internet Stranger",
        "Guderian",
        "RobCapone",
        "Shattered Viewpoint",
        "brokenscraps",
        "Kingcheese",
    ];
    assert_eq!(resolve(&players, "SB"), player("Scott Brosius"));
}

#[test]
fn misspelled_prefix_of_name() {
    assert_eq!(resolve(GAME_1098, "ScottBro"), player("Scott Brosius"));
}

#[test]
fn vote_naming_a_replacement() {
    assert_eq!(
        resolve(GAME_1087, "Lateralus's replacement"),
        player("Lateralus22")
    );
}

#[test]
fn vote_naming_a_slot() {
    assert_eq!(resolve(GAME_1098, "Scott Brosius' Slot"), player("Scott Brosius"));
}

#[test]
fn vote_with_trailing_lynch_count() {
    assert_eq!(resolve(GAME_1098, "TheManHimself L - 1"), player("themanhimself"));
}

#[test]
fn votecount_request_with_player_present() {
    assert_eq!(resolve(&["moose200x"], "count?"), None);
}

#[test]
fn no_lynch_by_name() {
    assert_eq!(
        resolve(&["singersigner", "AGar"], "No Lynch"),
        Some(Resolution::NoLynch)
    );
}
