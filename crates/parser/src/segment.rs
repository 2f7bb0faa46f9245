use std::cmp::Reverse;

use crate::lexicon::SharedLexicon;
use crate::normalize::normalize;

/// Splits identifiers into dictionary words.
///
/// Every full segmentation of the alphabetic part of a name is enumerated by
/// recursive prefix extension, then ranked so that segmentations whose
/// smallest piece is longest come first (ties: fewer pieces first). This
/// keeps "the man himself" ahead of "t he m an him self".
#[derive(Clone)]
pub struct WordSegmenter {
    lexicon: SharedLexicon,
}

impl std::fmt::Debug for WordSegmenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordSegmenter").finish_non_exhaustive()
    }
}

impl WordSegmenter {
    pub fn new(lexicon: SharedLexicon) -> Self {
        Self { lexicon }
    }

    /// All ranked segmentations of `normalize(name)`; empty when none covers it
    #[must_use]
    pub fn segment(&self, name: &str) -> Vec<Vec<String>> {
        let letters = normalize(name).to_ascii_lowercase();
        let mut results = Vec::new();
        if letters.is_empty() {
            return results;
        }
        let mut current = Vec::new();
        self.extend(&letters, 0, &mut current, &mut results);

        results.sort_by_key(|pieces| {
            let smallest = pieces.iter().map(String::len).min().unwrap_or(0);
            (Reverse(smallest), pieces.len())
        });
        results
    }

    /// First letters of the best segmentation, lower-cased (empty when none)
    #[must_use]
    pub fn acronym(&self, name: &str) -> String {
        self.segment(name)
            .first()
            .map(|pieces| acronym_of(pieces))
            .unwrap_or_default()
    }

    fn extend(
        &self,
        letters: &str,
        start: usize,
        current: &mut Vec<String>,
        results: &mut Vec<Vec<String>>,
    ) {
        // `letters` is ASCII-only after normalization, so byte offsets are safe.
        for end in start + 1..=letters.len() {
            let piece = &letters[start..end];
            if !self.lexicon.is_word(piece) {
                continue;
            }
            current.push(piece.to_string());
            if end == letters.len() {
                results.push(current.clone());
            } else {
                self.extend(letters, end, current, results);
            }
            current.pop();
        }
    }
}

fn acronym_of(pieces: &[String]) -> String {
    pieces
        .iter()
        .filter_map(|piece| piece.chars().next())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
