//! String helpers shared by the segmenter and the resolver.

/// Strip every character outside `[A-Za-z]`.
#[must_use]
pub fn normalize(input: &str) -> String {
    input.chars().filter(char::is_ascii_alphabetic).collect()
}

/// Levenshtein distance with unit costs, compared case-insensitively.
#[must_use]
pub fn edit_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(&a.to_lowercase(), &b.to_lowercase())
}

/// Smallest edit distance between `needle` and any contiguous substring of
/// `haystack` (including the empty one), compared case-insensitively.
///
/// A result of 0 means `haystack` contains `needle` literally.
#[must_use]
pub fn substring_distance(needle: &str, haystack: &str) -> usize {
    let needle: Vec<char> = needle.to_lowercase().chars().collect();
    let haystack: Vec<char> = haystack.to_lowercase().chars().collect();

    // Row `i` holds the cost of matching needle[..i] ending at each haystack
    // position; a free start anywhere in the haystack keeps row 0 at zero.
    let mut prev = vec![0usize; haystack.len() + 1];
    let mut curr = vec![0usize; haystack.len() + 1];
    for (i, nc) in needle.iter().enumerate() {
        curr[0] = i + 1;
        for (j, hc) in haystack.iter().enumerate() {
            let substitution = prev[j] + usize::from(nc != hc);
            let deletion = prev[j + 1] + 1;
            let insertion = curr[j] + 1;
            curr[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev.into_iter().min().unwrap_or(needle.len())
}

/// Case-insensitive check that `input` starts with `prefix`.
#[must_use]
pub fn has_prefix_ci(input: &str, prefix: &str) -> bool {
    let head: String = input.chars().take(prefix.chars().count()).collect();
    head.eq_ignore_ascii_case(prefix)
}
