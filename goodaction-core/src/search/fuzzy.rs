//! Approximate substring matching.

/// Minimal number of single-character edits (insert, delete, substitute) that
/// turn `pattern` into some substring of `text`.
///
/// The match may start and end anywhere in `text`, so an exact substring costs 0.
pub fn substring_distance(pattern: &[char], text: &[char]) -> usize {
    if pattern.is_empty() {
        return 0;
    }

    // Row 0 is all zeros: a match may begin at any position of the text
    let mut prev = vec![0usize; text.len() + 1];
    let mut curr = vec![0usize; text.len() + 1];

    for (i, p) in pattern.iter().enumerate() {
        curr[0] = i + 1;
        for (j, t) in text.iter().enumerate() {
            let substitute = prev[j] + usize::from(p != t);
            let delete = prev[j + 1] + 1;
            let insert = curr[j] + 1;
            curr[j + 1] = substitute.min(delete).min(insert);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev.into_iter().min().unwrap_or(pattern.len())
}

/// Mismatch ratio of `pattern` against the best-matching part of `text`:
/// 0.0 for an exact substring, 1.0 when nothing lines up.
pub fn match_score(pattern: &[char], text: &[char]) -> f64 {
    if pattern.is_empty() {
        return 0.0;
    }
    let distance = substring_distance(pattern, text).min(pattern.len());
    distance as f64 / pattern.len() as f64
}

/// Lowercased characters of `s`, the form both patterns and fields are compared in.
pub fn normalize(s: &str) -> Vec<char> {
    s.chars().flat_map(char::to_lowercase).collect()
}
