//! Syntactic cleanup of free-form model output into ingredient candidates.

/// Upper bound on the number of candidates kept from one block of text.
pub const MAX_INGREDIENTS: usize = 12;
/// Shortest accepted candidate, in characters.
pub const MIN_LEN: usize = 2;
/// Longest accepted candidate, in characters.
pub const MAX_LEN: usize = 39;

const DELIMITERS: &[char] = &['\n', ',', ':', '•', '-'];

/// Split `text` into at most [`MAX_INGREDIENTS`] trimmed, lower-cased
/// fragments whose length lies in `MIN_LEN..=MAX_LEN`.
///
/// No dictionary check is made and duplicates inside one text are kept.
pub fn parse_ingredients(text: &str) -> Vec<String> {
    text.split(DELIMITERS)
        .map(|fragment| fragment.trim().to_lowercase())
        .filter(|fragment| (MIN_LEN..=MAX_LEN).contains(&fragment.chars().count()))
        .take(MAX_INGREDIENTS)
        .collect()
}
