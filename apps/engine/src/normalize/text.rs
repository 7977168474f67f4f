//! Casing helpers shared by the normalizer.

/// Upper-cases the first character and lower-cases the rest ("mCDONALD" -> "Mcdonald").
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Word-wise title case where any non-letter starts a new word.
///
/// "o'neil" -> "O'Neil", "3m company" -> "3M Company", "ACME inc." -> "Acme Inc.".
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_is_letter = false;
    for c in text.chars() {
        if previous_is_letter {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        previous_is_letter = c.is_alphabetic();
    }
    out
}

/// True when `needle` occurs in `haystack` with no letter directly on either side
/// of the occurrence. Digits and punctuation count as boundaries ("python3"
/// contains "python", "terraform" does not contain "r").
pub fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, matched)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + matched.len()..].chars().next();
        !before.is_some_and(char::is_alphabetic) && !after.is_some_and(char::is_alphabetic)
    })
}
