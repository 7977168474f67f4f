//! Ratcliff/Obershelp similarity over characters.
//!
//! Finds the longest common block, recurses on both sides, and scores
//! `2 * matched / (len(a) + len(b))`. Ties in block search resolve to the
//! earliest block in `a`, then the earliest in `b`, so scores are reproducible.

use std::collections::BTreeMap;

/// Similarity ratio in [0, 1]. Two empty strings are identical (1.0).
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched = matching_chars(&a, &b);
    2.0 * matched as f64 / total as f64
}

/// Total size of all matching blocks between `a` and `b`.
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut b2j: BTreeMap<char, Vec<usize>> = BTreeMap::new();
    for (j, ch) in b.iter().enumerate() {
        b2j.entry(*ch).or_default().push(j);
    }

    let mut matched = 0;
    let mut queue = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, k) = longest_match(a, &b2j, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            queue.push((i + k, ahi, j + k, bhi));
        }
    }
    matched
}

/// Longest block `a[i..i+k] == b[j..j+k]` within the given bounds.
fn longest_match(
    a: &[char],
    b2j: &BTreeMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
    // j2len[j] = length of the match ending at a[i-1], b[j]
    let mut j2len: BTreeMap<usize, usize> = BTreeMap::new();
    for (i, ch) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next: BTreeMap<usize, usize> = BTreeMap::new();
        if let Some(positions) = b2j.get(ch) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = j
                    .checked_sub(1)
                    .and_then(|prev| j2len.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next.insert(j, k);
                if k > best_k {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_k = k;
                }
            }
        }
        j2len = next;
    }
    (best_i, best_j, best_k)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_identical_strings_score_one() {
        assert_eq!(similarity_ratio("email", "email"), 1.0);
        assert_eq!(similarity_ratio("", ""), 1.0);
    }

    #[test]
    fn test_disjoint_strings_score_zero() {
        assert_eq!(similarity_ratio("abc", "xyz"), 0.0);
        assert_eq!(similarity_ratio("", "abc"), 0.0);
    }

    #[test]
    fn test_prefix_ratio() {
        // 5 matched chars of 5 + 6
        assert!(close(similarity_ratio("skill", "skills"), 10.0 / 11.0));
    }

    #[test]
    fn test_recurses_on_both_sides() {
        // "abcd" vs "bcda": longest block "bcd", then "a" cannot match on either side.
        assert!(close(similarity_ratio("abcd", "bcda"), 6.0 / 8.0));
        // "e-mail addres" vs "e-mail address": 13 of 13 + 14
        assert!(close(
            similarity_ratio("e-mail addres", "e-mail address"),
            26.0 / 27.0
        ));
    }

    #[test]
    fn test_symmetric_for_simple_cases() {
        assert!(close(
            similarity_ratio("phone", "phone number"),
            similarity_ratio("phone number", "phone")
        ));
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        assert!(close(similarity_ratio("café", "cafe"), 6.0 / 8.0));
    }
}
