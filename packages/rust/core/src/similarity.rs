//! Title similarity.
//!
//! Ratcliff/Obershelp "gestalt" matching over Unicode scalar values: find the
//! longest common block, recurse on both sides, and report `2*M / (|a|+|b|)`
//! where `M` is the total size of all matched blocks. Ties between equally
//! long blocks go to the one starting earliest in `a`, then earliest in `b`.

/// Similarity ratio of two strings in `[0.0, 1.0]`.
///
/// Two empty strings are identical (`1.0`).
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * matched_chars(&a, &b) as f64 / total as f64
}

/// Sum of the sizes of all matching blocks.
fn matched_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        matched += size;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }

    matched
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as `(i, j, size)`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best) = (alo, blo, 0);
    let width = bhi - blo + 1;

    // run[k + 1] = length of the common run ending at (row, blo + k)
    let mut prev = vec![0usize; width];
    let mut cur = vec![0usize; width];

    for i in alo..ahi {
        for j in blo..bhi {
            let k = j - blo;
            cur[k + 1] = if a[i] == b[j] { prev[k] + 1 } else { 0 };
            if cur[k + 1] > best {
                best = cur[k + 1];
                best_i = i + 1 - best;
                best_j = j + 1 - best;
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    (best_i, best_j, best)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn identical_strings() {
        assert!(close(ratio("Markets rally", "Markets rally"), 1.0));
        assert!(close(ratio("", ""), 1.0));
    }

    #[test]
    fn one_side_empty() {
        assert!(close(ratio("abc", ""), 0.0));
        assert!(close(ratio("", "abc"), 0.0));
    }

    #[test]
    fn disjoint_strings() {
        assert!(close(ratio("abc", "xyz"), 0.0));
    }

    #[test]
    fn shifted_block() {
        // "bcd" is the only common block: 2 * 3 / 8
        assert!(close(ratio("abcd", "bcde"), 0.75));
    }

    #[test]
    fn counts_blocks_on_both_sides() {
        // "ab" and "cd" match around the differing middle: 2 * 4 / 10
        assert!(close(ratio("abXcd", "abYcd"), 0.8));
    }

    #[test]
    fn trailing_punctuation_is_near_duplicate() {
        let r = ratio("Markets rally on rate news!", "Markets rally on rate news");
        assert!(close(r, 52.0 / 53.0));
        assert!(r > 0.8);
    }

    #[test]
    fn counts_characters_not_bytes() {
        // Three of four Hangul syllables shared: 2 * 3 / 8
        assert!(close(ratio("국회의장", "국회의원"), 0.75));
    }

    #[test]
    fn stays_in_unit_interval() {
        let pairs = [
            ("Opposition unveils new housing plan", "Ministry denies report"),
            ("a", "aaaa"),
            ("abcabc", "cbacba"),
        ];
        for (a, b) in pairs {
            let r = ratio(a, b);
            assert!((0.0..=1.0).contains(&r), "{a} / {b} -> {r}");
        }
    }
}
