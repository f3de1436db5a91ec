//! Sequence similarity used by the similar-documents filter.

use std::collections::HashMap;

/// Computes a normalized similarity ratio between two texts.
pub trait SimilarityRatio: Send + Sync {
    /// Similarity in `[0, 1]`; `1.0` means identical.
    fn ratio(&self, a: &str, b: &str) -> f64;

    /// Get the name of this measure (for debugging and configuration).
    fn name(&self) -> &'static str;
}

/// Ratcliff/Obershelp similarity over characters.
///
/// The ratio is `2 * M / T` where `T` is the total number of characters in
/// both texts and `M` the number of characters in the matching blocks found by
/// recursively taking the longest common substring. No element is treated as
/// junk.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceMatcher;

impl SequenceMatcher {
    /// Create a new matcher.
    pub fn new() -> Self {
        SequenceMatcher
    }

    /// Matching blocks as `(start_in_a, start_in_b, length)`, in no
    /// particular order.
    pub fn matching_blocks(a: &[char], b: &[char]) -> Vec<(usize, usize, usize)> {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }

        let mut blocks = Vec::new();
        let mut queue = vec![(0, a.len(), 0, b.len())];

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = longest_match(a, &b2j, alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            blocks.push((i, j, k));
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }

        blocks
    }
}

impl SimilarityRatio for SequenceMatcher {
    fn ratio(&self, a: &str, b: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let total = a.len() + b.len();
        if total == 0 {
            return 1.0;
        }

        let matches: usize = Self::matching_blocks(&a, &b).iter().map(|&(_, _, k)| k).sum();
        2.0 * matches as f64 / total as f64
    }

    fn name(&self) -> &'static str {
        "sequence_matcher"
    }
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]`, earliest in `a`
/// and then in `b` on ties.
fn longest_match(
    a: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    // j -> length of the match ending at a[i - 1], b[j]
    let mut j2len: HashMap<usize, usize> = HashMap::new();

    for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next_j2len = HashMap::new();
        if let Some(positions) = b2j.get(c) {
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
                next_j2len.insert(j, k);
                if k > best_size {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_size = k;
                }
            }
        }
        j2len = next_j2len;
    }

    (best_i, best_j, best_size)
}
