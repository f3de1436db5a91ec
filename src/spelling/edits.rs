//! Edit-distance candidate generation.

use std::collections::HashSet;

/// Alphabet used for replacements and insertions.
pub const LETTERS: &str = "abcdefghijklmnopqrstuvwxyz";

/// All strings one edit away from `word`: deletions, adjacent
/// transpositions, replacements and insertions.
pub fn edits1(word: &str) -> HashSet<String> {
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();
    let mut edits = HashSet::with_capacity(54 * n + 25);

    for i in 0..=n {
        let (left, right) = chars.split_at(i);

        if !right.is_empty() {
            // delete
            edits.insert(left.iter().chain(&right[1..]).collect());

            for c in LETTERS.chars() {
                // replace
                edits.insert(
                    left.iter()
                        .copied()
                        .chain(std::iter::once(c))
                        .chain(right[1..].iter().copied())
                        .collect(),
                );
            }
        }

        if right.len() > 1 {
            // transpose
            edits.insert(
                left.iter()
                    .chain([&right[1], &right[0]])
                    .chain(&right[2..])
                    .collect(),
            );
        }

        for c in LETTERS.chars() {
            // insert
            edits.insert(
                left.iter()
                    .copied()
                    .chain(std::iter::once(c))
                    .chain(right.iter().copied())
                    .collect(),
            );
        }
    }

    edits
}

/// All strings two edits away from `word`, produced lazily.
///
/// The sequence may repeat strings; callers filter it rather than collect it.
pub fn edits2(word: &str) -> impl Iterator<Item = String> + use<> {
    edits1(word).into_iter().flat_map(|e1| edits1(&e1).into_iter())
}
