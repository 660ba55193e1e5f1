//! Game scoring helpers.

use std::collections::HashMap;

/// Memory-game score: one point per guess that names a word occurring
/// exactly once in the shown list. Words shown more than once never score,
/// and a repeated guess scores each time. Matching is exact.
///
/// The result is the `memory_game` value of [`GameScores`](crate::GameScores).
///
/// ```
/// use cogscreen::games::recall_score;
/// use cogscreen::GameScores;
///
/// let shown = ["apple", "river", "chair", "river"];
/// let memory_game = recall_score(&shown, &["apple", "river", "cloud"]);
/// assert_eq!(memory_game, 1);
///
/// let scores = GameScores::new(10, memory_game, 1);
/// assert_eq!(scores.memory_game, 1);
/// ```
pub fn recall_score<A, G>(actual: &[A], guessed: &[G]) -> i64
where
    A: AsRef<str>,
    G: AsRef<str>,
{
    let mut shown: HashMap<&str, usize> = HashMap::new();
    for word in actual {
        *shown.entry(word.as_ref()).or_insert(0) += 1;
    }
    guessed
        .iter()
        .filter(|g| shown.get(g.as_ref() as &str) == Some(&1))
        .count() as i64
}
