//! Option shuffling with correct-answer tracking.

use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::GenerationError;

/// Upper bound on padding attempts when a pool runs out of distractors.
const MAX_PAD_ATTEMPTS: usize = 50;

/// Shuffles `options` uniformly and returns the new position of the option
/// that was at `correct`.
///
/// # Errors
///
/// Returns [`GenerationError::CorrectIndexOutOfRange`] when `correct` does not
/// index into `options`.
///
/// # Example
///
/// ```
/// use question_bank::shuffle_with_correct;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
/// let options = vec!["rätt", "fel", "fel igen"];
/// let (shuffled, correct) = shuffle_with_correct(options, 0, &mut rng).expect("valid index");
///
/// assert_eq!(shuffled.get(correct), Some(&"rätt"));
/// ```
pub fn shuffle_with_correct<T, R>(
    options: Vec<T>,
    correct: usize,
    rng: &mut R,
) -> Result<(Vec<T>, usize), GenerationError>
where
    R: Rng + ?Sized,
{
    let len = options.len();
    if correct >= len {
        return Err(GenerationError::CorrectIndexOutOfRange {
            index: correct,
            len,
        });
    }
    let mut paired: Vec<(usize, T)> = options.into_iter().enumerate().collect();
    paired.shuffle(rng);
    let position = paired
        .iter()
        .position(|(original, _)| *original == correct)
        .ok_or(GenerationError::CorrectIndexOutOfRange {
            index: correct,
            len,
        })?;
    Ok((paired.into_iter().map(|(_, option)| option).collect(), position))
}

/// Builds `n` unique options: the correct answer, then pool entries in order,
/// then random numbers below 100 if the pool is too small.
///
/// # Errors
///
/// Propagates [`shuffle_with_correct`] errors.
pub fn options_with_pool<R>(
    correct: &str,
    pool: &[String],
    n: usize,
    rng: &mut R,
) -> Result<(Vec<String>, usize), GenerationError>
where
    R: Rng + ?Sized,
{
    let mut options = vec![correct.to_owned()];
    for candidate in pool {
        if options.len() >= n {
            break;
        }
        if !options.contains(candidate) {
            options.push(candidate.clone());
        }
    }
    let mut attempts = 0;
    while options.len() < n && attempts < MAX_PAD_ATTEMPTS {
        attempts += 1;
        let candidate = rng.random_range(0_u32..100).to_string();
        if !options.contains(&candidate) {
            options.push(candidate);
        }
    }
    shuffle_with_correct(options, 0, rng)
}

/// Builds `n` options where the distractors look like the correct word.
///
/// Pool words are ranked by spelling likeness: twice the length of the shared
/// prefix plus the number of shared characters. `strength` is a percentage
/// that decides how many of the `n - 1` distractor slots go to the top-ranked
/// words; the remaining slots are drawn at random from the rest.
///
/// # Errors
///
/// Propagates [`shuffle_with_correct`] errors.
pub fn ranked_options<R>(
    correct: &str,
    pool: &[String],
    n: usize,
    strength: u32,
    rng: &mut R,
) -> Result<(Vec<String>, usize), GenerationError>
where
    R: Rng + ?Sized,
{
    let mut ranked: Vec<&String> = pool.iter().filter(|word| *word != correct).collect();
    ranked.sort_by_key(|word| std::cmp::Reverse(likeness(correct, word)));

    let slots = n.saturating_sub(1);
    let strength_slots = usize::try_from(strength).unwrap_or(usize::MAX);
    let like_count = strength_slots
        .saturating_mul(slots)
        .saturating_add(50)
        .checked_div(100)
        .unwrap_or(0)
        .min(ranked.len());

    let (alike, rest) = ranked.split_at(like_count);
    let mut others: Vec<&String> = rest.to_vec();
    others.shuffle(rng);

    let mut options = vec![correct.to_owned()];
    for candidate in alike.iter().chain(others.iter()) {
        if options.len() >= n {
            break;
        }
        if !options.iter().any(|option| option == *candidate) {
            options.push((*candidate).clone());
        }
    }
    let mut attempt = 0;
    while options.len() < n && attempt < MAX_PAD_ATTEMPTS {
        attempt += 1;
        let candidate = if pool.is_empty() {
            format!("{correct}{attempt}")
        } else {
            let slot = attempt.checked_rem(pool.len()).unwrap_or(0);
            pool.get(slot)
                .cloned()
                .unwrap_or_else(|| format!("{correct}{attempt}"))
        };
        if !options.contains(&candidate) {
            options.push(candidate);
        }
    }
    shuffle_with_correct(options, 0, rng)
}

fn likeness(correct: &str, word: &str) -> usize {
    let prefix = correct
        .chars()
        .zip(word.chars())
        .take_while(|(a, b)| a == b)
        .count();
    let left: BTreeSet<char> = correct.chars().collect();
    let right: BTreeSet<char> = word.chars().collect();
    prefix * 2 + left.intersection(&right).count()
}
