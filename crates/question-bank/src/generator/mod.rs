//! Template-driven item generators.
//!
//! Each generator draws from curated word and number tables with a
//! [`ChaCha8Rng`], so a run is fully reproducible from its seed. Generators
//! return items with an empty `id`; numbering happens when the builder accepts
//! them.

mod charts;
mod matematik;
mod np_tasks;
mod passages;
mod strategy;
mod svenska;

use rand::seq::IndexedRandom;
use rand_chacha::ChaCha8Rng;

use crate::error::GenerationError;

pub use charts::{bar_compare, bar_dataset, bar_max, chart_item};
pub use matematik::matematik_item;
pub use np_tasks::{chance_matrix, pie_assign, table_fill};
pub use passages::{procedural_passage, svenska_passage, template_passage};
pub use strategy::math_strategy;
pub use svenska::{svenska_dnd, svenska_item};

/// Number of alternatives on generated multiple-choice items.
pub const OPTION_COUNT: usize = 4;

/// Picks one entry of a template table.
fn pick<'a, T>(
    pool: &'a [T],
    name: &'static str,
    rng: &mut ChaCha8Rng,
) -> Result<&'a T, GenerationError> {
    pool.choose(rng)
        .ok_or(GenerationError::EmptyPool { pool: name })
}

/// Picks `amount` distinct entries of a template table.
fn pick_many<T: Clone>(
    pool: &[T],
    amount: usize,
    name: &'static str,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<T>, GenerationError> {
    if pool.len() < amount {
        return Err(GenerationError::EmptyPool { pool: name });
    }
    Ok(pool.choose_multiple(rng, amount).cloned().collect())
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|word| (*word).to_owned()).collect()
}
