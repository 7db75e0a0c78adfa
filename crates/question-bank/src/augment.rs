//! In-place upgrades of an existing mathematics bank.

use rand_chacha::ChaCha8Rng;

use crate::builder::{GenerationOptions, GenerationReport, MatematikRequest, extend_matematik};
use crate::error::GenerationError;
use crate::model::Bank;
use crate::profile::Profile;

/// Largest divisor kept by [`retune_division`].
pub const MAX_DIVISOR: i64 = 10;

/// Parses a prompt of the form `A ÷ B =`.
fn division_operands(prompt: &str) -> Option<(i64, i64)> {
    let compact: String = prompt.chars().filter(|c| !c.is_whitespace()).collect();
    let (left, rest) = compact.split_once('÷')?;
    let right = rest.strip_suffix('=').unwrap_or(rest);
    Some((left.parse().ok()?, right.parse().ok()?))
}

/// Whether a division fits the profile's bounds.
fn fits(dividend: i64, divisor: i64, profile: &Profile) -> bool {
    if dividend > i64::from(profile.max_dividend) || !(1..=MAX_DIVISOR).contains(&divisor) {
        return false;
    }
    if !profile.allow_nine && (divisor == 9 || dividend.rem_euclid(9) == 0) {
        return false;
    }
    dividend.checked_rem(divisor) == Some(0)
}

/// Drops division items that exceed the profile's bounds and returns how
/// many were removed.
///
/// Prompts that do not read `A ÷ B =` are kept.
///
/// # Examples
///
/// ```
/// use question_bank::{Bank, Item, ItemKind, Profile, augment::retune_division};
///
/// let division = |q: &str| Item::new("division", q, ItemKind::Mc { options: vec!["1".into(), "2".into()], correct: 0 });
/// let mut bank = Bank::empty("matematik");
/// bank.items.extend([division("12 ÷ 3 ="), division("81 ÷ 9 ="), division("Dela lika")]);
///
/// assert_eq!(retune_division(&mut bank, &Profile::default()), 1);
/// assert_eq!(bank.items.len(), 2);
/// ```
pub fn retune_division(bank: &mut Bank, profile: &Profile) -> usize {
    let before = bank.items.len();
    bank.items.retain(|item| {
        if item.area != "division" {
            return true;
        }
        division_operands(&item.q)
            .is_none_or(|(dividend, divisor)| fits(dividend, divisor, profile))
    });
    let removed = before - bank.items.len();
    tracing::info!(removed, max_dividend = profile.max_dividend, "retuned division items");
    removed
}

/// Appends `count` chart items, alternating highest-bar and difference
/// questions.
///
/// # Errors
///
/// Returns [`GenerationError`] when a chart cannot be generated.
pub fn add_diagrams(
    bank: &mut Bank,
    count: usize,
    profile: &Profile,
    options: GenerationOptions,
    rng: &mut ChaCha8Rng,
) -> Result<GenerationReport, GenerationError> {
    let request = MatematikRequest {
        plan: crate::plan::Plan::default(),
        diagrams: count,
        tables: 0,
        pies: 0,
        chances: 0,
    };
    extend_matematik(bank, &request, profile, options, rng)
}
