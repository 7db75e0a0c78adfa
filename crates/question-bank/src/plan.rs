//! Generation plans: how many items to produce per task.

use std::fmt;

use crate::error::PlanError;

/// A task key that may appear in a `--plan` value.
pub trait PlanTask: Copy + Eq + fmt::Debug + 'static {
    /// All tasks in declaration order.
    const ALL: &'static [Self];

    /// Canonical plan key.
    fn key(self) -> &'static str;

    /// Alternative spellings accepted on input.
    fn aliases(self) -> &'static [&'static str] {
        &[]
    }

    /// Area tag written on generated items.
    fn area(self) -> &'static str {
        self.key()
    }

    /// Looks a task up by key or alias.
    #[must_use]
    fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|task| task.key() == key || task.aliases().contains(&key))
    }
}

/// Tasks that produce standalone Swedish items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SvenskaTask {
    /// Pick the correctly spelled word.
    Stavning,
    /// Pick the word of a given word class.
    Grammatik,
    /// Synonyms and antonyms.
    Ordforstaelse,
    /// Find the verb in a generated sentence.
    Meningar,
}

impl PlanTask for SvenskaTask {
    const ALL: &'static [Self] = &[
        Self::Stavning,
        Self::Grammatik,
        Self::Ordforstaelse,
        Self::Meningar,
    ];

    fn key(self) -> &'static str {
        match self {
            Self::Stavning => "stavning",
            Self::Grammatik => "grammatik",
            Self::Ordforstaelse => "ordförståelse",
            Self::Meningar => "meningar",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Ordforstaelse => &["ordforstaelse"],
            _ => &[],
        }
    }

    fn area(self) -> &'static str {
        match self {
            Self::Meningar => "grammatik",
            other => other.key(),
        }
    }
}

/// Tasks that produce standalone mathematics items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatematikTask {
    /// Two-term addition.
    Addition,
    /// Two-term subtraction.
    Subtraktion,
    /// Times tables.
    Multiplikation,
    /// Division with an integer quotient.
    Division,
    /// Place value and comparison.
    Taluppfattning,
    /// Shapes.
    Geometri,
    /// Reading the clock.
    Klockan,
    /// Units of measurement.
    Matning,
    /// Word problems.
    Problem,
}

impl PlanTask for MatematikTask {
    const ALL: &'static [Self] = &[
        Self::Addition,
        Self::Subtraktion,
        Self::Multiplikation,
        Self::Division,
        Self::Taluppfattning,
        Self::Geometri,
        Self::Klockan,
        Self::Matning,
        Self::Problem,
    ];

    fn key(self) -> &'static str {
        match self {
            Self::Addition => "addition",
            Self::Subtraktion => "subtraktion",
            Self::Multiplikation => "multiplikation",
            Self::Division => "division",
            Self::Taluppfattning => "taluppfattning",
            Self::Geometri => "geometri",
            Self::Klockan => "klockan",
            Self::Matning => "mätning",
            Self::Problem => "problem",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Matning => &["matning"],
            _ => &[],
        }
    }
}

/// Ordered `(task, count)` pairs.
///
/// # Example
///
/// ```
/// use question_bank::{Plan, SvenskaTask};
///
/// let plan = Plan::<SvenskaTask>::parse("stavning=4, ordforstaelse=2").expect("valid plan");
/// assert_eq!(plan.entries(), &[(SvenskaTask::Stavning, 4), (SvenskaTask::Ordforstaelse, 2)]);
/// assert_eq!(plan.total(), 6);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan<T> {
    entries: Vec<(T, usize)>,
}

impl<T> Default for Plan<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: PlanTask> Plan<T> {
    /// Parses a comma-separated `task=count` list.
    ///
    /// Empty parts are skipped. A task named twice keeps its first position
    /// and takes the last count.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError`] for a part without `=`, an unknown task or a
    /// count that is not a non-negative integer.
    pub fn parse(text: &str) -> Result<Self, PlanError> {
        let mut entries: Vec<(T, usize)> = Vec::new();
        for raw_part in text.split(',') {
            let part = raw_part.trim();
            if part.is_empty() {
                continue;
            }
            let Some((raw_key, raw_value)) = part.split_once('=') else {
                return Err(PlanError::InvalidPart {
                    part: part.to_owned(),
                });
            };
            let key = raw_key.trim().to_lowercase();
            let task =
                T::from_key(&key).ok_or_else(|| PlanError::UnknownTask { task: key.clone() })?;
            let value = raw_value.trim();
            let count = value
                .parse::<usize>()
                .map_err(|err| PlanError::InvalidCount {
                    task: key.clone(),
                    value: value.to_owned(),
                    message: err.to_string(),
                })?;
            if let Some(entry) = entries.iter_mut().find(|(existing, _)| *existing == task) {
                entry.1 = count;
                continue;
            }
            entries.push((task, count));
        }
        Ok(Self { entries })
    }

    /// Spreads `total` evenly across all tasks; leftovers go to the earliest
    /// tasks.
    #[must_use]
    pub fn even(total: usize) -> Self {
        let task_count = T::ALL.len();
        let base = total.checked_div(task_count).unwrap_or(0);
        let mut leftover = total.saturating_sub(base.saturating_mul(task_count));
        let entries = T::ALL
            .iter()
            .map(|task| {
                let extra = usize::from(leftover > 0);
                leftover = leftover.saturating_sub(extra);
                (*task, base + extra)
            })
            .collect();
        Self { entries }
    }

    /// Uses `text` when it is non-empty, otherwise an even split of `total`.
    ///
    /// # Errors
    ///
    /// Propagates [`Plan::parse`] errors.
    pub fn resolve(text: Option<&str>, total: usize) -> Result<Self, PlanError> {
        text.map(str::trim)
            .filter(|value| !value.is_empty())
            .map_or_else(|| Ok(Self::even(total)), Self::parse)
    }

    /// Returns the planned counts in order.
    #[must_use]
    pub fn entries(&self) -> &[(T, usize)] {
        &self.entries
    }

    /// Returns the sum of all counts.
    #[must_use]
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }
}
