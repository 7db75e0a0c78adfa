//! Sequential ID allocation.

use crate::error::GenerationError;

/// Minimum zero-padding width for allocated numbers.
const MIN_PAD: usize = 3;

/// Hands out `prefix` + zero-padded numbers after the highest existing one.
///
/// # Example
///
/// ```
/// use question_bank::IdAllocator;
///
/// let mut ids = IdAllocator::scan(["sv-007", "sv-p-001", "sv-x12"], "sv-");
/// assert_eq!(ids.next_id()?, "sv-008");
/// assert_eq!(ids.next_id()?, "sv-009");
/// # Ok::<(), question_bank::GenerationError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    prefix: String,
    last: u64,
    pad: usize,
}

impl IdAllocator {
    /// Starts numbering at 1 with the default padding.
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_owned(),
            last: 0,
            pad: MIN_PAD,
        }
    }

    /// Scans existing IDs and continues after the highest numeric tail.
    ///
    /// Only IDs whose remainder after `prefix` is all ASCII digits count, so
    /// `sv-p-001` does not affect the `sv-` sequence. The padding widens to
    /// the longest tail seen.
    #[must_use]
    pub fn scan<'a>(ids: impl IntoIterator<Item = &'a str>, prefix: &str) -> Self {
        let mut allocator = Self::new(prefix);
        for id in ids {
            let Some(tail) = id.strip_prefix(prefix) else {
                continue;
            };
            if tail.is_empty() || !tail.bytes().all(|b| b.is_ascii_digit()) {
                continue;
            }
            if let Ok(number) = tail.parse::<u64>() {
                allocator.last = allocator.last.max(number);
                allocator.pad = allocator.pad.max(tail.len());
            }
        }
        allocator
    }

    /// Returns the next ID.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::IdsExhausted`] once the highest number
    /// representable has been handed out.
    pub fn next_id(&mut self) -> Result<String, GenerationError> {
        let next = self
            .last
            .checked_add(1)
            .ok_or_else(|| GenerationError::IdsExhausted {
                prefix: self.prefix.clone(),
            })?;
        self.last = next;
        Ok(self.render(next))
    }

    /// Returns the ID that the next call to [`Self::next_id`] will produce,
    /// or `None` when the sequence is exhausted.
    #[must_use]
    pub fn peek(&self) -> Option<String> {
        self.last.checked_add(1).map(|next| self.render(next))
    }

    fn render(&self, number: u64) -> String {
        format!("{}{number:0width$}", self.prefix, width = self.pad)
    }
}
