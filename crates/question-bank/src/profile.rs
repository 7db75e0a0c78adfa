//! Difficulty levels and the generation parameters they imply.

use std::fmt;
use std::ops::RangeInclusive;

use clap::ValueEnum;

/// Difficulty level selected with `--level`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum Level {
    /// Gentle introduction.
    Easy,
    /// National-test level.
    #[default]
    Np,
    /// Stretch material.
    Hard,
}

impl Level {
    /// Returns the label written into the `difficulty` field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Np => "np",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generation parameters for one difficulty level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Level the profile was derived from.
    pub level: Level,
    /// Tile count range for drag-and-drop items.
    pub dnd_tiles: RangeInclusive<usize>,
    /// Category count range for word-class sorting.
    pub dnd_categories: RangeInclusive<usize>,
    /// Question count range per passage.
    pub passage_questions: RangeInclusive<usize>,
    /// Word count range for trimmed passage texts.
    pub passage_words: RangeInclusive<usize>,
    /// Share of look-alike distractors, in percent.
    pub distractor_strength: u32,
    /// Largest dividend in division items.
    pub max_dividend: u32,
    /// Whether the nine times table may appear in division.
    pub allow_nine: bool,
}

impl Profile {
    /// Builds the profile for `level`.
    ///
    /// # Example
    ///
    /// ```
    /// use question_bank::{Level, Profile};
    ///
    /// let profile = Profile::for_level(Level::Hard);
    /// assert!(profile.allow_nine);
    /// assert_eq!(profile.max_dividend, 80);
    /// ```
    #[must_use]
    pub const fn for_level(level: Level) -> Self {
        match level {
            Level::Easy => Self {
                level,
                dnd_tiles: 6..=8,
                dnd_categories: 2..=3,
                passage_questions: 3..=4,
                passage_words: 40..=75,
                distractor_strength: 35,
                max_dividend: 40,
                allow_nine: false,
            },
            Level::Np => Self {
                level,
                dnd_tiles: 8..=10,
                dnd_categories: 2..=3,
                passage_questions: 3..=5,
                passage_words: 60..=100,
                distractor_strength: 60,
                max_dividend: 50,
                allow_nine: false,
            },
            Level::Hard => Self {
                level,
                dnd_tiles: 10..=14,
                dnd_categories: 3..=3,
                passage_questions: 4..=5,
                passage_words: 90..=140,
                distractor_strength: 80,
                max_dividend: 80,
                allow_nine: true,
            },
        }
    }

    /// Caps the dividend and optionally enables the nine table.
    #[must_use]
    pub fn with_division_overrides(mut self, max_dividend: Option<u32>, allow_nine: bool) -> Self {
        if let Some(cap) = max_dividend {
            self.max_dividend = self.max_dividend.min(cap);
        }
        self.allow_nine = self.allow_nine || allow_nine;
        self
    }

    /// Returns the `difficulty` label for generated items.
    #[must_use]
    pub const fn difficulty(&self) -> &'static str {
        self.level.as_str()
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::for_level(Level::default())
    }
}
