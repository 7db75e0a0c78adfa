//! Procedural generation, validation and indexing of quiz question banks.
//!
//! A bank is a JSON document holding one subject's multiple-choice,
//! drag-and-drop, chart and national-test style items plus reading passages.
//! This crate builds banks for grade 3 Swedish (`svenska`) and mathematics
//! (`matematik`) from curated templates, keeps them free of near-duplicates,
//! numbers them, fills in defaults, writes them atomically and maintains the
//! `index.json` manifest the quiz application reads.
//!
//! # Overview
//!
//! - [`builder`] runs generation against a bank with a seeded RNG
//! - [`dedup`] rejects repeated or too-similar candidates
//! - [`store`] and [`index`] read and write documents
//! - [`validation`] reports structural problems without modifying anything
//! - [`cli`] backs the `create-bank`, `extend-bank`, `augment-bank`,
//!   `banks-tool` and `verify-banks` binaries
//!
//! # Example
//!
//! ```
//! use question_bank::builder::{GenerationOptions, SvenskaRequest, extend_svenska};
//! use question_bank::{Bank, Plan, Profile};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut bank = Bank::empty("svenska");
//! let request = SvenskaRequest { plan: Plan::even(8), dnd: 1, passages: 1 };
//! let mut rng = ChaCha8Rng::seed_from_u64(3);
//!
//! let report = extend_svenska(&mut bank, &request, &Profile::default(), GenerationOptions::default(), &mut rng)
//!     .expect("generation succeeds");
//!
//! assert_eq!(bank.items.first().map(|item| item.id.as_str()), Some("sv-001"));
//! assert_eq!(report.added_passages, 1);
//! ```

mod atomic_io;
pub mod augment;
pub mod backfill;
pub mod builder;
pub mod cli;
pub mod config;
pub mod dedup;
pub mod error;
pub mod generator;
pub mod ids;
pub mod index;
pub mod model;
pub mod plan;
pub mod profile;
pub mod shuffle;
pub mod store;
pub mod validation;

pub use backfill::backfill;
pub use dedup::{UniqueCollector, normalize_text, signature};
pub use error::{BankError, ConfigError, GenerationError, PlanError};
pub use ids::IdAllocator;
pub use model::{Bank, Item, ItemKind, Passage, PassageQuestion, Subject};
pub use plan::{MatematikTask, Plan, PlanTask, SvenskaTask};
pub use profile::{Level, Profile};
pub use shuffle::shuffle_with_correct;
