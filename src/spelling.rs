//! Statistical spelling correction.
//!
//! A [`FrequencyModel`] maps words to occurrence counts, [`edits1`] and
//! [`edits2`] enumerate strings within one or two edits, and the
//! [`SpellCorrector`] ranks known candidates by probability and caches its
//! answers.

pub mod corrector;
pub mod edits;
pub mod model;

pub use corrector::{Correction, CorrectorStats, DEFAULT_LANGUAGE_MODEL, SpellCorrector};
pub use edits::{edits1, edits2};
pub use model::FrequencyModel;
