//! Field-level diff of correlated records
//!
//! The [`DiffEngine`] pairs segment occurrences by name and ordinal and
//! emits [`MismatchEntry`] values for fields that differ, skipping fields
//! excluded by the [`IgnoreRules`].

pub mod engine;
pub mod report;
pub mod rules;

pub use engine::{diff, DiffEngine};
pub use report::{MismatchEntry, MismatchKind, MismatchReport};
pub use rules::{DiffOptions, ExtraSegmentPolicy, IgnoreRules, MissingFieldPolicy};
