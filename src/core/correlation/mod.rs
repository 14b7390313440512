//! Record correlation
//!
//! Resolves each record's patient identifier and pairs output records with
//! example records sharing it.

pub mod join;
pub mod key;

pub use join::{correlate, CorrelatedPair, Correlation};
pub use key::{CorrelationKeyResolver, DEFAULT_KEY_FIELD, DEFAULT_KEY_SEGMENT};
