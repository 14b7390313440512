//! Equi-join of output and example records on their correlation key
//!
//! Inner-join semantics: every output record is paired with every example
//! record sharing its key, in output order then example order. Duplicate
//! keys therefore produce a cross product. Records without a key never take
//! part in a pairing.

use crate::domain::ids::PatientId;
use crate::domain::record::Record;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// One output/example pairing, by index into the two record lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelatedPair {
    pub key: PatientId,
    pub output_index: usize,
    pub example_index: usize,
}

/// Result of correlating two record sets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correlation {
    /// Pairs in output order, then example order
    pub pairs: Vec<CorrelatedPair>,

    /// Keys present only in the output transcript, sorted
    pub unmatched_output: Vec<PatientId>,

    /// Keys present only in the example transcript, sorted
    pub unmatched_example: Vec<PatientId>,

    /// Line numbers of output records without a key
    pub keyless_output: Vec<usize>,

    /// Line numbers of example records without a key
    pub keyless_example: Vec<usize>,
}

impl Correlation {
    /// Number of distinct keys that were paired
    pub fn matched_keys(&self) -> usize {
        self.pairs
            .iter()
            .map(|pair| &pair.key)
            .collect::<BTreeSet<_>>()
            .len()
    }
}

/// Pairs output and example records sharing a correlation key
///
/// # Examples
///
/// ```
/// use hl7diff::core::correlation::correlate;
///
/// let correlation = correlate(&[], &[]);
/// assert!(correlation.pairs.is_empty());
/// ```
pub fn correlate(outputs: &[Record], examples: &[Record]) -> Correlation {
    let mut correlation = Correlation::default();

    let mut examples_by_key: HashMap<&PatientId, Vec<usize>> = HashMap::new();
    for (index, record) in examples.iter().enumerate() {
        match record.correlation_key() {
            Some(key) => examples_by_key.entry(key).or_default().push(index),
            None => correlation.keyless_example.push(record.line_number()),
        }
    }

    let mut output_keys: BTreeSet<&PatientId> = BTreeSet::new();
    let mut unmatched_output: BTreeSet<&PatientId> = BTreeSet::new();

    for (output_index, record) in outputs.iter().enumerate() {
        let Some(key) = record.correlation_key() else {
            correlation.keyless_output.push(record.line_number());
            continue;
        };

        if !output_keys.insert(key) {
            tracing::debug!(
                patient_id = %key,
                line = record.line_number(),
                "Duplicate key in output transcript"
            );
        }

        match examples_by_key.get(key) {
            Some(example_indices) => {
                for &example_index in example_indices {
                    correlation.pairs.push(CorrelatedPair {
                        key: key.clone(),
                        output_index,
                        example_index,
                    });
                }
            }
            None => {
                unmatched_output.insert(key);
            }
        }
    }

    let unmatched_example: BTreeSet<&PatientId> = examples_by_key
        .keys()
        .copied()
        .filter(|key| !output_keys.contains(key))
        .collect();

    correlation.unmatched_output = unmatched_output.into_iter().cloned().collect();
    correlation.unmatched_example = unmatched_example.into_iter().cloned().collect();
    correlation
}
