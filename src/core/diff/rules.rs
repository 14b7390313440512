//! Ignore rules and comparison policies
//!
//! Ignore rules map a segment name to the field indices excluded from
//! comparison. They are an immutable value handed to the diff engine, so
//! different runs or tests can use different tables.

use crate::domain::ids::SegmentName;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

/// Per-segment field exclusions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoreRules {
    rules: BTreeMap<SegmentName, BTreeSet<usize>>,
}

impl IgnoreRules {
    /// Creates an empty rule set that ignores nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds indices for a segment, merging with any existing rule
    ///
    /// # Examples
    ///
    /// ```
    /// use hl7diff::core::diff::IgnoreRules;
    /// use hl7diff::domain::SegmentName;
    ///
    /// let msh = SegmentName::new("MSH").unwrap();
    /// let rules = IgnoreRules::new().with_rule(msh.clone(), [7, 10]);
    /// assert!(rules.is_ignored(&msh, 7));
    /// assert!(!rules.is_ignored(&msh, 9));
    /// ```
    pub fn with_rule(
        mut self,
        segment: SegmentName,
        indices: impl IntoIterator<Item = usize>,
    ) -> Self {
        self.insert(segment, indices);
        self
    }

    pub fn insert(&mut self, segment: SegmentName, indices: impl IntoIterator<Item = usize>) {
        self.rules.entry(segment).or_default().extend(indices);
    }

    /// True if `index` of `segment` is excluded. Unknown segments ignore
    /// nothing.
    pub fn is_ignored(&self, segment: &SegmentName, index: usize) -> bool {
        self.rules
            .get(segment)
            .is_some_and(|indices| indices.contains(&index))
    }

    /// Excluded indices for a segment, if any rule exists
    pub fn fields_for(&self, segment: &SegmentName) -> Option<&BTreeSet<usize>> {
        self.rules.get(segment)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SegmentName, &BTreeSet<usize>)> {
        self.rules.iter()
    }

    /// Number of segments with a rule
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Builds rules from a configuration table keyed by segment name
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid segment name.
    pub fn from_table(table: &HashMap<String, Vec<usize>>) -> Result<Self, String> {
        let mut rules = Self::new();
        for (name, indices) in table {
            let segment = SegmentName::new(name.as_str())
                .map_err(|e| format!("compare.ignore: {e}"))?;
            rules.insert(segment, indices.iter().copied());
        }
        Ok(rules)
    }
}

/// What to do with repeated segments that have no counterpart on the other
/// side (e.g. three NK1 in the output, two in the example)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtraSegmentPolicy {
    /// Leave extra occurrences unexamined
    #[default]
    Ignore,
    /// Emit one `unpaired_segment` entry per extra occurrence
    Report,
}

/// What to do with field indices present on only one side of a segment pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingFieldPolicy {
    /// Compare only up to the shorter segment
    #[default]
    Ignore,
    /// Emit `missing_field` entries for non-empty fields beyond the shorter
    /// segment
    Report,
}

macro_rules! impl_policy_str {
    ($ty:ident, $label:literal) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    "ignore" => Ok($ty::Ignore),
                    "report" => Ok($ty::Report),
                    other => Err(format!(
                        "Invalid {} policy '{}'. Must be one of: ignore, report",
                        $label, other
                    )),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $ty::Ignore => write!(f, "ignore"),
                    $ty::Report => write!(f, "report"),
                }
            }
        }
    };
}

impl_policy_str!(ExtraSegmentPolicy, "extra_segments");
impl_policy_str!(MissingFieldPolicy, "missing_fields");

/// Policies applied by the diff engine beyond plain field comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiffOptions {
    pub extra_segments: ExtraSegmentPolicy,
    pub missing_fields: MissingFieldPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> SegmentName {
        SegmentName::new(s).unwrap()
    }

    #[test]
    fn test_unknown_segment_ignores_nothing() {
        let rules = IgnoreRules::new().with_rule(name("MSH"), [7]);
        assert!(!rules.is_ignored(&name("PID"), 7));
        assert!(rules.fields_for(&name("PID")).is_none());
    }

    #[test]
    fn test_rules_merge() {
        let mut rules = IgnoreRules::new().with_rule(name("OBX"), [14]);
        rules.insert(name("OBX"), [19]);
        assert_eq!(rules.len(), 1);
        assert!(rules.is_ignored(&name("OBX"), 14));
        assert!(rules.is_ignored(&name("OBX"), 19));
    }

    #[test]
    fn test_from_table() {
        let mut table = HashMap::new();
        table.insert("MSH".to_string(), vec![7, 10]);
        table.insert("EVN".to_string(), vec![2]);
        let rules = IgnoreRules::from_table(&table).unwrap();
        assert_eq!(rules.len(), 2);
        assert!(rules.is_ignored(&name("EVN"), 2));
    }

    #[test]
    fn test_from_table_invalid_name() {
        let mut table = HashMap::new();
        table.insert("msh".to_string(), vec![7]);
        let err = IgnoreRules::from_table(&table).unwrap_err();
        assert!(err.contains("compare.ignore"));
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("report".parse::<ExtraSegmentPolicy>().unwrap(), ExtraSegmentPolicy::Report);
        assert_eq!("IGNORE".parse::<MissingFieldPolicy>().unwrap(), MissingFieldPolicy::Ignore);
        assert!("sometimes".parse::<ExtraSegmentPolicy>().is_err());
        assert_eq!(MissingFieldPolicy::Report.to_string(), "report");
    }

    #[test]
    fn test_default_options() {
        let options = DiffOptions::default();
        assert_eq!(options.extra_segments, ExtraSegmentPolicy::Ignore);
        assert_eq!(options.missing_fields, MissingFieldPolicy::Ignore);
    }
}
