//! Regex-based entity extraction
//!
//! An entity is a named piece of metadata encoded in a filename by
//! convention (session, run, echo, acquisition modality). Each entity is
//! recovered by an unanchored regex search over the full path string; a
//! miss is an absent value, never an error.
//!
//! Patterns are compiled up front so an invalid regex fails at
//! configuration time, not per row.

use crate::error::{NistageError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// A named regex with a capture-group policy.
///
/// The group index selects what `extract` returns: 0 means the whole
/// match, N means capture group N.
#[derive(Debug, Clone)]
pub struct EntityPattern {
    regex: Regex,
    group: usize,
}

impl EntityPattern {
    /// Compile a pattern with an explicit capture group (0 = whole match).
    pub fn with_group(pattern: &str, group: usize) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| NistageError::Pattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { regex, group })
    }

    /// Compile a pattern with the default group policy: the first capture
    /// group when the pattern has one, the whole match otherwise.
    pub fn new(pattern: &str) -> Result<Self> {
        let mut compiled = Self::with_group(pattern, 0)?;
        if compiled.regex.captures_len() > 1 {
            compiled.group = 1;
        }
        Ok(compiled)
    }

    /// The pattern source string.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// First match anywhere in `path`.
    ///
    /// `None` on a miss, which callers can tell apart from a matched empty
    /// string (`Some("")`).
    pub fn extract(&self, path: &str) -> Option<String> {
        self.regex
            .captures(path)
            .and_then(|caps| caps.get(self.group))
            .map(|m| m.as_str().to_string())
    }
}

/// Default entity set for standard neuroimaging filename conventions.
///
/// `datatype` matches a fixed vocabulary of acquisition modalities and
/// returns the whole match; the numbered entities return the digits after
/// their key.
static DEFAULT_ENTITIES: Lazy<Vec<(String, EntityPattern)>> = Lazy::new(|| {
    [
        ("session", r"(_ses-)(\d+)", 2),
        ("run", r"(_run-)(\d+)", 2),
        ("datatype", r"func|dwi|fmap|anat|meg|eeg|ieeg|beh", 0),
        ("echo", r"(_echo-)(\d+)", 2),
    ]
    .into_iter()
    .map(|(name, pattern, group)| {
        let compiled = EntityPattern::with_group(pattern, group)
            .expect("default entity pattern must compile");
        (name.to_string(), compiled)
    })
    .collect()
});

/// An ordered, read-only set of entity patterns applied per row.
#[derive(Debug, Clone)]
pub struct EntityExtractor {
    patterns: Vec<(String, EntityPattern)>,
}

impl EntityExtractor {
    /// Extractor over a fully custom entity set.
    ///
    /// A custom set replaces the default, it never merges with it.
    pub fn new(patterns: Vec<(String, EntityPattern)>) -> Self {
        Self { patterns }
    }

    /// Extractor over the default neuroimaging entity set.
    pub fn default_set() -> Self {
        Self {
            patterns: DEFAULT_ENTITIES.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Entity names in configured order.
    pub fn entity_names(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|(name, _)| name.as_str())
    }

    /// Extract every entity from one path.
    ///
    /// Entities are mutually independent; a miss yields `None` for that
    /// entity only.
    pub fn extract(&self, path: &str) -> Vec<(&str, Option<String>)> {
        self.patterns
            .iter()
            .map(|(name, pattern)| (name.as_str(), pattern.extract(path)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_match_group_zero() {
        let pattern = EntityPattern::with_group(r"subject_\d+", 0).unwrap();
        assert_eq!(
            pattern.extract("/data/subject_3/scan.nii"),
            Some("subject_3".to_string())
        );
    }

    #[test]
    fn test_explicit_group_index() {
        // Scenario: (_echo-)(\d+) group 2 on an echo-01 filename
        let pattern = EntityPattern::with_group(r"(_echo-)(\d+)", 2).unwrap();
        assert_eq!(
            pattern.extract("sub-01/ses-01/fmri_task_echo-01.nii.gz"),
            Some("01".to_string())
        );
    }

    #[test]
    fn test_default_group_policy_prefers_first_group() {
        let pattern = EntityPattern::new(r"(sub-\d+)_task").unwrap();
        assert_eq!(
            pattern.extract("/data/sub-07_task-rest.nii"),
            Some("sub-07".to_string())
        );

        // No groups at all: whole match
        let pattern = EntityPattern::new(r"task-rest").unwrap();
        assert_eq!(
            pattern.extract("/data/sub-07_task-rest.nii"),
            Some("task-rest".to_string())
        );
    }

    #[test]
    fn test_miss_is_absent_not_error() {
        let pattern = EntityPattern::with_group(r"(_ses-)(\d+)", 2).unwrap();
        assert_eq!(pattern.extract("/data/no_session_here.nii"), None);
    }

    #[test]
    fn test_invalid_pattern_fails_at_construction() {
        let result = EntityPattern::new("(unclosed");
        assert!(matches!(result, Err(NistageError::Pattern { .. })));
    }

    #[test]
    fn test_default_set_extraction() {
        let extractor = EntityExtractor::default_set();
        let values = extractor.extract("/src/sub-01/func/x_ses-02_run-03_echo-01_bold.nii.gz");

        let lookup = |name: &str| {
            values
                .iter()
                .find(|(n, _)| *n == name)
                .and_then(|(_, v)| v.clone())
        };

        assert_eq!(lookup("session"), Some("02".to_string()));
        assert_eq!(lookup("run"), Some("03".to_string()));
        assert_eq!(lookup("echo"), Some("01".to_string()));
        assert_eq!(lookup("datatype"), Some("func".to_string()));
    }

    #[test]
    fn test_entities_are_independent() {
        let extractor = EntityExtractor::default_set();
        let values = extractor.extract("/src/anat/t1_ses-01.nii");

        let lookup = |name: &str| {
            values
                .iter()
                .find(|(n, _)| *n == name)
                .and_then(|(_, v)| v.clone())
        };

        assert_eq!(lookup("session"), Some("01".to_string()));
        assert_eq!(lookup("datatype"), Some("anat".to_string()));
        assert_eq!(lookup("run"), None);
        assert_eq!(lookup("echo"), None);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let extractor = EntityExtractor::default_set();
        let path = "/src/sub-01/func/x_ses-02_run-03_bold.nii.gz";
        assert_eq!(extractor.extract(path), extractor.extract(path));
    }

    #[test]
    fn test_custom_set_replaces_default() {
        let extractor = EntityExtractor::new(vec![(
            "task".to_string(),
            EntityPattern::with_group(r"(_task-)([a-z]+)", 2).unwrap(),
        )]);
        let names: Vec<_> = extractor.entity_names().collect();
        assert_eq!(names, vec!["task"]);
    }
}
