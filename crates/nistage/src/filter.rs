//! Path matching predicates
//!
//! A `PathFilter` evaluates one filesystem entry against a fixed set of
//! composable string predicates. Suffix and prefix checks look at the file
//! name; the substring checks look at the full path, so directory
//! components count too.

/// Predicates for matching a single file.
///
/// Every predicate is a collection and unconfigured (empty) predicates are
/// vacuously true. Callers with a single value wrap it into a one-element
/// collection.
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    /// File name must end with one of these (match-any).
    pub suffixes: Vec<String>,
    /// File name must start with one of these (match-any).
    pub prefixes: Vec<String>,
    /// Full path must contain every one of these.
    pub contains_all: Vec<String>,
    /// Full path must contain at least one of these.
    pub contains_any: Vec<String>,
    /// Full path is rejected if it contains every one of these.
    pub excludes_all: Vec<String>,
    /// Full path is rejected if it contains any of these.
    pub excludes_any: Vec<String>,
    /// Lower-case both the candidate and the predicates before comparing.
    pub case_insensitive: bool,
}

impl PathFilter {
    /// A filter with no predicates; matches everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate a file against all configured predicates.
    ///
    /// Case-insensitive mode folds into local copies; the stored
    /// predicates are never mutated, so the same filter keeps working for
    /// subsequent files.
    pub fn matches(&self, file_name: &str, path: &str) -> bool {
        let fold = |s: &str| {
            if self.case_insensitive {
                s.to_lowercase()
            } else {
                s.to_string()
            }
        };

        let name = fold(file_name);
        let path = fold(path);

        if !self.suffixes.is_empty() && !self.suffixes.iter().any(|s| name.ends_with(&fold(s))) {
            return false;
        }

        if !self.prefixes.is_empty() && !self.prefixes.iter().any(|p| name.starts_with(&fold(p))) {
            return false;
        }

        if !self.contains_all.is_empty()
            && !self.contains_all.iter().all(|n| path.contains(&fold(n)))
        {
            return false;
        }

        if !self.contains_any.is_empty()
            && !self.contains_any.iter().any(|n| path.contains(&fold(n)))
        {
            return false;
        }

        if !self.excludes_all.is_empty()
            && self.excludes_all.iter().all(|n| path.contains(&fold(n)))
        {
            return false;
        }

        if !self.excludes_any.is_empty()
            && self.excludes_any.iter().any(|n| path.contains(&fold(n)))
        {
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = PathFilter::new();
        assert!(filter.matches("anything.txt", "/data/anything.txt"));
        assert!(filter.matches("", ""));
    }

    #[test]
    fn test_suffix_match_any() {
        let filter = PathFilter {
            suffixes: vec![".nii".to_string(), ".nii.gz".to_string()],
            ..Default::default()
        };
        assert!(filter.matches("scan.nii", "/data/scan.nii"));
        assert!(filter.matches("scan.nii.gz", "/data/scan.nii.gz"));
        assert!(!filter.matches("scan.json", "/data/scan.json"));
    }

    #[test]
    fn test_prefix_match_any() {
        let filter = PathFilter {
            prefixes: vec!["fmri".to_string(), "dwi".to_string()],
            ..Default::default()
        };
        assert!(filter.matches("fmri_nback.nii", "/data/fmri_nback.nii"));
        assert!(filter.matches("dwi_ap.nii", "/data/dwi_ap.nii"));
        assert!(!filter.matches("anat_t1.nii", "/data/anat_t1.nii"));
    }

    #[test]
    fn test_contains_checks_full_path() {
        // Directory components count for the substring predicates
        let filter = PathFilter {
            contains_all: vec!["session_2".to_string()],
            ..Default::default()
        };
        assert!(filter.matches("scan.nii", "/data/subject_1/session_2/scan.nii"));
        assert!(!filter.matches("scan.nii", "/data/subject_1/session_1/scan.nii"));
    }

    #[test]
    fn test_contains_all_requires_every_needle() {
        let filter = PathFilter {
            contains_all: vec!["subject_1".to_string(), "session_2".to_string()],
            ..Default::default()
        };
        assert!(filter.matches("scan.nii", "/data/subject_1/session_2/scan.nii"));
        assert!(!filter.matches("scan.nii", "/data/subject_1/scan.nii"));
    }

    #[test]
    fn test_contains_any_requires_one_needle() {
        let filter = PathFilter {
            contains_any: vec!["subject_3".to_string(), "subject_4".to_string()],
            ..Default::default()
        };
        assert!(filter.matches("scan.nii", "/data/subject_3/scan.nii"));
        assert!(filter.matches("scan.nii", "/data/subject_4/scan.nii"));
        assert!(!filter.matches("scan.nii", "/data/subject_1/scan.nii"));
    }

    #[test]
    fn test_excludes_any_rejects_on_single_hit() {
        let filter = PathFilter {
            excludes_any: vec!["derivatives".to_string()],
            ..Default::default()
        };
        assert!(!filter.matches("scan.nii", "/data/derivatives/scan.nii"));
        assert!(filter.matches("scan.nii", "/data/raw/scan.nii"));
    }

    #[test]
    fn test_excludes_all_rejects_only_when_all_hit() {
        let filter = PathFilter {
            excludes_all: vec!["pilot".to_string(), "bad".to_string()],
            ..Default::default()
        };
        assert!(!filter.matches("scan.nii", "/data/pilot/bad/scan.nii"));
        // Only one of the two needles present: keep
        assert!(filter.matches("scan.nii", "/data/pilot/scan.nii"));
    }

    #[test]
    fn test_case_insensitive_affixes() {
        let filter = PathFilter {
            suffixes: vec![".NII".to_string()],
            prefixes: vec!["FMRI".to_string()],
            case_insensitive: true,
            ..Default::default()
        };
        assert!(filter.matches("fmri_nback.nii", "/data/fmri_nback.nii"));
        assert!(filter.matches("FMRI_NBACK.NII", "/data/FMRI_NBACK.NII"));
    }

    #[test]
    fn test_case_insensitive_is_superset_of_sensitive() {
        // Over lower-cased inputs, the insensitive filter accepts at least
        // whatever the sensitive one accepts
        let sensitive = PathFilter {
            suffixes: vec![".nii".to_string()],
            prefixes: vec!["fmri".to_string()],
            ..Default::default()
        };
        let insensitive = PathFilter {
            case_insensitive: true,
            ..sensitive.clone()
        };

        let names = ["fmri_a.nii", "FMRI_A.NII", "fMRI_a.Nii", "other.nii"];
        for name in names {
            let path = format!("/data/{name}");
            if sensitive.matches(&name.to_lowercase(), &path.to_lowercase()) {
                assert!(insensitive.matches(name, &path), "lost match for {name}");
            }
        }
    }

    #[test]
    fn test_predicates_not_mutated_between_files() {
        let filter = PathFilter {
            suffixes: vec![".NII".to_string()],
            case_insensitive: true,
            ..Default::default()
        };
        assert!(filter.matches("a.nii", "/d/a.nii"));
        // The stored predicate keeps its original casing
        assert_eq!(filter.suffixes[0], ".NII");
        assert!(filter.matches("b.NII", "/d/b.NII"));
    }
}
