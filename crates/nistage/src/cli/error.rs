//! Helpful error types for CLI commands
//!
//! Every error includes what went wrong, context about the situation, and
//! suggestions for how to fix it.

use std::fmt;
use std::path::Path;

/// An error with helpful context and suggestions
#[derive(Debug)]
pub struct HelpfulError {
    /// The main error message
    pub message: String,
    /// Additional context about what was happening
    pub context: Option<String>,
    /// Suggestions for how to fix the error
    pub suggestions: Vec<String>,
}

impl HelpfulError {
    /// Create a new helpful error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add multiple suggestions
    pub fn with_suggestions(
        mut self,
        suggestions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.suggestions
            .extend(suggestions.into_iter().map(|s| s.into()));
        self
    }

    // === Common error constructors ===

    /// Source directory does not exist
    pub fn path_not_found(path: &Path) -> Self {
        Self::new(format!("Path not found: {}", path.display()))
            .with_context("The specified source directory does not exist on the filesystem")
            .with_suggestions([
                format!("TRY: Check that the path exists: ls -la {}", path.display()),
                "TRY: Check for typos in the path".to_string(),
            ])
    }

    /// Path exists but is not a directory
    pub fn not_a_directory(path: &Path) -> Self {
        Self::new(format!("Not a directory: {}", path.display()))
            .with_context("Source roots must be directories, not files")
            .with_suggestions([format!(
                "TRY: Scan the parent directory: nistage scan {}",
                path.parent()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| ".".to_string())
            )])
    }

    /// Explicit identifier list does not pair with the directory list
    pub fn id_count_mismatch(ids: usize, dirs: usize) -> Self {
        Self::new(format!(
            "{ids} identifiers given for {dirs} source directories"
        ))
        .with_context("Explicit mapping pairs identifiers with directories positionally, one each")
        .with_suggestions([
            "TRY: Pass one --id per source directory, in the same order".to_string(),
            "TRY: Use --id-pattern to derive identifiers from the paths instead".to_string(),
        ])
    }

    /// Malformed --entity specification
    pub fn invalid_entity_spec(spec: &str) -> Self {
        Self::new(format!("Invalid entity spec: '{spec}'"))
            .with_context("Custom entities are given as NAME=REGEX with an optional @GROUP suffix")
            .with_suggestions([
                r"TRY: --entity 'session=(_ses-)(\d+)@2'".to_string(),
                r"TRY: --entity 'task=_task-([a-z]+)' (first capture group by default)".to_string(),
            ])
    }
}

impl fmt::Display for HelpfulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ERROR: {}", self.message)?;

        if let Some(ctx) = &self.context {
            writeln!(f, "CONTEXT: {}", ctx)?;
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            for suggestion in &self.suggestions {
                writeln!(f, "  {}", suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for HelpfulError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_helpful_error_display() {
        let err = HelpfulError::new("Something went wrong")
            .with_context("While staging files")
            .with_suggestions(["Try again"]);

        let display = format!("{}", err);
        assert!(display.contains("ERROR: Something went wrong"));
        assert!(display.contains("CONTEXT: While staging files"));
        assert!(display.contains("Try again"));
    }

    #[test]
    fn test_path_not_found() {
        let path = PathBuf::from("/nonexistent/path");
        let err = HelpfulError::path_not_found(&path);

        let display = format!("{}", err);
        assert!(display.contains("/nonexistent/path"));
        assert!(display.contains("TRY:"));
    }

    #[test]
    fn test_id_count_mismatch_names_both_counts() {
        let err = HelpfulError::id_count_mismatch(2, 3);
        let display = format!("{}", err);
        assert!(display.contains("2 identifiers"));
        assert!(display.contains("3 source directories"));
    }
}
