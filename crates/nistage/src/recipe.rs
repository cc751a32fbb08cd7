//! Path recipes
//!
//! A recipe is a template string with `{column}` placeholders rendered
//! from table rows. The placeholder set is scanned out of the template and
//! defines exactly which columns the renderer reads; extra table columns
//! are ignored.
//!
//! Two-level layout recipes compose a directory recipe and a filename
//! recipe, join them with the platform separator and append a
//! file-extension column — the shape of standardized dataset layouts.

use crate::error::{NistageError, Result};
use crate::table::FilepathTable;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}]+)\}").expect("placeholder pattern must compile"));

/// A template with `{column}` placeholders.
#[derive(Debug, Clone)]
pub struct PathRecipe {
    template: String,
    placeholders: Vec<String>,
}

impl PathRecipe {
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let placeholders = PLACEHOLDER
            .captures_iter(&template)
            .map(|caps| caps[1].to_string())
            .collect();
        Self {
            template,
            placeholders,
        }
    }

    /// Join segments into one recipe, e.g. directory segments with `/` or
    /// filename segments with `_`.
    pub fn from_segments<I, S>(segments: I, joiner: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let template = segments
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(joiner);
        Self::new(template)
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Placeholder names in template order, duplicates included.
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Render one row.
    ///
    /// A placeholder naming a column the table does not have is a
    /// [`NistageError::MissingColumn`]; an absent value in a present
    /// column renders as the empty string.
    pub fn render_row(&self, table: &FilepathTable, row: usize) -> Result<String> {
        let mut rendered = self.template.clone();
        for name in &self.placeholders {
            let value = table.value(row, name)?.unwrap_or("");
            rendered = rendered.replace(&format!("{{{name}}}"), value);
        }
        Ok(rendered)
    }

    /// Render every row; aborts the whole batch on the first failing row.
    pub fn render(&self, table: &FilepathTable) -> Result<Vec<String>> {
        (0..table.len())
            .map(|row| self.render_row(table, row))
            .collect()
    }

    /// Invert a rendered string back into placeholder values.
    ///
    /// Literal template text must match exactly; each placeholder matches
    /// lazily. `None` when the string does not fit the template.
    pub fn parse_back(&self, rendered: &str) -> Option<Vec<(String, String)>> {
        let mut pattern = String::from("^");
        let mut last = 0;
        for caps in PLACEHOLDER.captures_iter(&self.template) {
            let whole = caps.get(0).expect("capture 0 always present");
            pattern.push_str(&regex::escape(&self.template[last..whole.start()]));
            pattern.push_str("(.+?)");
            last = whole.end();
        }
        pattern.push_str(&regex::escape(&self.template[last..]));
        pattern.push('$');

        let matcher = Regex::new(&pattern).ok()?;
        let caps = matcher.captures(rendered)?;
        Some(
            self.placeholders
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), caps[i + 1].to_string()))
                .collect(),
        )
    }
}

/// Two-level destination layout: a directory recipe and a filename recipe,
/// joined with the platform separator, with a file-extension column
/// appended verbatim.
#[derive(Debug, Clone)]
pub struct LayoutRecipe {
    dir: PathRecipe,
    file: PathRecipe,
    extension_column: String,
}

impl LayoutRecipe {
    pub fn new(dir: PathRecipe, file: PathRecipe, extension_column: impl Into<String>) -> Self {
        Self {
            dir,
            file,
            extension_column: extension_column.into(),
        }
    }

    /// Build from recipe segments: directory segments join with `/`,
    /// filename segments with `_`.
    pub fn from_segments<S: AsRef<str>>(
        dir_segments: &[S],
        file_segments: &[S],
        extension_column: impl Into<String>,
    ) -> Self {
        Self::new(
            PathRecipe::from_segments(dir_segments, "/"),
            PathRecipe::from_segments(file_segments, "_"),
            extension_column,
        )
    }

    /// Render one row into a relative destination path.
    ///
    /// The extension column's value is appended as-is (it is expected to
    /// carry its leading dot, e.g. `.nii.gz`); an absent extension appends
    /// nothing.
    pub fn render_row(&self, table: &FilepathTable, row: usize) -> Result<String> {
        let dir = self.dir.render_row(table, row)?;
        let file = self.file.render_row(table, row)?;
        let extension = table.value(row, &self.extension_column)?.unwrap_or("");
        Ok(format!("{dir}{MAIN_SEPARATOR}{file}{extension}"))
    }

    /// Render every row under `dst_root` and add the results as a new
    /// column. Aborts on the first failing row; the table is unchanged on
    /// error.
    pub fn render_into(
        &self,
        table: &mut FilepathTable,
        dst_root: &Path,
        out_column: impl Into<String>,
    ) -> Result<()> {
        let values: Vec<Option<String>> = (0..table.len())
            .map(|row| {
                self.render_row(table, row).map(|rel| {
                    let dst: PathBuf = dst_root.join(rel);
                    Some(dst.to_string_lossy().into_owned())
                })
            })
            .collect::<Result<_>>()?;
        table.add_column(out_column, values)
    }
}
