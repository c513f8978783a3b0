//! core::template
//!
//! Report body rendering.
//!
//! A template is raw text with `{field}` placeholders. Rendering is flat
//! substitution through [`expand`](crate::core::expand::expand) followed by
//! trimming surrounding whitespace. There is no conditional or nested logic.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::expand::expand;
use super::form::DESCRIPTION_FIELD;

/// Template used when no template file is configured.
pub const DEFAULT_TEMPLATE: &str = "{description}\n";

/// A report body template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    raw: String,
}

impl Default for Template {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

impl Template {
    /// Wrap raw template text.
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// Read a template from disk.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        fs::read_to_string(path).map(Self::new)
    }

    /// The raw, unexpanded text.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Render against a field map. Unknown placeholders stay verbatim.
    pub fn render(&self, fields: &HashMap<String, String>) -> String {
        expand(&self.raw, fields).trim().to_string()
    }

    /// Render a preview, or `None` when there is no description field.
    ///
    /// Previews do not require a title.
    pub fn preview(&self, fields: &HashMap<String, String>) -> Option<String> {
        fields
            .contains_key(DESCRIPTION_FIELD)
            .then(|| self.render(fields))
    }
}
