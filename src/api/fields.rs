//! api::fields
//!
//! Form field definitions for the report form.
//!
//! The blueprint is a YAML file; its `reporter.fields` entry (or a
//! top-level `fields` entry) is served verbatim as JSON. The crate does not
//! interpret field definitions.
//!
//! ```yaml
//! reporter:
//!   fields:
//!     description:
//!       type: textarea
//!     browser:
//!       type: text
//! ```

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::core::config::ConfigError;

/// Field definitions loaded from a blueprint.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    fields: Value,
}

impl FieldSchema {
    /// An empty schema (`{}`).
    pub fn empty() -> Self {
        Self {
            fields: Value::Object(Map::new()),
        }
    }

    /// Parse blueprint YAML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` for invalid YAML or values that have
    /// no JSON representation.
    pub fn parse(yaml: &str, origin: &Path) -> Result<Self, ConfigError> {
        let parse_error = |message: String| ConfigError::ParseError {
            path: origin.to_path_buf(),
            message,
        };

        let document: serde_yaml::Value =
            serde_yaml::from_str(yaml).map_err(|e| parse_error(e.to_string()))?;
        let document = serde_json::to_value(document).map_err(|e| parse_error(e.to_string()))?;

        let fields = document
            .pointer("/reporter/fields")
            .or_else(|| document.get("fields"))
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));

        Ok(Self { fields })
    }

    /// Load a blueprint file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&contents, path)
    }

    /// The field definitions as JSON.
    pub fn as_json(&self) -> &Value {
        &self.fields
    }
}
