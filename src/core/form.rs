//! core::form
//!
//! The submitted report form.
//!
//! # Validation
//!
//! A form must carry a `title` that is non-empty after trimming. Nothing
//! else is checked; arbitrary field names pass through to the template.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use reporter::core::form::FormData;
//!
//! let mut raw = HashMap::new();
//! raw.insert("title".to_string(), "Crash on save".to_string());
//! raw.insert("description".to_string(), "It crashes".to_string());
//!
//! let form = FormData::new(raw).unwrap();
//! assert_eq!(form.title(), "Crash on save");
//! assert_eq!(form.get("description"), Some("It crashes"));
//!
//! assert!(FormData::new(HashMap::new()).is_err());
//! ```

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

/// Name of the mandatory field.
pub const TITLE_FIELD: &str = "title";

/// Name of the field that carries the report text.
pub const DESCRIPTION_FIELD: &str = "description";

/// Errors from form validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("You need to add at least a title.")]
    MissingTitle,

    #[error("form data must be a JSON object")]
    NotAnObject,
}

/// An immutable, validated set of form fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormData {
    fields: HashMap<String, String>,
}

impl FormData {
    /// Validate raw key/value input.
    ///
    /// # Errors
    ///
    /// Returns `FormError::MissingTitle` if `title` is absent or blank.
    pub fn new(fields: HashMap<String, String>) -> Result<Self, FormError> {
        match fields.get(TITLE_FIELD) {
            Some(title) if !title.trim().is_empty() => Ok(Self { fields }),
            _ => Err(FormError::MissingTitle),
        }
    }

    /// Build from a decoded JSON request body.
    ///
    /// Strings are taken as-is, numbers and booleans are stringified,
    /// `null` entries are dropped and nested values keep their JSON text.
    ///
    /// # Errors
    ///
    /// Returns `FormError::NotAnObject` for non-object bodies and
    /// `FormError::MissingTitle` when validation fails.
    pub fn from_json(value: &Value) -> Result<Self, FormError> {
        Self::new(fields_from_json(value)?)
    }

    /// The report title.
    pub fn title(&self) -> &str {
        // Presence is checked in `new`.
        self.fields.get(TITLE_FIELD).map(String::as_str).unwrap_or_default()
    }

    /// Look up a single field.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Whether a report text was submitted.
    pub fn has_description(&self) -> bool {
        self.fields.contains_key(DESCRIPTION_FIELD)
    }

    /// All fields, including `title`.
    pub fn fields(&self) -> &HashMap<String, String> {
        &self.fields
    }
}

/// Flatten a JSON object into string fields without validating it.
///
/// # Errors
///
/// Returns `FormError::NotAnObject` if `value` is not an object.
pub fn fields_from_json(value: &Value) -> Result<HashMap<String, String>, FormError> {
    let object = value.as_object().ok_or(FormError::NotAnObject)?;

    Ok(object
        .iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                nested => nested.to_string(),
            };
            Some((key.clone(), text))
        })
        .collect())
}
