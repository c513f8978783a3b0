//! Property-based tests for placeholder expansion, templates and forms.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use std::collections::HashMap;

use proptest::prelude::*;

use reporter::core::expand::expand;
use reporter::core::form::{FormData, FormError};
use reporter::core::template::Template;

/// Strategy for field names used as placeholder keys.
fn field_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("title".to_string()),
        Just("description".to_string()),
        Just("browser".to_string()),
        "[a-z_]{1,12}",
    ]
}

/// Strategy for field maps whose values cannot form placeholders.
fn plain_fields() -> impl Strategy<Value = HashMap<String, String>> {
    prop::collection::hash_map(field_name(), "[0-9 .\n]{1,20}", 0..5)
}

/// Strategy for templates mixing text, braces and placeholders.
fn template_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[a-zA-Z0-9 \n#:]{0,10}",
            field_name().prop_map(|k| format!("{{{}}}", k)),
            Just("{".to_string()),
            Just("}".to_string()),
        ],
        0..10,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    /// Expanding with no values returns the template unchanged.
    #[test]
    fn expand_without_values_is_identity(template in ".*") {
        let empty: HashMap<String, String> = HashMap::new();
        prop_assert_eq!(expand(&template, &empty), template);
    }

    /// Text without braces is never altered.
    #[test]
    fn brace_free_text_unchanged(text in "[^{}]*", fields in plain_fields()) {
        prop_assert_eq!(expand(&text, &fields), text);
    }

    /// A lone placeholder becomes exactly its value, which is never rescanned.
    #[test]
    fn placeholder_becomes_value(key in field_name(), value in ".*", other in field_name()) {
        let mut fields = HashMap::new();
        fields.insert(other.clone(), "rescanned".to_string());
        fields.insert(key.clone(), value.clone());

        prop_assert_eq!(expand(&format!("{{{}}}", key), &fields), value);
    }

    /// Placeholders whose keys all have values leave no braces behind.
    #[test]
    fn known_keys_fully_substituted(
        parts in prop::collection::vec(("[a-z ]{0,6}", field_name()), 0..6),
        value in "[0-9 ]{0,6}",
    ) {
        let template: String = parts
            .iter()
            .map(|(text, key)| format!("{}{{{}}}", text, key))
            .collect();
        let fields: HashMap<String, String> = parts
            .iter()
            .map(|(_, key)| (key.clone(), value.clone()))
            .collect();

        let out = expand(&template, &fields);
        prop_assert!(!out.contains('{') && !out.contains('}'), "output contains braces: {:?}", out);
    }

    /// Rendered output never has surrounding whitespace.
    #[test]
    fn render_is_trimmed(template in template_text(), fields in plain_fields()) {
        let rendered = Template::new(template).render(&fields);
        prop_assert_eq!(rendered.trim(), rendered.as_str());
    }

    /// Rendering the rendered text again changes nothing.
    #[test]
    fn render_is_idempotent(template in template_text(), fields in plain_fields()) {
        let once = Template::new(template).render(&fields);
        let twice = Template::new(once.clone()).render(&fields);
        prop_assert_eq!(once, twice);
    }

    /// A form is accepted exactly when its title has non-whitespace content.
    #[test]
    fn title_required(title in "[ \ta-z]{0,8}", description in ".*") {
        let mut fields = HashMap::new();
        fields.insert("title".to_string(), title.clone());
        fields.insert("description".to_string(), description);

        match FormData::new(fields) {
            Ok(form) => {
                prop_assert!(!title.trim().is_empty());
                prop_assert_eq!(form.title(), title.as_str());
            }
            Err(err) => {
                prop_assert!(title.trim().is_empty());
                prop_assert_eq!(err, FormError::MissingTitle);
            }
        }
    }

    /// Forms without a title are always rejected.
    #[test]
    fn missing_title_rejected(fields in plain_fields()) {
        let mut fields = fields;
        fields.remove("title");
        prop_assert!(FormData::new(fields).is_err());
    }
}
