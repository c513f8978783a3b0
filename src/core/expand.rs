//! core::expand
//!
//! Named-placeholder substitution.
//!
//! # Design
//!
//! A placeholder is written `{key}`. [`expand`] replaces every placeholder
//! whose key has a value and leaves every other placeholder verbatim, so a
//! partially expanded template can be expanded again later.
//!
//! The same function builds vendor API endpoints and renders report bodies,
//! which keeps the unmatched-placeholder rule identical for both.
//!
//! Substitution is a single left-to-right pass. Text inserted from `values`
//! is never rescanned, so a value containing `{other}` stays literal.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use reporter::core::expand::expand;
//!
//! let mut values = HashMap::new();
//! values.insert("owner".to_string(), "octocat".to_string());
//!
//! let url = expand("https://api.github.com/repos/{owner}/{repo}/issues", &values);
//! assert_eq!(url, "https://api.github.com/repos/octocat/{repo}/issues");
//! ```

use std::collections::HashMap;

/// Expand `{key}` placeholders in `template` from `values`.
///
/// Keys in `values` that do not occur in `template` are ignored. Placeholders
/// with no matching key are kept as written.
pub fn expand<V: AsRef<str>>(template: &str, values: &HashMap<String, V>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];

        match after_open.find(['{', '}']) {
            Some(close) if after_open.as_bytes()[close] == b'}' => {
                let key = &after_open[..close];
                match values.get(key) {
                    Some(value) => out.push_str(value.as_ref()),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after_open[close + 1..];
            }
            // Another '{' before any '}': this brace opens nothing.
            _ => {
                out.push('{');
                rest = after_open;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Convenience for building a value map from string pairs.
pub fn values<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> HashMap<String, String> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_known_keys() {
        let v = values([("user", "alice"), ("repo", "tools")]);
        assert_eq!(
            expand("https://api.bitbucket.org/2.0/repositories/{user}/{repo}/issues", &v),
            "https://api.bitbucket.org/2.0/repositories/alice/tools/issues"
        );
    }

    #[test]
    fn leaves_unknown_placeholders_verbatim() {
        let v = values([("title", "Bug")]);
        assert_eq!(expand("{title}: {description}", &v), "Bug: {description}");
    }

    #[test]
    fn ignores_extra_values() {
        let v = values([("a", "1"), ("unused", "2")]);
        assert_eq!(expand("x{a}x", &v), "x1x");
    }

    #[test]
    fn repeated_placeholder_is_replaced_everywhere() {
        let v = values([("id", "42")]);
        assert_eq!(expand("{id}/{id}", &v), "42/42");
    }

    #[test]
    fn inserted_values_are_not_rescanned() {
        let v = values([("a", "{b}"), ("b", "nope")]);
        assert_eq!(expand("{a}", &v), "{b}");
    }

    #[test]
    fn stray_braces_are_kept() {
        let v = values([("a", "1")]);
        assert_eq!(expand("{ {a} }", &v), "{ 1 }");
        assert_eq!(expand("{{a}}", &v), "{1}");
        assert_eq!(expand("unterminated {a", &v), "unterminated {a");
        assert_eq!(expand("}", &v), "}");
    }

    #[test]
    fn empty_key_only_matches_empty_entry() {
        let none = values([]);
        assert_eq!(expand("{}", &none), "{}");

        let some = values([("", "x")]);
        assert_eq!(expand("{}", &some), "x");
    }

    #[test]
    fn multibyte_text_survives() {
        let v = values([("name", "Jürgen")]);
        assert_eq!(expand("Grüße {name} ✓", &v), "Grüße Jürgen ✓");
    }
}
