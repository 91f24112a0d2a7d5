//! Placeholder substitution for prompt templates
//!
//! Substitution is textual and total: every occurrence of every recognized
//! placeholder is replaced exactly once per invocation, inserted values are
//! never re-scanned, and unrecognized `{...}` tokens pass through verbatim.

use std::collections::HashMap;

/// Placeholder carrying the raw user message.
pub const USER_QUERY: &str = "USER_QUERY";

/// Placeholder carrying the four-digit year at send time.
pub const CURRENT_YEAR: &str = "CURRENT_YEAR";

/// The substitution map handed to [`resolve`]. Keys are placeholder names
/// without braces.
#[derive(Debug, Clone, Default)]
pub struct Substitutions(HashMap<String, String>);

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: impl Into<String>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

/// Substitute recognized placeholders into `template`.
///
/// One left-to-right pass: a `{key}` token whose key is present in `subs`
/// is replaced with its value as opaque text; anything else (unknown keys,
/// an unmatched `{`) is copied through unchanged. Missing and extra keys
/// are never an error.
pub fn resolve(template: &str, subs: &Substitutions) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];

        match tail.find('}') {
            Some(close) => {
                let key = &tail[1..close];
                match subs.get(key) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&tail[..=close]),
                }
                rest = &tail[close + 1..];
            }
            None => {
                out.push_str(tail);
                return out;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Default system prompt sent with every generation request.
pub fn default_system_template() -> &'static str {
    "You are a helpful assistant embedded in a text-art studio. \
     The current year is {CURRENT_YEAR}. Keep answers short and plain; \
     the reply is shown in a narrow side panel."
}

/// Default user prompt wrapper. The user message is inserted as opaque
/// text, so nothing the user types is treated as a placeholder.
pub fn default_user_template() -> &'static str {
    "{USER_QUERY}"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_all_recognized_placeholders() {
        let subs = Substitutions::new()
            .set(USER_QUERY, "Bob")
            .set(CURRENT_YEAR, "2030");
        assert_eq!(
            resolve("Hi {USER_QUERY} in {CURRENT_YEAR}", &subs),
            "Hi Bob in 2030"
        );
    }

    #[test]
    fn unknown_placeholder_passes_through() {
        let subs = Substitutions::new().set(USER_QUERY, "Bob");
        assert_eq!(resolve("{FOO} says {USER_QUERY}", &subs), "{FOO} says Bob");
    }

    #[test]
    fn repeated_placeholder_replaced_everywhere() {
        let subs = Substitutions::new().set(USER_QUERY, "x");
        assert_eq!(resolve("{USER_QUERY}{USER_QUERY}", &subs), "xx");
    }

    #[test]
    fn inserted_value_is_not_rescanned() {
        let subs = Substitutions::new()
            .set(USER_QUERY, "{CURRENT_YEAR}")
            .set(CURRENT_YEAR, "2030");
        assert_eq!(resolve("say {USER_QUERY}", &subs), "say {CURRENT_YEAR}");
    }

    #[test]
    fn unmatched_brace_copied_verbatim() {
        let subs = Substitutions::new().set(USER_QUERY, "x");
        assert_eq!(resolve("a { b", &subs), "a { b");
        assert_eq!(resolve("{USER_QUERY} {", &subs), "x {");
    }

    #[test]
    fn missing_key_leaves_placeholder_literal() {
        let subs = Substitutions::new();
        assert_eq!(resolve("year: {CURRENT_YEAR}", &subs), "year: {CURRENT_YEAR}");
    }

    #[test]
    fn default_templates_carry_their_placeholders() {
        assert!(default_system_template().contains("{CURRENT_YEAR}"));
        assert!(default_user_template().contains("{USER_QUERY}"));
    }
}
