//! Instruction templates with `{{name}}` placeholders.
//!
//! Values come from the serialized request object. Strings are inserted as
//! is, lists are joined with ", ", anything missing renders as nothing.

use serde_json::Value;

#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    source: &'static str,
}

impl PromptTemplate {
    pub const fn new(source: &'static str) -> Self {
        Self { source }
    }

    /// Fill placeholders from the fields of `input` (a JSON object).
    pub fn render(&self, input: &Value) -> String {
        let mut out = String::with_capacity(self.source.len());
        let mut rest = self.source;

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find("}}") {
                Some(end) => {
                    let key = after[..end].trim();
                    if let Some(value) = input.get(key) {
                        out.push_str(&render_value(value));
                    }
                    rest = &after[end + 2..];
                }
                None => {
                    // unterminated, keep literally
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(render_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_strings_and_lists() {
        let t = PromptTemplate::new("Event: {{title}}\nPlatforms: {{ platforms }}");
        let out = t.render(&json!({"title": "Tech Meetup", "platforms": ["x", "linkedin"]}));
        assert_eq!(out, "Event: Tech Meetup\nPlatforms: x, linkedin");
    }

    #[test]
    fn test_missing_and_null_render_empty() {
        let t = PromptTemplate::new("[{{a}}][{{b}}]");
        assert_eq!(t.render(&json!({"b": null})), "[][]");
    }

    #[test]
    fn test_values_are_not_re_expanded() {
        let t = PromptTemplate::new("{{a}}");
        assert_eq!(t.render(&json!({"a": "{{b}}", "b": "no"})), "{{b}}");
    }

    #[test]
    fn test_unterminated_placeholder_is_literal() {
        let t = PromptTemplate::new("x {{a}} y {{b");
        assert_eq!(t.render(&json!({"a": 1})), "x 1 y {{b");
    }
}
