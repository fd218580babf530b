//! `%(key)s`-style template substitution against a JSON context, matching
//! the upstream notifier's `subject % context` string formatting.

use regex::Regex;
use serde_json::Value;

pub fn render(template: &str, context: &Value) -> String {
    let re = Regex::new(r"%\((\w+)\)s").expect("static pattern");
    re.replace_all(template, |caps: &regex::Captures| {
        let key = &caps[1];
        context
            .get(key)
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .unwrap_or_default()
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_named_placeholders() {
        let ctx = serde_json::json!({"full_name": "Jane", "team": "sre"});
        assert_eq!(
            render("%(full_name)s is on-call for %(team)s", &ctx),
            "Jane is on-call for sre"
        );
    }

    #[test]
    fn missing_key_renders_empty() {
        let ctx = serde_json::json!({});
        assert_eq!(render("hi %(name)s", &ctx), "hi ");
    }
}
