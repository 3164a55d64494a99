use handlebars::Handlebars;
use serde_json::Value;

use crate::error::CardError;

#[derive(Clone, Debug, Default)]
pub struct BindingSummary {
    pub handlebars_expansions: u64,
    pub placeholder_replacements: u64,
    pub missing_paths: u64,
}

/// Data the template placeholders resolve against.
#[derive(Clone, Debug)]
pub struct BindingScope {
    data: Value,
}

impl BindingScope {
    pub fn new(data: Value) -> Self {
        BindingScope { data }
    }

    /// Resolves `path` or `path||default` against the scope. Paths are
    /// dotted with optional brackets (`user.addresses[0].city`); the
    /// default applies when the path is missing or resolves to null.
    pub fn lookup(&self, raw: &str) -> Option<Value> {
        let (path, default) = parse_binding_path(raw);
        let normalized = normalize_path(&path);
        let found = if normalized.is_empty() {
            None
        } else {
            lookup_in(&self.data, normalized.split('.'))
        };
        match (found, default) {
            (Some(value), _) if !value.is_null() => Some(value),
            (None, Some(fallback)) | (Some(Value::Null), Some(fallback)) => Some(fallback),
            (other, _) => other,
        }
    }
}

/// Expands every template in the raw card JSON against `data`: a
/// handlebars pass over each string, then `@{path}` placeholder
/// substitution. A whole-string placeholder keeps the resolved value's
/// JSON type; an embedded one is stringified. A missing path without a
/// `||` default fails the expansion.
pub fn expand_card(card: &mut Value, data: &Value) -> Result<BindingSummary, CardError> {
    let mut summary = BindingSummary::default();
    let mut engine = Handlebars::new();
    engine.set_strict_mode(false);
    render_handlebars_value(card, &engine, data, &mut summary)?;

    let scope = BindingScope::new(data.clone());
    apply_placeholders(card, &scope, &mut summary)?;
    Ok(summary)
}

fn render_handlebars_value(
    value: &mut Value,
    engine: &Handlebars<'_>,
    context: &Value,
    summary: &mut BindingSummary,
) -> Result<(), CardError> {
    match value {
        Value::String(text) => {
            if !text.contains("{{") {
                return Ok(());
            }
            let rendered = engine
                .render_template(text, context)
                .map_err(|err| CardError::Binding(format!("handlebars: {err}")))?;
            if rendered != *text {
                summary.handlebars_expansions += 1;
            }
            *value = Value::String(rendered);
            Ok(())
        }
        Value::Array(items) => {
            for item in items {
                render_handlebars_value(item, engine, context, summary)?;
            }
            Ok(())
        }
        Value::Object(map) => {
            for entry in map.values_mut() {
                render_handlebars_value(entry, engine, context, summary)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn apply_placeholders(
    value: &mut Value,
    scope: &BindingScope,
    summary: &mut BindingSummary,
) -> Result<(), CardError> {
    match value {
        Value::String(text) => {
            if let Some(path) = extract_single_placeholder(text) {
                if let Some(resolved) = scope.lookup(path) {
                    *value = resolved;
                    summary.placeholder_replacements += 1;
                    return Ok(());
                }
                summary.missing_paths += 1;
                return Err(CardError::Binding(format!("missing binding path: {path}")));
            }
            if text.contains("@{") {
                let replaced = replace_placeholders(text, scope, summary)?;
                *value = Value::String(replaced);
            }
            Ok(())
        }
        Value::Array(items) => {
            for item in items {
                apply_placeholders(item, scope, summary)?;
            }
            Ok(())
        }
        Value::Object(map) => {
            for entry in map.values_mut() {
                apply_placeholders(entry, scope, summary)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn replace_placeholders(
    input: &str,
    scope: &BindingScope,
    summary: &mut BindingSummary,
) -> Result<String, CardError> {
    let mut output = String::new();
    let mut rest = input;
    loop {
        let Some(start) = rest.find("@{") else {
            output.push_str(rest);
            break;
        };
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            // Unterminated placeholder; keep the text as written.
            output.push_str(&rest[start..]);
            break;
        };
        let path = after[..end].trim();
        let Some(replacement) = scope.lookup(path) else {
            summary.missing_paths += 1;
            return Err(CardError::Binding(format!("missing binding path: {path}")));
        };
        match replacement {
            Value::String(s) => output.push_str(&s),
            other => output.push_str(&other.to_string()),
        }
        summary.placeholder_replacements += 1;
        rest = &after[end + 1..];
    }
    Ok(output)
}

fn extract_single_placeholder(input: &str) -> Option<&str> {
    let trimmed = input.trim();
    trimmed
        .strip_prefix("@{")
        .and_then(|s| s.strip_suffix('}'))
        .filter(|inner| !inner.contains("@{"))
        .map(str::trim)
}

fn parse_binding_path(raw: &str) -> (String, Option<Value>) {
    let mut parts = raw.splitn(2, "||");
    let path = parts.next().unwrap_or(raw).trim().to_string();
    let default = parts.next().and_then(|candidate| {
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            return None;
        }
        serde_json::from_str::<Value>(trimmed)
            .ok()
            .or_else(|| Some(Value::String(trimmed.to_string())))
    });
    (path, default)
}

fn lookup_in<'a, I>(value: &Value, parts: I) -> Option<Value>
where
    I: Iterator<Item = &'a str>,
{
    let mut current = value;
    for part in parts {
        match current {
            Value::Object(map) => current = map.get(part)?,
            Value::Array(items) => {
                let idx: usize = part.parse().ok()?;
                current = items.get(idx)?;
            }
            _ => return None,
        }
    }
    Some(current.clone())
}

fn normalize_path(path: &str) -> String {
    let mut normalized = path.replace('[', ".").replace(']', "");
    normalized = normalized.replace("..", ".");
    normalized.trim_matches('.').to_string()
}
