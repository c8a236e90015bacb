//! `{$json.<path>}` references from parameter values into the current item.

use serde_json::{Map, Value as JsonValue};

const PREFIX: &str = "$json";

/// Resolves references in `value` against `item`. A string that is exactly one
/// reference keeps the referenced value's JSON type; references embedded in
/// longer strings are interpolated as text.
pub fn resolve_value(value: &JsonValue, item: &Map<String, JsonValue>) -> JsonValue {
    match value {
        JsonValue::String(s) => resolve_str(s, item),
        JsonValue::Array(arr) => {
            JsonValue::Array(arr.iter().map(|v| resolve_value(v, item)).collect())
        }
        JsonValue::Object(m) => JsonValue::Object(
            m.iter()
                .map(|(k, v)| (k.clone(), resolve_value(v, item)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn resolve_str(s: &str, item: &Map<String, JsonValue>) -> JsonValue {
    if let Some(path) = whole_reference(s) {
        return lookup(item, path).cloned().unwrap_or(JsonValue::Null);
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("{$") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let inner = rest[start + 1..start + len].trim();
        match reference_path(inner) {
            Some(path) => {
                let text = lookup(item, path).map(value_to_string).unwrap_or_default();
                out.push_str(&text);
            }
            None => out.push_str(&rest[start..=start + len]),
        }
        rest = &rest[start + len + 1..];
    }
    out.push_str(rest);
    JsonValue::String(out)
}

fn whole_reference(s: &str) -> Option<&str> {
    let inner = s.trim().strip_prefix('{')?.strip_suffix('}')?.trim();
    if inner.contains(['{', '}']) {
        return None;
    }
    reference_path(inner)
}

fn reference_path(inner: &str) -> Option<&str> {
    let rest = inner.strip_prefix(PREFIX)?;
    if rest.is_empty() {
        return Some("");
    }
    rest.strip_prefix('.')
}

fn lookup<'a>(item: &'a Map<String, JsonValue>, path: &str) -> Option<&'a JsonValue> {
    let mut segments = path.split('.').filter(|s| !s.is_empty());
    let Some(first) = segments.next() else {
        return None;
    };
    let mut cur = item.get(first)?;
    for seg in segments {
        cur = match cur {
            JsonValue::Object(m) => m.get(seg)?,
            JsonValue::Array(a) => a.get(seg.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(cur)
}

fn value_to_string(v: &JsonValue) -> String {
    match v {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}
