//! Meta field sanitizers.
//!
//! Every meta field is registered with the name of a host sanitizer. When the
//! field does not declare one it is chosen from the value type. The built-in
//! sanitizers also carry a local [`Sanitizer::apply`] that performs the same
//! coercion, which hosts without their own implementation can call.

use regex::Regex;
use serde_json::{Number, Value};
use std::sync::OnceLock;

static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
static OCTET_REGEX: OnceLock<Regex> = OnceLock::new();
static WHITESPACE_REGEX: OnceLock<Regex> = OnceLock::new();
static LIST_SEPARATOR_REGEX: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sanitizer {
    Boolean,
    AbsoluteInteger,
    Float,
    Array,
    Text,
    /// A host sanitizer declared by name in configuration
    Named(String),
}

impl Sanitizer {
    /// Sanitizer for a declared value type. Unknown and missing types are
    /// treated as text.
    pub fn for_type(value_type: Option<&str>) -> Self {
        match value_type {
            Some("boolean") => Self::Boolean,
            Some("integer") => Self::AbsoluteInteger,
            Some("number") => Self::Float,
            Some("array") => Self::Array,
            _ => Self::Text,
        }
    }

    /// A declared sanitizer name wins over the type-based choice.
    pub fn resolve(declared: Option<&str>, value_type: Option<&str>) -> Self {
        match declared.map(str::trim).filter(|name| !name.is_empty()) {
            Some(name) => Self::Named(name.to_string()),
            None => Self::for_type(value_type),
        }
    }

    /// Name of the host callback registered with the field.
    pub fn callback_name(&self) -> &str {
        match self {
            Self::Boolean => "rest_sanitize_boolean",
            Self::AbsoluteInteger => "absint",
            Self::Float => "floatval",
            Self::Array => "rest_sanitize_array",
            Self::Text => "sanitize_text_field",
            Self::Named(name) => name,
        }
    }

    /// Coerce a raw value. Named sanitizers only exist on the host, so the
    /// value passes through unchanged.
    pub fn apply(&self, value: &Value) -> Value {
        match self {
            Self::Boolean => Value::Bool(truthy(value)),
            Self::AbsoluteInteger => Value::Number(Number::from(absolute_integer(value))),
            Self::Float => Number::from_f64(float_value(value))
                .map(Value::Number)
                .unwrap_or_else(|| Value::Number(Number::from(0))),
            Self::Array => Value::Array(array_value(value)),
            Self::Text => Value::String(sanitize_text(&scalar_text(value))),
            Self::Named(_) => value.clone(),
        }
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => {
            let s = s.trim().to_lowercase();
            !(s.is_empty() || s == "0" || s == "false")
        }
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Null => false,
    }
}

/// Leading integer of a string, the way loose numeric casts read it.
fn leading_integer(text: &str) -> i64 {
    let text = text.trim_start();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map(|n| sign * n).unwrap_or(0)
}

fn absolute_integer(value: &Value) -> u64 {
    let n = match value {
        Value::Bool(b) => i64::from(*b),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => leading_integer(s),
        _ => 0,
    };
    n.unsigned_abs()
}

fn float_value(value: &Value) -> f64 {
    match value {
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let s = s.trim();
            let end = s
                .char_indices()
                .find(|&(i, c)| {
                    !(c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E'
                        || ((c == '-' || c == '+') && (i == 0 || s[..i].ends_with(['e', 'E']))))
                })
                .map(|(i, _)| i)
                .unwrap_or(s.len());
            // shrink until the prefix parses, e.g. "1.5e" -> "1.5"
            (1..=end)
                .rev()
                .find_map(|len| s[..len].parse::<f64>().ok())
                .unwrap_or(0.0)
        }
        _ => 0.0,
    }
}

fn array_value(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        Value::Object(map) => map.values().cloned().collect(),
        Value::String(s) => {
            let separator = LIST_SEPARATOR_REGEX.get_or_init(|| {
                Regex::new(r"[\s,]+").expect("Invalid list separator regex")
            });
            separator
                .split(s)
                .filter(|item| !item.is_empty())
                .map(|item| Value::String(item.to_string()))
                .collect()
        }
        Value::Bool(_) | Value::Number(_) => vec![value.clone()],
        Value::Null => Vec::new(),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "1".to_string(),
        _ => String::new(),
    }
}

/// Plain-text cleanup for a single-line field: tags and percent-encoded
/// octets are removed, whitespace runs collapse to one space.
pub fn sanitize_text(text: &str) -> String {
    let tags = TAG_REGEX.get_or_init(|| Regex::new(r"<[^>]*>?").expect("Invalid tag regex"));
    let octets =
        OCTET_REGEX.get_or_init(|| Regex::new(r"%[a-fA-F0-9]{2}").expect("Invalid octet regex"));
    let whitespace =
        WHITESPACE_REGEX.get_or_init(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

    let stripped = tags.replace_all(text, "");
    let stripped = octets.replace_all(&stripped, "");
    whitespace.replace_all(&stripped, " ").trim().to_string()
}
