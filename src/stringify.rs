//! Message templating and value stringification.
//!
//! Templates contain `{key}` or `{key.modifier}` placeholders. The modifier picks
//! a [`Mode`]: `raw` (default), `type`, `debug`, or `export`. A placeholder whose
//! key has no binding or whose modifier is unknown is left in the output verbatim;
//! rendering never fails.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use unicode_segmentation::UnicodeSegmentation;

use crate::value::Value;

/// Placeholder bindings for a template.
pub type Replacers = BTreeMap<String, Value>;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)(?:\.([A-Za-z_]+))?\}")
        .unwrap_or_else(|e| unreachable!("placeholder pattern is valid: {e}"))
});

// Debug output limits.
const MAX_STRING_GRAPHEMES: usize = 120;
const MAX_ITEMS: usize = 10;
const MAX_DEPTH: usize = 3;

/// How a value is rendered into a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Scalars as-is, compound values in debug form.
    Raw,
    /// A type name (`int`, `string`, `object<Name>`, ...).
    Type,
    /// A short human-readable rendering.
    Debug,
    /// The complete literal form.
    Export,
}

impl Mode {
    pub fn from_modifier(modifier: &str) -> Option<Self> {
        match modifier {
            "raw" => Some(Mode::Raw),
            "type" => Some(Mode::Type),
            "debug" => Some(Mode::Debug),
            "export" => Some(Mode::Export),
            _ => None,
        }
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Substitutes every known placeholder in `template`.
///
/// # Examples
///
/// ```rust
/// use assay::stringify::{render_template, Replacers};
/// use assay::Value;
/// let replacers = Replacers::from([("n".to_string(), Value::Float(f64::NAN))]);
/// assert_eq!(render_template("{n.type} {n} {missing}", &replacers), "NAN NAN {missing}");
/// ```
pub fn render_template(template: &str, replacers: &Replacers) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let verbatim = caps[0].to_string();
            let Some(value) = replacers.get(&caps[1]) else {
                return verbatim;
            };
            let mode = match caps.get(2) {
                None => Mode::Raw,
                Some(modifier) => match Mode::from_modifier(modifier.as_str()) {
                    Some(mode) => mode,
                    None => return verbatim,
                },
            };
            stringify(value, mode)
        })
        .into_owned()
}

pub fn stringify(value: &Value, mode: Mode) -> String {
    match mode {
        Mode::Raw => raw(value),
        Mode::Type => type_name(value),
        Mode::Debug => debug(value),
        Mode::Export => export(value),
    }
}

pub fn raw(value: &Value) -> String {
    value.to_string()
}

/// # Examples
///
/// ```rust
/// use assay::stringify::type_name;
/// use assay::Value;
/// assert_eq!(type_name(&Value::Bool(false)), "false");
/// assert_eq!(type_name(&Value::Float(f64::NEG_INFINITY)), "-INF");
/// assert_eq!(type_name(&Value::Float(0.5)), "float");
/// ```
pub fn type_name(value: &Value) -> String {
    match value {
        Value::Null => "null".into(),
        Value::Bool(b) => b.to_string(),
        Value::Int(_) => "int".into(),
        Value::Float(f) if f.is_nan() => "NAN".into(),
        Value::Float(f) if f.is_infinite() => {
            if *f > 0.0 {
                "INF".into()
            } else {
                "-INF".into()
            }
        }
        Value::Float(_) => "float".into(),
        Value::String(_) => "string".into(),
        Value::List(_) => "list".into(),
        Value::Map(_) => "map".into(),
        Value::Object(object) => format!("object<{}>", object.class_name),
    }
}

pub fn debug(value: &Value) -> String {
    let mut out = String::new();
    write_debug(&mut out, value, 0);
    out
}

pub fn export(value: &Value) -> String {
    let mut out = String::new();
    write_export(&mut out, value);
    out
}

// ============================================================================
// RENDERING HELPERS
// ============================================================================

fn float_literal(f: f64) -> String {
    if f.is_nan() {
        "NAN".into()
    } else if f.is_infinite() {
        let literal = if f > 0.0 { "INF" } else { "-INF" };
        literal.to_string()
    } else if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{:.1}", f)
    } else {
        format!("{}", f)
    }
}

fn quoted(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s))
}

fn write_debug(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Null | Value::Bool(_) | Value::Int(_) => out.push_str(&value.to_string()),
        Value::Float(f) => out.push_str(&float_literal(*f)),
        Value::String(s) => {
            let graphemes: Vec<&str> = s.graphemes(true).collect();
            if graphemes.len() > MAX_STRING_GRAPHEMES {
                let head: String = graphemes[..MAX_STRING_GRAPHEMES].concat();
                out.push_str(&quoted(&format!("{}…", head)));
            } else {
                out.push_str(&quoted(s));
            }
        }
        Value::List(items) => {
            if depth >= MAX_DEPTH {
                out.push_str("[…]");
                return;
            }
            out.push('[');
            for (i, item) in items.iter().take(MAX_ITEMS).enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_debug(out, item, depth + 1);
            }
            if items.len() > MAX_ITEMS {
                out.push_str(", …");
            }
            out.push(']');
        }
        Value::Map(map) => {
            if depth >= MAX_DEPTH {
                out.push_str("{…}");
                return;
            }
            out.push('{');
            for (i, (key, item)) in map.iter().take(MAX_ITEMS).enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&quoted(key));
                out.push_str(": ");
                write_debug(out, item, depth + 1);
            }
            if map.len() > MAX_ITEMS {
                out.push_str(", …");
            }
            out.push('}');
        }
        Value::Object(object) => out.push_str(&format!("object<{}>", object.class_name)),
    }
}

fn write_export(out: &mut String, value: &Value) {
    match value {
        Value::Null | Value::Bool(_) | Value::Int(_) => out.push_str(&value.to_string()),
        Value::Float(f) => out.push_str(&float_literal(*f)),
        Value::String(s) => out.push_str(&quoted(s)),
        Value::List(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_export(out, item);
            }
            out.push(']');
        }
        Value::Map(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&quoted(key));
                out.push_str(": ");
                write_export(out, item);
            }
            out.push('}');
        }
        Value::Object(object) => {
            out.push_str(&object.class_name);
            out.push_str(" {");
            for (i, (name, item)) in object.properties.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(name);
                out.push_str(": ");
                write_export(out, item);
            }
            out.push('}');
        }
    }
}
