//! Node kinds of the subject chain and how each renders into a path.

use serde::{Deserialize, Serialize};

use crate::value::Key;

/// Whether errors logged against a subject are thrown immediately or collected.
///
/// `Inherit` defers to the nearest ancestor with an explicit mode; the root of a
/// chain is always explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThrowMode {
    Throw,
    Collect,
    #[default]
    Inherit,
}

impl ThrowMode {
    pub fn from_flag(throw_on_error: bool) -> Self {
        if throw_on_error {
            ThrowMode::Throw
        } else {
            ThrowMode::Collect
        }
    }

    /// `Some(flag)` for explicit modes, `None` for `Inherit`.
    pub fn explicit(&self) -> Option<bool> {
        match self {
            ThrowMode::Throw => Some(true),
            ThrowMode::Collect => Some(false),
            ThrowMode::Inherit => None,
        }
    }
}

/// What a subject node represents relative to its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectKind {
    /// Head of a chain.
    Root(String),
    /// An element of a list or map, addressed by its key.
    ArrayValue(Key),
    /// The key of a list or map entry, as a value in its own right.
    ArrayKey(Key),
    /// A key and its value taken together.
    ArrayKeyValuePair(Key),
    /// An object property value.
    PropertyValue(String),
    /// An object property name.
    PropertyName(String),
    /// A property name and its value taken together.
    PropertyNameValuePair(String),
    /// Derived information about the source value (length, type, ...).
    MetaInformation(String),
    /// A parser started working here.
    ParserBegin(String),
    /// A parser produced a result here.
    ParserEnd(String),
    /// The value was rewritten mid-parse.
    Internal(String),
    /// The value was handed on unchanged to a sibling process.
    Forwarded(String),
    /// The value was handed to another parser for side validation only.
    Test(String),
}

impl SubjectKind {
    /// Raw description text carried by the node.
    pub fn description(&self) -> String {
        match self {
            SubjectKind::ArrayValue(key)
            | SubjectKind::ArrayKey(key)
            | SubjectKind::ArrayKeyValuePair(key) => key.to_string(),
            SubjectKind::Root(text)
            | SubjectKind::PropertyValue(text)
            | SubjectKind::PropertyName(text)
            | SubjectKind::PropertyNameValuePair(text)
            | SubjectKind::MetaInformation(text)
            | SubjectKind::ParserBegin(text)
            | SubjectKind::ParserEnd(text)
            | SubjectKind::Internal(text)
            | SubjectKind::Forwarded(text)
            | SubjectKind::Test(text) => text.clone(),
        }
    }

    /// Bookkeeping kinds are hidden from the value path unless overridden.
    pub fn is_utility_by_default(&self) -> bool {
        matches!(
            self,
            SubjectKind::ParserBegin(_)
                | SubjectKind::ParserEnd(_)
                | SubjectKind::Internal(_)
                | SubjectKind::Forwarded(_)
                | SubjectKind::Test(_)
        )
    }

    /// Side validations never abort the enclosing parse.
    pub fn default_throw_mode(&self) -> ThrowMode {
        match self {
            SubjectKind::Test(_) => ThrowMode::Collect,
            _ => ThrowMode::Inherit,
        }
    }

    /// Renders this node's path fragment. The last rendered node drops trailing
    /// decorations.
    pub fn fragment(&self, is_last: bool) -> String {
        match self {
            SubjectKind::Root(text) => text.clone(),
            SubjectKind::ArrayValue(key) => format!("[{}]", key),
            SubjectKind::ArrayKey(key) => format!(" key {}", key),
            SubjectKind::ArrayKeyValuePair(key) => format!(" entry {}", key),
            SubjectKind::PropertyValue(name) => format!(".{}", name),
            SubjectKind::PropertyName(name) => format!(" property name '{}'", name),
            SubjectKind::PropertyNameValuePair(name) => format!(" property '{}'", name),
            SubjectKind::MetaInformation(text) => format!(" meta {}", text),
            SubjectKind::ParserBegin(text) => decorated(" ▷", text, ""),
            SubjectKind::ParserEnd(text) => decorated(" ◁", text, ""),
            SubjectKind::Internal(text) => format!(" {}↩", text),
            SubjectKind::Forwarded(text) => {
                format!(" ⇒{}{}", text, if is_last { "" } else { "⇒" })
            }
            SubjectKind::Test(text) => {
                format!(" ⁇{}{}", text, if is_last { "" } else { "⁇" })
            }
        }
    }
}

fn decorated(prefix: &str, text: &str, suffix: &str) -> String {
    if text.is_empty() {
        String::new()
    } else {
        format!("{}{}{}", prefix, text, suffix)
    }
}
