//! # Consumer Parsers
//!
//! A small catalogue of parsers built purely on the public contract. They are
//! ordinary clients of the builder; anything here could live in an application.
//!
//! ## Module Structure
//!
//! - **`expect`**: type and shape assertions
//! - **`collections`**: list elements, map entries, lengths
//! - **`record`**: map fields and object properties
//! - **`scalar`**: integer ranges, string trimming
//! - **`unique`**: run-wide duplicate detection through memory
//! - **`registry`**: named parsers and late-bound references

mod collections;
mod expect;
mod record;
mod registry;
mod scalar;
mod unique;

pub use collections::{EachElement, EachEntry, Length};
pub use expect::Expect;
pub use record::{EachProperty, Field, Property, Record};
pub use registry::{ParserRegistry, Reference, SharedParser};
pub use scalar::{IntRange, Trim};
pub use unique::Unique;

use im::OrdMap;

use crate::builder::ResultBuilder;
use crate::error::{Interrupt, ParseError};
use crate::stringify::Replacers;
use crate::subject::Subject;
use crate::value::{Value, ValueKind};

/// Logs the standard shape-mismatch error against the builder's current value.
pub(crate) fn expected_kind(
    builder: &mut ResultBuilder,
    expected: ValueKind,
) -> Result<(), Interrupt> {
    let replacers = Replacers::from([("expected".to_string(), expected.as_str().into())]);
    builder.log_error_template("expected {expected}, got {value.type}", &replacers)
}

/// Inserts a parsed entry, logging an error on `key_subject` instead when an
/// earlier entry already produced the same output key.
pub(crate) fn insert_entry(
    builder: &mut ResultBuilder,
    outputs: &mut OrdMap<String, Value>,
    key_subject: Subject,
    key: Value,
    value: Value,
) -> Result<(), Interrupt> {
    let key = match key {
        Value::String(s) => s,
        other => other.to_string(),
    };
    if outputs.contains_key(&key) {
        let replacers = Replacers::from([("key".to_string(), Value::from(key))]);
        return builder.log_error(ParseError::using_template(
            key_subject,
            "{value.export} maps to the existing key {key.export}",
            &replacers,
            None,
            Vec::new(),
        ));
    }
    outputs.insert(key, value);
    Ok(())
}
