//! List elements, map entries and lengths.

use im::{OrdMap, Vector};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::Interrupt;
use crate::parser::Parser;
use crate::parsers::{expected_kind, insert_entry};
use crate::result::ParseResult;
use crate::stringify::Replacers;
use crate::subject::Subject;
use crate::value::{Key, Value, ValueKind};

// ============================================================================
// LIST ELEMENTS
// ============================================================================

/// Parses every element of a list, in index order.
///
/// In collect mode every element is visited and every element error is reported;
/// the output is the list of element outputs.
pub struct EachElement<P> {
    element: P,
}

impl<P: Parser> EachElement<P> {
    pub fn new(element: P) -> Self {
        Self { element }
    }
}

impl<P: Parser> Parser for EachElement<P> {
    fn parse(&self, subject: &Subject) -> Result<ParseResult, Interrupt> {
        let mut builder = subject.result_builder(self.description());
        let Some(items) = builder.value().as_list().cloned() else {
            expected_kind(&mut builder, ValueKind::List)?;
            return Ok(builder.create_result_unchanged());
        };

        let current = builder.current_subject().clone();
        let mut outputs = Vector::new();
        for (index, item) in items.into_iter().enumerate() {
            let result = self.element.parse(&current.array_value(index, item))?;
            outputs.push_back(builder.unwrap_result(result, Value::Null)?);
        }
        Ok(builder.create_result(Value::List(outputs)))
    }

    fn description(&self) -> String {
        format!("each element: {}", self.element.description())
    }
}

// ============================================================================
// MAP ENTRIES
// ============================================================================

/// Parses every key and value of a map, in key order.
///
/// Keys are parsed on `key` nodes, values on element nodes. A key parser may
/// rename the key; non-string key outputs are stringified. Two keys renamed to
/// the same output are an error on the later key.
pub struct EachEntry<K, V> {
    key: K,
    value: V,
}

impl<K: Parser, V: Parser> EachEntry<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}

impl<K: Parser, V: Parser> Parser for EachEntry<K, V> {
    fn parse(&self, subject: &Subject) -> Result<ParseResult, Interrupt> {
        let mut builder = subject.result_builder(self.description());
        let Some(entries) = builder.value().as_map().cloned() else {
            expected_kind(&mut builder, ValueKind::Map)?;
            return Ok(builder.create_result_unchanged());
        };

        let current = builder.current_subject().clone();
        let mut outputs = OrdMap::new();
        for (name, item) in entries {
            let key_subject = current.array_key(name.clone());
            let key_result = self.key.parse(&key_subject)?;
            let key = builder.unwrap_result(key_result, name.clone())?;
            let value_result = self.value.parse(&current.array_value(Key::Name(name), item))?;
            let value = builder.unwrap_result(value_result, Value::Null)?;
            insert_entry(&mut builder, &mut outputs, key_subject, key, value)?;
        }
        Ok(builder.create_result(Value::Map(outputs)))
    }

    fn description(&self) -> String {
        format!(
            "each entry: {} => {}",
            self.key.description(),
            self.value.description()
        )
    }
}

// ============================================================================
// LENGTH
// ============================================================================

/// Parses the length of a string (in graphemes), list, map or object on a
/// `meta length` node. The value itself passes through.
pub struct Length<P> {
    length: P,
}

impl<P: Parser> Length<P> {
    pub fn new(length: P) -> Self {
        Self { length }
    }
}

fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.graphemes(true).count()),
        Value::List(items) => Some(items.len()),
        Value::Map(map) => Some(map.len()),
        Value::Object(object) => Some(object.properties.len()),
        _ => None,
    }
}

impl<P: Parser> Parser for Length<P> {
    fn parse(&self, subject: &Subject) -> Result<ParseResult, Interrupt> {
        let mut builder = subject.result_builder(self.description());
        let Some(length) = length_of(builder.value()) else {
            builder.log_error_template("{value.type} has no length", &Replacers::new())?;
            return Ok(builder.create_result_unchanged());
        };
        let result = self
            .length
            .parse(&builder.current_subject().meta("length", length))?;
        builder.unwrap_result(result, Value::Null)?;
        Ok(builder.create_result_unchanged())
    }

    fn description(&self) -> String {
        format!("length: {}", self.length.description())
    }
}
