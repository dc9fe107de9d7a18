//! Map fields and object properties.

use im::OrdMap;

use crate::error::Interrupt;
use crate::parser::{BoxedParser, Parser};
use crate::parsers::{expected_kind, insert_entry};
use crate::result::ParseResult;
use crate::stringify::Replacers;
use crate::subject::Subject;
use crate::value::{Key, Value, ValueKind};

fn missing(name: &str) -> Replacers {
    Replacers::from([("name".to_string(), name.into())])
}

/// Narrows into a required map entry and parses it. The output is the entry's
/// output.
pub struct Field<P> {
    name: String,
    parser: P,
}

impl<P: Parser> Field<P> {
    pub fn new(name: impl Into<String>, parser: P) -> Self {
        Self {
            name: name.into(),
            parser,
        }
    }
}

impl<P: Parser> Parser for Field<P> {
    fn parse(&self, subject: &Subject) -> Result<ParseResult, Interrupt> {
        let mut builder = subject.result_builder(self.description());
        let Some(map) = builder.value().as_map().cloned() else {
            expected_kind(&mut builder, ValueKind::Map)?;
            return Ok(builder.create_result_unchanged());
        };
        let Some(item) = map.get(&self.name).cloned() else {
            builder.log_error_template("missing key {name.export}", &missing(&self.name))?;
            return Ok(builder.create_result_unchanged());
        };
        let child = builder
            .current_subject()
            .array_value(Key::Name(self.name.clone()), item);
        let result = self.parser.parse(&child)?;
        builder.create_result_from_result(result)
    }

    fn description(&self) -> String {
        format!("field '{}': {}", self.name, self.parser.description())
    }
}

/// Narrows into a required object property and parses it.
pub struct Property<P> {
    name: String,
    parser: P,
}

impl<P: Parser> Property<P> {
    pub fn new(name: impl Into<String>, parser: P) -> Self {
        Self {
            name: name.into(),
            parser,
        }
    }
}

impl<P: Parser> Parser for Property<P> {
    fn parse(&self, subject: &Subject) -> Result<ParseResult, Interrupt> {
        let mut builder = subject.result_builder(self.description());
        let Some(object) = builder.value().as_object().cloned() else {
            expected_kind(&mut builder, ValueKind::Object)?;
            return Ok(builder.create_result_unchanged());
        };
        let Some(item) = object.property(&self.name).cloned() else {
            builder.log_error_template("{value.type} has no property {name}", &missing(&self.name))?;
            return Ok(builder.create_result_unchanged());
        };
        let child = builder
            .current_subject()
            .property_value(self.name.clone(), item);
        let result = self.parser.parse(&child)?;
        builder.create_result_from_result(result)
    }

    fn description(&self) -> String {
        format!("property '{}': {}", self.name, self.parser.description())
    }
}

/// Parses a fixed set of named map fields and outputs the map of their outputs.
///
/// Missing fields and field failures are all reported in collect mode, in the
/// order the fields were declared. Undeclared keys are dropped.
///
/// # Examples
///
/// ```rust
/// use assay::parsers::{Expect, IntRange, Record};
/// use assay::{Parser, Value, ValueKind};
/// let user = Record::new()
///     .field("name", Expect::kind(ValueKind::String))
///     .field("age", IntRange::new(0, 150).unwrap());
/// let input = Value::map([("name", Value::from(1)), ("age", Value::from(200))]);
/// let result = user.validate(input).unwrap();
/// assert_eq!(
///     result.error_messages(),
///     vec![
///         "Map['name']: expected string, got int".to_string(),
///         "Map['age']: 200 is not between 0 and 150".to_string(),
///     ]
/// );
/// ```
#[derive(Default)]
pub struct Record {
    fields: Vec<(String, BoxedParser)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field<P>(mut self, name: impl Into<String>, parser: P) -> Self
    where
        P: Parser + Send + Sync + 'static,
    {
        self.fields.push((name.into(), Box::new(parser)));
        self
    }
}

impl Parser for Record {
    fn parse(&self, subject: &Subject) -> Result<ParseResult, Interrupt> {
        let mut builder = subject.result_builder(self.description());
        let Some(map) = builder.value().as_map().cloned() else {
            expected_kind(&mut builder, ValueKind::Map)?;
            return Ok(builder.create_result_unchanged());
        };

        let current = builder.current_subject().clone();
        let mut outputs = OrdMap::new();
        for (name, parser) in &self.fields {
            let Some(item) = map.get(name).cloned() else {
                builder.log_error_template("missing key {name.export}", &missing(name))?;
                continue;
            };
            let result = parser.parse(&current.array_value(Key::Name(name.clone()), item))?;
            outputs.insert(name.clone(), builder.unwrap_result(result, Value::Null)?);
        }
        Ok(builder.create_result(Value::Map(outputs)))
    }

    fn description(&self) -> String {
        let names: Vec<&str> = self.fields.iter().map(|(name, _)| name.as_str()).collect();
        format!("record {{{}}}", names.join(", "))
    }
}

/// Parses every property name and value of an object, in name order. Outputs a
/// map of the parsed names to the parsed values.
pub struct EachProperty<N, V> {
    name: N,
    value: V,
}

impl<N: Parser, V: Parser> EachProperty<N, V> {
    pub fn new(name: N, value: V) -> Self {
        Self { name, value }
    }
}

impl<N: Parser, V: Parser> Parser for EachProperty<N, V> {
    fn parse(&self, subject: &Subject) -> Result<ParseResult, Interrupt> {
        let mut builder = subject.result_builder(self.description());
        let Some(object) = builder.value().as_object().cloned() else {
            expected_kind(&mut builder, ValueKind::Object)?;
            return Ok(builder.create_result_unchanged());
        };

        let current = builder.current_subject().clone();
        let mut outputs = OrdMap::new();
        for (name, item) in object.properties.iter() {
            let name_subject = current.property_name(name.clone());
            let name_result = self.name.parse(&name_subject)?;
            let parsed_name = builder.unwrap_result(name_result, name.clone())?;
            let value_result = self
                .value
                .parse(&current.property_value(name.clone(), item.clone()))?;
            let value = builder.unwrap_result(value_result, Value::Null)?;
            insert_entry(&mut builder, &mut outputs, name_subject, parsed_name, value)?;
        }
        Ok(builder.create_result(Value::Map(outputs)))
    }

    fn description(&self) -> String {
        format!(
            "each property: {} => {}",
            self.name.description(),
            self.value.description()
        )
    }
}
