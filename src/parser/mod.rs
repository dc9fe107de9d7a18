//! # Parser Contract
//!
//! A parser turns a [`Subject`] into a [`ParseResult`]. It must not touch the
//! subject beyond reading its value, and it must report through the builder it
//! obtains from [`Subject::result_builder`]. Everything else in this module is
//! glue built on that contract:
//!
//! - **`chain`**: `then` and the short-circuiting [`Chain`]
//! - **`assign`**: pass-through parsers writing into a [`Slot`] or [`Collector`]
//! - **`fork`**: several parsers against the same value, all must succeed
//! - **`one_of`**: several parsers against the same value, first success wins

use std::sync::Arc;

use crate::builder::ResultBuilder;
use crate::error::Interrupt;
use crate::options::ParseOptions;
use crate::result::ParseResult;
use crate::subject::Subject;
use crate::value::Value;

mod assign;
mod chain;
mod fork;
mod one_of;

pub use assign::{AppendTo, AssignTo, Collector, Slot};
pub use chain::{Chain, Chainable};
pub use fork::Fork;
pub use one_of::OneOf;

// ============================================================================
// CORE TRAIT
// ============================================================================

pub trait Parser {
    /// Parses `subject`. Data failures in throw mode and runtime configuration
    /// mistakes come back as `Err`; collected failures live on the result.
    fn parse(&self, subject: &Subject) -> Result<ParseResult, Interrupt>;

    /// Human-readable description, used for the builder's begin node.
    fn description(&self) -> String;

    /// Parses a fresh throw-mode root and returns the output value.
    fn parse_value(&self, value: Value) -> Result<Value, Interrupt> {
        self.parse(&Subject::new(value))?.into_outcome()
    }

    /// Parses a fresh collect-mode root; every violation ends up on the result.
    fn validate(&self, value: Value) -> Result<ParseResult, Interrupt> {
        self.parse(&Subject::new_root(value, false))
    }

    /// Parses a root built from `options`.
    fn parse_with(&self, value: Value, options: &ParseOptions) -> Result<ParseResult, Interrupt> {
        self.parse(&options.root_subject(value))
    }
}

/// A boxed parser, for heterogeneous option lists.
pub type BoxedParser = Box<dyn Parser + Send + Sync>;

impl<P: Parser + ?Sized> Parser for &P {
    fn parse(&self, subject: &Subject) -> Result<ParseResult, Interrupt> {
        (**self).parse(subject)
    }

    fn description(&self) -> String {
        (**self).description()
    }
}

impl<P: Parser + ?Sized> Parser for Box<P> {
    fn parse(&self, subject: &Subject) -> Result<ParseResult, Interrupt> {
        (**self).parse(subject)
    }

    fn description(&self) -> String {
        (**self).description()
    }
}

impl<P: Parser + ?Sized> Parser for Arc<P> {
    fn parse(&self, subject: &Subject) -> Result<ParseResult, Interrupt> {
        (**self).parse(subject)
    }

    fn description(&self) -> String {
        (**self).description()
    }
}

// ============================================================================
// CLOSURE ADAPTER
// ============================================================================

type ParseFn = dyn Fn(ResultBuilder) -> Result<ParseResult, Interrupt> + Send + Sync;

/// A parser defined by a closure over a fresh builder.
///
/// # Examples
///
/// ```rust
/// use assay::{FnParser, Parser, Replacers, Value};
/// let even = FnParser::new("even", |mut builder| {
///     if builder.value().as_int().map_or(true, |i| i % 2 != 0) {
///         builder.log_error_template("{value} is not even", &Replacers::new())?;
///     }
///     Ok(builder.create_result_unchanged())
/// });
/// assert_eq!(even.parse_value(Value::from(4)).unwrap(), Value::from(4));
/// assert!(even.parse_value(Value::from(3)).is_err());
/// ```
pub struct FnParser {
    description: String,
    parse: Box<ParseFn>,
}

impl FnParser {
    pub fn new<F>(description: impl Into<String>, parse: F) -> Self
    where
        F: Fn(ResultBuilder) -> Result<ParseResult, Interrupt> + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            parse: Box::new(parse),
        }
    }
}

impl Parser for FnParser {
    fn parse(&self, subject: &Subject) -> Result<ParseResult, Interrupt> {
        (self.parse)(subject.result_builder(self.description.clone()))
    }

    fn description(&self) -> String {
        self.description.clone()
    }
}
