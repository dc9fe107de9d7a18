//! # Result Builder
//!
//! One builder per parser invocation. It starts on a utility "parser begin" node
//! wrapping the subject the parser was called with, follows value rewrites, and
//! collects errors until one of the `create_result*` finalizers consumes it.
//!
//! ## Error Modes
//!
//! The mode is resolved from the builder's root subject. In throw mode every
//! logged error (and every failed child result that is unwrapped) comes back as
//! `Err(Interrupt::Failure)` and is never stored; callers propagate it with `?`.
//! In collect mode errors are appended and parsing continues, so composites can
//! report every violation at once.

use std::any::Any;

use log::{debug, trace};

use crate::error::{Interrupt, ParseError, SourceError};
use crate::memory::{Memory, MemoryKey};
use crate::parser::Parser;
use crate::result::ParseResult;
use crate::stringify::Replacers;
use crate::subject::{Subject, SubjectKind, ThrowMode};
use crate::value::Value;

pub struct ResultBuilder {
    root_subject: Subject,
    current_subject: Subject,
    description: String,
    errors: Vec<ParseError>,
}

impl ResultBuilder {
    pub(crate) fn new(root_subject: Subject, description: String) -> Self {
        debug!(
            "builder: '{}' begins at {}",
            description,
            root_subject.value_path()
        );
        let current_subject = root_subject.extend(
            SubjectKind::ParserBegin(description.clone()),
            root_subject.value().clone(),
        );
        Self {
            root_subject,
            current_subject,
            description,
            errors: Vec::new(),
        }
    }

    // ------------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------------

    /// The current (possibly rewritten) value.
    pub fn value(&self) -> &Value {
        self.current_subject.value()
    }

    pub fn root_subject(&self) -> &Subject {
        &self.root_subject
    }

    pub fn current_subject(&self) -> &Subject {
        &self.current_subject
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn throws(&self) -> bool {
        self.root_subject.throw_on_error()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Rewrites the current value, recording the step as an internal node.
    pub fn set_value(&mut self, description: impl Into<String>, value: impl Into<Value>) {
        let description = description.into();
        trace!("builder: '{}' rewrites value ({})", self.description, description);
        self.current_subject = self
            .current_subject
            .extend(SubjectKind::Internal(description), value);
    }

    // ------------------------------------------------------------------------
    // Errors
    // ------------------------------------------------------------------------

    /// Throws in throw mode, appends in collect mode.
    pub fn log_error(&mut self, error: ParseError) -> Result<(), Interrupt> {
        if self.throws() {
            debug!("builder: '{}' throws: {}", self.description, error);
            return error.throw();
        }
        trace!("builder: '{}' collects: {}", self.description, error);
        self.errors.push(error);
        Ok(())
    }

    /// Renders `template` against the current subject and logs the error.
    pub fn log_error_template(
        &mut self,
        template: &str,
        replacers: &Replacers,
    ) -> Result<(), Interrupt> {
        self.log_error_template_with(template, replacers, None, Vec::new())
    }

    pub fn log_error_template_with(
        &mut self,
        template: &str,
        replacers: &Replacers,
        source_error: Option<SourceError>,
        source_errors: Vec<ParseError>,
    ) -> Result<(), Interrupt> {
        let error = ParseError::using_template(
            self.current_subject.clone(),
            template,
            replacers,
            source_error,
            source_errors,
        );
        self.log_error(error)
    }

    /// Takes a child's value, or merges its errors and returns `default`.
    ///
    /// In throw mode a failed child rethrows its first error.
    pub fn unwrap_result(
        &mut self,
        child: ParseResult,
        default: impl Into<Value>,
    ) -> Result<Value, Interrupt> {
        if child.is_success() {
            return Ok(child.subject().value().clone());
        }
        if self.throws() {
            return child.into_outcome();
        }
        self.errors.extend(child.into_errors());
        Ok(default.into())
    }

    // ------------------------------------------------------------------------
    // Delegation helpers
    // ------------------------------------------------------------------------

    /// Runs `parser` as a side validation in collect mode. Nothing is merged.
    pub fn test<P>(
        &self,
        parser: &P,
        description: impl Into<String>,
    ) -> Result<ParseResult, Interrupt>
    where
        P: Parser + ?Sized,
    {
        parser.parse(&self.current_subject.test(description))
    }

    /// Hands the current value on unchanged to `parser`.
    pub fn forward<P>(
        &self,
        parser: &P,
        description: impl Into<String>,
    ) -> Result<ParseResult, Interrupt>
    where
        P: Parser + ?Sized,
    {
        parser.parse(&self.current_subject.forwarded(description))
    }

    // ------------------------------------------------------------------------
    // Memory pass-through
    // ------------------------------------------------------------------------

    pub fn set_memory<T: Any + Send + Sync>(&self, key: MemoryKey, value: T) {
        self.root_subject.memory().set(key, value);
    }

    pub fn get_memory<T: Any + Send + Sync + Clone>(&self, key: MemoryKey, default: T) -> T {
        self.root_subject.memory().get(key, default)
    }

    pub fn has_memory(&self, key: MemoryKey) -> bool {
        self.root_subject.memory().has(key)
    }

    pub fn full_memory(&self) -> &Memory {
        self.root_subject.memory()
    }

    // ------------------------------------------------------------------------
    // Finalizers
    // ------------------------------------------------------------------------

    pub fn create_result(self, value: impl Into<Value>) -> ParseResult {
        let source = self.current_subject.clone();
        self.finish(&source, value.into())
    }

    /// Result with the value originally received by the parser, ignoring any
    /// rewrite.
    pub fn create_result_unchanged(self) -> ParseResult {
        let value = self.root_subject.value().clone();
        self.create_result(value)
    }

    pub fn create_result_with_current_value(self) -> ParseResult {
        let value = self.value().clone();
        self.create_result(value)
    }

    /// Adopts a delegate's final subject and value; this builder's earlier errors
    /// come first.
    pub fn create_result_from_result(
        mut self,
        other: ParseResult,
    ) -> Result<ParseResult, Interrupt> {
        if self.throws() {
            if let Some(first) = other.first_error().cloned() {
                return first.throw();
            }
        }
        let source = other.subject().clone();
        let value = source.value().clone();
        self.errors.extend(other.into_errors());
        Ok(self.finish(&source, value))
    }

    // The result node restates the builder's resolved mode so a mode set on an
    // internal node (e.g. a collecting test node) never leaks into the next parser.
    fn finish(self, source: &Subject, value: Value) -> ParseResult {
        let mode = ThrowMode::from_flag(self.throws());
        let value = if self.errors.is_empty() {
            value
        } else {
            debug!(
                "builder: '{}' failed with {} error(s)",
                self.description,
                self.errors.len()
            );
            Value::Null
        };
        let subject =
            source.extend_with(SubjectKind::ParserEnd(self.description), value, false, mode);
        ParseResult::new(subject, self.errors)
    }
}
