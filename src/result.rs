//! The outcome of one parser invocation.

use crate::error::{Interrupt, ParseError, RuntimeConfigError};
use crate::subject::Subject;
use crate::value::Value;

/// A subject node holding the candidate output, plus the errors found on the way.
///
/// Success is exactly "no errors". A failed result keeps `Value::Null` as a
/// sentinel and refuses to hand it out.
#[derive(Debug, Clone)]
pub struct ParseResult {
    subject: Subject,
    errors: Vec<ParseError>,
}

impl ParseResult {
    pub(crate) fn new(subject: Subject, errors: Vec<ParseError>) -> Self {
        Self { subject, errors }
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    pub fn first_error(&self) -> Option<&ParseError> {
        self.errors.first()
    }

    /// Each error as `"<value path>: <message>"`, in encounter order.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// The node to hand to the next parser of a chain.
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// The output value.
    ///
    /// # Errors
    ///
    /// Reading the value of a failed result is a usage mistake and returns
    /// [`RuntimeConfigError::ValueOfFailedResult`].
    pub fn value(&self) -> Result<&Value, RuntimeConfigError> {
        if self.is_success() {
            Ok(self.subject.value())
        } else {
            Err(self.failed_access())
        }
    }

    pub fn into_value(self) -> Result<Value, RuntimeConfigError> {
        self.value().cloned()
    }

    /// Success becomes the value, failure throws the first error.
    pub fn into_outcome(self) -> Result<Value, Interrupt> {
        match self.errors.into_iter().next() {
            None => Ok(self.subject.value().clone()),
            Some(first) => first.throw(),
        }
    }

    fn failed_access(&self) -> RuntimeConfigError {
        RuntimeConfigError::ValueOfFailedResult {
            path: self.subject.value_path(),
            errors: self.errors.len(),
        }
    }
}
