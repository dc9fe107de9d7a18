//! # Error Taxonomy
//!
//! Two families of failure never mix:
//!
//! - **Data failures.** A [`ParseError`] records one violation at one subject.
//!   In collect mode errors accumulate on a [`crate::ParseResult`]; in throw mode
//!   the first one propagates as [`Interrupt::Failure`].
//! - **Programmer failures.** [`ConfigError`] is returned eagerly by parser
//!   constructors; [`RuntimeConfigError`] surfaces mid-parse as
//!   [`Interrupt::Misconfigured`] when a configuration problem can only be seen
//!   while parsing.
//!
//! Callers that only want data failures match on `Interrupt::Failure`; a
//! misconfigured parser can never be mistaken for bad input.

use std::fmt;
use std::sync::Arc;

use miette::{Diagnostic, Report};
use thiserror::Error;

use crate::stringify::{render_template, Replacers};
use crate::subject::Subject;

/// A wrapped native failure that caused a parse error.
pub type SourceError = Arc<dyn std::error::Error + Send + Sync + 'static>;

// ============================================================================
// PARSE ERROR RECORD
// ============================================================================

/// One violation, attached to the subject where it occurred.
///
/// Aggregate failures list their causes in `source_errors`; the vector type
/// guarantees every cause is itself a `ParseError`.
#[derive(Clone)]
pub struct ParseError {
    subject: Subject,
    message: String,
    source_error: Option<SourceError>,
    source_errors: Vec<ParseError>,
}

impl ParseError {
    pub fn new(subject: Subject, message: impl Into<String>) -> Self {
        Self {
            subject,
            message: message.into(),
            source_error: None,
            source_errors: Vec::new(),
        }
    }

    /// Renders `template` with `replacers` plus implicit `value` and `subject`
    /// bindings (both the subject's value). Explicit replacers win.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use assay::{ParseError, Replacers, Subject};
    /// let subject = Subject::new(5);
    /// let error = ParseError::using_template(
    ///     subject,
    ///     "{value} is not {what}",
    ///     &Replacers::from([("what".to_string(), "even".into())]),
    ///     None,
    ///     Vec::new(),
    /// );
    /// assert_eq!(error.message(), "5 is not even");
    /// ```
    pub fn using_template(
        subject: Subject,
        template: &str,
        replacers: &Replacers,
        source_error: Option<SourceError>,
        source_errors: Vec<ParseError>,
    ) -> Self {
        let mut bindings = replacers.clone();
        bindings
            .entry("value".to_string())
            .or_insert_with(|| subject.value().clone());
        bindings
            .entry("subject".to_string())
            .or_insert_with(|| subject.value().clone());
        let message = render_template(template, &bindings);
        Self {
            subject,
            message,
            source_error,
            source_errors,
        }
    }

    pub fn with_source_error<E>(mut self, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source_error = Some(Arc::new(error));
        self
    }

    pub fn with_source_errors<I>(mut self, errors: I) -> Self
    where
        I: IntoIterator<Item = ParseError>,
    {
        self.source_errors.extend(errors);
        self
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&SourceError> {
        self.source_error.as_ref()
    }

    pub fn source_errors(&self) -> &[ParseError] {
        &self.source_errors
    }

    pub fn value_path(&self) -> String {
        self.subject.value_path()
    }

    pub fn full_path(&self) -> String {
        self.subject.full_path()
    }

    pub fn into_failure(self) -> ParseFailure {
        ParseFailure(self)
    }

    /// Throws this error: always `Err(Interrupt::Failure(..))`.
    pub fn throw<T>(self) -> Result<T, Interrupt> {
        Err(Interrupt::Failure(self.into_failure()))
    }
}

impl PartialEq for ParseError {
    fn eq(&self, other: &Self) -> bool {
        let same_cause = match (&self.source_error, &other.source_error) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        self.subject == other.subject
            && self.message == other.message
            && same_cause
            && self.source_errors == other.source_errors
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.value_path(), self.message)
    }
}

impl fmt::Debug for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseError")
            .field("path", &self.full_path())
            .field("message", &self.message)
            .field("source_error", &self.source_error.as_ref().map(|e| e.to_string()))
            .field("source_errors", &self.source_errors)
            .finish()
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source_error
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl Diagnostic for ParseError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("assay::parse::failure"))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("full path: {}", self.full_path())))
    }

    fn related<'a>(&'a self) -> Option<Box<dyn Iterator<Item = &'a dyn Diagnostic> + 'a>> {
        if self.source_errors.is_empty() {
            return None;
        }
        Some(Box::new(
            self.source_errors.iter().map(|e| e as &dyn Diagnostic),
        ))
    }
}

// ============================================================================
// PROPAGATING FAILURES
// ============================================================================

/// A parse error raised in throw mode. Always carries exactly one error.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
#[error(transparent)]
#[diagnostic(transparent)]
pub struct ParseFailure(pub ParseError);

impl ParseFailure {
    pub fn error(&self) -> &ParseError {
        &self.0
    }

    pub fn into_error(self) -> ParseError {
        self.0
    }
}

/// Eager configuration mistakes, detected while building a parser.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ConfigError {
    #[error("Configuration error: minimum {min} is greater than maximum {max}")]
    #[diagnostic(code(assay::config::invalid_bounds))]
    InvalidBounds { min: i64, max: i64 },

    #[error("Configuration error: no parser named '{name}' is registered")]
    #[diagnostic(
        code(assay::config::unknown_parser),
        help("register the parser before referencing it")
    )]
    UnknownParser { name: String },

    #[error("Configuration error: a parser named '{name}' is already registered")]
    #[diagnostic(code(assay::config::duplicate_parser))]
    DuplicateParser { name: String },

    #[error("Configuration error: {parser} needs at least one option")]
    #[diagnostic(code(assay::config::no_options))]
    NoOptions { parser: &'static str },

    #[error("Configuration error: could not decode {format} input: {message}")]
    #[diagnostic(code(assay::config::decode))]
    Decode { format: &'static str, message: String },
}

/// Configuration mistakes only visible while a parse is underway.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum RuntimeConfigError {
    #[error("Runtime configuration error: parser '{name}' is no longer registered")]
    #[diagnostic(code(assay::runtime::missing_parser))]
    MissingParser { name: String },

    #[error(
        "Runtime configuration error: value of a failed result at '{path}' was read ({errors} error(s))"
    )]
    #[diagnostic(
        code(assay::runtime::failed_result_value),
        help("check `is_success()` before reading the value")
    )]
    ValueOfFailedResult { path: String, errors: usize },
}

/// Everything that can abort a parse.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum Interrupt {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Failure(#[from] ParseFailure),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Misconfigured(#[from] RuntimeConfigError),
}

/// Coarse classification for assertions and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureCategory {
    /// The input did not satisfy a parser.
    Data,
    /// A parser was built or used incorrectly.
    Configuration,
}

impl Interrupt {
    pub fn category(&self) -> FailureCategory {
        match self {
            Interrupt::Failure(_) => FailureCategory::Data,
            Interrupt::Misconfigured(_) => FailureCategory::Configuration,
        }
    }

    /// The thrown parse error, if this is a data failure.
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            Interrupt::Failure(failure) => Some(failure.error()),
            Interrupt::Misconfigured(_) => None,
        }
    }
}

impl From<ParseError> for Interrupt {
    fn from(error: ParseError) -> Self {
        Interrupt::Failure(ParseFailure(error))
    }
}

// ============================================================================
// ERROR FORMATTING UTILITIES
// ============================================================================

/// Renders any failure through a `miette` report, for terminal output.
pub fn render_failure<E>(failure: E) -> String
where
    E: Diagnostic + Send + Sync + 'static,
{
    format!("{:?}", Report::new(failure))
}

/// Prints a failure with full diagnostics to stderr.
pub fn print_failure<E>(failure: E)
where
    E: Diagnostic + Send + Sync + 'static,
{
    eprintln!("{}", render_failure(failure));
}
