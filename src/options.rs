//! Root-subject configuration.
//!
//! Applications usually decide once, at the trust boundary, whether bad input
//! should abort on the first violation or be reported in full. `ParseOptions`
//! captures that decision and can be read from any serde format.

use serde::{Deserialize, Serialize};

use crate::subject::Subject;
use crate::value::Value;

/// # Examples
///
/// ```rust
/// use assay::ParseOptions;
/// let options: ParseOptions = serde_json::from_str(r#"{"throw_on_error": false}"#).unwrap();
/// assert!(!options.throw_on_error);
/// assert!(ParseOptions::default().throw_on_error);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Abort on the first violation (`true`) or collect every violation.
    pub throw_on_error: bool,
    /// Description of the root node; the value's kind label when absent.
    pub root_description: Option<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            throw_on_error: true,
            root_description: None,
        }
    }
}

impl ParseOptions {
    pub fn collecting() -> Self {
        Self {
            throw_on_error: false,
            ..Self::default()
        }
    }

    pub fn with_root_description(mut self, description: impl Into<String>) -> Self {
        self.root_description = Some(description.into());
        self
    }

    pub fn root_subject(&self, value: impl Into<Value>) -> Subject {
        match &self.root_description {
            Some(description) => {
                Subject::new_root_described(value, description.clone(), self.throw_on_error)
            }
            None => Subject::new_root(value, self.throw_on_error),
        }
    }
}
