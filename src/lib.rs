//! # Assay
//!
//! Validation and transformation of untyped values with exact error locations.
//!
//! Every parse walks a chain of immutable [`Subject`] nodes. Each node records one
//! step (a list element, a map key, an object property, a parser boundary), so any
//! error can report both where the offending value lived in the input and what
//! the engine did to reach it.
//!
//! ## Module Structure
//!
//! - **`value`**: the untyped [`Value`] model and serde interop
//! - **`subject`**: the chain nodes and path rendering
//! - **`memory`**: run-scoped storage shared along one chain
//! - **`builder`** / **`result`**: the per-invocation [`ResultBuilder`] and its
//!   immutable [`ParseResult`]
//! - **`error`**: data failures, configuration errors, `miette` reporting
//! - **`stringify`**: message templating and value rendering
//! - **`options`**: root configuration
//! - **`parser`**: the [`Parser`] contract and composition
//! - **`parsers`**: ready-made consumer parsers
//!
//! # Examples
//!
//! ```rust
//! use assay::parsers::{EachElement, IntRange};
//! use assay::{Parser, Value};
//!
//! let scores = EachElement::new(IntRange::new(0, 10).unwrap());
//! let result = scores.validate(Value::list([3, 11, -1])).unwrap();
//! assert_eq!(
//!     result.error_messages(),
//!     vec![
//!         "Array[1]: 11 is not between 0 and 10".to_string(),
//!         "Array[2]: -1 is not between 0 and 10".to_string(),
//!     ]
//! );
//! ```

pub mod builder;
pub mod error;
pub mod memory;
pub mod options;
pub mod parser;
pub mod parsers;
pub mod result;
pub mod stringify;
pub mod subject;
pub mod value;

pub use builder::ResultBuilder;
pub use error::{
    print_failure, render_failure, ConfigError, FailureCategory, Interrupt, ParseError,
    ParseFailure, RuntimeConfigError, SourceError,
};
pub use memory::{Memory, MemoryKey};
pub use options::ParseOptions;
pub use parser::{
    AppendTo, AssignTo, BoxedParser, Chain, Chainable, Collector, FnParser, Fork, OneOf, Parser,
    Slot,
};
pub use result::ParseResult;
pub use stringify::{render_template, Replacers};
pub use subject::{Subject, SubjectKind, ThrowMode};
pub use value::{Key, Object, Value, ValueKind};
