//! Named parsers and late-bound references.
//!
//! A registry lets recursive or shared shapes be declared once by name. A
//! [`Reference`] resolves its name on every parse, so a shape may refer to
//! itself or to one registered later. Resolution failures during a parse are
//! runtime configuration errors, never data errors.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use log::{debug, warn};

use crate::error::{ConfigError, Interrupt, RuntimeConfigError};
use crate::parser::Parser;
use crate::result::ParseResult;
use crate::subject::Subject;

/// A registered parser.
pub type SharedParser = Arc<dyn Parser + Send + Sync>;

type Entries = BTreeMap<String, SharedParser>;

// ============================================================================
// REGISTRY
// ============================================================================

/// Shared name-to-parser table. Cloning the handle shares the table.
#[derive(Clone, Default)]
pub struct ParserRegistry {
    parsers: Arc<Mutex<Entries>>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, Entries> {
        lock(&self.parsers)
    }

    /// Registers `parser` under `name`. Names are never silently replaced.
    pub fn register<P>(&self, name: &str, parser: P) -> Result<(), ConfigError>
    where
        P: Parser + Send + Sync + 'static,
    {
        let mut entries = self.entries();
        if entries.contains_key(name) {
            return Err(ConfigError::DuplicateParser {
                name: name.to_string(),
            });
        }
        debug!("registry: registered '{}'", name);
        entries.insert(name.to_string(), Arc::new(parser));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<SharedParser> {
        self.entries().get(name).cloned()
    }

    pub fn list(&self) -> Vec<String> {
        self.entries().keys().cloned().collect()
    }

    pub fn remove(&self, name: &str) -> Option<SharedParser> {
        self.entries().remove(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// A reference to a name that must already be registered.
    pub fn reference(&self, name: &str) -> Result<Reference, ConfigError> {
        Reference::to(self, name)
    }
}

fn lock(parsers: &Mutex<Entries>) -> MutexGuard<'_, Entries> {
    parsers.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ============================================================================
// REFERENCE
// ============================================================================

/// Delegates to a registered parser, looked up at parse time.
///
/// The reference does not keep the registry alive; a parser that refers to
/// itself through its own registry would otherwise never be freed.
///
/// # Examples
///
/// ```rust
/// use assay::parsers::{EachElement, Expect, ParserRegistry, Reference};
/// use assay::{BoxedParser, OneOf, Parser, Value, ValueKind};
///
/// let registry = ParserRegistry::new();
/// registry.register("leaf", Expect::kind(ValueKind::Int)).unwrap();
/// // Declared before "tree" exists, so it is bound lazily.
/// let tree = Reference::lazy(&registry, "tree");
/// let options: Vec<BoxedParser> = vec![
///     Box::new(Reference::to(&registry, "leaf").unwrap()),
///     Box::new(EachElement::new(tree)),
/// ];
/// let node = OneOf::new(options).unwrap();
/// registry.register("tree", node).unwrap();
///
/// let input = Value::list([Value::from(1), Value::list([2, 3])]);
/// let tree = registry.get("tree").unwrap();
/// assert!(tree.validate(input).unwrap().is_success());
/// ```
#[derive(Clone)]
pub struct Reference {
    name: String,
    registry: Weak<Mutex<Entries>>,
}

impl Reference {
    /// Fails eagerly when `name` is not registered yet.
    pub fn to(registry: &ParserRegistry, name: &str) -> Result<Self, ConfigError> {
        if !registry.has(name) {
            return Err(ConfigError::UnknownParser {
                name: name.to_string(),
            });
        }
        Ok(Self::lazy(registry, name))
    }

    /// Binds `name` without checking it, for recursive definitions.
    pub fn lazy(registry: &ParserRegistry, name: &str) -> Self {
        Self {
            name: name.to_string(),
            registry: Arc::downgrade(&registry.parsers),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self) -> Result<SharedParser, RuntimeConfigError> {
        let missing = || RuntimeConfigError::MissingParser {
            name: self.name.clone(),
        };
        let parsers = self.registry.upgrade().ok_or_else(missing)?;
        let parser = lock(&parsers).get(&self.name).cloned();
        parser.ok_or_else(|| {
            warn!("registry: '{}' is no longer registered", self.name);
            missing()
        })
    }
}

impl Parser for Reference {
    fn parse(&self, subject: &Subject) -> Result<ParseResult, Interrupt> {
        let parser = self.resolve()?;
        let builder = subject.result_builder(self.description());
        let result = builder.forward(&parser, self.name.clone())?;
        builder.create_result_from_result(result)
    }

    fn description(&self) -> String {
        format!("ref {}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureCategory;
    use crate::parsers::Trim;
    use crate::value::Value;

    #[test]
    fn duplicate_names_are_rejected() {
        let registry = ParserRegistry::new();
        registry.register("trim", Trim).unwrap();
        assert_eq!(
            registry.register("trim", Trim).unwrap_err(),
            ConfigError::DuplicateParser {
                name: "trim".into()
            }
        );
        assert_eq!(registry.list(), vec!["trim".to_string()]);
    }

    #[test]
    fn unknown_names_fail_eagerly() {
        let registry = ParserRegistry::new();
        assert!(matches!(
            Reference::to(&registry, "nope"),
            Err(ConfigError::UnknownParser { .. })
        ));
    }

    #[test]
    fn removed_parser_is_a_runtime_configuration_error() {
        let registry = ParserRegistry::new();
        registry.register("trim", Trim).unwrap();
        let reference = registry.reference("trim").unwrap();
        assert_eq!(reference.parse_value(Value::from(" a ")).unwrap(), Value::from("a"));

        registry.remove("trim");
        let interrupt = reference.validate(Value::from(" a ")).unwrap_err();
        assert_eq!(interrupt.category(), FailureCategory::Configuration);
        assert_eq!(
            interrupt,
            Interrupt::Misconfigured(RuntimeConfigError::MissingParser {
                name: "trim".into()
            })
        );
    }

    #[test]
    fn dropped_registry_is_a_runtime_configuration_error() {
        let registry = ParserRegistry::new();
        registry.register("trim", Trim).unwrap();
        let reference = registry.reference("trim").unwrap();
        drop(registry);
        assert!(matches!(
            reference.validate(Value::from("a")),
            Err(Interrupt::Misconfigured(_))
        ));
    }
}
