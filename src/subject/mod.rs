//! # Subject Chain
//!
//! A subject is one immutable node of a backward-linked chain. Every narrowing
//! step (list element, map key, object property, ...) and every internal
//! bookkeeping step (parser begin, value rewrite, forwarding) appends exactly one
//! node pointing at the existing tail. Nodes are shared, never copied, so several
//! parse attempts can branch from the same source cheaply.
//!
//! Two path views come from one chain:
//!
//! - the **value path** skips utility nodes and answers "where did this value live
//!   in the original input" (`Array[0].name`),
//! - the **full path** keeps every node and shows what the engine did
//!   (`Array ▷list[0] ▷record.name`).

mod kind;

pub use kind::{SubjectKind, ThrowMode};

use std::fmt;
use std::sync::Arc;

use log::trace;

use crate::builder::ResultBuilder;
use crate::memory::Memory;
use crate::value::{Key, Value};

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

struct Node {
    value: Value,
    kind: SubjectKind,
    source: Option<Subject>,
    is_utility: bool,
    throw_mode: ThrowMode,
    memory: Memory,
}

/// Shared handle to a node of the chain.
///
/// Equality is identity: two handles are equal only if they point at the same
/// node.
#[derive(Clone)]
pub struct Subject(Arc<Node>);

// ============================================================================
// CONSTRUCTION
// ============================================================================

impl Subject {
    /// Builds a throw-mode root whose description is the value's kind label.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use assay::{Subject, Value};
    /// let root = Subject::new(Value::list([1, 2]));
    /// assert!(root.throw_on_error());
    /// assert_eq!(root.value_path(), "Array");
    /// ```
    pub fn new(value: impl Into<Value>) -> Self {
        Self::new_root(value, true)
    }

    pub fn new_root(value: impl Into<Value>, throw_on_error: bool) -> Self {
        let value = value.into();
        let description = value.kind_label();
        Self::new_root_described(value, description, throw_on_error)
    }

    pub fn new_root_described(
        value: impl Into<Value>,
        description: impl Into<String>,
        throw_on_error: bool,
    ) -> Self {
        Subject(Arc::new(Node {
            value: value.into(),
            kind: SubjectKind::Root(description.into()),
            source: None,
            is_utility: false,
            throw_mode: ThrowMode::from_flag(throw_on_error),
            memory: Memory::new(),
        }))
    }

    /// Appends a node using the kind's utility and throw-mode defaults.
    pub fn extend(&self, kind: SubjectKind, value: impl Into<Value>) -> Subject {
        let in_value_path = !kind.is_utility_by_default();
        let mode = kind.default_throw_mode();
        self.extend_with(kind, value, in_value_path, mode)
    }

    /// Appends a node with explicit path visibility and throw mode.
    pub fn extend_with(
        &self,
        kind: SubjectKind,
        value: impl Into<Value>,
        in_value_path: bool,
        throw_mode: ThrowMode,
    ) -> Subject {
        trace!("subject: {} + {:?}", self.full_path(), kind);
        Subject(Arc::new(Node {
            value: value.into(),
            kind,
            source: Some(self.clone()),
            is_utility: !in_value_path,
            throw_mode,
            memory: self.0.memory.clone(),
        }))
    }

    pub fn array_value(&self, key: impl Into<Key>, value: impl Into<Value>) -> Subject {
        self.extend(SubjectKind::ArrayValue(key.into()), value)
    }

    /// The key itself becomes the node's value.
    pub fn array_key(&self, key: impl Into<Key>) -> Subject {
        let key = key.into();
        let value = key.to_value();
        self.extend(SubjectKind::ArrayKey(key), value)
    }

    /// The node's value is the two-element list `[key, value]`.
    pub fn array_key_value_pair(&self, key: impl Into<Key>, value: impl Into<Value>) -> Subject {
        let key = key.into();
        let pair = Value::list([key.to_value(), value.into()]);
        self.extend(SubjectKind::ArrayKeyValuePair(key), pair)
    }

    pub fn property_value(&self, name: impl Into<String>, value: impl Into<Value>) -> Subject {
        self.extend(SubjectKind::PropertyValue(name.into()), value)
    }

    /// The property name itself becomes the node's value.
    pub fn property_name(&self, name: impl Into<String>) -> Subject {
        let name = name.into();
        self.extend(SubjectKind::PropertyName(name.clone()), name)
    }

    pub fn property_name_value_pair(
        &self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Subject {
        let name = name.into();
        let pair = Value::list([Value::from(name.clone()), value.into()]);
        self.extend(SubjectKind::PropertyNameValuePair(name), pair)
    }

    pub fn meta(&self, description: impl Into<String>, value: impl Into<Value>) -> Subject {
        self.extend(SubjectKind::MetaInformation(description.into()), value)
    }

    /// Passes this subject's value on unchanged.
    pub fn forwarded(&self, description: impl Into<String>) -> Subject {
        self.extend(SubjectKind::Forwarded(description.into()), self.value().clone())
    }

    /// Hands this subject's value to a side validation running in collect mode.
    pub fn test(&self, description: impl Into<String>) -> Subject {
        self.extend(SubjectKind::Test(description.into()), self.value().clone())
    }

    /// The sole entry point for parsing against this subject.
    pub fn result_builder(&self, description: impl Into<String>) -> ResultBuilder {
        ResultBuilder::new(self.clone(), description.into())
    }
}

// ============================================================================
// ACCESSORS
// ============================================================================

impl Subject {
    pub fn value(&self) -> &Value {
        &self.0.value
    }

    pub fn kind(&self) -> &SubjectKind {
        &self.0.kind
    }

    pub fn description(&self) -> String {
        self.0.kind.description()
    }

    pub fn source(&self) -> Option<&Subject> {
        self.0.source.as_ref()
    }

    pub fn is_utility(&self) -> bool {
        self.0.is_utility
    }

    /// The mode as declared on this node, possibly `Inherit`.
    pub fn throw_mode(&self) -> ThrowMode {
        self.0.throw_mode
    }

    /// Resolves the throw mode by walking to the nearest explicit ancestor.
    pub fn throw_on_error(&self) -> bool {
        let mut current = self;
        loop {
            if let Some(flag) = current.0.throw_mode.explicit() {
                return flag;
            }
            match current.source() {
                Some(source) => current = source,
                // Roots are always explicit; an inheriting head can only come from
                // a hand-built chain and defaults to throwing.
                None => return true,
            }
        }
    }

    /// The head of the chain.
    pub fn root(&self) -> &Subject {
        let mut current = self;
        while let Some(source) = current.source() {
            current = source;
        }
        current
    }

    pub fn is_root(&self) -> bool {
        self.0.source.is_none()
    }

    pub fn memory(&self) -> &Memory {
        &self.0.memory
    }

    pub fn ptr_eq(&self, other: &Subject) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Number of nodes from the root to this node, inclusive.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut current = self;
        while let Some(source) = current.source() {
            depth += 1;
            current = source;
        }
        depth
    }
}

// ============================================================================
// PATH RENDERING
// ============================================================================

impl Subject {
    /// Nodes from the root to this node; utility nodes only when requested.
    pub fn subject_chain(&self, include_utility: bool) -> Vec<Subject> {
        let mut chain = Vec::with_capacity(self.depth());
        let mut current = Some(self);
        while let Some(node) = current {
            if include_utility || !node.is_utility() {
                chain.push(node.clone());
            }
            current = node.source();
        }
        chain.reverse();
        chain
    }

    /// Concatenates the fragments of [`Subject::subject_chain`].
    pub fn path_as_string(&self, include_utility: bool) -> String {
        let chain = self.subject_chain(include_utility);
        let last = chain.len().saturating_sub(1);
        chain
            .iter()
            .enumerate()
            .map(|(i, node)| node.kind().fragment(i == last))
            .collect()
    }

    /// Path into the original input.
    pub fn value_path(&self) -> String {
        self.path_as_string(false)
    }

    /// Path including every internal step.
    pub fn full_path(&self) -> String {
        self.path_as_string(true)
    }
}

impl PartialEq for Subject {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Subject {}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value_path())
    }
}

impl fmt::Debug for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("path", &self.full_path())
            .field("value", self.value())
            .field("throw_mode", &self.throw_mode())
            .finish()
    }
}
