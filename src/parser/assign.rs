//! Pass-through parsers that copy the incoming value into an external target.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::Interrupt;
use crate::parser::Parser;
use crate::result::ParseResult;
use crate::subject::Subject;
use crate::value::Value;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A shared single-value target. Clones share the slot.
#[derive(Debug, Clone, Default)]
pub struct Slot(Arc<Mutex<Option<Value>>>);

impl Slot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, value: Value) {
        *lock(&self.0) = Some(value);
    }

    pub fn get(&self) -> Option<Value> {
        lock(&self.0).clone()
    }

    pub fn take(&self) -> Option<Value> {
        lock(&self.0).take()
    }

    pub fn is_set(&self) -> bool {
        lock(&self.0).is_some()
    }
}

/// A shared append-only list target. Clones share the list.
#[derive(Debug, Clone, Default)]
pub struct Collector(Arc<Mutex<Vec<Value>>>);

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, value: Value) {
        lock(&self.0).push(value);
    }

    pub fn values(&self) -> Vec<Value> {
        lock(&self.0).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.0).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.0).is_empty()
    }
}

pub struct AssignTo {
    slot: Slot,
}

impl AssignTo {
    pub fn new(slot: &Slot) -> Self {
        Self { slot: slot.clone() }
    }
}

impl Parser for AssignTo {
    fn parse(&self, subject: &Subject) -> Result<ParseResult, Interrupt> {
        let builder = subject.result_builder(self.description());
        self.slot.set(builder.value().clone());
        Ok(builder.create_result_unchanged())
    }

    fn description(&self) -> String {
        "assign".into()
    }
}

pub struct AppendTo {
    collector: Collector,
}

impl AppendTo {
    pub fn new(collector: &Collector) -> Self {
        Self {
            collector: collector.clone(),
        }
    }
}

impl Parser for AppendTo {
    fn parse(&self, subject: &Subject) -> Result<ParseResult, Interrupt> {
        let builder = subject.result_builder(self.description());
        self.collector.push(builder.value().clone());
        Ok(builder.create_result_unchanged())
    }

    fn description(&self) -> String {
        "append".into()
    }
}
