use crate::error::Interrupt;
use crate::parser::assign::{AppendTo, AssignTo, Collector, Slot};
use crate::parser::Parser;
use crate::result::ParseResult;
use crate::subject::Subject;

/// Runs `second` on the successful result of `first`.
pub struct Chain<A, B> {
    first: A,
    second: B,
}

impl<A: Parser, B: Parser> Chain<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: Parser, B: Parser> Parser for Chain<A, B> {
    fn parse(&self, subject: &Subject) -> Result<ParseResult, Interrupt> {
        // Glue only: an empty description keeps the begin/end nodes invisible.
        let builder = subject.result_builder("");
        let first = self.first.parse(builder.current_subject())?;
        if !first.is_success() {
            return builder.create_result_from_result(first);
        }
        let second = self.second.parse(first.subject())?;
        builder.create_result_from_result(second)
    }

    fn description(&self) -> String {
        format!("{}, then {}", self.first.description(), self.second.description())
    }
}

/// Fluent composition for every parser.
///
/// # Examples
///
/// ```rust
/// use assay::parsers::{Expect, Trim};
/// use assay::{Chainable, Parser, Slot, Value, ValueKind};
/// let name = Slot::new();
/// let parser = Expect::kind(ValueKind::String).then(Trim).then_assign_to(&name);
/// parser.parse_value(Value::from("  Ada ")).unwrap();
/// assert_eq!(name.get(), Some(Value::from("Ada")));
/// ```
pub trait Chainable: Parser + Sized {
    fn then<N: Parser>(self, next: N) -> Chain<Self, N> {
        Chain::new(self, next)
    }

    fn then_assign_to(self, slot: &Slot) -> Chain<Self, AssignTo> {
        self.then(AssignTo::new(slot))
    }

    fn then_append_to(self, collector: &Collector) -> Chain<Self, AppendTo> {
        self.then(AppendTo::new(collector))
    }
}

impl<P: Parser> Chainable for P {}
