use im::OrdMap;

use crate::error::Interrupt;
use crate::memory::MemoryKey;
use crate::parser::Parser;
use crate::result::ParseResult;
use crate::stringify::Replacers;
use crate::subject::Subject;
use crate::value::Value;

/// Rejects values already seen by this parser during the same parse run.
///
/// Seen values live in the run's memory under the parser's own key, so two
/// `Unique` instances never interfere and a fresh root starts empty.
///
/// Floats compare by bit pattern: a repeated `NAN` is a duplicate, while `0.0`
/// and `-0.0` are distinct.
///
/// # Examples
///
/// ```rust
/// use assay::parsers::{EachElement, Unique};
/// use assay::{Parser, Value};
/// let ids = EachElement::new(Unique::new());
/// let result = ids.validate(Value::list([1, 2, 1])).unwrap();
/// assert_eq!(result.error_messages(), vec!["Array[2]: 1 was already used".to_string()]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Unique {
    key: MemoryKey,
}

impl Unique {
    pub fn new() -> Self {
        Self {
            key: MemoryKey::new(),
        }
    }
}

impl Default for Unique {
    fn default() -> Self {
        Self::new()
    }
}

fn identical(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Float(x), Value::Float(y)) => x.to_bits() == y.to_bits(),
        (Value::List(xs), Value::List(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys.iter()).all(|(x, y)| identical(x, y))
        }
        (Value::Map(xs), Value::Map(ys)) => same_entries(xs, ys),
        (Value::Object(x), Value::Object(y)) => {
            x.class_name == y.class_name && same_entries(&x.properties, &y.properties)
        }
        _ => a == b,
    }
}

fn same_entries(xs: &OrdMap<String, Value>, ys: &OrdMap<String, Value>) -> bool {
    xs.len() == ys.len()
        && xs
            .iter()
            .zip(ys.iter())
            .all(|((kx, x), (ky, y))| kx == ky && identical(x, y))
}

impl Parser for Unique {
    fn parse(&self, subject: &Subject) -> Result<ParseResult, Interrupt> {
        let mut builder = subject.result_builder(self.description());
        let mut seen: Vec<Value> = builder.get_memory(self.key, Vec::new());
        if seen.iter().any(|earlier| identical(earlier, builder.value())) {
            builder.log_error_template("{value.export} was already used", &Replacers::new())?;
        } else {
            seen.push(builder.value().clone());
            builder.set_memory(self.key, seen);
        }
        Ok(builder.create_result_unchanged())
    }

    fn description(&self) -> String {
        "unique".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::EachElement;

    #[test]
    fn repeated_nan_is_a_duplicate() {
        let parser = EachElement::new(Unique::new());
        let result = parser
            .validate(Value::list([Value::Float(f64::NAN), Value::Float(f64::NAN)]))
            .unwrap();
        assert_eq!(result.error_messages(), vec!["Array[1]: NAN was already used".to_string()]);
    }

    #[test]
    fn nested_nan_and_signed_zero() {
        let nested = || Value::list([Value::Float(f64::NAN)]);
        assert!(identical(&nested(), &nested()));
        assert!(!identical(&Value::Float(0.0), &Value::Float(-0.0)));
        assert!(!identical(&Value::from(1), &Value::Float(1.0)));
    }
}
