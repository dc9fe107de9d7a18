use crate::error::{ConfigError, Interrupt};
use crate::parser::Parser;
use crate::parsers::expected_kind;
use crate::result::ParseResult;
use crate::stringify::Replacers;
use crate::subject::Subject;
use crate::value::ValueKind;

/// Accepts integers within `min..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntRange {
    min: i64,
    max: i64,
}

impl IntRange {
    pub fn new(min: i64, max: i64) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::InvalidBounds { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }
}

impl Parser for IntRange {
    fn parse(&self, subject: &Subject) -> Result<ParseResult, Interrupt> {
        let mut builder = subject.result_builder(self.description());
        match builder.value().as_int() {
            None => expected_kind(&mut builder, ValueKind::Int)?,
            Some(n) if n < self.min || n > self.max => {
                let replacers = Replacers::from([
                    ("min".to_string(), self.min.into()),
                    ("max".to_string(), self.max.into()),
                ]);
                builder.log_error_template("{value} is not between {min} and {max}", &replacers)?;
            }
            Some(_) => {}
        }
        Ok(builder.create_result_unchanged())
    }

    fn description(&self) -> String {
        format!("int {}..={}", self.min, self.max)
    }
}

/// Strips surrounding whitespace from strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Trim;

impl Parser for Trim {
    fn parse(&self, subject: &Subject) -> Result<ParseResult, Interrupt> {
        let mut builder = subject.result_builder(self.description());
        let Some(trimmed) = builder.value().as_str().map(|s| s.trim().to_string()) else {
            expected_kind(&mut builder, ValueKind::String)?;
            return Ok(builder.create_result_unchanged());
        };
        builder.set_value("trimmed", trimmed);
        Ok(builder.create_result_with_current_value())
    }

    fn description(&self) -> String {
        "trim".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn inverted_bounds_fail_at_construction() {
        assert_eq!(
            IntRange::new(5, 1).unwrap_err(),
            ConfigError::InvalidBounds { min: 5, max: 1 }
        );
    }

    #[test]
    fn bounds_are_inclusive() {
        let range = IntRange::new(1, 3).unwrap();
        assert_eq!(range.parse_value(Value::from(1)).unwrap(), Value::from(1));
        assert_eq!(range.parse_value(Value::from(3)).unwrap(), Value::from(3));
        let result = range.validate(Value::from(4)).unwrap();
        assert_eq!(result.error_messages(), vec!["Int: 4 is not between 1 and 3".to_string()]);
    }

    #[test]
    fn trim_records_the_rewrite_on_the_full_path() {
        let result = Trim.validate(Value::from("  hi ")).unwrap();
        assert_eq!(result.value().unwrap(), &Value::from("hi"));
        assert_eq!(result.subject().full_path(), "String ▷trim trimmed↩ ◁trim");
        assert_eq!(result.subject().value_path(), "String");
    }
}
