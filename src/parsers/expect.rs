use crate::error::{ConfigError, Interrupt};
use crate::parser::Parser;
use crate::result::ParseResult;
use crate::stringify::Replacers;
use crate::subject::Subject;
use crate::value::ValueKind;

/// Asserts the value has one of the accepted kinds. The value passes through.
#[derive(Debug, Clone)]
pub struct Expect {
    kinds: Vec<ValueKind>,
}

impl Expect {
    pub fn kind(kind: ValueKind) -> Self {
        Self { kinds: vec![kind] }
    }

    pub fn any_of<I>(kinds: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = ValueKind>,
    {
        let kinds: Vec<ValueKind> = kinds.into_iter().collect();
        if kinds.is_empty() {
            return Err(ConfigError::NoOptions { parser: "Expect" });
        }
        Ok(Self { kinds })
    }

    fn expected(&self) -> String {
        let names: Vec<&str> = self.kinds.iter().map(ValueKind::as_str).collect();
        names.join(" or ")
    }
}

impl Parser for Expect {
    fn parse(&self, subject: &Subject) -> Result<ParseResult, Interrupt> {
        let mut builder = subject.result_builder(self.description());
        if !self.kinds.contains(&builder.value().kind()) {
            let replacers = Replacers::from([("expected".to_string(), self.expected().into())]);
            builder.log_error_template("expected {expected}, got {value.type}", &replacers)?;
        }
        Ok(builder.create_result_unchanged())
    }

    fn description(&self) -> String {
        format!("expect {}", self.expected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn accepts_listed_kinds() {
        let parser = Expect::any_of([ValueKind::Int, ValueKind::String]).unwrap();
        assert_eq!(parser.parse_value(Value::from("a")).unwrap(), Value::from("a"));
        assert_eq!(parser.parse_value(Value::from(1)).unwrap(), Value::from(1));
    }

    #[test]
    fn mismatch_message_uses_type_rendering() {
        let parser = Expect::kind(ValueKind::Int);
        let result = parser.validate(Value::Float(f64::NAN)).unwrap();
        assert_eq!(result.error_messages(), vec!["Float: expected int, got NAN".to_string()]);
    }

    #[test]
    fn empty_kind_list_is_a_config_error() {
        assert_eq!(
            Expect::any_of([]).unwrap_err(),
            ConfigError::NoOptions { parser: "Expect" }
        );
    }
}
