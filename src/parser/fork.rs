use crate::error::{ConfigError, Interrupt};
use crate::parser::{BoxedParser, Parser};
use crate::result::ParseResult;
use crate::subject::Subject;
use crate::value::Value;

/// Hands the same value to every branch; all must succeed.
///
/// Branches run in order against forwarded copies of the subject. In collect mode
/// every branch runs and all branch errors are reported in branch order. The
/// output is the list of branch outputs.
pub struct Fork {
    branches: Vec<BoxedParser>,
}

impl Fork {
    pub fn new(branches: Vec<BoxedParser>) -> Result<Self, ConfigError> {
        if branches.is_empty() {
            return Err(ConfigError::NoOptions { parser: "Fork" });
        }
        Ok(Self { branches })
    }
}

impl Parser for Fork {
    fn parse(&self, subject: &Subject) -> Result<ParseResult, Interrupt> {
        let mut builder = subject.result_builder(self.description());
        let mut outputs = Vec::with_capacity(self.branches.len());
        for (index, branch) in self.branches.iter().enumerate() {
            let result = builder.forward(branch, format!("branch {}", index + 1))?;
            outputs.push(builder.unwrap_result(result, Value::Null)?);
        }
        Ok(builder.create_result(Value::List(outputs.into_iter().collect())))
    }

    fn description(&self) -> String {
        "fork".into()
    }
}
