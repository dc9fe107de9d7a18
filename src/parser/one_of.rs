use crate::error::{ConfigError, Interrupt, ParseError};
use crate::parser::{BoxedParser, Parser};
use crate::result::ParseResult;
use crate::stringify::Replacers;
use crate::subject::{Subject, SubjectKind, ThrowMode};

/// Tries each option against the same subject; the first success wins.
///
/// Options run as side validations, so a failing option never aborts the parse
/// even in throw mode. When every option fails, a single aggregate error lists
/// each option's first error as a cause.
pub struct OneOf {
    options: Vec<BoxedParser>,
}

impl OneOf {
    pub fn new(options: Vec<BoxedParser>) -> Result<Self, ConfigError> {
        if options.is_empty() {
            return Err(ConfigError::NoOptions { parser: "OneOf" });
        }
        Ok(Self { options })
    }
}

impl Parser for OneOf {
    fn parse(&self, subject: &Subject) -> Result<ParseResult, Interrupt> {
        let mut builder = subject.result_builder(self.description());
        let mut causes = Vec::with_capacity(self.options.len());
        for (index, option) in self.options.iter().enumerate() {
            let attempt = builder.test(option, format!("option {}", index + 1))?;
            if attempt.is_success() {
                return builder.create_result_from_result(attempt);
            }
            causes.extend(attempt.first_error().cloned());
        }

        let unmatched = builder.current_subject().extend_with(
            SubjectKind::MetaInformation("none of the options matched".into()),
            builder.value().clone(),
            false,
            ThrowMode::Inherit,
        );
        let replacers = Replacers::from([("count".to_string(), self.options.len().into())]);
        builder.log_error(ParseError::using_template(
            unmatched,
            "{value.debug} does not match any of the {count} options",
            &replacers,
            None,
            causes,
        ))?;
        Ok(builder.create_result_unchanged())
    }

    fn description(&self) -> String {
        let options: Vec<String> = self.options.iter().map(|o| o.description()).collect();
        format!("one of ({})", options.join(" | "))
    }
}
