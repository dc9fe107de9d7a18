//! Chain, Fork, OneOf, assignment and registry references working together.

use assay::parsers::{Expect, IntRange, ParserRegistry, Reference, Trim};
use assay::{
    BoxedParser, Chainable, Collector, ConfigError, FailureCategory, Fork, Interrupt, OneOf,
    Parser, RuntimeConfigError, Slot, Value, ValueKind,
};

fn int_or_string() -> OneOf {
    let options: Vec<BoxedParser> = vec![
        Box::new(Expect::kind(ValueKind::Int)),
        Box::new(Expect::kind(ValueKind::String)),
    ];
    OneOf::new(options).unwrap()
}

#[cfg(test)]
mod chain_tests {
    use super::*;

    #[test]
    fn second_parser_sees_the_first_output() {
        let parser = Expect::kind(ValueKind::String).then(Trim);
        assert_eq!(parser.parse_value(Value::from(" x ")).unwrap(), Value::from("x"));
    }

    #[test]
    fn failed_first_parser_short_circuits() {
        let name = Slot::new();
        let parser = Expect::kind(ValueKind::String).then(Trim).then_assign_to(&name);
        let result = parser.validate(Value::from(3)).unwrap();
        assert_eq!(result.error_messages(), vec!["Int: expected string, got int"]);
        assert!(!name.is_set());
    }

    #[test]
    fn throw_mode_surfaces_the_first_failure() {
        let parser = IntRange::new(0, 5).unwrap().then(Trim);
        let interrupt = parser.parse_value(Value::from(9)).unwrap_err();
        assert_eq!(
            interrupt.parse_error().map(|e| e.to_string()),
            Some("Int: 9 is not between 0 and 5".to_string())
        );
    }

    #[test]
    fn append_collects_every_success() {
        let seen = Collector::new();
        let parser = Trim.then_append_to(&seen);
        for input in ["a ", " b"] {
            parser.parse_value(Value::from(input)).unwrap();
        }
        assert_eq!(seen.values(), vec![Value::from("a"), Value::from("b")]);
    }
}

#[cfg(test)]
mod one_of_tests {
    use super::*;

    #[test]
    fn first_matching_option_wins() {
        assert_eq!(int_or_string().parse_value(Value::from("s")).unwrap(), Value::from("s"));
    }

    #[test]
    fn failing_options_do_not_abort_in_throw_mode() {
        // The first option fails while a later one matches.
        assert!(int_or_string().parse_value(Value::from("s")).is_ok());
    }

    #[test_log::test]
    fn no_match_reports_one_aggregate_error_with_causes() {
        let result = int_or_string().validate(Value::Bool(true)).unwrap();
        assert_eq!(result.errors().len(), 1);
        let error = &result.errors()[0];
        assert_eq!(error.message(), "true does not match any of the 2 options");
        assert_eq!(error.value_path(), "Bool");
        let causes: Vec<&str> = error.source_errors().iter().map(|e| e.message()).collect();
        assert_eq!(causes, vec!["expected int, got true", "expected string, got true"]);
    }

    #[test]
    fn empty_option_list_is_rejected_eagerly() {
        assert!(matches!(
            OneOf::new(Vec::new()),
            Err(ConfigError::NoOptions { parser: "OneOf" })
        ));
    }
}

#[cfg(test)]
mod fork_tests {
    use super::*;

    fn fork() -> Fork {
        let branches: Vec<BoxedParser> = vec![
            Box::new(IntRange::new(0, 10).unwrap()),
            Box::new(IntRange::new(5, 20).unwrap()),
        ];
        Fork::new(branches).unwrap()
    }

    #[test]
    fn every_branch_must_succeed() {
        assert_eq!(
            fork().parse_value(Value::from(7)).unwrap(),
            Value::list([7, 7])
        );
    }

    #[test]
    fn collect_mode_reports_each_failing_branch() {
        let result = fork().validate(Value::from(30)).unwrap();
        assert_eq!(
            result.error_messages(),
            vec![
                "Int: 30 is not between 0 and 10",
                "Int: 30 is not between 5 and 20"
            ]
        );
        assert_eq!(result.errors()[1].full_path(), "Int ▷fork ⇒branch 2⇒ ▷int 5..=20");
    }
}

#[cfg(test)]
mod reference_tests {
    use super::*;

    #[test]
    fn reference_delegates_to_the_registered_parser() {
        let registry = ParserRegistry::new();
        registry.register("small", IntRange::new(0, 3).unwrap()).unwrap();
        let small = Reference::to(&registry, "small").unwrap();
        assert_eq!(small.parse_value(Value::from(2)).unwrap(), Value::from(2));
        let result = small.validate(Value::from(4)).unwrap();
        assert_eq!(result.error_messages(), vec!["Int: 4 is not between 0 and 3"]);
    }

    #[test]
    fn missing_parser_is_not_a_data_failure() {
        let registry = ParserRegistry::new();
        let dangling = Reference::lazy(&registry, "later");
        let interrupt = dangling.parse_value(Value::Null).unwrap_err();
        assert_eq!(interrupt.category(), FailureCategory::Configuration);
        assert_eq!(
            interrupt,
            Interrupt::Misconfigured(RuntimeConfigError::MissingParser {
                name: "later".into()
            })
        );
    }

    #[test]
    fn inverted_bounds_are_a_construction_error() {
        assert_eq!(
            IntRange::new(3, 1).unwrap_err(),
            ConfigError::InvalidBounds { min: 3, max: 1 }
        );
    }
}
