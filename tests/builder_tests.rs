//! Builder and result contract: success, finalizers, error modes, templating.

use assay::stringify::debug;
use assay::{
    FailureCategory, FnParser, Interrupt, MemoryKey, ParseError, Parser, Replacers,
    RuntimeConfigError, Subject, Value,
};

fn two_errors() -> FnParser {
    FnParser::new("two errors", |mut builder| {
        builder.log_error_template("e1", &Replacers::new())?;
        builder.log_error_template("e2", &Replacers::new())?;
        Ok(builder.create_result_unchanged())
    })
}

#[cfg(test)]
mod success_tests {
    use super::*;

    #[test_log::test]
    fn success_means_no_errors() {
        let ok = FnParser::new("ok", |builder| Ok(builder.create_result_unchanged()));
        let result = ok.validate(Value::from(1)).unwrap();
        assert!(result.is_success());
        assert!(result.errors().is_empty());
        assert_eq!(result.value().unwrap(), &Value::from(1));

        let failed = two_errors().validate(Value::from(1)).unwrap();
        assert!(!failed.is_success());
        assert_eq!(failed.errors().len(), 2);
    }

    #[test]
    fn reading_a_failed_value_is_a_configuration_error() {
        let failed = two_errors().validate(Value::from(1)).unwrap();
        assert_eq!(
            failed.value().unwrap_err(),
            RuntimeConfigError::ValueOfFailedResult {
                path: "Int".into(),
                errors: 2
            }
        );
    }
}

#[cfg(test)]
mod finalizer_tests {
    use super::*;

    fn rewriting(unchanged: bool) -> FnParser {
        FnParser::new("rewrite", move |mut builder| {
            builder.set_value("doubled", 2);
            Ok(if unchanged {
                builder.create_result_unchanged()
            } else {
                builder.create_result_with_current_value()
            })
        })
    }

    #[test]
    fn unchanged_ignores_rewrites() {
        assert_eq!(rewriting(true).parse_value(Value::from(1)).unwrap(), Value::from(1));
    }

    #[test]
    fn current_value_follows_rewrites() {
        assert_eq!(rewriting(false).parse_value(Value::from(1)).unwrap(), Value::from(2));
    }

    #[test]
    fn result_subject_keeps_the_value_path_of_the_input() {
        let root = Subject::new(Value::list([1]));
        let element = root.array_value(0, 1);
        let result = rewriting(false).parse(&element).unwrap();
        assert_eq!(result.subject().value_path(), "Array[0]");
        assert_eq!(
            result.subject().full_path(),
            "Array[0] ▷rewrite doubled↩ ◁rewrite"
        );
    }
}

#[cfg(test)]
mod error_mode_tests {
    use super::*;

    #[test_log::test]
    fn throw_mode_stops_at_the_first_error() {
        let seen_second = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
        let flag = seen_second.clone();
        let parser = FnParser::new("stop", move |mut builder| {
            builder.log_error_template("e1", &Replacers::new())?;
            flag.store(true, std::sync::atomic::Ordering::SeqCst);
            Ok(builder.create_result_unchanged())
        });
        let interrupt = parser.parse(&Subject::new(1)).unwrap_err();
        assert_eq!(interrupt.category(), FailureCategory::Data);
        assert!(!seen_second.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[test]
    fn thrown_builder_never_stores_the_error() {
        let root = Subject::new(1);
        let mut builder = root.result_builder("check");
        assert!(builder.log_error_template("e1", &Replacers::new()).is_err());
        assert!(!builder.has_errors());
    }

    #[test]
    fn collect_mode_flags_errors_once_logged() {
        let root = Subject::new_root(Value::from(1), false);
        let mut builder = root.result_builder("check");
        assert!(!builder.has_errors());
        builder.log_error_template("e1", &Replacers::new()).unwrap();
        assert!(builder.has_errors());
    }

    #[test]
    fn collect_mode_keeps_errors_in_order() {
        let result = two_errors().validate(Value::Null).unwrap();
        let messages: Vec<&str> = result.errors().iter().map(ParseError::message).collect();
        assert_eq!(messages, vec!["e1", "e2"]);
        assert_eq!(result.error_messages(), vec!["Null: e1", "Null: e2"]);
    }

    #[test]
    fn thrown_failure_carries_the_exact_error() {
        let root = Subject::new(Value::from(7));
        let interrupt = two_errors().parse(&root).unwrap_err();
        let Interrupt::Failure(failure) = &interrupt else {
            panic!("expected a data failure, got {:?}", interrupt);
        };
        assert_eq!(failure.error().message(), "e1");
        assert_eq!(failure.error().value_path(), "Int");
        assert_eq!(failure.error().full_path(), "Int ▷two errors");
        assert!(failure.error().subject().source().unwrap().ptr_eq(&root));
    }

    #[test]
    fn unwrap_result_merges_child_errors_in_collect_mode() {
        let root = Subject::new_root(Value::list([1, 2]), false);
        let mut builder = root.result_builder("outer");
        let child = two_errors()
            .parse(&builder.current_subject().array_value(1, 2))
            .unwrap();
        let value = builder.unwrap_result(child, "fallback").unwrap();
        assert_eq!(value, Value::from("fallback"));
        assert_eq!(builder.errors().len(), 2);
        assert_eq!(builder.errors()[0].value_path(), "Array[1]");
    }

    #[test]
    fn adopting_a_failed_result_puts_own_errors_first() {
        let root = Subject::new_root(Value::from(1), false);
        let child = two_errors().parse(&root).unwrap();
        let mut builder = root.result_builder("outer");
        builder.log_error_template("own", &Replacers::new()).unwrap();
        let result = builder.create_result_from_result(child).unwrap();
        let messages: Vec<&str> = result.errors().iter().map(ParseError::message).collect();
        assert_eq!(messages, vec!["own", "e1", "e2"]);
    }

    #[test]
    fn throwing_builder_rethrows_a_failed_side_result() {
        let root = Subject::new(1);
        let child = two_errors().parse(&root.test("side")).unwrap();
        assert!(!child.is_success());
        let expected = Interrupt::from(child.first_error().unwrap().clone());

        let adopted = root
            .result_builder("outer")
            .create_result_from_result(child.clone())
            .unwrap_err();
        assert_eq!(adopted, expected);

        let mut builder = root.result_builder("outer");
        let unwrapped = builder.unwrap_result(child, Value::Null).unwrap_err();
        assert_eq!(unwrapped, expected);
        assert_eq!(unwrapped.parse_error().map(ParseError::message), Some("e1"));
        assert!(!builder.has_errors());
    }

    #[test]
    fn logged_errors_are_kept_as_given() {
        let root = Subject::new_root(Value::Null, false);
        let e1 = ParseError::new(root.clone(), "1");
        let e2 = ParseError::new(root.clone(), "2");
        let mut builder = root.result_builder("check");
        builder.log_error(e1.clone()).unwrap();
        builder.log_error(e2.clone()).unwrap();
        let result = builder.create_result_unchanged();
        assert_eq!(result.errors(), &[e1, e2]);
    }

    #[test]
    fn thrown_error_is_the_logged_error() {
        let root = Subject::new(Value::Null);
        let e1 = ParseError::new(root.clone(), "1");
        let mut builder = root.result_builder("check");
        let interrupt = builder.log_error(e1.clone()).unwrap_err();
        let Interrupt::Failure(failure) = interrupt else {
            panic!("expected a data failure, got {:?}", interrupt);
        };
        assert_eq!(failure.error(), &e1);
    }
}

#[cfg(test)]
mod memory_tests {
    use super::*;

    #[test]
    fn builder_memory_is_the_root_memory() {
        let root = Subject::new(1);
        let key = MemoryKey::new();
        let builder = root.result_builder("m");
        assert!(!builder.has_memory(key));
        builder.set_memory(key, 5_i64);
        assert!(builder.has_memory(key));
        assert!(builder.full_memory().same_store(root.memory()));
        assert_eq!(builder.get_memory(key, 0_i64), 5);

        let nested = root.array_value(0, 2).result_builder("inner");
        assert!(nested.has_memory(key));
        assert!(!Subject::new(1).result_builder("m").has_memory(key));
    }
}

#[cfg(test)]
mod template_tests {
    use super::*;

    #[test]
    fn debug_placeholder_matches_debug_rendering() {
        let value = Value::map([("id", Value::from(3)), ("tags", Value::list(["a", "b"]))]);
        let other = Value::from("a \"quoted\" word");
        let bound = other.clone();
        let parser = FnParser::new("shape", move |mut builder| {
            let replacers = Replacers::from([("a".to_string(), bound.clone())]);
            builder.log_error_template("{value.debug} {a.debug}", &replacers)?;
            Ok(builder.create_result_unchanged())
        });
        let result = parser.validate(value.clone()).unwrap();
        assert_eq!(
            result.errors()[0].message(),
            format!("{} {}", debug(&value), debug(&other))
        );
    }

    #[test]
    fn explicit_bindings_and_unknown_placeholders() {
        let parser = FnParser::new("bounds", |mut builder| {
            let replacers = Replacers::from([("limit".to_string(), Value::from(10))]);
            builder.log_error_template("{value} > {limit} ({other}, {value.loud})", &replacers)?;
            Ok(builder.create_result_unchanged())
        });
        let result = parser.validate(Value::from(12)).unwrap();
        assert_eq!(result.errors()[0].message(), "12 > 10 ({other}, {value.loud})");
    }
}
