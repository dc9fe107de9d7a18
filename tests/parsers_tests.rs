//! Consumer parsers against decoded JSON and YAML input.

use assay::parsers::{
    EachElement, EachEntry, EachProperty, Expect, Field, IntRange, Length, Property, Record,
    Trim, Unique,
};
use assay::{render_failure, Chainable, Object, ParseOptions, Parser, Value, ValueKind};

#[cfg(test)]
mod collection_tests {
    use super::*;

    #[test_log::test]
    fn each_element_reports_every_bad_element() {
        let input = Value::from_json_str("[1, \"two\", 3, null]").unwrap();
        let result = EachElement::new(Expect::kind(ValueKind::Int))
            .validate(input)
            .unwrap();
        assert_eq!(
            result.error_messages(),
            vec![
                "Array[1]: expected int, got string",
                "Array[3]: expected int, got null"
            ]
        );
    }

    #[test]
    fn each_element_outputs_transformed_elements() {
        let parser = EachElement::new(Trim);
        let output = parser.parse_value(Value::list([" a", "b "])).unwrap();
        assert_eq!(output, Value::list(["a", "b"]));
    }

    #[test]
    fn each_entry_parses_keys_and_values() {
        let input = Value::from_yaml_str("' a ': 1\nb: 50\n").unwrap();
        let parser = EachEntry::new(Trim, IntRange::new(0, 10).unwrap());
        let result = parser.validate(input).unwrap();
        assert_eq!(result.error_messages(), vec!["Map['b']: 50 is not between 0 and 10"]);

        let ok = parser
            .parse_value(Value::map([(" a ", 1), ("b", 2)]))
            .unwrap();
        assert_eq!(ok, Value::map([("a", 1), ("b", 2)]));
    }

    #[test]
    fn key_errors_point_at_the_key() {
        let parser = EachEntry::new(Expect::kind(ValueKind::Int), Trim);
        let result = parser.validate(Value::map([("k", "v")])).unwrap();
        assert_eq!(result.error_messages(), vec!["Map key 'k': expected int, got string"]);
    }

    #[test]
    fn renamed_keys_that_collide_are_reported() {
        let parser = EachEntry::new(Trim, IntRange::new(0, 10).unwrap());
        let result = parser.validate(Value::map([(" a", 1), ("a ", 2)])).unwrap();
        assert_eq!(
            result.error_messages(),
            vec!["Map key 'a ': \"a \" maps to the existing key \"a\""]
        );
    }

    #[test]
    fn length_is_checked_on_a_meta_node() {
        let short = Length::new(IntRange::new(1, 3).unwrap());
        assert_eq!(short.parse_value(Value::from("héé")).unwrap(), Value::from("héé"));
        let result = short.validate(Value::list([1, 2, 3, 4])).unwrap();
        assert_eq!(
            result.error_messages(),
            vec!["Array meta length: 4 is not between 1 and 3"]
        );
        let result = short.validate(Value::from(5)).unwrap();
        assert_eq!(result.error_messages(), vec!["Int: int has no length"]);
    }
}

#[cfg(test)]
mod record_tests {
    use super::*;

    fn user() -> Record {
        Record::new()
            .field("name", Expect::kind(ValueKind::String).then(Trim))
            .field("age", IntRange::new(0, 150).unwrap())
    }

    #[test]
    fn record_collects_missing_and_invalid_fields() {
        let input = Value::from_json_str(r#"{"age": -1, "extra": true}"#).unwrap();
        let result = user().validate(input).unwrap();
        assert_eq!(
            result.error_messages(),
            vec![
                "Map: missing key \"name\"",
                "Map['age']: -1 is not between 0 and 150"
            ]
        );
    }

    #[test]
    fn record_drops_undeclared_keys() {
        let input = Value::from_json_str(r#"{"name": " Ada ", "age": 36, "extra": 1}"#).unwrap();
        let output = user().parse_value(input).unwrap();
        assert_eq!(output, Value::map([("age", Value::from(36)), ("name", Value::from("Ada"))]));
    }

    #[test]
    fn field_narrows_to_the_entry() {
        let field = Field::new("id", Expect::kind(ValueKind::Int));
        assert_eq!(
            field.parse_value(Value::map([("id", 4)])).unwrap(),
            Value::from(4)
        );
        let error = field.parse_value(Value::map([("id", "4")])).unwrap_err();
        assert_eq!(
            error.parse_error().map(|e| e.value_path()),
            Some("Map['id']".to_string())
        );
    }

    #[test]
    fn properties_render_with_dots() {
        let user = Object::new("User").with("name", 7).with("id", 1);
        let property = Property::new("name", Expect::kind(ValueKind::String));
        let result = property.validate(Value::from(user.clone())).unwrap();
        assert_eq!(result.error_messages(), vec!["User.name: expected string, got int"]);

        let missing = Property::new("email", Trim).validate(Value::from(user)).unwrap();
        assert_eq!(
            missing.error_messages(),
            vec!["User: object<User> has no property email"]
        );
    }

    #[test]
    fn each_property_visits_names_and_values() {
        let user = Object::new("User").with("b", 2).with("a", 1);
        let parser = EachProperty::new(Expect::kind(ValueKind::String), IntRange::new(0, 1).unwrap());
        let result = parser.validate(Value::from(user)).unwrap();
        assert_eq!(result.error_messages(), vec!["User.b: 2 is not between 0 and 1"]);
    }

    #[test]
    fn renamed_properties_that_collide_are_reported() {
        let user = Object::new("User").with(" a", 1).with("a ", 1);
        let parser = EachProperty::new(Trim, IntRange::new(0, 1).unwrap());
        let result = parser.validate(Value::from(user)).unwrap();
        assert_eq!(
            result.error_messages(),
            vec!["User property name 'a ': \"a \" maps to the existing key \"a\""]
        );
    }
}

#[cfg(test)]
mod unique_tests {
    use super::*;

    #[test]
    fn duplicates_are_detected_within_one_run_only() {
        let parser = EachElement::new(Unique::new());
        let result = parser.validate(Value::list(["a", "b", "a"])).unwrap();
        assert_eq!(result.error_messages(), vec!["Array[2]: \"a\" was already used"]);

        // A new root gets fresh memory.
        assert!(parser.validate(Value::list(["a"])).unwrap().is_success());
    }

    #[test]
    fn repeated_nan_floats_are_duplicates() {
        let parser = EachElement::new(Unique::new());
        let input = Value::from_json_str("[0.5, 1.5, 0.5]").unwrap();
        let result = parser.validate(input).unwrap();
        assert_eq!(result.error_messages(), vec!["Array[2]: 0.5 was already used"]);

        let nans = Value::list([Value::Float(f64::NAN), Value::Float(f64::NAN)]);
        let result = parser.validate(nans).unwrap();
        assert_eq!(result.error_messages(), vec!["Array[1]: NAN was already used"]);
    }

    #[test]
    fn separate_instances_track_separately() {
        let parser = Record::new()
            .field("x", Unique::new())
            .field("y", Unique::new());
        let input = Value::map([("x", 1), ("y", 1)]);
        assert!(parser.validate(input).unwrap().is_success());
    }
}

#[cfg(test)]
mod options_tests {
    use super::*;

    #[test]
    fn options_drive_the_root() {
        let options: ParseOptions =
            serde_json::from_str(r#"{"throw_on_error": false, "root_description": "request"}"#)
                .unwrap();
        let result = EachElement::new(IntRange::new(0, 1).unwrap())
            .parse_with(Value::list([0, 2, 3]), &options)
            .unwrap();
        assert_eq!(
            result.error_messages(),
            vec![
                "request[1]: 2 is not between 0 and 1",
                "request[2]: 3 is not between 0 and 1"
            ]
        );
    }

    #[test]
    fn failures_render_through_miette() {
        let interrupt = IntRange::new(0, 1)
            .unwrap()
            .parse_with(Value::from(5), &ParseOptions::default().with_root_description("port"))
            .unwrap_err();
        let rendered = render_failure(interrupt);
        assert!(rendered.contains("port: 5 is not between 0 and 1"));
        assert!(rendered.contains("assay::parse::failure"));
    }
}
