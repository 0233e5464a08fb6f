//! Behavioural tests for parsing and applying masks
//!
//! These tests verify that:
//! - Valid masks round-trip through their rendered form
//! - Structural mistakes are rejected as parse errors
//! - Filtering honours nesting, skip mode, wildcards and lists

use this_mask::prelude::*;

fn book(id: u32, title: &str, author: &str, creator: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": format!("About {}", title),
        "author": {"id": 1, "name": author, "description": "Writer"},
        "created_by": {"id": 7, "username": creator}
    })
}

// =============================================================================
// Parsing
// =============================================================================

mod parsing_tests {
    use super::*;

    #[test]
    fn test_round_trip_structure() {
        let inputs = [
            "{id,title,author{name},created_by{username}}",
            "id , title,\n author { name }",
            "{a{b{c{d}}},e}",
            "{*}",
            "x:y,-z-,_w",
        ];
        for input in inputs {
            let mask = MaskNode::parse(input).unwrap();
            let rendered = mask.to_string();
            assert_eq!(
                MaskNode::parse(&rendered).unwrap(),
                mask,
                "{} rendered as {}",
                input,
                rendered
            );
        }
    }

    #[test]
    fn test_structural_errors() {
        let cases = [
            ("{{{/aaa/s*", ParseError::MissingClosingBracket),
            ("a,,b", ParseError::UnexpectedComma),
            ("{a", ParseError::MissingClosingBracket),
            ("a}", ParseError::UnexpectedClosingBracket),
            ("{,a}", ParseError::UnexpectedComma),
            ("{a,{b}}", ParseError::UnexpectedOpeningBracket),
            ("a{b{c}", ParseError::MissingClosingBracket),
        ];
        for (input, expected) in cases {
            assert_eq!(
                MaskNode::parse(input),
                Err(MaskError::Parse(expected.clone())),
                "parsing {}",
                input
            );
        }
    }

    #[test]
    fn test_garbage_around_a_name_is_ignored() {
        let mask = MaskNode::parse("---a---").unwrap();
        assert_eq!(mask.field_names(), vec!["---a---"]);

        let mask = MaskNode::parse("{ 'id' ; \"title\" }").unwrap();
        assert_eq!(mask.field_names(), vec!["id", "title"]);
    }

    #[test]
    fn test_empty_input_is_an_empty_mask() {
        assert!(MaskNode::parse("").unwrap().is_empty());
        assert!(MaskNode::parse("{}").unwrap().is_empty());
    }
}

// =============================================================================
// Filtering
// =============================================================================

mod filtering_tests {
    use super::*;

    #[test]
    fn test_nested_mask() {
        let mask = MaskNode::parse("{id,title,author{name},created_by{username}}").unwrap();
        let data = json!({
            "id": 1,
            "title": "X",
            "author": {"name": "A", "other": 9},
            "created_by": {"username": "u"}
        });
        assert_eq!(
            mask.apply(&data).unwrap(),
            json!({
                "id": 1,
                "title": "X",
                "author": {"name": "A"},
                "created_by": {"username": "u"}
            })
        );
    }

    #[test]
    fn test_skip_semantics() {
        let data = json!({"id": 1});

        let mask = MaskNode::parse("{id,title}").unwrap();
        assert_eq!(mask.apply(&data).unwrap(), json!({"id": 1, "title": null}));

        let mask = MaskNode::parse_with_skip("{id,title}", true).unwrap();
        assert_eq!(mask.apply(&data).unwrap(), json!({"id": 1}));
    }

    #[test]
    fn test_unknown_fields_are_null() {
        let mask = MaskNode::parse("{title,doesnotexist}").unwrap();
        assert_eq!(
            mask.apply(&json!({"title": "X"})).unwrap(),
            json!({"title": "X", "doesnotexist": null})
        );
    }

    #[test]
    fn test_empty_mask_and_wildcard() {
        let data = json!({"a": 1, "b": 2});
        assert_eq!(MaskNode::parse("").unwrap().apply(&data).unwrap(), json!({}));
        assert_eq!(MaskNode::parse("{*}").unwrap().apply(&data).unwrap(), data);
    }

    #[test]
    fn test_nested_wildcard() {
        let mask = MaskNode::parse("{title,author{*}}").unwrap();
        let data = book(1, "Carrie", "Stephen King", "monkey");
        assert_eq!(
            mask.apply(&data).unwrap(),
            json!({
                "title": "Carrie",
                "author": {"id": 1, "name": "Stephen King", "description": "Writer"}
            })
        );
    }

    #[test]
    fn test_list_keeps_length_and_order() {
        let books = json!([
            book(1, "The Very Hungry Caterpillar", "Eric Carle", "monkey"),
            book(2, "The Shining", "Stephen King", "horse"),
            book(3, "Carrie", "Stephen King", "monkey"),
        ]);
        let mask = MaskNode::parse("{id,title,author{name},created_by{username}}").unwrap();
        assert_eq!(
            mask.apply(&books).unwrap(),
            json!([
                {
                    "id": 1,
                    "title": "The Very Hungry Caterpillar",
                    "author": {"name": "Eric Carle"},
                    "created_by": {"username": "monkey"}
                },
                {
                    "id": 2,
                    "title": "The Shining",
                    "author": {"name": "Stephen King"},
                    "created_by": {"username": "horse"}
                },
                {
                    "id": 3,
                    "title": "Carrie",
                    "author": {"name": "Stephen King"},
                    "created_by": {"username": "monkey"}
                }
            ])
        );
    }

    #[test]
    fn test_idempotence() {
        let data = book(2, "The Shining", "Stephen King", "horse");
        for text in ["{id,title}", "{author{name},*}", "{missing,created_by{username}}"] {
            let mask = MaskNode::parse(text).unwrap();
            let once = mask.apply(&data).unwrap();
            assert_eq!(mask.apply(&once).unwrap(), once, "mask {}", text);
        }
    }

    #[test]
    fn test_inconsistent_mask_aborts() {
        let books = json!([
            book(1, "Carrie", "Stephen King", "monkey"),
            {"id": 2, "title": "Broken", "author": "just a name"}
        ]);
        let mask = MaskNode::parse("{title,author{name}}").unwrap();
        let err = mask.apply(&books).unwrap_err();
        assert_eq!(err, MaskError::inconsistent_field("author"));
        assert_eq!(err.error_code(), "MASK_INCONSISTENT");
    }
}
