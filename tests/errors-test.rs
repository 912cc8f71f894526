use field_path::{PathCodec, Parser};

mod errors {
    use super::*;

    #[test]
    #[should_panic(expected = "unknown function `nosuchthing`")]
    fn unknown_function() {
        Parser::default().parse("nosuchthing(a)").unwrap();
    }

    #[test]
    #[should_panic(expected = "lower() takes 1 argument but 0 were given")]
    fn not_enough_arguments() {
        Parser::default().parse("lower()").unwrap();
    }

    #[test]
    #[should_panic(expected = "lower() takes 1 argument but 2 were given")]
    fn too_many_arguments() {
        Parser::default().parse("lower(a.b, c)").unwrap();
    }

    #[test]
    #[should_panic(expected = "substr() takes at least 2 arguments but 1 were given")]
    fn variadic_minimum() {
        Parser::default().parse("substr(a)").unwrap();
    }

    #[test]
    #[should_panic(expected = "unbalanced parentheses")]
    fn unbalanced_parens() {
        Parser::default().parse("((a.b) + 1").unwrap();
    }

    #[test]
    #[should_panic(expected = "unexpected expression token ')'")]
    fn empty_parens() {
        Parser::default().parse("()").unwrap();
    }

    #[test]
    #[should_panic(expected = "float literal 1e999 is out of range")]
    fn infinite_float() {
        Parser::default().parse("a + 1e999").unwrap();
    }

    #[test]
    #[should_panic(expected = "unexpected character")]
    fn nul_after_path() {
        PathCodec::default().decode("a\0 + garbage ((((").unwrap();
    }

    #[test]
    #[should_panic(expected = "array index must not be negative")]
    fn negative_index() {
        Parser::default().parse("a[-1]").unwrap();
    }

    #[test]
    #[should_panic(expected = "unclosed array index")]
    fn unclosed_index() {
        Parser::default().parse("a[1").unwrap();
    }

    #[test]
    #[should_panic(expected = "unclosed field name starting at index 3")]
    fn unclosed_quoted_name() {
        Parser::default().parse("a.`b").unwrap();
    }

    #[test]
    #[should_panic(expected = "expected a field name after '.', found '.'")]
    fn double_dot() {
        PathCodec::default().decode("a..b").unwrap();
    }

    #[test]
    #[should_panic(expected = "a field path is required but the input was empty")]
    fn empty_input() {
        PathCodec::default().decode("").unwrap();
    }

    #[test]
    #[should_panic(expected = "is a binary expression, not a field path")]
    fn expression_is_not_a_path() {
        PathCodec::default().decode("a + 1").unwrap();
    }

    #[test]
    #[should_panic(expected = "is a function call, not a field path")]
    fn function_call_is_not_a_path() {
        PathCodec::default().decode("upper(a)").unwrap();
    }
}
