use faces_search::{split_command, split_expressions};
use proptest::prelude::*;

proptest! {
    #[test]
    fn tokens_are_trimmed_and_never_empty(input in "[a-z@:(), ]{0,40}") {
        for token in split_expressions(&input, " ,") {
            prop_assert!(!token.is_empty());
            prop_assert_eq!(token.trim(), token.as_str());
        }
    }

    #[test]
    fn identifier_lists_split_on_any_separator_run(
        ids in proptest::collection::vec("[a-zA-Z][a-zA-Z0-9_]{0,8}", 0..6),
        glue in "[ ,]{1,3}",
    ) {
        let joined = ids.join(&glue);
        prop_assert_eq!(split_expressions(&joined, " ,"), ids);
    }

    #[test]
    fn parenthesized_arguments_are_never_split(argument in "[a-z ,]{0,10}") {
        let expressions = format!("@id({argument}) , next");
        prop_assert_eq!(
            split_expressions(&expressions, " ,"),
            vec![format!("@id({argument})"), "next".to_string()]
        );
    }

    #[test]
    fn command_and_remainder_cover_the_expression(expression in "[a-z@:()]{1,20}") {
        let (command, remaining) = split_command(&expression, ':');
        prop_assert!(expression.starts_with(command));
        match remaining {
            Some(rest) => prop_assert_eq!(command.len() + 1 + rest.len(), expression.len()),
            None => prop_assert_eq!(command, expression.as_str()),
        }
    }
}
