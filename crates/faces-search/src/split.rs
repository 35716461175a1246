//! Tokenizing of search expressions. Separators inside parentheses never split, so keyword
//! arguments may contain spaces, commas or the naming-container separator.

/// Splits a list of expressions on any of `separators`, trimming tokens and dropping
/// empty ones.
pub fn split_expressions(expressions: &str, separators: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut buffer = String::new();
    let mut depth: i32 = 0;

    for c in expressions.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
        if depth == 0 && separators.contains(c) {
            push_token(&mut tokens, &buffer);
            buffer.clear();
        } else {
            buffer.push(c);
        }
    }
    push_token(&mut tokens, &buffer);
    tokens
}

fn push_token(tokens: &mut Vec<String>, buffer: &str) {
    let token = buffer.trim();
    if !token.is_empty() {
        tokens.push(token.to_owned());
    }
}

/// First command of `expression`: everything up to the first separator, or up to the
/// parenthesis closing the first opened one.
///
/// `@child(1):myId` yields `@child(1)`, `myId:@parent` yields `myId`. A separator in
/// leading position does not end the command, so `:form:x` yields `:form`.
pub fn extract_first_command(expression: &str, separator: char) -> &str {
    // -1 until the first '(' is seen
    let mut depth: i32 = -1;
    for (i, c) in expression.char_indices() {
        if c == '(' {
            if depth == -1 {
                depth = 0;
            }
            depth += 1;
        }
        if c == ')' {
            depth -= 1;
        }

        if depth == 0 {
            return &expression[..i + c.len_utf8()];
        }
        if depth == -1 && i > 0 && c == separator {
            return &expression[..i];
        }
    }
    expression
}

/// Splits `expression` into its first command and whatever follows the boundary
/// character after it.
pub fn split_command(expression: &str, separator: char) -> (&str, Option<&str>) {
    let command = extract_first_command(expression, separator);
    if command.len() == expression.len() {
        return (command, None);
    }
    let mut rest = expression[command.len()..].chars();
    rest.next();
    (command, Some(rest.as_str()))
}
