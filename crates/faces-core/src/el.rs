//! Value expressions of the form `#{name.property[index]}` evaluated against request scope.

use indexmap::IndexMap;

use crate::error::{FacesError, Result};
use crate::value::Value;

pub type Scope = IndexMap<String, Value>;

/// Reads and writes value expressions. Installed on the [`FacesContext`](crate::FacesContext).
pub trait ExpressionEvaluator {
    fn get_value(&self, scope: &Scope, expression: &str) -> Result<Value>;

    fn set_value(&self, scope: &mut Scope, expression: &str, value: Value) -> Result<()>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Name(String),
    Index(usize),
}

/// Dotted property paths with bracketed list indices or quoted map keys.
///
/// Unknown roots and missing properties read as [`Value::Null`]; navigating into a
/// scalar is an evaluation error.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathEvaluator;

impl PathEvaluator {
    fn parse(expression: &str) -> Result<Vec<Segment>> {
        let trimmed = expression.trim();
        let body = trimmed
            .strip_prefix("#{")
            .or_else(|| trimmed.strip_prefix("${"))
            .and_then(|rest| rest.strip_suffix('}'))
            .unwrap_or(trimmed)
            .trim();
        if body.is_empty() {
            return Err(FacesError::evaluation(expression, "empty expression"));
        }

        let mut segments = Vec::new();
        let mut name = String::new();
        let mut chars = body.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '.' => {
                    if name.is_empty() && !matches!(segments.last(), Some(Segment::Index(_))) {
                        return Err(FacesError::evaluation(expression, "empty property name"));
                    }
                    if !name.is_empty() {
                        segments.push(Segment::Name(std::mem::take(&mut name)));
                    }
                }
                '[' => {
                    if !name.is_empty() {
                        segments.push(Segment::Name(std::mem::take(&mut name)));
                    }
                    let mut inner = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == ']' {
                            closed = true;
                            break;
                        }
                        inner.push(c);
                    }
                    if !closed {
                        return Err(FacesError::evaluation(expression, "unterminated '['"));
                    }
                    let inner = inner.trim();
                    let quoted = inner
                        .strip_prefix('\'')
                        .and_then(|s| s.strip_suffix('\''))
                        .or_else(|| inner.strip_prefix('"').and_then(|s| s.strip_suffix('"')));
                    match quoted {
                        Some(key) => segments.push(Segment::Name(key.to_string())),
                        None => {
                            let index = inner.parse().map_err(|_| {
                                FacesError::evaluation(expression, format!("bad index '{inner}'"))
                            })?;
                            segments.push(Segment::Index(index));
                        }
                    }
                }
                c if c.is_whitespace() => {
                    return Err(FacesError::evaluation(expression, "unexpected whitespace"));
                }
                c => name.push(c),
            }
        }
        if !name.is_empty() {
            segments.push(Segment::Name(name));
        }
        match segments.first() {
            Some(Segment::Name(_)) => Ok(segments),
            _ => Err(FacesError::evaluation(expression, "expression must start with a name")),
        }
    }

    fn step<'v>(expression: &str, current: &'v Value, segment: &Segment) -> Result<Option<&'v Value>> {
        match (current, segment) {
            (Value::Null, _) => Ok(None),
            (Value::Map(entries), Segment::Name(key)) => Ok(entries.get(key)),
            (Value::List(items), Segment::Index(index)) => Ok(items.get(*index)),
            (Value::List(items), Segment::Name(key)) => match key.parse::<usize>() {
                Ok(index) => Ok(items.get(index)),
                Err(_) => Err(FacesError::evaluation(expression, format!("'{key}' is not a list index"))),
            },
            (other, segment) => Err(FacesError::evaluation(
                expression,
                format!("cannot resolve {segment:?} on {other:?}"),
            )),
        }
    }

    fn step_mut<'v>(expression: &str, current: &'v mut Value, segment: &Segment) -> Result<&'v mut Value> {
        match (current, segment) {
            (Value::Map(entries), Segment::Name(key)) => entries
                .get_mut(key)
                .ok_or_else(|| FacesError::evaluation(expression, format!("no property '{key}'"))),
            (Value::List(items), Segment::Index(index)) => items
                .get_mut(*index)
                .ok_or_else(|| FacesError::evaluation(expression, format!("index {index} out of bounds"))),
            (other, segment) => Err(FacesError::evaluation(
                expression,
                format!("cannot resolve {segment:?} on {other:?}"),
            )),
        }
    }
}

impl ExpressionEvaluator for PathEvaluator {
    fn get_value(&self, scope: &Scope, expression: &str) -> Result<Value> {
        let segments = Self::parse(expression)?;
        let Some(Segment::Name(root)) = segments.first() else {
            return Ok(Value::Null);
        };
        let Some(mut current) = scope.get(root) else {
            return Ok(Value::Null);
        };
        for segment in &segments[1..] {
            match Self::step(expression, current, segment)? {
                Some(next) => current = next,
                None => return Ok(Value::Null),
            }
        }
        Ok(current.clone())
    }

    fn set_value(&self, scope: &mut Scope, expression: &str, value: Value) -> Result<()> {
        let segments = Self::parse(expression)?;
        let Some((Segment::Name(root), rest)) = segments.split_first() else {
            return Err(FacesError::evaluation(expression, "expression must start with a name"));
        };
        let Some((last, path)) = rest.split_last() else {
            scope.insert(root.clone(), value);
            return Ok(());
        };
        let mut current = scope
            .get_mut(root)
            .ok_or_else(|| FacesError::evaluation(expression, format!("'{root}' is not in scope")))?;
        for segment in path {
            current = Self::step_mut(expression, current, segment)?;
        }
        match (current, last) {
            (Value::Map(entries), Segment::Name(key)) => {
                entries.insert(key.clone(), value);
                Ok(())
            }
            (Value::List(items), Segment::Index(index)) => match items.get_mut(*index) {
                Some(slot) => {
                    *slot = value;
                    Ok(())
                }
                None => Err(FacesError::evaluation(expression, format!("index {index} out of bounds"))),
            },
            (other, segment) => Err(FacesError::evaluation(
                expression,
                format!("cannot assign {segment:?} on {other:?}"),
            )),
        }
    }
}

/// True when `text` is written as a deferred or immediate value expression.
pub fn is_value_expression(text: &str) -> bool {
    let text = text.trim();
    (text.starts_with("#{") || text.starts_with("${")) && text.ends_with('}')
}
