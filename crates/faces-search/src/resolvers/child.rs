use std::sync::LazyLock;

use faces_core::{FacesContext, FacesError, NodeId, Result};
use regex::Regex;

use super::targetable_children;
use crate::context::{SearchExpressionContext, SearchKeywordContext};
use crate::keyword::SearchKeywordResolver;

static CHILD_PATTERN: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^child\((\d+)\)$"));

/// Digits of the position requested by a `child(n)` keyword.
pub(crate) fn requested_position(keyword: &str) -> Result<&str> {
    let pattern = CHILD_PATTERN
        .as_ref()
        .map_err(|err| FacesError::syntax(format!("invalid @child pattern: {err}")))?;
    pattern
        .captures(keyword)
        .and_then(|captures| captures.get(1))
        .map(|digits| digits.as_str())
        .ok_or_else(|| {
            FacesError::syntax(format!(
                "Expression does not match following pattern @child(n). Expression: {keyword}"
            ))
        })
}

/// `@child(n)`: the n-th targetable child, counting from zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChildKeywordResolver;

impl SearchKeywordResolver for ChildKeywordResolver {
    fn is_resolver_for_keyword(&self, _context: &SearchExpressionContext, keyword: &str) -> bool {
        keyword.starts_with("child(")
    }

    fn resolve(
        &self,
        ctx: &mut FacesContext,
        keyword_context: &mut SearchKeywordContext<'_, '_>,
        current: NodeId,
        keyword: &str,
    ) -> Result<()> {
        let index = requested_position(keyword)?;
        let children = targetable_children(ctx, current)?;
        let Some(&target) = index.parse::<usize>().ok().and_then(|index| children.get(index)) else {
            return Err(FacesError::structural(format!(
                "Component with clientId {} has fewer children than {index}. Expression: {keyword}",
                ctx.client_id(current)?
            )));
        };
        keyword_context.invoke_context_callback(ctx, target)
    }
}
