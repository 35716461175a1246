use faces_core::{FacesContext, NodeId, Result};

use crate::context::{SearchExpressionContext, SearchKeywordContext};
use crate::keyword::SearchKeywordResolver;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Next,
    Previous,
}

/// Closest targetable sibling of `current` in `direction`.
fn sibling(ctx: &FacesContext, current: NodeId, direction: Direction) -> Result<Option<NodeId>> {
    let tree = ctx.tree();
    let Some(parent) = tree.parent(current)? else {
        return Ok(None);
    };
    let siblings = tree.children(parent)?;
    let Some(position) = siblings.iter().position(|&kid| kid == current) else {
        return Ok(None);
    };
    let candidates: Box<dyn Iterator<Item = &NodeId>> = match direction {
        Direction::Next => Box::new(siblings[position + 1..].iter()),
        Direction::Previous => Box::new(siblings[..position].iter().rev()),
    };
    for &candidate in candidates {
        if !tree.get(candidate)?.is_untargetable() {
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}

fn resolve_sibling(
    ctx: &mut FacesContext,
    keyword_context: &mut SearchKeywordContext<'_, '_>,
    current: NodeId,
    direction: Direction,
) -> Result<()> {
    match sibling(ctx, current, direction)? {
        Some(target) => keyword_context.invoke_context_callback(ctx, target),
        None => {
            keyword_context.set_keyword_resolved(true);
            Ok(())
        }
    }
}

/// `@next`: the following targetable sibling.
#[derive(Clone, Copy, Debug, Default)]
pub struct NextKeywordResolver;

impl SearchKeywordResolver for NextKeywordResolver {
    fn is_resolver_for_keyword(&self, _context: &SearchExpressionContext, keyword: &str) -> bool {
        keyword == "next"
    }

    fn resolve(
        &self,
        ctx: &mut FacesContext,
        keyword_context: &mut SearchKeywordContext<'_, '_>,
        current: NodeId,
        _keyword: &str,
    ) -> Result<()> {
        resolve_sibling(ctx, keyword_context, current, Direction::Next)
    }
}

/// `@previous`: the preceding targetable sibling.
#[derive(Clone, Copy, Debug, Default)]
pub struct PreviousKeywordResolver;

impl SearchKeywordResolver for PreviousKeywordResolver {
    fn is_resolver_for_keyword(&self, _context: &SearchExpressionContext, keyword: &str) -> bool {
        keyword == "previous"
    }

    fn resolve(
        &self,
        ctx: &mut FacesContext,
        keyword_context: &mut SearchKeywordContext<'_, '_>,
        current: NodeId,
        _keyword: &str,
    ) -> Result<()> {
        resolve_sibling(ctx, keyword_context, current, Direction::Previous)
    }
}
