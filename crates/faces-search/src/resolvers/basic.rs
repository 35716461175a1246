use faces_core::{FacesContext, NodeId, Result};

use crate::context::{SearchExpressionContext, SearchExpressionHint, SearchKeywordContext};
use crate::keyword::SearchKeywordResolver;

/// `@this`: the current component.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThisKeywordResolver;

impl SearchKeywordResolver for ThisKeywordResolver {
    fn is_resolver_for_keyword(&self, _context: &SearchExpressionContext, keyword: &str) -> bool {
        keyword == "this"
    }

    fn resolve(
        &self,
        ctx: &mut FacesContext,
        keyword_context: &mut SearchKeywordContext<'_, '_>,
        current: NodeId,
        _keyword: &str,
    ) -> Result<()> {
        keyword_context.invoke_context_callback(ctx, current)
    }

    fn is_passthrough(&self, context: &SearchExpressionContext, _keyword: &str) -> bool {
        context.has_hint(SearchExpressionHint::ResolveClientSide)
    }
}

/// `@none`: resolves to nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoneKeywordResolver;

impl SearchKeywordResolver for NoneKeywordResolver {
    fn is_resolver_for_keyword(&self, _context: &SearchExpressionContext, keyword: &str) -> bool {
        keyword == "none"
    }

    fn resolve(
        &self,
        _ctx: &mut FacesContext,
        keyword_context: &mut SearchKeywordContext<'_, '_>,
        _current: NodeId,
        _keyword: &str,
    ) -> Result<()> {
        keyword_context.set_keyword_resolved(true);
        Ok(())
    }

    fn is_passthrough(&self, _context: &SearchExpressionContext, _keyword: &str) -> bool {
        true
    }

    fn is_leaf(&self, _context: &SearchExpressionContext, _keyword: &str) -> bool {
        true
    }
}
