use std::collections::VecDeque;
use std::fmt;

use faces_core::{FacesContext, FacesError, NodeId, Result};

use crate::context::{SearchExpressionContext, SearchKeywordContext};
use crate::resolvers::{
    AllKeywordResolver, ChildKeywordResolver, CompositeComponentKeywordResolver, FormKeywordResolver,
    IdKeywordResolver, NamingContainerKeywordResolver, NextKeywordResolver, NoneKeywordResolver,
    ParentKeywordResolver, PreviousKeywordResolver, RootKeywordResolver, ThisKeywordResolver,
};

/// Resolves one `@keyword` of a search expression relative to the current component.
///
/// Resolver chains are shared between requests, so implementations must not keep
/// per-request state.
pub trait SearchKeywordResolver: Send + Sync {
    fn is_resolver_for_keyword(&self, context: &SearchExpressionContext, keyword: &str) -> bool;

    fn resolve(
        &self,
        ctx: &mut FacesContext,
        keyword_context: &mut SearchKeywordContext<'_, '_>,
        current: NodeId,
        keyword: &str,
    ) -> Result<()>;

    /// Whether the keyword can be handed to the client unresolved.
    fn is_passthrough(&self, _context: &SearchExpressionContext, _keyword: &str) -> bool {
        false
    }

    /// Whether the keyword has to be the last command of an expression.
    fn is_leaf(&self, _context: &SearchExpressionContext, _keyword: &str) -> bool {
        false
    }
}

/// Chain of keyword resolvers. The most recently added resolver is asked first.
#[derive(Default)]
pub struct CompositeSearchKeywordResolver {
    resolvers: VecDeque<Box<dyn SearchKeywordResolver>>,
}

impl CompositeSearchKeywordResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chain holding every built-in keyword.
    pub fn with_defaults() -> Self {
        let mut chain = Self::new();
        chain.add(Box::new(ThisKeywordResolver));
        chain.add(Box::new(ParentKeywordResolver));
        chain.add(Box::new(FormKeywordResolver));
        chain.add(Box::new(CompositeComponentKeywordResolver));
        chain.add(Box::new(NextKeywordResolver));
        chain.add(Box::new(PreviousKeywordResolver));
        chain.add(Box::new(NoneKeywordResolver));
        chain.add(Box::new(NamingContainerKeywordResolver));
        chain.add(Box::new(RootKeywordResolver));
        chain.add(Box::new(IdKeywordResolver));
        chain.add(Box::new(ChildKeywordResolver));
        chain.add(Box::new(AllKeywordResolver));
        chain
    }

    pub fn add(&mut self, resolver: Box<dyn SearchKeywordResolver>) {
        self.resolvers.push_front(resolver);
    }

    /// Like [`add`](Self::add) for callers holding an optional resolver.
    pub fn try_add(&mut self, resolver: Option<Box<dyn SearchKeywordResolver>>) -> Result<()> {
        let resolver = resolver.ok_or_else(|| FacesError::invalid_argument("search keyword resolver must not be absent"))?;
        self.add(resolver);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    fn claiming<'s>(
        &'s self,
        context: &'s SearchExpressionContext,
        keyword: &'s str,
    ) -> impl Iterator<Item = &'s dyn SearchKeywordResolver> + 's {
        self.resolvers
            .iter()
            .map(|resolver| -> &'s dyn SearchKeywordResolver { &**resolver })
            .filter(move |resolver| resolver.is_resolver_for_keyword(context, keyword))
    }
}

impl SearchKeywordResolver for CompositeSearchKeywordResolver {
    fn is_resolver_for_keyword(&self, context: &SearchExpressionContext, keyword: &str) -> bool {
        self.claiming(context, keyword).next().is_some()
    }

    fn resolve(
        &self,
        ctx: &mut FacesContext,
        keyword_context: &mut SearchKeywordContext<'_, '_>,
        current: NodeId,
        keyword: &str,
    ) -> Result<()> {
        keyword_context.set_keyword_resolved(false);
        let expression_context = keyword_context.search_expression_context();
        for resolver in self.claiming(expression_context, keyword) {
            resolver.resolve(ctx, keyword_context, current, keyword)?;
            if keyword_context.is_keyword_resolved() {
                return Ok(());
            }
        }
        log::debug!("keyword @{keyword} was not resolved from node {current}");
        Ok(())
    }

    fn is_passthrough(&self, context: &SearchExpressionContext, keyword: &str) -> bool {
        self.claiming(context, keyword)
            .next()
            .is_some_and(|resolver| resolver.is_passthrough(context, keyword))
    }

    fn is_leaf(&self, context: &SearchExpressionContext, keyword: &str) -> bool {
        self.claiming(context, keyword)
            .next()
            .is_some_and(|resolver| resolver.is_leaf(context, keyword))
    }
}

impl fmt::Debug for CompositeSearchKeywordResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeSearchKeywordResolver")
            .field("resolvers", &self.resolvers.len())
            .finish()
    }
}
