use faces_core::collections::map::HashSet;
use faces_core::{ContextCallback, FacesContext, NodeId, Result, VisitHint};

/// Flags altering how a search expression is resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SearchExpressionHint {
    /// Keywords the client can evaluate itself are returned untouched.
    ResolveClientSide,
    /// Stop at the first match.
    ResolveSingleComponent,
    /// An empty result is not an error.
    IgnoreNoResult,
    /// Do not materialize rows of iteration components while searching.
    SkipVirtualComponents,
}

/// Per-call search settings: the component the expression is relative to plus hints.
#[derive(Clone, Debug)]
pub struct SearchExpressionContext {
    source: NodeId,
    expression_hints: HashSet<SearchExpressionHint>,
    visit_hints: HashSet<VisitHint>,
}

impl SearchExpressionContext {
    pub fn new(source: NodeId) -> Self {
        Self {
            source,
            expression_hints: HashSet::default(),
            visit_hints: HashSet::default(),
        }
    }

    pub fn with_hints(mut self, hints: impl IntoIterator<Item = SearchExpressionHint>) -> Self {
        self.expression_hints.extend(hints);
        self
    }

    pub fn with_visit_hints(mut self, hints: impl IntoIterator<Item = VisitHint>) -> Self {
        self.visit_hints.extend(hints);
        self
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn expression_hints(&self) -> &HashSet<SearchExpressionHint> {
        &self.expression_hints
    }

    pub fn visit_hints(&self) -> &HashSet<VisitHint> {
        &self.visit_hints
    }

    pub fn add_hint(&mut self, hint: SearchExpressionHint) {
        self.expression_hints.insert(hint);
    }

    pub fn has_hint(&self, hint: SearchExpressionHint) -> bool {
        self.expression_hints.contains(&hint)
    }
}

/// State handed to a keyword resolver for one keyword of an expression.
///
/// A resolver reports its targets through [`invoke_context_callback`](Self::invoke_context_callback),
/// which also marks the keyword as resolved. Resolvers that legitimately find nothing call
/// [`set_keyword_resolved`](Self::set_keyword_resolved) so the chain stops asking others.
pub struct SearchKeywordContext<'a, 'cb> {
    expression_context: &'a SearchExpressionContext,
    callback: &'a mut ContextCallback<'cb>,
    remaining_expression: Option<&'a str>,
    keyword_resolved: bool,
}

impl<'a, 'cb> SearchKeywordContext<'a, 'cb> {
    pub fn new(
        expression_context: &'a SearchExpressionContext,
        callback: &'a mut ContextCallback<'cb>,
        remaining_expression: Option<&'a str>,
    ) -> Self {
        Self {
            expression_context,
            callback,
            remaining_expression,
            keyword_resolved: false,
        }
    }

    pub fn search_expression_context(&self) -> &'a SearchExpressionContext {
        self.expression_context
    }

    /// Commands still to be applied to whatever this keyword yields.
    pub fn remaining_expression(&self) -> Option<&str> {
        self.remaining_expression
    }

    pub fn invoke_context_callback(&mut self, ctx: &mut FacesContext, target: NodeId) -> Result<()> {
        self.keyword_resolved = true;
        (self.callback)(ctx, target)
    }

    pub fn is_keyword_resolved(&self) -> bool {
        self.keyword_resolved
    }

    pub fn set_keyword_resolved(&mut self, resolved: bool) {
        self.keyword_resolved = resolved;
    }
}
