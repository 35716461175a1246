use faces_core::{invoke_on_component, ContextCallback, FacesContext, FacesError, NodeId, Result};

use crate::context::{SearchExpressionContext, SearchExpressionHint, SearchKeywordContext};
use crate::keyword::{CompositeSearchKeywordResolver, SearchKeywordResolver};
use crate::split::{split_command, split_expressions};

/// Resolves search expressions such as `@form`, `:form:table` or `@parent:@child(0)`
/// into components of the tree held by a [`FacesContext`].
#[derive(Debug)]
pub struct SearchExpressionHandler {
    resolver: CompositeSearchKeywordResolver,
}

impl Default for SearchExpressionHandler {
    fn default() -> Self {
        Self::new(CompositeSearchKeywordResolver::with_defaults())
    }
}

impl SearchExpressionHandler {
    pub fn new(resolver: CompositeSearchKeywordResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &CompositeSearchKeywordResolver {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut CompositeSearchKeywordResolver {
        &mut self.resolver
    }

    /// Client id of the single component `expression` resolves to.
    ///
    /// Passthrough expressions come back unchanged. `Ok(None)` only happens with
    /// [`SearchExpressionHint::IgnoreNoResult`].
    pub fn resolve_client_id(
        &self,
        ctx: &mut FacesContext,
        search_context: &mut SearchExpressionContext,
        expression: &str,
    ) -> Result<Option<String>> {
        let expression = expression.trim();
        search_context.add_hint(SearchExpressionHint::ResolveSingleComponent);

        if !expression.is_empty() && self.is_passthrough_expression(ctx, search_context, expression) {
            return Ok(Some(expression.to_owned()));
        }

        let mut client_id = None;
        if !expression.is_empty() {
            let mut first = |ctx: &mut FacesContext, target: NodeId| -> Result<()> {
                if client_id.is_none() {
                    client_id = Some(ctx.client_id(target)?);
                }
                Ok(())
            };
            self.invoke_on_component(ctx, search_context, search_context.source(), expression, &mut first)?;
        }

        if client_id.is_none() && !search_context.has_hint(SearchExpressionHint::IgnoreNoResult) {
            return Err(not_found(ctx, search_context, expression)?);
        }
        Ok(client_id)
    }

    /// Client ids of everything a list of expressions resolves to, in expression order.
    pub fn resolve_client_ids(
        &self,
        ctx: &mut FacesContext,
        search_context: &SearchExpressionContext,
        expressions: &str,
    ) -> Result<Vec<String>> {
        let expressions = expressions.trim();
        let mut client_ids = Vec::new();

        for expression in split_expressions(expressions, ctx.config().expression_separators()) {
            if self.is_passthrough_expression(ctx, search_context, &expression) {
                client_ids.push(expression);
                continue;
            }
            let mut collect = |ctx: &mut FacesContext, target: NodeId| -> Result<()> {
                client_ids.push(ctx.client_id(target)?);
                Ok(())
            };
            self.invoke_on_component(ctx, search_context, search_context.source(), &expression, &mut collect)?;
        }

        if client_ids.is_empty() && !search_context.has_hint(SearchExpressionHint::IgnoreNoResult) {
            return Err(not_found(ctx, search_context, expressions)?);
        }
        Ok(client_ids)
    }

    /// Invokes `callback` on the first component `expression` resolves to.
    pub fn resolve_component(
        &self,
        ctx: &mut FacesContext,
        search_context: &mut SearchExpressionContext,
        expression: &str,
        callback: &mut ContextCallback<'_>,
    ) -> Result<()> {
        let expression = expression.trim();
        search_context.add_hint(SearchExpressionHint::ResolveSingleComponent);

        let mut invoked = false;
        let mut once = |ctx: &mut FacesContext, target: NodeId| -> Result<()> {
            if invoked {
                return Ok(());
            }
            invoked = true;
            callback(ctx, target)
        };
        self.invoke_on_component(ctx, search_context, search_context.source(), expression, &mut once)?;

        if !invoked && !search_context.has_hint(SearchExpressionHint::IgnoreNoResult) {
            return Err(not_found(ctx, search_context, expression)?);
        }
        Ok(())
    }

    /// Invokes `callback` on every component a list of expressions resolves to.
    pub fn resolve_components(
        &self,
        ctx: &mut FacesContext,
        search_context: &SearchExpressionContext,
        expressions: &str,
        callback: &mut ContextCallback<'_>,
    ) -> Result<()> {
        let expressions = expressions.trim();

        let mut invoked = false;
        let mut tracking = |ctx: &mut FacesContext, target: NodeId| -> Result<()> {
            invoked = true;
            callback(ctx, target)
        };
        for expression in split_expressions(expressions, ctx.config().expression_separators()) {
            self.invoke_on_component(ctx, search_context, search_context.source(), &expression, &mut tracking)?;
        }

        if !invoked && !search_context.has_hint(SearchExpressionHint::IgnoreNoResult) {
            return Err(not_found(ctx, search_context, expressions)?);
        }
        Ok(())
    }

    /// Resolves `expression` relative to `previous` and hands every match to `callback`.
    ///
    /// Expressions without keywords are plain id paths. Otherwise the first command is
    /// resolved and the rest of the expression is applied to each component it yields.
    pub fn invoke_on_component(
        &self,
        ctx: &mut FacesContext,
        search_context: &SearchExpressionContext,
        previous: NodeId,
        expression: &str,
        callback: &mut ContextCallback<'_>,
    ) -> Result<()> {
        let expression = expression.trim();
        if expression.is_empty() {
            return Ok(());
        }
        let separator = ctx.separator_char();
        let prefix = ctx.config().keyword_prefix();

        if !expression.contains(prefix) {
            return self.invoke_on_id_path(ctx, search_context, previous, expression, callback);
        }

        if let Some(rest) = expression.strip_prefix(separator) {
            if rest.starts_with(prefix) {
                let root = ctx.view_root();
                return self.invoke_on_component(ctx, search_context, root, rest, callback);
            }
        }

        let (command, remaining) = split_command(expression, separator);
        log::trace!("resolving {command} from node {previous}, remaining {remaining:?}");

        if let Some(keyword) = command.strip_prefix(prefix) {
            let Some(remaining) = remaining else {
                return self.invoke_keyword_resolvers(ctx, search_context, previous, keyword, None, callback);
            };
            if self.resolver.is_leaf(search_context, keyword) {
                return Err(FacesError::structural(format!(
                    "{prefix}{keyword} must be the last command of a search expression. Expression: {expression}"
                )));
            }
            let mut continuation = |ctx: &mut FacesContext, target: NodeId| -> Result<()> {
                self.invoke_on_component(ctx, search_context, target, remaining, &mut *callback)
            };
            return self.invoke_keyword_resolvers(
                ctx,
                search_context,
                previous,
                keyword,
                Some(remaining),
                &mut continuation,
            );
        }

        let Some(target) = ctx.tree().find_component(previous, command, separator)? else {
            return Ok(());
        };
        match remaining {
            None => callback(ctx, target),
            Some(remaining) => self.invoke_on_component(ctx, search_context, target, remaining, callback),
        }
    }

    fn invoke_on_id_path(
        &self,
        ctx: &mut FacesContext,
        search_context: &SearchExpressionContext,
        previous: NodeId,
        expression: &str,
        callback: &mut ContextCallback<'_>,
    ) -> Result<()> {
        let separator = ctx.separator_char();
        if let Some(target) = ctx.tree().find_component(previous, expression, separator)? {
            return callback(ctx, target);
        }
        if search_context.has_hint(SearchExpressionHint::SkipVirtualComponents) {
            return Ok(());
        }
        // the path may address a row of an iteration component
        let client_id = expression.strip_prefix(separator).unwrap_or(expression);
        let root = ctx.view_root();
        let found = invoke_on_component(ctx, root, client_id, callback)?;
        if !found {
            log::debug!("no component matches client id {client_id}");
        }
        Ok(())
    }

    fn invoke_keyword_resolvers(
        &self,
        ctx: &mut FacesContext,
        search_context: &SearchExpressionContext,
        previous: NodeId,
        keyword: &str,
        remaining: Option<&str>,
        callback: &mut ContextCallback<'_>,
    ) -> Result<()> {
        let mut keyword_context = SearchKeywordContext::new(search_context, callback, remaining);
        self.resolver.resolve(ctx, &mut keyword_context, previous, keyword)
    }

    /// Splits a list of expressions using the configured expression separators.
    pub fn split_expressions(&self, ctx: &FacesContext, expressions: &str) -> Vec<String> {
        split_expressions(expressions, ctx.config().expression_separators())
    }

    /// Whether `expression` should be handed to the client without resolving it.
    pub fn is_passthrough_expression(
        &self,
        ctx: &FacesContext,
        search_context: &SearchExpressionContext,
        expression: &str,
    ) -> bool {
        let expression = expression.trim();
        let prefix = ctx.config().keyword_prefix();
        if !expression.contains(prefix) {
            return false;
        }

        let (command, remaining) = split_command(expression, ctx.separator_char());
        match (command.strip_prefix(prefix), remaining) {
            (Some(keyword), None) => self.resolver.is_passthrough(search_context, keyword),
            (_, Some(remaining)) => self.is_passthrough_expression(ctx, search_context, remaining),
            (None, None) => false,
        }
    }

    /// Whether every keyword of `expression` has a resolver and no leaf keyword is
    /// followed by further commands. Does not touch the tree.
    pub fn is_valid_expression(
        &self,
        ctx: &FacesContext,
        search_context: &SearchExpressionContext,
        expression: &str,
    ) -> bool {
        let expression = expression.trim();
        let prefix = ctx.config().keyword_prefix();
        if expression.is_empty() || !expression.contains(prefix) {
            return true;
        }

        let separator = ctx.separator_char();
        let expression = expression.strip_prefix(separator).unwrap_or(expression);
        let (command, remaining) = split_command(expression, separator);

        let Some(keyword) = command.strip_prefix(prefix) else {
            return remaining.map_or(true, |rest| self.is_valid_expression(ctx, search_context, rest));
        };
        if !self.resolver.is_resolver_for_keyword(search_context, keyword) {
            return false;
        }
        match remaining.map(str::trim).filter(|rest| !rest.is_empty()) {
            Some(rest) => {
                !self.resolver.is_leaf(search_context, keyword) && self.is_valid_expression(ctx, search_context, rest)
            }
            None => true,
        }
    }
}

fn not_found(ctx: &FacesContext, search_context: &SearchExpressionContext, expression: &str) -> Result<FacesError> {
    Ok(FacesError::ComponentNotFound {
        expression: expression.to_owned(),
        source_client_id: ctx.client_id(search_context.source())?,
    })
}
