use faces_core::{ComponentKind, FacesContext, FacesError, NodeId, Result};

use crate::context::{SearchExpressionContext, SearchExpressionHint, SearchKeywordContext};
use crate::keyword::SearchKeywordResolver;

/// Reports `target`, or marks the keyword resolved without a target.
fn invoke_or_settle(
    ctx: &mut FacesContext,
    keyword_context: &mut SearchKeywordContext<'_, '_>,
    target: Option<NodeId>,
) -> Result<()> {
    match target {
        Some(target) => keyword_context.invoke_context_callback(ctx, target),
        None => {
            keyword_context.set_keyword_resolved(true);
            Ok(())
        }
    }
}

/// `@parent`
#[derive(Clone, Copy, Debug, Default)]
pub struct ParentKeywordResolver;

impl SearchKeywordResolver for ParentKeywordResolver {
    fn is_resolver_for_keyword(&self, _context: &SearchExpressionContext, keyword: &str) -> bool {
        keyword == "parent"
    }

    fn resolve(
        &self,
        ctx: &mut FacesContext,
        keyword_context: &mut SearchKeywordContext<'_, '_>,
        current: NodeId,
        _keyword: &str,
    ) -> Result<()> {
        let parent = ctx.tree().parent(current)?;
        invoke_or_settle(ctx, keyword_context, parent)
    }
}

/// `@form`: closest enclosing form. Using it outside of a form is an error.
#[derive(Clone, Copy, Debug, Default)]
pub struct FormKeywordResolver;

impl SearchKeywordResolver for FormKeywordResolver {
    fn is_resolver_for_keyword(&self, _context: &SearchExpressionContext, keyword: &str) -> bool {
        keyword == "form"
    }

    fn resolve(
        &self,
        ctx: &mut FacesContext,
        keyword_context: &mut SearchKeywordContext<'_, '_>,
        current: NodeId,
        _keyword: &str,
    ) -> Result<()> {
        match ctx.tree().closest_ancestor(current, ComponentKind::is_form)? {
            Some(form) => keyword_context.invoke_context_callback(ctx, form),
            None => Err(FacesError::structural(format!(
                "The component \"{}\" needs to be placed in a form",
                ctx.client_id(current)?
            ))),
        }
    }

    fn is_passthrough(&self, context: &SearchExpressionContext, _keyword: &str) -> bool {
        context.has_hint(SearchExpressionHint::ResolveClientSide)
    }
}

/// `@composite`: closest enclosing composite component.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompositeComponentKeywordResolver;

impl SearchKeywordResolver for CompositeComponentKeywordResolver {
    fn is_resolver_for_keyword(&self, _context: &SearchExpressionContext, keyword: &str) -> bool {
        keyword == "composite"
    }

    fn resolve(
        &self,
        ctx: &mut FacesContext,
        keyword_context: &mut SearchKeywordContext<'_, '_>,
        current: NodeId,
        _keyword: &str,
    ) -> Result<()> {
        let composite = ctx
            .tree()
            .closest_ancestor(current, |kind| matches!(kind, ComponentKind::Composite))?;
        invoke_or_settle(ctx, keyword_context, composite)
    }
}

/// `@namingcontainer`: closest naming container above the current component.
#[derive(Clone, Copy, Debug, Default)]
pub struct NamingContainerKeywordResolver;

impl SearchKeywordResolver for NamingContainerKeywordResolver {
    fn is_resolver_for_keyword(&self, _context: &SearchExpressionContext, keyword: &str) -> bool {
        keyword == "namingcontainer"
    }

    fn resolve(
        &self,
        ctx: &mut FacesContext,
        keyword_context: &mut SearchKeywordContext<'_, '_>,
        current: NodeId,
        _keyword: &str,
    ) -> Result<()> {
        let container = ctx.tree().closest_naming_container(current, false)?;
        invoke_or_settle(ctx, keyword_context, container)
    }
}

/// `@root`: the view root.
#[derive(Clone, Copy, Debug, Default)]
pub struct RootKeywordResolver;

impl SearchKeywordResolver for RootKeywordResolver {
    fn is_resolver_for_keyword(&self, _context: &SearchExpressionContext, keyword: &str) -> bool {
        keyword == "root"
    }

    fn resolve(
        &self,
        ctx: &mut FacesContext,
        keyword_context: &mut SearchKeywordContext<'_, '_>,
        _current: NodeId,
        _keyword: &str,
    ) -> Result<()> {
        let root = ctx.view_root();
        keyword_context.invoke_context_callback(ctx, root)
    }
}

/// `@all`: the topmost ancestor, standing for the whole view.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllKeywordResolver;

impl SearchKeywordResolver for AllKeywordResolver {
    fn is_resolver_for_keyword(&self, _context: &SearchExpressionContext, keyword: &str) -> bool {
        keyword == "all"
    }

    fn resolve(
        &self,
        ctx: &mut FacesContext,
        keyword_context: &mut SearchKeywordContext<'_, '_>,
        current: NodeId,
        _keyword: &str,
    ) -> Result<()> {
        let top = match ctx.tree().parent(current)? {
            Some(_) => Some(ctx.tree().root_of(current)?),
            None => None,
        };
        invoke_or_settle(ctx, keyword_context, top)
    }

    fn is_passthrough(&self, _context: &SearchExpressionContext, _keyword: &str) -> bool {
        true
    }

    fn is_leaf(&self, _context: &SearchExpressionContext, _keyword: &str) -> bool {
        true
    }
}
