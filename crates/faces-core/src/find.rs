use crate::error::{FacesError, Result};
use crate::tree::ComponentTree;
use crate::{repeat, FacesContext, NodeId};

/// Callback handed the component found by an id or client id lookup.
pub type ContextCallback<'a> = dyn FnMut(&mut FacesContext, NodeId) -> Result<()> + 'a;

impl ComponentTree {
    /// Resolves a separator-delimited id path the way naming containers scope ids.
    ///
    /// A leading separator starts from the topmost ancestor of `base`; otherwise the search
    /// starts at the closest naming container enclosing `base` (inclusive). Every segment but
    /// the last has to name a naming container.
    pub fn find_component(&self, base: NodeId, expression: &str, separator: char) -> Result<Option<NodeId>> {
        if expression.is_empty() {
            return Err(FacesError::invalid_argument("search expression must not be empty"));
        }

        let (mut current, path) = match expression.strip_prefix(separator) {
            Some(rest) => (self.root_of(base)?, rest),
            None => {
                let start = match self.closest_naming_container(base, true)? {
                    Some(container) => container,
                    None => self.root_of(base)?,
                };
                (start, expression)
            }
        };

        let segments: Vec<&str> = path.split(separator).collect();
        let last = segments.len() - 1;
        for (i, segment) in segments.iter().enumerate() {
            let Some(found) = self.find_within(current, segment, i == 0)? else {
                return Ok(None);
            };
            if i < last && !self.get(found)?.is_naming_container() {
                return Err(FacesError::structural(format!(
                    "Intermediate identifier {segment} in search expression {expression} identifies a component that is not a naming container"
                )));
            }
            current = found;
        }
        Ok(Some(current))
    }

    fn find_within(&self, base: NodeId, id: &str, check_base: bool) -> Result<Option<NodeId>> {
        if check_base && self.get(base)?.id == id {
            return Ok(Some(base));
        }
        for kid in self.facets_and_children(base)? {
            let component = self.get(kid)?;
            if component.id == id {
                return Ok(Some(kid));
            }
            if !component.is_naming_container() {
                if let Some(found) = self.find_within(kid, id, false)? {
                    return Ok(Some(found));
                }
            }
        }
        Ok(None)
    }

    /// First descendant of `node` (facets and children, any depth) whose id is `id`.
    pub fn find_by_id(&self, node: NodeId, id: &str) -> Result<Option<NodeId>> {
        for kid in self.facets_and_children(node)? {
            if self.get(kid)?.id == id {
                return Ok(Some(kid));
            }
            if let Some(found) = self.find_by_id(kid, id)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }
}

/// Finds the component whose full client id is `client_id` beneath `node` and invokes
/// `callback` on it in the correct row context. Returns whether a match was found.
pub fn invoke_on_component(
    ctx: &mut FacesContext,
    node: NodeId,
    client_id: &str,
    callback: &mut ContextCallback<'_>,
) -> Result<bool> {
    if ctx.tree().get(node)?.kind.as_repeat().is_some() {
        return repeat::invoke_on_component(ctx, node, client_id, callback);
    }
    invoke_on_component_default(ctx, node, client_id, callback)
}

pub(crate) fn invoke_on_component_default(
    ctx: &mut FacesContext,
    node: NodeId,
    client_id: &str,
    callback: &mut ContextCallback<'_>,
) -> Result<bool> {
    if ctx.client_id(node)? == client_id {
        callback(ctx, node)?;
        return Ok(true);
    }
    for kid in ctx.tree().facets_and_children(node)? {
        if invoke_on_component(ctx, kid, client_id, callback)? {
            return Ok(true);
        }
    }
    Ok(false)
}
