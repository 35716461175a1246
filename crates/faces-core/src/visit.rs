//! Tree visiting. [`visit_tree`] walks a subtree, letting iteration components visit
//! their children once per row, and asks a [`VisitContext`] which nodes to report.

use indexmap::IndexSet;

use crate::collections::map::{HashMap, HashSet};
use crate::error::{FacesError, Result};
use crate::{repeat, FacesContext, NodeId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisitHint {
    SkipUnrendered,
    SkipTransient,
    /// Visit the children of iteration components once, without positioning rows.
    SkipIteration,
    ExecuteLifecycle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisitResult {
    /// Continue into the children of the visited component.
    Accept,
    /// Skip the children but keep visiting siblings.
    Reject,
    /// Stop the whole traversal.
    Complete,
}

/// Either every id or a concrete list of client ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VisitIds {
    All,
    Ids(Vec<String>),
}

impl VisitIds {
    pub fn is_empty(&self) -> bool {
        match self {
            VisitIds::All => false,
            VisitIds::Ids(ids) => ids.is_empty(),
        }
    }
}

pub type VisitCallback<'a> = dyn FnMut(&mut FacesContext, NodeId) -> Result<VisitResult> + 'a;

pub trait VisitContext {
    fn hints(&self) -> &HashSet<VisitHint>;

    fn ids_to_visit(&self) -> VisitIds;

    /// Client ids of targets located beneath the naming container `component`.
    fn subtree_ids_to_visit(&self, ctx: &FacesContext, component: NodeId) -> Result<VisitIds>;

    fn invoke_visit_callback(
        &mut self,
        ctx: &mut FacesContext,
        component: NodeId,
        callback: &mut VisitCallback<'_>,
    ) -> Result<VisitResult>;

    fn has_hint(&self, hint: VisitHint) -> bool {
        self.hints().contains(&hint)
    }
}

fn hint_set(hints: impl IntoIterator<Item = VisitHint>) -> HashSet<VisitHint> {
    let mut set = HashSet::default();
    set.extend(hints);
    set
}

/// Visits every component.
#[derive(Debug, Default)]
pub struct FullVisitContext {
    hints: HashSet<VisitHint>,
}

impl FullVisitContext {
    pub fn new(hints: impl IntoIterator<Item = VisitHint>) -> Self {
        Self {
            hints: hint_set(hints),
        }
    }
}

impl VisitContext for FullVisitContext {
    fn hints(&self) -> &HashSet<VisitHint> {
        &self.hints
    }

    fn ids_to_visit(&self) -> VisitIds {
        VisitIds::All
    }

    fn subtree_ids_to_visit(&self, ctx: &FacesContext, component: NodeId) -> Result<VisitIds> {
        require_naming_container(ctx, component)?;
        Ok(VisitIds::All)
    }

    fn invoke_visit_callback(
        &mut self,
        ctx: &mut FacesContext,
        component: NodeId,
        callback: &mut VisitCallback<'_>,
    ) -> Result<VisitResult> {
        callback(ctx, component)
    }
}

/// Visits only the components whose client ids were requested, completing as soon as
/// all of them have been seen.
#[derive(Debug)]
pub struct PartialVisitContext {
    hints: HashSet<VisitHint>,
    client_ids: IndexSet<String>,
    ids: HashSet<String>,
    unvisited: IndexSet<String>,
    subtree_client_ids: HashMap<String, Vec<String>>,
    separator: char,
}

impl PartialVisitContext {
    pub fn new<I, S>(client_ids: I, separator: char, hints: impl IntoIterator<Item = VisitHint>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let client_ids: IndexSet<String> = client_ids.into_iter().map(Into::into).collect();
        let mut ids = HashSet::default();
        let mut subtree_client_ids: HashMap<String, Vec<String>> = HashMap::default();
        for client_id in &client_ids {
            let local = client_id.rsplit(separator).next().unwrap_or(client_id.as_str());
            ids.insert(local.to_string());
            for (at, _) in client_id.match_indices(separator) {
                subtree_client_ids
                    .entry(client_id[..at].to_string())
                    .or_default()
                    .push(client_id.clone());
            }
        }
        Self {
            hints: hint_set(hints),
            unvisited: client_ids.clone(),
            client_ids,
            ids,
            subtree_client_ids,
            separator,
        }
    }

    /// Requested client ids not visited yet.
    pub fn unvisited(&self) -> impl Iterator<Item = &str> {
        self.unvisited.iter().map(String::as_str)
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    fn visit_id(&self, ctx: &FacesContext, component: NodeId) -> Result<Option<String>> {
        if !self.ids.contains(ctx.tree().get(component)?.id()) {
            return Ok(None);
        }
        let client_id = ctx.client_id(component)?;
        Ok(self.client_ids.contains(&client_id).then_some(client_id))
    }
}

impl VisitContext for PartialVisitContext {
    fn hints(&self) -> &HashSet<VisitHint> {
        &self.hints
    }

    fn ids_to_visit(&self) -> VisitIds {
        VisitIds::Ids(self.client_ids.iter().cloned().collect())
    }

    fn subtree_ids_to_visit(&self, ctx: &FacesContext, component: NodeId) -> Result<VisitIds> {
        require_naming_container(ctx, component)?;
        let client_id = ctx.client_id(component)?;
        Ok(VisitIds::Ids(
            self.subtree_client_ids
                .get(&client_id)
                .cloned()
                .unwrap_or_default(),
        ))
    }

    fn invoke_visit_callback(
        &mut self,
        ctx: &mut FacesContext,
        component: NodeId,
        callback: &mut VisitCallback<'_>,
    ) -> Result<VisitResult> {
        let Some(client_id) = self.visit_id(ctx, component)? else {
            return Ok(VisitResult::Accept);
        };
        let result = callback(ctx, component)?;
        self.unvisited.shift_remove(&client_id);
        if self.unvisited.is_empty() {
            return Ok(VisitResult::Complete);
        }
        Ok(result)
    }
}

fn require_naming_container(ctx: &FacesContext, component: NodeId) -> Result<()> {
    if ctx.tree().get(component)?.is_naming_container() {
        Ok(())
    } else {
        Err(FacesError::invalid_argument(format!(
            "component {} is not a naming container",
            ctx.client_id(component)?
        )))
    }
}

/// Visits `node` and its subtree. Returns `true` once the traversal is complete.
pub fn visit_tree(
    ctx: &mut FacesContext,
    visit_context: &mut dyn VisitContext,
    node: NodeId,
    callback: &mut VisitCallback<'_>,
) -> Result<bool> {
    if ctx.tree().get(node)?.kind.as_repeat().is_some() {
        return repeat::visit_tree(ctx, visit_context, node, callback);
    }

    if !is_visitable(ctx, visit_context, node)? {
        return Ok(false);
    }
    match visit_context.invoke_visit_callback(ctx, node, callback)? {
        VisitResult::Complete => return Ok(true),
        VisitResult::Reject => return Ok(false),
        VisitResult::Accept => {}
    }

    let kids = ctx.tree().facets_and_children(node)?;
    if kids.is_empty() {
        return Ok(false);
    }
    let component = ctx.tree().get(node)?;
    if component.kind.prepends_id() && visit_context.subtree_ids_to_visit(ctx, node)?.is_empty() {
        return Ok(false);
    }
    for kid in kids {
        if visit_tree(ctx, visit_context, kid, callback)? {
            return Ok(true);
        }
    }
    Ok(false)
}

pub(crate) fn is_visitable(ctx: &FacesContext, visit_context: &dyn VisitContext, node: NodeId) -> Result<bool> {
    let component = ctx.tree().get(node)?;
    if visit_context.has_hint(VisitHint::SkipUnrendered) && !component.is_rendered() {
        return Ok(false);
    }
    if visit_context.has_hint(VisitHint::SkipTransient) && component.is_transient() {
        return Ok(false);
    }
    Ok(true)
}
