use std::cell::Cell;

use crate::component::{Component, ComponentKind};
use crate::error::{FacesError, Result};
use crate::NodeId;

/// Arena of components addressed by [`NodeId`]. Removed slots stay `None`.
pub struct ComponentTree {
    nodes: Vec<Option<Component>>,
    id_prefix: String,
    next_generated_id: Cell<usize>,
}

impl Default for ComponentTree {
    fn default() -> Self {
        Self::new("j_id")
    }
}

impl ComponentTree {
    pub fn new(id_prefix: impl Into<String>) -> Self {
        Self {
            nodes: Vec::new(),
            id_prefix: id_prefix.into(),
            next_generated_id: Cell::new(0),
        }
    }

    /// Adds a detached component. An empty id is replaced by a synthesized one.
    pub fn create(&mut self, mut component: Component) -> NodeId {
        if component.id.is_empty() {
            component.id = self.generate_id();
        }
        component.parent = None;
        component.children.clear();
        component.facets.clear();
        let id = self.nodes.len();
        self.nodes.push(Some(component));
        id
    }

    fn generate_id(&self) -> String {
        let next = self.next_generated_id.get();
        self.next_generated_id.set(next + 1);
        format!("{}{}", self.id_prefix, next)
    }

    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        matches!(self.nodes.get(id), Some(Some(_)))
    }

    pub fn get(&self, id: NodeId) -> Result<&Component> {
        self.nodes
            .get(id)
            .and_then(Option::as_ref)
            .ok_or(FacesError::MissingNode { id })
    }

    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut Component> {
        self.nodes
            .get_mut(id)
            .and_then(Option::as_mut)
            .ok_or(FacesError::MissingNode { id })
    }

    pub fn with_component<R>(&mut self, id: NodeId, f: impl FnOnce(&mut Component) -> R) -> Result<R> {
        Ok(f(self.get_mut(id)?))
    }

    pub fn kind(&self, id: NodeId) -> Result<&ComponentKind> {
        Ok(&self.get(id)?.kind)
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.get(id)?.parent)
    }

    pub fn children(&self, id: NodeId) -> Result<Vec<NodeId>> {
        Ok(self.get(id)?.children.clone())
    }

    /// Facets in insertion order followed by children in order.
    pub fn facets_and_children(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let component = self.get(id)?;
        Ok(component
            .facets
            .values()
            .copied()
            .chain(component.children.iter().copied())
            .collect())
    }

    pub fn root_of(&self, id: NodeId) -> Result<NodeId> {
        let mut current = id;
        while let Some(parent) = self.get(current)?.parent {
            current = parent;
        }
        Ok(current)
    }

    pub fn ancestors(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let mut ancestors = Vec::new();
        let mut current = self.get(id)?.parent;
        while let Some(node) = current {
            ancestors.push(node);
            current = self.get(node)?.parent;
        }
        Ok(ancestors)
    }

    /// Appends `child` to `parent`. A child `parent` already holds moves to the end.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let index = self.children_len_without(parent, child)?;
        self.insert_child(parent, index, child)
    }

    /// Inserts `child` at `index`, counted as if `child` were already detached.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<()> {
        self.check_attachable(parent, child)?;
        let len = self.children_len_without(parent, child)?;
        if index > len {
            return Err(FacesError::invalid_argument(format!(
                "child index {index} out of bounds for {len} children"
            )));
        }
        self.detach(child)?;
        self.get_mut(parent)?.children.insert(index, child);
        self.get_mut(child)?.parent = Some(parent);
        self.reset_client_ids(child)
    }

    fn children_len_without(&self, parent: NodeId, child: NodeId) -> Result<usize> {
        let children = &self.get(parent)?.children;
        Ok(children.len() - usize::from(children.contains(&child)))
    }

    /// Installs `child` as the named facet of `parent`, detaching any previous facet.
    pub fn set_facet(&mut self, parent: NodeId, name: impl Into<String>, child: NodeId) -> Result<()> {
        self.check_attachable(parent, child)?;
        self.detach(child)?;
        let previous = self.get_mut(parent)?.facets.insert(name.into(), child);
        if let Some(previous) = previous.filter(|previous| *previous != child) {
            self.get_mut(previous)?.parent = None;
            self.reset_client_ids(previous)?;
        }
        self.get_mut(child)?.parent = Some(parent);
        self.reset_client_ids(child)
    }

    pub fn facet(&self, parent: NodeId, name: &str) -> Result<Option<NodeId>> {
        Ok(self.get(parent)?.facets.get(name).copied())
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<bool> {
        let parent_node = self.get_mut(parent)?;
        let Some(position) = parent_node.children.iter().position(|c| *c == child) else {
            return Ok(false);
        };
        parent_node.children.remove(position);
        self.get_mut(child)?.parent = None;
        self.reset_client_ids(child)?;
        Ok(true)
    }

    /// Detaches `id` and drops it together with its whole subtree.
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        self.detach(id)?;
        let mut pending = vec![id];
        while let Some(node) = pending.pop() {
            let slot = self.nodes.get_mut(node).ok_or(FacesError::MissingNode { id: node })?;
            if let Some(component) = slot.take() {
                pending.extend(component.facets.values().copied());
                pending.extend(component.children);
            }
        }
        Ok(())
    }

    pub fn set_id(&mut self, node: NodeId, id: impl Into<String>) -> Result<()> {
        let id = id.into();
        if id.is_empty() {
            return Err(FacesError::invalid_argument("component id must not be empty"));
        }
        self.get_mut(node)?.id = id;
        self.reset_client_ids(node)
    }

    /// Drops the cached client id of `node` and every descendant.
    pub fn reset_client_ids(&self, node: NodeId) -> Result<()> {
        let mut pending = vec![node];
        while let Some(current) = pending.pop() {
            let component = self.get(current)?;
            component.clear_cached_client_id();
            pending.extend(component.facets.values().copied());
            pending.extend(component.children.iter().copied());
        }
        Ok(())
    }

    /// Like [`reset_client_ids`](Self::reset_client_ids) but leaves `node` itself alone.
    pub fn reset_descendant_client_ids(&self, node: NodeId) -> Result<()> {
        for kid in self.facets_and_children(node)? {
            self.reset_client_ids(kid)?;
        }
        Ok(())
    }

    /// Every descendant of `node` in depth-first order, facets before children.
    pub fn descendants(&self, node: NodeId) -> Result<Vec<NodeId>> {
        let mut out = Vec::new();
        let mut pending = self.facets_and_children(node)?;
        pending.reverse();
        while let Some(current) = pending.pop() {
            out.push(current);
            let mut kids = self.facets_and_children(current)?;
            kids.reverse();
            pending.extend(kids);
        }
        Ok(out)
    }

    fn check_attachable(&self, parent: NodeId, child: NodeId) -> Result<()> {
        self.get(child)?;
        if parent == child || self.ancestors(parent)?.contains(&child) {
            return Err(FacesError::structural(format!(
                "cannot attach node {child} beneath its own descendant {parent}"
            )));
        }
        Ok(())
    }

    fn detach(&mut self, child: NodeId) -> Result<()> {
        let Some(parent) = self.get(child)?.parent else {
            return Ok(());
        };
        let parent_node = self.get_mut(parent)?;
        parent_node.children.retain(|c| *c != child);
        parent_node.facets.retain(|_, facet| *facet != child);
        self.get_mut(child)?.parent = None;
        Ok(())
    }

    pub fn dump_tree(&self, root: Option<NodeId>) -> String {
        let mut output = String::new();
        match root {
            Some(root) => self.dump_node(&mut output, root, 0, None),
            None => output.push_str("(no root)\n"),
        }
        output
    }

    fn dump_node(&self, output: &mut String, id: NodeId, depth: usize, facet: Option<&str>) {
        let indent = "  ".repeat(depth);
        match self.nodes.get(id) {
            Some(Some(component)) => {
                let label = facet.map(|name| format!(" facet={name}")).unwrap_or_default();
                output.push_str(&format!(
                    "{}[{}] {} id={}{}\n",
                    indent,
                    id,
                    component.kind.name(),
                    component.id,
                    label
                ));
                for (name, facet_id) in &component.facets {
                    self.dump_node(output, *facet_id, depth + 1, Some(name));
                }
                for child in &component.children {
                    self.dump_node(output, *child, depth + 1, None);
                }
            }
            _ => output.push_str(&format!("{}[{}] (missing)\n", indent, id)),
        }
    }
}
