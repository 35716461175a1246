use indexmap::IndexMap;

use crate::component::{ComponentKind, EditableState};
use crate::error::Result;
use crate::repeat::{self, RepeatState};
use crate::{FacesContext, NodeId};

#[derive(Clone, Debug, PartialEq)]
pub enum ComponentState {
    Editable(EditableState),
    Repeat(RepeatState),
}

/// Stateful parts of a view keyed by client id, captured at the end of a request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
    entries: IndexMap<String, ComponentState>,
}

impl ViewState {
    pub fn get(&self, client_id: &str) -> Option<&ComponentState> {
        self.entries.get(client_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn stateful_nodes(ctx: &FacesContext) -> Result<Vec<NodeId>> {
    let root = ctx.view_root();
    let mut nodes = vec![root];
    nodes.extend(ctx.tree().descendants(root)?);
    Ok(nodes)
}

/// Captures input and iteration component state. Transient components are skipped.
pub fn save_view_state(ctx: &FacesContext) -> Result<ViewState> {
    let mut entries = IndexMap::new();
    for node in stateful_nodes(ctx)? {
        let component = ctx.tree().get(node)?;
        if component.is_transient() {
            continue;
        }
        let state = match component.kind() {
            ComponentKind::Input(input) => ComponentState::Editable(input.editable.clone()),
            ComponentKind::Repeat(_) => ComponentState::Repeat(repeat::save_state(ctx, node)?),
            _ => continue,
        };
        entries.insert(ctx.client_id(node)?, state);
    }
    Ok(ViewState { entries })
}

/// Applies a previously saved state onto a view with the same structure.
pub fn restore_view_state(ctx: &mut FacesContext, state: &ViewState) -> Result<()> {
    for node in stateful_nodes(ctx)? {
        let client_id = ctx.client_id(node)?;
        match state.entries.get(&client_id) {
            Some(ComponentState::Editable(editable)) => {
                if let Some(input) = ctx.tree_mut().get_mut(node)?.kind_mut().as_input_mut() {
                    input.editable = editable.clone();
                }
            }
            Some(ComponentState::Repeat(saved)) => {
                if ctx.tree().kind(node)?.as_repeat().is_some() {
                    repeat::restore_state(ctx, node, saved)?;
                }
            }
            None => {}
        }
    }
    Ok(())
}
