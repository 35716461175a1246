use faces_core::{FacesContext, NodeId, Result};

/// Collects every component a lookup or search callback is handed.
#[derive(Debug, Default)]
pub struct Recorder {
    nodes: Vec<NodeId>,
    client_ids: Vec<String>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callback recording the node and its client id at the time of the call, which
    /// includes the active row of any enclosing iteration component.
    pub fn callback(&mut self) -> impl FnMut(&mut FacesContext, NodeId) -> Result<()> + '_ {
        move |ctx: &mut FacesContext, node: NodeId| {
            self.client_ids.push(ctx.client_id(node)?);
            self.nodes.push(node);
            Ok(())
        }
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn client_ids(&self) -> &[String] {
        &self.client_ids
    }

    /// The only recorded node, if exactly one was recorded.
    pub fn single(&self) -> Option<NodeId> {
        match self.nodes.as_slice() {
            [node] => Some(*node),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.client_ids.clear();
    }
}
