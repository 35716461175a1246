use crate::component::ComponentKind;
use crate::error::Result;
use crate::tree::ComponentTree;
use crate::NodeId;

impl ComponentTree {
    /// Client id of `node` with the row of an active iteration component appended to its
    /// own id, so the repeat itself reads `data:3` while row 3 is current.
    pub fn client_id(&self, node: NodeId, separator: char) -> Result<String> {
        let base = self.base_client_id(node, separator)?;
        match self.get(node)?.kind.as_repeat().and_then(|repeat| repeat.row_index()) {
            Some(row) => Ok(format!("{base}{separator}{row}")),
            None => Ok(base),
        }
    }

    /// Client id ignoring the row of `node` itself. Ancestor rows still apply.
    pub fn base_client_id(&self, node: NodeId, separator: char) -> Result<String> {
        let component = self.get(node)?;
        if let Some(cached) = component.client_id.borrow().as_ref() {
            return Ok(cached.clone());
        }

        let mut client_id = String::new();
        if let Some(container) = self.closest_naming_container(node, false)? {
            let prefix = self.container_prefix(container, separator)?;
            if !prefix.is_empty() {
                client_id.push_str(&prefix);
                client_id.push(separator);
            }
        }
        client_id.push_str(&component.id);
        *component.client_id.borrow_mut() = Some(client_id.clone());
        Ok(client_id)
    }

    /// The part a naming container contributes to its descendants' client ids.
    pub fn container_prefix(&self, container: NodeId, separator: char) -> Result<String> {
        match &self.get(container)?.kind {
            ComponentKind::Form { prepend_id: false } => {
                // Skip the form but keep whatever encloses it.
                match self.closest_naming_container(container, false)? {
                    Some(outer) => self.container_prefix(outer, separator),
                    None => Ok(String::new()),
                }
            }
            _ => self.client_id(container, separator),
        }
    }

    /// Nearest naming container above `node`, or `node` itself when `inclusive`.
    pub fn closest_naming_container(&self, node: NodeId, inclusive: bool) -> Result<Option<NodeId>> {
        let mut current = if inclusive {
            Some(node)
        } else {
            self.get(node)?.parent
        };
        while let Some(candidate) = current {
            let component = self.get(candidate)?;
            if component.kind.is_naming_container() {
                return Ok(Some(candidate));
            }
            current = component.parent;
        }
        Ok(None)
    }

    /// Nearest strict ancestor matching `predicate`.
    pub fn closest_ancestor(
        &self,
        node: NodeId,
        predicate: impl Fn(&ComponentKind) -> bool,
    ) -> Result<Option<NodeId>> {
        let mut current = self.get(node)?.parent;
        while let Some(candidate) = current {
            let component = self.get(candidate)?;
            if predicate(&component.kind) {
                return Ok(Some(candidate));
            }
            current = component.parent;
        }
        Ok(None)
    }
}
