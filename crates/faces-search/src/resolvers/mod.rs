//! Built-in keyword resolvers.

mod ancestors;
mod basic;
mod child;
mod id;
mod siblings;

pub use ancestors::{
    AllKeywordResolver, CompositeComponentKeywordResolver, FormKeywordResolver, NamingContainerKeywordResolver,
    ParentKeywordResolver, RootKeywordResolver,
};
pub use basic::{NoneKeywordResolver, ThisKeywordResolver};
pub use child::ChildKeywordResolver;
pub use id::IdKeywordResolver;
pub use siblings::{NextKeywordResolver, PreviousKeywordResolver};

use faces_core::{FacesContext, NodeId, Result};

/// Children of `node` that search keywords may select.
pub(crate) fn targetable_children(ctx: &FacesContext, node: NodeId) -> Result<Vec<NodeId>> {
    let tree = ctx.tree();
    let mut targetable = Vec::new();
    for kid in tree.children(node)? {
        if !tree.get(kid)?.is_untargetable() {
            targetable.push(kid);
        }
    }
    Ok(targetable)
}
