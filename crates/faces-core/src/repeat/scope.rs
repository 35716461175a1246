use std::ops::{Deref, DerefMut};

use log::warn;

use super::{set_row_index, var_names};
use crate::error::Result;
use crate::value::Value;
use crate::{FacesContext, NodeId};

/// Holds an iteration component's row cursor for the duration of a pass. On drop the
/// cursor goes back to `restore_index` and the request-scope values shadowed by `var`
/// and `varStatus` are put back, whether or not the pass succeeded.
pub(crate) struct RowScope<'a> {
    ctx: &'a mut FacesContext,
    repeat: NodeId,
    restore_index: Option<usize>,
    reposition: bool,
    shadowed: Vec<(String, Option<Value>)>,
}

impl<'a> RowScope<'a> {
    pub(crate) fn enter(
        ctx: &'a mut FacesContext,
        repeat: NodeId,
        restore_index: Option<usize>,
        reposition: bool,
    ) -> Result<Self> {
        let (var, var_status) = var_names(ctx, repeat)?;
        let shadowed = [var, var_status]
            .into_iter()
            .flatten()
            .map(|name| {
                let previous = ctx.request_scope().get(&name).cloned();
                (name, previous)
            })
            .collect();
        Ok(Self {
            ctx,
            repeat,
            restore_index,
            reposition,
            shadowed,
        })
    }
}

impl Deref for RowScope<'_> {
    type Target = FacesContext;

    fn deref(&self) -> &FacesContext {
        self.ctx
    }
}

impl DerefMut for RowScope<'_> {
    fn deref_mut(&mut self) -> &mut FacesContext {
        self.ctx
    }
}

impl Drop for RowScope<'_> {
    fn drop(&mut self) {
        if self.reposition {
            if let Err(err) = set_row_index(self.ctx, self.repeat, self.restore_index) {
                warn!("failed to restore row {:?} of node {}: {err}", self.restore_index, self.repeat);
            }
        }
        let scope = self.ctx.request_scope_mut();
        for (name, previous) in self.shadowed.drain(..) {
            match previous {
                Some(value) => {
                    scope.insert(name, value);
                }
                None => {
                    scope.shift_remove(&name);
                }
            }
        }
    }
}
