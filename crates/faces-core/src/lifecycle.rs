use log::{debug, warn};

use crate::component::ComponentKind;
use crate::context::Severity;
use crate::error::Result;
use crate::event::{broadcast_events, queue_event, FacesEvent};
use crate::render::encode_all;
use crate::value::Value;
use crate::{repeat, FacesContext, NodeId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PhaseId {
    RestoreView,
    ApplyRequestValues,
    ProcessValidations,
    UpdateModelValues,
    InvokeApplication,
    RenderResponse,
}

pub const REQUIRED_MESSAGE: &str = "Validation Error: Value is required.";

/// Applies submitted request parameters to `node` and its subtree.
pub fn process_decodes(ctx: &mut FacesContext, node: NodeId) -> Result<()> {
    if !ctx.tree().get(node)?.is_rendered() {
        return Ok(());
    }
    if ctx.tree().kind(node)?.as_repeat().is_some() {
        return repeat::process_decodes(ctx, node);
    }
    for kid in ctx.tree().facets_and_children(node)? {
        process_decodes(ctx, kid)?;
    }
    decode(ctx, node)
}

pub fn process_validators(ctx: &mut FacesContext, node: NodeId) -> Result<()> {
    if !ctx.tree().get(node)?.is_rendered() {
        return Ok(());
    }
    if ctx.tree().kind(node)?.as_repeat().is_some() {
        return repeat::process_validators(ctx, node);
    }
    for kid in ctx.tree().facets_and_children(node)? {
        process_validators(ctx, kid)?;
    }
    validate(ctx, node)
}

pub fn process_updates(ctx: &mut FacesContext, node: NodeId) -> Result<()> {
    if !ctx.tree().get(node)?.is_rendered() {
        return Ok(());
    }
    if ctx.tree().kind(node)?.as_repeat().is_some() {
        return repeat::process_updates(ctx, node);
    }
    for kid in ctx.tree().facets_and_children(node)? {
        process_updates(ctx, kid)?;
    }
    update_model(ctx, node)
}

/// Runs the per-phase work for a single component, used for rows of an iteration component.
pub(crate) fn process_phase(ctx: &mut FacesContext, node: NodeId, phase: PhaseId) -> Result<()> {
    match phase {
        PhaseId::ApplyRequestValues => process_decodes(ctx, node),
        PhaseId::ProcessValidations => process_validators(ctx, node),
        PhaseId::UpdateModelValues => process_updates(ctx, node),
        PhaseId::RenderResponse => encode_all(ctx, node),
        PhaseId::RestoreView | PhaseId::InvokeApplication => Ok(()),
    }
}

fn decode(ctx: &mut FacesContext, node: NodeId) -> Result<()> {
    let (editable, command) = match ctx.tree().kind(node)? {
        ComponentKind::Input(_) => (true, false),
        ComponentKind::Command => (false, true),
        _ => return Ok(()),
    };
    let client_id = ctx.client_id(node)?;
    let Some(submitted) = ctx.request_parameter(&client_id).map(str::to_string) else {
        return Ok(());
    };
    if editable {
        debug!("decoded {client_id}={submitted}");
        if let Some(input) = ctx.tree_mut().get_mut(node)?.kind_mut().as_input_mut() {
            input.editable.submitted_value = Some(Value::Str(submitted));
        }
    } else if command {
        debug!("activated {client_id}");
        queue_event(ctx, FacesEvent::action(node))?;
    }
    Ok(())
}

fn validate(ctx: &mut FacesContext, node: NodeId) -> Result<()> {
    let Some(input) = ctx.tree().kind(node)?.as_input() else {
        return Ok(());
    };
    let Some(submitted) = input.editable.submitted_value.clone() else {
        return Ok(());
    };
    let required = input.required;
    let previous = if input.editable.local_value_set {
        input.editable.value.clone()
    } else {
        ctx.attribute_value(node, "value")?.unwrap_or_default()
    };

    if required && submitted.is_empty() {
        let client_id = ctx.client_id(node)?;
        if let Some(input) = ctx.tree_mut().get_mut(node)?.kind_mut().as_input_mut() {
            input.editable.valid = false;
        }
        ctx.add_message(Some(client_id), Severity::Error, REQUIRED_MESSAGE);
        return Ok(());
    }

    if let Some(input) = ctx.tree_mut().get_mut(node)?.kind_mut().as_input_mut() {
        input.editable.value = submitted.clone();
        input.editable.local_value_set = true;
        input.editable.submitted_value = None;
        input.editable.valid = true;
    }
    if previous != submitted {
        queue_event(ctx, FacesEvent::value_change(node, previous, submitted))?;
    }
    Ok(())
}

fn update_model(ctx: &mut FacesContext, node: NodeId) -> Result<()> {
    let Some(input) = ctx.tree().kind(node)?.as_input() else {
        return Ok(());
    };
    if !input.editable.valid || !input.editable.local_value_set {
        return Ok(());
    }
    let local = input.editable.value.clone();
    if let Some(expression) = ctx.attribute_expression(node, "value")? {
        if let Err(err) = ctx.assign(&expression, local) {
            let client_id = ctx.client_id(node)?;
            warn!("model update for {client_id} failed: {err}");
            if let Some(input) = ctx.tree_mut().get_mut(node)?.kind_mut().as_input_mut() {
                input.editable.valid = false;
            }
            ctx.add_message(Some(client_id), Severity::Error, err.to_string());
            return Ok(());
        }
    }
    if let Some(input) = ctx.tree_mut().get_mut(node)?.kind_mut().as_input_mut() {
        input.editable.value = Value::Null;
        input.editable.local_value_set = false;
    }
    Ok(())
}

/// Drives a postback through the execute phases and the render phase.
#[derive(Clone, Copy, Debug, Default)]
pub struct Lifecycle;

impl Lifecycle {
    pub fn new() -> Self {
        Self
    }

    /// Applies request values, validates, updates the model and invokes the application.
    /// Validation errors skip straight to rendering.
    pub fn execute(&self, ctx: &mut FacesContext) -> Result<()> {
        let root = ctx.view_root();
        let phases: [(PhaseId, fn(&mut FacesContext, NodeId) -> Result<()>); 4] = [
            (PhaseId::ApplyRequestValues, process_decodes),
            (PhaseId::ProcessValidations, process_validators),
            (PhaseId::UpdateModelValues, process_updates),
            (PhaseId::InvokeApplication, |_, _| Ok(())),
        ];
        for (phase, run) in phases {
            if ctx.is_render_response() {
                debug!("skipping {phase:?}");
                break;
            }
            ctx.set_phase(phase);
            run(ctx, root)?;
            broadcast_events(ctx, phase)?;
            if phase == PhaseId::ProcessValidations && ctx.has_error_messages() {
                ctx.render_response();
            }
        }
        Ok(())
    }

    pub fn render(&self, ctx: &mut FacesContext) -> Result<()> {
        ctx.set_phase(PhaseId::RenderResponse);
        let root = ctx.view_root();
        encode_all(ctx, root)
    }
}
