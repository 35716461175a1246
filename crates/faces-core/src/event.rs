use crate::error::Result;
use crate::lifecycle::PhaseId;
use crate::value::Value;
use crate::{repeat, FacesContext, NodeId};

#[derive(Clone, Debug, PartialEq)]
pub enum EventKind {
    Action,
    ValueChange { old: Value, new: Value },
}

/// An event raised by a component.
#[derive(Clone, Debug, PartialEq)]
pub struct FacesEvent {
    source: NodeId,
    kind: EventKind,
    phase: PhaseId,
}

impl FacesEvent {
    pub fn new(source: NodeId, kind: EventKind, phase: PhaseId) -> Self {
        Self { source, kind, phase }
    }

    pub fn action(source: NodeId) -> Self {
        Self::new(source, EventKind::Action, PhaseId::InvokeApplication)
    }

    pub fn value_change(source: NodeId, old: Value, new: Value) -> Self {
        Self::new(source, EventKind::ValueChange { old, new }, PhaseId::ProcessValidations)
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    pub fn phase(&self) -> PhaseId {
        self.phase
    }
}

/// A queued event. Each iteration component between the source and the root wraps the
/// event with the row that was current when it was queued.
#[derive(Clone, Debug, PartialEq)]
pub enum QueuedEvent {
    Component(FacesEvent),
    Indexed {
        owner: NodeId,
        index: Option<usize>,
        target: Box<QueuedEvent>,
    },
}

impl QueuedEvent {
    pub fn event(&self) -> &FacesEvent {
        match self {
            QueuedEvent::Component(event) => event,
            QueuedEvent::Indexed { target, .. } => target.event(),
        }
    }

    pub fn phase(&self) -> PhaseId {
        self.event().phase()
    }
}

/// Queues `event`, tagging it with the active row of every enclosing iteration component.
pub fn queue_event(ctx: &mut FacesContext, event: FacesEvent) -> Result<()> {
    let mut current = Some(event.source());
    let mut queued = QueuedEvent::Component(event);
    while let Some(node) = current {
        let component = ctx.tree().get(node)?;
        if let Some(repeat) = component.kind().as_repeat() {
            queued = QueuedEvent::Indexed {
                owner: node,
                index: repeat.row_index(),
                target: Box::new(queued),
            };
        }
        current = component.parent();
    }
    ctx.events.push(queued);
    Ok(())
}

pub fn queued_events(ctx: &FacesContext) -> &[QueuedEvent] {
    &ctx.events
}

/// Delivers every queued event for `phase`, including events queued by listeners meanwhile.
pub fn broadcast_events(ctx: &mut FacesContext, phase: PhaseId) -> Result<()> {
    loop {
        let (ready, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut ctx.events)
            .into_iter()
            .partition(|event| event.phase() == phase);
        ctx.events = rest;
        if ready.is_empty() {
            return Ok(());
        }
        for event in &ready {
            broadcast(ctx, event)?;
        }
    }
}

/// Delivers one event, restoring row context for indexed wrappers first.
pub fn broadcast(ctx: &mut FacesContext, event: &QueuedEvent) -> Result<()> {
    match event {
        QueuedEvent::Component(event) => {
            let listeners = ctx.tree().get(event.source())?.listeners().to_vec();
            for listener in listeners {
                listener(ctx, event)?;
            }
            Ok(())
        }
        QueuedEvent::Indexed { owner, index, target } => repeat::broadcast_indexed(ctx, *owner, *index, target),
    }
}
