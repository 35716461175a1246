//! Component tree runtime: arena-backed components, naming-container scoped client ids,
//! id lookup, tree visiting, a small request lifecycle and the stateful iteration component.

pub mod collections;
pub mod component;
pub mod config;
pub mod context;
pub mod el;
pub mod error;
pub mod event;
pub mod find;
pub mod lifecycle;
pub mod render;
pub mod repeat;
pub mod state;
pub mod tree;
pub mod value;
pub mod visit;

mod client_id;

pub type NodeId = usize;

pub use component::{Attribute, Component, ComponentKind, EditableState, InputState, Listener};
pub use config::FacesConfig;
pub use context::{FacesContext, FacesMessage, Severity};
pub use el::{ExpressionEvaluator, PathEvaluator};
pub use error::{FacesError, Result};
pub use event::{queue_event, EventKind, FacesEvent, QueuedEvent};
pub use find::{invoke_on_component, ContextCallback};
pub use lifecycle::{Lifecycle, PhaseId};
pub use render::{MarkupWriter, ResponseWriter, SharedBuffer};
pub use repeat::{DataModel, IterationStatus, ListDataModel, ScalarDataModel, UIRepeat};
pub use state::{restore_view_state, save_view_state, ViewState};
pub use tree::ComponentTree;
pub use value::Value;
pub use visit::{visit_tree, FullVisitContext, PartialVisitContext, VisitContext, VisitHint, VisitIds, VisitResult};

#[cfg(test)]
#[path = "tests/tree_tests.rs"]
mod tree_tests;

#[cfg(test)]
#[path = "tests/visit_tests.rs"]
mod visit_tests;
