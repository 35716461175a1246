use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::component::{Attribute, Component, ComponentKind};
use crate::config::FacesConfig;
use crate::el::{ExpressionEvaluator, PathEvaluator, Scope};
use crate::error::{FacesError, Result};
use crate::event::QueuedEvent;
use crate::lifecycle::PhaseId;
use crate::render::ResponseWriter;
use crate::tree::ComponentTree;
use crate::value::Value;
use crate::NodeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warn,
    Error,
    Fatal,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FacesMessage {
    pub client_id: Option<String>,
    pub severity: Severity,
    pub summary: String,
}

/// Per-request state: the view, request scope and parameters, queued messages and events.
pub struct FacesContext {
    tree: ComponentTree,
    view_root: NodeId,
    config: FacesConfig,
    request_scope: Scope,
    request_parameters: IndexMap<String, String>,
    messages: Vec<FacesMessage>,
    phase: PhaseId,
    render_response: bool,
    pub(crate) events: Vec<QueuedEvent>,
    response_writer: Option<Box<dyn ResponseWriter>>,
    evaluator: Rc<dyn ExpressionEvaluator>,
}

impl FacesContext {
    pub fn new(config: FacesConfig) -> Self {
        let mut tree = ComponentTree::new(config.id_prefix());
        let view_root = tree.create(Component::new(ComponentKind::ViewRoot));
        Self {
            tree,
            view_root,
            config,
            request_scope: Scope::new(),
            request_parameters: IndexMap::new(),
            messages: Vec::new(),
            phase: PhaseId::RestoreView,
            render_response: false,
            events: Vec::new(),
            response_writer: None,
            evaluator: Rc::new(PathEvaluator),
        }
    }

    pub fn tree(&self) -> &ComponentTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ComponentTree {
        &mut self.tree
    }

    pub fn view_root(&self) -> NodeId {
        self.view_root
    }

    pub fn config(&self) -> &FacesConfig {
        &self.config
    }

    pub fn separator_char(&self) -> char {
        self.config.separator_char()
    }

    /// Creates `component` and appends it to `parent`.
    pub fn add(&mut self, parent: NodeId, component: Component) -> Result<NodeId> {
        let node = self.tree.create(component);
        self.tree.add_child(parent, node)?;
        Ok(node)
    }

    pub fn add_facet(&mut self, parent: NodeId, name: &str, component: Component) -> Result<NodeId> {
        let node = self.tree.create(component);
        self.tree.set_facet(parent, name, node)?;
        Ok(node)
    }

    pub fn client_id(&self, node: NodeId) -> Result<String> {
        self.tree.client_id(node, self.config.separator_char())
    }

    pub fn base_client_id(&self, node: NodeId) -> Result<String> {
        self.tree.base_client_id(node, self.config.separator_char())
    }

    pub fn request_scope(&self) -> &Scope {
        &self.request_scope
    }

    pub fn request_scope_mut(&mut self) -> &mut Scope {
        &mut self.request_scope
    }

    pub fn set_request_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.request_parameters.insert(name.into(), value.into());
    }

    pub fn request_parameter(&self, name: &str) -> Option<&str> {
        self.request_parameters.get(name).map(String::as_str)
    }

    pub fn clear_request_parameters(&mut self) {
        self.request_parameters.clear();
    }

    pub fn add_message(&mut self, client_id: Option<String>, severity: Severity, summary: impl Into<String>) {
        self.messages.push(FacesMessage {
            client_id,
            severity,
            summary: summary.into(),
        });
    }

    pub fn messages(&self) -> &[FacesMessage] {
        &self.messages
    }

    pub fn maximum_severity(&self) -> Option<Severity> {
        self.messages.iter().map(|m| m.severity).max()
    }

    pub fn has_error_messages(&self) -> bool {
        self.maximum_severity().is_some_and(|s| s >= Severity::Error)
    }

    pub fn phase(&self) -> PhaseId {
        self.phase
    }

    pub fn set_phase(&mut self, phase: PhaseId) {
        self.phase = phase;
    }

    /// Skips the remaining execute phases and jumps to rendering.
    pub fn render_response(&mut self) {
        self.render_response = true;
    }

    pub fn is_render_response(&self) -> bool {
        self.render_response
    }

    /// Clears per-request state so the same view can serve another request.
    pub fn reset_request(&mut self) {
        self.request_parameters.clear();
        self.messages.clear();
        self.events.clear();
        self.render_response = false;
        self.phase = PhaseId::RestoreView;
    }

    pub fn set_response_writer(&mut self, writer: Box<dyn ResponseWriter>) {
        self.response_writer = Some(writer);
    }

    pub fn take_response_writer(&mut self) -> Option<Box<dyn ResponseWriter>> {
        self.response_writer.take()
    }

    pub fn response_writer(&mut self) -> Result<&mut (dyn ResponseWriter + 'static)> {
        self.response_writer
            .as_deref_mut()
            .ok_or_else(|| FacesError::invalid_argument("no response writer installed"))
    }

    pub fn set_evaluator(&mut self, evaluator: Rc<dyn ExpressionEvaluator>) {
        self.evaluator = evaluator;
    }

    pub fn evaluate(&self, expression: &str) -> Result<Value> {
        self.evaluator.get_value(&self.request_scope, expression)
    }

    pub fn assign(&mut self, expression: &str, value: Value) -> Result<()> {
        self.evaluator.set_value(&mut self.request_scope, expression, value)
    }

    /// Current value of a component attribute, evaluating expressions against request scope.
    pub fn attribute_value(&self, node: NodeId, name: &str) -> Result<Option<Value>> {
        match self.tree.get(node)?.attribute(name) {
            None => Ok(None),
            Some(Attribute::Literal(value)) => Ok(Some(value.clone())),
            Some(Attribute::Expression(expression)) => self.evaluate(expression).map(Some),
        }
    }

    pub fn attribute_expression(&self, node: NodeId, name: &str) -> Result<Option<String>> {
        match self.tree.get(node)?.attribute(name) {
            Some(Attribute::Expression(expression)) => Ok(Some(expression.clone())),
            _ => Ok(None),
        }
    }
}

impl Default for FacesContext {
    fn default() -> Self {
        Self::new(FacesConfig::default())
    }
}

impl fmt::Debug for FacesContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FacesContext")
            .field("view_root", &self.view_root)
            .field("phase", &self.phase)
            .field("messages", &self.messages)
            .field("request_scope", &self.request_scope)
            .finish_non_exhaustive()
    }
}
