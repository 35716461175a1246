use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::el::is_value_expression;
use crate::error::Result;
use crate::event::FacesEvent;
use crate::repeat::UIRepeat;
use crate::value::Value;
use crate::{FacesContext, NodeId};

/// Listener attached to a component; receives every event whose source is that component.
pub type Listener = Rc<dyn Fn(&mut FacesContext, &FacesEvent) -> Result<()>>;

/// A component attribute: either a literal or a value expression evaluated on read.
#[derive(Clone, Debug, PartialEq)]
pub enum Attribute {
    Literal(Value),
    Expression(String),
}

impl Attribute {
    /// Strings shaped like `#{...}` become expressions, everything else a literal.
    pub fn parse(text: &str) -> Self {
        if is_value_expression(text) {
            Attribute::Expression(text.trim().to_string())
        } else {
            Attribute::Literal(Value::from(text))
        }
    }
}

impl From<Value> for Attribute {
    fn from(value: Value) -> Self {
        Attribute::Literal(value)
    }
}

/// Editable state of an input, saved and restored per row by an iteration component.
#[derive(Clone, Debug, PartialEq)]
pub struct EditableState {
    pub value: Value,
    pub submitted_value: Option<Value>,
    pub valid: bool,
    pub local_value_set: bool,
}

impl Default for EditableState {
    fn default() -> Self {
        Self {
            value: Value::Null,
            submitted_value: None,
            valid: true,
            local_value_set: false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputState {
    pub editable: EditableState,
    pub required: bool,
}

/// The concrete behavior of a component.
#[derive(Debug)]
pub enum ComponentKind {
    ViewRoot,
    Panel,
    Form { prepend_id: bool },
    NamingContainer,
    /// The root of a composite component; also a naming container.
    Composite,
    Output,
    Input(InputState),
    Command,
    Repeat(Box<UIRepeat>),
}

impl ComponentKind {
    pub fn form() -> Self {
        ComponentKind::Form { prepend_id: true }
    }

    pub fn input() -> Self {
        ComponentKind::Input(InputState::default())
    }

    pub fn required_input() -> Self {
        ComponentKind::Input(InputState {
            required: true,
            ..InputState::default()
        })
    }

    pub fn repeat(repeat: UIRepeat) -> Self {
        ComponentKind::Repeat(Box::new(repeat))
    }

    pub fn is_naming_container(&self) -> bool {
        matches!(
            self,
            ComponentKind::Form { .. }
                | ComponentKind::NamingContainer
                | ComponentKind::Composite
                | ComponentKind::Repeat(_)
        )
    }

    /// Whether this naming container contributes its own id to descendant client ids.
    pub fn prepends_id(&self) -> bool {
        match self {
            ComponentKind::Form { prepend_id } => *prepend_id,
            other => other.is_naming_container(),
        }
    }

    pub fn is_form(&self) -> bool {
        matches!(self, ComponentKind::Form { .. })
    }

    pub fn is_editable(&self) -> bool {
        matches!(self, ComponentKind::Input(_))
    }

    pub fn as_repeat(&self) -> Option<&UIRepeat> {
        match self {
            ComponentKind::Repeat(repeat) => Some(repeat),
            _ => None,
        }
    }

    pub fn as_repeat_mut(&mut self) -> Option<&mut UIRepeat> {
        match self {
            ComponentKind::Repeat(repeat) => Some(repeat),
            _ => None,
        }
    }

    pub fn as_input(&self) -> Option<&InputState> {
        match self {
            ComponentKind::Input(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_input_mut(&mut self) -> Option<&mut InputState> {
        match self {
            ComponentKind::Input(state) => Some(state),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ComponentKind::ViewRoot => "ViewRoot",
            ComponentKind::Panel => "Panel",
            ComponentKind::Form { .. } => "Form",
            ComponentKind::NamingContainer => "NamingContainer",
            ComponentKind::Composite => "Composite",
            ComponentKind::Output => "Output",
            ComponentKind::Input(_) => "Input",
            ComponentKind::Command => "Command",
            ComponentKind::Repeat(_) => "Repeat",
        }
    }
}

/// A node of the component tree. Structure (parent, children, facets) is owned by
/// [`ComponentTree`](crate::ComponentTree); this type only carries per-node data.
pub struct Component {
    pub(crate) id: String,
    pub(crate) kind: ComponentKind,
    pub(crate) attributes: IndexMap<String, Attribute>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) facets: IndexMap<String, NodeId>,
    pub(crate) rendered: bool,
    pub(crate) transient: bool,
    pub(crate) untargetable: bool,
    pub(crate) listeners: Vec<Listener>,
    pub(crate) client_id: RefCell<Option<String>>,
}

impl Component {
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            id: String::new(),
            kind,
            attributes: IndexMap::new(),
            parent: None,
            children: Vec::new(),
            facets: IndexMap::new(),
            rendered: true,
            transient: false,
            untargetable: false,
            listeners: Vec::new(),
            client_id: RefCell::new(None),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, attribute: impl Into<Attribute>) -> Self {
        self.attributes.insert(name.into(), attribute.into());
        self
    }

    /// Shorthand for an attribute written as markup text, see [`Attribute::parse`].
    pub fn with_attr(self, name: impl Into<String>, text: &str) -> Self {
        self.with_attribute(name, Attribute::parse(text))
    }

    pub fn with_rendered(mut self, rendered: bool) -> Self {
        self.rendered = rendered;
        self
    }

    pub fn with_transient(mut self, transient: bool) -> Self {
        self.transient = transient;
        self
    }

    /// Untargetable components are skipped by sibling and child keywords.
    pub fn with_untargetable(mut self, untargetable: bool) -> Self {
        self.untargetable = untargetable;
        self
    }

    pub fn with_listener(
        mut self,
        listener: impl Fn(&mut FacesContext, &FacesEvent) -> Result<()> + 'static,
    ) -> Self {
        self.listeners.push(Rc::new(listener));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut ComponentKind {
        &mut self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn facets(&self) -> &IndexMap<String, NodeId> {
        &self.facets
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, attribute: impl Into<Attribute>) {
        self.attributes.insert(name.into(), attribute.into());
    }

    pub fn is_rendered(&self) -> bool {
        self.rendered
    }

    pub fn set_rendered(&mut self, rendered: bool) {
        self.rendered = rendered;
    }

    pub fn is_transient(&self) -> bool {
        self.transient
    }

    pub fn is_untargetable(&self) -> bool {
        self.untargetable
    }

    pub fn add_listener(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn listeners(&self) -> &[Listener] {
        &self.listeners
    }

    pub fn is_naming_container(&self) -> bool {
        self.kind.is_naming_container()
    }

    pub(crate) fn clear_cached_client_id(&self) {
        self.client_id.borrow_mut().take();
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.id)
            .field("kind", &self.kind.name())
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("facets", &self.facets)
            .field("rendered", &self.rendered)
            .finish_non_exhaustive()
    }
}
