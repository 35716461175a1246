use faces_core::{Component, ComponentKind, FacesContext, NodeId, UIRepeat, Value};

/// `form > outerContainer > innerContainer > (other, source)`, all naming containers
/// except the two leaves.
pub struct NestedContainers {
    pub ctx: FacesContext,
    pub form: NodeId,
    pub outer: NodeId,
    pub inner: NodeId,
    pub other: NodeId,
    pub source: NodeId,
}

impl NestedContainers {
    pub fn new() -> Self {
        let mut ctx = FacesContext::default();
        let root = ctx.view_root();
        let form = add(&mut ctx, root, Component::new(ComponentKind::form()).with_id("form"));
        let outer = add(
            &mut ctx,
            form,
            Component::new(ComponentKind::NamingContainer).with_id("outerContainer"),
        );
        let inner = add(
            &mut ctx,
            outer,
            Component::new(ComponentKind::NamingContainer).with_id("innerContainer"),
        );
        let other = add(&mut ctx, inner, Component::new(ComponentKind::Output).with_id("other"));
        let source = add(&mut ctx, inner, Component::new(ComponentKind::Output).with_id("source"));
        Self {
            ctx,
            form,
            outer,
            inner,
            other,
            source,
        }
    }

    pub fn root(&self) -> NodeId {
        self.ctx.view_root()
    }
}

impl Default for NestedContainers {
    fn default() -> Self {
        Self::new()
    }
}

/// `form > (command1, command2, command3)`, the commands without explicit ids.
pub struct CommandRow {
    pub ctx: FacesContext,
    pub form: NodeId,
    pub commands: [NodeId; 3],
}

impl CommandRow {
    pub fn new() -> Self {
        let mut ctx = FacesContext::default();
        let root = ctx.view_root();
        let form = add(&mut ctx, root, Component::new(ComponentKind::form()).with_id("form"));
        let commands = [(); 3].map(|_| add(&mut ctx, form, Component::new(ComponentKind::Command)));
        Self { ctx, form, commands }
    }
}

impl Default for CommandRow {
    fn default() -> Self {
        Self::new()
    }
}

/// `form > data(repeat over hobbits, var=hobbit, varStatus=status) > (name input, go command)`.
pub struct HobbitTable {
    pub ctx: FacesContext,
    pub form: NodeId,
    pub data: NodeId,
    pub name: NodeId,
    pub go: NodeId,
}

impl HobbitTable {
    pub const NAMES: [&'static str; 5] = ["Frodo", "Sam", "Merry", "Pippin", "Bilbo"];

    /// The repeat reads `#{hobbits}` from request scope.
    pub fn new() -> Self {
        let mut ctx = FacesContext::default();
        ctx.request_scope_mut().insert("hobbits".into(), hobbits());
        let root = ctx.view_root();
        let form = add(&mut ctx, root, Component::new(ComponentKind::form()).with_id("form"));
        let data = add(
            &mut ctx,
            form,
            Component::new(ComponentKind::repeat(
                UIRepeat::new().with_var("hobbit").with_var_status("status"),
            ))
            .with_id("data")
            .with_attr("value", "#{hobbits}"),
        );
        let name = add(
            &mut ctx,
            data,
            Component::new(ComponentKind::input())
                .with_id("name")
                .with_attr("value", "#{hobbit.name}"),
        );
        let go = add(
            &mut ctx,
            data,
            Component::new(ComponentKind::Command).with_id("go").with_attr("value", "Go"),
        );
        Self {
            ctx,
            form,
            data,
            name,
            go,
        }
    }
}

impl Default for HobbitTable {
    fn default() -> Self {
        Self::new()
    }
}

pub fn hobbits() -> Value {
    Value::list(
        HobbitTable::NAMES
            .into_iter()
            .map(|name| Value::map([("name", Value::from(name))])),
    )
}

/// Creates and attaches a component, panicking on structural errors.
pub fn add(ctx: &mut FacesContext, parent: NodeId, component: Component) -> NodeId {
    match ctx.add(parent, component) {
        Ok(node) => node,
        Err(err) => panic!("fixture construction failed: {err}"),
    }
}

/// Client id of `node`, panicking if it is missing.
pub fn client_id(ctx: &FacesContext, node: NodeId) -> String {
    match ctx.client_id(node) {
        Ok(id) => id,
        Err(err) => panic!("no client id for node {node}: {err}"),
    }
}
