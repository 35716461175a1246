use super::*;

struct View {
    ctx: FacesContext,
    form: NodeId,
    outer: NodeId,
    inner: NodeId,
    source: NodeId,
    other: NodeId,
}

fn view() -> View {
    let mut ctx = FacesContext::default();
    let root = ctx.view_root();
    let form = ctx.add(root, Component::new(ComponentKind::form()).with_id("form")).unwrap();
    let outer = ctx
        .add(form, Component::new(ComponentKind::NamingContainer).with_id("outerContainer"))
        .unwrap();
    let inner = ctx
        .add(outer, Component::new(ComponentKind::NamingContainer).with_id("innerContainer"))
        .unwrap();
    let other = ctx.add(inner, Component::new(ComponentKind::Output).with_id("other")).unwrap();
    let source = ctx.add(inner, Component::new(ComponentKind::Output).with_id("source")).unwrap();
    View {
        ctx,
        form,
        outer,
        inner,
        source,
        other,
    }
}

#[test]
fn client_ids_join_naming_container_ids() {
    let v = view();
    assert_eq!(v.ctx.client_id(v.source).unwrap(), "form:outerContainer:innerContainer:source");
    assert_eq!(v.ctx.client_id(v.form).unwrap(), "form");
    assert_eq!(v.ctx.client_id(v.ctx.view_root()).unwrap(), "j_id0");
}

#[test]
fn non_naming_panels_do_not_contribute() {
    let mut v = view();
    let panel = v.ctx.add(v.inner, Component::new(ComponentKind::Panel).with_id("panel")).unwrap();
    let deep = v.ctx.add(panel, Component::new(ComponentKind::Output).with_id("deep")).unwrap();
    assert_eq!(v.ctx.client_id(deep).unwrap(), "form:outerContainer:innerContainer:deep");
}

#[test]
fn form_without_prepend_id_is_skipped() {
    let mut ctx = FacesContext::default();
    let root = ctx.view_root();
    let form = ctx
        .add(root, Component::new(ComponentKind::Form { prepend_id: false }).with_id("form"))
        .unwrap();
    let button = ctx.add(form, Component::new(ComponentKind::Command).with_id("save")).unwrap();
    assert_eq!(ctx.client_id(button).unwrap(), "save");
    assert_eq!(ctx.client_id(form).unwrap(), "form");
}

#[test]
fn generated_ids_use_the_configured_prefix() {
    let mut ctx = FacesContext::new(FacesConfig::new().with_id_prefix("gen"));
    let root = ctx.view_root();
    let a = ctx.add(root, Component::new(ComponentKind::Output)).unwrap();
    assert_eq!(ctx.tree().get(root).unwrap().id(), "gen0");
    assert_eq!(ctx.tree().get(a).unwrap().id(), "gen1");
}

#[test]
fn cached_client_ids_follow_renames_and_moves() {
    let mut v = view();
    assert_eq!(v.ctx.client_id(v.source).unwrap(), "form:outerContainer:innerContainer:source");
    v.ctx.tree_mut().set_id(v.inner, "renamed").unwrap();
    assert_eq!(v.ctx.client_id(v.source).unwrap(), "form:outerContainer:renamed:source");

    v.ctx.tree_mut().add_child(v.outer, v.source).unwrap();
    assert_eq!(v.ctx.client_id(v.source).unwrap(), "form:outerContainer:source");
    assert_eq!(v.ctx.tree().children(v.inner).unwrap(), vec![v.other]);
}

#[test]
fn separator_char_is_configurable() {
    let mut ctx = FacesContext::new(FacesConfig::new().with_separator_char('_'));
    let root = ctx.view_root();
    let form = ctx.add(root, Component::new(ComponentKind::form()).with_id("f")).unwrap();
    let out = ctx.add(form, Component::new(ComponentKind::Output).with_id("o")).unwrap();
    assert_eq!(ctx.client_id(out).unwrap(), "f_o");
}

#[test]
fn facets_come_before_children() {
    let mut v = view();
    let header = v
        .ctx
        .add_facet(v.inner, "header", Component::new(ComponentKind::Output).with_id("header"))
        .unwrap();
    assert_eq!(
        v.ctx.tree().facets_and_children(v.inner).unwrap(),
        vec![header, v.other, v.source]
    );
    let replacement = v
        .ctx
        .add_facet(v.inner, "header", Component::new(ComponentKind::Output).with_id("header2"))
        .unwrap();
    assert_eq!(v.ctx.tree().facet(v.inner, "header").unwrap(), Some(replacement));
    assert_eq!(v.ctx.tree().parent(header).unwrap(), None);
}

#[test]
fn attaching_a_node_beneath_itself_fails() {
    let mut v = view();
    let err = v.ctx.tree_mut().add_child(v.source, v.form).unwrap_err();
    assert!(matches!(err, FacesError::Structural { .. }));
}

#[test]
fn re_adding_a_child_moves_it_to_the_end() {
    let mut v = view();
    v.ctx.tree_mut().add_child(v.inner, v.other).unwrap();
    assert_eq!(v.ctx.tree().children(v.inner).unwrap(), vec![v.source, v.other]);
    assert_eq!(v.ctx.tree().parent(v.other).unwrap(), Some(v.inner));

    v.ctx.tree_mut().add_child(v.inner, v.other).unwrap();
    assert_eq!(v.ctx.tree().children(v.inner).unwrap(), vec![v.source, v.other]);
}

#[test]
fn out_of_bounds_insert_keeps_the_old_parent() {
    let mut v = view();
    let err = v.ctx.tree_mut().insert_child(v.outer, 5, v.source).unwrap_err();
    assert!(matches!(err, FacesError::InvalidArgument { .. }));
    assert_eq!(v.ctx.tree().children(v.inner).unwrap(), vec![v.other, v.source]);
    assert_eq!(v.ctx.tree().parent(v.source).unwrap(), Some(v.inner));
    assert_eq!(v.ctx.client_id(v.source).unwrap(), "form:outerContainer:innerContainer:source");

    v.ctx.tree_mut().insert_child(v.inner, 2, v.other).unwrap_err();
    v.ctx.tree_mut().insert_child(v.inner, 1, v.other).unwrap();
    assert_eq!(v.ctx.tree().children(v.inner).unwrap(), vec![v.source, v.other]);
}

#[test]
fn removing_drops_the_whole_subtree() {
    let mut v = view();
    let before = v.ctx.tree().len();
    v.ctx.tree_mut().remove(v.outer).unwrap();
    assert_eq!(v.ctx.tree().len(), before - 4);
    assert!(!v.ctx.tree().contains(v.source));
    assert!(v.ctx.tree().children(v.form).unwrap().is_empty());
    assert!(matches!(
        v.ctx.tree().get(v.inner),
        Err(FacesError::MissingNode { .. })
    ));
}

#[test]
fn dump_tree_lists_every_node() {
    let v = view();
    let dump = v.ctx.tree().dump_tree(Some(v.form));
    assert!(dump.contains("Form id=form"));
    assert!(dump.contains("      [") && dump.contains("Output id=source"));
    assert_eq!(v.ctx.tree().dump_tree(None), "(no root)\n");
}

#[test]
fn find_component_scopes_ids_by_naming_container() {
    let v = view();
    let tree = v.ctx.tree();
    assert_eq!(tree.find_component(v.source, "other", ':').unwrap(), Some(v.other));
    assert_eq!(tree.find_component(v.source, "innerContainer", ':').unwrap(), Some(v.inner));
    assert_eq!(
        tree.find_component(v.source, ":form:outerContainer:innerContainer:source", ':').unwrap(),
        Some(v.source)
    );
    // innerContainer hides its children from searches started outside of it
    assert_eq!(tree.find_component(v.outer, "source", ':').unwrap(), None);
    assert_eq!(tree.find_component(v.source, "missing", ':').unwrap(), None);
}

#[test]
fn find_component_requires_naming_container_segments() {
    let mut v = view();
    let panel = v.ctx.add(v.inner, Component::new(ComponentKind::Panel).with_id("panel")).unwrap();
    v.ctx.add(panel, Component::new(ComponentKind::Output).with_id("x")).unwrap();
    let err = v.ctx.tree().find_component(v.source, "panel:x", ':').unwrap_err();
    assert!(matches!(err, FacesError::Structural { .. }));
    assert!(matches!(
        v.ctx.tree().find_component(v.source, "", ':'),
        Err(FacesError::InvalidArgument { .. })
    ));
}

#[test]
fn find_by_id_descends_through_naming_containers() {
    let v = view();
    assert_eq!(v.ctx.tree().find_by_id(v.form, "source").unwrap(), Some(v.source));
    assert_eq!(v.ctx.tree().find_by_id(v.source, "source").unwrap(), None);
}

#[test]
fn invoke_on_component_matches_full_client_ids() {
    let mut v = view();
    let root = v.ctx.view_root();
    let mut seen = Vec::new();
    let found = invoke_on_component(
        &mut v.ctx,
        root,
        "form:outerContainer:innerContainer:other",
        &mut |_, node| {
            seen.push(node);
            Ok(())
        },
    )
    .unwrap();
    assert!(found);
    assert_eq!(seen, vec![v.other]);

    let found = invoke_on_component(&mut v.ctx, root, "form:nothing", &mut |_, _| Ok(())).unwrap();
    assert!(!found);
}

#[test]
fn callback_errors_propagate_out_of_invoke() {
    let mut v = view();
    let root = v.ctx.view_root();
    let err = invoke_on_component(&mut v.ctx, root, "form", &mut |_, _| {
        Err(FacesError::invalid_argument("boom"))
    })
    .unwrap_err();
    assert_eq!(err.to_string(), "boom");
}
