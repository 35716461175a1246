use faces_core::{Component, ComponentKind, FacesContext, FacesError, NodeId, Result};
use faces_search::{
    CompositeSearchKeywordResolver, SearchExpressionContext, SearchExpressionHandler, SearchExpressionHint,
    SearchKeywordContext, SearchKeywordResolver,
};
use faces_testing::prelude::*;

fn resolve_component(
    ctx: &mut FacesContext,
    source: NodeId,
    expression: &str,
    hints: &[SearchExpressionHint],
) -> Result<Option<NodeId>> {
    resolve_component_with(&SearchExpressionHandler::default(), ctx, source, expression, hints)
}

fn resolve_component_with(
    handler: &SearchExpressionHandler,
    ctx: &mut FacesContext,
    source: NodeId,
    expression: &str,
    hints: &[SearchExpressionHint],
) -> Result<Option<NodeId>> {
    let mut search_context = SearchExpressionContext::new(source).with_hints(hints.iter().copied());
    let mut recorder = Recorder::new();
    handler.resolve_component(ctx, &mut search_context, expression, &mut recorder.callback())?;
    Ok(recorder.single())
}

fn resolve_components(ctx: &mut FacesContext, source: NodeId, expressions: &str) -> Result<Vec<NodeId>> {
    let search_context = SearchExpressionContext::new(source);
    let mut recorder = Recorder::new();
    SearchExpressionHandler::default().resolve_components(ctx, &search_context, expressions, &mut recorder.callback())?;
    Ok(recorder.nodes().to_vec())
}

fn resolve_client_id(ctx: &mut FacesContext, source: NodeId, expression: &str) -> Result<Option<String>> {
    let mut search_context = SearchExpressionContext::new(source);
    SearchExpressionHandler::default().resolve_client_id(ctx, &mut search_context, expression)
}

#[test]
fn keywords_relative_to_the_source() {
    let mut v = NestedContainers::new();
    let root = v.root();
    let cases = [
        ("@parent", v.inner),
        ("@parent:@parent", v.outer),
        ("@form", v.form),
        ("@form:@parent", root),
        ("@all", root),
        ("@this", v.source),
        ("@this:@parent", v.inner),
        ("@namingcontainer", v.inner),
        (" @parent:@child(0) ", v.other),
        (" @parent:@child(1) ", v.source),
        ("@root", root),
    ];
    for (expression, expected) in cases {
        let found = resolve_component(&mut v.ctx, v.source, expression, &[]).unwrap();
        assert_eq!(found, Some(expected), "{expression}");
    }
}

#[test]
fn id_paths_absolute_and_relative() {
    let mut v = NestedContainers::new();
    let root = v.root();
    let cases = [
        (" :form:outerContainer:innerContainer:source ", v.source),
        (" other ", v.other),
        (" :form:@parent ", root),
        (" :form:outerContainer:@namingcontainer ", v.form),
    ];
    for (expression, expected) in cases {
        let found = resolve_component(&mut v.ctx, v.source, expression, &[]).unwrap();
        assert_eq!(found, Some(expected), "{expression}");
    }
}

#[test]
fn client_ids_of_single_expressions() {
    let mut v = NestedContainers::new();
    let source = v.source;
    assert_eq!(
        resolve_client_id(&mut v.ctx, source, " @this ").unwrap().as_deref(),
        Some("form:outerContainer:innerContainer:source")
    );
    assert_eq!(resolve_client_id(&mut v.ctx, source, " @form ").unwrap().as_deref(), Some("form"));
    assert_eq!(resolve_client_id(&mut v.ctx, source, " :form ").unwrap().as_deref(), Some("form"));
    assert_eq!(
        resolve_client_id(&mut v.ctx, source, " other ").unwrap().as_deref(),
        Some("form:outerContainer:innerContainer:other")
    );
}

#[test]
fn expression_lists_resolve_every_entry() {
    let mut v = NestedContainers::new();
    let found = resolve_components(&mut v.ctx, v.source, " other @parent:@parent ").unwrap();
    assert_eq!(found, vec![v.other, v.outer]);

    let found = resolve_components(&mut v.ctx, v.source, " other,@this:@parent  @none ").unwrap();
    assert_eq!(found, vec![v.other, v.inner]);
}

#[test]
fn client_id_lists_keep_passthrough_expressions() {
    let mut v = NestedContainers::new();
    let search_context = SearchExpressionContext::new(v.source);
    let handler = SearchExpressionHandler::default();
    let ids = handler
        .resolve_client_ids(&mut v.ctx, &search_context, "@none other, @form")
        .unwrap();
    assert_eq!(ids, vec!["@none", "form:outerContainer:innerContainer:other", "form"]);
}

#[test]
fn empty_list_is_not_found_unless_ignored() {
    let mut v = NestedContainers::new();
    let handler = SearchExpressionHandler::default();

    let strict = SearchExpressionContext::new(v.source);
    let err = handler.resolve_client_ids(&mut v.ctx, &strict, "  ").unwrap_err();
    assert!(matches!(err, FacesError::ComponentNotFound { .. }));

    let lenient = SearchExpressionContext::new(v.source).with_hints([SearchExpressionHint::IgnoreNoResult]);
    assert!(handler.resolve_client_ids(&mut v.ctx, &lenient, "missing").unwrap().is_empty());
}

#[test]
fn not_found_with_a_missing_source_reports_the_missing_node() {
    let mut v = NestedContainers::new();
    let handler = SearchExpressionHandler::default();
    let dangling = SearchExpressionContext::new(usize::MAX);
    let err = handler.resolve_client_ids(&mut v.ctx, &dangling, "  ").unwrap_err();
    assert!(matches!(err, FacesError::MissingNode { id } if id == usize::MAX));
}

#[test]
fn next_and_previous_walk_siblings() {
    let mut v = CommandRow::new();
    let [command1, command2, command3] = v.commands;

    assert_eq!(resolve_component(&mut v.ctx, command1, " @next ", &[]).unwrap(), Some(command2));
    assert_eq!(resolve_component(&mut v.ctx, command2, " @next ", &[]).unwrap(), Some(command3));
    assert_eq!(resolve_component(&mut v.ctx, command1, " @next:@next ", &[]).unwrap(), Some(command3));
    assert_eq!(resolve_component(&mut v.ctx, command2, " @previous ", &[]).unwrap(), Some(command1));
    assert_eq!(resolve_component(&mut v.ctx, command3, " @previous ", &[]).unwrap(), Some(command2));
    assert_eq!(
        resolve_component(&mut v.ctx, command1, " @form:@child(0):@next:@next ", &[]).unwrap(),
        Some(command3)
    );

    for (source, expression) in [(command3, " @next"), (command2, " @next:@next"), (command3, " @next:@next"), (command1, " @previous")] {
        let err = resolve_component(&mut v.ctx, source, expression, &[]).unwrap_err();
        assert!(matches!(err, FacesError::ComponentNotFound { .. }), "{expression}");
    }
}

#[test]
fn not_found_names_expression_and_source() {
    let mut v = CommandRow::new();
    let command1 = v.commands[0];
    let source_id = client_id(&v.ctx, command1);

    let err = resolve_component(&mut v.ctx, command1, " command3 ", &[]).unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("Cannot find component for expression \"command3\" referenced from \"{source_id}\".")
    );

    let found = resolve_component(&mut v.ctx, command1, " command3 ", &[SearchExpressionHint::IgnoreNoResult]).unwrap();
    assert_eq!(found, None);
}

#[test]
fn unknown_keyword_resolves_to_nothing() {
    let mut v = NestedContainers::new();
    let err = resolve_component(&mut v.ctx, v.source, "@whoKnows", &[]).unwrap_err();
    assert!(matches!(err, FacesError::ComponentNotFound { .. }));
}

fn form_without_prepended_id() -> (FacesContext, NodeId) {
    let mut ctx = FacesContext::default();
    let root = ctx.view_root();
    let form = add(
        &mut ctx,
        root,
        Component::new(ComponentKind::Form { prepend_id: false }).with_id("form"),
    );
    let outer = add(&mut ctx, form, Component::new(ComponentKind::NamingContainer).with_id("outerContainer"));
    let inner = add(&mut ctx, outer, Component::new(ComponentKind::NamingContainer).with_id("innerContainer"));
    add(&mut ctx, inner, Component::new(ComponentKind::Output).with_id("other"));
    let source = add(&mut ctx, inner, Component::new(ComponentKind::Output).with_id("source"));
    (ctx, source)
}

#[test]
fn form_without_prepended_id_is_left_out_of_client_ids() {
    let (mut ctx, source) = form_without_prepended_id();
    assert_eq!(
        resolve_client_id(&mut ctx, source, " :form:outerContainer:innerContainer:source ")
            .unwrap()
            .as_deref(),
        Some("outerContainer:innerContainer:source")
    );
}

#[test]
fn client_id_paths_fall_back_to_a_tree_lookup() {
    let (mut ctx, source) = form_without_prepended_id();
    assert_eq!(
        resolve_client_id(&mut ctx, source, " outerContainer:innerContainer:source ")
            .unwrap()
            .as_deref(),
        Some("outerContainer:innerContainer:source")
    );

    let mut skipping = SearchExpressionContext::new(source).with_hints([SearchExpressionHint::SkipVirtualComponents]);
    let err = SearchExpressionHandler::default()
        .resolve_client_id(&mut ctx, &mut skipping, " outerContainer:innerContainer:source ")
        .unwrap_err();
    assert!(matches!(err, FacesError::ComponentNotFound { .. }));
}

#[test]
fn passthrough_expressions() {
    let v = NestedContainers::new();
    let handler = SearchExpressionHandler::default();
    let plain = SearchExpressionContext::new(v.source);

    for expression in [
        "mainForm:showName",
        "mainForm:table:3:nested:1:nestedText",
        "mainForm:table:0:baseText",
        "@this",
        "@this:@parent:showName",
        "@parent:showName:@parent:showName",
        "@form",
        "@form:showName",
        "@namingcontainer:showName",
        "@previous",
        "@next",
        "@parent:@id(msgName)",
        "@whoNows",
        "@parent:@whoNows",
        "mainForm:@whoNows",
        "!whoNows",
    ] {
        assert!(!handler.is_passthrough_expression(&v.ctx, &plain, expression), "{expression}");
    }
    assert!(handler.is_passthrough_expression(&v.ctx, &plain, "@none"));
    assert!(handler.is_passthrough_expression(&v.ctx, &plain, " @all "));
    assert!(handler.is_passthrough_expression(&v.ctx, &plain, "@parent:@none"));

    let client_side = SearchExpressionContext::new(v.source).with_hints([SearchExpressionHint::ResolveClientSide]);
    assert!(handler.is_passthrough_expression(&v.ctx, &client_side, "@form"));
    assert!(!handler.is_passthrough_expression(&v.ctx, &client_side, "@form:showName"));
    assert!(!handler.is_passthrough_expression(&v.ctx, &client_side, "@form:@child(0)"));
}

#[test]
fn valid_expressions() {
    let v = NestedContainers::new();
    let handler = SearchExpressionHandler::default();
    let search_context = SearchExpressionContext::new(v.source);

    for expression in [
        "",
        "mainForm:showName",
        "mainForm:table:3:nested:1:nestedText",
        "mainForm:table:3:nested",
        "@this",
        "@this:@parent:showName",
        "@parent:showName:@parent:showName",
        "@form:showName",
        "@namingcontainer:showName",
        "@previous",
        "@next",
        "@parent:@id(msgName)",
        ":@root:form",
    ] {
        assert!(handler.is_valid_expression(&v.ctx, &search_context, expression), "{expression}");
    }
    for expression in ["@whoNows", "@parent:@whoNows", "mainForm:@whoNows", "@none:@parent", "@all:@parent"] {
        assert!(!handler.is_valid_expression(&v.ctx, &search_context, expression), "{expression}");
    }
}

#[test]
fn id_keyword_searches_below_the_current_component() {
    let mut ctx = FacesContext::default();
    let root = ctx.view_root();
    let form = add(&mut ctx, root, Component::new(ComponentKind::form()).with_id("form"));
    let outer = add(&mut ctx, form, Component::new(ComponentKind::NamingContainer).with_id("outerContainer"));
    let inner = add(&mut ctx, outer, Component::new(ComponentKind::NamingContainer).with_id("myContainer"));
    let inner2 = add(&mut ctx, outer, Component::new(ComponentKind::NamingContainer).with_id("myContainer2"));
    let inner3 = add(&mut ctx, outer, Component::new(ComponentKind::NamingContainer).with_id("myContainer3-test"));
    add(&mut ctx, inner2, Component::new(ComponentKind::Output).with_id("text"));

    assert_eq!(resolve_components(&mut ctx, form, " @id(myContainer) ").unwrap(), vec![inner]);
    assert_eq!(resolve_components(&mut ctx, form, " @id(myContainer3-test) ").unwrap(), vec![inner3]);
}

#[test]
fn id_keyword_reports_every_row() {
    let mut v = HobbitTable::new();
    let handler = SearchExpressionHandler::default();

    let visiting = SearchExpressionContext::new(v.form);
    let ids = handler.resolve_client_ids(&mut v.ctx, &visiting, "@id(name)").unwrap();
    let expected: Vec<String> = (0..HobbitTable::NAMES.len()).map(|row| format!("form:data:{row}:name")).collect();
    assert_eq!(ids, expected);

    let direct = SearchExpressionContext::new(v.form).with_hints([SearchExpressionHint::SkipVirtualComponents]);
    let ids = handler.resolve_client_ids(&mut v.ctx, &direct, "@id(name)").unwrap();
    assert_eq!(ids, vec!["form:data:name"]);
}

#[test]
fn row_client_ids_resolve_inside_the_row() {
    let mut v = HobbitTable::new();
    let handler = SearchExpressionHandler::default();
    let mut search_context = SearchExpressionContext::new(v.form);
    let mut recorder = Recorder::new();
    handler
        .resolve_component(&mut v.ctx, &mut search_context, ":form:data:3:name", &mut recorder.callback())
        .unwrap();
    assert_eq!(recorder.nodes(), &[v.name]);
    assert_eq!(recorder.client_ids(), &["form:data:3:name".to_string()]);
    assert_eq!(client_id(&v.ctx, v.name), "form:data:name");
}

#[test]
fn parent_next_then_descend() {
    let mut ctx = FacesContext::default();
    let root = ctx.view_root();
    let form = add(&mut ctx, root, Component::new(ComponentKind::form()).with_id("form"));
    let left = add(&mut ctx, form, Component::new(ComponentKind::Panel).with_id("left"));
    let source = add(&mut ctx, left, Component::new(ComponentKind::Command).with_id("source"));
    let right = add(&mut ctx, form, Component::new(ComponentKind::NamingContainer).with_id("right"));
    let sibling = add(&mut ctx, right, Component::new(ComponentKind::Output).with_id("mySibling"));

    assert_eq!(
        resolve_component(&mut ctx, source, "@parent:@next:mySibling", &[]).unwrap(),
        Some(sibling)
    );

    let err = resolve_component(&mut ctx, sibling, "@parent:@next:mySibling", &[]).unwrap_err();
    assert!(matches!(err, FacesError::ComponentNotFound { .. }));
    let ignored = resolve_component(&mut ctx, sibling, "@parent:@next:mySibling", &[SearchExpressionHint::IgnoreNoResult]);
    assert_eq!(ignored.unwrap(), None);
}

#[test]
fn keyword_after_leaf_is_rejected() {
    let mut ctx = FacesContext::default();
    let root = ctx.view_root();
    let panel = add(&mut ctx, root, Component::new(ComponentKind::Panel).with_id("root"));
    let err = resolve_component(&mut ctx, panel, " @none:myId", &[]).unwrap_err();
    assert!(matches!(err, FacesError::Structural { .. }));
}

/// Claims selector keywords such as `@(.panel #id)` and leaves them to the client.
struct SelectorResolver;

impl SearchKeywordResolver for SelectorResolver {
    fn is_resolver_for_keyword(&self, _context: &SearchExpressionContext, keyword: &str) -> bool {
        keyword.starts_with('(') && keyword.ends_with(')')
    }

    fn resolve(
        &self,
        _ctx: &mut FacesContext,
        _keyword_context: &mut SearchKeywordContext<'_, '_>,
        _current: NodeId,
        _keyword: &str,
    ) -> Result<()> {
        Ok(())
    }

    fn is_passthrough(&self, _context: &SearchExpressionContext, _keyword: &str) -> bool {
        true
    }

    fn is_leaf(&self, _context: &SearchExpressionContext, _keyword: &str) -> bool {
        true
    }
}

#[test]
fn selector_keywords_pass_through() {
    let mut ctx = FacesContext::default();
    let root = ctx.view_root();
    let panel = add(&mut ctx, root, Component::new(ComponentKind::Panel));

    let mut handler = SearchExpressionHandler::default();
    handler.resolver_mut().add(Box::new(SelectorResolver));

    let mut search_context = SearchExpressionContext::new(panel);
    let id = handler
        .resolve_client_id(&mut ctx, &mut search_context, " @(.myPanel #id)")
        .unwrap();
    assert_eq!(id.as_deref(), Some("@(.myPanel #id)"));

    let search_context = SearchExpressionContext::new(panel);
    assert!(handler.is_valid_expression(&ctx, &search_context, "@(.myPanel #id)"));
    assert!(!handler.is_valid_expression(&ctx, &search_context, "@(.myPanel #id):test"));
}

/// `@form` replacement that stays on the current component.
struct StayingForm;

impl SearchKeywordResolver for StayingForm {
    fn is_resolver_for_keyword(&self, _context: &SearchExpressionContext, keyword: &str) -> bool {
        keyword == "form"
    }

    fn resolve(
        &self,
        ctx: &mut FacesContext,
        keyword_context: &mut SearchKeywordContext<'_, '_>,
        current: NodeId,
        _keyword: &str,
    ) -> Result<()> {
        keyword_context.invoke_context_callback(ctx, current)
    }
}

#[test]
fn later_resolvers_take_precedence() {
    let mut v = NestedContainers::new();
    let mut chain = CompositeSearchKeywordResolver::with_defaults();
    chain.add(Box::new(StayingForm));
    let handler = SearchExpressionHandler::new(chain);

    let found = resolve_component_with(&handler, &mut v.ctx, v.source, "@form", &[]).unwrap();
    assert_eq!(found, Some(v.source));
    assert_ne!(found, Some(v.form));
}
