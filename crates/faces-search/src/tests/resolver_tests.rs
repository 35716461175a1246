use super::*;

use faces_core::{Component, ComponentKind, FacesContext, FacesError, NodeId, Result};

use crate::resolvers::{
    AllKeywordResolver, ChildKeywordResolver, FormKeywordResolver, IdKeywordResolver, NextKeywordResolver,
    PreviousKeywordResolver,
};

struct Outcome {
    found: Vec<NodeId>,
    resolved: bool,
}

fn run(
    resolver: &dyn SearchKeywordResolver,
    ctx: &mut FacesContext,
    search_context: &SearchExpressionContext,
    current: NodeId,
    keyword: &str,
) -> Result<Outcome> {
    let mut found = Vec::new();
    let mut record = |_: &mut FacesContext, node: NodeId| -> Result<()> {
        found.push(node);
        Ok(())
    };
    let mut keyword_context = SearchKeywordContext::new(search_context, &mut record, None);
    resolver.resolve(ctx, &mut keyword_context, current, keyword)?;
    let resolved = keyword_context.is_keyword_resolved();
    drop(keyword_context);
    Ok(Outcome { found, resolved })
}

/// `panel > (first, hidden [untargetable], second, third)`
fn siblings() -> (FacesContext, NodeId, [NodeId; 4]) {
    let mut ctx = FacesContext::default();
    let root = ctx.view_root();
    let panel = ctx.add(root, Component::new(ComponentKind::Panel).with_id("panel")).unwrap();
    let first = ctx.add(panel, Component::new(ComponentKind::Command).with_id("first")).unwrap();
    let hidden = ctx
        .add(panel, Component::new(ComponentKind::Output).with_id("hidden").with_untargetable(true))
        .unwrap();
    let second = ctx.add(panel, Component::new(ComponentKind::Command).with_id("second")).unwrap();
    let third = ctx.add(panel, Component::new(ComponentKind::Command).with_id("third")).unwrap();
    (ctx, panel, [first, hidden, second, third])
}

#[test]
fn next_and_previous_skip_untargetable_siblings() {
    let (mut ctx, _, [first, _, second, third]) = siblings();
    let search_context = SearchExpressionContext::new(first);

    let next = run(&NextKeywordResolver, &mut ctx, &search_context, first, "next").unwrap();
    assert_eq!(next.found, vec![second]);

    let previous = run(&PreviousKeywordResolver, &mut ctx, &search_context, second, "previous").unwrap();
    assert_eq!(previous.found, vec![first]);

    let past_end = run(&NextKeywordResolver, &mut ctx, &search_context, third, "next").unwrap();
    assert!(past_end.found.is_empty());
    assert!(past_end.resolved);
}

#[test]
fn child_counts_only_targetable_children() {
    let (mut ctx, panel, [first, _, second, third]) = siblings();
    let search_context = SearchExpressionContext::new(panel);

    for (n, expected) in [(0, first), (1, second), (2, third)] {
        let outcome = run(&ChildKeywordResolver, &mut ctx, &search_context, panel, &format!("child({n})")).unwrap();
        assert_eq!(outcome.found, vec![expected]);
    }

    let err = run(&ChildKeywordResolver, &mut ctx, &search_context, panel, "child(3)").err().unwrap();
    assert!(matches!(err, FacesError::Structural { .. }));

    let overflow = "child(99999999999999999999)";
    let err = run(&ChildKeywordResolver, &mut ctx, &search_context, panel, overflow).err().unwrap();
    assert!(matches!(err, FacesError::Structural { .. }));
}

#[test]
fn malformed_child_argument_is_a_syntax_error() {
    let (mut ctx, panel, _) = siblings();
    let search_context = SearchExpressionContext::new(panel);
    for keyword in ["child(x)", "child()", "child(-1)", "child(1"] {
        let err = run(&ChildKeywordResolver, &mut ctx, &search_context, panel, keyword).err().unwrap();
        assert!(matches!(err, FacesError::Syntax { .. }), "{keyword}");
    }
}

#[test]
fn all_climbs_to_the_root_once() {
    let (mut ctx, panel, [first, ..]) = siblings();
    let root = ctx.view_root();
    let search_context = SearchExpressionContext::new(first);

    let from_leaf = run(&AllKeywordResolver, &mut ctx, &search_context, first, "all").unwrap();
    assert_eq!(from_leaf.found, vec![root]);
    let from_panel = run(&AllKeywordResolver, &mut ctx, &search_context, panel, "all").unwrap();
    assert_eq!(from_panel.found, vec![root]);

    let at_root = run(&AllKeywordResolver, &mut ctx, &search_context, root, "all").unwrap();
    assert!(at_root.found.is_empty());
    assert!(at_root.resolved);
}

#[test]
fn form_outside_of_a_form_is_structural() {
    let (mut ctx, _, [first, ..]) = siblings();
    let search_context = SearchExpressionContext::new(first);
    let err = run(&FormKeywordResolver, &mut ctx, &search_context, first, "form").err().unwrap();
    assert!(matches!(err, FacesError::Structural { .. }));
    assert!(err.to_string().contains("\"first\""));
}

#[test]
fn id_accepts_word_characters_and_hyphens() {
    let mut ctx = FacesContext::default();
    let root = ctx.view_root();
    let target = ctx
        .add(root, Component::new(ComponentKind::Output).with_id("my-container_3"))
        .unwrap();
    let search_context = SearchExpressionContext::new(root);

    let outcome = run(&IdKeywordResolver, &mut ctx, &search_context, root, "id(my-container_3)").unwrap();
    assert_eq!(outcome.found, vec![target]);

    let err = run(&IdKeywordResolver, &mut ctx, &search_context, root, "id(a b)").err().unwrap();
    assert!(matches!(err, FacesError::Syntax { .. }));
}

#[test]
fn id_includes_the_current_component() {
    let mut ctx = FacesContext::default();
    let root = ctx.view_root();
    let panel = ctx.add(root, Component::new(ComponentKind::Panel).with_id("x")).unwrap();
    let nested = ctx.add(panel, Component::new(ComponentKind::Output).with_id("x")).unwrap();

    let visiting = SearchExpressionContext::new(panel);
    let outcome = run(&IdKeywordResolver, &mut ctx, &visiting, panel, "id(x)").unwrap();
    assert_eq!(outcome.found, vec![panel, nested]);

    let direct = SearchExpressionContext::new(panel).with_hints([SearchExpressionHint::SkipVirtualComponents]);
    let outcome = run(&IdKeywordResolver, &mut ctx, &direct, panel, "id(x)").unwrap();
    assert_eq!(outcome.found, vec![panel, nested]);

    let single = SearchExpressionContext::new(panel).with_hints([SearchExpressionHint::ResolveSingleComponent]);
    let outcome = run(&IdKeywordResolver, &mut ctx, &single, panel, "id(x)").unwrap();
    assert_eq!(outcome.found, vec![panel]);
}
