use std::sync::LazyLock;

use faces_core::{visit_tree, FacesContext, FacesError, FullVisitContext, NodeId, Result, VisitResult};
use regex::Regex;

use crate::context::{SearchExpressionContext, SearchExpressionHint, SearchKeywordContext};
use crate::keyword::SearchKeywordResolver;

static ID_PATTERN: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^id\(([\w-]+)\)$"));

/// Identifier requested by an `id(x)` keyword.
pub(crate) fn requested_id(keyword: &str) -> Result<&str> {
    let pattern = ID_PATTERN
        .as_ref()
        .map_err(|err| FacesError::syntax(format!("invalid @id pattern: {err}")))?;
    pattern
        .captures(keyword)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str())
        .ok_or_else(|| {
            FacesError::syntax(format!(
                "Expression does not match following pattern @id(id). Expression: {keyword}"
            ))
        })
}

/// `@id(x)`: every component below the current one (inclusive) whose id is `x`.
///
/// Without [`SearchExpressionHint::SkipVirtualComponents`] the subtree is visited, so
/// components inside iteration components are reported once per row.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdKeywordResolver;

impl SearchKeywordResolver for IdKeywordResolver {
    fn is_resolver_for_keyword(&self, _context: &SearchExpressionContext, keyword: &str) -> bool {
        keyword.starts_with("id(")
    }

    fn resolve(
        &self,
        ctx: &mut FacesContext,
        keyword_context: &mut SearchKeywordContext<'_, '_>,
        current: NodeId,
        keyword: &str,
    ) -> Result<()> {
        let id = requested_id(keyword)?;
        let search_context = keyword_context.search_expression_context();
        let single = search_context.has_hint(SearchExpressionHint::ResolveSingleComponent);

        if search_context.has_hint(SearchExpressionHint::SkipVirtualComponents) {
            let tree = ctx.tree();
            let matches = if single {
                if tree.get(current)?.id() == id {
                    vec![current]
                } else {
                    tree.find_by_id(current, id)?.into_iter().collect()
                }
            } else {
                let mut all = Vec::new();
                for candidate in std::iter::once(current).chain(tree.descendants(current)?) {
                    if tree.get(candidate)?.id() == id {
                        all.push(candidate);
                    }
                }
                all
            };
            for target in matches {
                keyword_context.invoke_context_callback(ctx, target)?;
            }
            return Ok(());
        }

        let mut visit_context = FullVisitContext::new(search_context.visit_hints().iter().copied());
        let mut matcher = |ctx: &mut FacesContext, target: NodeId| -> Result<VisitResult> {
            if ctx.tree().get(target)?.id() != id {
                return Ok(VisitResult::Accept);
            }
            keyword_context.invoke_context_callback(ctx, target)?;
            Ok(if single { VisitResult::Complete } else { VisitResult::Accept })
        };
        visit_tree(ctx, &mut visit_context, current, &mut matcher)?;
        Ok(())
    }
}
