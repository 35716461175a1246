//! The iteration component. One template subtree is stamped out once per row of a data
//! model; per-row input state is kept in a map keyed by row-qualified client id.

mod data_model;
mod scope;
mod status;

use log::debug;

pub use data_model::{model_for_value, DataModel, ListDataModel, ScalarDataModel};
pub use status::IterationStatus;

use self::scope::RowScope;
use crate::collections::map::HashMap;
use crate::component::EditableState;
use crate::error::{FacesError, Result};
use crate::event::{self, QueuedEvent};
use crate::find::{self, ContextCallback};
use crate::lifecycle::{self, PhaseId};
use crate::value::Value;
use crate::visit::{self, VisitCallback, VisitContext, VisitHint, VisitResult};
use crate::{FacesContext, NodeId};

/// Saved editable state of every input in the template, keyed by row-qualified client id.
pub type ChildState = HashMap<String, EditableState>;

#[derive(Debug, Default)]
pub struct UIRepeat {
    value: Option<Value>,
    model_prototype: Option<Box<dyn DataModel>>,
    model: Option<Box<dyn DataModel>>,
    var: Option<String>,
    var_status: Option<String>,
    index: Option<usize>,
    begin: Option<i64>,
    end: Option<i64>,
    step: Option<i64>,
    size: Option<i64>,
    offset: Option<i64>,
    original_begin: Option<i64>,
    original_end: Option<i64>,
    child_state: Option<ChildState>,
}

impl UIRepeat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.set_value(Some(value.into()));
        self
    }

    /// Iterates a custom model instead of a value.
    pub fn with_data_model(mut self, model: Box<dyn DataModel>) -> Self {
        self.set_data_model(Some(model));
        self
    }

    pub fn with_var(mut self, var: impl Into<String>) -> Self {
        self.var = Some(var.into());
        self
    }

    pub fn with_var_status(mut self, var_status: impl Into<String>) -> Self {
        self.var_status = Some(var_status.into());
        self
    }

    pub fn with_begin(mut self, begin: i64) -> Self {
        self.begin = Some(begin);
        self
    }

    pub fn with_end(mut self, end: i64) -> Self {
        self.end = Some(end);
        self
    }

    pub fn with_step(mut self, step: i64) -> Self {
        self.step = Some(step);
        self
    }

    pub fn with_size(mut self, size: i64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// The current row, `None` when the cursor is parked outside any row.
    pub fn row_index(&self) -> Option<usize> {
        self.index
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn set_value(&mut self, value: Option<Value>) {
        self.value = value;
        self.model = None;
    }

    pub fn set_data_model(&mut self, model: Option<Box<dyn DataModel>>) {
        self.model_prototype = model;
        self.model = None;
    }

    pub fn var(&self) -> Option<&str> {
        self.var.as_deref()
    }

    pub fn set_var(&mut self, var: Option<String>) {
        self.var = var;
    }

    pub fn var_status(&self) -> Option<&str> {
        self.var_status.as_deref()
    }

    pub fn set_var_status(&mut self, var_status: Option<String>) {
        self.var_status = var_status;
    }

    pub fn begin(&self) -> Option<i64> {
        self.begin
    }

    pub fn set_begin(&mut self, begin: Option<i64>) {
        self.begin = begin;
    }

    pub fn end(&self) -> Option<i64> {
        self.end
    }

    pub fn set_end(&mut self, end: Option<i64>) {
        self.end = end;
    }

    pub fn step(&self) -> Option<i64> {
        self.step
    }

    pub fn set_step(&mut self, step: Option<i64>) {
        self.step = step;
    }

    pub fn size(&self) -> Option<i64> {
        self.size
    }

    pub fn set_size(&mut self, size: Option<i64>) {
        self.size = size;
    }

    pub fn offset(&self) -> Option<i64> {
        self.offset
    }

    pub fn set_offset(&mut self, offset: Option<i64>) {
        self.offset = offset;
    }

    pub fn child_state(&self) -> Option<&ChildState> {
        self.child_state.as_ref()
    }

    /// Row data at the cursor, if the current model has been built and the row exists.
    pub fn row_data(&self) -> Option<&Value> {
        self.model.as_ref().and_then(|model| model.row_data())
    }

    pub fn row_count(&self) -> usize {
        self.model.as_ref().map_or(0, |model| model.row_count())
    }

    pub fn is_row_available(&self) -> bool {
        self.model.as_ref().is_some_and(|model| model.is_row_available())
    }
}

/// Everything an iteration component persists between requests.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RepeatState {
    pub child_state: Option<ChildState>,
    pub value: Option<Value>,
    pub var: Option<String>,
    pub var_status: Option<String>,
    pub begin: Option<i64>,
    pub end: Option<i64>,
    pub step: Option<i64>,
    pub size: Option<i64>,
    pub offset: Option<i64>,
    pub original_begin: Option<i64>,
    pub original_end: Option<i64>,
}

pub fn get(ctx: &FacesContext, node: NodeId) -> Result<&UIRepeat> {
    ctx.tree()
        .get(node)?
        .kind()
        .as_repeat()
        .ok_or_else(|| FacesError::invalid_argument(format!("node {node} is not an iteration component")))
}

pub fn get_mut(ctx: &mut FacesContext, node: NodeId) -> Result<&mut UIRepeat> {
    ctx.tree_mut()
        .get_mut(node)?
        .kind_mut()
        .as_repeat_mut()
        .ok_or_else(|| FacesError::invalid_argument(format!("node {node} is not an iteration component")))
}

pub fn row_index(ctx: &FacesContext, node: NodeId) -> Result<Option<usize>> {
    Ok(get(ctx, node)?.index)
}

pub fn is_row_available(ctx: &FacesContext, node: NodeId) -> Result<bool> {
    Ok(get(ctx, node)?.is_row_available())
}

pub fn row_count(ctx: &mut FacesContext, node: NodeId) -> Result<usize> {
    data_model_ready(ctx, node)?;
    Ok(get(ctx, node)?.row_count())
}

#[derive(Clone, Copy, Debug, Default)]
struct Properties {
    begin: Option<i64>,
    end: Option<i64>,
    step: Option<i64>,
    size: Option<i64>,
    offset: Option<i64>,
}

fn int_property(ctx: &FacesContext, node: NodeId, explicit: Option<i64>, name: &str) -> Result<Option<i64>> {
    if explicit.is_some() {
        return Ok(explicit);
    }
    match ctx.attribute_value(node, name)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_int()
            .map(Some)
            .ok_or_else(|| FacesError::invalid_argument(format!("{name} must be an integer, got {value:?}"))),
    }
}

fn properties(ctx: &FacesContext, node: NodeId) -> Result<Properties> {
    let repeat = get(ctx, node)?;
    Ok(Properties {
        begin: int_property(ctx, node, repeat.begin, "begin")?,
        end: int_property(ctx, node, repeat.end, "end")?,
        step: int_property(ctx, node, repeat.step, "step")?,
        size: int_property(ctx, node, repeat.size, "size")?,
        offset: int_property(ctx, node, repeat.offset, "offset")?,
    })
}

fn string_property(ctx: &FacesContext, node: NodeId, explicit: Option<&str>, name: &str) -> Result<Option<String>> {
    if let Some(explicit) = explicit {
        return Ok(Some(explicit.to_string()));
    }
    Ok(ctx
        .attribute_value(node, name)?
        .filter(|value| !value.is_null())
        .map(|value| value.to_string()))
}

pub(crate) fn var_names(ctx: &FacesContext, node: NodeId) -> Result<(Option<String>, Option<String>)> {
    let repeat = get(ctx, node)?;
    Ok((
        string_property(ctx, node, repeat.var(), "var")?,
        string_property(ctx, node, repeat.var_status(), "varStatus")?,
    ))
}

fn data_model_ready(ctx: &mut FacesContext, node: NodeId) -> Result<()> {
    if get(ctx, node)?.model.is_some() {
        return Ok(());
    }
    let model = build_data_model(ctx, node)?;
    get_mut(ctx, node)?.model = Some(model);
    Ok(())
}

fn build_data_model(ctx: &mut FacesContext, node: NodeId) -> Result<Box<dyn DataModel>> {
    let repeat = get(ctx, node)?;
    if let Some(prototype) = &repeat.model_prototype {
        let mut model = prototype.boxed_clone();
        model.set_row_index(None);
        return Ok(model);
    }
    let value = match &repeat.value {
        Some(value) => Some(value.clone()),
        None => ctx.attribute_value(node, "value")?,
    };
    if let Some(value) = value.filter(|value| !value.is_null()) {
        return Ok(model_for_value(&value));
    }

    // No value: iterate the integers between begin and end.
    let props = properties(ctx, node)?;
    let repeat = get_mut(ctx, node)?;
    if repeat.original_begin.is_none() {
        repeat.original_begin = props.begin;
    }
    if repeat.original_end.is_none() {
        repeat.original_end = props.end;
    }
    match (repeat.original_begin, repeat.original_end) {
        (None, None) => Ok(Box::new(ListDataModel::empty())),
        (Some(_), None) => Err(FacesError::invalid_argument("end")),
        (begin, Some(end)) => {
            let model = ListDataModel::range(begin.unwrap_or(0), end);
            repeat.begin = Some(0);
            repeat.end = Some(model.row_count() as i64);
            Ok(Box::new(model))
        }
    }
}

fn reset_data_model(ctx: &mut FacesContext, node: NodeId) -> Result<()> {
    if is_nested_in_iterator(ctx, node)? {
        get_mut(ctx, node)?.model = None;
    }
    Ok(())
}

/// Moves the row cursor, saving the inputs' state for the row being left and restoring
/// (or resetting) it for the row being entered. `var` is published for available rows.
pub fn set_row_index(ctx: &mut FacesContext, node: NodeId, index: Option<usize>) -> Result<()> {
    data_model_ready(ctx, node)?;
    let repeat = get(ctx, node)?;
    let leaving_row = repeat.index.is_some();
    let leaving_available = repeat.is_row_available();
    let has_child_state = repeat.child_state.is_some();
    if leaving_row && leaving_available {
        save_child_state(ctx, node)?;
    } else if leaving_row && has_child_state {
        remove_child_state(ctx, node)?;
    }

    let repeat = get_mut(ctx, node)?;
    repeat.index = index;
    if let Some(model) = repeat.model.as_mut() {
        model.set_row_index(index);
    }
    ctx.tree().reset_descendant_client_ids(node)?;

    let repeat = get(ctx, node)?;
    if index.is_none() || !repeat.is_row_available() {
        return Ok(());
    }
    let row = repeat.row_data().cloned().unwrap_or_default();
    if let (Some(var), _) = var_names(ctx, node)? {
        ctx.request_scope_mut().insert(var, row);
    }
    restore_child_state(ctx, node)
}

fn editable_descendants(ctx: &FacesContext, node: NodeId) -> Result<Vec<NodeId>> {
    let mut out = Vec::new();
    for kid in ctx.tree().children(node)? {
        if ctx.tree().kind(kid)?.is_editable() {
            out.push(kid);
        }
        for descendant in ctx.tree().descendants(kid)? {
            if ctx.tree().kind(descendant)?.is_editable() {
                out.push(descendant);
            }
        }
    }
    Ok(out)
}

fn save_child_state(ctx: &mut FacesContext, node: NodeId) -> Result<()> {
    let mut saved = Vec::new();
    for input in editable_descendants(ctx, node)? {
        let component = ctx.tree().get(input)?;
        if component.is_transient() {
            continue;
        }
        if let Some(state) = component.kind().as_input() {
            saved.push((ctx.client_id(input)?, state.editable.clone()));
        }
    }
    let child_state = get_mut(ctx, node)?.child_state.get_or_insert_with(ChildState::default);
    child_state.extend(saved);
    Ok(())
}

fn remove_child_state(ctx: &mut FacesContext, node: NodeId) -> Result<()> {
    let mut stale = Vec::new();
    for input in editable_descendants(ctx, node)? {
        stale.push(ctx.client_id(input)?);
    }
    stale.push(ctx.client_id(node)?);
    if let Some(child_state) = get_mut(ctx, node)?.child_state.as_mut() {
        for client_id in stale {
            child_state.remove(&client_id);
        }
    }
    Ok(())
}

fn restore_child_state(ctx: &mut FacesContext, node: NodeId) -> Result<()> {
    for input in editable_descendants(ctx, node)? {
        let client_id = ctx.client_id(input)?;
        let state = get(ctx, node)?
            .child_state
            .as_ref()
            .and_then(|child_state| child_state.get(&client_id))
            .cloned()
            .unwrap_or_default();
        if let Some(editable) = ctx.tree_mut().get_mut(input)?.kind_mut().as_input_mut() {
            editable.editable = state;
        }
    }
    Ok(())
}

/// True when the component sits inside another iteration component, or its parent's
/// client id carries a row segment.
pub fn is_nested_in_iterator(ctx: &FacesContext, node: NodeId) -> Result<bool> {
    if ctx
        .tree()
        .closest_ancestor(node, |kind| kind.as_repeat().is_some())?
        .is_some()
    {
        return Ok(true);
    }
    match ctx.tree().parent(node)? {
        Some(parent) => Ok(has_row_segment(&ctx.client_id(parent)?, ctx.separator_char())),
        None => Ok(false),
    }
}

fn has_row_segment(client_id: &str, separator: char) -> bool {
    let segments: Vec<&str> = client_id.split(separator).collect();
    segments.len() >= 3
        && segments[1..segments.len() - 1]
            .iter()
            .any(|segment| !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()))
}

fn keep_saved(ctx: &FacesContext, node: NodeId) -> Result<bool> {
    Ok(ctx.has_error_messages() || is_nested_in_iterator(ctx, node)?)
}

fn publish_status(ctx: &mut FacesContext, node: NodeId, status: Option<IterationStatus>) -> Result<()> {
    let (_, Some(var_status)) = var_names(ctx, node)? else {
        return Ok(());
    };
    let scope = ctx.request_scope_mut();
    match status {
        Some(status) => {
            scope.insert(var_status, status.to_value());
        }
        None => {
            scope.shift_remove(&var_status);
        }
    }
    Ok(())
}

/// Resolved iteration window. `last` is inclusive.
#[derive(Clone, Copy, Debug)]
struct Bounds {
    first: i64,
    last: i64,
    step: i64,
    row_count: usize,
    props: Properties,
}

impl Bounds {
    fn status(&self, index: i64) -> IterationStatus {
        let final_row = self.last.min(self.row_count as i64 - 1);
        IterationStatus {
            first: index == self.first,
            last: index + self.step > final_row,
            index: index.max(0) as usize,
            begin: self.props.begin,
            end: self.props.end,
            step: self.props.step,
        }
    }
}

fn iteration_bounds(ctx: &FacesContext, node: NodeId, validate: bool) -> Result<Bounds> {
    let props = properties(ctx, node)?;
    let row_count = get(ctx, node)?.row_count();
    let mut begin = props.begin;
    let mut end = props.end;
    if let Some(offset) = props.offset.filter(|offset| *offset > 0) {
        begin = Some(offset);
    }
    if props.size.is_some() {
        end = props.size;
    }

    let first = begin.unwrap_or(0);
    let mut last = end.unwrap_or(row_count as i64);
    let step = props.step.unwrap_or(1);
    if validate {
        if step <= 0 {
            return Err(FacesError::structural(format!("Iteration step must be positive, got {step}.")));
        }
        if first < 0 {
            return Err(FacesError::structural(format!("Iteration start index {first} is negative.")));
        }
        if row_count > 0 {
            let rows = row_count as i64;
            if first > rows {
                return Err(FacesError::structural(
                    "Iteration start index is greater than the number of available rows.",
                ));
            }
            if first > last {
                return Err(FacesError::structural("Iteration start index is greater than the end index."));
            }
            if last > rows {
                return Err(FacesError::structural(
                    "Iteration end index is greater than the number of available rows.",
                ));
            }
        }
    }
    if let Some(size) = props.size.filter(|size| *size > 0) {
        last = size - 1;
    }
    Ok(Bounds {
        first,
        last,
        step: step.max(1),
        row_count,
        props,
    })
}

fn to_row(index: i64) -> Result<usize> {
    usize::try_from(index).map_err(|_| FacesError::structural(format!("row index {index} is negative")))
}

/// Runs `phase` over the children once per row, leaving the cursor parked outside any row
/// and the shadowed request-scope values restored afterwards, even on failure.
pub fn process(ctx: &mut FacesContext, node: NodeId, phase: PhaseId) -> Result<()> {
    if !ctx.tree().get(node)?.is_rendered() {
        return Ok(());
    }
    reset_data_model(ctx, node)?;
    if phase == PhaseId::RenderResponse && !ctx.has_error_messages() {
        get_mut(ctx, node)?.child_state = None;
    }

    let result = {
        let mut scope = RowScope::enter(ctx, node, None, true)?;
        process_rows(&mut scope, node, phase)
    };
    if phase == PhaseId::RenderResponse {
        result.map_err(FacesError::into_render)?;
        return reset_client_ids(ctx, node);
    }
    result
}

fn process_rows(ctx: &mut FacesContext, node: NodeId, phase: PhaseId) -> Result<()> {
    set_row_index(ctx, node, None)?;
    let children = ctx.tree().children(node)?;
    if children.is_empty() {
        return Ok(());
    }
    let bounds = iteration_bounds(ctx, node, true)?;
    let mut i = bounds.first;
    set_row_index(ctx, node, Some(to_row(i)?))?;
    while i <= bounds.last && is_row_available(ctx, node)? {
        publish_status(ctx, node, Some(bounds.status(i)))?;
        debug!("processing row {i} of node {node} in {phase:?}");
        for kid in &children {
            lifecycle::process_phase(ctx, *kid, phase)?;
        }
        if phase == PhaseId::UpdateModelValues {
            write_back_row(ctx, node, to_row(i)?)?;
        }
        i += bounds.step;
        set_row_index(ctx, node, Some(to_row(i)?))?;
    }
    Ok(())
}

/// Copies a row value modified through `var` back into the model and the list it came from.
fn write_back_row(ctx: &mut FacesContext, node: NodeId, row: usize) -> Result<()> {
    let (Some(var), _) = var_names(ctx, node)? else {
        return Ok(());
    };
    let Some(current) = ctx.request_scope().get(&var).cloned() else {
        return Ok(());
    };
    if get(ctx, node)?.row_data() == Some(&current) {
        return Ok(());
    }
    debug!("row {row} of node {node} changed through {var}");
    let repeat = get_mut(ctx, node)?;
    if let Some(model) = repeat.model.as_mut() {
        model.set_row_data(current.clone())?;
    }
    if let Some(value) = repeat.value.as_mut() {
        if let Value::List(items) = value {
            if let Some(slot) = items.get_mut(row) {
                *slot = current;
            }
        }
        return Ok(());
    }
    let Some(expression) = ctx.attribute_expression(node, "value")? else {
        return Ok(());
    };
    if matches!(ctx.evaluate(&expression)?, Value::List(_)) {
        ctx.assign(&row_expression(&expression, row), current)?;
    }
    Ok(())
}

fn row_expression(expression: &str, row: usize) -> String {
    let trimmed = expression.trim();
    let inner = trimmed
        .strip_prefix("#{")
        .or_else(|| trimmed.strip_prefix("${"))
        .and_then(|rest| rest.strip_suffix('}'))
        .unwrap_or(trimmed);
    format!("#{{{inner}[{row}]}}")
}

pub fn process_decodes(ctx: &mut FacesContext, node: NodeId) -> Result<()> {
    if !ctx.tree().get(node)?.is_rendered() {
        return Ok(());
    }
    discard_transient_state(ctx, node)?;
    process(ctx, node, PhaseId::ApplyRequestValues)
}

pub fn process_validators(ctx: &mut FacesContext, node: NodeId) -> Result<()> {
    if !ctx.tree().get(node)?.is_rendered() {
        return Ok(());
    }
    reset_data_model(ctx, node)?;
    process(ctx, node, PhaseId::ProcessValidations)
}

pub fn process_updates(ctx: &mut FacesContext, node: NodeId) -> Result<()> {
    if !ctx.tree().get(node)?.is_rendered() {
        return Ok(());
    }
    reset_data_model(ctx, node)?;
    process(ctx, node, PhaseId::UpdateModelValues)
}

/// Render entry point; renders every row of the children.
pub fn encode_children(ctx: &mut FacesContext, node: NodeId) -> Result<()> {
    if !ctx.tree().get(node)?.is_rendered() {
        return Ok(());
    }
    discard_transient_state(ctx, node)?;
    process(ctx, node, PhaseId::RenderResponse)
}

/// Drops the model, and the per-row state unless errors or an enclosing iterator need it.
fn discard_transient_state(ctx: &mut FacesContext, node: NodeId) -> Result<()> {
    let keep = keep_saved(ctx, node)?;
    let repeat = get_mut(ctx, node)?;
    repeat.model = None;
    if !keep {
        repeat.child_state = None;
    }
    Ok(())
}

pub fn reset_client_ids(ctx: &FacesContext, node: NodeId) -> Result<()> {
    ctx.tree().reset_descendant_client_ids(node)
}

fn requires_row_iteration(ctx: &FacesContext, visit_context: &dyn VisitContext, node: NodeId) -> Result<bool> {
    if !visit_context.has_hint(VisitHint::SkipIteration) {
        return Ok(true);
    }
    let Some(source) = ctx.request_parameter(ctx.config().behavior_source_param()) else {
        return Ok(false);
    };
    let prefix = format!("{}{}", ctx.base_client_id(node)?, ctx.separator_char());
    Ok(source.starts_with(&prefix))
}

pub(crate) fn visit_tree(
    ctx: &mut FacesContext,
    visit_context: &mut dyn VisitContext,
    node: NodeId,
    callback: &mut VisitCallback<'_>,
) -> Result<bool> {
    if !visit::is_visitable(ctx, visit_context, node)? {
        return Ok(false);
    }
    let visit_rows = requires_row_iteration(ctx, visit_context, node)?;
    let previous = get(ctx, node)?.index;
    let mut scope = RowScope::enter(ctx, node, previous, visit_rows)?;
    if visit_rows {
        set_row_index(&mut scope, node, None)?;
    }
    get_mut(&mut scope, node)?.model = None;

    match visit_context.invoke_visit_callback(&mut scope, node, callback)? {
        VisitResult::Complete => return Ok(true),
        VisitResult::Reject => return Ok(false),
        VisitResult::Accept => {}
    }
    if visit_context.subtree_ids_to_visit(&scope, node)?.is_empty() {
        return Ok(false);
    }

    let children = scope.tree().children(node)?;
    if !visit_rows {
        for kid in children {
            if visit::visit_tree(&mut scope, visit_context, kid, callback)? {
                return Ok(true);
            }
        }
        return Ok(false);
    }

    data_model_ready(&mut scope, node)?;
    let bounds = iteration_bounds(&scope, node, true)?;
    let mut i = bounds.first;
    set_row_index(&mut scope, node, Some(to_row(i)?))?;
    while i <= bounds.last && is_row_available(&scope, node)? {
        publish_status(&mut scope, node, Some(bounds.status(i)))?;
        for kid in &children {
            if visit::visit_tree(&mut scope, visit_context, *kid, callback)? {
                return Ok(true);
            }
        }
        i += bounds.step;
        set_row_index(&mut scope, node, Some(to_row(i)?))?;
    }
    Ok(false)
}

/// Parses the row out of `client_id`, positions the cursor on it and looks for the target
/// within that row. The cursor is restored afterwards.
pub(crate) fn invoke_on_component(
    ctx: &mut FacesContext,
    node: NodeId,
    client_id: &str,
    callback: &mut ContextCallback<'_>,
) -> Result<bool> {
    let base = ctx.base_client_id(node)?;
    if client_id == base {
        callback(ctx, node)?;
        return Ok(true);
    }
    let separator = ctx.separator_char();
    let Some(rest) = client_id
        .strip_prefix(base.as_str())
        .and_then(|rest| rest.strip_prefix(separator))
    else {
        return Ok(false);
    };
    if !rest.starts_with(|c: char| c.is_ascii_digit()) {
        return find::invoke_on_component_default(ctx, node, client_id, callback);
    }
    let digits = rest.find(separator).map_or(rest, |end| &rest[..end]);
    let Ok(index) = digits.parse::<usize>() else {
        return Ok(false);
    };

    let previous = get(ctx, node)?.index;
    let mut scope = RowScope::enter(ctx, node, previous, true)?;
    set_row_index(&mut scope, node, Some(index))?;
    if !is_row_available(&scope, node)? {
        return Ok(false);
    }
    find::invoke_on_component_default(&mut scope, node, client_id, callback)
}

/// Redelivers an event queued from row `index`, with that row active again.
pub(crate) fn broadcast_indexed(
    ctx: &mut FacesContext,
    owner: NodeId,
    index: Option<usize>,
    target: &QueuedEvent,
) -> Result<()> {
    reset_data_model(ctx, owner)?;
    data_model_ready(ctx, owner)?;
    let previous = get(ctx, owner)?.index;
    let reposition = index.is_some() || previous.is_some();
    let mut scope = RowScope::enter(ctx, owner, previous, reposition)?;
    if reposition {
        set_row_index(&mut scope, owner, index)?;
    }
    let Some(row) = index else {
        return event::broadcast(&mut scope, target);
    };
    if !is_row_available(&scope, owner)? {
        debug!("dropping event for unavailable row {row} of node {owner}");
        return Ok(());
    }
    let bounds = iteration_bounds(&scope, owner, false)?;
    publish_status(&mut scope, owner, Some(bounds.status(row as i64)))?;
    event::broadcast(&mut scope, target)
}

pub fn save_state(ctx: &FacesContext, node: NodeId) -> Result<RepeatState> {
    reset_client_ids(ctx, node)?;
    let repeat = get(ctx, node)?;
    Ok(RepeatState {
        child_state: repeat.child_state.clone(),
        value: repeat.value.clone(),
        var: repeat.var.clone(),
        var_status: repeat.var_status.clone(),
        begin: repeat.begin,
        end: repeat.end,
        step: repeat.step,
        size: repeat.size,
        offset: repeat.offset,
        original_begin: repeat.original_begin,
        original_end: repeat.original_end,
    })
}

pub fn restore_state(ctx: &mut FacesContext, node: NodeId, state: &RepeatState) -> Result<()> {
    let repeat = get_mut(ctx, node)?;
    repeat.child_state = state.child_state.clone();
    repeat.value = state.value.clone();
    repeat.var = state.var.clone();
    repeat.var_status = state.var_status.clone();
    repeat.begin = state.begin;
    repeat.end = state.end;
    repeat.step = state.step;
    repeat.size = state.size;
    repeat.offset = state.offset;
    repeat.original_begin = state.original_begin;
    repeat.original_end = state.original_end;
    repeat.model = None;
    Ok(())
}

#[cfg(test)]
#[path = "../tests/repeat_tests.rs"]
mod tests;
