use faces_core::{
    Component, ComponentKind, FacesContext, FacesEvent, Lifecycle, MarkupWriter, NodeId, Result, SharedBuffer,
    UIRepeat, Value,
};
use faces_search::{SearchExpressionContext, SearchExpressionHandler, SearchExpressionHint};
use log::{error, info};

const TASKS: [&str; 4] = ["Write parser", "Review visitor", "Fix row state", "Ship release"];

struct TaskView {
    ctx: FacesContext,
    save: NodeId,
}

/// `form > (title, tasks(repeat) > (label, done), save)`
fn build_view() -> Result<TaskView> {
    let mut ctx = FacesContext::default();
    ctx.request_scope_mut().insert(
        "tasks".into(),
        Value::list(TASKS.into_iter().map(|title| Value::map([("title", Value::from(title))]))),
    );

    let root = ctx.view_root();
    let form = ctx.add(root, Component::new(ComponentKind::form()).with_id("form"))?;
    ctx.add(
        form,
        Component::new(ComponentKind::Output)
            .with_id("title")
            .with_attr("value", "Tasks"),
    )?;
    let tasks = ctx.add(
        form,
        Component::new(ComponentKind::repeat(
            UIRepeat::new().with_var("task").with_var_status("status"),
        ))
        .with_id("tasks")
        .with_attr("value", "#{tasks}"),
    )?;
    ctx.add(
        tasks,
        Component::new(ComponentKind::required_input())
            .with_id("label")
            .with_attr("value", "#{task.title}"),
    )?;
    ctx.add(
        tasks,
        Component::new(ComponentKind::Command)
            .with_id("done")
            .with_attr("value", "Done")
            .with_listener(|ctx: &mut FacesContext, event: &FacesEvent| -> Result<()> {
                let title = ctx.evaluate("#{task.title}")?;
                let index = ctx.evaluate("#{status.index}")?;
                info!("{} completed row {index}: {title}", ctx.client_id(event.source())?);
                Ok(())
            }),
    )?;
    let save = ctx.add(
        form,
        Component::new(ComponentKind::Command)
            .with_id("save")
            .with_attr("value", "Save"),
    )?;
    Ok(TaskView { ctx, save })
}

fn render(ctx: &mut FacesContext, buffer: &SharedBuffer) -> Result<String> {
    buffer.clear();
    Lifecycle::new().render(ctx)?;
    Ok(buffer.contents())
}

fn resolve_expressions(view: &mut TaskView) -> Result<()> {
    let handler = SearchExpressionHandler::default();
    for expression in ["@this", "@form", "@previous", "@form:@child(0)", "@id(label)", "title @next @none"] {
        let search_context = SearchExpressionContext::new(view.save).with_hints([SearchExpressionHint::IgnoreNoResult]);
        let ids = handler.resolve_client_ids(&mut view.ctx, &search_context, expression)?;
        println!("  {expression:<20} -> {ids:?}");
    }

    let mut search_context = SearchExpressionContext::new(view.save)
        .with_hints([SearchExpressionHint::SkipVirtualComponents]);
    let id = handler.resolve_client_id(&mut view.ctx, &mut search_context, "@form:tasks:label")?;
    println!("  {:<20} -> {id:?}", "@form:tasks:label");
    Ok(())
}

fn run() -> Result<()> {
    let mut view = build_view()?;
    let buffer = SharedBuffer::new();
    view.ctx
        .set_response_writer(Box::new(MarkupWriter::new(buffer.clone())));

    println!("=== Initial render ===");
    println!("{}", render(&mut view.ctx, &buffer)?);

    println!("=== Postback: rename row 1, click done on row 2 ===");
    view.ctx.reset_request();
    view.ctx.set_request_parameter("form:tasks:0:label", TASKS[0]);
    view.ctx.set_request_parameter("form:tasks:1:label", "Review visit protocol");
    view.ctx.set_request_parameter("form:tasks:2:label", TASKS[2]);
    view.ctx.set_request_parameter("form:tasks:3:label", TASKS[3]);
    view.ctx.set_request_parameter("form:tasks:2:done", "Done");
    Lifecycle::new().execute(&mut view.ctx)?;
    println!("{}", render(&mut view.ctx, &buffer)?);

    println!("=== Postback: clear row 3 ===");
    view.ctx.reset_request();
    for (row, title) in TASKS.iter().enumerate() {
        let value = if row == 3 { "" } else { *title };
        view.ctx.set_request_parameter(format!("form:tasks:{row}:label"), value);
    }
    Lifecycle::new().execute(&mut view.ctx)?;
    for message in view.ctx.messages() {
        println!("  {:?} {:?}: {}", message.severity, message.client_id, message.summary);
    }
    println!("{}", render(&mut view.ctx, &buffer)?);

    println!("=== Search expressions from form:save ===");
    resolve_expressions(&mut view)
}

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        error!("demo failed: {err}");
        std::process::exit(1);
    }
}
