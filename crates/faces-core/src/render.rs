use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use crate::component::ComponentKind;
use crate::error::Result;
use crate::{repeat, FacesContext, NodeId};

/// Sink for rendered markup.
pub trait ResponseWriter {
    fn start_element(&mut self, name: &str, client_id: &str) -> io::Result<()>;
    fn write_text(&mut self, text: &str) -> io::Result<()>;
    fn end_element(&mut self, name: &str) -> io::Result<()>;
}

/// Writes elements as `<name id="client-id">` tags without escaping.
pub struct MarkupWriter<W: Write> {
    out: W,
}

impl<W: Write> MarkupWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ResponseWriter for MarkupWriter<W> {
    fn start_element(&mut self, name: &str, client_id: &str) -> io::Result<()> {
        write!(self.out, "<{name} id=\"{client_id}\">")
    }

    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())
    }

    fn end_element(&mut self, name: &str) -> io::Result<()> {
        write!(self.out, "</{name}>")
    }
}

/// Cloneable in-memory byte sink; clones share the same buffer.
#[derive(Clone, Debug, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn tag(kind: &ComponentKind) -> Option<&'static str> {
    match kind {
        ComponentKind::ViewRoot => Some("view"),
        ComponentKind::Panel | ComponentKind::NamingContainer | ComponentKind::Composite => Some("div"),
        ComponentKind::Form { .. } => Some("form"),
        ComponentKind::Output => Some("span"),
        ComponentKind::Input(_) => Some("input"),
        ComponentKind::Command => Some("button"),
        ComponentKind::Repeat(_) => None,
    }
}

/// Text an input shows: the submitted value, else the local value, else the model value.
pub fn input_display_value(ctx: &FacesContext, node: NodeId) -> Result<String> {
    let component = ctx.tree().get(node)?;
    if let Some(input) = component.kind().as_input() {
        if let Some(submitted) = &input.editable.submitted_value {
            return Ok(submitted.to_string());
        }
        if input.editable.local_value_set {
            return Ok(input.editable.value.to_string());
        }
    }
    Ok(ctx
        .attribute_value(node, "value")?
        .map(|value| value.to_string())
        .unwrap_or_default())
}

/// Renders `node` and its subtree. Unrendered components produce nothing.
pub fn encode_all(ctx: &mut FacesContext, node: NodeId) -> Result<()> {
    let component = ctx.tree().get(node)?;
    if !component.is_rendered() {
        return Ok(());
    }
    let Some(name) = tag(component.kind()) else {
        return repeat::encode_children(ctx, node);
    };

    let client_id = ctx.client_id(node)?;
    let text = match ctx.tree().get(node)?.kind() {
        ComponentKind::Input(_) => Some(input_display_value(ctx, node)?),
        ComponentKind::Output | ComponentKind::Command => ctx
            .attribute_value(node, "value")?
            .map(|value| value.to_string()),
        _ => None,
    };

    ctx.response_writer()?.start_element(name, &client_id)?;
    if let Some(text) = text {
        ctx.response_writer()?.write_text(&text)?;
    }
    for kid in ctx.tree().facets_and_children(node)? {
        encode_all(ctx, kid)?;
    }
    ctx.response_writer()?.end_element(name)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_writer_emits_tags_into_shared_buffer() {
        let buffer = SharedBuffer::new();
        let mut writer = MarkupWriter::new(buffer.clone());
        writer.start_element("span", "form:out").unwrap();
        writer.write_text("hi").unwrap();
        writer.end_element("span").unwrap();
        assert_eq!(buffer.contents(), "<span id=\"form:out\">hi</span>");
        buffer.clear();
        assert!(buffer.contents().is_empty());
    }
}
