//! Bulk content setters

use tracing::trace;

use super::{HostDocument, HostNodeId, SVG_NAMESPACE};

/// Replace the children of `node` with parsed `html`.
///
/// SVG elements on hosts without markup support for them are filled through
/// a detached scratch element: the markup is parsed inside an `<svg>`
/// wrapper and the resulting children are moved across.
pub fn set_inner_html<D: HostDocument + ?Sized>(
    doc: &mut D,
    node: HostNodeId,
    html: &str,
) {
    let is_svg = doc.namespace_uri(node).as_deref() == Some(SVG_NAMESPACE);
    if !is_svg || doc.supports_inner_html(node) {
        doc.set_inner_html(node, html);
        return;
    }

    trace!(%node, "setting svg markup through a scratch element");
    let scratch = doc.create_element("div", None);
    doc.set_inner_html(scratch, &format!("<svg>{}</svg>", html));

    while let Some(child) = doc.first_child(node) {
        doc.remove_child(node, child);
    }
    if let Some(wrapper) = doc.first_child(scratch) {
        while let Some(child) = doc.first_child(wrapper) {
            doc.append_child(node, child);
        }
    }
}

/// Replace the children of `node` with `text`.
///
/// When the only child is already a text node its data is overwritten in
/// place instead of rebuilding the children.
pub fn set_text_content<D: HostDocument + ?Sized>(
    doc: &mut D,
    node: HostNodeId,
    text: &str,
) {
    if !text.is_empty() {
        if let Some(first) = doc.first_child(node) {
            if doc.last_child(node) == Some(first) && doc.is_text_node(first) {
                doc.set_node_value(first, text);
                return;
            }
        }
    }
    doc.set_text_content(node, text);
}
