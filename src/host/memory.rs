//! In-memory host document
//!
//! A small element/text tree implementing [`HostDocument`]. It parses and
//! serializes a forgiving subset of markup (elements, quoted or bare
//! attributes, text with the basic entities), which is enough to observe
//! what an applier wrote.

use indexmap::IndexMap;

use super::{HostDocument, HostNodeId, HTML_NAMESPACE, SVG_NAMESPACE};
use crate::value::Value;

const VOID_ELEMENTS: &[&str] = &["area", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "wbr"];

#[derive(Debug, Clone)]
struct Attribute {
    namespace: Option<String>,
    value: String,
}

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        tag: String,
        namespace: String,
        attributes: IndexMap<String, Attribute>,
        properties: IndexMap<String, Value>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<HostNodeId>,
    children: Vec<HostNodeId>,
}

/// Host document backed by a node vector.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<NodeData>,
    svg_inner_html: bool,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// Document whose elements all accept markup.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            svg_inner_html: true,
        }
    }

    /// Document whose SVG elements ignore `set_inner_html`, like older
    /// browser engines.
    pub fn without_svg_inner_html() -> Self {
        Self {
            svg_inner_html: false,
            ..Self::new()
        }
    }

    /// Create a detached `div` to render into.
    pub fn create_container(&mut self) -> HostNodeId {
        self.create_element("div", None)
    }

    /// Number of nodes ever created.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(
        &self,
        id: HostNodeId,
    ) -> Option<&NodeData> {
        self.nodes.get(id.0 as usize)
    }

    fn node_mut(
        &mut self,
        id: HostNodeId,
    ) -> Option<&mut NodeData> {
        self.nodes.get_mut(id.0 as usize)
    }

    fn push(
        &mut self,
        kind: NodeKind,
    ) -> HostNodeId {
        let id = HostNodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Children of `node`, in order.
    pub fn children(
        &self,
        node: HostNodeId,
    ) -> &[HostNodeId] {
        self.node(node).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(
        &self,
        node: HostNodeId,
    ) -> Option<HostNodeId> {
        self.node(node).and_then(|n| n.parent)
    }

    /// Tag name of an element.
    pub fn tag_name(
        &self,
        node: HostNodeId,
    ) -> Option<&str> {
        match &self.node(node)?.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    /// Data of a text node.
    pub fn text(
        &self,
        node: HostNodeId,
    ) -> Option<&str> {
        match &self.node(node)?.kind {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element { .. } => None,
        }
    }

    /// Namespace an attribute was written with.
    pub fn attribute_namespace(
        &self,
        node: HostNodeId,
        name: &str,
    ) -> Option<&str> {
        match &self.node(node)?.kind {
            NodeKind::Element { attributes, .. } => attributes.get(name)?.namespace.as_deref(),
            NodeKind::Text(_) => None,
        }
    }

    /// Concatenated text of the subtree.
    pub fn text_content(
        &self,
        node: HostNodeId,
    ) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(
        &self,
        node: HostNodeId,
        out: &mut String,
    ) {
        let Some(data) = self.node(node) else {
            return;
        };
        match &data.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element { .. } => {
                for &child in &data.children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// Serialized children of `node`.
    pub fn inner_html(
        &self,
        node: HostNodeId,
    ) -> String {
        let mut out = String::new();
        for &child in self.children(node) {
            self.serialize(child, &mut out);
        }
        out
    }

    fn serialize(
        &self,
        node: HostNodeId,
        out: &mut String,
    ) {
        let Some(data) = self.node(node) else {
            return;
        };
        match &data.kind {
            NodeKind::Text(text) => out.push_str(&escape(text)),
            NodeKind::Element {
                tag, attributes, ..
            } => {
                out.push('<');
                out.push_str(tag);
                for (name, attr) in attributes {
                    out.push_str(&format!(" {}=\"{}\"", name, escape(&attr.value)));
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    return;
                }
                for &child in &data.children {
                    self.serialize(child, out);
                }
                out.push_str(&format!("</{}>", tag));
            }
        }
    }

    fn detach(
        &mut self,
        child: HostNodeId,
    ) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|&c| c != child);
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = None;
        }
    }

    fn clear_children(
        &mut self,
        node: HostNodeId,
    ) {
        let children = match self.node_mut(node) {
            Some(data) => std::mem::take(&mut data.children),
            None => return,
        };
        for child in children {
            if let Some(c) = self.node_mut(child) {
                c.parent = None;
            }
        }
    }

    /// Namespace children of `parent` are created in.
    fn child_namespace(
        &self,
        parent: Option<HostNodeId>,
        tag: &str,
    ) -> String {
        if tag == "svg" {
            return SVG_NAMESPACE.to_string();
        }
        match parent.and_then(|p| self.node(p)).map(|p| &p.kind) {
            Some(NodeKind::Element {
                tag: parent_tag,
                namespace,
                ..
            }) => {
                if namespace == SVG_NAMESPACE && parent_tag == "foreignObject" {
                    HTML_NAMESPACE.to_string()
                } else {
                    namespace.clone()
                }
            }
            _ => HTML_NAMESPACE.to_string(),
        }
    }

    fn attach(
        &mut self,
        parent: HostNodeId,
        child: HostNodeId,
    ) {
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
        if let Some(p) = self.node_mut(parent) {
            p.children.push(child);
        }
    }

    /// Parse `html` and append the resulting nodes to `target`.
    fn parse_into(
        &mut self,
        target: HostNodeId,
        html: &str,
    ) {
        let mut open: Vec<HostNodeId> = vec![target];
        let mut rest = html;

        while !rest.is_empty() {
            let parent = open.last().copied().unwrap_or(target);

            if let Some(after) = rest.strip_prefix("</") {
                let end = after.find('>').unwrap_or(after.len());
                let name = after[..end].trim();
                if open.len() > 1 && self.tag_name(parent) == Some(name) {
                    open.pop();
                }
                rest = after.get(end + 1..).unwrap_or("");
                continue;
            }

            let starts_tag = rest.starts_with('<')
                && rest[1..].chars().next().is_some_and(|c| c.is_ascii_alphabetic());
            if !starts_tag {
                let skip = rest.chars().next().map(char::len_utf8).unwrap_or(1);
                let end = rest[skip..].find('<').map(|i| i + skip).unwrap_or(rest.len());
                let text = unescape(&rest[..end]);
                let node = self.push(NodeKind::Text(text));
                self.attach(parent, node);
                rest = &rest[end..];
                continue;
            }

            let (tag, attributes, self_closing, remaining) = parse_tag(&rest[1..]);
            let namespace = self.child_namespace(Some(parent), &tag);
            let node = self.push(NodeKind::Element {
                tag: tag.clone(),
                namespace,
                attributes,
                properties: IndexMap::new(),
            });
            self.attach(parent, node);
            if !self_closing && !VOID_ELEMENTS.contains(&tag.as_str()) {
                open.push(node);
            }
            rest = remaining;
        }
    }
}

/// Parse `name attr="v" ...>` (the leading `<` already consumed).
fn parse_tag(input: &str) -> (String, IndexMap<String, Attribute>, bool, &str) {
    let name_end = input
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .unwrap_or(input.len());
    let tag = input[..name_end].to_string();
    let mut rest = &input[name_end..];
    let mut attributes = IndexMap::new();

    loop {
        rest = rest.trim_start();
        if let Some(after) = rest.strip_prefix("/>") {
            return (tag, attributes, true, after);
        }
        if let Some(after) = rest.strip_prefix('>') {
            return (tag, attributes, false, after);
        }
        if rest.is_empty() {
            return (tag, attributes, false, rest);
        }
        if let Some(after) = rest.strip_prefix('/') {
            rest = after;
            continue;
        }

        let name_end = rest
            .find(|c: char| c.is_whitespace() || c == '=' || c == '>' || c == '/')
            .unwrap_or(rest.len());
        let name = rest[..name_end].to_string();
        rest = rest[name_end..].trim_start();

        let mut value = String::new();
        if let Some(after) = rest.strip_prefix('=') {
            let after = after.trim_start();
            match after.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let body = &after[1..];
                    let end = body.find(quote).unwrap_or(body.len());
                    value = unescape(&body[..end]);
                    rest = body.get(end + 1..).unwrap_or("");
                }
                _ => {
                    let end = after
                        .find(|c: char| c.is_whitespace() || c == '>')
                        .unwrap_or(after.len());
                    value = unescape(&after[..end]);
                    rest = &after[end..];
                }
            }
        }
        attributes.insert(
            name,
            Attribute {
                namespace: None,
                value,
            },
        );
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

impl HostDocument for MemoryDocument {
    fn create_element(
        &mut self,
        tag: &str,
        namespace: Option<&str>,
    ) -> HostNodeId {
        let namespace = match namespace {
            Some(ns) => ns.to_string(),
            None if tag == "svg" => SVG_NAMESPACE.to_string(),
            None => HTML_NAMESPACE.to_string(),
        };
        self.push(NodeKind::Element {
            tag: tag.to_string(),
            namespace,
            attributes: IndexMap::new(),
            properties: IndexMap::new(),
        })
    }

    fn create_text_node(
        &mut self,
        text: &str,
    ) -> HostNodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    fn first_child(
        &self,
        node: HostNodeId,
    ) -> Option<HostNodeId> {
        self.children(node).first().copied()
    }

    fn last_child(
        &self,
        node: HostNodeId,
    ) -> Option<HostNodeId> {
        self.children(node).last().copied()
    }

    fn next_sibling(
        &self,
        node: HostNodeId,
    ) -> Option<HostNodeId> {
        let siblings = self.children(self.parent(node)?);
        let position = siblings.iter().position(|&c| c == node)?;
        siblings.get(position + 1).copied()
    }

    fn is_text_node(
        &self,
        node: HostNodeId,
    ) -> bool {
        self.text(node).is_some()
    }

    fn namespace_uri(
        &self,
        node: HostNodeId,
    ) -> Option<String> {
        match &self.node(node)?.kind {
            NodeKind::Element { namespace, .. } => Some(namespace.clone()),
            NodeKind::Text(_) => None,
        }
    }

    fn append_child(
        &mut self,
        parent: HostNodeId,
        child: HostNodeId,
    ) {
        self.detach(child);
        self.attach(parent, child);
    }

    fn remove_child(
        &mut self,
        parent: HostNodeId,
        child: HostNodeId,
    ) {
        if self.parent(child) == Some(parent) {
            self.detach(child);
        }
    }

    fn get_attribute(
        &self,
        node: HostNodeId,
        name: &str,
    ) -> Option<String> {
        match &self.node(node)?.kind {
            NodeKind::Element { attributes, .. } => attributes.get(name).map(|a| a.value.clone()),
            NodeKind::Text(_) => None,
        }
    }

    fn set_attribute(
        &mut self,
        node: HostNodeId,
        name: &str,
        value: &str,
    ) {
        if let Some(NodeKind::Element { attributes, .. }) = self.node_mut(node).map(|n| &mut n.kind) {
            attributes.insert(
                name.to_string(),
                Attribute {
                    namespace: None,
                    value: value.to_string(),
                },
            );
        }
    }

    fn set_attribute_ns(
        &mut self,
        node: HostNodeId,
        namespace: &str,
        name: &str,
        value: &str,
    ) {
        if let Some(NodeKind::Element { attributes, .. }) = self.node_mut(node).map(|n| &mut n.kind) {
            attributes.insert(
                name.to_string(),
                Attribute {
                    namespace: Some(namespace.to_string()),
                    value: value.to_string(),
                },
            );
        }
    }

    fn remove_attribute(
        &mut self,
        node: HostNodeId,
        name: &str,
    ) {
        if let Some(NodeKind::Element { attributes, .. }) = self.node_mut(node).map(|n| &mut n.kind) {
            attributes.shift_remove(name);
        }
    }

    fn get_property(
        &self,
        node: HostNodeId,
        name: &str,
    ) -> Value {
        match self.node(node).map(|n| &n.kind) {
            Some(NodeKind::Element { properties, .. }) => {
                properties.get(name).cloned().unwrap_or(Value::Null)
            }
            _ => Value::Null,
        }
    }

    fn set_property(
        &mut self,
        node: HostNodeId,
        name: &str,
        value: Value,
    ) {
        if let Some(NodeKind::Element { properties, .. }) = self.node_mut(node).map(|n| &mut n.kind) {
            properties.insert(name.to_string(), value);
        }
    }

    fn supports_inner_html(
        &self,
        node: HostNodeId,
    ) -> bool {
        self.svg_inner_html || self.namespace_uri(node).as_deref() != Some(SVG_NAMESPACE)
    }

    fn set_inner_html(
        &mut self,
        node: HostNodeId,
        html: &str,
    ) {
        if !self.supports_inner_html(node) {
            return;
        }
        self.clear_children(node);
        self.parse_into(node, html);
    }

    fn set_text_content(
        &mut self,
        node: HostNodeId,
        text: &str,
    ) {
        self.clear_children(node);
        if !text.is_empty() {
            let child = self.create_text_node(text);
            self.attach(node, child);
        }
    }

    fn set_node_value(
        &mut self,
        node: HostNodeId,
        text: &str,
    ) {
        if let Some(NodeKind::Text(data)) = self.node_mut(node).map(|n| &mut n.kind) {
            *data = text.to_string();
        }
    }
}
