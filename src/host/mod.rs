//! Host collaborator contracts
//!
//! The reconciler never touches a host tree directly. Mutations go through
//! [`HostDocument`], and the helpers in this module encode the rules a host
//! applier follows when writing fields:
//!
//! - [`property`] - classification table for known field names
//! - [`attribute`] - attribute name safety and typed field get/set
//! - [`content`] - bulk content setters (markup and text)
//! - [`custom_element`] - user-defined element detection
//! - [`memory`] - in-memory document used by tests and the replay tool

pub mod attribute;
pub mod content;
pub mod custom_element;
pub mod memory;
pub mod property;

pub use attribute::{
    get_value_for_attribute, get_value_for_property, set_value_for_property,
    AttributeNameValidator,
};
pub use content::{set_inner_html, set_text_content};
pub use custom_element::is_custom_component;
pub use memory::MemoryDocument;
pub use property::{
    get_property_info, should_ignore_attribute, should_remove_attribute,
    should_remove_attribute_with_warning, PropertyInfo, PropertyType,
};

use std::fmt;

use crate::value::Value;

/// XHTML namespace.
pub const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";
/// MathML namespace.
pub const MATH_NAMESPACE: &str = "http://www.w3.org/1998/Math/MathML";
/// SVG namespace.
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
/// XLink namespace.
pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";
/// XML namespace.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Handle to a node owned by a host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostNodeId(pub u32);

impl fmt::Display for HostNodeId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "HostNode({})", self.0)
    }
}

/// Operations a host tree exposes to the applier.
pub trait HostDocument {
    /// Create a detached element. `namespace` of `None` means HTML.
    fn create_element(
        &mut self,
        tag: &str,
        namespace: Option<&str>,
    ) -> HostNodeId;

    /// Create a detached text node.
    fn create_text_node(
        &mut self,
        text: &str,
    ) -> HostNodeId;

    fn first_child(
        &self,
        node: HostNodeId,
    ) -> Option<HostNodeId>;

    fn last_child(
        &self,
        node: HostNodeId,
    ) -> Option<HostNodeId>;

    fn next_sibling(
        &self,
        node: HostNodeId,
    ) -> Option<HostNodeId>;

    fn is_text_node(
        &self,
        node: HostNodeId,
    ) -> bool;

    /// Namespace URI of an element.
    fn namespace_uri(
        &self,
        node: HostNodeId,
    ) -> Option<String>;

    /// Append `child`, detaching it from its previous parent first.
    fn append_child(
        &mut self,
        parent: HostNodeId,
        child: HostNodeId,
    );

    fn remove_child(
        &mut self,
        parent: HostNodeId,
        child: HostNodeId,
    );

    fn get_attribute(
        &self,
        node: HostNodeId,
        name: &str,
    ) -> Option<String>;

    fn has_attribute(
        &self,
        node: HostNodeId,
        name: &str,
    ) -> bool {
        self.get_attribute(node, name).is_some()
    }

    fn set_attribute(
        &mut self,
        node: HostNodeId,
        name: &str,
        value: &str,
    );

    fn set_attribute_ns(
        &mut self,
        node: HostNodeId,
        namespace: &str,
        name: &str,
        value: &str,
    );

    fn remove_attribute(
        &mut self,
        node: HostNodeId,
        name: &str,
    );

    /// Read a property of the live node object (`Null` when unset).
    fn get_property(
        &self,
        node: HostNodeId,
        name: &str,
    ) -> Value;

    fn set_property(
        &mut self,
        node: HostNodeId,
        name: &str,
        value: Value,
    );

    /// Whether `set_inner_html` works for this node's namespace.
    fn supports_inner_html(
        &self,
        node: HostNodeId,
    ) -> bool;

    /// Replace all children with parsed markup.
    fn set_inner_html(
        &mut self,
        node: HostNodeId,
        html: &str,
    );

    /// Replace all children with a single text node (none for `""`).
    fn set_text_content(
        &mut self,
        node: HostNodeId,
        text: &str,
    );

    /// Overwrite the data of a text node.
    fn set_node_value(
        &mut self,
        node: HostNodeId,
        text: &str,
    );
}

#[cfg(test)]
mod tests;
