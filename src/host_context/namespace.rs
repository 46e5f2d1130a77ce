//! Document namespace context

use std::sync::Arc;

use super::HostConfig;
use crate::host::{HostNodeId, HTML_NAMESPACE, MATH_NAMESPACE, SVG_NAMESPACE};

/// Namespace children are created in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Namespace {
    #[default]
    Html,
    Svg,
    Math,
}

impl Namespace {
    /// Namespace from a URI; unknown URIs count as HTML.
    pub fn from_uri(uri: Option<&str>) -> Self {
        match uri {
            Some(SVG_NAMESPACE) => Namespace::Svg,
            Some(MATH_NAMESPACE) => Namespace::Math,
            _ => Namespace::Html,
        }
    }

    /// URI elements of this namespace are created with.
    pub fn uri(self) -> &'static str {
        match self {
            Namespace::Html => HTML_NAMESPACE,
            Namespace::Svg => SVG_NAMESPACE,
            Namespace::Math => MATH_NAMESPACE,
        }
    }

    /// Namespace an element `tag` introduces on its own.
    pub fn intrinsic(tag: &str) -> Self {
        match tag {
            "svg" => Namespace::Svg,
            "math" => Namespace::Math,
            _ => Namespace::Html,
        }
    }

    /// Namespace of the children of `tag` inside `self`.
    pub fn child(
        self,
        tag: &str,
    ) -> Self {
        match self {
            Namespace::Html => Namespace::intrinsic(tag),
            Namespace::Svg if tag == "foreignObject" => Namespace::Html,
            other => other,
        }
    }
}

/// Root container with what is known about its place in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespacedContainer {
    pub node: HostNodeId,
    pub namespace: Namespace,
    pub tag: Arc<str>,
}

impl NamespacedContainer {
    pub fn new(
        node: HostNodeId,
        namespace_uri: Option<&str>,
        tag: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            node,
            namespace: Namespace::from_uri(namespace_uri),
            tag: tag.into(),
        }
    }
}

/// Context derivation for document hosts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamespaceHostConfig;

impl HostConfig for NamespaceHostConfig {
    type Container = NamespacedContainer;
    type Context = Namespace;

    fn root_host_context(
        &self,
        container: &NamespacedContainer,
    ) -> Namespace {
        container.namespace.child(&container.tag)
    }

    fn child_host_context(
        &self,
        parent: &Namespace,
        tag: &str,
        _root: &NamespacedContainer,
    ) -> Namespace {
        parent.child(tag)
    }
}
