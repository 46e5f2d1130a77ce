//! Work-unit tree
//!
//! # Architecture
//!
//! - [`FiberId`](id::FiberId) - Generational handle to a fiber
//! - [`Fiber`](node::Fiber) - One position in the current or work-in-progress tree
//! - [`FiberArena`](arena::FiberArena) - Storage for both trees and the double-buffer protocol
//! - [`FiberTag`](tag::FiberTag) - Closed set of node kinds
//! - [`ExpirationTime`](expiration::ExpirationTime) - Priority token
//! - [`Element`](element::Element) - Element descriptors consumed by the factory
//! - [`FiberRoot`](root::FiberRoot) - Owner of the committed tree

pub mod arena;
pub mod element;
pub mod expiration;
pub mod factory;
pub mod id;
pub mod node;
pub mod root;
pub mod tag;

pub use arena::{Effects, FiberArena, Siblings};
pub use element::{
    ComponentType, ContextId, Element, ElementType, ExoticKind, ExoticType, Marker, Portal,
};
pub use expiration::ExpirationTime;
pub use factory::{is_simple_function_component, resolve_lazy_component_tag};
pub use id::FiberId;
pub use node::{ContextDependencies, ContextDependency, Fiber, StateNode};
pub use root::FiberRoot;
pub use tag::{FiberTag, ModeFlags, SideEffectFlags};
