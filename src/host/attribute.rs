//! Attribute name safety and typed field access
//!
//! [`set_value_for_property`] is the single entry point a host applier uses
//! to write one prop to an element. It consults the classification table,
//! drops unsafe names, removes fields whose value means "absent", and
//! coerces everything else to a string.

use hashbrown::HashSet;
use once_cell::sync::Lazy;
use regex::Regex;

use super::property::{
    get_property_info, should_ignore_attribute, should_remove_attribute,
    should_remove_attribute_with_warning, PropertyType,
};
use super::{HostDocument, HostNodeId};
use crate::util::diagnostic::{DiagnosticCode, Diagnostics};
use crate::value::Value;

const ATTRIBUTE_NAME_START_CHAR: &str = r":A-Z_a-z\x{C0}-\x{D6}\x{D8}-\x{F6}\x{F8}-\x{2FF}\x{370}-\x{37D}\x{37F}-\x{1FFF}\x{200C}-\x{200D}\x{2070}-\x{218F}\x{2C00}-\x{2FEF}\x{3001}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFFD}";

const ATTRIBUTE_NAME_CHAR_EXTRA: &str = r"\-.0-9\x{B7}\x{300}-\x{36F}\x{203F}-\x{2040}";

static VALID_ATTRIBUTE_NAME: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(
        "^[{start}][{start}{extra}]*$",
        start = ATTRIBUTE_NAME_START_CHAR,
        extra = ATTRIBUTE_NAME_CHAR_EXTRA
    );
    Regex::new(&pattern).unwrap_or_else(|e| panic!("attribute name pattern is invalid: {}", e))
});

/// XML name check with outcome caches.
///
/// Each name is matched against the grammar once; an unsafe name produces a
/// single `InvalidAttributeName` diagnostic however often it is checked.
#[derive(Debug, Clone, Default)]
pub struct AttributeNameValidator {
    validated: HashSet<String>,
    illegal: HashSet<String>,
}

impl AttributeNameValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` may be written as an attribute.
    pub fn is_attribute_name_safe(
        &mut self,
        name: &str,
        diagnostics: &mut Diagnostics,
    ) -> bool {
        if self.validated.contains(name) {
            return true;
        }
        if self.illegal.contains(name) {
            return false;
        }
        if VALID_ATTRIBUTE_NAME.is_match(name) {
            self.validated.insert(name.to_string());
            return true;
        }
        self.illegal.insert(name.to_string());
        diagnostics.warn(
            DiagnosticCode::InvalidAttributeName,
            name,
            format!("Invalid attribute name: `{}`", name),
        );
        false
    }

    /// Number of names known to be safe.
    pub fn validated_len(&self) -> usize {
        self.validated.len()
    }

    /// Number of names known to be unsafe.
    pub fn illegal_len(&self) -> usize {
        self.illegal.len()
    }
}

/// Write prop `name` with `value` to `node`.
#[allow(clippy::too_many_arguments)]
pub fn set_value_for_property<D: HostDocument + ?Sized>(
    doc: &mut D,
    node: HostNodeId,
    name: &str,
    value: &Value,
    is_custom_component: bool,
    validator: &mut AttributeNameValidator,
    diagnostics: &mut Diagnostics,
) {
    let info = get_property_info(name);
    if should_ignore_attribute(name, info, is_custom_component) {
        return;
    }

    if should_remove_attribute_with_warning(name, value, info, is_custom_component) {
        diagnostics.warn(
            DiagnosticCode::InvalidPropValue,
            format!("{}:{}", name, value.type_name()),
            format!("Invalid value for prop `{}`: a {} cannot be written to the host", name, value.type_name()),
        );
    }
    let removed = should_remove_attribute(name, value, info, is_custom_component);

    let info = match info {
        Some(info) if !is_custom_component => info,
        _ => {
            if validator.is_attribute_name_safe(name, diagnostics) {
                if removed {
                    doc.remove_attribute(node, name);
                } else {
                    doc.set_attribute(node, name, &value.to_host_string());
                }
            }
            return;
        }
    };

    if info.must_use_property {
        let property_value = if removed {
            if info.property_type == PropertyType::Boolean {
                Value::Bool(false)
            } else {
                Value::string("")
            }
        } else {
            value.clone()
        };
        doc.set_property(node, info.property_name, property_value);
        return;
    }

    let attribute_name = info.attribute_name.as_str();
    if removed {
        doc.remove_attribute(node, attribute_name);
        return;
    }

    let attribute_value = match (info.property_type, value) {
        (PropertyType::Boolean, _) | (PropertyType::OverloadedBoolean, Value::Bool(true)) => {
            String::new()
        }
        _ => value.to_host_string(),
    };
    match info.attribute_namespace {
        Some(namespace) => doc.set_attribute_ns(node, namespace, attribute_name, &attribute_value),
        None => doc.set_attribute(node, attribute_name, &attribute_value),
    }
}

/// Read prop `name` back from `node`, interpreting the stored field against
/// the value that was expected to be there. `None` means the field is
/// absent.
pub fn get_value_for_property<D: HostDocument + ?Sized>(
    doc: &D,
    node: HostNodeId,
    name: &str,
    expected: &Value,
) -> Option<Value> {
    let Some(info) = get_property_info(name) else {
        return doc.get_attribute(node, name).map(Value::from);
    };

    if info.must_use_property {
        return match doc.get_property(node, info.property_name) {
            Value::Null => None,
            Value::Bool(false) if info.property_type == PropertyType::Boolean => None,
            value => Some(value),
        };
    }

    let stored = doc.get_attribute(node, &info.attribute_name)?;
    let value = match info.property_type {
        PropertyType::Boolean => Value::Bool(true),
        PropertyType::OverloadedBoolean if stored.is_empty() => Value::Bool(true),
        _ if !should_remove_attribute(name, expected, Some(info), false)
            && stored == expected.to_host_string() =>
        {
            expected.clone()
        }
        _ => Value::from(stored),
    };
    Some(value)
}

/// Read attribute `name` of a custom element back. Unsafe names read as
/// absent.
pub fn get_value_for_attribute<D: HostDocument + ?Sized>(
    doc: &D,
    node: HostNodeId,
    name: &str,
    expected: &Value,
    validator: &mut AttributeNameValidator,
    diagnostics: &mut Diagnostics,
) -> Option<Value> {
    if !validator.is_attribute_name_safe(name, diagnostics) {
        return None;
    }
    let stored = doc.get_attribute(node, name)?;
    if stored == expected.to_host_string() {
        Some(expected.clone())
    } else {
        Some(Value::from(stored))
    }
}
