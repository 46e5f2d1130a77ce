//! Field classification table
//!
//! Maps a prop name to how it is written to the host: which attribute (and
//! namespace) it lands in, whether it is written as a live property, and how
//! its value is coerced. Names not in the table are written verbatim as
//! attributes once they pass the name-safety check.

use hashbrown::HashMap;
use once_cell::sync::Lazy;

use super::{XLINK_NAMESPACE, XML_NAMESPACE};
use crate::value::Value;

/// How a field's value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    /// Handled by the reconciler itself; never written to the host
    Reserved,
    /// Plain string attribute
    String,
    /// String attribute that also accepts booleans (`"true"` / `"false"`)
    BooleanishString,
    /// Present (`""`) when truthy, removed when falsy
    Boolean,
    /// Boolean when given a boolean, string otherwise
    OverloadedBoolean,
    /// Number; removed when `NaN`
    Numeric,
    /// Number; removed when `NaN` or below 1
    PositiveNumeric,
}

/// Classification of one known field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyInfo {
    pub property_name: &'static str,
    pub attribute_name: String,
    pub attribute_namespace: Option<&'static str>,
    pub property_type: PropertyType,
    /// Written through the live property rather than the attribute
    pub must_use_property: bool,
}

impl PropertyInfo {
    fn new(
        property_name: &'static str,
        property_type: PropertyType,
        must_use_property: bool,
        attribute_name: String,
        attribute_namespace: Option<&'static str>,
    ) -> Self {
        Self {
            property_name,
            attribute_name,
            attribute_namespace,
            property_type,
            must_use_property,
        }
    }

    /// Whether boolean values are meaningful for this field.
    pub fn accepts_booleans(&self) -> bool {
        matches!(
            self.property_type,
            PropertyType::BooleanishString | PropertyType::Boolean | PropertyType::OverloadedBoolean
        )
    }
}

const RESERVED: &[&str] = &[
    "children",
    "dangerouslySetInnerHTML",
    "defaultValue",
    "defaultChecked",
    "innerHTML",
    "suppressContentEditableWarning",
    "suppressHydrationWarning",
    "style",
];

const ALIASED_STRINGS: &[(&str, &str)] = &[
    ("acceptCharset", "accept-charset"),
    ("className", "class"),
    ("htmlFor", "for"),
    ("httpEquiv", "http-equiv"),
];

const BOOLEANISH_LOWERCASE: &[&str] = &["contentEditable", "draggable", "spellCheck", "value"];

// SVG keeps these camel-cased.
const BOOLEANISH_CASE_SENSITIVE: &[&str] = &[
    "autoReverse",
    "externalResourcesRequired",
    "focusable",
    "preserveAlpha",
];

const BOOLEANS: &[&str] = &[
    "allowFullScreen",
    "async",
    "autoFocus",
    "autoPlay",
    "controls",
    "default",
    "defer",
    "disabled",
    "formNoValidate",
    "hidden",
    "loop",
    "noModule",
    "noValidate",
    "open",
    "playsInline",
    "readOnly",
    "required",
    "reversed",
    "scoped",
    "seamless",
    "itemScope",
];

const BOOLEAN_PROPERTIES: &[&str] = &["checked", "multiple", "muted", "selected"];

const OVERLOADED_BOOLEANS: &[&str] = &["capture", "download"];

const POSITIVE_NUMERICS: &[&str] = &["cols", "rows", "size", "span"];

const NUMERICS: &[&str] = &["rowSpan", "start"];

const LOWERCASE_STRINGS: &[&str] = &["tabIndex", "crossOrigin"];

const SVG_HYPHENATED: &[&str] = &[
    "alignmentBaseline",
    "clipPath",
    "clipRule",
    "dominantBaseline",
    "fillOpacity",
    "fillRule",
    "fontFamily",
    "fontSize",
    "fontWeight",
    "stopColor",
    "stopOpacity",
    "strokeDasharray",
    "strokeLinecap",
    "strokeLinejoin",
    "strokeOpacity",
    "strokeWidth",
    "textAnchor",
];

const XLINK_ATTRIBUTES: &[&str] = &[
    "xlinkActuate",
    "xlinkArcrole",
    "xlinkHref",
    "xlinkRole",
    "xlinkShow",
    "xlinkTitle",
    "xlinkType",
];

const XML_ATTRIBUTES: &[&str] = &["xmlBase", "xmlLang", "xmlSpace"];

/// `strokeWidth` -> `stroke-width`
fn hyphenate(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// `xlinkHref` -> `xlink:href`
fn prefixed(
    name: &str,
    prefix: &str,
) -> String {
    let rest = &name[prefix.len()..];
    format!("{}:{}", prefix, rest.to_ascii_lowercase())
}

static PROPERTIES: Lazy<HashMap<&'static str, PropertyInfo>> = Lazy::new(|| {
    let mut table = HashMap::new();
    let mut add = |name: &'static str, ty: PropertyType, must_use: bool, attr: String, ns: Option<&'static str>| {
        table.insert(name, PropertyInfo::new(name, ty, must_use, attr, ns));
    };

    for &name in RESERVED {
        add(name, PropertyType::Reserved, false, name.to_string(), None);
    }
    for &(name, attr) in ALIASED_STRINGS {
        add(name, PropertyType::String, false, attr.to_string(), None);
    }
    for &name in BOOLEANISH_LOWERCASE {
        add(name, PropertyType::BooleanishString, false, name.to_ascii_lowercase(), None);
    }
    for &name in BOOLEANISH_CASE_SENSITIVE {
        add(name, PropertyType::BooleanishString, false, name.to_string(), None);
    }
    for &name in BOOLEANS {
        add(name, PropertyType::Boolean, false, name.to_ascii_lowercase(), None);
    }
    for &name in BOOLEAN_PROPERTIES {
        add(name, PropertyType::Boolean, true, name.to_string(), None);
    }
    for &name in OVERLOADED_BOOLEANS {
        add(name, PropertyType::OverloadedBoolean, false, name.to_string(), None);
    }
    for &name in POSITIVE_NUMERICS {
        add(name, PropertyType::PositiveNumeric, false, name.to_string(), None);
    }
    for &name in NUMERICS {
        add(name, PropertyType::Numeric, false, name.to_ascii_lowercase(), None);
    }
    for &name in LOWERCASE_STRINGS {
        add(name, PropertyType::String, false, name.to_ascii_lowercase(), None);
    }
    for &name in SVG_HYPHENATED {
        add(name, PropertyType::String, false, hyphenate(name), None);
    }
    for &name in XLINK_ATTRIBUTES {
        add(name, PropertyType::String, false, prefixed(name, "xlink"), Some(XLINK_NAMESPACE));
    }
    for &name in XML_ATTRIBUTES {
        add(name, PropertyType::String, false, prefixed(name, "xml"), Some(XML_NAMESPACE));
    }
    table
});

/// Classification of `name`, if it is a known field.
pub fn get_property_info(name: &str) -> Option<&'static PropertyInfo> {
    PROPERTIES.get(name)
}

/// Whether `name` is never written to the host: reserved names, and event
/// handlers (`on*`) on built-in elements.
pub fn should_ignore_attribute(
    name: &str,
    info: Option<&PropertyInfo>,
    is_custom_component: bool,
) -> bool {
    if let Some(info) = info {
        return info.property_type == PropertyType::Reserved;
    }
    if is_custom_component {
        return false;
    }
    let bytes = name.as_bytes();
    bytes.len() > 2 && matches!(bytes[0], b'o' | b'O') && matches!(bytes[1], b'n' | b'N')
}

/// Whether `value` can never be written for `name` and deserves a warning:
/// functions anywhere, and booleans on fields that do not take them.
pub fn should_remove_attribute_with_warning(
    name: &str,
    value: &Value,
    info: Option<&PropertyInfo>,
    is_custom_component: bool,
) -> bool {
    if info.is_some_and(|i| i.property_type == PropertyType::Reserved) {
        return false;
    }
    match value {
        Value::Function(_) => true,
        Value::Bool(_) => {
            if is_custom_component {
                return false;
            }
            match info {
                Some(info) => !info.accepts_booleans(),
                None => {
                    let lower = name.to_ascii_lowercase();
                    !lower.starts_with("data-") && !lower.starts_with("aria-")
                }
            }
        }
        _ => false,
    }
}

/// Whether writing `value` to `name` means removing the field.
pub fn should_remove_attribute(
    name: &str,
    value: &Value,
    info: Option<&PropertyInfo>,
    is_custom_component: bool,
) -> bool {
    if value.is_null() {
        return true;
    }
    if should_remove_attribute_with_warning(name, value, info, is_custom_component) {
        return true;
    }
    if is_custom_component {
        return false;
    }
    match info.map(|i| i.property_type) {
        Some(PropertyType::Boolean) => !value.is_truthy(),
        Some(PropertyType::OverloadedBoolean) => *value == Value::Bool(false),
        Some(PropertyType::Numeric) => value.to_number().is_nan(),
        Some(PropertyType::PositiveNumeric) => {
            let n = value.to_number();
            n.is_nan() || n < 1.0
        }
        _ => false,
    }
}
