//! User-defined element detection

use crate::value::Value;

/// Hyphenated names that belong to SVG / MathML rather than to users.
const RESERVED_HYPHENATED: &[&str] = &[
    "annotation-xml",
    "color-profile",
    "font-face",
    "font-face-src",
    "font-face-uri",
    "font-face-format",
    "font-face-name",
    "missing-glyph",
];

/// Whether `tag` with `props` is a user-defined element: a hyphenated name
/// outside the reserved list, or any element given a string `is` prop.
pub fn is_custom_component(
    tag: &str,
    props: &Value,
) -> bool {
    if !tag.contains('-') {
        return props.get("is").is_some_and(|is| is.as_str().is_some());
    }
    !RESERVED_HYPHENATED.contains(&tag)
}
