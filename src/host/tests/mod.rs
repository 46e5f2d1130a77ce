//! Host 模块单元测试
//!
//! 通过内存文档验证属性写入、读取与内容设置

use super::*;
use crate::util::diagnostic::{DiagnosticCode, Diagnostics};
use crate::value::{Function, Value};

struct Harness {
    doc: MemoryDocument,
    node: HostNodeId,
    validator: AttributeNameValidator,
    diagnostics: Diagnostics,
}

impl Harness {
    fn new() -> Self {
        let mut doc = MemoryDocument::new();
        let node = doc.create_element("input", None);
        Self {
            doc,
            node,
            validator: AttributeNameValidator::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    fn set(
        &mut self,
        name: &str,
        value: Value,
    ) {
        self.set_on(name, value, false);
    }

    fn set_on(
        &mut self,
        name: &str,
        value: Value,
        is_custom: bool,
    ) {
        set_value_for_property(
            &mut self.doc,
            self.node,
            name,
            &value,
            is_custom,
            &mut self.validator,
            &mut self.diagnostics,
        );
    }

    fn attr(
        &self,
        name: &str,
    ) -> Option<String> {
        self.doc.get_attribute(self.node, name)
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;

    #[test]
    fn test_classification() {
        let class = get_property_info("className").unwrap();
        assert_eq!(class.attribute_name, "class");
        assert_eq!(class.property_type, PropertyType::String);

        assert_eq!(get_property_info("readOnly").unwrap().attribute_name, "readonly");
        assert_eq!(get_property_info("tabIndex").unwrap().attribute_name, "tabindex");
        assert_eq!(get_property_info("strokeWidth").unwrap().attribute_name, "stroke-width");
        assert_eq!(get_property_info("focusable").unwrap().attribute_name, "focusable");
        assert_eq!(
            get_property_info("children").unwrap().property_type,
            PropertyType::Reserved
        );
        assert!(get_property_info("checked").unwrap().must_use_property);
        assert!(get_property_info("data-id").is_none());
    }

    #[test]
    fn test_namespaced_attributes() {
        let href = get_property_info("xlinkHref").unwrap();
        assert_eq!(href.attribute_name, "xlink:href");
        assert_eq!(href.attribute_namespace, Some(XLINK_NAMESPACE));

        let lang = get_property_info("xmlLang").unwrap();
        assert_eq!(lang.attribute_name, "xml:lang");
        assert_eq!(lang.attribute_namespace, Some(XML_NAMESPACE));
    }

    #[test]
    fn test_accepts_booleans() {
        assert!(get_property_info("disabled").unwrap().accepts_booleans());
        assert!(get_property_info("download").unwrap().accepts_booleans());
        assert!(get_property_info("draggable").unwrap().accepts_booleans());
        assert!(!get_property_info("className").unwrap().accepts_booleans());
        assert!(!get_property_info("cols").unwrap().accepts_booleans());
    }

    #[test]
    fn test_ignore_rules() {
        assert!(should_ignore_attribute("onClick", None, false));
        assert!(should_ignore_attribute("ONCLICK", None, false));
        assert!(!should_ignore_attribute("onClick", None, true));
        assert!(!should_ignore_attribute("on", None, false));
        assert!(should_ignore_attribute("style", get_property_info("style"), false));
    }

    #[test]
    fn test_remove_rules() {
        let positive = get_property_info("cols");
        assert!(should_remove_attribute("cols", &Value::from(0), positive, false));
        assert!(should_remove_attribute("cols", &Value::from("x"), positive, false));
        assert!(!should_remove_attribute("cols", &Value::from(2), positive, false));

        let numeric = get_property_info("start");
        assert!(!should_remove_attribute("start", &Value::from(0), numeric, false));
        assert!(should_remove_attribute("start", &Value::from("x"), numeric, false));

        assert!(should_remove_attribute("title", &Value::Null, None, false));
        assert!(should_remove_attribute_with_warning("title", &Value::from(true), None, false));
        assert!(!should_remove_attribute_with_warning("aria-hidden", &Value::from(true), None, false));
        assert!(!should_remove_attribute_with_warning("title", &Value::from(true), None, true));
    }
}

#[cfg(test)]
mod attribute_tests {
    use super::*;

    #[test]
    fn test_boolean_attribute_presence() {
        let mut h = Harness::new();
        h.set("disabled", Value::from(true));
        assert_eq!(h.attr("disabled"), Some(String::new()));
        assert_eq!(
            get_value_for_property(&h.doc, h.node, "disabled", &Value::from(true)),
            Some(Value::from(true))
        );

        h.set("disabled", Value::from(false));
        assert_eq!(h.attr("disabled"), None);
        assert_eq!(get_value_for_property(&h.doc, h.node, "disabled", &Value::from(false)), None);

        h.set("disabled", Value::from(true));
        h.set("disabled", Value::Null);
        assert_eq!(h.attr("disabled"), None);
        assert_eq!(get_value_for_property(&h.doc, h.node, "disabled", &Value::Null), None);

        h.set("disabled", Value::from("yes"));
        assert_eq!(h.attr("disabled"), Some(String::new()));
        h.set("disabled", Value::from(""));
        assert_eq!(h.attr("disabled"), None);
        assert!(h.diagnostics.is_empty());
    }

    #[test]
    fn test_boolean_property_reads_absent_when_cleared() {
        let mut h = Harness::new();
        h.set("checked", Value::from(true));
        assert_eq!(
            get_value_for_property(&h.doc, h.node, "checked", &Value::from(true)),
            Some(Value::from(true))
        );
        assert_eq!(h.attr("checked"), None);

        h.set("checked", Value::from(false));
        assert_eq!(h.doc.get_property(h.node, "checked"), Value::from(false));
        assert_eq!(get_value_for_property(&h.doc, h.node, "checked", &Value::from(false)), None);

        h.set("checked", Value::from(true));
        h.set("checked", Value::Null);
        assert_eq!(get_value_for_property(&h.doc, h.node, "checked", &Value::Null), None);
    }

    #[test]
    fn test_overloaded_boolean() {
        let mut h = Harness::new();
        h.set("download", Value::from(true));
        assert_eq!(h.attr("download"), Some(String::new()));
        assert_eq!(
            get_value_for_property(&h.doc, h.node, "download", &Value::from(true)),
            Some(Value::from(true))
        );

        h.set("download", Value::from("report.pdf"));
        assert_eq!(h.attr("download"), Some("report.pdf".to_string()));

        h.set("download", Value::from(false));
        assert_eq!(h.attr("download"), None);
    }

    #[test]
    fn test_aliases_and_numbers() {
        let mut h = Harness::new();
        h.set("className", Value::from("primary"));
        h.set("htmlFor", Value::from("name"));
        h.set("cols", Value::from(3));
        h.set("rowSpan", Value::from(2.5));
        assert_eq!(h.attr("class"), Some("primary".to_string()));
        assert_eq!(h.attr("for"), Some("name".to_string()));
        assert_eq!(h.attr("cols"), Some("3".to_string()));
        assert_eq!(h.attr("rowspan"), Some("2.5".to_string()));

        assert_eq!(
            get_value_for_property(&h.doc, h.node, "className", &Value::from("primary")),
            Some(Value::from("primary"))
        );
        assert_eq!(
            get_value_for_property(&h.doc, h.node, "cols", &Value::from(3)),
            Some(Value::from(3))
        );
        assert_eq!(
            get_value_for_property(&h.doc, h.node, "cols", &Value::from(4)),
            Some(Value::from("3"))
        );

        h.set("cols", Value::from(0));
        assert_eq!(h.attr("cols"), None);
    }

    #[test]
    fn test_property_backed_fields() {
        let mut h = Harness::new();
        h.set("checked", Value::from(true));
        assert_eq!(h.doc.get_property(h.node, "checked"), Value::from(true));
        assert_eq!(h.attr("checked"), None);

        h.set("checked", Value::Null);
        assert_eq!(h.doc.get_property(h.node, "checked"), Value::from(false));
        assert_eq!(
            get_value_for_property(&h.doc, h.node, "checked", &Value::from(false)),
            Some(Value::from(false))
        );
        assert_eq!(get_value_for_property(&h.doc, h.node, "muted", &Value::from(true)), None);
    }

    #[test]
    fn test_namespaced_write() {
        let mut doc = MemoryDocument::new();
        let svg = doc.create_element("svg", None);
        let use_node = doc.create_element("use", Some(SVG_NAMESPACE));
        doc.append_child(svg, use_node);
        let mut validator = AttributeNameValidator::new();
        let mut diagnostics = Diagnostics::new();

        set_value_for_property(
            &mut doc,
            use_node,
            "xlinkHref",
            &Value::from("#icon"),
            false,
            &mut validator,
            &mut diagnostics,
        );
        assert_eq!(doc.get_attribute(use_node, "xlink:href"), Some("#icon".to_string()));
        assert_eq!(doc.attribute_namespace(use_node, "xlink:href"), Some(XLINK_NAMESPACE));
    }

    #[test]
    fn test_event_handlers_and_reserved_are_skipped() {
        let mut h = Harness::new();
        let handler = Function::new("onClick", |_: &[Value]| Value::Null);
        h.set("onClick", Value::from(handler));
        h.set("children", Value::from("text"));
        h.set("style", Value::empty_map());
        assert_eq!(h.attr("onClick"), None);
        assert_eq!(h.attr("children"), None);
        assert_eq!(h.attr("style"), None);
        assert!(h.diagnostics.is_empty());
    }

    #[test]
    fn test_unknown_attributes() {
        let mut h = Harness::new();
        h.set("data-id", Value::from(7));
        h.set("aria-hidden", Value::from(true));
        assert_eq!(h.attr("data-id"), Some("7".to_string()));
        assert_eq!(h.attr("aria-hidden"), Some("true".to_string()));
        assert_eq!(
            get_value_for_property(&h.doc, h.node, "data-id", &Value::Null),
            Some(Value::from("7"))
        );

        h.set("data-id", Value::Null);
        assert_eq!(h.attr("data-id"), None);
        assert!(h.diagnostics.is_empty());
    }

    #[test]
    fn test_invalid_values_warn_once() {
        let mut h = Harness::new();
        for _ in 0..3 {
            h.set("title", Value::from(true));
        }
        assert_eq!(h.attr("title"), None);
        assert_eq!(h.diagnostics.count(DiagnosticCode::InvalidPropValue), 1);

        let callback = Function::new("f", |_: &[Value]| Value::Null);
        h.set("title", Value::from(callback));
        assert_eq!(h.diagnostics.count(DiagnosticCode::InvalidPropValue), 2);
        assert_eq!(h.attr("title"), None);
    }

    #[test]
    fn test_unsafe_names_warn_once() {
        let mut h = Harness::new();
        for _ in 0..4 {
            h.set("bad name", Value::from("x"));
            h.set("<script>", Value::from("x"));
        }
        assert_eq!(h.attr("bad name"), None);
        assert_eq!(h.diagnostics.count(DiagnosticCode::InvalidAttributeName), 2);
        assert_eq!(h.validator.illegal_len(), 2);
        assert!(h.diagnostics.records()[0].to_string().contains("Invalid attribute name: `bad name`"));

        h.set("x-ok", Value::from("1"));
        h.set("x-ok", Value::from("2"));
        assert_eq!(h.validator.validated_len(), 1);
        assert_eq!(h.attr("x-ok"), Some("2".to_string()));
    }

    #[test]
    fn test_validator_accepts_xml_names() {
        let mut validator = AttributeNameValidator::new();
        let mut diagnostics = Diagnostics::new();
        for name in ["xlink:href", "_private", "data-x.y", "\u{e9}t\u{e9}"] {
            assert!(validator.is_attribute_name_safe(name, &mut diagnostics), "{}", name);
        }
        for name in ["1abc", "-dash", "a b", ""] {
            assert!(!validator.is_attribute_name_safe(name, &mut diagnostics), "{}", name);
        }
        assert_eq!(diagnostics.len(), 4);
    }
}

#[cfg(test)]
mod custom_element_tests {
    use super::*;

    #[test]
    fn test_detection() {
        assert!(is_custom_component("my-widget", &Value::Null));
        assert!(!is_custom_component("font-face", &Value::Null));
        assert!(!is_custom_component("annotation-xml", &Value::Null));
        assert!(!is_custom_component("div", &Value::Null));
        assert!(is_custom_component("button", &Value::map([("is", Value::from("fancy-button"))])));
        assert!(!is_custom_component("button", &Value::map([("is", Value::from(true))])));
    }

    #[test]
    fn test_custom_elements_write_raw() {
        let mut h = Harness::new();
        h.set_on("className", Value::from("a"), true);
        h.set_on("enabled", Value::from(true), true);
        h.set_on("onSelect", Value::from("handler"), true);
        assert_eq!(h.attr("className"), Some("a".to_string()));
        assert_eq!(h.attr("class"), None);
        assert_eq!(h.attr("enabled"), Some("true".to_string()));
        assert_eq!(h.attr("onSelect"), Some("handler".to_string()));
        assert!(h.diagnostics.is_empty());

        let read = get_value_for_attribute(
            &h.doc,
            h.node,
            "enabled",
            &Value::from(true),
            &mut h.validator,
            &mut h.diagnostics,
        );
        assert_eq!(read, Some(Value::from(true)));

        let unsafe_read = get_value_for_attribute(
            &h.doc,
            h.node,
            "not safe",
            &Value::Null,
            &mut h.validator,
            &mut h.diagnostics,
        );
        assert_eq!(unsafe_read, None);
        assert_eq!(h.diagnostics.count(DiagnosticCode::InvalidAttributeName), 1);
    }
}

#[cfg(test)]
mod content_tests {
    use super::*;

    #[test]
    fn test_inner_html_on_html_element() {
        let mut doc = MemoryDocument::new();
        let div = doc.create_container();
        set_inner_html(&mut doc, div, "<p class=\"x\">a &amp; b</p><br>tail");
        assert_eq!(doc.children(div).len(), 3);
        assert_eq!(doc.inner_html(div), "<p class=\"x\">a &amp; b</p><br>tail");
        assert_eq!(doc.text_content(div), "a & btail");
    }

    #[test]
    fn test_svg_inner_html_fallback() {
        let mut doc = MemoryDocument::without_svg_inner_html();
        let svg = doc.create_element("svg", None);
        let old = doc.create_element("rect", Some(SVG_NAMESPACE));
        doc.append_child(svg, old);

        // Direct writes are ignored by this host.
        doc.set_inner_html(svg, "<circle></circle>");
        assert_eq!(doc.children(svg), &[old]);

        set_inner_html(&mut doc, svg, "<circle r=\"5\"></circle><g><path></path></g>");
        let children = doc.children(svg).to_vec();
        assert_eq!(children.len(), 2);
        assert_eq!(doc.tag_name(children[0]), Some("circle"));
        assert_eq!(doc.namespace_uri(children[0]).as_deref(), Some(SVG_NAMESPACE));
        assert_eq!(doc.parent(children[0]), Some(svg));
        assert_eq!(doc.inner_html(svg), "<circle r=\"5\"></circle><g><path></path></g>");
        assert!(doc.parent(old).is_none());
    }

    #[test]
    fn test_svg_inner_html_direct_when_supported() {
        let mut doc = MemoryDocument::new();
        let svg = doc.create_element("svg", None);
        let before = doc.len();
        set_inner_html(&mut doc, svg, "<circle></circle>");
        assert_eq!(doc.len(), before + 1);
        assert_eq!(doc.inner_html(svg), "<circle></circle>");
    }

    #[test]
    fn test_foreign_object_switches_back_to_html() {
        let mut doc = MemoryDocument::new();
        let div = doc.create_container();
        set_inner_html(&mut doc, div, "<svg><foreignObject><p>hi</p></foreignObject></svg>");
        let svg = doc.children(div)[0];
        let foreign = doc.children(svg)[0];
        let p = doc.children(foreign)[0];
        assert_eq!(doc.namespace_uri(foreign).as_deref(), Some(SVG_NAMESPACE));
        assert_eq!(doc.namespace_uri(p).as_deref(), Some(HTML_NAMESPACE));
    }

    #[test]
    fn test_text_content_fast_path() {
        let mut doc = MemoryDocument::new();
        let div = doc.create_container();
        set_text_content(&mut doc, div, "first");
        let text = doc.children(div)[0];

        set_text_content(&mut doc, div, "second");
        assert_eq!(doc.children(div), &[text]);
        assert_eq!(doc.text(text), Some("second"));
    }

    #[test]
    fn test_text_content_rebuilds_and_clears() {
        let mut doc = MemoryDocument::new();
        let div = doc.create_container();
        let span = doc.create_element("span", None);
        doc.append_child(div, span);

        set_text_content(&mut doc, div, "plain");
        assert_eq!(doc.children(div).len(), 1);
        assert!(doc.is_text_node(doc.children(div)[0]));
        assert_eq!(doc.text_content(div), "plain");

        set_text_content(&mut doc, div, "");
        assert!(doc.children(div).is_empty());
    }

    #[test]
    fn test_multibyte_text() {
        let mut doc = MemoryDocument::new();
        let div = doc.create_container();
        set_inner_html(&mut doc, div, "\u{e9}l\u{e8}ve <b>\u{4e2d}</b>");
        assert_eq!(doc.text_content(div), "\u{e9}l\u{e8}ve \u{4e2d}");
        assert_eq!(HostNodeId(3).to_string(), "HostNode(3)");
    }
}
