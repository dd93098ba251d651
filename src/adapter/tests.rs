use super::*;
use crate::component::{ComponentInfo, Derived, MarkComponent};
use crate::content::ContentExpr;
use crate::dom::{Element, RuleTarget, DATA_COMPONENT, DATA_PROPS};
use crate::fields::{deserialize, initial_value};
use crate::model::{Mark, Node};
use serde_json::{json, Value};

fn components() -> ComponentSet {
    let mut set: ComponentSet = serde_json::from_value(json!({
        "callout": {
            "kind": "block",
            "label": "Callout",
            "icon": "info",
            "description": "Draw attention to a paragraph",
            "schema": {
                "title": { "kind": "text", "label": "Title", "default": "Heads up" },
                "tone": {
                    "kind": "select",
                    "label": "Tone",
                    "options": [
                        { "label": "Info", "value": "info" },
                        { "label": "Warning", "value": "warning" }
                    ]
                }
            }
        },
        "note": { "kind": "block", "label": "Note", "forSpecificLocations": true },
        "aside": {
            "kind": "wrapper",
            "label": "Aside",
            "schema": { "wide": { "kind": "checkbox", "label": "Wide" } }
        },
        "mention": {
            "kind": "inline",
            "label": "Mention",
            "schema": { "user": { "kind": "text", "label": "User" } }
        },
        "item": { "kind": "block", "label": "Item", "forSpecificLocations": true },
        "figure": {
            "kind": "block",
            "label": "Figure",
            "schema": { "src": { "kind": "url", "label": "Source" } }
        },
        "list": {
            "kind": "repeating",
            "label": "List",
            "children": ["item"],
            "validation": { "children": { "min": 0, "max": 3 } }
        },
        "gallery": {
            "kind": "repeating",
            "label": "Gallery",
            "children": ["item", "figure"],
            "validation": { "children": { "min": 0, "max": "Infinity" } }
        },
        "highlight": {
            "kind": "mark",
            "label": "Highlight",
            "tag": "mark",
            "className": "hl",
            "style": { "color": "yellow" }
        },
        "future": { "kind": "carousel", "label": "Carousel" }
    }))
    .unwrap();

    let mut info = ComponentInfo::new("Tone".into());
    info.schema = serde_json::from_value(json!({
        "level": { "kind": "integer", "label": "Level", "default": 1 }
    }))
    .unwrap();
    let mut tone = MarkComponent::new(info);
    tone.class_name = Derived::computed(|props: &Value| {
        props["level"].as_i64().map(|l| format!("tone-{}", l))
    });
    tone.style = Derived::computed(|props: &Value| {
        let mut style = crate::dom::Style::new();
        let level = props["level"].as_i64().unwrap_or(0);
        style.insert("opacity".into(), format!("{}", level as f64 / 10.0));
        style
    });
    set.insert("tone", ComponentDescriptor::Mark(tone));

    let mut badge = ComponentInfo::new("Badge".into());
    badge.for_specific_locations = true;
    set.insert("badge", ComponentDescriptor::Inline(badge));
    set
}

fn element_from(spec: &NodeSpec, props: &Value) -> Element {
    let node = spec.create(Some(props.clone()));
    spec.to_dom(&node).to_element(Vec::new())
}

#[test]
fn test_dispatch_over_kinds() {
    let specs = build(&components());
    let nodes: Vec<_> = specs
        .nodes
        .iter()
        .map(|(name, spec)| (name.as_str(), spec.kind))
        .collect();
    assert_eq!(
        nodes,
        vec![
            ("callout", NodeKind::Block),
            ("note", NodeKind::Block),
            ("aside", NodeKind::Wrapper),
            ("mention", NodeKind::Inline),
            ("item", NodeKind::Block),
            ("figure", NodeKind::Block),
            ("list", NodeKind::Repeating),
            ("gallery", NodeKind::Repeating),
            ("badge", NodeKind::Inline),
        ]
    );
    let marks: Vec<_> = specs.marks.keys().map(String::as_str).collect();
    assert_eq!(marks, vec!["highlight", "tone"]);
    assert!(!specs.nodes.contains_key("future"));
    assert!(!specs.marks.contains_key("future"));
}

#[test]
fn test_groups_follow_input_order() {
    let specs = build(&components());
    assert_eq!(specs.groups["callout"], "component0");
    assert_eq!(specs.groups["future"], "component9");
    assert_eq!(specs.nodes["callout"].group, "block component0");
    assert_eq!(specs.nodes["note"].group, "component1");
    assert_eq!(specs.nodes["mention"].group, "inline inline_component");
    assert!(specs.nodes["callout"].defining);
    assert!(!specs.nodes["mention"].defining);
}

#[test]
fn test_props_survive_the_dom() {
    let components = components();
    let specs = build(&components);
    for (name, spec) in &specs.nodes {
        let info = components.get(name).and_then(|c| c.info()).unwrap();
        let initial = initial_value(&info.schema);
        assert_eq!(spec.default_props(), to_serialized(&initial, &info.schema));

        let element = element_from(spec, &spec.default_props());
        let attrs = spec.parse(&element).expect(name);
        assert_eq!(attrs[PROPS], spec.default_props(), "{}", name);
        assert_eq!(deserialize(&attrs[PROPS], &info.schema).unwrap(), initial);
    }
}

#[test]
fn test_to_dom_shape() {
    let specs = build(&components());
    let callout = &specs.nodes["callout"];
    let node = callout.create(None);
    assert_eq!(
        serde_json::to_value(callout.to_dom(&node)).unwrap(),
        json!(["div", {
            "data-component": "callout",
            "data-props": r#"{"title":"Heads up","tone":"info"}"#
        }])
    );
    let aside = &specs.nodes["aside"];
    let dom = aside.to_dom(&aside.create(None));
    assert!(dom.hole);
    assert_eq!(dom.tag, "div");
    let mention = &specs.nodes["mention"];
    let dom = mention.to_dom(&mention.create(None));
    assert!(!dom.hole);
    assert_eq!(dom.tag, "span");
    assert!(specs.nodes["list"].to_dom(&Node::new("list")).hole);
}

#[test]
fn test_static_mark_class_and_style() {
    let specs = build(&components());
    let highlight = &specs.marks["highlight"];
    assert_eq!(highlight.tag, "mark");
    for props in &[json!({}), json!({ "x": 1 }), json!(null)] {
        let element = highlight.to_dom(&Mark::new("highlight", props.clone()));
        assert_eq!(element.tag, "mark");
        assert_eq!(element.class_name.as_deref(), Some("hl"));
        assert_eq!(element.style.len(), 1);
        assert_eq!(element.style["color"], "yellow");
        assert_eq!(element.get_attribute(DATA_COMPONENT), Some("highlight"));
        assert_eq!(element.get_attribute(DATA_PROPS), Some(props.to_string().as_str()));
    }
}

#[test]
fn test_computed_mark_class_and_style() {
    let specs = build(&components());
    let tone = &specs.marks["tone"];
    assert_eq!(tone.tag, "span");

    let low = tone.to_dom(&Mark::new("tone", json!({ "level": 2 })));
    let high = tone.to_dom(&Mark::new("tone", json!({ "level": 7 })));
    assert_eq!(low.class_name.as_deref(), Some("tone-2"));
    assert_eq!(high.class_name.as_deref(), Some("tone-7"));
    assert_eq!(low.style["opacity"], "0.2");
    assert_eq!(high.style["opacity"], "0.7");
    for element in &[&low, &high] {
        assert_eq!(element.get_attribute(DATA_COMPONENT), Some("tone"));
        assert!(element.get_attribute(DATA_PROPS).is_some());
    }

    let parsed = tone.parse(&high).unwrap();
    assert_eq!(parsed[PROPS], json!({ "level": 7 }));
    assert_eq!(tone.create().props(), Some(&json!({ "level": 1 })));
}

#[test]
fn test_bounded_repeating_content() {
    let specs = build(&components());
    let list = &specs.nodes["list"];
    assert_eq!(list.content.as_deref(), Some("(component4){0,3}"));

    let schema = specs.schema();
    let items = |n: usize, child: &str| {
        Node::new("list").with_content((0..n).map(|_| Node::new(child)).collect())
    };
    for n in 0..=3 {
        assert!(schema.valid_content(&items(n, "item")), "{} items", n);
    }
    assert!(!schema.valid_content(&items(4, "item")));
    assert!(!schema.valid_content(&items(1, "figure")));
    assert!(!schema.valid_content(&items(1, "paragraph")));
}

#[test]
fn test_unbounded_repeating_content() {
    let specs = build(&components());
    let gallery = &specs.nodes["gallery"];
    assert_eq!(
        gallery.content.as_deref(),
        Some("(component4 | component5){0,}")
    );
    let expr: ContentExpr = gallery.content.as_deref().unwrap().parse().unwrap();
    assert_eq!(expr.terms[0].max, None);

    let schema = specs.schema();
    let many = Node::new("gallery").with_content(
        (0..50)
            .map(|i| Node::new(if i % 2 == 0 { "item" } else { "figure" }))
            .collect(),
    );
    assert!(schema.valid_content(&many));
}

#[test]
fn test_insert_menu() {
    let specs = build(&components());
    assert!(specs.nodes["note"].insert_menu.is_none());
    assert!(specs.nodes["item"].insert_menu.is_none());
    assert!(specs.nodes["badge"].insert_menu.is_none());
    assert_eq!(specs.nodes["badge"].group, "inline inline_component");
    let callout = specs.nodes["callout"].insert_menu.as_ref().unwrap();
    assert_eq!(callout.label, "Callout");
    assert_eq!(callout.icon.as_deref(), Some("info"));
    assert_eq!(
        callout.description.as_deref(),
        Some("Draw attention to a paragraph")
    );
    assert_eq!(callout.command, InsertCommand::InsertNode);
    assert!(callout.for_toolbar);
    for name in &["aside", "mention", "figure", "list", "gallery"] {
        assert!(specs.nodes[*name].insert_menu.is_some(), "{}", name);
    }
    let menu: Vec<_> = specs.insert_menu().map(|(name, _)| name).collect();
    assert_eq!(menu, vec!["callout", "aside", "mention", "figure", "list", "gallery"]);
}

#[test]
fn test_missing_props_fall_through() {
    let specs = build(&components());
    let parser = specs.parser();
    for (name, spec) in &specs.nodes {
        let element = Element::new(spec.tag()).with_attribute(DATA_COMPONENT, name.as_str());
        assert_eq!(spec.parse(&element), None, "{}", name);
        assert_eq!(parser.parse(&element), None, "{}", name);
    }
    for (name, spec) in &specs.marks {
        let element = Element::new(spec.tag.as_str()).with_attribute(DATA_COMPONENT, name.as_str());
        assert_eq!(spec.parse(&element), None, "{}", name);
        assert_eq!(parser.parse(&element), None, "{}", name);
    }
}

#[test]
fn test_invalid_props_fall_through() {
    let specs = build(&components());
    let parser = specs.parser();
    let element = Element::new("div")
        .with_attribute(DATA_COMPONENT, "callout")
        .with_attribute(DATA_PROPS, "{not json");
    assert_eq!(parser.parse(&element), None);

    let element = Element::new("div")
        .with_attribute(DATA_COMPONENT, "callout")
        .with_attribute(DATA_PROPS, r#"{"title":"x"}"#);
    let hit = parser.parse(&element).unwrap();
    assert_eq!(hit.target, RuleTarget::Node);
    assert_eq!(hit.component, "callout");
    assert_eq!(hit.props, json!({ "title": "x" }));
}

#[test]
fn test_repeating_skips_unusable_children() {
    let components: ComponentSet = serde_json::from_value(json!({
        "hl": { "kind": "mark", "label": "Highlight" },
        "row": { "kind": "block", "label": "Row" },
        "table": {
            "kind": "repeating",
            "label": "Table",
            "children": ["hl", "row", "missing"],
            "validation": { "children": { "min": 1, "max": 2 } }
        }
    }))
    .unwrap();
    let specs = node_specs(&components);
    assert_eq!(specs["table"].content.as_deref(), Some("(component1){1,2}"));
    assert_eq!(specs["table"].view.insert_items.len(), 1);
    assert_eq!(specs["table"].view.insert_items[0].label, "Row");
}

#[test]
fn test_repeating_without_children_is_a_leaf() {
    let components: ComponentSet = serde_json::from_value(json!({
        "hl": { "kind": "mark", "label": "Highlight" },
        "table": {
            "kind": "repeating",
            "label": "Table",
            "children": ["hl", "missing"]
        }
    }))
    .unwrap();
    let specs = build(&components);
    let table = &specs.nodes["table"];
    assert_eq!(table.content.as_deref(), Some(""));
    assert!(!table.has_content());

    let node = table.create(None);
    let dom = table.to_dom(&node);
    assert!(!dom.hole);
    assert_eq!(
        serde_json::to_value(&dom).unwrap(),
        json!(["div", { "data-component": "table", "data-props": "{}" }])
    );

    let schema = specs.schema();
    assert!(schema.node_type("table").unwrap().is_leaf());
    assert_eq!(schema.node_size(&node), 1);
}

#[test]
fn test_specs_serialize() {
    let specs = build(&components());
    let value = serde_json::to_value(&specs).unwrap();
    assert_eq!(value["nodes"]["aside"]["content"], "block+");
    assert_eq!(value["nodes"]["aside"]["kind"], "wrapper");
    assert_eq!(
        value["nodes"]["callout"]["parseDOM"],
        json!([{ "tag": "div[data-component=\"callout\"]" }])
    );
    assert_eq!(value["nodes"]["callout"]["insertMenu"]["forToolbar"], true);
    assert_eq!(value["nodes"]["mention"]["inline"], true);
    assert!(value["nodes"]["callout"].get("inline").is_none());
    assert_eq!(
        value["marks"]["highlight"]["parseDOM"],
        json!([{ "tag": "mark[data-component=\"highlight\"]" }])
    );
}
