use super::*;

fn label(_props: &Props, _scope: &mut HookScope) -> Element {
    create_text_element("label")
}

fn other(_props: &Props, _scope: &mut HookScope) -> Element {
    create_text_element("other")
}

#[test]
fn create_element_wraps_plain_children_as_text() {
    let element = create_element(
        "div",
        Props::new().with("id", "foo"),
        [
            create_element("a", Props::new(), ["bar"]),
            Element::from("hello"),
        ],
    );

    assert_eq!(element.ty(), &ElementType::from("div"));
    assert_eq!(element.props().get("id"), Some(&PropValue::from("foo")));
    assert_eq!(element.children().len(), 2);

    let link = &element.children()[0];
    assert_eq!(link.children().len(), 1);
    assert_eq!(link.children()[0].ty(), &ElementType::Text);
    assert_eq!(
        link.children()[0].props().get(NODE_VALUE_KEY),
        Some(&PropValue::from("bar"))
    );

    let text = &element.children()[1];
    assert_eq!(text.ty(), &ElementType::Text);
    assert!(text.children().is_empty());
}

#[test]
fn children_key_is_never_stored_as_a_value() {
    let props = Props::new().with(CHILDREN_KEY, "nope").with("title", "ok");
    assert!(!props.contains_key(CHILDREN_KEY));
    assert_eq!(props.len(), 1);
}

#[test]
fn props_keep_insertion_order() {
    let props = Props::new().with("b", 1).with("a", 2).with("c", 3);
    let keys: Vec<&str> = props.iter().map(|(key, _)| key).collect();
    assert_eq!(keys, vec!["b", "a", "c"]);
}

#[test]
fn event_keys_are_classified_and_mapped() {
    assert!(is_event_key("onClick"));
    assert!(!is_property_key("onClick"));
    assert!(!is_property_key(CHILDREN_KEY));
    assert!(is_property_key("className"));
    assert_eq!(event_name("onClick"), "click");
    assert_eq!(event_name("onMouseDown"), "mousedown");
}

#[test]
fn handlers_compare_by_identity() {
    let first = EventHandler::new(|_| {});
    let same = first.clone();
    let twin = EventHandler::new(|_| {});

    assert_eq!(PropValue::from(first.clone()), PropValue::from(same));
    assert_ne!(PropValue::from(first), PropValue::from(twin));
}

#[test]
fn components_compare_by_callable() {
    assert_eq!(Component::new(label), Component::new(label));
    assert_ne!(Component::new(label), Component::new(other));
    assert_ne!(
        ElementType::from(Component::new(label)),
        ElementType::from("label")
    );
}

#[test]
fn component_name_reports_the_callable() {
    assert!(Component::new(label).name().ends_with("label"));
    assert!(Component::from_fn(other).name().contains("fn("));
}

#[test]
fn function_pointers_compare_by_address() {
    let table: [RenderFnPtr; 2] = [label, other];

    assert_ne!(Component::new(table[0]), Component::new(table[1]));
    assert_eq!(Component::new(table[0]), Component::new(table[0]));
    assert_eq!(Component::new(table[1]), Component::from_fn(other));
}

fn static_greeting() -> Component {
    Component::new(|_props: &Props, _scope: &mut HookScope| create_text_element("hello"))
}

fn greeting(text: &'static str) -> Component {
    Component::new(move |_props: &Props, _scope: &mut HookScope| create_text_element(text))
}

#[test]
fn closures_compare_by_expression_or_instance() {
    assert_eq!(static_greeting(), static_greeting());
    assert_ne!(
        static_greeting(),
        Component::new(|_props: &Props, _scope: &mut HookScope| create_text_element("hello"))
    );

    let captured = greeting("hi");
    assert_eq!(captured, captured.clone());
    assert_ne!(captured, greeting("hi"));
}
