use super::*;
use std::cell::RefCell;
use std::rc::Rc;
use weft_core::{
    create_element, Component, HookScope, PropValue, Props, RestartPolicy, SetState,
};

type Slot<T> = Rc<RefCell<Option<SetState<T>>>>;

fn capture<T>(slot: &Slot<T>, setter: &SetState<T>) {
    slot.borrow_mut().replace(setter.clone());
}

fn setter<T>(slot: &Slot<T>) -> SetState<T> {
    slot.borrow().clone().expect("component rendered")
}

fn click_counter(props: &Props, scope: &mut HookScope) -> Element {
    let (count, set_count) = scope.use_local_state(0i64);
    let step = match props.get("step") {
        Some(PropValue::Int(step)) => *step,
        _ => 1,
    };
    create_element(
        "button",
        Props::new()
            .with("count", count)
            .on("onClick", move |_| set_count.update(move |count| count + step)),
        [format!("clicked {count}")],
    )
}

#[test]
fn clicks_are_batched_into_one_pass() {
    let mut rule = FiberTestRule::new();
    rule.set_content(create_element(
        Component::new(click_counter),
        Props::new().with("step", 2i64),
        Vec::<Element>::new(),
    ))
    .expect("mount");

    let button = rule.find_by_text("clicked 0").expect("button");
    assert_eq!(rule.dispatch(button, "click").expect("click"), 1);
    assert_eq!(rule.dispatch(button, "click").expect("click"), 1);
    assert_eq!(rule.text_content(), "clicked 0");

    assert_eq!(rule.pump_until_idle().expect("pump"), 1);
    assert_eq!(rule.text_content(), "clicked 4");
    assert_eq!(rule.find_by_text("clicked 4"), Some(button));
    assert_eq!(rule.host().listener_count(button, "click"), 1);
}

#[test]
fn hooks_keep_their_positions_across_renders() {
    let first: Slot<String> = Rc::default();
    let second: Slot<i32> = Rc::default();
    let app = {
        let (first, second) = (first.clone(), second.clone());
        Component::new(move |_props: &Props, scope| {
            let (name, set_name) = scope.use_local_state(String::from("anon"));
            let (age, set_age) = scope.use_local_state(0);
            capture(&first, &set_name);
            capture(&second, &set_age);
            create_element("p", Props::new(), [format!("{name}:{age}")])
        })
    };

    let mut rule = FiberTestRule::new();
    rule.set_content(create_element(app, Props::new(), Vec::<Element>::new()))
        .expect("mount");
    assert_eq!(rule.text_content(), "anon:0");

    setter(&second).set(30);
    rule.pump_until_idle().expect("pump");
    assert_eq!(rule.text_content(), "anon:30");

    setter(&first).set("ada".to_string());
    rule.pump_until_idle().expect("pump");
    assert_eq!(rule.text_content(), "ada:30");
}

#[test]
fn removing_items_detaches_their_host_nodes() {
    let items: Slot<Vec<&'static str>> = Rc::default();
    let item = Component::new(|props: &Props, _scope: &mut HookScope| {
        let label = props.get("label").map(ToString::to_string).unwrap_or_default();
        create_element("li", Props::new(), [label])
    });
    let app = {
        let items = items.clone();
        Component::new(move |_props: &Props, scope| {
            let (list, set_list) = scope.use_local_state(vec!["a", "b", "c"]);
            capture(&items, &set_list);
            let children: Vec<Element> = list
                .iter()
                .map(|label| {
                    create_element(
                        item.clone(),
                        Props::new().with("label", *label),
                        Vec::<Element>::new(),
                    )
                })
                .collect();
            create_element("ul", Props::new(), children)
        })
    };

    let mut rule = FiberTestRule::new();
    rule.set_content(create_element(app, Props::new(), Vec::<Element>::new()))
        .expect("mount");
    assert_eq!(rule.text_content(), "abc");
    let c_item = rule.find_by_text("c").expect("c");
    let ul = rule.host().node(c_item).expect("li").parent().expect("ul");

    setter(&items).set(vec!["a", "b"]);
    rule.pump_until_idle().expect("pump");

    assert_eq!(rule.text_content(), "ab");
    assert_eq!(rule.host().children(ul).expect("ul").len(), 2);
    assert!(!rule.host().children(ul).expect("ul").contains(&c_item));
}

#[test]
fn switching_element_type_replaces_the_node() {
    let flag: Slot<bool> = Rc::default();
    let app = {
        let flag = flag.clone();
        Component::new(move |_props: &Props, scope| {
            let (emphasised, set_emphasised) = scope.use_local_state(false);
            capture(&flag, &set_emphasised);
            let tag = if emphasised { "em" } else { "span" };
            create_element(tag, Props::new(), ["note"])
        })
    };

    let mut rule = FiberTestRule::new();
    rule.set_content(create_element(app, Props::new(), Vec::<Element>::new()))
        .expect("mount");
    let span = rule.find_by_text("note").expect("span");
    rule.take_ops();

    setter(&flag).set(true);
    rule.pump_until_idle().expect("pump");

    let em = rule.find_by_text("note").expect("em");
    assert_ne!(em, span);
    let ops = rule.take_ops();
    let removed = ops
        .iter()
        .position(|op| matches!(op, HostOp::RemoveChild { child, .. } if *child == span))
        .expect("span removed");
    let appended = ops
        .iter()
        .position(|op| matches!(op, HostOp::AppendChild { child, .. } if *child == em))
        .expect("em appended");
    assert!(removed < appended);
}

#[test]
fn updates_survive_a_discarded_pass() {
    let slot: Slot<i64> = Rc::default();
    let app = {
        let slot = slot.clone();
        Component::new(move |_props: &Props, scope| {
            let (value, set_value) = scope.use_local_state(0i64);
            capture(&slot, &set_value);
            create_element("div", Props::new(), [create_element("b", Props::new(), [value])])
        })
    };

    let mut rule = FiberTestRule::new();
    rule.set_content(create_element(app, Props::new(), Vec::<Element>::new()))
        .expect("mount");

    setter(&slot).update(|value| value + 1);
    // root and the component: the update is folded into an in-flight render.
    assert_eq!(rule.tick_units(2).expect("tick"), TickStatus::Yielded);
    setter(&slot).update(|value| value * 10);

    rule.pump_until_idle().expect("pump");
    assert_eq!(rule.text_content(), "10");
}

#[test]
fn finish_policy_lets_the_in_flight_pass_commit() {
    let slot: Slot<i64> = Rc::default();
    let app = {
        let slot = slot.clone();
        Component::new(move |_props: &Props, scope| {
            let (value, set_value) = scope.use_local_state(0i64);
            capture(&slot, &set_value);
            create_element("span", Props::new(), [value])
        })
    };

    let mut rule = FiberTestRule::with_config(
        SchedulerConfig::new().with_restart_policy(RestartPolicy::FinishInFlight),
    );
    rule.set_content(create_element(app, Props::new(), Vec::<Element>::new()))
        .expect("mount");

    setter(&slot).set(1);
    assert_eq!(rule.tick_units(2).expect("tick"), TickStatus::Yielded);
    setter(&slot).set(2);

    assert_eq!(rule.pump_until_idle().expect("pump"), 2);
    assert_eq!(rule.text_content(), "2");
}
