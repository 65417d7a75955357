use super::*;
use std::time::Duration;
use weft_core::{create_element, Deadline, PropValue, Props};

fn greeting(name: &str) -> Element {
    create_element("p", Props::new().with("class", "greeting"), [format!("hello {name}")])
}

#[test]
fn fiber_test_rule_reports_content() {
    run_test_render(|rule| {
        assert!(!rule.has_content());
        assert_eq!(rule.text_content(), "");

        rule.set_content(greeting("world")).expect("install content");

        assert!(rule.has_content());
        assert_eq!(rule.text_content(), "hello world");
        assert_eq!(rule.work_loop().passes_committed(), 1);
    });
}

#[test]
fn find_by_text_returns_the_owning_element() {
    let mut rule = FiberTestRule::new();
    rule.set_content(create_element(
        "div",
        Props::new(),
        [greeting("a"), greeting("b")],
    ))
    .expect("install content");

    let second = rule.find_by_text("hello b").expect("second greeting");
    assert_eq!(
        rule.host().property(second, "class"),
        Some(&PropValue::from("greeting"))
    );
    assert_eq!(rule.find_by_text("hello c"), None);
}

#[test]
fn tick_units_stops_after_the_requested_units() {
    let mut rule = FiberTestRule::new();
    rule.set_content(greeting("one")).expect("install content");
    rule.take_ops();

    rule.content = Some(greeting("two"));
    rule.render();
    // root, p, text
    assert_eq!(rule.tick_units(2).expect("tick"), TickStatus::Yielded);
    assert_eq!(rule.text_content(), "hello one");
    assert!(matches!(
        rule.tick_units(1).expect("tick"),
        TickStatus::Committed(_)
    ));
    assert_eq!(rule.text_content(), "hello two");
}

#[test]
fn rerender_of_same_content_records_no_mutations() {
    let mut rule = FiberTestRule::new();
    rule.set_content(greeting("same")).expect("install content");
    rule.take_ops();

    assert_eq!(rule.rerender().expect("rerender"), 1);
    assert!(rule.take_ops().is_empty());
}

#[test]
fn dump_tree_lists_nodes_with_properties() {
    let mut rule = FiberTestRule::new();
    rule.set_content(greeting("tree")).expect("install content");

    let dump = rule.dump_tree();
    assert!(dump.contains("<p class=greeting>"), "{dump}");
    assert!(dump.contains("\"hello tree\""), "{dump}");
}

#[test]
fn step_deadline_expires_after_its_units() {
    let deadline = StepDeadline::new(2);
    assert!(deadline.time_remaining() > Duration::ZERO);
    assert_eq!(deadline.time_remaining(), Duration::ZERO);
    assert_eq!(deadline.time_remaining(), Duration::ZERO);
    assert_eq!(deadline.remaining_units(), 0);
}
