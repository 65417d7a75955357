use super::{RuntimeSettings, SliceDeadline, StdClock, StdRuntime};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use weft_core::{
    create_element, Component, Deadline, Element, MemoryHost, Props, SchedulerConfig, SetState,
};

fn counter_app(setter: Rc<RefCell<Option<SetState<i32>>>>) -> Element {
    let component = Component::new(move |_props: &Props, scope| {
        let (count, set_count) = scope.use_local_state(0i32);
        setter.borrow_mut().replace(set_count);
        create_element("span", Props::new(), [format!("count {count}")])
    });
    create_element(component, Props::new(), Vec::<Element>::new())
}

#[test]
fn std_runtime_requests_slice_and_rerenders_on_state_change() {
    let runtime = StdRuntime::new();
    let mut host = MemoryHost::new();
    let container = host.create_container();
    let mut work_loop = runtime.work_loop(host, SchedulerConfig::default());
    let setter = Rc::new(RefCell::new(None));

    work_loop.render(counter_app(setter.clone()), container);
    assert!(
        runtime.scheduler().take_slice_request(),
        "render should request a slice"
    );
    work_loop.flush().expect("initial render");
    assert_eq!(work_loop.host().text_content(container), "count 0");
    runtime.take_slice_request();

    let set_count = setter.borrow().clone().expect("state captured during render");
    set_count.update(|count| count + 1);
    assert!(
        runtime.take_slice_request(),
        "set_state should request a slice"
    );
    assert_eq!(work_loop.host().text_content(container), "count 0");

    let committed = runtime.run_until_idle(&mut work_loop).expect("run");
    assert_eq!(committed, 1);
    assert_eq!(work_loop.host().text_content(container), "count 1");
}

#[test]
fn run_until_idle_returns_when_nothing_is_pending() {
    let runtime = StdRuntime::new();
    let mut host = MemoryHost::new();
    host.create_container();
    let mut work_loop = runtime.work_loop(host, SchedulerConfig::default());

    assert_eq!(runtime.run_until_idle(&mut work_loop).expect("run"), 0);
    assert!(!runtime.take_slice_request());
}

#[test]
fn zero_budget_still_makes_progress() {
    let runtime = StdRuntime::with_settings(RuntimeSettings::new().with_slice_budget(Duration::ZERO));
    let mut host = MemoryHost::new();
    let container = host.create_container();
    let mut work_loop = runtime.work_loop(host, SchedulerConfig::default());
    let items: Vec<Element> = (0..5)
        .map(|i| create_element("li", Props::new(), [format!("{i}")]))
        .collect();

    work_loop.render(create_element("ul", Props::new(), items), container);
    let committed = runtime.run_until_idle(&mut work_loop).expect("run");

    assert_eq!(committed, 1);
    assert_eq!(work_loop.host().text_content(container), "01234");
    assert!(!work_loop.has_pending_work());
}

#[test]
fn waker_runs_on_every_slice_request() {
    let runtime = StdRuntime::new();
    let wakes = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&wakes);
    runtime.set_waker(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let mut host = MemoryHost::new();
    let container = host.create_container();
    let mut work_loop = runtime.work_loop(host, SchedulerConfig::default());
    work_loop.render(create_element("div", Props::new(), ["hi"]), container);
    assert_eq!(wakes.load(Ordering::SeqCst), 1);

    runtime.clear_waker();
    runtime.run_until_idle(&mut work_loop).expect("run");
    assert_eq!(wakes.load(Ordering::SeqCst), 1);
}

#[test]
fn slice_deadline_counts_down_from_budget() {
    let clock = StdClock;
    let deadline = SliceDeadline::start(&clock, Duration::from_secs(60));
    let remaining = deadline.time_remaining();
    assert!(remaining <= Duration::from_secs(60));
    assert!(remaining > Duration::from_secs(59));

    let expired = SliceDeadline::start(&clock, Duration::ZERO);
    assert_eq!(expired.time_remaining(), Duration::ZERO);
}
