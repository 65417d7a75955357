use weft_core::{
    create_element, Component, Element, HookScope, MemoryHost, NodeId, Props, SchedulerConfig,
};
use weft_runtime_std::StdRuntime;

fn counter(props: &Props, scope: &mut HookScope) -> Element {
    let (count, set_count) = scope.use_local_state(0i64);
    let label = props
        .get("label")
        .map(ToString::to_string)
        .unwrap_or_else(|| "Count".to_string());

    let increment = set_count.clone();
    let reset = set_count;
    create_element(
        "div",
        Props::new().with("class", "counter"),
        [
            create_element("h1", Props::new(), [format!("{label}: {count}")]),
            create_element(
                "button",
                Props::new()
                    .with("id", "increment")
                    .on("onClick", move |_| increment.update(|count| count + 1)),
                ["+1"],
            ),
            create_element(
                "button",
                Props::new()
                    .with("id", "reset")
                    .with("disabled", count == 0)
                    .on("onClick", move |_| reset.set(0)),
                ["reset"],
            ),
        ],
    )
}

fn button(host: &MemoryHost, container: NodeId, index: usize) -> Option<NodeId> {
    let root = *host.children(container).ok()?.first()?;
    host.children(root).ok()?.get(index + 1).copied()
}

fn main() {
    #[cfg(feature = "logging")]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    println!("=== weft counter demo ===");

    let runtime = StdRuntime::new();
    let mut host = MemoryHost::new();
    let container = host.create_container();
    let mut work_loop = runtime.work_loop(host, SchedulerConfig::default());

    work_loop.render(
        create_element(
            Component::new(counter),
            Props::new().with("label", "Clicks"),
            Vec::<Element>::new(),
        ),
        container,
    );

    let script = [0usize, 0, 0, 1, 0];
    if let Err(err) = runtime.run_until_idle(&mut work_loop) {
        log::error!("initial render failed: {err}");
        return;
    }
    println!("{}", work_loop.host().dump_tree(container));

    for index in script {
        let Some(target) = button(work_loop.host(), container, index) else {
            log::error!("button {index} not found");
            return;
        };
        if let Err(err) = work_loop.host().dispatch_event(target, "click") {
            log::error!("dispatch failed: {err}");
            return;
        }
        match runtime.run_until_idle(&mut work_loop) {
            Ok(passes) => log::info!(
                "click on button {index}: {passes} pass(es), text {:?}",
                work_loop.host().text_content(container)
            ),
            Err(err) => {
                log::error!("render failed: {err}");
                return;
            }
        }
    }

    println!("{}", work_loop.host().dump_tree(container));
}
