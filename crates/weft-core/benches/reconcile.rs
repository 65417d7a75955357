use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use weft_core::{create_element, Element, MemoryHost, Props, WorkLoop};

fn list(rows: usize, generation: usize) -> Element {
    let items: Vec<Element> = (0..rows)
        .map(|row| {
            create_element(
                "li",
                Props::new().with("row", row as i64),
                [format!("item {row} gen {generation}")],
            )
        })
        .collect();
    create_element("ul", Props::new(), items)
}

fn bench_mount(c: &mut Criterion) {
    let mut group = c.benchmark_group("mount");
    for &rows in &[10usize, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, &rows| {
            b.iter(|| {
                let mut host = MemoryHost::new();
                let container = host.create_container();
                let mut work_loop = WorkLoop::new(host);
                work_loop.render(list(rows, 0), container);
                black_box(work_loop.flush().expect("mount"));
            });
        });
    }
    group.finish();
}

fn bench_rerender(c: &mut Criterion) {
    let mut group = c.benchmark_group("rerender");
    for &rows in &[10usize, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, &rows| {
            let mut host = MemoryHost::new();
            let container = host.create_container();
            let mut work_loop = WorkLoop::new(host);
            work_loop.render(list(rows, 0), container);
            work_loop.flush().expect("mount");
            let mut generation = 0;
            b.iter(|| {
                generation += 1;
                work_loop.render(list(rows, generation), container);
                black_box(work_loop.flush().expect("rerender"));
                work_loop.host_mut().take_ops();
            });
        });
    }
    group.finish();
}

fn bench_unchanged(c: &mut Criterion) {
    let mut host = MemoryHost::new();
    let container = host.create_container();
    let mut work_loop = WorkLoop::new(host);
    let element = list(100, 0);
    work_loop.render(element.clone(), container);
    work_loop.flush().expect("mount");

    c.bench_function("unchanged_100_rows", |b| {
        b.iter(|| {
            work_loop.render(element.clone(), container);
            black_box(work_loop.flush().expect("render"));
        });
    });
}

criterion_group!(reconcile, bench_mount, bench_rerender, bench_unchanged);
criterion_main!(reconcile);
