use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use topology_events::{ChildLinking, Event, EventFactory, build_with};
use topology_infra::Store;

/// A log of `roots` equipment items, each with a nested item and a few properties.
fn synthetic_log(roots: usize) -> Vec<Event> {
    let mut factory = EventFactory::new();
    let mut events = Vec::with_capacity(roots * 5);

    for n in 0..roots {
        let root = factory.equipment(&format!("Rack-{n}"), None).unwrap();
        let root_id = root.id().to_string();
        events.push(root);
        events.push(factory.property("Site", "DC1", Some(&root_id)).unwrap());
        let child = factory.equipment(&format!("Server-{n}"), Some(&root_id)).unwrap();
        let child_id = child.id().to_string();
        events.push(child);
        events.push(factory.property("Cores", "64", Some(&child_id)).unwrap());
        events.push(factory.property("Site", "DC2", Some(&root_id)).unwrap());
    }

    events
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for roots in [10usize, 100, 1_000] {
        let log = synthetic_log(roots);
        group.throughput(Throughput::Elements(log.len() as u64));

        for linking in [ChildLinking::Flat, ChildLinking::Nested] {
            group.bench_with_input(
                BenchmarkId::new(linking.to_string(), roots),
                &log,
                |b, log| b.iter(|| build_with(black_box(log), linking)),
            );
        }
    }

    group.finish();
}

fn bench_append_and_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("append_rebuild");

    for appends in [50usize, 500] {
        group.throughput(Throughput::Elements(appends as u64));
        group.bench_with_input(BenchmarkId::from_parameter(appends), &appends, |b, &appends| {
            b.iter(|| {
                let mut store = Store::new();
                for n in 0..appends {
                    let id = store.record_equipment(&format!("Item-{n}"), None).unwrap();
                    store
                        .record_property("Serial", &n.to_string(), Some(id.as_str()))
                        .unwrap();
                }
                black_box(store.current_projection())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_append_and_rebuild);
criterion_main!(benches);
