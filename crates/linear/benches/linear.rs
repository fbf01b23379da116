use criterion::{Criterion, criterion_group, criterion_main};

mod common;

use common::{Access, Update};

fn bench_linear(c: &mut Criterion) {
    bench::init_tracing();

    let updates = [
        ("linear/append", Update::Append),
        ("linear/prepend", Update::Prepend),
        ("linear/pop_first", Update::PopFirst),
        ("linear/pop_last", Update::PopLast),
    ];
    for (name, update) in updates {
        let mut group = c.benchmark_group(name);
        common::bench_all_update(&mut group, update);
        group.finish();
    }

    let accesses = [
        ("linear/access_first", Access::First),
        ("linear/access_last", Access::Last),
        ("linear/access_middle", Access::Middle),
    ];
    for (name, access) in accesses {
        let mut group = c.benchmark_group(name);
        common::bench_all_access(&mut group, access);
        group.finish();
    }
}

criterion_group!(benches, bench_linear);
criterion_main!(benches);
