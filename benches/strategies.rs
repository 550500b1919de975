#[macro_use]
extern crate criterion;

use criterion::Criterion;
use mandelbrot::{render, Config, Strategy};

fn strategies(c: &mut Criterion) {
    let config = Config::with_size(320, 240).unwrap();
    let threads = num_cpus::get();

    c.bench_function("flat 320x240", move |b| {
        b.iter(|| render(&config, &Strategy::Flat { threads }).unwrap())
    });
    c.bench_function("streamed 320x240", move |b| {
        b.iter(|| {
            render(
                &config,
                &Strategy::Streamed {
                    blocks: 8,
                    streams: 3,
                    threads,
                },
            )
            .unwrap()
        })
    });
}

criterion_group!(benches, strategies);
criterion_main!(benches);
