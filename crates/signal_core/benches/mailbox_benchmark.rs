//! Benchmark for mailbox handoff cost.
//!
//! TARGET: uncontended send + receive well under 1 µs
//!
//! Run with: cargo bench --package signal_core --bench mailbox_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use signal_core::{Mailbox, Phase, ReceiveOrder};
use std::sync::Arc;
use std::thread;

fn benchmark_send_receive(c: &mut Criterion) {
    let mailbox = Mailbox::new();

    c.bench_function("send_receive_uncontended", |b| {
        b.iter(|| {
            let _ = mailbox.send(black_box(Phase::Green));
            black_box(mailbox.receive().ok())
        });
    });
}

fn benchmark_burst(c: &mut Criterion) {
    let mut group = c.benchmark_group("burst_1000");
    group.throughput(Throughput::Elements(1_000));

    for (name, order) in [("lifo", ReceiveOrder::Lifo), ("fifo", ReceiveOrder::Fifo)] {
        let mailbox = Mailbox::with_order(order);
        group.bench_function(name, |b| {
            b.iter(|| {
                for i in 0..1_000u32 {
                    let _ = mailbox.send(i);
                }
                while let Some(v) = mailbox.try_receive() {
                    black_box(v);
                }
            });
        });
    }

    group.finish();
}

fn benchmark_cross_thread(c: &mut Criterion) {
    let mut group = c.benchmark_group("cross_thread");
    group.throughput(Throughput::Elements(1_000));

    group.bench_function("producer_to_blocked_consumer", |b| {
        b.iter(|| {
            let mailbox = Arc::new(Mailbox::with_order(ReceiveOrder::Fifo));
            let consumer = {
                let mailbox = Arc::clone(&mailbox);
                thread::spawn(move || {
                    let mut count = 0u32;
                    while mailbox.receive().is_ok() {
                        count += 1;
                    }
                    count
                })
            };

            for i in 0..1_000u32 {
                let _ = mailbox.send(i);
            }
            mailbox.close();
            black_box(consumer.join().ok())
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_send_receive,
    benchmark_burst,
    benchmark_cross_thread
);
criterion_main!(benches);
