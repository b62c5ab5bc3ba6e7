//! Benchmarks for producer/consumer throughput.

use std::hint::black_box;
use std::thread;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use ringpipe_buffer::RingBuffer;

const TOTAL: usize = 1 << 20;

fn transfer(capacity: usize, chunk: usize) -> usize {
    let buf = RingBuffer::new(capacity);
    let producer_buf = buf.clone();

    let producer = thread::spawn(move || {
        let data = vec![0xa5u8; chunk];
        let mut sent = 0;
        while sent < TOTAL {
            let n = chunk.min(TOTAL - sent);
            sent += producer_buf.write(&data[..n]).unwrap();
        }
        producer_buf.close();
    });

    let mut scratch = vec![0u8; chunk];
    let mut received = 0;
    loop {
        let n = buf.read(&mut scratch).unwrap();
        if n == 0 {
            break;
        }
        received += n;
    }

    producer.join().unwrap();
    received
}

fn bench_spsc(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring_buffer_spsc");
    group.throughput(Throughput::Bytes(TOTAL as u64));
    group.sample_size(20);

    for capacity in [256usize, 4096, 65536].iter() {
        group.bench_with_input(BenchmarkId::new("chunk_1k", capacity), capacity, |b, &cap| {
            b.iter(|| black_box(transfer(cap, 1024)));
        });
    }

    group.finish();
}

fn bench_single_thread(c: &mut Criterion) {
    let buf = RingBuffer::new(4096);
    let data = vec![0x5au8; 1000];
    let mut scratch = vec![0u8; 1000];

    c.bench_function("ring_buffer_write_read_1000", |b| {
        b.iter(|| {
            buf.write(black_box(&data)).unwrap();
            black_box(buf.read(&mut scratch).unwrap())
        });
    });
}

criterion_group!(benches, bench_spsc, bench_single_thread);
criterion_main!(benches);
