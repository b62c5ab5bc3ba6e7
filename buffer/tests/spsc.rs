//! Producer/consumer behavior of the ring buffer across real threads.

use std::io::{Read, Write};
use std::thread;
use std::time::Duration;

use ringpipe_buffer::{RingBuffer, pipe};

/// Deterministic pseudo-random chunk sizes in `1..=max`.
fn chunk_sizes(seed: u64, max: usize) -> impl Iterator<Item = usize> {
    let mut x = seed;
    std::iter::repeat_with(move || {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((x >> 33) as usize % max) + 1
    })
}

fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 251) as u8).collect()
}

#[test]
fn fifo_across_threads_with_uneven_chunks() {
    let data = payload(64 * 1024);
    let buf = RingBuffer::new(37);
    let producer_buf = buf.clone();
    let to_send = data.clone();

    let producer = thread::spawn(move || {
        let mut sent = 0;
        for size in chunk_sizes(7, 100) {
            if sent == to_send.len() {
                break;
            }
            let end = (sent + size).min(to_send.len());
            assert_eq!(producer_buf.write(&to_send[sent..end]).unwrap(), end - sent);
            sent = end;
        }
        producer_buf.close();
    });

    let mut got = Vec::with_capacity(data.len());
    let mut scratch = [0u8; 64];
    for size in chunk_sizes(11, 64) {
        let n = buf.read(&mut scratch[..size]).unwrap();
        if n == 0 {
            break;
        }
        assert!(n <= size);
        assert!(buf.len() <= buf.capacity());
        got.extend_from_slice(&scratch[..n]);
    }

    producer.join().unwrap();
    assert_eq!(got.len(), data.len());
    assert_eq!(got, data);
}

#[test]
fn capacity_four_scenario() {
    let buf = RingBuffer::new(4);

    buf.write(b"AB").unwrap();
    assert_eq!(buf.len(), 2);
    assert_eq!(buf.free(), 2);

    let mut one = [0u8; 1];
    assert_eq!(buf.read(&mut one).unwrap(), 1);
    assert_eq!(&one, b"A");
    assert_eq!(buf.len(), 1);

    // Exactly three bytes free, no blocking
    assert_eq!(buf.write(b"CDE").unwrap(), 3);
    assert_eq!(buf.len(), 4);
    assert_eq!(buf.free(), 0);

    let writer_buf = buf.clone();
    let writer = thread::spawn(move || writer_buf.write(b"F").unwrap());

    thread::sleep(Duration::from_millis(50));
    assert!(!writer.is_finished(), "write into a full buffer must block");

    assert_eq!(buf.read(&mut one).unwrap(), 1);
    assert_eq!(&one, b"B");

    assert_eq!(writer.join().unwrap(), 1);
    assert_eq!(buf.len(), 4);

    let mut rest = [0u8; 4];
    assert_eq!(buf.read(&mut rest).unwrap(), 4);
    assert_eq!(&rest, b"CDEF");
}

#[test]
fn full_buffer_write_completes_exact_total() {
    let buf = RingBuffer::new(16);
    let writer_buf = buf.clone();
    let data = payload(1000);
    let to_send = data.clone();

    let writer = thread::spawn(move || writer_buf.write(&to_send).unwrap());

    let mut got = Vec::new();
    let mut scratch = [0u8; 7];
    while got.len() < data.len() {
        let n = buf.read(&mut scratch).unwrap();
        got.extend_from_slice(&scratch[..n]);
    }

    assert_eq!(writer.join().unwrap(), 1000);
    assert_eq!(got, data);
    assert!(buf.is_empty());
    assert_eq!(buf.dump().bytes_written, 1000);
}

#[test]
fn blocked_read_returns_what_was_written() {
    let buf = RingBuffer::new(32);
    let reader_buf = buf.clone();

    let reader = thread::spawn(move || {
        let mut dst = [0u8; 8];
        let n = reader_buf.read(&mut dst).unwrap();
        dst[..n].to_vec()
    });

    thread::sleep(Duration::from_millis(50));
    assert!(!reader.is_finished(), "read on an empty open buffer must block");

    buf.write(b"0123456789").unwrap();
    let first = reader.join().unwrap();
    assert!(!first.is_empty() && first.len() <= 8);
    assert_eq!(first, &b"0123456789"[..first.len()]);
}

#[test]
fn pipe_streams_through_io_copy() {
    let (mut writer, mut reader) = pipe(4096).unwrap();
    let data = payload(4097 * 3);
    let to_send = data.clone();

    let producer = thread::spawn(move || {
        for chunk in to_send.chunks(4097) {
            writer.write_all(chunk).unwrap();
        }
    });

    let mut out = Vec::new();
    let copied = std::io::copy(&mut reader, &mut out).unwrap();
    producer.join().unwrap();

    assert_eq!(copied as usize, data.len());
    assert_eq!(out, data);

    let mut tail = [0u8; 1];
    assert_eq!(reader.read(&mut tail).unwrap(), 0);
}
