// Integration tests for src/io/queue.rs — bounded hand-off queue
//
// Covers:
//   - FIFO order across a producer and a consumer thread
//   - the queue never holds more than `capacity` items
//   - a producer blocked on a full queue resumes after one dequeue
//   - close() releases a blocked producer with its chunk handed back
//   - one queue per run: two queues never interfere

use lz4pipe::io::queue::{HandoffQueue, QueueClosed};
use lz4pipe::io::Chunk;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn fifo_across_threads() {
    let q = Arc::new(HandoffQueue::new(3));
    let producer = {
        let q = Arc::clone(&q);
        thread::spawn(move || {
            for i in 0..500u64 {
                q.enqueue(Chunk::new(i, i.to_le_bytes().to_vec())).unwrap();
            }
            q.enqueue(Chunk::sentinel()).unwrap();
        })
    };

    let mut expected = 0u64;
    loop {
        let c = q.dequeue();
        if c.is_sentinel() {
            break;
        }
        assert_eq!(c.index(), Some(expected));
        assert_eq!(c.payload.as_deref(), Some(&expected.to_le_bytes()[..]));
        expected += 1;
    }
    producer.join().unwrap();
    assert_eq!(expected, 500);
}

#[test]
fn occupancy_never_exceeds_capacity() {
    let q = Arc::new(HandoffQueue::new(2));
    let max_seen = Arc::new(AtomicUsize::new(0));

    let producer = {
        let q = Arc::clone(&q);
        let max_seen = Arc::clone(&max_seen);
        thread::spawn(move || {
            for i in 0..200u64 {
                q.enqueue(Chunk::new(i, vec![])).unwrap();
                max_seen.fetch_max(q.len(), Ordering::Relaxed);
            }
            q.enqueue(Chunk::sentinel()).unwrap();
        })
    };
    while !q.dequeue().is_sentinel() {
        max_seen.fetch_max(q.len(), Ordering::Relaxed);
    }
    producer.join().unwrap();
    assert!(max_seen.load(Ordering::Relaxed) <= 2);
}

#[test]
fn blocked_producer_resumes_after_dequeue() {
    let q = Arc::new(HandoffQueue::new(1));
    q.enqueue(Chunk::new(0, vec![0])).unwrap();

    let producer = {
        let q = Arc::clone(&q);
        thread::spawn(move || q.enqueue(Chunk::new(1, vec![1])))
    };
    thread::sleep(Duration::from_millis(50));
    assert_eq!(q.len(), 1, "second chunk must wait");

    assert_eq!(q.dequeue().index(), Some(0));
    producer.join().unwrap().unwrap();
    assert_eq!(q.dequeue().index(), Some(1));
}

#[test]
fn close_hands_back_the_blocked_chunk() {
    let q = Arc::new(HandoffQueue::new(1));
    q.enqueue(Chunk::new(0, vec![])).unwrap();

    let producer = {
        let q = Arc::clone(&q);
        thread::spawn(move || q.enqueue(Chunk::new(1, b"kept".to_vec())))
    };
    thread::sleep(Duration::from_millis(20));
    q.close();

    let QueueClosed(chunk) = producer.join().unwrap().unwrap_err();
    assert_eq!(chunk.index(), Some(1));
    assert_eq!(chunk.payload.as_deref(), Some(&b"kept"[..]));
    assert!(q.dequeue().is_sentinel());
}

#[test]
fn queues_are_independent() {
    let a = HandoffQueue::new(1);
    let b = HandoffQueue::new(1);
    a.enqueue(Chunk::new(0, vec![])).unwrap();
    // `a` is full; `b` still accepts without blocking.
    b.enqueue(Chunk::new(0, vec![])).unwrap();
    a.close();
    assert!(!b.is_closed());
    assert_eq!(b.len(), 1);
}
