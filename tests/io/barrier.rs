// Integration tests for src/io/barrier.rs — ordering barrier
//
// Covers:
//   - workers finishing out of order still pass the barrier in sequence
//   - abort() releases every waiter with an error

use lz4pipe::io::barrier::{BarrierAborted, SequenceBarrier};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[test]
fn turns_are_taken_in_sequence() {
    let barrier = Arc::new(SequenceBarrier::new());
    let order = Arc::new(Mutex::new(Vec::new()));

    // Spawn in reverse so the highest number is ready first.
    let handles: Vec<_> = (0..8u64)
        .rev()
        .map(|seq| {
            let barrier = Arc::clone(&barrier);
            let order = Arc::clone(&order);
            thread::spawn(move || {
                barrier.wait_turn(seq).unwrap();
                order.lock().unwrap().push(seq);
                barrier.advance();
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(*order.lock().unwrap(), (0..8).collect::<Vec<_>>());
    assert_eq!(barrier.next_expected(), 8);
}

#[test]
fn abort_releases_waiters() {
    let barrier = Arc::new(SequenceBarrier::new());
    let waiters: Vec<_> = (1..4u64)
        .map(|seq| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || barrier.wait_turn(seq))
        })
        .collect();
    thread::sleep(Duration::from_millis(20));
    barrier.abort();
    for w in waiters {
        assert_eq!(w.join().unwrap(), Err(BarrierAborted));
    }
    assert!(barrier.is_aborted());
}
