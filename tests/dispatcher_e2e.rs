use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use gemlink::{DispatcherConfig, GemError, ProtocolDispatcher, TriggerWorker};

fn wait_until(what: &str, predicate: impl Fn() -> bool) {
    for _ in 0..400 {
        if predicate() {
            return;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    panic!("timed out waiting for {what}");
}

#[test]
fn fifo_delivery_across_producers() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let pair = {
        let seen = Arc::clone(&seen);
        Arc::new(ProtocolDispatcher::new(
            DispatcherConfig::default(),
            || Ok(()),
            move |origin: u64, message: u64| {
                seen.lock().unwrap().push((origin, message));
                Ok(())
            },
        ))
    };

    pair.start().unwrap();

    // Two producers, each enqueue fully completing before the next begins
    // (the barrier is the mutex around the shared sequence counter).
    let sequence = Arc::new(Mutex::new(0u64));
    let mut producers = Vec::new();
    for origin in 0..2u64 {
        let pair = Arc::clone(&pair);
        let sequence = Arc::clone(&sequence);
        producers.push(std::thread::spawn(move || {
            for _ in 0..100 {
                let mut seq = sequence.lock().unwrap();
                pair.enqueue(origin, *seq);
                *seq += 1;
            }
        }));
    }
    for producer in producers {
        producer.join().unwrap();
    }

    wait_until("all 200 items dispatched", || seen.lock().unwrap().len() == 200);
    pair.stop().unwrap();

    let seen = seen.lock().unwrap();
    let delivered: Vec<u64> = seen.iter().map(|(_, message)| *message).collect();
    let expected: Vec<u64> = (0..200).collect();
    assert_eq!(delivered, expected);
}

#[test]
fn backlog_drains_on_a_single_wake() {
    let dispatched = Arc::new(Mutex::new(Vec::new()));
    let pair = {
        let dispatched = Arc::clone(&dispatched);
        ProtocolDispatcher::new(
            DispatcherConfig::default(),
            || Ok(()),
            move |_: u64, message: u64| {
                dispatched.lock().unwrap().push(message);
                Ok(())
            },
        )
    };

    // The pair is not started yet: every enqueue signal coalesces into one
    // armed trigger. A single wake must still deliver the whole backlog.
    for i in 0..50 {
        pair.enqueue(0, i);
    }
    assert_eq!(pair.queued(), 50);

    pair.start().unwrap();
    wait_until("backlog delivered", || dispatched.lock().unwrap().len() == 50);
    pair.stop().unwrap();

    let dispatched = dispatched.lock().unwrap();
    let expected: Vec<u64> = (0..50).collect();
    assert_eq!(*dispatched, expected);
    assert_eq!(pair.queued(), 0);
}

#[test]
fn coalesced_receiver_signals_wake_once() {
    let received = Arc::new(AtomicUsize::new(0));
    let pair: ProtocolDispatcher<u64, u64> = {
        let received = Arc::clone(&received);
        ProtocolDispatcher::new(
            DispatcherConfig {
                name: "coalesce-test".to_string(),
            },
            move || {
                received.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
            |_, _| Ok(()),
        )
    };

    // Arm the receiver trigger many times before the worker exists.
    for _ in 0..10 {
        pair.trigger_receiver();
    }

    pair.start().unwrap();
    wait_until("receive action ran", || received.load(Ordering::SeqCst) >= 1);

    // The ten signals collapsed into a single edge; no further wake follows.
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(received.load(Ordering::SeqCst), 1);

    pair.stop().unwrap();
}

#[test]
fn dispatch_handler_failure_is_isolated_per_item() {
    let delivered = Arc::new(Mutex::new(Vec::new()));
    let pair = {
        let delivered = Arc::clone(&delivered);
        ProtocolDispatcher::new(
            DispatcherConfig::default(),
            || Ok(()),
            move |_: u64, message: u64| {
                if message == 2 {
                    return Err(GemError::internal("handler rejects item 2"));
                }
                delivered.lock().unwrap().push(message);
                Ok(())
            },
        )
    };

    pair.enqueue(0, 1);
    pair.enqueue(0, 2);
    pair.enqueue(0, 3);

    pair.start().unwrap();
    wait_until("surviving items delivered", || {
        delivered.lock().unwrap().len() == 2
    });
    pair.stop().unwrap();

    assert_eq!(*delivered.lock().unwrap(), vec![1, 3]);
}

#[test]
fn receive_action_failure_does_not_kill_receiver() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let pair: ProtocolDispatcher<u64, u64> = {
        let attempts = Arc::clone(&attempts);
        ProtocolDispatcher::new(
            DispatcherConfig::default(),
            move || {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                if n == 0 {
                    Err(GemError::internal("transient read failure"))
                } else {
                    Ok(())
                }
            },
            |_, _| Ok(()),
        )
    };

    pair.start().unwrap();

    pair.trigger_receiver();
    wait_until("failing invocation", || attempts.load(Ordering::SeqCst) == 1);

    pair.trigger_receiver();
    wait_until("invocation after failure", || {
        attempts.load(Ordering::SeqCst) == 2
    });

    pair.stop().unwrap();
}

#[test]
fn stop_while_idle_never_runs_work() {
    let runs = Arc::new(AtomicUsize::new(0));
    let worker = {
        let runs = Arc::clone(&runs);
        TriggerWorker::new("idle", move || {
            runs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    };

    worker.start().unwrap();
    worker.stop().unwrap();

    assert_eq!(runs.load(Ordering::SeqCst), 0);
}

#[test]
fn pair_restarts_after_stop() {
    let delivered = Arc::new(Mutex::new(Vec::new()));
    let pair = {
        let delivered = Arc::clone(&delivered);
        ProtocolDispatcher::new(
            DispatcherConfig::default(),
            || Ok(()),
            move |_: u64, message: u64| {
                delivered.lock().unwrap().push(message);
                Ok(())
            },
        )
    };

    pair.start().unwrap();
    pair.enqueue(0, 1);
    wait_until("first item", || delivered.lock().unwrap().len() == 1);
    pair.stop().unwrap();
    assert!(!pair.is_running());

    pair.start().unwrap();
    assert!(pair.is_running());
    pair.enqueue(0, 2);
    wait_until("item after restart", || delivered.lock().unwrap().len() == 2);
    pair.stop().unwrap();

    assert_eq!(*delivered.lock().unwrap(), vec![1, 2]);
}

#[test]
fn double_start_fails_without_duplicating_workers() {
    let pair: ProtocolDispatcher<u64, u64> =
        ProtocolDispatcher::new(DispatcherConfig::default(), || Ok(()), |_, _| Ok(()));

    pair.start().unwrap();
    assert!(pair.start().is_err());
    assert!(pair.is_running());
    pair.stop().unwrap();
}
