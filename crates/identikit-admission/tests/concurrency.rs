use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use identikit_admission::{Admission, AdmissionController, QuotaPolicy};

fn policy(limit: u64) -> QuotaPolicy {
    QuotaPolicy {
        limit,
        report_threshold: None,
        reset_interval: Duration::from_secs(300),
    }
}

#[test]
fn concurrent_unit_requests_never_exceed_the_limit() {
    let controller = Arc::new(AdmissionController::new(policy(100)));
    let allowed = Arc::new(AtomicU64::new(0));

    let workers: Vec<_> = (0..8)
        .map(|_| {
            let controller = Arc::clone(&controller);
            let allowed = Arc::clone(&allowed);
            thread::spawn(move || {
                for _ in 0..50 {
                    if controller.admit("shared", 1).is_allowed() {
                        allowed.fetch_add(1, Ordering::SeqCst);
                    }
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().expect("worker thread");
    }

    assert_eq!(allowed.load(Ordering::SeqCst), 100);
    assert_eq!(controller.usage("shared"), 100);
}

#[test]
fn overshoot_is_bounded_by_one_request() {
    let controller = Arc::new(AdmissionController::new(policy(50)));
    let workers: Vec<_> = (0..4)
        .map(|_| {
            let controller = Arc::clone(&controller);
            thread::spawn(move || {
                for _ in 0..20 {
                    controller.admit("burst", 7);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().expect("worker thread");
    }

    let usage = controller.usage("burst");
    assert!(usage >= 50);
    assert!(usage < 50 + 7);
    assert_eq!(
        controller.admit("burst", 1),
        Admission::Deny { current: usage }
    );
}

#[test]
fn sweep_during_load_leaves_a_consistent_table() {
    let controller = Arc::new(AdmissionController::new(policy(u64::MAX)));
    let admitter = {
        let controller = Arc::clone(&controller);
        thread::spawn(move || {
            for i in 0..1000 {
                controller.admit(&format!("client-{}", i % 10), 1);
            }
        })
    };
    let mut cleared_total = 0;
    for _ in 0..20 {
        cleared_total += controller.sweep().cleared;
    }
    admitter.join().expect("admitter thread");

    let remaining: u64 = (0..10)
        .map(|i| controller.usage(&format!("client-{i}")))
        .sum();
    assert!(remaining <= 1000);
    assert!(cleared_total <= 1000);
}
