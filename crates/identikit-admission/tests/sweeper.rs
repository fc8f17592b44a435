use std::sync::Arc;
use std::time::Duration;

use identikit_admission::{Admission, AdmissionController, QuotaPolicy};

fn controller() -> Arc<AdmissionController> {
    Arc::new(AdmissionController::new(QuotaPolicy {
        limit: 5,
        report_threshold: Some(5),
        reset_interval: Duration::from_secs(60),
    }))
}

#[tokio::test(start_paused = true)]
async fn sweeper_resets_usage_each_interval() {
    let controller = controller();
    assert!(controller.admit("client", 5).is_allowed());
    assert_eq!(controller.admit("client", 1), Admission::Deny { current: 5 });

    let handle = controller.start_sweeper();

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(controller.usage("client"), 5);

    tokio::time::sleep(Duration::from_secs(31)).await;
    assert_eq!(controller.usage("client"), 0);
    assert_eq!(controller.admit("client", 2), Admission::Allow { total: 2 });

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(controller.usage("client"), 0);

    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn stopped_sweeper_no_longer_resets() {
    let controller = controller();
    let handle = controller.start_sweeper();
    handle.stop().await;

    controller.admit("client", 3);
    tokio::time::sleep(Duration::from_secs(600)).await;
    assert_eq!(controller.usage("client"), 3);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_stops_the_sweeper() {
    let controller = controller();
    let handle = controller.start_sweeper();
    drop(handle);
    tokio::task::yield_now().await;

    controller.admit("client", 4);
    tokio::time::sleep(Duration::from_secs(600)).await;
    assert_eq!(controller.usage("client"), 4);
}

#[tokio::test(start_paused = true)]
async fn zero_interval_sweeper_still_resets() {
    let controller = Arc::new(AdmissionController::new(QuotaPolicy {
        limit: 5,
        report_threshold: None,
        reset_interval: Duration::ZERO,
    }));
    assert!(controller.admit("client", 5).is_allowed());

    let handle = controller.start_sweeper();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(controller.usage("client"), 0);
    assert!(controller.admit("client", 5).is_allowed());

    handle.stop().await;
}
