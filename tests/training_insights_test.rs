mod common;

use common::TestApp;
use rust_decimal_macros::dec;

#[tokio::test]
async fn first_fault_creates_the_location_row_at_one() {
    let app = TestApp::new().await;
    let region = app.seed_region(dec!(40)).await;
    let location = app.seed_location(region.id, "Main").await;

    assert!(app
        .services
        .insights
        .get_insight(location.id)
        .await
        .unwrap()
        .is_none());

    let count = app
        .services
        .insights
        .record_fault(location.id)
        .await
        .expect("first fault creates the row");
    assert_eq!(count, 1);

    let insight = app
        .services
        .insights
        .get_insight(location.id)
        .await
        .unwrap()
        .expect("row exists after the first fault");
    assert_eq!(insight.fault_count, 1);
    assert!(!insight.suggested_training.is_empty());
}

#[tokio::test]
async fn repeated_faults_increment_the_counter() {
    let app = TestApp::new().await;
    let region = app.seed_region(dec!(40)).await;
    let location = app.seed_location(region.id, "Main").await;

    for expected in 1..=3 {
        let count = app
            .services
            .insights
            .record_fault(location.id)
            .await
            .expect("fault records");
        assert_eq!(count, expected);
    }

    let insight = app
        .services
        .insights
        .get_insight(location.id)
        .await
        .unwrap()
        .expect("row exists");
    assert_eq!(insight.fault_count, 3);
}

#[tokio::test]
async fn locations_keep_separate_counters() {
    let app = TestApp::new().await;
    let region = app.seed_region(dec!(40)).await;
    let first = app.seed_location(region.id, "Downtown").await;
    let second = app.seed_location(region.id, "Uptown").await;

    app.services
        .insights
        .record_fault(first.id)
        .await
        .expect("fault records");
    app.services
        .insights
        .record_fault(first.id)
        .await
        .expect("fault records");
    app.services
        .insights
        .record_fault(second.id)
        .await
        .expect("fault records");

    let first_insight = app
        .services
        .insights
        .get_insight(first.id)
        .await
        .unwrap()
        .expect("row exists");
    let second_insight = app
        .services
        .insights
        .get_insight(second.id)
        .await
        .unwrap()
        .expect("row exists");
    assert_eq!(first_insight.fault_count, 2);
    assert_eq!(second_insight.fault_count, 1);
}
