mod common;

use assert_matches::assert_matches;
use brigade_engine::{
    entities::inventory_waste::WasteReason,
    errors::ServiceError,
    services::{inventory::WasteInventoryRequest, procurement::CreatePurchaseOrderRequest},
};
use chrono::NaiveDate;
use common::TestApp;
use rust_decimal_macros::dec;
use uuid::Uuid;

fn may(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
}

struct PeriodFixture {
    app: TestApp,
    region_id: Uuid,
    location_id: Uuid,
    item_id: Uuid,
}

/// One four-week period with a stocked item (50 units at 2.00), one exact
/// receipt of 20 more at 2.00, and 5 units wasted. Live value ends at
/// 130.00.
async fn period_fixture() -> PeriodFixture {
    let app = TestApp::new().await;
    let region = app.seed_region(dec!(40)).await;
    let location = app.seed_location(region.id, "Main").await;
    app.seed_period(region.id, may(1), may(28)).await;
    let vendor = app.seed_vendor(location.id).await;
    let item = app.seed_item(location.id, "Flour", dec!(50), dec!(100)).await;

    let order = app
        .services
        .procurement
        .create_purchase_order(CreatePurchaseOrderRequest {
            location_id: location.id,
            vendor_id: vendor.id,
            item_id: item.id,
            unit_price: dec!(2),
            ordered_quantity: dec!(20),
            order_date: may(2),
            expected_arrival_date: may(3),
        })
        .await
        .expect("order creates");
    app.services
        .procurement
        .receive_purchase_order(order.id, dec!(20), may(3))
        .await
        .expect("receipt books");

    app.services
        .inventory
        .waste(WasteInventoryRequest {
            item_id: item.id,
            quantity: dec!(5),
            reason: WasteReason::Spoilage,
            culprit_employee_id: None,
            reported_by_id: None,
            comments: None,
            waste_date: may(4),
        })
        .await
        .expect("waste books");

    PeriodFixture {
        app,
        region_id: region.id,
        location_id: location.id,
        item_id: item.id,
    }
}

#[tokio::test]
async fn mid_period_cost_report_carries_current_figures_only() {
    let fixture = period_fixture().await;
    let app = &fixture.app;

    let report = app
        .services
        .reports
        .generate_cost_report(fixture.location_id, may(10))
        .await
        .expect("report generates");

    assert_eq!(report.opening_inventory_value, dec!(130));
    assert_eq!(report.closing_inventory_value, None);
    assert_eq!(report.purchases_value, dec!(40));
    assert_eq!(report.wastage_value, dec!(10));
    assert_eq!(report.theoretical_cogs, None);
    assert_eq!(report.actual_cogs, None);
    // opening + purchases - live + wastage = 130 + 40 - 130 + 10
    assert_eq!(report.current_cogs, dec!(50));
    assert_eq!(report.cogs_variance, dec!(10));
    assert_eq!(report.cogs_variance_percent, dec!(25));
    assert!(!report.variance_undefined);

    // 25% variance and a non-positive gross profit: two faults.
    let insight = app
        .services
        .insights
        .get_insight(fixture.location_id)
        .await
        .unwrap()
        .expect("faults recorded");
    assert_eq!(insight.fault_count, 2);
}

#[tokio::test]
async fn end_of_period_cost_report_closes_the_books() {
    let fixture = period_fixture().await;
    let app = &fixture.app;

    let report = app
        .services
        .reports
        .generate_cost_report(fixture.location_id, may(28))
        .await
        .expect("report generates");

    assert_eq!(report.opening_inventory_value, dec!(130));
    assert_eq!(report.closing_inventory_value, Some(dec!(130)));
    assert_eq!(report.theoretical_cogs, Some(dec!(40)));
    assert_eq!(report.actual_cogs, Some(dec!(50)));
    assert_eq!(report.current_cogs, dec!(50));
    assert_eq!(report.cogs_variance, dec!(10));
    assert_eq!(report.cogs_variance_percent, dec!(25));
    assert_eq!(report.theoretical_gross_profit, dec!(-40));
    assert_eq!(report.actual_gross_profit, dec!(-50));
}

#[tokio::test]
async fn next_period_opens_at_the_previous_closing_value() {
    let fixture = period_fixture().await;
    let app = &fixture.app;

    app.services
        .reports
        .generate_cost_report(fixture.location_id, may(28))
        .await
        .expect("closing report generates");

    app.seed_period(
        fixture.region_id,
        may(29),
        NaiveDate::from_ymd_opt(2025, 6, 25).unwrap(),
    )
    .await;

    let report = app
        .services
        .reports
        .generate_cost_report(fixture.location_id, NaiveDate::from_ymd_opt(2025, 6, 5).unwrap())
        .await
        .expect("next-period report generates");

    assert_eq!(report.opening_inventory_value, dec!(130));
    // No activity yet: zero COGS makes the variance percent undefined.
    assert_eq!(report.current_cogs, dec!(0));
    assert_eq!(report.cogs_variance_percent, dec!(0));
    assert!(report.variance_undefined);
}

#[tokio::test]
async fn report_outside_any_period_is_rejected() {
    let fixture = period_fixture().await;
    let result = fixture
        .app
        .services
        .reports
        .generate_cost_report(fixture.location_id, NaiveDate::from_ymd_opt(2025, 9, 1).unwrap())
        .await;
    assert_matches!(result, Err(ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn usage_report_tracks_the_item_and_recomputes_par_weekly() {
    let fixture = period_fixture().await;
    let app = &fixture.app;

    // Exactly one week into the period.
    let report = app
        .services
        .reports
        .generate_usage_report(fixture.item_id, may(8))
        .await
        .expect("usage report generates");

    assert_eq!(report.opening_quantity, dec!(65));
    assert_eq!(report.closing_quantity, None);
    assert_eq!(report.purchases_quantity, dec!(20));
    assert_eq!(report.waste_quantity, dec!(5));
    // opening + purchases - live + waste = 65 + 20 - 65 + 5
    assert_eq!(report.current_usage_quantity, dec!(25));
    assert_eq!(report.usage_variance, dec!(5));
    assert_eq!(report.usage_variance_percent, dec!(25));

    // One week elapsed: rate 25/week, (25 + 1 safety) / 2 deliveries.
    let item = app.services.inventory.get_item(fixture.item_id).await.unwrap();
    assert_eq!(item.par_level, Some(dec!(13)));
}

#[tokio::test]
async fn usage_report_off_the_week_boundary_leaves_par_alone() {
    let fixture = period_fixture().await;
    let app = &fixture.app;

    app.services
        .reports
        .generate_usage_report(fixture.item_id, may(10))
        .await
        .expect("usage report generates");

    let item = app.services.inventory.get_item(fixture.item_id).await.unwrap();
    assert_eq!(item.par_level, None);
}

#[tokio::test]
async fn end_of_period_usage_report_closes_the_item() {
    let fixture = period_fixture().await;
    let app = &fixture.app;

    let report = app
        .services
        .reports
        .generate_usage_report(fixture.item_id, may(28))
        .await
        .expect("usage report generates");

    assert_eq!(report.closing_quantity, Some(dec!(65)));
    assert_eq!(report.closing_value, Some(dec!(130)));
    assert_eq!(report.theoretical_usage_quantity, Some(dec!(20)));
    assert_eq!(report.actual_usage_quantity, Some(dec!(25)));
    assert_eq!(report.usage_variance, dec!(5));
    assert_eq!(report.usage_variance_percent, dec!(25));
}
