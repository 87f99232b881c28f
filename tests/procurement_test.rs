mod common;

use assert_matches::assert_matches;
use brigade_engine::{
    entities::{
        purchase_alerts::{self, Entity as PurchaseAlerts, PurchaseAlertType},
        purchase_orders::PurchaseOrderStatus,
    },
    errors::ServiceError,
    services::procurement::CreatePurchaseOrderRequest,
};
use chrono::NaiveDate;
use common::TestApp;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, d).unwrap()
}

fn order_request(
    location_id: Uuid,
    vendor_id: Uuid,
    item_id: Uuid,
    quantity: Decimal,
) -> CreatePurchaseOrderRequest {
    CreatePurchaseOrderRequest {
        location_id,
        vendor_id,
        item_id,
        unit_price: dec!(2),
        ordered_quantity: quantity,
        order_date: day(1),
        expected_arrival_date: day(3),
    }
}

async fn alerts_for(app: &TestApp, order_id: Uuid) -> Vec<purchase_alerts::Model> {
    PurchaseAlerts::find()
        .filter(purchase_alerts::Column::PurchaseOrderId.eq(order_id))
        .all(app.db.as_ref())
        .await
        .unwrap()
}

#[tokio::test]
async fn first_order_for_an_item_raises_no_size_alert() {
    let app = TestApp::new().await;
    let region = app.seed_region(dec!(40)).await;
    let location = app.seed_location(region.id, "Main").await;
    let vendor = app.seed_vendor(location.id).await;
    let item = app.seed_item(location.id, "Flour", dec!(0), dec!(0)).await;

    let order = app
        .services
        .procurement
        .create_purchase_order(order_request(location.id, vendor.id, item.id, dec!(20)))
        .await
        .expect("order creates");

    assert_eq!(order.total_order_value, dec!(40));
    assert_eq!(order.status, PurchaseOrderStatus::Pending);
    assert!(alerts_for(&app, order.id).await.is_empty());
}

#[tokio::test]
async fn order_far_above_the_running_average_is_flagged() {
    let app = TestApp::new().await;
    let region = app.seed_region(dec!(40)).await;
    let location = app.seed_location(region.id, "Main").await;
    let vendor = app.seed_vendor(location.id).await;
    let item = app.seed_item(location.id, "Flour", dec!(0), dec!(0)).await;

    app.services
        .procurement
        .create_purchase_order(order_request(location.id, vendor.id, item.id, dec!(20)))
        .await
        .expect("baseline order creates");

    let oversized = app
        .services
        .procurement
        .create_purchase_order(order_request(location.id, vendor.id, item.id, dec!(40)))
        .await
        .expect("oversized order creates");

    let alerts = alerts_for(&app, oversized.id).await;
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].alert_type, PurchaseAlertType::OrderAlert);
    assert!(alerts[0].message.contains("above"));
}

#[tokio::test]
async fn order_within_the_band_is_not_flagged() {
    let app = TestApp::new().await;
    let region = app.seed_region(dec!(40)).await;
    let location = app.seed_location(region.id, "Main").await;
    let vendor = app.seed_vendor(location.id).await;
    let item = app.seed_item(location.id, "Flour", dec!(0), dec!(0)).await;

    app.services
        .procurement
        .create_purchase_order(order_request(location.id, vendor.id, item.id, dec!(20)))
        .await
        .expect("baseline order creates");

    let similar = app
        .services
        .procurement
        .create_purchase_order(order_request(location.id, vendor.id, item.id, dec!(21)))
        .await
        .expect("similar order creates");
    assert!(alerts_for(&app, similar.id).await.is_empty());
}

#[tokio::test]
async fn exact_receipt_stocks_the_ledger_without_alerts() {
    let app = TestApp::new().await;
    let region = app.seed_region(dec!(40)).await;
    let location = app.seed_location(region.id, "Main").await;
    let vendor = app.seed_vendor(location.id).await;
    let item = app.seed_item(location.id, "Flour", dec!(5), dec!(5)).await;

    let order = app
        .services
        .procurement
        .create_purchase_order(order_request(location.id, vendor.id, item.id, dec!(20)))
        .await
        .expect("order creates");
    let receipt = app
        .services
        .procurement
        .receive_purchase_order(order.id, dec!(20), day(3))
        .await
        .expect("receipt books");

    assert_eq!(receipt.quantity_variance, dec!(0));
    assert_eq!(receipt.value_variance, dec!(0));
    assert!(alerts_for(&app, order.id).await.is_empty());

    // 20 units at the order's 2.00 land on top of the existing 5 at 1.00.
    let item = app.services.inventory.get_item(item.id).await.unwrap();
    assert_eq!(item.quantity, dec!(25));
    assert_eq!(item.total_value, dec!(45));
}

#[tokio::test]
async fn over_receipt_raises_variance_alerts_and_a_fault() {
    let app = TestApp::new().await;
    let region = app.seed_region(dec!(40)).await;
    let location = app.seed_location(region.id, "Main").await;
    let vendor = app.seed_vendor(location.id).await;
    let item = app.seed_item(location.id, "Flour", dec!(0), dec!(0)).await;

    let order = app
        .services
        .procurement
        .create_purchase_order(order_request(location.id, vendor.id, item.id, dec!(20)))
        .await
        .expect("order creates");

    // Two units over, a day late.
    let receipt = app
        .services
        .procurement
        .receive_purchase_order(order.id, dec!(22), day(4))
        .await
        .expect("receipt books");

    assert_eq!(receipt.quantity_variance, dec!(2));
    assert_eq!(receipt.quantity_variance_percent, dec!(10));
    assert_eq!(receipt.value_variance, dec!(4));
    assert_eq!(receipt.value_variance_percent, dec!(10));

    let alerts = alerts_for(&app, order.id).await;
    let types: Vec<PurchaseAlertType> = alerts.iter().map(|a| a.alert_type).collect();
    assert!(types.contains(&PurchaseAlertType::QuantityVariance));
    assert!(types.contains(&PurchaseAlertType::ValueVariance));
    assert!(types.contains(&PurchaseAlertType::ArrivalDateVariance));

    let insight = app
        .services
        .insights
        .get_insight(location.id)
        .await
        .unwrap()
        .expect("ten percent over-receipt records a fault");
    assert_eq!(insight.fault_count, 1);
}

#[tokio::test]
async fn short_receipt_records_negative_variance_without_alerts() {
    let app = TestApp::new().await;
    let region = app.seed_region(dec!(40)).await;
    let location = app.seed_location(region.id, "Main").await;
    let vendor = app.seed_vendor(location.id).await;
    let item = app.seed_item(location.id, "Flour", dec!(0), dec!(0)).await;

    let order = app
        .services
        .procurement
        .create_purchase_order(order_request(location.id, vendor.id, item.id, dec!(20)))
        .await
        .expect("order creates");
    let receipt = app
        .services
        .procurement
        .receive_purchase_order(order.id, dec!(18), day(3))
        .await
        .expect("receipt books");

    assert_eq!(receipt.quantity_variance, dec!(-2));
    assert_eq!(receipt.quantity_variance_percent, dec!(-10));
    assert!(alerts_for(&app, order.id).await.is_empty());
    assert!(app
        .services
        .insights
        .get_insight(location.id)
        .await
        .unwrap()
        .is_none());

    // The ledger receives what actually arrived.
    let item = app.services.inventory.get_item(item.id).await.unwrap();
    assert_eq!(item.quantity, dec!(18));
    assert_eq!(item.total_value, dec!(36));
}

#[tokio::test]
async fn receiving_twice_is_rejected() {
    let app = TestApp::new().await;
    let region = app.seed_region(dec!(40)).await;
    let location = app.seed_location(region.id, "Main").await;
    let vendor = app.seed_vendor(location.id).await;
    let item = app.seed_item(location.id, "Flour", dec!(0), dec!(0)).await;

    let order = app
        .services
        .procurement
        .create_purchase_order(order_request(location.id, vendor.id, item.id, dec!(20)))
        .await
        .expect("order creates");
    app.services
        .procurement
        .receive_purchase_order(order.id, dec!(20), day(3))
        .await
        .expect("first receipt books");

    let result = app
        .services
        .procurement
        .receive_purchase_order(order.id, dec!(20), day(3))
        .await;
    assert_matches!(result, Err(ServiceError::InvalidStatus(_)));
}

#[tokio::test]
async fn nonpositive_order_quantities_are_rejected() {
    let app = TestApp::new().await;
    let region = app.seed_region(dec!(40)).await;
    let location = app.seed_location(region.id, "Main").await;
    let vendor = app.seed_vendor(location.id).await;
    let item = app.seed_item(location.id, "Flour", dec!(0), dec!(0)).await;

    let result = app
        .services
        .procurement
        .create_purchase_order(order_request(location.id, vendor.id, item.id, dec!(0)))
        .await;
    assert_matches!(result, Err(ServiceError::ValidationError(_)));
}
