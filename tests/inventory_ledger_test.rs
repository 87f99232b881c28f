mod common;

use assert_matches::assert_matches;
use brigade_engine::{
    entities::{employees::JobPosition, inventory_waste::WasteReason},
    errors::ServiceError,
    services::inventory::{TransferInventoryRequest, WasteInventoryRequest},
};
use chrono::NaiveDate;
use common::TestApp;
use rust_decimal_macros::dec;

fn check_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

#[tokio::test]
async fn receive_then_consume_maintains_average_cost() {
    let app = TestApp::new().await;
    let region = app.seed_region(dec!(40)).await;
    let location = app.seed_location(region.id, "Main").await;
    let item = app.seed_item(location.id, "Flour", dec!(0), dec!(0)).await;

    let item = app
        .services
        .inventory
        .receive(item.id, dec!(10), dec!(5))
        .await
        .expect("receive succeeds");
    assert_eq!(item.quantity, dec!(10));
    assert_eq!(item.total_value, dec!(50));

    let item = app
        .services
        .inventory
        .consume(item.id, dec!(4))
        .await
        .expect("consume succeeds");
    assert_eq!(item.quantity, dec!(6));
    assert_eq!(item.total_value, dec!(30));
    assert_eq!(item.average_unit_price(), dec!(5));
}

#[tokio::test]
async fn consume_never_drives_stock_negative() {
    let app = TestApp::new().await;
    let region = app.seed_region(dec!(40)).await;
    let location = app.seed_location(region.id, "Main").await;
    let item = app.seed_item(location.id, "Basil", dec!(2), dec!(8)).await;

    let result = app.services.inventory.consume(item.id, dec!(3)).await;
    assert_matches!(result, Err(ServiceError::InsufficientStock(_)));

    // Unchanged after the rejected draw-down.
    let item = app.services.inventory.get_item(item.id).await.unwrap();
    assert_eq!(item.quantity, dec!(2));
    assert_eq!(item.total_value, dec!(8));
}

#[tokio::test]
async fn consuming_to_zero_clears_residual_value() {
    let app = TestApp::new().await;
    let region = app.seed_region(dec!(40)).await;
    let location = app.seed_location(region.id, "Main").await;
    let item = app
        .seed_item(location.id, "Saffron", dec!(3), dec!(10))
        .await;

    let item = app
        .services
        .inventory
        .consume(item.id, dec!(3))
        .await
        .expect("consume succeeds");
    assert_eq!(item.quantity, dec!(0));
    assert_eq!(item.total_value, dec!(0));
}

#[tokio::test]
async fn theft_waste_prices_at_average_and_records_fault() {
    let app = TestApp::new().await;
    let region = app.seed_region(dec!(40)).await;
    let location = app.seed_location(region.id, "Main").await;
    let item = app
        .seed_item(location.id, "Whiskey", dec!(10), dec!(200))
        .await;
    let culprit = app
        .seed_employee(
            region.id,
            location.id,
            "Jordan",
            "Miles",
            JobPosition::Bartender,
            dec!(20),
        )
        .await;

    let waste = app
        .services
        .inventory
        .waste(WasteInventoryRequest {
            item_id: item.id,
            quantity: dec!(2),
            reason: WasteReason::Theft,
            culprit_employee_id: Some(culprit.employee.id),
            reported_by_id: None,
            comments: None,
            waste_date: check_date(),
        })
        .await
        .expect("waste succeeds");

    assert_eq!(waste.money_wasted, dec!(40));

    let item = app.services.inventory.get_item(item.id).await.unwrap();
    assert_eq!(item.quantity, dec!(8));
    assert_eq!(item.total_value, dec!(160));

    let insight = app
        .services
        .insights
        .get_insight(location.id)
        .await
        .unwrap()
        .expect("theft records an insight");
    assert_eq!(insight.fault_count, 1);

    let performance = app
        .services
        .performance
        .get_for_employee(culprit.employee.id)
        .await
        .unwrap();
    assert_eq!(performance.total_inventory_waste_count, 1);
}

#[tokio::test]
async fn transfer_moves_stock_at_source_average_price() {
    let app = TestApp::new().await;
    let region = app.seed_region(dec!(40)).await;
    let source_location = app.seed_location(region.id, "Downtown").await;
    let dest_location = app.seed_location(region.id, "Uptown").await;
    let source = app
        .seed_item(source_location.id, "Flour", dec!(20), dec!(40))
        .await;
    let dest = app
        .seed_item(dest_location.id, "Flour", dec!(5), dec!(15))
        .await;

    app.services
        .inventory
        .transfer(TransferInventoryRequest {
            source_item_id: source.id,
            destination_location_id: dest_location.id,
            quantity: dec!(10),
            transfer_cost: None,
            transfer_date: check_date(),
        })
        .await
        .expect("transfer succeeds");

    let source = app.services.inventory.get_item(source.id).await.unwrap();
    assert_eq!(source.quantity, dec!(10));
    assert_eq!(source.total_value, dec!(20));

    // 10 units arrive valued at the source's 2.00 average, not the
    // destination's own 3.00 average.
    let dest = app.services.inventory.get_item(dest.id).await.unwrap();
    assert_eq!(dest.quantity, dec!(15));
    assert_eq!(dest.total_value, dec!(35));
}

#[tokio::test]
async fn transfer_requires_matching_item_at_destination() {
    let app = TestApp::new().await;
    let region = app.seed_region(dec!(40)).await;
    let source_location = app.seed_location(region.id, "Downtown").await;
    let dest_location = app.seed_location(region.id, "Uptown").await;
    let source = app
        .seed_item(source_location.id, "Flour", dec!(20), dec!(40))
        .await;

    let result = app
        .services
        .inventory
        .transfer(TransferInventoryRequest {
            source_item_id: source.id,
            destination_location_id: dest_location.id,
            quantity: dec!(5),
            transfer_cost: None,
            transfer_date: check_date(),
        })
        .await;
    assert_matches!(result, Err(ServiceError::ItemNotFoundAtDestination(_)));
}

#[tokio::test]
async fn transfer_to_the_source_location_is_rejected() {
    let app = TestApp::new().await;
    let region = app.seed_region(dec!(40)).await;
    let location = app.seed_location(region.id, "Downtown").await;
    let source = app
        .seed_item(location.id, "Flour", dec!(20), dec!(40))
        .await;

    // The destination lookup resolves to the source item itself.
    let result = app
        .services
        .inventory
        .transfer(TransferInventoryRequest {
            source_item_id: source.id,
            destination_location_id: location.id,
            quantity: dec!(5),
            transfer_cost: None,
            transfer_date: check_date(),
        })
        .await;
    assert_matches!(result, Err(ServiceError::ValidationError(_)));

    let source = app.services.inventory.get_item(source.id).await.unwrap();
    assert_eq!(source.quantity, dec!(20));
    assert_eq!(source.total_value, dec!(40));
}

#[tokio::test]
async fn check_variance_at_threshold_records_fault_without_adjusting_stock() {
    let app = TestApp::new().await;
    let region = app.seed_region(dec!(40)).await;
    let location = app.seed_location(region.id, "Main").await;
    let item = app
        .seed_item(location.id, "Butter", dec!(20), dec!(100))
        .await;
    let counter = app
        .seed_employee(
            region.id,
            location.id,
            "Priya",
            "Natarajan",
            JobPosition::KitchenAssistant,
            dec!(18),
        )
        .await;

    let check = app
        .services
        .inventory
        .check(item.id, dec!(20), dec!(21), counter.employee.id, check_date())
        .await
        .expect("check records");
    assert_eq!(check.variance_percent, dec!(5));

    let insight = app
        .services
        .insights
        .get_insight(location.id)
        .await
        .unwrap()
        .expect("variance at 5 percent records a fault");
    assert_eq!(insight.fault_count, 1);

    // A count never touches the book quantity.
    let item = app.services.inventory.get_item(item.id).await.unwrap();
    assert_eq!(item.quantity, dec!(20));
}

#[tokio::test]
async fn check_against_zero_expected_stores_zero_variance() {
    let app = TestApp::new().await;
    let region = app.seed_region(dec!(40)).await;
    let location = app.seed_location(region.id, "Main").await;
    let item = app.seed_item(location.id, "Yeast", dec!(0), dec!(0)).await;
    let counter = app
        .seed_employee(
            region.id,
            location.id,
            "Priya",
            "Natarajan",
            JobPosition::KitchenAssistant,
            dec!(18),
        )
        .await;

    let check = app
        .services
        .inventory
        .check(item.id, dec!(0), dec!(4), counter.employee.id, check_date())
        .await
        .expect("check records");
    assert_eq!(check.variance_percent, dec!(0));
    assert!(app
        .services
        .insights
        .get_insight(location.id)
        .await
        .unwrap()
        .is_none());
}
