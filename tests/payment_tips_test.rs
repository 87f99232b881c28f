mod common;

use assert_matches::assert_matches;
use brigade_engine::{
    entities::{
        employees::JobPosition,
        menu_items::Course,
        menu_orders::{Entity as MenuOrders, MenuOrderStatus},
        payments::{PaymentCategory, PaymentMethod},
        shift_schedules::ShiftType,
        tip_pools::TipPoolMode,
    },
    errors::ServiceError,
    services::{
        menu::{CreateMenuItemRequest, CreateRecipeRequest},
        orders::CreateMenuOrderRequest,
        payments::CapturePaymentRequest,
        scheduling::CreateShiftRequest,
        timeclock::PunchKind,
    },
};
use chrono::{NaiveTime, Utc};
use common::TestApp;
use rust_decimal_macros::dec;
use sea_orm::EntityTrait;
use uuid::Uuid;

fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

struct DinnerService {
    app: TestApp,
    location_id: Uuid,
    table_id: Uuid,
    waiter_id: Uuid,
    menu_item_id: Uuid,
}

/// Stocks a kitchen, builds a one-dish menu, seats a waiter on an open
/// shift today, and completes one order of two portions (subtotal 100.00).
async fn dinner_service() -> DinnerService {
    let app = TestApp::new().await;
    let region = app.seed_region(dec!(40)).await;
    let location = app.seed_location(region.id, "Main").await;
    let table = app.seed_internal_location(location.id, "Table 4").await;
    let waiter = app
        .seed_employee(
            region.id,
            location.id,
            "Amelia",
            "Rodriguez",
            JobPosition::Waiter,
            dec!(21),
        )
        .await;
    let flour = app
        .seed_item(location.id, "Flour", dec!(100), dec!(200))
        .await;

    let recipe = app
        .services
        .menu
        .create_recipe(CreateRecipeRequest {
            region_id: region.id,
            name: "Flatbread".into(),
            description: None,
            preparation_time: 5,
            cooking_time: 10,
            dishing_up_time: 2,
            cooking_temperature: None,
            quality_standards: None,
            serving_size: None,
            ingredients: vec![(flour.id, dec!(0.5))],
        })
        .await
        .expect("recipe creates");
    let dish = app
        .services
        .menu
        .create_menu_item(CreateMenuItemRequest {
            location_id: location.id,
            recipe_id: recipe.id,
            name: "Flatbread".into(),
            price: dec!(50),
            course: Course::Entree,
            available: true,
            add_on_ids: vec![],
        })
        .await
        .expect("menu item creates");

    let today = Utc::now().date_naive();
    app.services
        .scheduling
        .create_shift(CreateShiftRequest {
            location_id: location.id,
            employee_id: Some(waiter.employee.id),
            shift_type: ShiftType::Full,
            start_time: at(0, 0),
            end_time: at(23, 59),
            shift_date: today,
            is_open: false,
        })
        .await
        .expect("shift schedules");
    app.services
        .timeclock
        .punch(waiter.employee.id, today, at(0, 5), PunchKind::In)
        .await
        .expect("punch in succeeds");

    let order = app
        .services
        .orders
        .create_menu_order(CreateMenuOrderRequest {
            menu_item_id: dish.id,
            internal_location_id: table.id,
            quantity: 2,
            add_on_ids: vec![],
        })
        .await
        .expect("order creates");
    app.services
        .orders
        .advance_order_status(order.id, MenuOrderStatus::InProgress)
        .await
        .expect("kitchen picks up");
    app.services
        .orders
        .advance_order_status(order.id, MenuOrderStatus::Completed)
        .await
        .expect("kitchen completes");

    DinnerService {
        app,
        location_id: location.id,
        table_id: table.id,
        waiter_id: waiter.employee.id,
        menu_item_id: dish.id,
    }
}

#[tokio::test]
async fn capture_composes_the_bill_and_attributes_the_tip() {
    let service = dinner_service().await;
    let app = &service.app;

    let payment = app
        .services
        .payments
        .capture_payment(CapturePaymentRequest {
            internal_location_id: service.table_id,
            employee_id: service.waiter_id,
            tip_percent: dec!(15),
            service_charge_percent: dec!(5),
            category: PaymentCategory::DineIn,
            payment_type: PaymentMethod::Card,
        })
        .await
        .expect("capture succeeds");

    assert_eq!(payment.subtotal, dec!(100));
    // 100.00 * 1.15 * 1.05
    assert_eq!(payment.total_bill, dec!(120.75));

    let lines = payment.line_item_snapshots().expect("snapshot decodes");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].menu_item_id, service.menu_item_id);
    assert_eq!(lines[0].quantity, 2);

    // Tip amount 15.00 less service charge 5.00.
    let performance = app
        .services
        .performance
        .get_for_employee(service.waiter_id)
        .await
        .unwrap();
    assert_eq!(performance.total_tips_received, dec!(10));
    assert_eq!(performance.total_transactions_completed, 1);
    assert_eq!(performance.total_sales_handled_amount, dec!(120.75));

    // Captured lines are gone from the live order queue.
    let remaining = MenuOrders::find().all(app.db.as_ref()).await.unwrap();
    assert!(remaining.is_empty());
}

#[tokio::test]
async fn second_capture_without_new_orders_fails() {
    let service = dinner_service().await;
    let app = &service.app;

    let request = CapturePaymentRequest {
        internal_location_id: service.table_id,
        employee_id: service.waiter_id,
        tip_percent: dec!(15),
        service_charge_percent: dec!(5),
        category: PaymentCategory::DineIn,
        payment_type: PaymentMethod::Card,
    };
    app.services
        .payments
        .capture_payment(request.clone())
        .await
        .expect("first capture succeeds");

    let result = app.services.payments.capture_payment(request).await;
    assert_matches!(result, Err(ServiceError::NoCompletedOrders(_)));
}

#[tokio::test]
async fn capture_requires_an_open_shift() {
    let service = dinner_service().await;
    let app = &service.app;
    let today = Utc::now().date_naive();

    // Close the waiter's shift, leaving no open shift to attribute tips to.
    app.services
        .timeclock
        .punch(service.waiter_id, today, at(12, 0), PunchKind::Out)
        .await
        .expect("punch out succeeds");

    let result = app
        .services
        .payments
        .capture_payment(CapturePaymentRequest {
            internal_location_id: service.table_id,
            employee_id: service.waiter_id,
            tip_percent: dec!(15),
            service_charge_percent: dec!(5),
            category: PaymentCategory::DineIn,
            payment_type: PaymentMethod::Card,
        })
        .await;
    assert_matches!(result, Err(ServiceError::NoOpenShift(_)));
}

#[tokio::test]
async fn tip_pool_divides_by_hours_and_sends_payouts() {
    let service = dinner_service().await;
    let app = &service.app;
    let today = Utc::now().date_naive();

    app.services
        .payments
        .capture_payment(CapturePaymentRequest {
            internal_location_id: service.table_id,
            employee_id: service.waiter_id,
            tip_percent: dec!(15),
            service_charge_percent: dec!(5),
            category: PaymentCategory::DineIn,
            payment_type: PaymentMethod::Card,
        })
        .await
        .expect("capture succeeds");

    // Ten hours on the clock, a ten-dollar pool: a dollar an hour.
    app.services
        .timeclock
        .punch(service.waiter_id, today, at(10, 5), PunchKind::Out)
        .await
        .expect("punch out succeeds");

    let (pool, payouts) = app
        .services
        .tips
        .pool_tips(service.location_id, today, TipPoolMode::Send)
        .await
        .expect("pooling succeeds");

    assert_eq!(pool.total_pool, dec!(10));
    assert_eq!(pool.total_hours_worked, dec!(10));
    assert_eq!(pool.tip_per_hour, dec!(1));
    assert_eq!(payouts.len(), 1);
    assert_eq!(payouts[0].employee_id, service.waiter_id);
    assert_eq!(payouts[0].payout_amount, dec!(10));

    let paid: rust_decimal::Decimal = payouts.iter().map(|p| p.payout_amount).sum();
    assert_eq!(paid, pool.tip_per_hour * pool.total_hours_worked);
}

#[tokio::test]
async fn tip_pool_with_no_hours_stores_zero_rate() {
    let service = dinner_service().await;
    let app = &service.app;
    let today = Utc::now().date_naive();

    app.services
        .payments
        .capture_payment(CapturePaymentRequest {
            internal_location_id: service.table_id,
            employee_id: service.waiter_id,
            tip_percent: dec!(15),
            service_charge_percent: dec!(5),
            category: PaymentCategory::DineIn,
            payment_type: PaymentMethod::Card,
        })
        .await
        .expect("capture succeeds");

    // Shift never punched out: no closed hours to divide over.
    let (pool, payouts) = app
        .services
        .tips
        .pool_tips(service.location_id, today, TipPoolMode::Calculate)
        .await
        .expect("pooling succeeds");
    assert_eq!(pool.total_pool, dec!(10));
    assert_eq!(pool.tip_per_hour, dec!(0));
    assert!(payouts.is_empty());
}
