mod common;

use assert_matches::assert_matches;
use brigade_engine::{
    entities::{
        employees::JobPosition,
        menu_engineering_reports::MenuEngineeringMatrix,
        menu_items::Course,
        menu_orders::MenuOrderStatus,
        menu_waste_records::MenuWasteReason,
        payments::{PaymentCategory, PaymentMethod},
        shift_schedules::ShiftType,
    },
    errors::ServiceError,
    services::{
        menu::{CreateAddOnRequest, CreateMenuItemRequest, CreateRecipeRequest},
        orders::CreateMenuOrderRequest,
        payments::CapturePaymentRequest,
        scheduling::CreateShiftRequest,
        timeclock::PunchKind,
    },
};
use chrono::{NaiveDate, NaiveTime, Utc};
use common::TestApp;
use rust_decimal_macros::dec;
use uuid::Uuid;

fn recipe_request(region_id: Uuid, name: &str, ingredients: Vec<(Uuid, rust_decimal::Decimal)>) -> CreateRecipeRequest {
    CreateRecipeRequest {
        region_id,
        name: name.into(),
        description: None,
        preparation_time: 5,
        cooking_time: 12,
        dishing_up_time: 3,
        cooking_temperature: None,
        quality_standards: None,
        serving_size: None,
        ingredients,
    }
}

#[tokio::test]
async fn recipe_totals_its_stage_times_and_requires_ingredients() {
    let app = TestApp::new().await;
    let region = app.seed_region(dec!(40)).await;
    let location = app.seed_location(region.id, "Main").await;
    let flour = app.seed_item(location.id, "Flour", dec!(10), dec!(20)).await;

    let recipe = app
        .services
        .menu
        .create_recipe(recipe_request(region.id, "Flatbread", vec![(flour.id, dec!(0.5))]))
        .await
        .expect("recipe creates");
    assert_eq!(recipe.total_recipe_time, 20);

    let result = app
        .services
        .menu
        .create_recipe(recipe_request(region.id, "Empty Plate", vec![]))
        .await;
    assert_matches!(result, Err(ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn menu_item_gross_profit_prices_ingredients_at_average_cost() {
    let app = TestApp::new().await;
    let region = app.seed_region(dec!(40)).await;
    let location = app.seed_location(region.id, "Main").await;
    // 2.00 average unit cost.
    let flour = app.seed_item(location.id, "Flour", dec!(10), dec!(20)).await;

    let recipe = app
        .services
        .menu
        .create_recipe(recipe_request(region.id, "Flatbread", vec![(flour.id, dec!(0.5))]))
        .await
        .expect("recipe creates");

    let dish = app
        .services
        .menu
        .create_menu_item(CreateMenuItemRequest {
            location_id: location.id,
            recipe_id: recipe.id,
            name: "Flatbread".into(),
            price: dec!(10),
            course: Course::Appetizer,
            available: true,
            add_on_ids: vec![],
        })
        .await
        .expect("menu item creates");

    // 10.00 price less 0.5 units of flour at 2.00.
    assert_eq!(dish.gross_profit, dec!(9));
}

#[tokio::test]
async fn add_ons_get_the_extra_prefix_and_a_derived_cost() {
    let app = TestApp::new().await;
    let region = app.seed_region(dec!(40)).await;
    let location = app.seed_location(region.id, "Main").await;
    let cheese = app
        .seed_item(location.id, "Mozzarella", dec!(4), dec!(40))
        .await;

    let add_on = app
        .services
        .menu
        .create_add_on(CreateAddOnRequest {
            location_id: location.id,
            item_id: cheese.id,
            name: "Mozzarella".into(),
            additional_quantity: dec!(0.1),
            additional_price: dec!(2.50),
            available: true,
        })
        .await
        .expect("add-on creates");

    assert_eq!(add_on.name, "Extra Mozzarella");
    // 0.1 units at the 10.00 average.
    assert_eq!(add_on.additional_cost, dec!(1));
}

#[tokio::test]
async fn menu_engineering_separates_stars_from_dogs() {
    let app = TestApp::new().await;
    let region = app.seed_region(dec!(40)).await;
    let location = app.seed_location(region.id, "Main").await;
    let table = app.seed_internal_location(location.id, "Table 1").await;
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
        .create_recipe(recipe_request(region.id, "Flatbread", vec![(flour.id, dec!(0.5))]))
        .await
        .expect("recipe creates");
    let seller = app
        .services
        .menu
        .create_menu_item(CreateMenuItemRequest {
            location_id: location.id,
            recipe_id: recipe.id,
            name: "Flatbread".into(),
            price: dec!(12),
            course: Course::Entree,
            available: true,
            add_on_ids: vec![],
        })
        .await
        .expect("menu item creates");
    let shelf_warmer = app
        .services
        .menu
        .create_menu_item(CreateMenuItemRequest {
            location_id: location.id,
            recipe_id: recipe.id,
            name: "Plain Flatbread".into(),
            price: dec!(8),
            course: Course::Entree,
            available: true,
            add_on_ids: vec![],
        })
        .await
        .expect("menu item creates");

    // Sell three of the good one through the till.
    let today = Utc::now().date_naive();
    app.services
        .scheduling
        .create_shift(CreateShiftRequest {
            location_id: location.id,
            employee_id: Some(waiter.employee.id),
            shift_type: ShiftType::Full,
            start_time: NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(23, 59, 0).unwrap(),
            shift_date: today,
            is_open: false,
        })
        .await
        .expect("shift schedules");
    app.services
        .timeclock
        .punch(
            waiter.employee.id,
            today,
            NaiveTime::from_hms_opt(0, 5, 0).unwrap(),
            PunchKind::In,
        )
        .await
        .expect("punch in succeeds");

    let order = app
        .services
        .orders
        .create_menu_order(CreateMenuOrderRequest {
            menu_item_id: seller.id,
            internal_location_id: table.id,
            quantity: 3,
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
    app.services
        .payments
        .capture_payment(CapturePaymentRequest {
            internal_location_id: table.id,
            employee_id: waiter.employee.id,
            tip_percent: dec!(0),
            service_charge_percent: dec!(0),
            category: PaymentCategory::DineIn,
            payment_type: PaymentMethod::Cash,
        })
        .await
        .expect("capture succeeds");

    let reports = app
        .services
        .menu
        .generate_menu_engineering(location.id, today)
        .await
        .expect("classification runs");
    assert_eq!(reports.len(), 2);

    let seller_report = reports
        .iter()
        .find(|r| r.menu_item_id == seller.id)
        .expect("seller classified");
    assert_eq!(seller_report.number_sold, 3);
    assert_eq!(seller_report.total_revenue, dec!(36));
    assert_eq!(seller_report.matrix, MenuEngineeringMatrix::Star);

    let warmer_report = reports
        .iter()
        .find(|r| r.menu_item_id == shelf_warmer.id)
        .expect("shelf warmer classified");
    assert_eq!(warmer_report.number_sold, 0);
    assert_eq!(warmer_report.matrix, MenuEngineeringMatrix::Dog);
}

#[tokio::test]
async fn concurrent_pickups_draw_down_each_ingredient_exactly_once() {
    let app = TestApp::new().await;
    let region = app.seed_region(dec!(40)).await;
    let location = app.seed_location(region.id, "Main").await;
    let table = app.seed_internal_location(location.id, "Table 1").await;
    let flour = app
        .seed_item(location.id, "Flour", dec!(100), dec!(200))
        .await;

    let recipe = app
        .services
        .menu
        .create_recipe(recipe_request(region.id, "Flatbread", vec![(flour.id, dec!(0.5))]))
        .await
        .expect("recipe creates");
    let dish = app
        .services
        .menu
        .create_menu_item(CreateMenuItemRequest {
            location_id: location.id,
            recipe_id: recipe.id,
            name: "Flatbread".into(),
            price: dec!(12),
            course: Course::Entree,
            available: true,
            add_on_ids: vec![],
        })
        .await
        .expect("menu item creates");

    let mut order_ids = Vec::new();
    for _ in 0..2 {
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
        order_ids.push(order.id);
    }

    // Two kitchens pick their orders up at the same time.
    let mut handles = Vec::new();
    for order_id in order_ids {
        let orders = app.services.orders.clone();
        handles.push(tokio::spawn(async move {
            orders
                .advance_order_status(order_id, MenuOrderStatus::InProgress)
                .await
        }));
    }
    for handle in handles {
        handle.await.expect("task joins").expect("pickup succeeds");
    }

    // 100 less two pickups of 2 portions at 0.5 each.
    let flour = app.services.inventory.get_item(flour.id).await.unwrap();
    assert_eq!(flour.quantity, dec!(98));
    assert_eq!(flour.total_value, dec!(196));
}

#[tokio::test]
async fn menu_waste_analysis_totals_weight_and_picks_the_top_reason() {
    let app = TestApp::new().await;
    let region = app.seed_region(dec!(40)).await;
    let location = app.seed_location(region.id, "Main").await;
    let flour = app.seed_item(location.id, "Flour", dec!(10), dec!(20)).await;
    let recipe = app
        .services
        .menu
        .create_recipe(recipe_request(region.id, "Flatbread", vec![(flour.id, dec!(0.5))]))
        .await
        .expect("recipe creates");
    let dish = app
        .services
        .menu
        .create_menu_item(CreateMenuItemRequest {
            location_id: location.id,
            recipe_id: recipe.id,
            name: "Flatbread".into(),
            price: dec!(10),
            course: Course::Entree,
            available: true,
            add_on_ids: vec![],
        })
        .await
        .expect("menu item creates");

    let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
    for (weight, reason) in [
        (dec!(0.4), MenuWasteReason::Spoilage),
        (dec!(0.3), MenuWasteReason::Spoilage),
        (dec!(1.0), MenuWasteReason::Overproduction),
    ] {
        app.services
            .waste
            .record_menu_waste(dish.id, weight, reason, date)
            .await
            .expect("waste records");
    }

    let analysis = app
        .services
        .waste
        .analyze_menu_waste(dish.id, date)
        .await
        .expect("analysis runs");
    assert_eq!(analysis.total_weight_wasted, dec!(1.7));
    assert_eq!(analysis.most_common_reason, MenuWasteReason::Spoilage);
}

#[tokio::test]
async fn analyzing_without_records_is_rejected() {
    let app = TestApp::new().await;
    let region = app.seed_region(dec!(40)).await;
    let location = app.seed_location(region.id, "Main").await;
    let flour = app.seed_item(location.id, "Flour", dec!(10), dec!(20)).await;
    let recipe = app
        .services
        .menu
        .create_recipe(recipe_request(region.id, "Flatbread", vec![(flour.id, dec!(0.5))]))
        .await
        .expect("recipe creates");
    let dish = app
        .services
        .menu
        .create_menu_item(CreateMenuItemRequest {
            location_id: location.id,
            recipe_id: recipe.id,
            name: "Flatbread".into(),
            price: dec!(10),
            course: Course::Entree,
            available: true,
            add_on_ids: vec![],
        })
        .await
        .expect("menu item creates");

    let result = app
        .services
        .waste
        .analyze_menu_waste(dish.id, NaiveDate::from_ymd_opt(2025, 6, 2).unwrap())
        .await;
    assert_matches!(result, Err(ServiceError::ValidationError(_)));
}
