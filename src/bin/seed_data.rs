//! Seeds a demo restaurant group: one region with a location, a small
//! brigade, stocked inventory, a menu, and one dinner service worth of
//! activity. Intended for a fresh database.
use anyhow::Result;
use brigade_engine::{
    config, db,
    entities::{
        accounting_periods, employees::JobPosition, internal_locations, inventory_items,
        inventory_items::{ItemType, UnitOfMeasure},
        locations, menu_items::Course, menu_orders::MenuOrderStatus,
        payments::{PaymentCategory, PaymentMethod},
        region_locations, shift_schedules::ShiftType, tip_pools::TipPoolMode, vendors,
    },
    events::{self, EventSender},
    services::{
        employees::CreateEmployeeRequest,
        menu::{CreateAddOnRequest, CreateMenuItemRequest, CreateRecipeRequest},
        orders::CreateMenuOrderRequest,
        payments::CapturePaymentRequest,
        procurement::CreatePurchaseOrderRequest,
        scheduling::CreateShiftRequest,
        timeclock::PunchKind,
    },
    AppState,
};
use chrono::{Duration, NaiveTime, Utc};
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, Set};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = config::load_config()?;
    config::init_tracing(cfg.log_level(), cfg.log_json);

    let pool = Arc::new(db::establish_connection_from_app_config(&cfg).await?);
    db::run_migrations(&pool).await?;

    let (tx, rx) = mpsc::channel(cfg.event_channel_capacity);
    tokio::spawn(events::process_events(rx));
    let state = AppState::new(pool.clone(), cfg, EventSender::new(tx));

    seed(&state).await?;
    info!("Seed data loaded");
    Ok(())
}

async fn seed(state: &AppState) -> Result<()> {
    let db = state.db.as_ref();
    let services = &state.services;
    let today = Utc::now().date_naive();

    let region = region_locations::ActiveModel {
        id: Set(Uuid::new_v4()),
        state_province: Set("California".into()),
        country: Set("USA".into()),
        overtime_threshold: Set(dec!(40)),
        created_at: Set(Utc::now().into()),
        updated_at: Set(None),
    }
    .insert(db)
    .await?;

    let location = locations::ActiveModel {
        id: Set(Uuid::new_v4()),
        region_id: Set(region.id),
        name: Set("Brigade Mission District".into()),
        address: Set("2534 Valencia St, San Francisco, CA".into()),
        contact_person: Set(Some("Renee Alvarez".into())),
        phone_number: Set(Some("415-555-0114".into())),
        created_at: Set(Utc::now().into()),
        updated_at: Set(None),
    }
    .insert(db)
    .await?;

    let mut tables = Vec::new();
    for name in ["Table 1", "Table 2", "Bar Seat 1"] {
        let table = internal_locations::ActiveModel {
            id: Set(Uuid::new_v4()),
            location_id: Set(location.id),
            name: Set(name.into()),
            created_at: Set(Utc::now().into()),
        }
        .insert(db)
        .await?;
        tables.push(table);
    }

    accounting_periods::ActiveModel {
        id: Set(Uuid::new_v4()),
        region_id: Set(region.id),
        start_date: Set(today - Duration::days(10)),
        end_date: Set(today + Duration::days(18)),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await?;

    let vendor = vendors::ActiveModel {
        id: Set(Uuid::new_v4()),
        location_id: Set(location.id),
        name: Set("Bay Produce Co".into()),
        contact_person: Set(Some("Marco Funes".into())),
        email: Set(Some("orders@bayproduce.example".into())),
        phone_number: Set(Some("415-555-0190".into())),
        address: Set(Some("310 Pier Ave, Oakland, CA".into())),
        preferred: Set(true),
        created_at: Set(Utc::now().into()),
        updated_at: Set(None),
    }
    .insert(db)
    .await?;

    let waiter = services
        .employees
        .create_employee(CreateEmployeeRequest {
            region_id: region.id,
            location_id: location.id,
            first_name: "Amelia".into(),
            last_name: "Rodriguez".into(),
            email: "amelia@brigadehq.example".into(),
            phone_number: "415-555-0187".into(),
            date_of_hire: today - Duration::days(200),
            job_position: JobPosition::Waiter,
            hourly_wage: dec!(21.50),
        })
        .await?;
    info!(
        username = %waiter.employee.account_username,
        password = %waiter.initial_password,
        "Waiter onboarded"
    );
    let chef = services
        .employees
        .create_employee(CreateEmployeeRequest {
            region_id: region.id,
            location_id: location.id,
            first_name: "Bo".into(),
            last_name: "Chen".into(),
            email: "bo@brigadehq.example".into(),
            phone_number: "415-555-0123".into(),
            date_of_hire: today - Duration::days(420),
            job_position: JobPosition::Chef,
            hourly_wage: dec!(34),
        })
        .await?;

    let mut items = Vec::new();
    for (name, unit, safety, deliveries) in [
        ("Flour", UnitOfMeasure::Kg, dec!(5), 2),
        ("Tomato Sauce", UnitOfMeasure::L, dec!(3), 2),
        ("Mozzarella", UnitOfMeasure::Kg, dec!(2), 3),
        ("Basil", UnitOfMeasure::G, dec!(100), 3),
    ] {
        let item = inventory_items::ActiveModel {
            id: Set(Uuid::new_v4()),
            location_id: Set(location.id),
            name: Set(name.into()),
            item_type: Set(ItemType::Ingredient),
            quantity: Set(dec!(0)),
            unit: Set(unit),
            par_level: Set(None),
            total_value: Set(dec!(0)),
            barcode: Set(None),
            safety_stock: Set(safety),
            deliveries_per_week: Set(deliveries),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        }
        .insert(db)
        .await?;
        items.push(item);
    }

    // Stock up through procurement so receipts flow through the ledger.
    for (item, quantity, unit_price) in [
        (&items[0], dec!(25), dec!(1.80)),
        (&items[1], dec!(12), dec!(3.40)),
        (&items[2], dec!(8), dec!(9.20)),
        (&items[3], dec!(500), dec!(0.02)),
    ] {
        let order = services
            .procurement
            .create_purchase_order(CreatePurchaseOrderRequest {
                location_id: location.id,
                vendor_id: vendor.id,
                item_id: item.id,
                unit_price,
                ordered_quantity: quantity,
                order_date: today - Duration::days(2),
                expected_arrival_date: today - Duration::days(1),
            })
            .await?;
        services
            .procurement
            .receive_purchase_order(order.id, quantity, today - Duration::days(1))
            .await?;
    }

    let recipe = services
        .menu
        .create_recipe(CreateRecipeRequest {
            region_id: region.id,
            name: "Margherita Pizza".into(),
            description: Some("Wood-fired, single portion".into()),
            preparation_time: 10,
            cooking_time: 8,
            dishing_up_time: 2,
            cooking_temperature: Some("430C stone".into()),
            quality_standards: Some("Leopard-spotted crust, no soggy center".into()),
            serving_size: Some("1 pie".into()),
            ingredients: vec![
                (items[0].id, dec!(0.25)),
                (items[1].id, dec!(0.12)),
                (items[2].id, dec!(0.15)),
                (items[3].id, dec!(6)),
            ],
        })
        .await?;

    let extra_cheese = services
        .menu
        .create_add_on(CreateAddOnRequest {
            location_id: location.id,
            item_id: items[2].id,
            name: "Mozzarella".into(),
            additional_quantity: dec!(0.08),
            additional_price: dec!(2.50),
            available: true,
        })
        .await?;

    let pizza = services
        .menu
        .create_menu_item(CreateMenuItemRequest {
            location_id: location.id,
            recipe_id: recipe.id,
            name: "Margherita".into(),
            price: dec!(16),
            course: Course::Entree,
            available: true,
            add_on_ids: vec![extra_cheese.id],
        })
        .await?;

    // One dinner service: the waiter clocks in, a table orders, the kitchen
    // cooks, the bill is captured, tips are pooled.
    services
        .scheduling
        .create_shift(CreateShiftRequest {
            location_id: location.id,
            employee_id: Some(waiter.employee.id),
            shift_type: ShiftType::Dinner,
            start_time: NaiveTime::from_hms_opt(16, 0, 0).expect("valid time"),
            end_time: NaiveTime::from_hms_opt(23, 0, 0).expect("valid time"),
            shift_date: today,
            is_open: false,
        })
        .await?;
    services
        .timeclock
        .punch(
            waiter.employee.id,
            today,
            NaiveTime::from_hms_opt(15, 58, 0).expect("valid time"),
            PunchKind::In,
        )
        .await?;

    let order = services
        .orders
        .create_menu_order(CreateMenuOrderRequest {
            menu_item_id: pizza.id,
            internal_location_id: tables[0].id,
            quantity: 2,
            add_on_ids: vec![extra_cheese.id],
        })
        .await?;
    services
        .orders
        .advance_order_status(order.id, MenuOrderStatus::InProgress)
        .await?;
    services
        .orders
        .advance_order_status(order.id, MenuOrderStatus::Completed)
        .await?;

    services
        .payments
        .capture_payment(CapturePaymentRequest {
            internal_location_id: tables[0].id,
            employee_id: waiter.employee.id,
            tip_percent: dec!(18),
            service_charge_percent: dec!(5),
            category: PaymentCategory::DineIn,
            payment_type: PaymentMethod::Card,
        })
        .await?;

    services
        .timeclock
        .punch(
            waiter.employee.id,
            today,
            NaiveTime::from_hms_opt(23, 5, 0).expect("valid time"),
            PunchKind::Out,
        )
        .await?;
    services
        .tips
        .pool_tips(location.id, today, TipPoolMode::Send)
        .await?;

    services.reports.generate_cost_report(location.id, today).await?;
    services
        .reports
        .generate_usage_report(items[0].id, today)
        .await?;
    services
        .menu
        .generate_menu_engineering(location.id, today)
        .await?;

    info!(
        location_id = %location.id,
        chef_id = %chef.employee.id,
        "Demo restaurant seeded"
    );
    Ok(())
}
