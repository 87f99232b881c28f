#![allow(dead_code)]

use brigade_engine::{
    db,
    entities::{
        accounting_periods, employees::JobPosition, internal_locations, inventory_items,
        inventory_items::{ItemType, UnitOfMeasure},
        locations, region_locations, vendors,
    },
    events::{self, EventSender},
    services::{employees::CreateEmployeeRequest, employees::OnboardedEmployee, Services},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

/// In-memory application with a fresh schema and a drained event channel.
pub struct TestApp {
    pub db: Arc<DatabaseConnection>,
    pub services: Services,
    pub event_sender: EventSender,
}

impl TestApp {
    pub async fn new() -> Self {
        let pool = db::establish_connection("sqlite::memory:")
            .await
            .expect("in-memory database connects");
        db::run_migrations(&pool).await.expect("migrations apply");
        let pool = Arc::new(pool);

        let (tx, rx) = mpsc::channel(256);
        tokio::spawn(events::process_events(rx));
        let event_sender = EventSender::new(tx);

        let services = Services::new(pool.clone(), event_sender.clone());
        Self {
            db: pool,
            services,
            event_sender,
        }
    }

    pub async fn seed_region(&self, overtime_threshold: Decimal) -> region_locations::Model {
        region_locations::ActiveModel {
            id: Set(Uuid::new_v4()),
            state_province: Set("California".into()),
            country: Set("USA".into()),
            overtime_threshold: Set(overtime_threshold),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        }
        .insert(self.db.as_ref())
        .await
        .expect("region inserts")
    }

    pub async fn seed_location(&self, region_id: Uuid, name: &str) -> locations::Model {
        locations::ActiveModel {
            id: Set(Uuid::new_v4()),
            region_id: Set(region_id),
            name: Set(name.into()),
            address: Set("1 Test Way".into()),
            contact_person: Set(None),
            phone_number: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        }
        .insert(self.db.as_ref())
        .await
        .expect("location inserts")
    }

    pub async fn seed_internal_location(
        &self,
        location_id: Uuid,
        name: &str,
    ) -> internal_locations::Model {
        internal_locations::ActiveModel {
            id: Set(Uuid::new_v4()),
            location_id: Set(location_id),
            name: Set(name.into()),
            created_at: Set(Utc::now().into()),
        }
        .insert(self.db.as_ref())
        .await
        .expect("internal location inserts")
    }

    pub async fn seed_vendor(&self, location_id: Uuid) -> vendors::Model {
        vendors::ActiveModel {
            id: Set(Uuid::new_v4()),
            location_id: Set(location_id),
            name: Set("Test Vendor".into()),
            contact_person: Set(None),
            email: Set(None),
            phone_number: Set(None),
            address: Set(None),
            preferred: Set(false),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        }
        .insert(self.db.as_ref())
        .await
        .expect("vendor inserts")
    }

    pub async fn seed_item(
        &self,
        location_id: Uuid,
        name: &str,
        quantity: Decimal,
        total_value: Decimal,
    ) -> inventory_items::Model {
        inventory_items::ActiveModel {
            id: Set(Uuid::new_v4()),
            location_id: Set(location_id),
            name: Set(name.into()),
            item_type: Set(ItemType::Ingredient),
            quantity: Set(quantity),
            unit: Set(UnitOfMeasure::Kg),
            par_level: Set(None),
            total_value: Set(total_value),
            barcode: Set(None),
            safety_stock: Set(dec!(1)),
            deliveries_per_week: Set(2),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        }
        .insert(self.db.as_ref())
        .await
        .expect("inventory item inserts")
    }

    pub async fn seed_period(
        &self,
        region_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> accounting_periods::Model {
        accounting_periods::ActiveModel {
            id: Set(Uuid::new_v4()),
            region_id: Set(region_id),
            start_date: Set(start_date),
            end_date: Set(end_date),
            created_at: Set(Utc::now().into()),
        }
        .insert(self.db.as_ref())
        .await
        .expect("accounting period inserts")
    }

    pub async fn seed_employee(
        &self,
        region_id: Uuid,
        location_id: Uuid,
        first_name: &str,
        last_name: &str,
        position: JobPosition,
        hourly_wage: Decimal,
    ) -> OnboardedEmployee {
        self.services
            .employees
            .create_employee(CreateEmployeeRequest {
                region_id,
                location_id,
                first_name: first_name.into(),
                last_name: last_name.into(),
                email: format!("{}@test.example", first_name.to_lowercase()),
                phone_number: "555-0142".into(),
                date_of_hire: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                job_position: position,
                hourly_wage,
            })
            .await
            .expect("employee onboards")
    }
}
