pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_location_tables;
mod m20250301_000002_create_staff_tables;
mod m20250301_000003_create_shift_tables;
mod m20250315_000004_create_inventory_tables;
mod m20250315_000005_create_procurement_tables;
mod m20250402_000006_create_menu_tables;
mod m20250402_000007_create_ordering_tables;
mod m20250510_000008_create_reporting_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_location_tables::Migration),
            Box::new(m20250301_000002_create_staff_tables::Migration),
            Box::new(m20250301_000003_create_shift_tables::Migration),
            Box::new(m20250315_000004_create_inventory_tables::Migration),
            Box::new(m20250315_000005_create_procurement_tables::Migration),
            Box::new(m20250402_000006_create_menu_tables::Migration),
            Box::new(m20250402_000007_create_ordering_tables::Migration),
            Box::new(m20250510_000008_create_reporting_tables::Migration),
        ]
    }
}
