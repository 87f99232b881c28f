//! sea-orm models, one module per table. Status and kind columns are Rust
//! enums persisted as strings; money and quantities are `rust_decimal`.

// Locations and alerting
pub mod internal_locations;
pub mod locations;
pub mod region_locations;
pub mod training_insights;

// Staff
pub mod employee_performance;
pub mod employees;

// Scheduling and time clock
pub mod break_records;
pub mod daily_shifts;
pub mod shift_schedules;
pub mod weekly_shifts;

// Inventory ledger
pub mod inventory_checks;
pub mod inventory_items;
pub mod inventory_transfers;
pub mod inventory_waste;

// Procurement
pub mod purchase_alerts;
pub mod purchase_orders;
pub mod purchase_receipts;
pub mod vendors;

// Menu and recipes
pub mod add_ons;
pub mod menu_item_add_ons;
pub mod menu_items;
pub mod recipe_ingredients;
pub mod recipes;

// Point of sale
pub mod menu_order_add_ons;
pub mod menu_orders;
pub mod payments;

// Tips
pub mod tip_payouts;
pub mod tip_pools;
pub mod tip_records;

// Period accounting
pub mod accounting_periods;
pub mod cost_reports;
pub mod usage_reports;

// Menu analytics
pub mod menu_engineering_reports;
pub mod menu_waste_analyses;
pub mod menu_waste_records;
