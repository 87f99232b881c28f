use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-employee counter rollup. This table has no independent write path:
/// every column is mutated as a side effect of another use case (punches,
/// payments, waste write-offs, breaks, requests).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employee_performance")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub employee_id: Uuid,
    pub total_earnings: Decimal,
    pub total_tips_received: Decimal,
    pub total_hours_worked: Decimal,
    pub total_overtime_hours_worked: Decimal,
    pub late_to_work_count: i32,
    pub missed_work_days_count: i32,
    pub uncompleted_shift_count: i32,
    pub requests_created: i32,
    pub total_transactions_completed: i32,
    pub total_sales_handled_amount: Decimal,
    pub total_breaks_taken: i32,
    /// Whole hours spent on break, summed across all break records.
    pub total_break_time: i32,
    pub total_inventory_waste_count: i32,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
