use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Rolling Monday-to-Sunday accumulation of one employee's hours and
/// earnings, mutated incrementally by every punch-out. Regular hours are
/// capped at the region overtime threshold; the excess accrues separately.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "weekly_shifts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub employee_id: Uuid,
    pub week_start_date: NaiveDate,
    pub week_end_date: NaiveDate,
    pub regular_hours_worked: Decimal,
    pub overtime_hours_worked: Decimal,
    pub earnings_this_week: Decimal,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
