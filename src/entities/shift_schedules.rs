use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::employees::JobPosition;

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[strum(serialize_all = "snake_case")]
pub enum ShiftType {
    #[sea_orm(string_value = "breakfast")]
    Breakfast,
    #[sea_orm(string_value = "lunch")]
    Lunch,
    #[sea_orm(string_value = "dinner")]
    Dinner,
    #[sea_orm(string_value = "half")]
    Half,
    #[sea_orm(string_value = "full")]
    Full,
}

/// A planned shift. `employee_id` is None while the shift is open
/// (unassigned); `swapped_employee_id` is set when another employee takes
/// the shift over.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shift_schedules")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub location_id: Uuid,
    pub employee_id: Option<Uuid>,
    pub job_position: Option<JobPosition>,
    pub shift_type: ShiftType,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub total_hours: Decimal,
    pub shift_date: NaiveDate,
    pub swapped_employee_id: Option<Uuid>,
    pub is_open: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
