use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::shift_schedules::ShiftType;

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
pub enum DailyShiftStatus {
    #[sea_orm(string_value = "upcoming")]
    Upcoming,
    #[sea_orm(string_value = "late")]
    Late,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "uncompleted")]
    Uncompleted,
    #[sea_orm(string_value = "missed")]
    Missed,
    #[sea_orm(string_value = "swapped")]
    Swapped,
}

/// Actual punch record for one scheduled shift occurrence.
///
/// Status graph: Upcoming -> Late | InProgress (punch-in), then
/// Late | InProgress -> Completed | Uncompleted (punch-out). Upcoming may
/// also be closed out as Missed, or flipped to Swapped when the schedule is
/// taken over; Swapped records are excluded from payroll.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "daily_shifts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub employee_id: Uuid,
    pub schedule_id: Uuid,
    pub shift_type: ShiftType,
    pub shift_date: NaiveDate,
    pub punch_in_time: Option<NaiveTime>,
    pub punch_out_time: Option<NaiveTime>,
    pub hours_worked: Option<Decimal>,
    pub earnings: Option<Decimal>,
    pub status: DailyShiftStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Punched in and not yet punched out. Tip records attach to this state.
    pub fn is_open(&self) -> bool {
        self.punch_in_time.is_some() && self.punch_out_time.is_none()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
