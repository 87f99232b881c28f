use chrono::{NaiveDate, NaiveTime};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A break taken during a daily shift. Duration is stored in whole hours,
/// rounded half away from zero.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "break_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub employee_id: Uuid,
    pub daily_shift_id: Uuid,
    pub break_start: NaiveTime,
    pub break_end: NaiveTime,
    pub break_duration: i32,
    pub break_date: NaiveDate,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
