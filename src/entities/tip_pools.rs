use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

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
pub enum TipPoolMode {
    /// Compute the pool and hourly rate without paying anything out.
    #[sea_orm(string_value = "calculate")]
    Calculate,
    /// Compute and additionally emit one payout per participant.
    #[sea_orm(string_value = "send")]
    Send,
}

/// One day's tips at a location pooled and divided by the participants'
/// hours worked. `participants` is a JSON list of employee ids.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tip_pools")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub location_id: Uuid,
    pub pool_date: NaiveDate,
    pub mode: TipPoolMode,
    pub total_pool: Decimal,
    pub participants: Json,
    pub total_hours_worked: Decimal,
    pub tip_per_hour: Decimal,
    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn participant_ids(&self) -> Result<Vec<Uuid>, serde_json::Error> {
        serde_json::from_value(self.participants.clone())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
