use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::payments::PaymentCategory;

/// Tip attributed to the serving employee at payment capture, tied to the
/// daily shift that was open at that moment.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tip_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub employee_id: Uuid,
    pub location_id: Uuid,
    pub internal_location_id: Uuid,
    pub daily_shift_id: Uuid,
    pub payment_id: Uuid,
    pub tip_amount: Decimal,
    pub category: PaymentCategory,
    pub tip_date: NaiveDate,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
