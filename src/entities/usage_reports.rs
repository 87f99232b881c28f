use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-item usage snapshot following the same opening/closing/theoretical/
/// actual pattern as the location cost report, in both quantity and value
/// terms. Whole-week report dates also recompute the item's par level.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "usage_reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub item_id: Uuid,
    pub location_id: Uuid,
    pub period_id: Uuid,
    pub report_date: NaiveDate,
    pub opening_quantity: Decimal,
    pub opening_value: Decimal,
    pub closing_quantity: Option<Decimal>,
    pub closing_value: Option<Decimal>,
    pub purchases_quantity: Decimal,
    pub purchases_value: Decimal,
    pub waste_quantity: Decimal,
    pub waste_value: Decimal,
    pub theoretical_usage_quantity: Option<Decimal>,
    pub theoretical_usage_value: Option<Decimal>,
    pub actual_usage_quantity: Option<Decimal>,
    pub actual_usage_value: Option<Decimal>,
    pub current_usage_quantity: Decimal,
    pub current_usage_value: Decimal,
    pub usage_variance: Decimal,
    pub usage_variance_percent: Decimal,
    pub variance_undefined: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
