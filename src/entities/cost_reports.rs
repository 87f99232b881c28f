use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Location-wide COGS snapshot for one date inside an accounting period.
///
/// `theoretical_cogs` / `actual_cogs` and the closing value are populated
/// only by the end-of-period row; mid-period rows carry the live
/// `current_cogs` instead. `variance_undefined` marks rows whose variance
/// percent had a zero denominator and was stored as 0.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cost_reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub location_id: Uuid,
    pub period_id: Uuid,
    pub report_date: NaiveDate,
    pub opening_inventory_value: Decimal,
    pub closing_inventory_value: Option<Decimal>,
    pub purchases_value: Decimal,
    pub wastage_value: Decimal,
    pub total_revenue: Decimal,
    pub theoretical_cogs: Option<Decimal>,
    pub actual_cogs: Option<Decimal>,
    pub current_cogs: Decimal,
    pub cogs_variance: Decimal,
    pub cogs_variance_percent: Decimal,
    pub theoretical_gross_profit: Decimal,
    pub actual_gross_profit: Decimal,
    pub transfer_count: i32,
    pub variance_undefined: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
