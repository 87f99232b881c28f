use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Spot count of one item: expected (book) quantity against the counted
/// quantity. The check never adjusts stock on hand; it only records the
/// signed variance and may raise a training fault.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_checks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub item_id: Uuid,
    pub employee_id: Uuid,
    pub expected_quantity: Decimal,
    pub actual_quantity: Decimal,
    pub variance_percent: Decimal,
    pub check_date: NaiveDate,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
