use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Movement of stock between two sites. `item_id` is the source item; value
/// moves with the quantity at the source's average unit price.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_transfers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub item_id: Uuid,
    pub source_location_id: Uuid,
    pub destination_location_id: Uuid,
    pub quantity: Decimal,
    /// Logistics cost of the move, informational only.
    pub transfer_cost: Option<Decimal>,
    pub transfer_date: NaiveDate,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
