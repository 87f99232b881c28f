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
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[strum(serialize_all = "snake_case")]
pub enum WasteReason {
    #[sea_orm(string_value = "spoilage")]
    Spoilage,
    #[sea_orm(string_value = "breakage")]
    Breakage,
    #[sea_orm(string_value = "theft")]
    Theft,
    #[sea_orm(string_value = "equipment_fault")]
    EquipmentFault,
}

/// Stock written off outside of normal consumption. `money_wasted` is priced
/// at the item's average unit cost before the write-off.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_waste")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub location_id: Uuid,
    pub item_id: Uuid,
    pub quantity_wasted: Decimal,
    pub money_wasted: Decimal,
    pub reason: WasteReason,
    pub waste_date: NaiveDate,
    pub culprit_employee_id: Option<Uuid>,
    pub reported_by_id: Option<Uuid>,
    pub comments: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
