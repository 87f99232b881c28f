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
pub enum Course {
    #[sea_orm(string_value = "appetizer")]
    Appetizer,
    #[sea_orm(string_value = "entree")]
    Entree,
    #[sea_orm(string_value = "dessert")]
    Dessert,
}

/// Sellable dish. `gross_profit` = price minus the recipe's ingredient cost,
/// computed and stored at creation time only.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "menu_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub location_id: Uuid,
    pub recipe_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub course: Course,
    pub available: bool,
    pub gross_profit: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
