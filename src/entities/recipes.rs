use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kitchen recipe shared across a region's menus. Times are minutes;
/// `total_recipe_time` = preparation + cooking + dishing-up.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recipes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub region_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub preparation_time: i32,
    pub cooking_time: i32,
    pub dishing_up_time: i32,
    pub total_recipe_time: i32,
    pub cooking_temperature: Option<String>,
    pub quality_standards: Option<String>,
    pub serving_size: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
