use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Menu engineering matrix cell: sales volume vs profitability relative to
/// the mean of the other items at the same location.
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
pub enum MenuEngineeringMatrix {
    /// Sold above mean, profit above mean.
    #[sea_orm(string_value = "star")]
    Star,
    /// Sold below mean, profit above mean.
    #[sea_orm(string_value = "puzzle")]
    Puzzle,
    /// Sold above mean, profit below mean.
    #[sea_orm(string_value = "plow_horse")]
    PlowHorse,
    /// Sold below mean, profit below mean.
    #[sea_orm(string_value = "dog")]
    Dog,
    /// Tied with the mean on either axis.
    #[sea_orm(string_value = "insufficient_data")]
    InsufficientData,
}

/// One menu item's row in a menu engineering run. Figures are recomputed
/// fresh from captured payment snapshots on every run, never from running
/// counters.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "menu_engineering_reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub location_id: Uuid,
    pub menu_item_id: Uuid,
    pub total_revenue: Decimal,
    pub total_cogs: Decimal,
    pub gross_profit: Decimal,
    pub number_sold: i32,
    pub matrix: MenuEngineeringMatrix,
    pub report_date: NaiveDate,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
