use chrono::NaiveDate;
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
pub enum PurchaseAlertType {
    /// Received quantity differs from the ordered quantity.
    #[sea_orm(string_value = "quantity_variance")]
    QuantityVariance,
    /// Received value differs from the ordered value.
    #[sea_orm(string_value = "value_variance")]
    ValueVariance,
    /// Goods arrived after the expected arrival date.
    #[sea_orm(string_value = "arrival_date_variance")]
    ArrivalDateVariance,
    /// Ordered quantity is out of band with the location's order history.
    #[sea_orm(string_value = "order_alert")]
    OrderAlert,
}

/// Human-readable procurement alert surfaced to the listing views.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_alerts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub purchase_order_id: Uuid,
    pub alert_type: PurchaseAlertType,
    pub message: String,
    pub alert_date: NaiveDate,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
