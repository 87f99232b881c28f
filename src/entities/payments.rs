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
pub enum PaymentCategory {
    #[sea_orm(string_value = "dine_in")]
    DineIn,
    #[sea_orm(string_value = "takeout")]
    Takeout,
    #[sea_orm(string_value = "delivery")]
    Delivery,
}

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
pub enum PaymentMethod {
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "card")]
    Card,
    #[sea_orm(string_value = "gift_card")]
    GiftCard,
    #[sea_orm(string_value = "crypto")]
    Crypto,
    #[sea_orm(string_value = "other")]
    Other,
}

/// Add-on line inside a captured payment snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AddOnSnapshot {
    pub add_on_id: Uuid,
    pub name: String,
    pub additional_price: Decimal,
}

/// One captured order line. Written when the payment deletes the in-flight
/// order rows; receipts and menu engineering read these instead.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineItemSnapshot {
    pub menu_order_id: Uuid,
    pub menu_item_id: Uuid,
    pub menu_item_name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub add_ons: Vec<AddOnSnapshot>,
}

/// Append-only bill closing out every completed order line at one internal
/// location. `line_items` is the denormalized JSON snapshot of the deleted
/// order rows.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub location_id: Uuid,
    pub internal_location_id: Uuid,
    pub employee_id: Uuid,
    pub line_items: Json,
    pub subtotal: Decimal,
    pub tip_percent: Decimal,
    pub service_charge_percent: Decimal,
    pub total_bill: Decimal,
    pub category: PaymentCategory,
    pub payment_type: PaymentMethod,
    pub paid_at: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Decodes the line-item snapshot stored on this payment.
    pub fn line_item_snapshots(&self) -> Result<Vec<LineItemSnapshot>, serde_json::Error> {
        serde_json::from_value(self.line_items.clone())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
