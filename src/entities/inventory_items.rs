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
pub enum ItemType {
    #[sea_orm(string_value = "ingredient")]
    Ingredient,
    #[sea_orm(string_value = "nonfood")]
    Nonfood,
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
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[strum(serialize_all = "snake_case")]
pub enum UnitOfMeasure {
    #[sea_orm(string_value = "kg")]
    Kg,
    #[sea_orm(string_value = "g")]
    G,
    #[sea_orm(string_value = "lbs")]
    Lbs,
    #[sea_orm(string_value = "oz")]
    Oz,
    #[sea_orm(string_value = "l")]
    L,
    #[sea_orm(string_value = "ml")]
    Ml,
    #[sea_orm(string_value = "fl_oz")]
    FlOz,
    #[sea_orm(string_value = "cups")]
    Cups,
    #[sea_orm(string_value = "qt")]
    Qt,
    #[sea_orm(string_value = "gal")]
    Gal,
    #[sea_orm(string_value = "pcs")]
    Pcs,
    #[sea_orm(string_value = "mm")]
    Mm,
    #[sea_orm(string_value = "cm")]
    Cm,
    #[sea_orm(string_value = "in")]
    In,
}

/// On-hand stock for one item at one site.
///
/// `total_value / quantity` is the weighted average unit cost; every ledger
/// operation maintains `average_unit_price * quantity == total_value` within
/// rounding. `par_level` stays None until the first weekly recompute inside a
/// usage report.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub location_id: Uuid,
    pub name: String,
    pub item_type: ItemType,
    pub quantity: Decimal,
    pub unit: UnitOfMeasure,
    pub par_level: Option<Decimal>,
    pub total_value: Decimal,
    pub barcode: Option<String>,
    pub safety_stock: Decimal,
    pub deliveries_per_week: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Weighted average unit cost; 0 while the item is out of stock.
    pub fn average_unit_price(&self) -> Decimal {
        if self.quantity.is_zero() {
            Decimal::ZERO
        } else {
            self.total_value / self.quantity
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn item(quantity: Decimal, total_value: Decimal) -> Model {
        Model {
            id: Uuid::new_v4(),
            location_id: Uuid::new_v4(),
            name: "Flour".into(),
            item_type: ItemType::Ingredient,
            quantity,
            unit: UnitOfMeasure::Kg,
            par_level: None,
            total_value,
            barcode: None,
            safety_stock: Decimal::ZERO,
            deliveries_per_week: 1,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn average_unit_price_is_value_over_quantity() {
        assert_eq!(item(dec!(10), dec!(50)).average_unit_price(), dec!(5));
    }

    #[test]
    fn average_unit_price_is_zero_when_out_of_stock() {
        assert_eq!(item(dec!(0), dec!(0)).average_unit_price(), Decimal::ZERO);
    }
}
