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
pub enum JobPosition {
    #[sea_orm(string_value = "owner")]
    Owner,
    #[sea_orm(string_value = "manager")]
    Manager,
    #[sea_orm(string_value = "chef")]
    Chef,
    #[sea_orm(string_value = "cook")]
    Cook,
    #[sea_orm(string_value = "kitchen_assistant")]
    KitchenAssistant,
    #[sea_orm(string_value = "waiter")]
    Waiter,
    #[sea_orm(string_value = "bartender")]
    Bartender,
    #[sea_orm(string_value = "cashier")]
    Cashier,
    #[sea_orm(string_value = "cleaner")]
    Cleaner,
}

impl JobPosition {
    /// Uppercase initial used as the suffix of derived account usernames.
    pub fn initial(&self) -> char {
        match self {
            JobPosition::Owner => 'O',
            JobPosition::Manager => 'M',
            JobPosition::Chef => 'C',
            JobPosition::Cook => 'K',
            JobPosition::KitchenAssistant => 'A',
            JobPosition::Waiter => 'W',
            JobPosition::Bartender => 'B',
            JobPosition::Cashier => 'S',
            JobPosition::Cleaner => 'L',
        }
    }
}

/// Staff member. `account_username` / `account_password` are derived once at
/// creation and never regenerated afterwards; the password column holds an
/// argon2 hash, never the raw credential.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub region_id: Uuid,
    pub location_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub date_of_hire: NaiveDate,
    pub job_position: JobPosition,
    pub hourly_wage: Decimal,
    #[sea_orm(unique)]
    pub account_username: String,
    #[serde(skip_serializing)]
    pub account_password: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
