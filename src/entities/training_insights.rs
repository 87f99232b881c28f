use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-location fault counter raised by variance breaches across checks,
/// order receipts, cost reports, usage reports and theft write-offs.
/// Monotonic: there is no decay or expiry.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "training_insights")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub location_id: Uuid,
    pub fault_count: i32,
    pub suggested_training: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Display tier used by the listing views.
    pub fn fault_status(&self) -> &'static str {
        if self.fault_count > 3 {
            "High"
        } else {
            "Low"
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

    fn insight(fault_count: i32) -> Model {
        Model {
            id: Uuid::new_v4(),
            location_id: Uuid::new_v4(),
            fault_count,
            suggested_training: String::new(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn fault_status_tiers() {
        assert_eq!(insight(0).fault_status(), "Low");
        assert_eq!(insight(3).fault_status(), "Low");
        assert_eq!(insight(4).fault_status(), "High");
    }
}
