use crate::{
    db::DbPool,
    entities::{
        menu_items::Entity as MenuItems,
        menu_waste_analyses,
        menu_waste_records::{self, Entity as MenuWasteRecords, MenuWasteReason},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::{info, instrument};
use uuid::Uuid;

/// Picks the most frequent reason; ties break by enum declaration order so
/// repeated analyses of the same records agree.
fn most_common_reason(records: &[menu_waste_records::Model]) -> Option<MenuWasteReason> {
    let mut best: Option<(MenuWasteReason, usize)> = None;
    for reason in MenuWasteReason::iter() {
        let count = records.iter().filter(|record| record.reason == reason).count();
        if count > 0 && best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((reason, count));
        }
    }
    best.map(|(reason, _)| reason)
}

/// Plated-food waste tracking for menu items, separate from the raw
/// inventory write-off bin.
#[derive(Clone)]
pub struct MenuWasteService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl MenuWasteService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self))]
    pub async fn record_menu_waste(
        &self,
        menu_item_id: Uuid,
        weight_wasted: Decimal,
        reason: MenuWasteReason,
        waste_date: NaiveDate,
    ) -> Result<menu_waste_records::Model, ServiceError> {
        if weight_wasted <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Wasted weight must be positive".into(),
            ));
        }

        let txn = self.db_pool.begin().await?;
        MenuItems::find_by_id(menu_item_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Menu item {} not found", menu_item_id))
            })?;

        let record = menu_waste_records::ActiveModel {
            id: Set(Uuid::new_v4()),
            menu_item_id: Set(menu_item_id),
            weight_wasted: Set(weight_wasted.round_dp(3)),
            reason: Set(reason),
            waste_date: Set(waste_date),
            created_at: Set(Utc::now().into()),
        };
        let record = record.insert(&txn).await?;
        txn.commit().await?;

        self.event_sender
            .send(Event::MenuWasteRecorded {
                menu_item_id,
                weight: record.weight_wasted,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(record)
    }

    #[instrument(skip(self))]
    pub async fn analyze_menu_waste(
        &self,
        menu_item_id: Uuid,
        analysis_date: NaiveDate,
    ) -> Result<menu_waste_analyses::Model, ServiceError> {
        let txn = self.db_pool.begin().await?;

        let records = MenuWasteRecords::find()
            .filter(menu_waste_records::Column::MenuItemId.eq(menu_item_id))
            .all(&txn)
            .await?;
        let reason = most_common_reason(&records).ok_or_else(|| {
            ServiceError::ValidationError(format!(
                "No waste records exist for menu item {}",
                menu_item_id
            ))
        })?;
        let total: Decimal = records.iter().map(|record| record.weight_wasted).sum();

        let analysis = menu_waste_analyses::ActiveModel {
            id: Set(Uuid::new_v4()),
            menu_item_id: Set(menu_item_id),
            total_weight_wasted: Set(total.round_dp(3)),
            most_common_reason: Set(reason),
            analysis_date: Set(analysis_date),
            created_at: Set(Utc::now().into()),
        };
        let analysis = analysis.insert(&txn).await?;
        txn.commit().await?;

        info!(
            %menu_item_id,
            total_weight = %analysis.total_weight_wasted,
            reason = %analysis.most_common_reason,
            "Menu waste analyzed"
        );
        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(reason: MenuWasteReason) -> menu_waste_records::Model {
        menu_waste_records::Model {
            id: Uuid::new_v4(),
            menu_item_id: Uuid::new_v4(),
            weight_wasted: dec!(1),
            reason,
            waste_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn majority_reason_wins() {
        let records = vec![
            record(MenuWasteReason::Spoilage),
            record(MenuWasteReason::Spoilage),
            record(MenuWasteReason::Overproduction),
        ];
        assert_eq!(
            most_common_reason(&records),
            Some(MenuWasteReason::Spoilage)
        );
    }

    #[test]
    fn ties_break_by_declaration_order() {
        let records = vec![
            record(MenuWasteReason::Spoilage),
            record(MenuWasteReason::Overproduction),
        ];
        assert_eq!(
            most_common_reason(&records),
            Some(MenuWasteReason::Overproduction)
        );
    }

    #[test]
    fn empty_records_yield_none() {
        assert_eq!(most_common_reason(&[]), None);
    }
}
