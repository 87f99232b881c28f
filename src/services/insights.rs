use crate::{
    db::DbPool,
    entities::training_insights::{self, Entity as TrainingInsights},
    errors::ServiceError,
    events::{Event, EventSender},
    metrics::TRAINING_FAULTS_TOTAL,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Placeholder text refreshed on every fault. Real recommendation content
/// comes from an external insight generator.
const SUGGESTED_TRAINING_PLACEHOLDER: &str =
    "Review inventory handling and portioning procedures with staff";

/// Upserts the location's fault counter: +1, creating the row with 1 when
/// absent. Shared by inventory checks, purchase receipts, cost reports,
/// usage reports and theft write-offs. Returns the new count.
pub(crate) async fn record_fault<C: ConnectionTrait>(
    db: &C,
    location_id: Uuid,
) -> Result<i32, ServiceError> {
    let existing = TrainingInsights::find()
        .filter(training_insights::Column::LocationId.eq(location_id))
        .one(db)
        .await?;

    let fault_count = match existing {
        Some(row) => {
            let next = row.fault_count + 1;
            let mut active: training_insights::ActiveModel = row.into();
            active.fault_count = Set(next);
            active.suggested_training = Set(SUGGESTED_TRAINING_PLACEHOLDER.to_string());
            active.updated_at = Set(Some(Utc::now().into()));
            active.update(db).await?;
            next
        }
        None => {
            let row = training_insights::ActiveModel {
                id: Set(Uuid::new_v4()),
                location_id: Set(location_id),
                fault_count: Set(1),
                suggested_training: Set(SUGGESTED_TRAINING_PLACEHOLDER.to_string()),
                created_at: Set(Utc::now().into()),
                updated_at: Set(None),
            };
            row.insert(db).await?;
            1
        }
    };

    TRAINING_FAULTS_TOTAL.inc();
    Ok(fault_count)
}

/// Service wrapper for the collaborator layer: direct fault recording plus
/// the listing query behind the training views.
#[derive(Clone)]
pub struct InsightService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl InsightService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self))]
    pub async fn record_fault(&self, location_id: Uuid) -> Result<i32, ServiceError> {
        let txn = self.db_pool.begin().await?;
        let fault_count = record_fault(&txn, location_id).await?;
        txn.commit().await?;

        info!(%location_id, fault_count, "Training fault recorded");
        self.event_sender
            .send(Event::TrainingFaultRecorded {
                location_id,
                fault_count,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(fault_count)
    }

    #[instrument(skip(self))]
    pub async fn get_insight(
        &self,
        location_id: Uuid,
    ) -> Result<Option<training_insights::Model>, ServiceError> {
        Ok(TrainingInsights::find()
            .filter(training_insights::Column::LocationId.eq(location_id))
            .one(self.db_pool.as_ref())
            .await?)
    }
}
