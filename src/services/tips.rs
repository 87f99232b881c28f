use crate::{
    db::DbPool,
    entities::{
        daily_shifts::{self, Entity as DailyShifts},
        tip_payouts,
        tip_pools::{self, TipPoolMode},
        tip_records::{self, Entity as TipRecords},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Hours one employee actually worked on `date`, summed over that day's
/// closed shifts.
async fn hours_worked_on<C: ConnectionTrait>(
    db: &C,
    employee_id: Uuid,
    date: NaiveDate,
) -> Result<Decimal, ServiceError> {
    let shifts = DailyShifts::find()
        .filter(daily_shifts::Column::EmployeeId.eq(employee_id))
        .filter(daily_shifts::Column::ShiftDate.eq(date))
        .all(db)
        .await?;
    Ok(shifts
        .iter()
        .filter_map(|shift| shift.hours_worked)
        .sum())
}

/// Daily tip pooling: gathers every tip recorded at the location that day,
/// divides the pool by the participants' total hours, and in Send mode pays
/// each participant their hourly share.
#[derive(Clone)]
pub struct TipService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl TipService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self))]
    pub async fn pool_tips(
        &self,
        location_id: Uuid,
        date: NaiveDate,
        mode: TipPoolMode,
    ) -> Result<(tip_pools::Model, Vec<tip_payouts::Model>), ServiceError> {
        let txn = self.db_pool.begin().await?;

        let records = TipRecords::find()
            .filter(tip_records::Column::LocationId.eq(location_id))
            .filter(tip_records::Column::TipDate.eq(date))
            .all(&txn)
            .await?;

        let total_pool: Decimal = records.iter().map(|record| record.tip_amount).sum();

        // Distinct tipped employees, in a stable order.
        let mut participant_hours: BTreeMap<Uuid, Decimal> = BTreeMap::new();
        for record in &records {
            if !participant_hours.contains_key(&record.employee_id) {
                let hours = hours_worked_on(&txn, record.employee_id, date).await?;
                participant_hours.insert(record.employee_id, hours);
            }
        }
        let total_hours: Decimal = participant_hours.values().copied().sum();

        let tip_per_hour = if total_hours.is_zero() {
            warn!(%location_id, %date, "No hours worked by tipped employees; rate undefined, storing 0");
            Decimal::ZERO
        } else {
            (total_pool / total_hours).round_dp(4)
        };

        let participants: Vec<Uuid> = participant_hours.keys().copied().collect();
        let pool = tip_pools::ActiveModel {
            id: Set(Uuid::new_v4()),
            location_id: Set(location_id),
            pool_date: Set(date),
            mode: Set(mode),
            total_pool: Set(total_pool.round_dp(2)),
            participants: Set(serde_json::to_value(&participants).map_err(|e| {
                ServiceError::InternalError(format!("Failed to serialize participants: {}", e))
            })?),
            total_hours_worked: Set(total_hours.round_dp(2)),
            tip_per_hour: Set(tip_per_hour),
            created_at: Set(Utc::now().into()),
        };
        let pool = pool.insert(&txn).await?;

        let mut payouts = Vec::new();
        if mode == TipPoolMode::Send {
            for (employee_id, hours) in &participant_hours {
                let payout = tip_payouts::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    tip_pool_id: Set(pool.id),
                    employee_id: Set(*employee_id),
                    payout_amount: Set((tip_per_hour * hours).round_dp(2)),
                    tip_per_hour: Set(tip_per_hour),
                    hours_worked: Set(*hours),
                    payout_date: Set(date),
                    created_at: Set(Utc::now().into()),
                };
                payouts.push(payout.insert(&txn).await?);
            }
        }

        txn.commit().await?;

        info!(
            pool_id = %pool.id,
            %total_pool,
            %total_hours,
            %tip_per_hour,
            payout_count = payouts.len(),
            "Tip pool processed"
        );
        self.event_sender
            .send(Event::TipPoolCalculated {
                pool_id: pool.id,
                tip_per_hour,
            })
            .await
            .map_err(ServiceError::EventError)?;
        if mode == TipPoolMode::Send {
            self.event_sender
                .send(Event::TipPayoutsSent {
                    pool_id: pool.id,
                    payout_count: payouts.len(),
                })
                .await
                .map_err(ServiceError::EventError)?;
        }

        Ok((pool, payouts))
    }
}
