use crate::{
    db::DbPool,
    entities::{
        break_records,
        daily_shifts::{self, DailyShiftStatus, Entity as DailyShifts},
        employees::{self, Entity as Employees},
        region_locations::Entity as RegionLocations,
        shift_schedules::Entity as ShiftSchedules,
        weekly_shifts::{self, Entity as WeeklyShifts},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    locks::{with_conflict_retry, KeyedLocks},
    metrics::PUNCHES_TOTAL,
    services::{performance, performance::PerformanceDelta, scheduling::span_hours},
};
use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Utc};
use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Minutes past the scheduled start before a punch-in counts as late.
const LATE_GRACE_MINUTES: i64 = 7;

/// Pay multiplier for hours beyond the region's weekly threshold.
const OVERTIME_MULTIPLIER: Decimal = dec!(1.5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum PunchKind {
    In,
    Out,
}

/// Splits newly worked hours into regular and overtime portions given the
/// regular hours already accumulated this week and the region threshold.
/// Regular hours never push the weekly total past the threshold; everything
/// beyond is overtime.
pub fn overtime_split(
    hours_worked: Decimal,
    regular_hours_before: Decimal,
    threshold: Decimal,
) -> (Decimal, Decimal) {
    let headroom = (threshold - regular_hours_before).max(Decimal::ZERO);
    let regular = hours_worked.min(headroom);
    let overtime = hours_worked - regular;
    (regular, overtime)
}

/// Earnings for a split at the given wage: straight time plus 1.5x overtime.
pub fn split_earnings(regular: Decimal, overtime: Decimal, wage: Decimal) -> Decimal {
    (regular * wage + overtime * wage * OVERTIME_MULTIPLIER).round_dp(2)
}

/// Monday-to-Sunday window containing `date`.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    (start, start + Duration::days(6))
}

async fn find_or_create_weekly<C: ConnectionTrait>(
    db: &C,
    employee_id: Uuid,
    date: NaiveDate,
) -> Result<weekly_shifts::Model, ServiceError> {
    let (week_start, week_end) = week_bounds(date);

    if let Some(existing) = WeeklyShifts::find()
        .filter(weekly_shifts::Column::EmployeeId.eq(employee_id))
        .filter(weekly_shifts::Column::WeekStartDate.eq(week_start))
        .one(db)
        .await?
    {
        return Ok(existing);
    }

    let row = weekly_shifts::ActiveModel {
        id: Set(Uuid::new_v4()),
        employee_id: Set(employee_id),
        week_start_date: Set(week_start),
        week_end_date: Set(week_end),
        regular_hours_worked: Set(Decimal::ZERO),
        overtime_hours_worked: Set(Decimal::ZERO),
        earnings_this_week: Set(Decimal::ZERO),
        updated_at: Set(Utc::now().into()),
    };
    Ok(row.insert(db).await?)
}

async fn overtime_threshold_for<C: ConnectionTrait>(
    db: &C,
    employee: &employees::Model,
) -> Result<Decimal, ServiceError> {
    let region = RegionLocations::find_by_id(employee.region_id)
        .one(db)
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!("Region {} not found", employee.region_id))
        })?;
    Ok(region.overtime_threshold)
}

/// Time clock use cases: punches, missed close-outs and break records.
/// Punches serialize per employee id.
#[derive(Clone)]
pub struct TimeclockService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
    locks: KeyedLocks,
}

impl TimeclockService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender, locks: KeyedLocks) -> Self {
        Self {
            db_pool,
            event_sender,
            locks,
        }
    }

    /// Records a punch of either kind for the employee's shift on `date`.
    #[instrument(skip(self))]
    pub async fn punch(
        &self,
        employee_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
        kind: PunchKind,
    ) -> Result<daily_shifts::Model, ServiceError> {
        let _guard = self.locks.acquire(employee_id).await;
        PUNCHES_TOTAL.with_label_values(&[&kind.to_string()]).inc();

        match kind {
            PunchKind::In => {
                with_conflict_retry(|| Box::pin(self.punch_in(employee_id, date, time))).await
            }
            PunchKind::Out => {
                with_conflict_retry(|| Box::pin(self.punch_out(employee_id, date, time))).await
            }
        }
    }

    async fn punch_in(
        &self,
        employee_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<daily_shifts::Model, ServiceError> {
        let txn = self.db_pool.begin().await?;

        let record = DailyShifts::find()
            .filter(daily_shifts::Column::EmployeeId.eq(employee_id))
            .filter(daily_shifts::Column::ShiftDate.eq(date))
            .filter(daily_shifts::Column::Status.eq(DailyShiftStatus::Upcoming))
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::InvalidStatus(format!(
                    "No upcoming shift for employee {} on {}",
                    employee_id, date
                ))
            })?;

        let schedule = ShiftSchedules::find_by_id(record.schedule_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Shift schedule {} not found", record.schedule_id))
            })?;

        let grace_limit = schedule.start_time + Duration::minutes(LATE_GRACE_MINUTES);
        let status = if time > grace_limit {
            DailyShiftStatus::Late
        } else {
            DailyShiftStatus::InProgress
        };

        let mut active: daily_shifts::ActiveModel = record.into();
        active.punch_in_time = Set(Some(time));
        active.status = Set(status);
        active.updated_at = Set(Some(Utc::now().into()));
        let record = active.update(&txn).await?;

        if status == DailyShiftStatus::Late {
            performance::apply_delta(
                &txn,
                employee_id,
                PerformanceDelta {
                    late_to_work: 1,
                    ..Default::default()
                },
            )
            .await?;
        }

        txn.commit().await?;

        self.event_sender
            .send(Event::ShiftPunchedIn {
                daily_shift_id: record.id,
                status: status.to_string(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(record)
    }

    async fn punch_out(
        &self,
        employee_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<daily_shifts::Model, ServiceError> {
        let txn = self.db_pool.begin().await?;

        let record = DailyShifts::find()
            .filter(daily_shifts::Column::EmployeeId.eq(employee_id))
            .filter(daily_shifts::Column::ShiftDate.eq(date))
            .filter(
                daily_shifts::Column::Status
                    .is_in([DailyShiftStatus::Late, DailyShiftStatus::InProgress]),
            )
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::InvalidStatus(format!(
                    "No punched-in shift for employee {} on {}",
                    employee_id, date
                ))
            })?;

        let punch_in_time = record.punch_in_time.ok_or_else(|| {
            ServiceError::InternalError("Punched-in shift has no punch-in time".into())
        })?;
        if time <= punch_in_time {
            return Err(ServiceError::ValidationError(
                "Punch-out time must be after the punch-in time".into(),
            ));
        }

        let schedule = ShiftSchedules::find_by_id(record.schedule_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Shift schedule {} not found", record.schedule_id))
            })?;
        let employee = Employees::find_by_id(employee_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Employee {} not found", employee_id))
            })?;

        let hours_worked = span_hours(punch_in_time, time);
        let threshold = overtime_threshold_for(&txn, &employee).await?;
        let weekly = find_or_create_weekly(&txn, employee_id, date).await?;

        let (regular_added, overtime_added) =
            overtime_split(hours_worked, weekly.regular_hours_worked, threshold);
        let earnings = split_earnings(regular_added, overtime_added, employee.hourly_wage);

        let status = if time >= schedule.end_time {
            DailyShiftStatus::Completed
        } else {
            DailyShiftStatus::Uncompleted
        };

        let mut active: daily_shifts::ActiveModel = record.into();
        active.punch_out_time = Set(Some(time));
        active.hours_worked = Set(Some(hours_worked));
        active.earnings = Set(Some(earnings));
        active.status = Set(status);
        active.updated_at = Set(Some(Utc::now().into()));
        let record = active.update(&txn).await?;

        // Regular hours stay capped at the threshold; overtime accrues on
        // its own column.
        let mut weekly_active: weekly_shifts::ActiveModel = weekly.clone().into();
        weekly_active.regular_hours_worked =
            Set((weekly.regular_hours_worked + regular_added).min(threshold));
        weekly_active.overtime_hours_worked =
            Set(weekly.overtime_hours_worked + overtime_added);
        weekly_active.earnings_this_week = Set(weekly.earnings_this_week + earnings);
        weekly_active.updated_at = Set(Utc::now().into());
        weekly_active.update(&txn).await?;

        performance::apply_delta(
            &txn,
            employee_id,
            PerformanceDelta {
                earnings,
                hours_worked,
                overtime_hours_worked: overtime_added,
                uncompleted_shifts: if status == DailyShiftStatus::Uncompleted {
                    1
                } else {
                    0
                },
                ..Default::default()
            },
        )
        .await?;

        txn.commit().await?;

        info!(
            daily_shift_id = %record.id,
            %hours_worked,
            %earnings,
            status = %status,
            "Shift closed out"
        );
        self.event_sender
            .send(Event::ShiftPunchedOut {
                daily_shift_id: record.id,
                status: status.to_string(),
                hours_worked,
                earnings,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(record)
    }

    /// Closes out a shift that was never punched. Only an Upcoming record
    /// can be marked missed.
    #[instrument(skip(self))]
    pub async fn mark_missed(&self, daily_shift_id: Uuid) -> Result<daily_shifts::Model, ServiceError> {
        let txn = self.db_pool.begin().await?;

        let record = DailyShifts::find_by_id(daily_shift_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Daily shift {} not found", daily_shift_id))
            })?;
        if record.status != DailyShiftStatus::Upcoming {
            return Err(ServiceError::InvalidStatus(format!(
                "Only an upcoming shift can be marked missed, found {}",
                record.status
            )));
        }

        let employee_id = record.employee_id;
        let mut active: daily_shifts::ActiveModel = record.into();
        active.status = Set(DailyShiftStatus::Missed);
        active.updated_at = Set(Some(Utc::now().into()));
        let record = active.update(&txn).await?;

        performance::apply_delta(
            &txn,
            employee_id,
            PerformanceDelta {
                missed_work_days: 1,
                ..Default::default()
            },
        )
        .await?;

        txn.commit().await?;

        self.event_sender
            .send(Event::ShiftMissed(record.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(record)
    }

    /// Logs a break against the employee's shift on `date`. Duration is
    /// whole hours, rounded half away from zero.
    #[instrument(skip(self))]
    pub async fn record_break(
        &self,
        employee_id: Uuid,
        date: NaiveDate,
        break_start: NaiveTime,
        break_end: NaiveTime,
    ) -> Result<break_records::Model, ServiceError> {
        if break_end <= break_start {
            return Err(ServiceError::ValidationError(
                "Break end time must be after its start time".into(),
            ));
        }

        let txn = self.db_pool.begin().await?;

        let shift = DailyShifts::find()
            .filter(daily_shifts::Column::EmployeeId.eq(employee_id))
            .filter(daily_shifts::Column::ShiftDate.eq(date))
            .filter(daily_shifts::Column::Status.ne(DailyShiftStatus::Swapped))
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "No shift for employee {} on {}",
                    employee_id, date
                ))
            })?;

        let duration_hours = (Decimal::from((break_end - break_start).num_seconds())
            / Decimal::from(3600))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i32()
        .unwrap_or(0);

        let record = break_records::ActiveModel {
            id: Set(Uuid::new_v4()),
            employee_id: Set(employee_id),
            daily_shift_id: Set(shift.id),
            break_start: Set(break_start),
            break_end: Set(break_end),
            break_duration: Set(duration_hours),
            break_date: Set(date),
            created_at: Set(Utc::now().into()),
        };
        let record = record.insert(&txn).await?;

        performance::apply_delta(
            &txn,
            employee_id,
            PerformanceDelta {
                breaks_taken: 1,
                break_time: duration_hours,
                ..Default::default()
            },
        )
        .await?;

        txn.commit().await?;

        self.event_sender
            .send(Event::BreakRecorded {
                daily_shift_id: shift.id,
                duration_hours,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_within_threshold_is_all_regular() {
        let (regular, overtime) = overtime_split(dec!(5), dec!(30), dec!(40));
        assert_eq!(regular, dec!(5));
        assert_eq!(overtime, Decimal::ZERO);
    }

    #[test]
    fn split_across_threshold() {
        let (regular, overtime) = overtime_split(dec!(5), dec!(38), dec!(40));
        assert_eq!(regular, dec!(2));
        assert_eq!(overtime, dec!(3));
    }

    #[test]
    fn split_past_threshold_is_all_overtime() {
        let (regular, overtime) = overtime_split(dec!(6), dec!(42), dec!(40));
        assert_eq!(regular, Decimal::ZERO);
        assert_eq!(overtime, dec!(6));
    }

    #[test]
    fn earnings_pay_overtime_at_time_and_a_half() {
        assert_eq!(split_earnings(dec!(2), dec!(3), dec!(20)), dec!(130));
        assert_eq!(split_earnings(dec!(8), dec!(0), dec!(15.50)), dec!(124));
    }

    #[test]
    fn week_bounds_are_monday_to_sunday() {
        // 2025-06-11 is a Wednesday.
        let (start, end) = week_bounds(NaiveDate::from_ymd_opt(2025, 6, 11).unwrap());
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 6, 9).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());

        let (monday_start, _) = week_bounds(NaiveDate::from_ymd_opt(2025, 6, 9).unwrap());
        assert_eq!(monday_start, NaiveDate::from_ymd_opt(2025, 6, 9).unwrap());
    }
}
