use crate::{
    db::DbPool,
    entities::{
        daily_shifts::{self, DailyShiftStatus, Entity as DailyShifts},
        employees::Entity as Employees,
        shift_schedules::{self, Entity as ShiftSchedules, ShiftType},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateShiftRequest {
    pub location_id: Uuid,
    /// None leaves the shift open (unassigned). Setting this together with
    /// `is_open` is rejected.
    pub employee_id: Option<Uuid>,
    pub shift_type: ShiftType,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub shift_date: NaiveDate,
    pub is_open: bool,
}

/// Fractional hours between two times of the same day, to two decimals.
pub(crate) fn span_hours(start: NaiveTime, end: NaiveTime) -> Decimal {
    let seconds = (end - start).num_seconds();
    (Decimal::from(seconds) / Decimal::from(3600)).round_dp(2)
}

pub(crate) async fn create_daily_shift<C: ConnectionTrait>(
    db: &C,
    schedule: &shift_schedules::Model,
    employee_id: Uuid,
) -> Result<daily_shifts::Model, ServiceError> {
    let record = daily_shifts::ActiveModel {
        id: Set(Uuid::new_v4()),
        employee_id: Set(employee_id),
        schedule_id: Set(schedule.id),
        shift_type: Set(schedule.shift_type),
        shift_date: Set(schedule.shift_date),
        punch_in_time: Set(None),
        punch_out_time: Set(None),
        hours_worked: Set(None),
        earnings: Set(None),
        status: Set(DailyShiftStatus::Upcoming),
        created_at: Set(Utc::now().into()),
        updated_at: Set(None),
    };
    Ok(record.insert(db).await?)
}

/// Shift planning: creating scheduled (or open) shifts and swapping an
/// assigned shift to another employee.
#[derive(Clone)]
pub struct SchedulingService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl SchedulingService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates a schedule and, when assigned, the Upcoming daily record for
    /// the assignee. Job position is derived from the employee, total hours
    /// from the start/end times.
    #[instrument(skip(self, request), fields(shift_date = %request.shift_date))]
    pub async fn create_shift(
        &self,
        request: CreateShiftRequest,
    ) -> Result<shift_schedules::Model, ServiceError> {
        if request.employee_id.is_some() && request.is_open {
            return Err(ServiceError::ValidationError(
                "A shift cannot be both assigned to an employee and open".into(),
            ));
        }
        if request.employee_id.is_none() && !request.is_open {
            return Err(ServiceError::ValidationError(
                "An unassigned shift must be marked open".into(),
            ));
        }
        if request.end_time <= request.start_time {
            return Err(ServiceError::ValidationError(
                "Shift end time must be after its start time".into(),
            ));
        }

        let txn = self.db_pool.begin().await?;

        let job_position = match request.employee_id {
            Some(employee_id) => {
                let employee = Employees::find_by_id(employee_id)
                    .one(&txn)
                    .await?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("Employee {} not found", employee_id))
                    })?;
                Some(employee.job_position)
            }
            None => None,
        };

        let schedule = shift_schedules::ActiveModel {
            id: Set(Uuid::new_v4()),
            location_id: Set(request.location_id),
            employee_id: Set(request.employee_id),
            job_position: Set(job_position),
            shift_type: Set(request.shift_type),
            start_time: Set(request.start_time),
            end_time: Set(request.end_time),
            total_hours: Set(span_hours(request.start_time, request.end_time)),
            shift_date: Set(request.shift_date),
            swapped_employee_id: Set(None),
            is_open: Set(request.is_open),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };
        let schedule = schedule.insert(&txn).await?;

        if let Some(employee_id) = request.employee_id {
            create_daily_shift(&txn, &schedule, employee_id).await?;
        }

        txn.commit().await?;

        self.event_sender
            .send(Event::ShiftScheduled(schedule.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(schedule)
    }

    /// Hands the shift to `new_employee_id`: records the swap on the
    /// schedule, creates the taker's Upcoming daily record and flips the
    /// original assignee's Upcoming record to Swapped, excluding it from
    /// payroll. No performance counter moves.
    #[instrument(skip(self))]
    pub async fn swap_shift(
        &self,
        schedule_id: Uuid,
        new_employee_id: Uuid,
    ) -> Result<shift_schedules::Model, ServiceError> {
        let txn = self.db_pool.begin().await?;

        let schedule = ShiftSchedules::find_by_id(schedule_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Shift schedule {} not found", schedule_id))
            })?;

        let original_employee = schedule.employee_id.ok_or_else(|| {
            ServiceError::ValidationError("An open shift cannot be swapped".into())
        })?;
        if original_employee == new_employee_id {
            return Err(ServiceError::ValidationError(
                "Cannot swap a shift to its current assignee".into(),
            ));
        }

        Employees::find_by_id(new_employee_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Employee {} not found", new_employee_id))
            })?;

        let original_record = DailyShifts::find()
            .filter(daily_shifts::Column::ScheduleId.eq(schedule_id))
            .filter(daily_shifts::Column::EmployeeId.eq(original_employee))
            .filter(daily_shifts::Column::Status.eq(DailyShiftStatus::Upcoming))
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::ValidationError(
                    "Only a shift that has not been punched can be swapped".into(),
                )
            })?;

        let mut superseded: daily_shifts::ActiveModel = original_record.into();
        superseded.status = Set(DailyShiftStatus::Swapped);
        superseded.updated_at = Set(Some(Utc::now().into()));
        superseded.update(&txn).await?;

        create_daily_shift(&txn, &schedule, new_employee_id).await?;

        let mut active: shift_schedules::ActiveModel = schedule.into();
        active.swapped_employee_id = Set(Some(new_employee_id));
        active.updated_at = Set(Some(Utc::now().into()));
        let schedule = active.update(&txn).await?;

        txn.commit().await?;

        info!(%schedule_id, %new_employee_id, "Shift swapped");
        self.event_sender
            .send(Event::ShiftSwapped {
                schedule_id,
                from_employee: original_employee,
                to_employee: new_employee_id,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn span_hours_is_fractional_to_two_decimals() {
        let start = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let end = NaiveTime::from_hms_opt(17, 0, 0).unwrap();
        assert_eq!(span_hours(start, end), dec!(8));

        let early_out = NaiveTime::from_hms_opt(16, 30, 0).unwrap();
        assert_eq!(
            span_hours(NaiveTime::from_hms_opt(9, 10, 0).unwrap(), early_out),
            dec!(7.33)
        );
    }
}
