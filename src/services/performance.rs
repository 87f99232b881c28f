use crate::{
    db::DbPool,
    entities::employee_performance::{self, Entity as EmployeePerformance},
    errors::ServiceError,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Additive changes to one employee's performance rollup. Every use case
/// that touches the rollup builds one of these and applies it inside its
/// own transaction.
#[derive(Debug, Clone, Default)]
pub struct PerformanceDelta {
    pub earnings: Decimal,
    pub tips_received: Decimal,
    pub hours_worked: Decimal,
    pub overtime_hours_worked: Decimal,
    pub late_to_work: i32,
    pub missed_work_days: i32,
    pub uncompleted_shifts: i32,
    pub requests_created: i32,
    pub transactions_completed: i32,
    pub sales_handled_amount: Decimal,
    pub breaks_taken: i32,
    pub break_time: i32,
    pub inventory_waste_incidents: i32,
}

/// Creates the (empty) rollup row for a new employee.
pub(crate) async fn bootstrap<C: ConnectionTrait>(
    db: &C,
    employee_id: Uuid,
) -> Result<employee_performance::Model, ServiceError> {
    let row = employee_performance::ActiveModel {
        id: Set(Uuid::new_v4()),
        employee_id: Set(employee_id),
        total_earnings: Set(Decimal::ZERO),
        total_tips_received: Set(Decimal::ZERO),
        total_hours_worked: Set(Decimal::ZERO),
        total_overtime_hours_worked: Set(Decimal::ZERO),
        late_to_work_count: Set(0),
        missed_work_days_count: Set(0),
        uncompleted_shift_count: Set(0),
        requests_created: Set(0),
        total_transactions_completed: Set(0),
        total_sales_handled_amount: Set(Decimal::ZERO),
        total_breaks_taken: Set(0),
        total_break_time: Set(0),
        total_inventory_waste_count: Set(0),
        updated_at: Set(Utc::now().into()),
    };
    Ok(row.insert(db).await?)
}

/// Applies a delta to the employee's rollup, creating the row first if the
/// employee predates the bootstrap path.
pub(crate) async fn apply_delta<C: ConnectionTrait>(
    db: &C,
    employee_id: Uuid,
    delta: PerformanceDelta,
) -> Result<employee_performance::Model, ServiceError> {
    let current = match EmployeePerformance::find()
        .filter(employee_performance::Column::EmployeeId.eq(employee_id))
        .one(db)
        .await?
    {
        Some(row) => row,
        None => bootstrap(db, employee_id).await?,
    };

    let mut active: employee_performance::ActiveModel = current.clone().into();
    active.total_earnings = Set(current.total_earnings + delta.earnings);
    active.total_tips_received = Set(current.total_tips_received + delta.tips_received);
    active.total_hours_worked = Set(current.total_hours_worked + delta.hours_worked);
    active.total_overtime_hours_worked =
        Set(current.total_overtime_hours_worked + delta.overtime_hours_worked);
    active.late_to_work_count = Set(current.late_to_work_count + delta.late_to_work);
    active.missed_work_days_count = Set(current.missed_work_days_count + delta.missed_work_days);
    active.uncompleted_shift_count =
        Set(current.uncompleted_shift_count + delta.uncompleted_shifts);
    active.requests_created = Set(current.requests_created + delta.requests_created);
    active.total_transactions_completed =
        Set(current.total_transactions_completed + delta.transactions_completed);
    active.total_sales_handled_amount =
        Set(current.total_sales_handled_amount + delta.sales_handled_amount);
    active.total_breaks_taken = Set(current.total_breaks_taken + delta.breaks_taken);
    active.total_break_time = Set(current.total_break_time + delta.break_time);
    active.total_inventory_waste_count =
        Set(current.total_inventory_waste_count + delta.inventory_waste_incidents);
    active.updated_at = Set(Utc::now().into());

    Ok(active.update(db).await?)
}

/// Read-side access to the rollup for the collaborator layer.
#[derive(Clone)]
pub struct PerformanceService {
    db_pool: Arc<DbPool>,
}

impl PerformanceService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn get_for_employee(
        &self,
        employee_id: Uuid,
    ) -> Result<employee_performance::Model, ServiceError> {
        EmployeePerformance::find()
            .filter(employee_performance::Column::EmployeeId.eq(employee_id))
            .one(self.db_pool.as_ref())
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("No performance record for employee {}", employee_id))
            })
    }
}
