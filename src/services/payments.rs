use crate::{
    db::DbPool,
    entities::{
        add_ons::Entity as AddOns,
        daily_shifts::{self, Entity as DailyShifts},
        internal_locations::Entity as InternalLocations,
        menu_items::Entity as MenuItems,
        menu_order_add_ons::{self, Entity as MenuOrderAddOns},
        menu_orders::{self, Entity as MenuOrders, MenuOrderStatus},
        payments::{self, AddOnSnapshot, LineItemSnapshot, PaymentCategory, PaymentMethod},
        tip_records,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    locks::{with_conflict_retry, KeyedLocks},
    metrics::PAYMENTS_CAPTURED_TOTAL,
    services::{performance, performance::PerformanceDelta},
};
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CapturePaymentRequest {
    pub internal_location_id: Uuid,
    /// Serving employee; must have an open shift right now.
    pub employee_id: Uuid,
    pub tip_percent: Decimal,
    pub service_charge_percent: Decimal,
    pub category: PaymentCategory,
    pub payment_type: PaymentMethod,
}

/// Bill total: tip and service charge both apply multiplicatively to the
/// subtotal.
pub fn bill_total(subtotal: Decimal, tip_percent: Decimal, service_charge_percent: Decimal) -> Decimal {
    (subtotal
        * (Decimal::ONE + tip_percent / dec!(100))
        * (Decimal::ONE + service_charge_percent / dec!(100)))
    .round_dp(2)
}

/// Tip attributed to the serving employee: the absolute difference between
/// the tip amount and the service-charge amount. Unusual but deliberate;
/// see DESIGN.md before changing.
pub fn attributed_tip(
    subtotal: Decimal,
    tip_percent: Decimal,
    service_charge_percent: Decimal,
) -> Decimal {
    (subtotal * tip_percent / dec!(100) - subtotal * service_charge_percent / dec!(100))
        .abs()
        .round_dp(2)
}

/// Payment capture: closes out every completed order line at one internal
/// location into a single append-only bill. Captures serialize on the
/// internal location id, which also makes double submission fail cleanly
/// with `NoCompletedOrders`.
#[derive(Clone)]
pub struct PaymentService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
    locks: KeyedLocks,
}

impl PaymentService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender, locks: KeyedLocks) -> Self {
        Self {
            db_pool,
            event_sender,
            locks,
        }
    }

    #[instrument(skip(self, request), fields(internal_location_id = %request.internal_location_id))]
    pub async fn capture_payment(
        &self,
        request: CapturePaymentRequest,
    ) -> Result<payments::Model, ServiceError> {
        if request.tip_percent < Decimal::ZERO || request.service_charge_percent < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Tip and service charge percentages cannot be negative".into(),
            ));
        }

        let _guard = self.locks.acquire(request.internal_location_id).await;
        with_conflict_retry(|| Box::pin(self.capture_payment_inner(request.clone()))).await
    }

    async fn capture_payment_inner(
        &self,
        request: CapturePaymentRequest,
    ) -> Result<payments::Model, ServiceError> {
        let txn = self.db_pool.begin().await?;

        let internal_location = InternalLocations::find_by_id(request.internal_location_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Internal location {} not found",
                    request.internal_location_id
                ))
            })?;

        let completed = MenuOrders::find()
            .filter(menu_orders::Column::InternalLocationId.eq(request.internal_location_id))
            .filter(menu_orders::Column::Status.eq(MenuOrderStatus::Completed))
            .all(&txn)
            .await?;
        if completed.is_empty() {
            return Err(ServiceError::NoCompletedOrders(format!(
                "No completed orders at internal location {}",
                request.internal_location_id
            )));
        }

        let mut subtotal = Decimal::ZERO;
        let mut snapshots = Vec::with_capacity(completed.len());
        for order in &completed {
            let menu_item = MenuItems::find_by_id(order.menu_item_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Menu item {} not found", order.menu_item_id))
                })?;
            let quantity = Decimal::from(order.quantity);

            let mut line_total = menu_item.price * quantity;
            let links = MenuOrderAddOns::find()
                .filter(menu_order_add_ons::Column::MenuOrderId.eq(order.id))
                .all(&txn)
                .await?;
            let mut add_on_snapshots = Vec::with_capacity(links.len());
            for link in &links {
                let add_on = AddOns::find_by_id(link.add_on_id)
                    .one(&txn)
                    .await?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("Add-on {} not found", link.add_on_id))
                    })?;
                line_total += add_on.additional_price * quantity;
                add_on_snapshots.push(AddOnSnapshot {
                    add_on_id: add_on.id,
                    name: add_on.name,
                    additional_price: add_on.additional_price,
                });
            }

            subtotal += line_total;
            snapshots.push(LineItemSnapshot {
                menu_order_id: order.id,
                menu_item_id: menu_item.id,
                menu_item_name: menu_item.name,
                unit_price: menu_item.price,
                quantity: order.quantity,
                add_ons: add_on_snapshots,
            });
        }
        let subtotal = subtotal.round_dp(2);

        let total = bill_total(subtotal, request.tip_percent, request.service_charge_percent);
        let tip_amount = attributed_tip(
            subtotal,
            request.tip_percent,
            request.service_charge_percent,
        );

        let today = Utc::now().date_naive();
        let open_shift = DailyShifts::find()
            .filter(daily_shifts::Column::EmployeeId.eq(request.employee_id))
            .filter(daily_shifts::Column::ShiftDate.eq(today))
            .filter(daily_shifts::Column::PunchInTime.is_not_null())
            .filter(daily_shifts::Column::PunchOutTime.is_null())
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NoOpenShift(format!(
                    "Employee {} has no open shift today",
                    request.employee_id
                ))
            })?;

        let payment = payments::ActiveModel {
            id: Set(Uuid::new_v4()),
            location_id: Set(internal_location.location_id),
            internal_location_id: Set(request.internal_location_id),
            employee_id: Set(request.employee_id),
            line_items: Set(serde_json::to_value(&snapshots).map_err(|e| {
                ServiceError::InternalError(format!("Failed to serialize line items: {}", e))
            })?),
            subtotal: Set(subtotal),
            tip_percent: Set(request.tip_percent),
            service_charge_percent: Set(request.service_charge_percent),
            total_bill: Set(total),
            category: Set(request.category),
            payment_type: Set(request.payment_type),
            paid_at: Set(Utc::now().into()),
            created_at: Set(Utc::now().into()),
        };
        let payment = payment.insert(&txn).await?;

        // The captured lines live on only as the payment snapshot.
        for order in completed {
            MenuOrderAddOns::delete_many()
                .filter(menu_order_add_ons::Column::MenuOrderId.eq(order.id))
                .exec(&txn)
                .await?;
            order.delete(&txn).await?;
        }

        let tip_record = tip_records::ActiveModel {
            id: Set(Uuid::new_v4()),
            employee_id: Set(request.employee_id),
            location_id: Set(internal_location.location_id),
            internal_location_id: Set(request.internal_location_id),
            daily_shift_id: Set(open_shift.id),
            payment_id: Set(payment.id),
            tip_amount: Set(tip_amount),
            category: Set(request.category),
            tip_date: Set(today),
            created_at: Set(Utc::now().into()),
        };
        tip_record.insert(&txn).await?;

        performance::apply_delta(
            &txn,
            request.employee_id,
            PerformanceDelta {
                tips_received: tip_amount,
                transactions_completed: 1,
                sales_handled_amount: total,
                ..Default::default()
            },
        )
        .await?;

        txn.commit().await?;

        PAYMENTS_CAPTURED_TOTAL.inc();
        info!(payment_id = %payment.id, %subtotal, %total, %tip_amount, "Payment captured");
        self.event_sender
            .send(Event::PaymentCaptured {
                payment_id: payment.id,
                total_bill: total,
            })
            .await
            .map_err(ServiceError::EventError)?;
        self.event_sender
            .send(Event::TipRecorded {
                employee_id: request.employee_id,
                amount: tip_amount,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(payment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_composes_tip_and_service_charge_multiplicatively() {
        assert_eq!(bill_total(dec!(100), dec!(15), dec!(5)), dec!(120.75));
        assert_eq!(bill_total(dec!(100), dec!(0), dec!(0)), dec!(100));
    }

    #[test]
    fn attributed_tip_is_absolute_difference() {
        assert_eq!(attributed_tip(dec!(100), dec!(15), dec!(5)), dec!(10));
        assert_eq!(attributed_tip(dec!(100), dec!(5), dec!(15)), dec!(10));
        assert_eq!(attributed_tip(dec!(200), dec!(10), dec!(10)), dec!(0));
    }
}
