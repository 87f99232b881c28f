use crate::{
    db::DbPool,
    entities::{
        purchase_alerts::{self, PurchaseAlertType},
        purchase_orders::{self, Entity as PurchaseOrders, PurchaseOrderStatus},
        purchase_receipts,
        vendors::Entity as Vendors,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    locks::{with_conflict_retry, KeyedLocks},
    services::{insights, inventory},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Signed receipt quantity variance at or above this percentage raises a
/// training fault; shortfalls surface through the variance columns instead.
const RECEIPT_VARIANCE_FAULT_PERCENT: Decimal = dec!(5);

/// Orders outside +/-10% of the location's historical average for the item
/// raise an order-size alert. No history, no alert.
const ORDER_SIZE_ALERT_BAND: Decimal = dec!(0.10);

#[derive(Debug, Clone)]
pub struct CreatePurchaseOrderRequest {
    pub location_id: Uuid,
    pub vendor_id: Uuid,
    pub item_id: Uuid,
    pub unit_price: Decimal,
    pub ordered_quantity: Decimal,
    pub order_date: NaiveDate,
    pub expected_arrival_date: NaiveDate,
}

async fn raise_alert<C: ConnectionTrait>(
    db: &C,
    order_id: Uuid,
    alert_type: PurchaseAlertType,
    message: String,
    alert_date: NaiveDate,
) -> Result<purchase_alerts::Model, ServiceError> {
    let alert = purchase_alerts::ActiveModel {
        id: Set(Uuid::new_v4()),
        purchase_order_id: Set(order_id),
        alert_type: Set(alert_type),
        message: Set(message),
        alert_date: Set(alert_date),
        created_at: Set(Utc::now().into()),
    };
    Ok(alert.insert(db).await?)
}

/// Vendor purchase orders and goods receipts. A receipt applies the ledger
/// receive at the order's unit price and derives quantity/value variances
/// against what was ordered.
#[derive(Clone)]
pub struct ProcurementService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
    locks: KeyedLocks,
}

impl ProcurementService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender, locks: KeyedLocks) -> Self {
        Self {
            db_pool,
            event_sender,
            locks,
        }
    }

    /// Persists the order and compares its size with the average of prior
    /// orders for the same item at the same location.
    #[instrument(skip(self, request), fields(item_id = %request.item_id))]
    pub async fn create_purchase_order(
        &self,
        request: CreatePurchaseOrderRequest,
    ) -> Result<purchase_orders::Model, ServiceError> {
        if request.ordered_quantity <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Ordered quantity must be positive".into(),
            ));
        }
        if request.unit_price <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Unit price must be positive".into(),
            ));
        }
        if request.expected_arrival_date < request.order_date {
            return Err(ServiceError::ValidationError(
                "Expected arrival cannot precede the order date".into(),
            ));
        }

        let txn = self.db_pool.begin().await?;

        Vendors::find_by_id(request.vendor_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Vendor {} not found", request.vendor_id))
            })?;
        inventory::find_item(&txn, request.item_id).await?;

        let prior = PurchaseOrders::find()
            .filter(purchase_orders::Column::LocationId.eq(request.location_id))
            .filter(purchase_orders::Column::ItemId.eq(request.item_id))
            .all(&txn)
            .await?;

        let order = purchase_orders::ActiveModel {
            id: Set(Uuid::new_v4()),
            location_id: Set(request.location_id),
            vendor_id: Set(request.vendor_id),
            item_id: Set(request.item_id),
            unit_price: Set(request.unit_price),
            ordered_quantity: Set(request.ordered_quantity.round_dp(3)),
            total_order_value: Set((request.unit_price * request.ordered_quantity).round_dp(2)),
            order_date: Set(request.order_date),
            expected_arrival_date: Set(request.expected_arrival_date),
            status: Set(PurchaseOrderStatus::Pending),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };
        let order = order.insert(&txn).await?;

        let mut alert_type = None;
        if !prior.is_empty() {
            let average = prior
                .iter()
                .map(|row| row.ordered_quantity)
                .sum::<Decimal>()
                / Decimal::from(prior.len());
            if request.ordered_quantity > average * (Decimal::ONE + ORDER_SIZE_ALERT_BAND) {
                raise_alert(
                    &txn,
                    order.id,
                    PurchaseAlertType::OrderAlert,
                    format!(
                        "Ordered {} is above the historical average of {} for this item",
                        request.ordered_quantity,
                        average.round_dp(3)
                    ),
                    request.order_date,
                )
                .await?;
                alert_type = Some(PurchaseAlertType::OrderAlert);
            } else if request.ordered_quantity < average * (Decimal::ONE - ORDER_SIZE_ALERT_BAND) {
                raise_alert(
                    &txn,
                    order.id,
                    PurchaseAlertType::OrderAlert,
                    format!(
                        "Ordered {} is below the historical average of {} for this item",
                        request.ordered_quantity,
                        average.round_dp(3)
                    ),
                    request.order_date,
                )
                .await?;
                alert_type = Some(PurchaseAlertType::OrderAlert);
            }
        }

        txn.commit().await?;

        self.event_sender
            .send(Event::PurchaseOrderCreated(order.id))
            .await
            .map_err(ServiceError::EventError)?;
        if let Some(alert_type) = alert_type {
            self.event_sender
                .send(Event::PurchaseAlertRaised {
                    order_id: order.id,
                    alert_type: alert_type.to_string(),
                })
                .await
                .map_err(ServiceError::EventError)?;
        }

        Ok(order)
    }

    /// Books the goods receipt: derives variances, applies the ledger
    /// receive at the order's unit price, marks the order received, and
    /// raises the matching alerts and training faults.
    #[instrument(skip(self))]
    pub async fn receive_purchase_order(
        &self,
        order_id: Uuid,
        received_quantity: Decimal,
        received_date: NaiveDate,
    ) -> Result<purchase_receipts::Model, ServiceError> {
        with_conflict_retry(|| {
            Box::pin(self.receive_purchase_order_inner(order_id, received_quantity, received_date))
        })
        .await
    }

    async fn receive_purchase_order_inner(
        &self,
        order_id: Uuid,
        received_quantity: Decimal,
        received_date: NaiveDate,
    ) -> Result<purchase_receipts::Model, ServiceError> {
        if received_quantity <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Received quantity must be positive".into(),
            ));
        }

        let txn = self.db_pool.begin().await?;

        let order = PurchaseOrders::find_by_id(order_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Purchase order {} not found", order_id))
            })?;
        if order.status != PurchaseOrderStatus::Pending {
            return Err(ServiceError::InvalidStatus(format!(
                "Purchase order {} is {}, not pending",
                order_id, order.status
            )));
        }

        let _guard = self.locks.acquire(order.item_id).await;

        let quantity_variance = received_quantity - order.ordered_quantity;
        let quantity_variance_percent = if order.ordered_quantity.is_zero() {
            warn!(%order_id, "Ordered quantity is zero; variance percent undefined, storing 0");
            Decimal::ZERO
        } else {
            (quantity_variance / order.ordered_quantity * dec!(100)).round_dp(2)
        };
        let received_value = received_quantity * order.unit_price;
        let value_variance = (received_value - order.total_order_value).round_dp(2);
        let value_variance_percent = if order.total_order_value.is_zero() {
            Decimal::ZERO
        } else {
            (value_variance / order.total_order_value * dec!(100)).round_dp(2)
        };

        let item = inventory::find_item(&txn, order.item_id).await?;
        inventory::apply_receive(&txn, item, received_quantity, order.unit_price).await?;

        let receipt = purchase_receipts::ActiveModel {
            id: Set(Uuid::new_v4()),
            purchase_order_id: Set(order_id),
            received_quantity: Set(received_quantity.round_dp(3)),
            received_date: Set(received_date),
            quantity_variance: Set(quantity_variance.round_dp(3)),
            quantity_variance_percent: Set(quantity_variance_percent),
            value_variance: Set(value_variance),
            value_variance_percent: Set(value_variance_percent),
            created_at: Set(Utc::now().into()),
        };
        let receipt = receipt.insert(&txn).await?;

        let location_id = order.location_id;
        let expected_arrival = order.expected_arrival_date;
        let mut active: purchase_orders::ActiveModel = order.into();
        active.status = Set(PurchaseOrderStatus::Received);
        active.updated_at = Set(Some(Utc::now().into()));
        active.update(&txn).await?;

        let mut alerts = Vec::new();
        if quantity_variance_percent >= RECEIPT_VARIANCE_FAULT_PERCENT {
            insights::record_fault(&txn, location_id).await?;
        }
        if quantity_variance > Decimal::ZERO {
            raise_alert(
                &txn,
                order_id,
                PurchaseAlertType::QuantityVariance,
                format!(
                    "Received quantity differs from ordered by {} ({}%)",
                    quantity_variance.round_dp(3),
                    quantity_variance_percent
                ),
                received_date,
            )
            .await?;
            alerts.push(PurchaseAlertType::QuantityVariance);
        }
        if value_variance > Decimal::ZERO {
            raise_alert(
                &txn,
                order_id,
                PurchaseAlertType::ValueVariance,
                format!(
                    "Received value differs from ordered by {} ({}%)",
                    value_variance, value_variance_percent
                ),
                received_date,
            )
            .await?;
            alerts.push(PurchaseAlertType::ValueVariance);
        }
        if received_date > expected_arrival {
            raise_alert(
                &txn,
                order_id,
                PurchaseAlertType::ArrivalDateVariance,
                format!(
                    "Goods arrived {} but were expected by {}",
                    received_date, expected_arrival
                ),
                received_date,
            )
            .await?;
            alerts.push(PurchaseAlertType::ArrivalDateVariance);
        }

        txn.commit().await?;

        info!(%order_id, receipt_id = %receipt.id, "Purchase order received");
        self.event_sender
            .send(Event::PurchaseOrderReceived {
                order_id,
                receipt_id: receipt.id,
            })
            .await
            .map_err(ServiceError::EventError)?;
        for alert_type in alerts {
            self.event_sender
                .send(Event::PurchaseAlertRaised {
                    order_id,
                    alert_type: alert_type.to_string(),
                })
                .await
                .map_err(ServiceError::EventError)?;
        }

        Ok(receipt)
    }
}
