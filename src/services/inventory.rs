use crate::{
    db::DbPool,
    entities::{
        inventory_checks,
        inventory_items::{self, Entity as InventoryItems},
        inventory_transfers,
        inventory_waste::{self, WasteReason},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    locks::{with_conflict_retry, KeyedLocks},
    metrics::LEDGER_OPS_TOTAL,
    services::{insights, performance, performance::PerformanceDelta},
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

/// Signed count variance at or above this percentage raises a training
/// fault.
const CHECK_VARIANCE_FAULT_PERCENT: Decimal = dec!(5);

const QUANTITY_DP: u32 = 3;
const VALUE_DP: u32 = 2;

/// Increases quantity and value for a delivery priced at `unit_price`.
/// Ledger primitive: runs on whatever connection the calling use case holds.
pub(crate) async fn apply_receive<C: ConnectionTrait>(
    db: &C,
    item: inventory_items::Model,
    quantity: Decimal,
    unit_price: Decimal,
) -> Result<inventory_items::Model, ServiceError> {
    if quantity <= Decimal::ZERO {
        return Err(ServiceError::ValidationError(format!(
            "Received quantity must be positive, got {}",
            quantity
        )));
    }

    let new_quantity = (item.quantity + quantity).round_dp(QUANTITY_DP);
    let new_value = (item.total_value + quantity * unit_price).round_dp(VALUE_DP);

    let mut active: inventory_items::ActiveModel = item.into();
    active.quantity = Set(new_quantity);
    active.total_value = Set(new_value);
    active.updated_at = Set(Some(Utc::now().into()));
    let updated = active.update(db).await?;

    LEDGER_OPS_TOTAL.with_label_values(&["receive"]).inc();
    Ok(updated)
}

/// Decreases quantity and value at the current average unit price. Fails
/// with `InsufficientStock` rather than letting the quantity go negative.
pub(crate) async fn apply_consume<C: ConnectionTrait>(
    db: &C,
    item: inventory_items::Model,
    quantity: Decimal,
) -> Result<inventory_items::Model, ServiceError> {
    if quantity <= Decimal::ZERO {
        return Err(ServiceError::ValidationError(format!(
            "Consumed quantity must be positive, got {}",
            quantity
        )));
    }
    if quantity > item.quantity {
        return Err(ServiceError::InsufficientStock(format!(
            "{}: requested {} but only {} on hand",
            item.name, quantity, item.quantity
        )));
    }

    let average = item.average_unit_price();
    let new_quantity = (item.quantity - quantity).round_dp(QUANTITY_DP);
    // Zero stock carries zero value; avoids rounding residue building up.
    let new_value = if new_quantity.is_zero() {
        Decimal::ZERO
    } else {
        (item.total_value - quantity * average).round_dp(VALUE_DP)
    };

    let mut active: inventory_items::ActiveModel = item.into();
    active.quantity = Set(new_quantity);
    active.total_value = Set(new_value);
    active.updated_at = Set(Some(Utc::now().into()));
    let updated = active.update(db).await?;

    LEDGER_OPS_TOTAL.with_label_values(&["consume"]).inc();
    Ok(updated)
}

pub(crate) async fn find_item<C: ConnectionTrait>(
    db: &C,
    item_id: Uuid,
) -> Result<inventory_items::Model, ServiceError> {
    InventoryItems::find_by_id(item_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Inventory item {} not found", item_id)))
}

/// The destination-side counterpart of `source` at another location, matched
/// by (name, item type).
async fn find_destination_item<C: ConnectionTrait>(
    db: &C,
    source: &inventory_items::Model,
    destination_location_id: Uuid,
) -> Result<inventory_items::Model, ServiceError> {
    InventoryItems::find()
        .filter(inventory_items::Column::LocationId.eq(destination_location_id))
        .filter(inventory_items::Column::Name.eq(source.name.clone()))
        .filter(inventory_items::Column::ItemType.eq(source.item_type))
        .one(db)
        .await?
        .ok_or_else(|| {
            ServiceError::ItemNotFoundAtDestination(format!(
                "No item named '{}' at location {}",
                source.name, destination_location_id
            ))
        })
}

#[derive(Debug, Clone)]
pub struct WasteInventoryRequest {
    pub item_id: Uuid,
    pub quantity: Decimal,
    pub reason: WasteReason,
    pub culprit_employee_id: Option<Uuid>,
    pub reported_by_id: Option<Uuid>,
    pub comments: Option<String>,
    pub waste_date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct TransferInventoryRequest {
    pub source_item_id: Uuid,
    pub destination_location_id: Uuid,
    pub quantity: Decimal,
    pub transfer_cost: Option<Decimal>,
    pub transfer_date: NaiveDate,
}

/// Inventory ledger use cases: receipts, consumption, write-offs, transfers
/// and spot checks. Mutations serialize per item id.
#[derive(Clone)]
pub struct InventoryService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
    locks: KeyedLocks,
}

impl InventoryService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender, locks: KeyedLocks) -> Self {
        Self {
            db_pool,
            event_sender,
            locks,
        }
    }

    #[instrument(skip(self))]
    pub async fn receive(
        &self,
        item_id: Uuid,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Result<inventory_items::Model, ServiceError> {
        let _guard = self.locks.acquire(item_id).await;
        with_conflict_retry(|| Box::pin(self.receive_inner(item_id, quantity, unit_price))).await
    }

    async fn receive_inner(
        &self,
        item_id: Uuid,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Result<inventory_items::Model, ServiceError> {
        let txn = self.db_pool.begin().await?;
        let item = find_item(&txn, item_id).await?;
        let updated = apply_receive(&txn, item, quantity, unit_price).await?;
        txn.commit().await?;

        self.event_sender
            .send(Event::InventoryReceived { item_id, quantity })
            .await
            .map_err(ServiceError::EventError)?;
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn consume(
        &self,
        item_id: Uuid,
        quantity: Decimal,
    ) -> Result<inventory_items::Model, ServiceError> {
        let _guard = self.locks.acquire(item_id).await;
        with_conflict_retry(|| Box::pin(self.consume_inner(item_id, quantity))).await
    }

    async fn consume_inner(
        &self,
        item_id: Uuid,
        quantity: Decimal,
    ) -> Result<inventory_items::Model, ServiceError> {
        let txn = self.db_pool.begin().await?;
        let item = find_item(&txn, item_id).await?;
        let updated = apply_consume(&txn, item, quantity).await?;
        txn.commit().await?;

        self.event_sender
            .send(Event::InventoryConsumed { item_id, quantity })
            .await
            .map_err(ServiceError::EventError)?;
        Ok(updated)
    }

    /// Writes stock off: consumes it, logs the waste-bin row priced at the
    /// pre-mutation average, bumps the culprit's waste counter and, for
    /// theft, records a training fault for the location.
    #[instrument(skip(self, request))]
    pub async fn waste(
        &self,
        request: WasteInventoryRequest,
    ) -> Result<inventory_waste::Model, ServiceError> {
        let _guard = self.locks.acquire(request.item_id).await;
        with_conflict_retry(|| Box::pin(self.waste_inner(request.clone()))).await
    }

    async fn waste_inner(
        &self,
        request: WasteInventoryRequest,
    ) -> Result<inventory_waste::Model, ServiceError> {
        let txn = self.db_pool.begin().await?;

        let item = find_item(&txn, request.item_id).await?;
        let location_id = item.location_id;
        let money_wasted = (request.quantity * item.average_unit_price()).round_dp(VALUE_DP);
        apply_consume(&txn, item, request.quantity).await?;

        let waste_row = inventory_waste::ActiveModel {
            id: Set(Uuid::new_v4()),
            location_id: Set(location_id),
            item_id: Set(request.item_id),
            quantity_wasted: Set(request.quantity.round_dp(QUANTITY_DP)),
            money_wasted: Set(money_wasted),
            reason: Set(request.reason),
            waste_date: Set(request.waste_date),
            culprit_employee_id: Set(request.culprit_employee_id),
            reported_by_id: Set(request.reported_by_id),
            comments: Set(request.comments.clone()),
            created_at: Set(Utc::now().into()),
        };
        let waste_row = waste_row.insert(&txn).await?;

        if let Some(culprit) = request.culprit_employee_id {
            performance::apply_delta(
                &txn,
                culprit,
                PerformanceDelta {
                    inventory_waste_incidents: 1,
                    ..Default::default()
                },
            )
            .await?;
        }

        if request.reason == WasteReason::Theft {
            insights::record_fault(&txn, location_id).await?;
        }

        txn.commit().await?;

        self.event_sender
            .send(Event::InventoryWasted {
                item_id: request.item_id,
                quantity: request.quantity,
                money_wasted,
                reason: request.reason.to_string(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(waste_row)
    }

    /// Moves stock between sites: consumes at the source and receives at the
    /// destination item matched by (name, item type), valued at the source's
    /// average unit price. Both items are locked for the duration.
    #[instrument(skip(self, request))]
    pub async fn transfer(
        &self,
        request: TransferInventoryRequest,
    ) -> Result<inventory_transfers::Model, ServiceError> {
        let db = self.db_pool.as_ref();
        let source = find_item(db, request.source_item_id).await?;
        let destination =
            find_destination_item(db, &source, request.destination_location_id).await?;
        if destination.id == source.id {
            return Err(ServiceError::ValidationError(
                "Source and destination are the same item".into(),
            ));
        }

        let _guards = self
            .locks
            .acquire_many(vec![request.source_item_id, destination.id])
            .await;
        with_conflict_retry(|| Box::pin(self.transfer_inner(request.clone()))).await
    }

    async fn transfer_inner(
        &self,
        request: TransferInventoryRequest,
    ) -> Result<inventory_transfers::Model, ServiceError> {
        let txn = self.db_pool.begin().await?;

        let source = find_item(&txn, request.source_item_id).await?;
        let destination =
            find_destination_item(&txn, &source, request.destination_location_id).await?;
        let destination_id = destination.id;

        let unit_price = source.average_unit_price();
        let source_location_id = source.location_id;
        apply_consume(&txn, source, request.quantity).await?;
        apply_receive(&txn, destination, request.quantity, unit_price).await?;

        let transfer = inventory_transfers::ActiveModel {
            id: Set(Uuid::new_v4()),
            item_id: Set(request.source_item_id),
            source_location_id: Set(source_location_id),
            destination_location_id: Set(request.destination_location_id),
            quantity: Set(request.quantity.round_dp(QUANTITY_DP)),
            transfer_cost: Set(request.transfer_cost),
            transfer_date: Set(request.transfer_date),
            created_at: Set(Utc::now().into()),
        };
        let transfer = transfer.insert(&txn).await?;

        txn.commit().await?;

        self.event_sender
            .send(Event::InventoryTransferred {
                source_item_id: request.source_item_id,
                destination_item_id: destination_id,
                quantity: request.quantity,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(transfer)
    }

    /// Spot count. Records the signed variance between book and counted
    /// quantities; never adjusts stock on hand.
    #[instrument(skip(self))]
    pub async fn check(
        &self,
        item_id: Uuid,
        expected_quantity: Decimal,
        actual_quantity: Decimal,
        employee_id: Uuid,
        check_date: NaiveDate,
    ) -> Result<inventory_checks::Model, ServiceError> {
        if expected_quantity < Decimal::ZERO || actual_quantity < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Check quantities cannot be negative".into(),
            ));
        }

        let txn = self.db_pool.begin().await?;

        let item = find_item(&txn, item_id).await?;
        let variance_percent = if expected_quantity.is_zero() {
            warn!(%item_id, "Expected quantity is zero; variance percent undefined, storing 0");
            Decimal::ZERO
        } else {
            ((actual_quantity - expected_quantity) / expected_quantity * dec!(100))
                .round_dp(VALUE_DP)
        };

        let check = inventory_checks::ActiveModel {
            id: Set(Uuid::new_v4()),
            item_id: Set(item_id),
            employee_id: Set(employee_id),
            expected_quantity: Set(expected_quantity.round_dp(QUANTITY_DP)),
            actual_quantity: Set(actual_quantity.round_dp(QUANTITY_DP)),
            variance_percent: Set(variance_percent),
            check_date: Set(check_date),
            created_at: Set(Utc::now().into()),
        };
        let check = check.insert(&txn).await?;

        if variance_percent >= CHECK_VARIANCE_FAULT_PERCENT {
            insights::record_fault(&txn, item.location_id).await?;
        }

        txn.commit().await?;

        info!(check_id = %check.id, %variance_percent, "Inventory check recorded");
        self.event_sender
            .send(Event::InventoryCheckRecorded {
                check_id: check.id,
                variance_percent,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(check)
    }

    #[instrument(skip(self))]
    pub async fn get_item(&self, item_id: Uuid) -> Result<inventory_items::Model, ServiceError> {
        find_item(self.db_pool.as_ref(), item_id).await
    }
}
