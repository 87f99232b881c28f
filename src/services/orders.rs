use crate::{
    db::DbPool,
    entities::{
        add_ons::Entity as AddOns,
        internal_locations::Entity as InternalLocations,
        menu_items::Entity as MenuItems,
        menu_order_add_ons::{self, Entity as MenuOrderAddOns},
        menu_orders::{self, Entity as MenuOrders, MenuOrderStatus},
        recipe_ingredients::{self, Entity as RecipeIngredients},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    locks::{with_conflict_retry, KeyedLocks},
    services::inventory::{apply_consume, find_item},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateMenuOrderRequest {
    pub menu_item_id: Uuid,
    pub internal_location_id: Uuid,
    pub quantity: i32,
    pub add_on_ids: Vec<Uuid>,
}

/// Allowed transitions of an in-flight order line.
fn transition_allowed(from: MenuOrderStatus, to: MenuOrderStatus) -> bool {
    matches!(
        (from, to),
        (MenuOrderStatus::Pending, MenuOrderStatus::InProgress)
            | (MenuOrderStatus::InProgress, MenuOrderStatus::Completed)
            | (MenuOrderStatus::Pending, MenuOrderStatus::Recalled)
            | (MenuOrderStatus::InProgress, MenuOrderStatus::Recalled)
    )
}

/// Point-of-sale order lines. Advancing Pending -> InProgress consumes the
/// recipe's ingredients and each add-on's backing item, exactly once, inside
/// one transaction serialized on the order id.
#[derive(Clone)]
pub struct OrderService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
    locks: KeyedLocks,
}

impl OrderService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender, locks: KeyedLocks) -> Self {
        Self {
            db_pool,
            event_sender,
            locks,
        }
    }

    #[instrument(skip(self, request), fields(menu_item_id = %request.menu_item_id))]
    pub async fn create_menu_order(
        &self,
        request: CreateMenuOrderRequest,
    ) -> Result<menu_orders::Model, ServiceError> {
        if request.quantity <= 0 {
            return Err(ServiceError::ValidationError(
                "Order quantity must be positive".into(),
            ));
        }

        let txn = self.db_pool.begin().await?;

        MenuItems::find_by_id(request.menu_item_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Menu item {} not found", request.menu_item_id))
            })?;
        InternalLocations::find_by_id(request.internal_location_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Internal location {} not found",
                    request.internal_location_id
                ))
            })?;

        let order = menu_orders::ActiveModel {
            id: Set(Uuid::new_v4()),
            menu_item_id: Set(request.menu_item_id),
            internal_location_id: Set(request.internal_location_id),
            quantity: Set(request.quantity),
            status: Set(MenuOrderStatus::Pending),
            ordered_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };
        let order = order.insert(&txn).await?;

        for add_on_id in &request.add_on_ids {
            AddOns::find_by_id(*add_on_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Add-on {} not found", add_on_id))
                })?;
            let link = menu_order_add_ons::ActiveModel {
                id: Set(Uuid::new_v4()),
                menu_order_id: Set(order.id),
                add_on_id: Set(*add_on_id),
                created_at: Set(Utc::now().into()),
            };
            link.insert(&txn).await?;
        }

        txn.commit().await?;
        Ok(order)
    }

    #[instrument(skip(self))]
    pub async fn advance_order_status(
        &self,
        order_id: Uuid,
        new_status: MenuOrderStatus,
    ) -> Result<menu_orders::Model, ServiceError> {
        // A pickup draws down ingredient and add-on items, so those items
        // are locked alongside the order itself.
        let mut keys = vec![order_id];
        if new_status == MenuOrderStatus::InProgress {
            keys.extend(self.consumed_item_ids(order_id).await?);
        }
        let _guards = self.locks.acquire_many(keys).await;

        with_conflict_retry(|| Box::pin(self.advance_order_status_inner(order_id, new_status)))
            .await
    }

    /// Every inventory item the pickup of `order_id` will consume.
    async fn consumed_item_ids(&self, order_id: Uuid) -> Result<Vec<Uuid>, ServiceError> {
        let db = self.db_pool.as_ref();

        let order = MenuOrders::find_by_id(order_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Menu order {} not found", order_id)))?;
        let menu_item = MenuItems::find_by_id(order.menu_item_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Menu item {} not found", order.menu_item_id))
            })?;

        let mut item_ids: Vec<Uuid> = RecipeIngredients::find()
            .filter(recipe_ingredients::Column::RecipeId.eq(menu_item.recipe_id))
            .all(db)
            .await?
            .iter()
            .map(|ingredient| ingredient.item_id)
            .collect();
        for link in MenuOrderAddOns::find()
            .filter(menu_order_add_ons::Column::MenuOrderId.eq(order.id))
            .all(db)
            .await?
        {
            let add_on = AddOns::find_by_id(link.add_on_id)
                .one(db)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Add-on {} not found", link.add_on_id))
                })?;
            item_ids.push(add_on.item_id);
        }
        Ok(item_ids)
    }

    async fn advance_order_status_inner(
        &self,
        order_id: Uuid,
        new_status: MenuOrderStatus,
    ) -> Result<menu_orders::Model, ServiceError> {
        let txn = self.db_pool.begin().await?;

        let order = MenuOrders::find_by_id(order_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Menu order {} not found", order_id)))?;

        let old_status = order.status;
        if !transition_allowed(old_status, new_status) {
            return Err(ServiceError::InvalidStatus(format!(
                "Cannot move order {} from {} to {}",
                order_id, old_status, new_status
            )));
        }

        // Kitchen picks the order up: this is the single point where the
        // line draws down inventory.
        if new_status == MenuOrderStatus::InProgress {
            self.consume_for_order(&txn, &order).await?;
        }

        let mut active: menu_orders::ActiveModel = order.into();
        active.status = Set(new_status);
        active.updated_at = Set(Some(Utc::now().into()));
        let order = active.update(&txn).await?;

        txn.commit().await?;

        info!(%order_id, from = %old_status, to = %new_status, "Order status advanced");
        self.event_sender
            .send(Event::MenuOrderStatusChanged {
                order_id,
                old_status: old_status.to_string(),
                new_status: new_status.to_string(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(order)
    }

    async fn consume_for_order<C: ConnectionTrait>(
        &self,
        db: &C,
        order: &menu_orders::Model,
    ) -> Result<(), ServiceError> {
        let menu_item = MenuItems::find_by_id(order.menu_item_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Menu item {} not found", order.menu_item_id))
            })?;
        let quantity = Decimal::from(order.quantity);

        let ingredients = RecipeIngredients::find()
            .filter(recipe_ingredients::Column::RecipeId.eq(menu_item.recipe_id))
            .all(db)
            .await?;
        for ingredient in ingredients {
            let item = find_item(db, ingredient.item_id).await?;
            apply_consume(db, item, ingredient.quantity * quantity).await?;
        }

        let links = MenuOrderAddOns::find()
            .filter(menu_order_add_ons::Column::MenuOrderId.eq(order.id))
            .all(db)
            .await?;
        for link in links {
            let add_on = AddOns::find_by_id(link.add_on_id)
                .one(db)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Add-on {} not found", link.add_on_id))
                })?;
            let item = find_item(db, add_on.item_id).await?;
            apply_consume(db, item, add_on.additional_quantity * quantity).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_transitions_are_allowed() {
        assert!(transition_allowed(
            MenuOrderStatus::Pending,
            MenuOrderStatus::InProgress
        ));
        assert!(transition_allowed(
            MenuOrderStatus::InProgress,
            MenuOrderStatus::Completed
        ));
        assert!(transition_allowed(
            MenuOrderStatus::Pending,
            MenuOrderStatus::Recalled
        ));
        assert!(transition_allowed(
            MenuOrderStatus::InProgress,
            MenuOrderStatus::Recalled
        ));
    }

    #[test]
    fn backward_and_terminal_transitions_are_rejected() {
        assert!(!transition_allowed(
            MenuOrderStatus::Completed,
            MenuOrderStatus::Recalled
        ));
        assert!(!transition_allowed(
            MenuOrderStatus::Pending,
            MenuOrderStatus::Completed
        ));
        assert!(!transition_allowed(
            MenuOrderStatus::Recalled,
            MenuOrderStatus::Pending
        ));
        assert!(!transition_allowed(
            MenuOrderStatus::Completed,
            MenuOrderStatus::InProgress
        ));
    }
}
