use crate::{
    db::DbPool,
    entities::{
        add_ons::{self, Entity as AddOns},
        menu_engineering_reports::{self, MenuEngineeringMatrix},
        menu_item_add_ons,
        menu_items::{self, Course, Entity as MenuItems},
        payments::{self, Entity as Payments},
        recipe_ingredients::{self, Entity as RecipeIngredients},
        recipes::{self, Entity as Recipes},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::inventory::find_item,
};
use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// Trailing window scanned when classifying menu items.
const MENU_ENGINEERING_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Validate)]
pub struct CreateRecipeRequest {
    pub region_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    /// Minutes.
    #[validate(range(min = 0))]
    pub preparation_time: i32,
    #[validate(range(min = 0))]
    pub cooking_time: i32,
    #[validate(range(min = 0))]
    pub dishing_up_time: i32,
    pub cooking_temperature: Option<String>,
    pub quality_standards: Option<String>,
    pub serving_size: Option<String>,
    /// (inventory item, quantity consumed per portion)
    pub ingredients: Vec<(Uuid, Decimal)>,
}

#[derive(Debug, Clone, Validate)]
pub struct CreateMenuItemRequest {
    pub location_id: Uuid,
    pub recipe_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub price: Decimal,
    pub course: Course,
    pub available: bool,
    /// Add-ons offered with this item.
    pub add_on_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Validate)]
pub struct CreateAddOnRequest {
    pub location_id: Uuid,
    pub item_id: Uuid,
    #[validate(length(min = 1, max = 249))]
    pub name: String,
    pub additional_quantity: Decimal,
    pub additional_price: Decimal,
    pub available: bool,
}

/// Cost of one portion: ingredient quantities priced at each item's current
/// average unit cost.
pub(crate) async fn ingredient_cost<C: ConnectionTrait>(
    db: &C,
    recipe_id: Uuid,
) -> Result<Decimal, ServiceError> {
    let ingredients = RecipeIngredients::find()
        .filter(recipe_ingredients::Column::RecipeId.eq(recipe_id))
        .all(db)
        .await?;

    let mut cost = Decimal::ZERO;
    for ingredient in ingredients {
        let item = find_item(db, ingredient.item_id).await?;
        cost += ingredient.quantity * item.average_unit_price();
    }
    Ok(cost.round_dp(2))
}

/// Recipe and menu management plus the menu-engineering classification run.
#[derive(Clone)]
pub struct MenuService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl MenuService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_recipe(
        &self,
        request: CreateRecipeRequest,
    ) -> Result<recipes::Model, ServiceError> {
        request.validate()?;
        if request.ingredients.is_empty() {
            return Err(ServiceError::ValidationError(
                "A recipe needs at least one ingredient".into(),
            ));
        }
        for (_, quantity) in &request.ingredients {
            if *quantity <= Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "Ingredient quantities must be positive".into(),
                ));
            }
        }

        let txn = self.db_pool.begin().await?;

        let total_recipe_time =
            request.preparation_time + request.cooking_time + request.dishing_up_time;
        let recipe = recipes::ActiveModel {
            id: Set(Uuid::new_v4()),
            region_id: Set(request.region_id),
            name: Set(request.name.clone()),
            description: Set(request.description.clone()),
            preparation_time: Set(request.preparation_time),
            cooking_time: Set(request.cooking_time),
            dishing_up_time: Set(request.dishing_up_time),
            total_recipe_time: Set(total_recipe_time),
            cooking_temperature: Set(request.cooking_temperature.clone()),
            quality_standards: Set(request.quality_standards.clone()),
            serving_size: Set(request.serving_size.clone()),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };
        let recipe = recipe.insert(&txn).await?;

        for (item_id, quantity) in &request.ingredients {
            // Referenced item must exist before the line goes in.
            find_item(&txn, *item_id).await?;
            let line = recipe_ingredients::ActiveModel {
                id: Set(Uuid::new_v4()),
                recipe_id: Set(recipe.id),
                item_id: Set(*item_id),
                quantity: Set(quantity.round_dp(3)),
                created_at: Set(Utc::now().into()),
            };
            line.insert(&txn).await?;
        }

        txn.commit().await?;
        Ok(recipe)
    }

    /// Creates a menu item with its gross profit computed once, at creation,
    /// from the recipe's current ingredient cost.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_menu_item(
        &self,
        request: CreateMenuItemRequest,
    ) -> Result<menu_items::Model, ServiceError> {
        request.validate()?;
        if request.price <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Menu item price must be positive".into(),
            ));
        }

        let txn = self.db_pool.begin().await?;

        Recipes::find_by_id(request.recipe_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Recipe {} not found", request.recipe_id))
            })?;

        let cost = ingredient_cost(&txn, request.recipe_id).await?;
        let gross_profit = (request.price - cost).round_dp(2);

        let menu_item = menu_items::ActiveModel {
            id: Set(Uuid::new_v4()),
            location_id: Set(request.location_id),
            recipe_id: Set(request.recipe_id),
            name: Set(request.name.clone()),
            price: Set(request.price),
            course: Set(request.course),
            available: Set(request.available),
            gross_profit: Set(gross_profit),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };
        let menu_item = menu_item.insert(&txn).await?;

        for add_on_id in &request.add_on_ids {
            AddOns::find_by_id(*add_on_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Add-on {} not found", add_on_id))
                })?;
            let link = menu_item_add_ons::ActiveModel {
                id: Set(Uuid::new_v4()),
                menu_item_id: Set(menu_item.id),
                add_on_id: Set(*add_on_id),
                created_at: Set(Utc::now().into()),
            };
            link.insert(&txn).await?;
        }

        txn.commit().await?;

        self.event_sender
            .send(Event::MenuItemCreated(menu_item.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(menu_item)
    }

    /// Creates an add-on. The stored name gains the "Extra " prefix and the
    /// additional cost is the extra quantity at the backing item's current
    /// average unit price.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_add_on(
        &self,
        request: CreateAddOnRequest,
    ) -> Result<add_ons::Model, ServiceError> {
        request.validate()?;
        if request.additional_quantity <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Add-on quantity must be positive".into(),
            ));
        }
        if request.additional_price < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Add-on price cannot be negative".into(),
            ));
        }

        let txn = self.db_pool.begin().await?;

        let item = find_item(&txn, request.item_id).await?;
        let additional_cost =
            (request.additional_quantity * item.average_unit_price()).round_dp(2);

        let add_on = add_ons::ActiveModel {
            id: Set(Uuid::new_v4()),
            location_id: Set(request.location_id),
            item_id: Set(request.item_id),
            name: Set(format!("Extra {}", request.name)),
            additional_quantity: Set(request.additional_quantity.round_dp(3)),
            additional_price: Set(request.additional_price),
            additional_cost: Set(additional_cost),
            available: Set(request.available),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };
        let add_on = add_on.insert(&txn).await?;

        txn.commit().await?;
        Ok(add_on)
    }

    /// Classifies every menu item at the location into the menu engineering
    /// matrix for the trailing window ending at `report_date`. Sales figures
    /// are rebuilt from captured payment snapshots on every run.
    #[instrument(skip(self))]
    pub async fn generate_menu_engineering(
        &self,
        location_id: Uuid,
        report_date: NaiveDate,
    ) -> Result<Vec<menu_engineering_reports::Model>, ServiceError> {
        let db = self.db_pool.as_ref();

        let items = MenuItems::find()
            .filter(menu_items::Column::LocationId.eq(location_id))
            .all(db)
            .await?;
        if items.is_empty() {
            return Err(ServiceError::ValidationError(format!(
                "Location {} has no menu items to classify",
                location_id
            )));
        }

        let window_start = report_date - Duration::days(MENU_ENGINEERING_WINDOW_DAYS);
        let captured = Payments::find()
            .filter(payments::Column::LocationId.eq(location_id))
            .all(db)
            .await?;

        // (units sold, add-on revenue) per menu item, rebuilt from the
        // snapshots inside the window.
        let mut sold: HashMap<Uuid, i32> = HashMap::new();
        let mut add_on_revenue: HashMap<Uuid, Decimal> = HashMap::new();
        let mut add_on_cost: HashMap<Uuid, Decimal> = HashMap::new();
        for payment in &captured {
            let paid_on = payment.paid_at.date_naive();
            if paid_on < window_start || paid_on > report_date {
                continue;
            }
            let lines = payment.line_item_snapshots().map_err(|e| {
                ServiceError::InternalError(format!(
                    "Corrupt line-item snapshot on payment {}: {}",
                    payment.id, e
                ))
            })?;
            for line in lines {
                *sold.entry(line.menu_item_id).or_default() += line.quantity;
                for add_on in &line.add_ons {
                    let current = AddOns::find_by_id(add_on.add_on_id).one(db).await?;
                    let quantity = Decimal::from(line.quantity);
                    *add_on_revenue.entry(line.menu_item_id).or_default() +=
                        add_on.additional_price * quantity;
                    if let Some(current) = current {
                        *add_on_cost.entry(line.menu_item_id).or_default() +=
                            current.additional_cost * quantity;
                    }
                }
            }
        }

        // Revenue and COGS price the snapshot quantities at current menu
        // prices and current recipe costs.
        struct ItemFigures {
            menu_item_id: Uuid,
            number_sold: i32,
            total_revenue: Decimal,
            total_cogs: Decimal,
            gross_profit: Decimal,
        }

        let mut figures = Vec::with_capacity(items.len());
        for item in &items {
            let number_sold = sold.get(&item.id).copied().unwrap_or(0);
            let quantity = Decimal::from(number_sold);
            let unit_cost = ingredient_cost(db, item.recipe_id).await?;
            let total_revenue = (item.price * quantity
                + add_on_revenue.get(&item.id).copied().unwrap_or_default())
            .round_dp(2);
            let total_cogs = (unit_cost * quantity
                + add_on_cost.get(&item.id).copied().unwrap_or_default())
            .round_dp(2);
            figures.push(ItemFigures {
                menu_item_id: item.id,
                number_sold,
                total_revenue,
                total_cogs,
                gross_profit: total_revenue - total_cogs,
            });
        }

        let txn = self.db_pool.begin().await?;
        let mut reports = Vec::with_capacity(figures.len());
        for figure in &figures {
            let others: Vec<&ItemFigures> = figures
                .iter()
                .filter(|other| other.menu_item_id != figure.menu_item_id)
                .collect();
            let matrix = if others.is_empty() {
                warn!(menu_item_id = %figure.menu_item_id, "Single menu item; no peers to compare against");
                MenuEngineeringMatrix::InsufficientData
            } else {
                let count = Decimal::from(others.len());
                let mean_sold = others
                    .iter()
                    .map(|other| Decimal::from(other.number_sold))
                    .sum::<Decimal>()
                    / count;
                let mean_profit = others
                    .iter()
                    .map(|other| other.gross_profit)
                    .sum::<Decimal>()
                    / count;
                classify(
                    Decimal::from(figure.number_sold),
                    figure.gross_profit,
                    mean_sold,
                    mean_profit,
                )
            };

            let report = menu_engineering_reports::ActiveModel {
                id: Set(Uuid::new_v4()),
                location_id: Set(location_id),
                menu_item_id: Set(figure.menu_item_id),
                total_revenue: Set(figure.total_revenue),
                total_cogs: Set(figure.total_cogs),
                gross_profit: Set(figure.gross_profit),
                number_sold: Set(figure.number_sold),
                matrix: Set(matrix),
                report_date: Set(report_date),
                created_at: Set(Utc::now().into()),
            };
            reports.push(report.insert(&txn).await?);
        }
        txn.commit().await?;

        info!(%location_id, item_count = reports.len(), "Menu engineering generated");
        self.event_sender
            .send(Event::MenuEngineeringGenerated {
                location_id,
                item_count: reports.len(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(reports)
    }
}

/// Matrix cell for one item against the mean of its peers. Ties on either
/// axis yield InsufficientData.
fn classify(
    sold: Decimal,
    profit: Decimal,
    mean_sold: Decimal,
    mean_profit: Decimal,
) -> MenuEngineeringMatrix {
    if sold == mean_sold || profit == mean_profit {
        return MenuEngineeringMatrix::InsufficientData;
    }
    match (sold > mean_sold, profit > mean_profit) {
        (true, true) => MenuEngineeringMatrix::Star,
        (false, true) => MenuEngineeringMatrix::Puzzle,
        (true, false) => MenuEngineeringMatrix::PlowHorse,
        (false, false) => MenuEngineeringMatrix::Dog,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn classification_covers_all_quadrants() {
        assert_eq!(
            classify(dec!(10), dec!(8), dec!(5), dec!(4)),
            MenuEngineeringMatrix::Star
        );
        assert_eq!(
            classify(dec!(2), dec!(8), dec!(5), dec!(4)),
            MenuEngineeringMatrix::Puzzle
        );
        assert_eq!(
            classify(dec!(10), dec!(2), dec!(5), dec!(4)),
            MenuEngineeringMatrix::PlowHorse
        );
        assert_eq!(
            classify(dec!(2), dec!(2), dec!(5), dec!(4)),
            MenuEngineeringMatrix::Dog
        );
    }

    #[test]
    fn ties_are_insufficient_data() {
        assert_eq!(
            classify(dec!(5), dec!(8), dec!(5), dec!(4)),
            MenuEngineeringMatrix::InsufficientData
        );
        assert_eq!(
            classify(dec!(10), dec!(4), dec!(5), dec!(4)),
            MenuEngineeringMatrix::InsufficientData
        );
    }
}
