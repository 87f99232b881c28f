use crate::{
    db::DbPool,
    entities::{
        accounting_periods::{self, Entity as AccountingPeriods},
        cost_reports::{self, Entity as CostReports},
        inventory_items::{self, Entity as InventoryItems},
        inventory_transfers::{self, Entity as InventoryTransfers},
        inventory_waste::{self, Entity as InventoryWaste},
        locations::Entity as Locations,
        payments::{self, Entity as Payments},
        purchase_orders::{self, Entity as PurchaseOrders},
        usage_reports::{self, Entity as UsageReports},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{insights, inventory},
};
use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// COGS or usage variance at or above this percentage raises a training
/// fault.
const REPORT_VARIANCE_FAULT_PERCENT: Decimal = dec!(10);

fn period_day_range(
    start: NaiveDate,
    end_inclusive: NaiveDate,
) -> (sea_orm::prelude::DateTimeWithTimeZone, sea_orm::prelude::DateTimeWithTimeZone) {
    let from = Utc.from_utc_datetime(&start.and_time(NaiveTime::MIN));
    let to = Utc.from_utc_datetime(&(end_inclusive + Duration::days(1)).and_time(NaiveTime::MIN));
    (from.into(), to.into())
}

/// variance / denominator * 100, or 0 with the `undefined` flag set when the
/// denominator is zero.
fn variance_percent(variance: Decimal, denominator: Decimal) -> (Decimal, bool) {
    if denominator.is_zero() {
        (Decimal::ZERO, true)
    } else {
        ((variance / denominator * dec!(100)).round_dp(2), false)
    }
}

async fn period_for_region<C: ConnectionTrait>(
    db: &C,
    region_id: Uuid,
    report_date: NaiveDate,
) -> Result<accounting_periods::Model, ServiceError> {
    AccountingPeriods::find()
        .filter(accounting_periods::Column::RegionId.eq(region_id))
        .filter(accounting_periods::Column::StartDate.lte(report_date))
        .filter(accounting_periods::Column::EndDate.gte(report_date))
        .one(db)
        .await?
        .ok_or_else(|| {
            ServiceError::ValidationError(format!(
                "No accounting period contains {} for region {}",
                report_date, region_id
            ))
        })
}

async fn previous_period<C: ConnectionTrait>(
    db: &C,
    period: &accounting_periods::Model,
) -> Result<Option<accounting_periods::Model>, ServiceError> {
    Ok(AccountingPeriods::find()
        .filter(accounting_periods::Column::RegionId.eq(period.region_id))
        .filter(accounting_periods::Column::EndDate.lt(period.start_date))
        .order_by_desc(accounting_periods::Column::EndDate)
        .one(db)
        .await?)
}

/// Period accounting: location-wide COGS reports and per-item usage reports.
/// Opening figures chain from the previous period's closing row; closing
/// figures exist only on the end-of-period row.
#[derive(Clone)]
pub struct ReportService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl ReportService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self))]
    pub async fn generate_cost_report(
        &self,
        location_id: Uuid,
        report_date: NaiveDate,
    ) -> Result<cost_reports::Model, ServiceError> {
        let txn = self.db_pool.begin().await?;

        let location = Locations::find_by_id(location_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Location {} not found", location_id))
            })?;
        let period = period_for_region(&txn, location.region_id, report_date).await?;

        let live_value: Decimal = InventoryItems::find()
            .filter(inventory_items::Column::LocationId.eq(location_id))
            .all(&txn)
            .await?
            .iter()
            .map(|item| item.total_value)
            .sum();

        let opening = self
            .cost_opening(&txn, location_id, &period, report_date, live_value)
            .await?;

        let (from, to) = period_day_range(period.start_date, report_date);
        let purchases: Decimal = PurchaseOrders::find()
            .filter(purchase_orders::Column::LocationId.eq(location_id))
            .filter(purchase_orders::Column::OrderDate.gte(period.start_date))
            .filter(purchase_orders::Column::OrderDate.lte(report_date))
            .all(&txn)
            .await?
            .iter()
            .map(|order| order.total_order_value)
            .sum();
        let wastage: Decimal = InventoryWaste::find()
            .filter(inventory_waste::Column::LocationId.eq(location_id))
            .filter(inventory_waste::Column::WasteDate.gte(period.start_date))
            .filter(inventory_waste::Column::WasteDate.lte(report_date))
            .all(&txn)
            .await?
            .iter()
            .map(|row| row.money_wasted)
            .sum();
        let revenue: Decimal = Payments::find()
            .filter(payments::Column::LocationId.eq(location_id))
            .filter(payments::Column::PaidAt.gte(from))
            .filter(payments::Column::PaidAt.lt(to))
            .all(&txn)
            .await?
            .iter()
            .map(|payment| payment.total_bill)
            .sum();
        let transfer_count = InventoryTransfers::find()
            .filter(
                inventory_transfers::Column::SourceLocationId
                    .eq(location_id)
                    .or(inventory_transfers::Column::DestinationLocationId.eq(location_id)),
            )
            .filter(inventory_transfers::Column::TransferDate.gte(period.start_date))
            .filter(inventory_transfers::Column::TransferDate.lte(report_date))
            .all(&txn)
            .await?
            .len() as i32;

        let at_period_end = report_date == period.end_date;
        let report = if at_period_end {
            let closing = live_value;
            let theoretical = (opening + purchases - closing).round_dp(2);
            let actual = (theoretical + wastage).round_dp(2);
            let variance = (actual - theoretical).round_dp(2);
            let (percent, undefined) = variance_percent(variance, theoretical);
            if undefined {
                warn!(%location_id, "Theoretical COGS is zero; variance percent undefined, storing 0");
            }
            cost_reports::ActiveModel {
                id: Set(Uuid::new_v4()),
                location_id: Set(location_id),
                period_id: Set(period.id),
                report_date: Set(report_date),
                opening_inventory_value: Set(opening.round_dp(2)),
                closing_inventory_value: Set(Some(closing.round_dp(2))),
                purchases_value: Set(purchases.round_dp(2)),
                wastage_value: Set(wastage.round_dp(2)),
                total_revenue: Set(revenue.round_dp(2)),
                theoretical_cogs: Set(Some(theoretical)),
                actual_cogs: Set(Some(actual)),
                current_cogs: Set(actual),
                cogs_variance: Set(variance),
                cogs_variance_percent: Set(percent),
                theoretical_gross_profit: Set((revenue - theoretical).round_dp(2)),
                actual_gross_profit: Set((revenue - actual).round_dp(2)),
                transfer_count: Set(transfer_count),
                variance_undefined: Set(undefined),
                created_at: Set(Utc::now().into()),
            }
        } else {
            let current = (opening + purchases - live_value + wastage).round_dp(2);
            let variance = wastage.round_dp(2);
            let (percent, undefined) = variance_percent(variance, current - wastage);
            if undefined {
                warn!(%location_id, "Current COGS net of wastage is zero; variance percent undefined, storing 0");
            }
            cost_reports::ActiveModel {
                id: Set(Uuid::new_v4()),
                location_id: Set(location_id),
                period_id: Set(period.id),
                report_date: Set(report_date),
                opening_inventory_value: Set(opening.round_dp(2)),
                closing_inventory_value: Set(None),
                purchases_value: Set(purchases.round_dp(2)),
                wastage_value: Set(wastage.round_dp(2)),
                total_revenue: Set(revenue.round_dp(2)),
                theoretical_cogs: Set(None),
                actual_cogs: Set(None),
                current_cogs: Set(current),
                cogs_variance: Set(variance),
                cogs_variance_percent: Set(percent),
                theoretical_gross_profit: Set((revenue - (current - wastage)).round_dp(2)),
                actual_gross_profit: Set((revenue - current).round_dp(2)),
                transfer_count: Set(transfer_count),
                variance_undefined: Set(undefined),
                created_at: Set(Utc::now().into()),
            }
        };
        let report = report.insert(&txn).await?;

        if report.cogs_variance_percent >= REPORT_VARIANCE_FAULT_PERCENT {
            insights::record_fault(&txn, location_id).await?;
        }
        if report.actual_gross_profit <= Decimal::ZERO {
            insights::record_fault(&txn, location_id).await?;
        }

        txn.commit().await?;

        info!(report_id = %report.id, current_cogs = %report.current_cogs, "Cost report generated");
        self.event_sender
            .send(Event::CostReportGenerated(report.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(report)
    }

    /// Opening value for a cost report: the previous period's closing row,
    /// then this period's earliest report, then the live sum.
    async fn cost_opening<C: ConnectionTrait>(
        &self,
        db: &C,
        location_id: Uuid,
        period: &accounting_periods::Model,
        report_date: NaiveDate,
        live_value: Decimal,
    ) -> Result<Decimal, ServiceError> {
        if let Some(previous) = previous_period(db, period).await? {
            let closed = CostReports::find()
                .filter(cost_reports::Column::LocationId.eq(location_id))
                .filter(cost_reports::Column::PeriodId.eq(previous.id))
                .filter(cost_reports::Column::ClosingInventoryValue.is_not_null())
                .order_by_desc(cost_reports::Column::ReportDate)
                .one(db)
                .await?;
            if let Some(closing) = closed.and_then(|report| report.closing_inventory_value) {
                return Ok(closing);
            }
        }
        if report_date > period.start_date {
            let earliest = CostReports::find()
                .filter(cost_reports::Column::LocationId.eq(location_id))
                .filter(cost_reports::Column::PeriodId.eq(period.id))
                .order_by_asc(cost_reports::Column::ReportDate)
                .one(db)
                .await?;
            if let Some(earliest) = earliest {
                return Ok(earliest.opening_inventory_value);
            }
        }
        Ok(live_value)
    }

    #[instrument(skip(self))]
    pub async fn generate_usage_report(
        &self,
        item_id: Uuid,
        report_date: NaiveDate,
    ) -> Result<usage_reports::Model, ServiceError> {
        let txn = self.db_pool.begin().await?;

        let item = inventory::find_item(&txn, item_id).await?;
        let location = Locations::find_by_id(item.location_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Location {} not found", item.location_id))
            })?;
        let period = period_for_region(&txn, location.region_id, report_date).await?;

        let (opening_quantity, opening_value) = self
            .usage_opening(&txn, &item, &period, report_date)
            .await?;

        let orders = PurchaseOrders::find()
            .filter(purchase_orders::Column::ItemId.eq(item_id))
            .filter(purchase_orders::Column::LocationId.eq(item.location_id))
            .filter(purchase_orders::Column::OrderDate.gte(period.start_date))
            .filter(purchase_orders::Column::OrderDate.lte(report_date))
            .all(&txn)
            .await?;
        let purchases_quantity: Decimal = orders.iter().map(|order| order.ordered_quantity).sum();
        let purchases_value: Decimal = orders.iter().map(|order| order.total_order_value).sum();

        let waste_rows = InventoryWaste::find()
            .filter(inventory_waste::Column::ItemId.eq(item_id))
            .filter(inventory_waste::Column::WasteDate.gte(period.start_date))
            .filter(inventory_waste::Column::WasteDate.lte(report_date))
            .all(&txn)
            .await?;
        let waste_quantity: Decimal = waste_rows.iter().map(|row| row.quantity_wasted).sum();
        let waste_value: Decimal = waste_rows.iter().map(|row| row.money_wasted).sum();

        let at_period_end = report_date == period.end_date;
        let report = if at_period_end {
            let theoretical_quantity =
                (opening_quantity + purchases_quantity - item.quantity).round_dp(3);
            let theoretical_value =
                (opening_value + purchases_value - item.total_value).round_dp(2);
            let actual_quantity = (theoretical_quantity + waste_quantity).round_dp(3);
            let actual_value = (theoretical_value + waste_value).round_dp(2);
            let variance = (actual_quantity - theoretical_quantity).round_dp(3);
            let (percent, undefined) = variance_percent(variance, theoretical_quantity);
            if undefined {
                warn!(%item_id, "Theoretical usage is zero; variance percent undefined, storing 0");
            }
            usage_reports::ActiveModel {
                id: Set(Uuid::new_v4()),
                item_id: Set(item_id),
                location_id: Set(item.location_id),
                period_id: Set(period.id),
                report_date: Set(report_date),
                opening_quantity: Set(opening_quantity.round_dp(3)),
                opening_value: Set(opening_value.round_dp(2)),
                closing_quantity: Set(Some(item.quantity)),
                closing_value: Set(Some(item.total_value)),
                purchases_quantity: Set(purchases_quantity.round_dp(3)),
                purchases_value: Set(purchases_value.round_dp(2)),
                waste_quantity: Set(waste_quantity.round_dp(3)),
                waste_value: Set(waste_value.round_dp(2)),
                theoretical_usage_quantity: Set(Some(theoretical_quantity)),
                theoretical_usage_value: Set(Some(theoretical_value)),
                actual_usage_quantity: Set(Some(actual_quantity)),
                actual_usage_value: Set(Some(actual_value)),
                current_usage_quantity: Set(actual_quantity),
                current_usage_value: Set(actual_value),
                usage_variance: Set(variance),
                usage_variance_percent: Set(percent),
                variance_undefined: Set(undefined),
                created_at: Set(Utc::now().into()),
            }
        } else {
            let current_quantity =
                (opening_quantity + purchases_quantity - item.quantity + waste_quantity)
                    .round_dp(3);
            let current_value =
                (opening_value + purchases_value - item.total_value + waste_value).round_dp(2);
            let variance = waste_quantity.round_dp(3);
            let (percent, undefined) =
                variance_percent(variance, current_quantity - waste_quantity);
            if undefined {
                warn!(%item_id, "Current usage net of waste is zero; variance percent undefined, storing 0");
            }
            usage_reports::ActiveModel {
                id: Set(Uuid::new_v4()),
                item_id: Set(item_id),
                location_id: Set(item.location_id),
                period_id: Set(period.id),
                report_date: Set(report_date),
                opening_quantity: Set(opening_quantity.round_dp(3)),
                opening_value: Set(opening_value.round_dp(2)),
                closing_quantity: Set(None),
                closing_value: Set(None),
                purchases_quantity: Set(purchases_quantity.round_dp(3)),
                purchases_value: Set(purchases_value.round_dp(2)),
                waste_quantity: Set(waste_quantity.round_dp(3)),
                waste_value: Set(waste_value.round_dp(2)),
                theoretical_usage_quantity: Set(None),
                theoretical_usage_value: Set(None),
                actual_usage_quantity: Set(None),
                actual_usage_value: Set(None),
                current_usage_quantity: Set(current_quantity),
                current_usage_value: Set(current_value),
                usage_variance: Set(variance),
                usage_variance_percent: Set(percent),
                variance_undefined: Set(undefined),
                created_at: Set(Utc::now().into()),
            }
        };
        let report = report.insert(&txn).await?;

        self.maybe_recompute_par_level(&txn, &item, &period, report_date, &report)
            .await?;

        if report.usage_variance_percent >= REPORT_VARIANCE_FAULT_PERCENT {
            insights::record_fault(&txn, item.location_id).await?;
        }

        txn.commit().await?;

        info!(
            report_id = %report.id,
            current_usage = %report.current_usage_quantity,
            "Usage report generated"
        );
        self.event_sender
            .send(Event::UsageReportGenerated(report.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(report)
    }

    async fn usage_opening<C: ConnectionTrait>(
        &self,
        db: &C,
        item: &inventory_items::Model,
        period: &accounting_periods::Model,
        report_date: NaiveDate,
    ) -> Result<(Decimal, Decimal), ServiceError> {
        if let Some(previous) = previous_period(db, period).await? {
            let closed = UsageReports::find()
                .filter(usage_reports::Column::ItemId.eq(item.id))
                .filter(usage_reports::Column::PeriodId.eq(previous.id))
                .filter(usage_reports::Column::ClosingQuantity.is_not_null())
                .order_by_desc(usage_reports::Column::ReportDate)
                .one(db)
                .await?;
            if let Some(report) = closed {
                if let (Some(quantity), Some(value)) =
                    (report.closing_quantity, report.closing_value)
                {
                    return Ok((quantity, value));
                }
            }
        }
        if report_date > period.start_date {
            let earliest = UsageReports::find()
                .filter(usage_reports::Column::ItemId.eq(item.id))
                .filter(usage_reports::Column::PeriodId.eq(period.id))
                .order_by_asc(usage_reports::Column::ReportDate)
                .one(db)
                .await?;
            if let Some(earliest) = earliest {
                return Ok((earliest.opening_quantity, earliest.opening_value));
            }
        }
        Ok((item.quantity, item.total_value))
    }

    /// At whole-week boundaries since period start, re-derives the item's
    /// par level from its usage rate. Items with no scheduled deliveries
    /// keep their old par level.
    async fn maybe_recompute_par_level<C: ConnectionTrait>(
        &self,
        db: &C,
        item: &inventory_items::Model,
        period: &accounting_periods::Model,
        report_date: NaiveDate,
        report: &usage_reports::Model,
    ) -> Result<(), ServiceError> {
        let days = (report_date - period.start_date).num_days();
        if days <= 0 || days % 7 != 0 {
            return Ok(());
        }
        if item.deliveries_per_week == 0 {
            warn!(item_id = %item.id, "Item has no scheduled deliveries; skipping par level recompute");
            return Ok(());
        }
        let weeks = Decimal::from(days / 7);
        let weekly_usage_rate = report.current_usage_quantity / weeks;
        let par_level = ((weekly_usage_rate + item.safety_stock)
            / Decimal::from(item.deliveries_per_week))
        .round_dp(3);

        let mut active: inventory_items::ActiveModel = item.clone().into();
        active.par_level = Set(Some(par_level));
        active.updated_at = Set(Some(Utc::now().into()));
        active.update(db).await?;

        info!(item_id = %item.id, %par_level, "Par level recomputed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variance_percent_divides_and_rounds() {
        let (percent, undefined) = variance_percent(dec!(5), dec!(40));
        assert_eq!(percent, dec!(12.5));
        assert!(!undefined);
    }

    #[test]
    fn variance_percent_flags_zero_denominator() {
        let (percent, undefined) = variance_percent(dec!(5), Decimal::ZERO);
        assert_eq!(percent, Decimal::ZERO);
        assert!(undefined);
    }
}
