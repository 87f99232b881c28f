pub mod employees;
pub mod insights;
pub mod inventory;
pub mod menu;
pub mod orders;
pub mod payments;
pub mod performance;
pub mod procurement;
pub mod reports;
pub mod scheduling;
pub mod timeclock;
pub mod tips;
pub mod waste;

use crate::{db::DbPool, events::EventSender, locks::KeyedLocks};
use std::sync::Arc;

pub use employees::EmployeeService;
pub use insights::InsightService;
pub use inventory::InventoryService;
pub use menu::MenuService;
pub use orders::OrderService;
pub use payments::PaymentService;
pub use performance::PerformanceService;
pub use procurement::ProcurementService;
pub use reports::ReportService;
pub use scheduling::SchedulingService;
pub use timeclock::TimeclockService;
pub use tips::TipService;
pub use waste::MenuWasteService;

/// One instance of every engine service, sharing the connection pool, the
/// event channel, and a single keyed-lock registry so per-key serialization
/// holds across services.
#[derive(Clone)]
pub struct Services {
    pub employees: EmployeeService,
    pub insights: InsightService,
    pub inventory: InventoryService,
    pub menu: MenuService,
    pub orders: OrderService,
    pub payments: PaymentService,
    pub performance: PerformanceService,
    pub procurement: ProcurementService,
    pub reports: ReportService,
    pub scheduling: SchedulingService,
    pub timeclock: TimeclockService,
    pub tips: TipService,
    pub waste: MenuWasteService,
}

impl Services {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        let locks = KeyedLocks::new();
        Self {
            employees: EmployeeService::new(db_pool.clone(), event_sender.clone()),
            insights: InsightService::new(db_pool.clone(), event_sender.clone()),
            inventory: InventoryService::new(
                db_pool.clone(),
                event_sender.clone(),
                locks.clone(),
            ),
            menu: MenuService::new(db_pool.clone(), event_sender.clone()),
            orders: OrderService::new(db_pool.clone(), event_sender.clone(), locks.clone()),
            payments: PaymentService::new(db_pool.clone(), event_sender.clone(), locks.clone()),
            performance: PerformanceService::new(db_pool.clone()),
            procurement: ProcurementService::new(
                db_pool.clone(),
                event_sender.clone(),
                locks.clone(),
            ),
            reports: ReportService::new(db_pool.clone(), event_sender.clone()),
            scheduling: SchedulingService::new(db_pool.clone(), event_sender.clone()),
            timeclock: TimeclockService::new(db_pool.clone(), event_sender.clone(), locks),
            tips: TipService::new(db_pool.clone(), event_sender.clone()),
            waste: MenuWasteService::new(db_pool, event_sender),
        }
    }
}
