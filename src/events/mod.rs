use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

// Define the various events that can occur in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Staff events
    EmployeeCreated(Uuid),
    ShiftScheduled(Uuid),
    ShiftSwapped {
        schedule_id: Uuid,
        from_employee: Uuid,
        to_employee: Uuid,
    },
    ShiftPunchedIn {
        daily_shift_id: Uuid,
        status: String,
    },
    ShiftPunchedOut {
        daily_shift_id: Uuid,
        status: String,
        hours_worked: Decimal,
        earnings: Decimal,
    },
    ShiftMissed(Uuid),
    BreakRecorded {
        daily_shift_id: Uuid,
        duration_hours: i32,
    },

    // Inventory events
    InventoryReceived {
        item_id: Uuid,
        quantity: Decimal,
    },
    InventoryConsumed {
        item_id: Uuid,
        quantity: Decimal,
    },
    InventoryWasted {
        item_id: Uuid,
        quantity: Decimal,
        money_wasted: Decimal,
        reason: String,
    },
    InventoryTransferred {
        source_item_id: Uuid,
        destination_item_id: Uuid,
        quantity: Decimal,
    },
    InventoryCheckRecorded {
        check_id: Uuid,
        variance_percent: Decimal,
    },

    // Procurement events
    PurchaseOrderCreated(Uuid),
    PurchaseOrderReceived {
        order_id: Uuid,
        receipt_id: Uuid,
    },
    PurchaseAlertRaised {
        order_id: Uuid,
        alert_type: String,
    },

    // Menu and point-of-sale events
    MenuItemCreated(Uuid),
    MenuOrderStatusChanged {
        order_id: Uuid,
        old_status: String,
        new_status: String,
    },
    MenuWasteRecorded {
        menu_item_id: Uuid,
        weight: Decimal,
    },
    PaymentCaptured {
        payment_id: Uuid,
        total_bill: Decimal,
    },
    TipRecorded {
        employee_id: Uuid,
        amount: Decimal,
    },
    TipPoolCalculated {
        pool_id: Uuid,
        tip_per_hour: Decimal,
    },
    TipPayoutsSent {
        pool_id: Uuid,
        payout_count: usize,
    },

    // Reporting events
    CostReportGenerated(Uuid),
    UsageReportGenerated(Uuid),
    MenuEngineeringGenerated {
        location_id: Uuid,
        item_count: usize,
    },
    TrainingFaultRecorded {
        location_id: Uuid,
        fault_count: i32,
    },
}

// Function to process incoming events. This is the observability seam for the
// collaborator layer: every derived-state change surfaces here as a log line.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::ShiftPunchedOut {
                daily_shift_id,
                status,
                hours_worked,
                earnings,
            } => {
                info!(
                    daily_shift_id = %daily_shift_id,
                    status = %status,
                    hours_worked = %hours_worked,
                    earnings = %earnings,
                    "Shift punched out"
                );
            }
            Event::InventoryWasted {
                item_id,
                quantity,
                money_wasted,
                reason,
            } => {
                warn!(
                    item_id = %item_id,
                    quantity = %quantity,
                    money_wasted = %money_wasted,
                    reason = %reason,
                    "Inventory written off"
                );
            }
            Event::PurchaseAlertRaised {
                order_id,
                alert_type,
            } => {
                warn!(order_id = %order_id, alert_type = %alert_type, "Purchase alert raised");
            }
            Event::TrainingFaultRecorded {
                location_id,
                fault_count,
            } => {
                warn!(
                    location_id = %location_id,
                    fault_count = fault_count,
                    "Training fault recorded"
                );
            }
            Event::PaymentCaptured {
                payment_id,
                total_bill,
            } => {
                info!(payment_id = %payment_id, total_bill = %total_bill, "Payment captured");
            }
            other => {
                info!("Received event: {:?}", other);
            }
        }
    }

    info!("Event processing loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_delivers_to_receiver() {
        let (tx, mut rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);

        sender
            .send(Event::EmployeeCreated(Uuid::nil()))
            .await
            .expect("send succeeds");

        match rx.recv().await {
            Some(Event::EmployeeCreated(id)) => assert_eq!(id, Uuid::nil()),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_fails_after_receiver_drop() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);

        let result = sender.send(Event::ShiftMissed(Uuid::nil())).await;
        assert!(result.is_err());
    }
}
