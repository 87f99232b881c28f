use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // menu_orders
        manager
            .create_table(
                Table::create()
                    .table(MenuOrders::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MenuOrders::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(MenuOrders::MenuItemId).uuid().not_null())
                    .col(
                        ColumnDef::new(MenuOrders::InternalLocationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MenuOrders::Quantity).integer().not_null())
                    .col(
                        ColumnDef::new(MenuOrders::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(MenuOrders::OrderedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MenuOrders::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_menu_orders_internal_location_status")
                    .table(MenuOrders::Table)
                    .col(MenuOrders::InternalLocationId)
                    .col(MenuOrders::Status)
                    .to_owned(),
            )
            .await?;

        // menu_order_add_ons
        manager
            .create_table(
                Table::create()
                    .table(MenuOrderAddOns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MenuOrderAddOns::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MenuOrderAddOns::MenuOrderId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MenuOrderAddOns::AddOnId).uuid().not_null())
                    .col(
                        ColumnDef::new(MenuOrderAddOns::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_menu_order_add_ons_order")
                            .from(MenuOrderAddOns::Table, MenuOrderAddOns::MenuOrderId)
                            .to(MenuOrders::Table, MenuOrders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_menu_order_add_ons_order_id")
                    .table(MenuOrderAddOns::Table)
                    .col(MenuOrderAddOns::MenuOrderId)
                    .to_owned(),
            )
            .await?;

        // payments
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Payments::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Payments::LocationId).uuid().not_null())
                    .col(
                        ColumnDef::new(Payments::InternalLocationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Payments::EmployeeId).uuid().not_null())
                    .col(ColumnDef::new(Payments::LineItems).json().not_null())
                    .col(ColumnDef::new(Payments::Subtotal).decimal().not_null())
                    .col(ColumnDef::new(Payments::TipPercent).decimal().not_null())
                    .col(
                        ColumnDef::new(Payments::ServiceChargePercent)
                            .decimal()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Payments::TotalBill).decimal().not_null())
                    .col(ColumnDef::new(Payments::Category).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Payments::PaymentType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Payments::PaidAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Payments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_location_id")
                    .table(Payments::Table)
                    .col(Payments::LocationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_paid_at")
                    .table(Payments::Table)
                    .col(Payments::PaidAt)
                    .to_owned(),
            )
            .await?;

        // tip_records
        manager
            .create_table(
                Table::create()
                    .table(TipRecords::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TipRecords::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(TipRecords::EmployeeId).uuid().not_null())
                    .col(ColumnDef::new(TipRecords::LocationId).uuid().not_null())
                    .col(
                        ColumnDef::new(TipRecords::InternalLocationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TipRecords::DailyShiftId).uuid().not_null())
                    .col(ColumnDef::new(TipRecords::PaymentId).uuid().not_null())
                    .col(ColumnDef::new(TipRecords::TipAmount).decimal().not_null())
                    .col(ColumnDef::new(TipRecords::Category).string_len(16).not_null())
                    .col(ColumnDef::new(TipRecords::TipDate).date().not_null())
                    .col(
                        ColumnDef::new(TipRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tip_records_payment")
                            .from(TipRecords::Table, TipRecords::PaymentId)
                            .to(Payments::Table, Payments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tip_records_location_date")
                    .table(TipRecords::Table)
                    .col(TipRecords::LocationId)
                    .col(TipRecords::TipDate)
                    .to_owned(),
            )
            .await?;

        // tip_pools
        manager
            .create_table(
                Table::create()
                    .table(TipPools::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TipPools::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(TipPools::LocationId).uuid().not_null())
                    .col(ColumnDef::new(TipPools::PoolDate).date().not_null())
                    .col(ColumnDef::new(TipPools::Mode).string_len(16).not_null())
                    .col(ColumnDef::new(TipPools::TotalPool).decimal().not_null())
                    .col(ColumnDef::new(TipPools::Participants).json().not_null())
                    .col(
                        ColumnDef::new(TipPools::TotalHoursWorked)
                            .decimal()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TipPools::TipPerHour).decimal().not_null())
                    .col(
                        ColumnDef::new(TipPools::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tip_pools_location_date")
                    .table(TipPools::Table)
                    .col(TipPools::LocationId)
                    .col(TipPools::PoolDate)
                    .to_owned(),
            )
            .await?;

        // tip_payouts
        manager
            .create_table(
                Table::create()
                    .table(TipPayouts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TipPayouts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(TipPayouts::TipPoolId).uuid().not_null())
                    .col(ColumnDef::new(TipPayouts::EmployeeId).uuid().not_null())
                    .col(
                        ColumnDef::new(TipPayouts::PayoutAmount)
                            .decimal()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TipPayouts::TipPerHour).decimal().not_null())
                    .col(ColumnDef::new(TipPayouts::HoursWorked).decimal().not_null())
                    .col(ColumnDef::new(TipPayouts::PayoutDate).date().not_null())
                    .col(
                        ColumnDef::new(TipPayouts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tip_payouts_pool")
                            .from(TipPayouts::Table, TipPayouts::TipPoolId)
                            .to(TipPools::Table, TipPools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tip_payouts_pool_id")
                    .table(TipPayouts::Table)
                    .col(TipPayouts::TipPoolId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TipPayouts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TipPools::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TipRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MenuOrderAddOns::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MenuOrders::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum MenuOrders {
    Table,
    Id,
    MenuItemId,
    InternalLocationId,
    Quantity,
    Status,
    OrderedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum MenuOrderAddOns {
    Table,
    Id,
    MenuOrderId,
    AddOnId,
    CreatedAt,
}

#[derive(Iden)]
enum Payments {
    Table,
    Id,
    LocationId,
    InternalLocationId,
    EmployeeId,
    LineItems,
    Subtotal,
    TipPercent,
    ServiceChargePercent,
    TotalBill,
    Category,
    PaymentType,
    PaidAt,
    CreatedAt,
}

#[derive(Iden)]
enum TipRecords {
    Table,
    Id,
    EmployeeId,
    LocationId,
    InternalLocationId,
    DailyShiftId,
    PaymentId,
    TipAmount,
    Category,
    TipDate,
    CreatedAt,
}

#[derive(Iden)]
enum TipPools {
    Table,
    Id,
    LocationId,
    PoolDate,
    Mode,
    TotalPool,
    Participants,
    TotalHoursWorked,
    TipPerHour,
    CreatedAt,
}

#[derive(Iden)]
enum TipPayouts {
    Table,
    Id,
    TipPoolId,
    EmployeeId,
    PayoutAmount,
    TipPerHour,
    HoursWorked,
    PayoutDate,
    CreatedAt,
}
