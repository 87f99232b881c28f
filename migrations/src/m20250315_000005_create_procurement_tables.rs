use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // vendors
        manager
            .create_table(
                Table::create()
                    .table(Vendors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Vendors::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Vendors::LocationId).uuid().not_null())
                    .col(ColumnDef::new(Vendors::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Vendors::ContactPerson).string_len(255))
                    .col(ColumnDef::new(Vendors::Email).string_len(255))
                    .col(ColumnDef::new(Vendors::PhoneNumber).string_len(32))
                    .col(ColumnDef::new(Vendors::Address).string_len(255))
                    .col(
                        ColumnDef::new(Vendors::Preferred)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Vendors::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Vendors::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vendors_location_id")
                    .table(Vendors::Table)
                    .col(Vendors::LocationId)
                    .to_owned(),
            )
            .await?;

        // purchase_orders
        manager
            .create_table(
                Table::create()
                    .table(PurchaseOrders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PurchaseOrders::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PurchaseOrders::LocationId).uuid().not_null())
                    .col(ColumnDef::new(PurchaseOrders::VendorId).uuid().not_null())
                    .col(ColumnDef::new(PurchaseOrders::ItemId).uuid().not_null())
                    .col(
                        ColumnDef::new(PurchaseOrders::UnitPrice)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::OrderedQuantity)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::TotalOrderValue)
                            .decimal()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PurchaseOrders::OrderDate).date().not_null())
                    .col(
                        ColumnDef::new(PurchaseOrders::ExpectedArrivalDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PurchaseOrders::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_orders_vendor")
                            .from(PurchaseOrders::Table, PurchaseOrders::VendorId)
                            .to(Vendors::Table, Vendors::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_purchase_orders_location_item")
                    .table(PurchaseOrders::Table)
                    .col(PurchaseOrders::LocationId)
                    .col(PurchaseOrders::ItemId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_purchase_orders_order_date")
                    .table(PurchaseOrders::Table)
                    .col(PurchaseOrders::OrderDate)
                    .to_owned(),
            )
            .await?;

        // purchase_receipts
        manager
            .create_table(
                Table::create()
                    .table(PurchaseReceipts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PurchaseReceipts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PurchaseReceipts::PurchaseOrderId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseReceipts::ReceivedQuantity)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseReceipts::ReceivedDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseReceipts::QuantityVariance)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseReceipts::QuantityVariancePercent)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseReceipts::ValueVariance)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseReceipts::ValueVariancePercent)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseReceipts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_receipts_order")
                            .from(PurchaseReceipts::Table, PurchaseReceipts::PurchaseOrderId)
                            .to(PurchaseOrders::Table, PurchaseOrders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_purchase_receipts_order_id")
                    .table(PurchaseReceipts::Table)
                    .col(PurchaseReceipts::PurchaseOrderId)
                    .to_owned(),
            )
            .await?;

        // purchase_alerts
        manager
            .create_table(
                Table::create()
                    .table(PurchaseAlerts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PurchaseAlerts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PurchaseAlerts::PurchaseOrderId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseAlerts::AlertType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(PurchaseAlerts::Message).text().not_null())
                    .col(ColumnDef::new(PurchaseAlerts::AlertDate).date().not_null())
                    .col(
                        ColumnDef::new(PurchaseAlerts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_alerts_order")
                            .from(PurchaseAlerts::Table, PurchaseAlerts::PurchaseOrderId)
                            .to(PurchaseOrders::Table, PurchaseOrders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_purchase_alerts_order_id")
                    .table(PurchaseAlerts::Table)
                    .col(PurchaseAlerts::PurchaseOrderId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PurchaseAlerts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PurchaseReceipts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PurchaseOrders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vendors::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum Vendors {
    Table,
    Id,
    LocationId,
    Name,
    ContactPerson,
    Email,
    PhoneNumber,
    Address,
    Preferred,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum PurchaseOrders {
    Table,
    Id,
    LocationId,
    VendorId,
    ItemId,
    UnitPrice,
    OrderedQuantity,
    TotalOrderValue,
    OrderDate,
    ExpectedArrivalDate,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum PurchaseReceipts {
    Table,
    Id,
    PurchaseOrderId,
    ReceivedQuantity,
    ReceivedDate,
    QuantityVariance,
    QuantityVariancePercent,
    ValueVariance,
    ValueVariancePercent,
    CreatedAt,
}

#[derive(Iden)]
enum PurchaseAlerts {
    Table,
    Id,
    PurchaseOrderId,
    AlertType,
    Message,
    AlertDate,
    CreatedAt,
}
