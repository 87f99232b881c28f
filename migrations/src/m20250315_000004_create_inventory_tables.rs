use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // inventory_items
        manager
            .create_table(
                Table::create()
                    .table(InventoryItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InventoryItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(InventoryItems::LocationId).uuid().not_null())
                    .col(
                        ColumnDef::new(InventoryItems::Name)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryItems::ItemType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryItems::Quantity)
                            .decimal()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(InventoryItems::Unit).string_len(8).not_null())
                    .col(ColumnDef::new(InventoryItems::ParLevel).decimal())
                    .col(
                        ColumnDef::new(InventoryItems::TotalValue)
                            .decimal()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(InventoryItems::Barcode).string_len(64))
                    .col(
                        ColumnDef::new(InventoryItems::SafetyStock)
                            .decimal()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(InventoryItems::DeliveriesPerWeek)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(InventoryItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InventoryItems::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_inventory_items_location_name")
                    .table(InventoryItems::Table)
                    .col(InventoryItems::LocationId)
                    .col(InventoryItems::Name)
                    .to_owned(),
            )
            .await?;

        // inventory_checks
        manager
            .create_table(
                Table::create()
                    .table(InventoryChecks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InventoryChecks::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(InventoryChecks::ItemId).uuid().not_null())
                    .col(ColumnDef::new(InventoryChecks::EmployeeId).uuid().not_null())
                    .col(
                        ColumnDef::new(InventoryChecks::ExpectedQuantity)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryChecks::ActualQuantity)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryChecks::VariancePercent)
                            .decimal()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InventoryChecks::CheckDate).date().not_null())
                    .col(
                        ColumnDef::new(InventoryChecks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_checks_item")
                            .from(InventoryChecks::Table, InventoryChecks::ItemId)
                            .to(InventoryItems::Table, InventoryItems::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_inventory_checks_item_id")
                    .table(InventoryChecks::Table)
                    .col(InventoryChecks::ItemId)
                    .to_owned(),
            )
            .await?;

        // inventory_transfers
        manager
            .create_table(
                Table::create()
                    .table(InventoryTransfers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InventoryTransfers::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(InventoryTransfers::ItemId).uuid().not_null())
                    .col(
                        ColumnDef::new(InventoryTransfers::SourceLocationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryTransfers::DestinationLocationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryTransfers::Quantity)
                            .decimal()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InventoryTransfers::TransferCost).decimal())
                    .col(
                        ColumnDef::new(InventoryTransfers::TransferDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryTransfers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_inventory_transfers_source_location")
                    .table(InventoryTransfers::Table)
                    .col(InventoryTransfers::SourceLocationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_inventory_transfers_transfer_date")
                    .table(InventoryTransfers::Table)
                    .col(InventoryTransfers::TransferDate)
                    .to_owned(),
            )
            .await?;

        // inventory_waste
        manager
            .create_table(
                Table::create()
                    .table(InventoryWaste::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InventoryWaste::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(InventoryWaste::LocationId).uuid().not_null())
                    .col(ColumnDef::new(InventoryWaste::ItemId).uuid().not_null())
                    .col(
                        ColumnDef::new(InventoryWaste::QuantityWasted)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryWaste::MoneyWasted)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryWaste::Reason)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(InventoryWaste::WasteDate).date().not_null())
                    .col(ColumnDef::new(InventoryWaste::CulpritEmployeeId).uuid())
                    .col(ColumnDef::new(InventoryWaste::ReportedById).uuid())
                    .col(ColumnDef::new(InventoryWaste::Comments).text())
                    .col(
                        ColumnDef::new(InventoryWaste::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_waste_item")
                            .from(InventoryWaste::Table, InventoryWaste::ItemId)
                            .to(InventoryItems::Table, InventoryItems::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_inventory_waste_location_date")
                    .table(InventoryWaste::Table)
                    .col(InventoryWaste::LocationId)
                    .col(InventoryWaste::WasteDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InventoryWaste::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InventoryTransfers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InventoryChecks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InventoryItems::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum InventoryItems {
    Table,
    Id,
    LocationId,
    Name,
    ItemType,
    Quantity,
    Unit,
    ParLevel,
    TotalValue,
    Barcode,
    SafetyStock,
    DeliveriesPerWeek,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum InventoryChecks {
    Table,
    Id,
    ItemId,
    EmployeeId,
    ExpectedQuantity,
    ActualQuantity,
    VariancePercent,
    CheckDate,
    CreatedAt,
}

#[derive(Iden)]
enum InventoryTransfers {
    Table,
    Id,
    ItemId,
    SourceLocationId,
    DestinationLocationId,
    Quantity,
    TransferCost,
    TransferDate,
    CreatedAt,
}

#[derive(Iden)]
enum InventoryWaste {
    Table,
    Id,
    LocationId,
    ItemId,
    QuantityWasted,
    MoneyWasted,
    Reason,
    WasteDate,
    CulpritEmployeeId,
    ReportedById,
    Comments,
    CreatedAt,
}
