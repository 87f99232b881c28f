use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // accounting_periods
        manager
            .create_table(
                Table::create()
                    .table(AccountingPeriods::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AccountingPeriods::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AccountingPeriods::RegionId).uuid().not_null())
                    .col(ColumnDef::new(AccountingPeriods::StartDate).date().not_null())
                    .col(ColumnDef::new(AccountingPeriods::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(AccountingPeriods::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_accounting_periods_region_start")
                    .table(AccountingPeriods::Table)
                    .col(AccountingPeriods::RegionId)
                    .col(AccountingPeriods::StartDate)
                    .to_owned(),
            )
            .await?;

        // cost_reports
        manager
            .create_table(
                Table::create()
                    .table(CostReports::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CostReports::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(CostReports::LocationId).uuid().not_null())
                    .col(ColumnDef::new(CostReports::PeriodId).uuid().not_null())
                    .col(ColumnDef::new(CostReports::ReportDate).date().not_null())
                    .col(
                        ColumnDef::new(CostReports::OpeningInventoryValue)
                            .decimal()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CostReports::ClosingInventoryValue).decimal())
                    .col(
                        ColumnDef::new(CostReports::PurchasesValue)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CostReports::WastageValue)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CostReports::TotalRevenue)
                            .decimal()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CostReports::TheoreticalCogs).decimal())
                    .col(ColumnDef::new(CostReports::ActualCogs).decimal())
                    .col(ColumnDef::new(CostReports::CurrentCogs).decimal().not_null())
                    .col(
                        ColumnDef::new(CostReports::CogsVariance)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CostReports::CogsVariancePercent)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CostReports::TheoreticalGrossProfit)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CostReports::ActualGrossProfit)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CostReports::TransferCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CostReports::VarianceUndefined)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(CostReports::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cost_reports_period")
                            .from(CostReports::Table, CostReports::PeriodId)
                            .to(AccountingPeriods::Table, AccountingPeriods::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cost_reports_location_date")
                    .table(CostReports::Table)
                    .col(CostReports::LocationId)
                    .col(CostReports::ReportDate)
                    .to_owned(),
            )
            .await?;

        // usage_reports
        manager
            .create_table(
                Table::create()
                    .table(UsageReports::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UsageReports::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(UsageReports::ItemId).uuid().not_null())
                    .col(ColumnDef::new(UsageReports::LocationId).uuid().not_null())
                    .col(ColumnDef::new(UsageReports::PeriodId).uuid().not_null())
                    .col(ColumnDef::new(UsageReports::ReportDate).date().not_null())
                    .col(
                        ColumnDef::new(UsageReports::OpeningQuantity)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UsageReports::OpeningValue)
                            .decimal()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UsageReports::ClosingQuantity).decimal())
                    .col(ColumnDef::new(UsageReports::ClosingValue).decimal())
                    .col(
                        ColumnDef::new(UsageReports::PurchasesQuantity)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UsageReports::PurchasesValue)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UsageReports::WasteQuantity)
                            .decimal()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UsageReports::WasteValue).decimal().not_null())
                    .col(ColumnDef::new(UsageReports::TheoreticalUsageQuantity).decimal())
                    .col(ColumnDef::new(UsageReports::TheoreticalUsageValue).decimal())
                    .col(ColumnDef::new(UsageReports::ActualUsageQuantity).decimal())
                    .col(ColumnDef::new(UsageReports::ActualUsageValue).decimal())
                    .col(
                        ColumnDef::new(UsageReports::CurrentUsageQuantity)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UsageReports::CurrentUsageValue)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UsageReports::UsageVariance)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UsageReports::UsageVariancePercent)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UsageReports::VarianceUndefined)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(UsageReports::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_usage_reports_period")
                            .from(UsageReports::Table, UsageReports::PeriodId)
                            .to(AccountingPeriods::Table, AccountingPeriods::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_usage_reports_item_date")
                    .table(UsageReports::Table)
                    .col(UsageReports::ItemId)
                    .col(UsageReports::ReportDate)
                    .to_owned(),
            )
            .await?;

        // menu_engineering_reports
        manager
            .create_table(
                Table::create()
                    .table(MenuEngineeringReports::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MenuEngineeringReports::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MenuEngineeringReports::LocationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MenuEngineeringReports::MenuItemId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MenuEngineeringReports::TotalRevenue)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MenuEngineeringReports::TotalCogs)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MenuEngineeringReports::GrossProfit)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MenuEngineeringReports::NumberSold)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MenuEngineeringReports::Matrix)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MenuEngineeringReports::ReportDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MenuEngineeringReports::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_menu_engineering_reports_location_date")
                    .table(MenuEngineeringReports::Table)
                    .col(MenuEngineeringReports::LocationId)
                    .col(MenuEngineeringReports::ReportDate)
                    .to_owned(),
            )
            .await?;

        // menu_waste_records
        manager
            .create_table(
                Table::create()
                    .table(MenuWasteRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MenuWasteRecords::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MenuWasteRecords::MenuItemId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MenuWasteRecords::WeightWasted)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MenuWasteRecords::Reason)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(MenuWasteRecords::WasteDate).date().not_null())
                    .col(
                        ColumnDef::new(MenuWasteRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_menu_waste_records_menu_item_id")
                    .table(MenuWasteRecords::Table)
                    .col(MenuWasteRecords::MenuItemId)
                    .to_owned(),
            )
            .await?;

        // menu_waste_analyses
        manager
            .create_table(
                Table::create()
                    .table(MenuWasteAnalyses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MenuWasteAnalyses::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MenuWasteAnalyses::MenuItemId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MenuWasteAnalyses::TotalWeightWasted)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MenuWasteAnalyses::MostCommonReason)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MenuWasteAnalyses::AnalysisDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MenuWasteAnalyses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MenuWasteAnalyses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MenuWasteRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MenuEngineeringReports::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UsageReports::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CostReports::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AccountingPeriods::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum AccountingPeriods {
    Table,
    Id,
    RegionId,
    StartDate,
    EndDate,
    CreatedAt,
}

#[derive(Iden)]
enum CostReports {
    Table,
    Id,
    LocationId,
    PeriodId,
    ReportDate,
    OpeningInventoryValue,
    ClosingInventoryValue,
    PurchasesValue,
    WastageValue,
    TotalRevenue,
    TheoreticalCogs,
    ActualCogs,
    CurrentCogs,
    CogsVariance,
    CogsVariancePercent,
    TheoreticalGrossProfit,
    ActualGrossProfit,
    TransferCount,
    VarianceUndefined,
    CreatedAt,
}

#[derive(Iden)]
enum UsageReports {
    Table,
    Id,
    ItemId,
    LocationId,
    PeriodId,
    ReportDate,
    OpeningQuantity,
    OpeningValue,
    ClosingQuantity,
    ClosingValue,
    PurchasesQuantity,
    PurchasesValue,
    WasteQuantity,
    WasteValue,
    TheoreticalUsageQuantity,
    TheoreticalUsageValue,
    ActualUsageQuantity,
    ActualUsageValue,
    CurrentUsageQuantity,
    CurrentUsageValue,
    UsageVariance,
    UsageVariancePercent,
    VarianceUndefined,
    CreatedAt,
}

#[derive(Iden)]
enum MenuEngineeringReports {
    Table,
    Id,
    LocationId,
    MenuItemId,
    TotalRevenue,
    TotalCogs,
    GrossProfit,
    NumberSold,
    Matrix,
    ReportDate,
    CreatedAt,
}

#[derive(Iden)]
enum MenuWasteRecords {
    Table,
    Id,
    MenuItemId,
    WeightWasted,
    Reason,
    WasteDate,
    CreatedAt,
}

#[derive(Iden)]
enum MenuWasteAnalyses {
    Table,
    Id,
    MenuItemId,
    TotalWeightWasted,
    MostCommonReason,
    AnalysisDate,
    CreatedAt,
}
