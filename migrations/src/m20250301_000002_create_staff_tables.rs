use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // employees
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Employees::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Employees::RegionId).uuid().not_null())
                    .col(ColumnDef::new(Employees::LocationId).uuid().not_null())
                    .col(
                        ColumnDef::new(Employees::FirstName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Employees::LastName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Employees::Email).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Employees::PhoneNumber)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Employees::DateOfHire).date().not_null())
                    .col(
                        ColumnDef::new(Employees::JobPosition)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Employees::HourlyWage).decimal().not_null())
                    .col(
                        ColumnDef::new(Employees::AccountUsername)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Employees::AccountPassword)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Employees::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Employees::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employees_location")
                            .from(Employees::Table, Employees::LocationId)
                            .to(Locations::Table, Locations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_employees_location_id")
                    .table(Employees::Table)
                    .col(Employees::LocationId)
                    .to_owned(),
            )
            .await?;

        // employee_performance
        manager
            .create_table(
                Table::create()
                    .table(EmployeePerformance::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmployeePerformance::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EmployeePerformance::EmployeeId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(EmployeePerformance::TotalEarnings)
                            .decimal()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(EmployeePerformance::TotalTipsReceived)
                            .decimal()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(EmployeePerformance::TotalHoursWorked)
                            .decimal()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(EmployeePerformance::TotalOvertimeHoursWorked)
                            .decimal()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(EmployeePerformance::LateToWorkCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(EmployeePerformance::MissedWorkDaysCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(EmployeePerformance::UncompletedShiftCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(EmployeePerformance::RequestsCreated)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(EmployeePerformance::TotalTransactionsCompleted)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(EmployeePerformance::TotalSalesHandledAmount)
                            .decimal()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(EmployeePerformance::TotalBreaksTaken)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(EmployeePerformance::TotalBreakTime)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(EmployeePerformance::TotalInventoryWasteCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(EmployeePerformance::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employee_performance_employee")
                            .from(EmployeePerformance::Table, EmployeePerformance::EmployeeId)
                            .to(Employees::Table, Employees::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EmployeePerformance::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum Employees {
    Table,
    Id,
    RegionId,
    LocationId,
    FirstName,
    LastName,
    Email,
    PhoneNumber,
    DateOfHire,
    JobPosition,
    HourlyWage,
    AccountUsername,
    AccountPassword,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum EmployeePerformance {
    Table,
    Id,
    EmployeeId,
    TotalEarnings,
    TotalTipsReceived,
    TotalHoursWorked,
    TotalOvertimeHoursWorked,
    LateToWorkCount,
    MissedWorkDaysCount,
    UncompletedShiftCount,
    RequestsCreated,
    TotalTransactionsCompleted,
    TotalSalesHandledAmount,
    TotalBreaksTaken,
    TotalBreakTime,
    TotalInventoryWasteCount,
    UpdatedAt,
}

#[derive(Iden)]
enum Locations {
    Table,
    Id,
}
