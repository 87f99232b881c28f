use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // shift_schedules
        manager
            .create_table(
                Table::create()
                    .table(ShiftSchedules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ShiftSchedules::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ShiftSchedules::LocationId).uuid().not_null())
                    .col(ColumnDef::new(ShiftSchedules::EmployeeId).uuid())
                    .col(ColumnDef::new(ShiftSchedules::JobPosition).string_len(32))
                    .col(
                        ColumnDef::new(ShiftSchedules::ShiftType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ShiftSchedules::StartTime).time().not_null())
                    .col(ColumnDef::new(ShiftSchedules::EndTime).time().not_null())
                    .col(
                        ColumnDef::new(ShiftSchedules::TotalHours)
                            .decimal()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ShiftSchedules::ShiftDate).date().not_null())
                    .col(ColumnDef::new(ShiftSchedules::SwappedEmployeeId).uuid())
                    .col(
                        ColumnDef::new(ShiftSchedules::IsOpen)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ShiftSchedules::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ShiftSchedules::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_shift_schedules_employee_id")
                    .table(ShiftSchedules::Table)
                    .col(ShiftSchedules::EmployeeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_shift_schedules_shift_date")
                    .table(ShiftSchedules::Table)
                    .col(ShiftSchedules::ShiftDate)
                    .to_owned(),
            )
            .await?;

        // daily_shifts
        manager
            .create_table(
                Table::create()
                    .table(DailyShifts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DailyShifts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DailyShifts::EmployeeId).uuid().not_null())
                    .col(ColumnDef::new(DailyShifts::ScheduleId).uuid().not_null())
                    .col(
                        ColumnDef::new(DailyShifts::ShiftType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(DailyShifts::ShiftDate).date().not_null())
                    .col(ColumnDef::new(DailyShifts::PunchInTime).time())
                    .col(ColumnDef::new(DailyShifts::PunchOutTime).time())
                    .col(ColumnDef::new(DailyShifts::HoursWorked).decimal())
                    .col(ColumnDef::new(DailyShifts::Earnings).decimal())
                    .col(
                        ColumnDef::new(DailyShifts::Status)
                            .string_len(16)
                            .not_null()
                            .default("upcoming"),
                    )
                    .col(
                        ColumnDef::new(DailyShifts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DailyShifts::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_daily_shifts_schedule")
                            .from(DailyShifts::Table, DailyShifts::ScheduleId)
                            .to(ShiftSchedules::Table, ShiftSchedules::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_daily_shifts_employee_id")
                    .table(DailyShifts::Table)
                    .col(DailyShifts::EmployeeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_daily_shifts_shift_date")
                    .table(DailyShifts::Table)
                    .col(DailyShifts::ShiftDate)
                    .to_owned(),
            )
            .await?;

        // weekly_shifts
        manager
            .create_table(
                Table::create()
                    .table(WeeklyShifts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WeeklyShifts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WeeklyShifts::EmployeeId).uuid().not_null())
                    .col(
                        ColumnDef::new(WeeklyShifts::WeekStartDate)
                            .date()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WeeklyShifts::WeekEndDate).date().not_null())
                    .col(
                        ColumnDef::new(WeeklyShifts::RegularHoursWorked)
                            .decimal()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(WeeklyShifts::OvertimeHoursWorked)
                            .decimal()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(WeeklyShifts::EarningsThisWeek)
                            .decimal()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(WeeklyShifts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_weekly_shifts_employee_week")
                    .table(WeeklyShifts::Table)
                    .col(WeeklyShifts::EmployeeId)
                    .col(WeeklyShifts::WeekStartDate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // break_records
        manager
            .create_table(
                Table::create()
                    .table(BreakRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BreakRecords::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BreakRecords::EmployeeId).uuid().not_null())
                    .col(ColumnDef::new(BreakRecords::DailyShiftId).uuid().not_null())
                    .col(ColumnDef::new(BreakRecords::BreakStart).time().not_null())
                    .col(ColumnDef::new(BreakRecords::BreakEnd).time().not_null())
                    .col(
                        ColumnDef::new(BreakRecords::BreakDuration)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BreakRecords::BreakDate).date().not_null())
                    .col(
                        ColumnDef::new(BreakRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_break_records_daily_shift")
                            .from(BreakRecords::Table, BreakRecords::DailyShiftId)
                            .to(DailyShifts::Table, DailyShifts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_break_records_employee_id")
                    .table(BreakRecords::Table)
                    .col(BreakRecords::EmployeeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BreakRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WeeklyShifts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DailyShifts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ShiftSchedules::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum ShiftSchedules {
    Table,
    Id,
    LocationId,
    EmployeeId,
    JobPosition,
    ShiftType,
    StartTime,
    EndTime,
    TotalHours,
    ShiftDate,
    SwappedEmployeeId,
    IsOpen,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum DailyShifts {
    Table,
    Id,
    EmployeeId,
    ScheduleId,
    ShiftType,
    ShiftDate,
    PunchInTime,
    PunchOutTime,
    HoursWorked,
    Earnings,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum WeeklyShifts {
    Table,
    Id,
    EmployeeId,
    WeekStartDate,
    WeekEndDate,
    RegularHoursWorked,
    OvertimeHoursWorked,
    EarningsThisWeek,
    UpdatedAt,
}

#[derive(Iden)]
enum BreakRecords {
    Table,
    Id,
    EmployeeId,
    DailyShiftId,
    BreakStart,
    BreakEnd,
    BreakDuration,
    BreakDate,
    CreatedAt,
}
