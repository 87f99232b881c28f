use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // region_locations
        manager
            .create_table(
                Table::create()
                    .table(RegionLocations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RegionLocations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RegionLocations::StateProvince)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RegionLocations::Country)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RegionLocations::OvertimeThreshold)
                            .decimal()
                            .not_null()
                            .default(40.0),
                    )
                    .col(
                        ColumnDef::new(RegionLocations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RegionLocations::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // locations
        manager
            .create_table(
                Table::create()
                    .table(Locations::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Locations::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Locations::RegionId).uuid().not_null())
                    .col(ColumnDef::new(Locations::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Locations::Address).string_len(255).not_null())
                    .col(ColumnDef::new(Locations::ContactPerson).string_len(255))
                    .col(ColumnDef::new(Locations::PhoneNumber).string_len(32))
                    .col(
                        ColumnDef::new(Locations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Locations::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_locations_region")
                            .from(Locations::Table, Locations::RegionId)
                            .to(RegionLocations::Table, RegionLocations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_locations_region_id")
                    .table(Locations::Table)
                    .col(Locations::RegionId)
                    .to_owned(),
            )
            .await?;

        // internal_locations
        manager
            .create_table(
                Table::create()
                    .table(InternalLocations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InternalLocations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InternalLocations::LocationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InternalLocations::Name)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InternalLocations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_internal_locations_location")
                            .from(InternalLocations::Table, InternalLocations::LocationId)
                            .to(Locations::Table, Locations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_internal_locations_location_id")
                    .table(InternalLocations::Table)
                    .col(InternalLocations::LocationId)
                    .to_owned(),
            )
            .await?;

        // training_insights
        manager
            .create_table(
                Table::create()
                    .table(TrainingInsights::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TrainingInsights::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TrainingInsights::LocationId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(TrainingInsights::FaultCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TrainingInsights::SuggestedTraining)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TrainingInsights::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TrainingInsights::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_training_insights_location")
                            .from(TrainingInsights::Table, TrainingInsights::LocationId)
                            .to(Locations::Table, Locations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TrainingInsights::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InternalLocations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Locations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RegionLocations::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum RegionLocations {
    Table,
    Id,
    StateProvince,
    Country,
    OvertimeThreshold,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Locations {
    Table,
    Id,
    RegionId,
    Name,
    Address,
    ContactPerson,
    PhoneNumber,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum InternalLocations {
    Table,
    Id,
    LocationId,
    Name,
    CreatedAt,
}

#[derive(Iden)]
enum TrainingInsights {
    Table,
    Id,
    LocationId,
    FaultCount,
    SuggestedTraining,
    CreatedAt,
    UpdatedAt,
}
