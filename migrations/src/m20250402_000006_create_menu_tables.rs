use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // recipes
        manager
            .create_table(
                Table::create()
                    .table(Recipes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Recipes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Recipes::RegionId).uuid().not_null())
                    .col(ColumnDef::new(Recipes::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Recipes::Description).text())
                    .col(
                        ColumnDef::new(Recipes::PreparationTime)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Recipes::CookingTime).integer().not_null())
                    .col(ColumnDef::new(Recipes::DishingUpTime).integer().not_null())
                    .col(
                        ColumnDef::new(Recipes::TotalRecipeTime)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Recipes::CookingTemperature).string_len(64))
                    .col(ColumnDef::new(Recipes::QualityStandards).text())
                    .col(ColumnDef::new(Recipes::ServingSize).string_len(64))
                    .col(
                        ColumnDef::new(Recipes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Recipes::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_recipes_region_id")
                    .table(Recipes::Table)
                    .col(Recipes::RegionId)
                    .to_owned(),
            )
            .await?;

        // recipe_ingredients
        manager
            .create_table(
                Table::create()
                    .table(RecipeIngredients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RecipeIngredients::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RecipeIngredients::RecipeId).uuid().not_null())
                    .col(ColumnDef::new(RecipeIngredients::ItemId).uuid().not_null())
                    .col(
                        ColumnDef::new(RecipeIngredients::Quantity)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecipeIngredients::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_ingredients_recipe")
                            .from(RecipeIngredients::Table, RecipeIngredients::RecipeId)
                            .to(Recipes::Table, Recipes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_recipe_ingredients_recipe_id")
                    .table(RecipeIngredients::Table)
                    .col(RecipeIngredients::RecipeId)
                    .to_owned(),
            )
            .await?;

        // menu_items
        manager
            .create_table(
                Table::create()
                    .table(MenuItems::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MenuItems::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(MenuItems::LocationId).uuid().not_null())
                    .col(ColumnDef::new(MenuItems::RecipeId).uuid().not_null())
                    .col(ColumnDef::new(MenuItems::Name).string_len(255).not_null())
                    .col(ColumnDef::new(MenuItems::Price).decimal().not_null())
                    .col(ColumnDef::new(MenuItems::Course).string_len(16).not_null())
                    .col(
                        ColumnDef::new(MenuItems::Available)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(MenuItems::GrossProfit).decimal().not_null())
                    .col(
                        ColumnDef::new(MenuItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MenuItems::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_menu_items_recipe")
                            .from(MenuItems::Table, MenuItems::RecipeId)
                            .to(Recipes::Table, Recipes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_menu_items_location_id")
                    .table(MenuItems::Table)
                    .col(MenuItems::LocationId)
                    .to_owned(),
            )
            .await?;

        // add_ons
        manager
            .create_table(
                Table::create()
                    .table(AddOns::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AddOns::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(AddOns::LocationId).uuid().not_null())
                    .col(ColumnDef::new(AddOns::ItemId).uuid().not_null())
                    .col(ColumnDef::new(AddOns::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(AddOns::AdditionalQuantity)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AddOns::AdditionalPrice)
                            .decimal()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AddOns::AdditionalCost).decimal().not_null())
                    .col(
                        ColumnDef::new(AddOns::Available)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(AddOns::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AddOns::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_add_ons_location_id")
                    .table(AddOns::Table)
                    .col(AddOns::LocationId)
                    .to_owned(),
            )
            .await?;

        // menu_item_add_ons
        manager
            .create_table(
                Table::create()
                    .table(MenuItemAddOns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MenuItemAddOns::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MenuItemAddOns::MenuItemId).uuid().not_null())
                    .col(ColumnDef::new(MenuItemAddOns::AddOnId).uuid().not_null())
                    .col(
                        ColumnDef::new(MenuItemAddOns::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_menu_item_add_ons_menu_item")
                            .from(MenuItemAddOns::Table, MenuItemAddOns::MenuItemId)
                            .to(MenuItems::Table, MenuItems::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_menu_item_add_ons_add_on")
                            .from(MenuItemAddOns::Table, MenuItemAddOns::AddOnId)
                            .to(AddOns::Table, AddOns::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_menu_item_add_ons_pair")
                    .table(MenuItemAddOns::Table)
                    .col(MenuItemAddOns::MenuItemId)
                    .col(MenuItemAddOns::AddOnId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MenuItemAddOns::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AddOns::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MenuItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RecipeIngredients::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Recipes::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum Recipes {
    Table,
    Id,
    RegionId,
    Name,
    Description,
    PreparationTime,
    CookingTime,
    DishingUpTime,
    TotalRecipeTime,
    CookingTemperature,
    QualityStandards,
    ServingSize,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum RecipeIngredients {
    Table,
    Id,
    RecipeId,
    ItemId,
    Quantity,
    CreatedAt,
}

#[derive(Iden)]
enum MenuItems {
    Table,
    Id,
    LocationId,
    RecipeId,
    Name,
    Price,
    Course,
    Available,
    GrossProfit,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum AddOns {
    Table,
    Id,
    LocationId,
    ItemId,
    Name,
    AdditionalQuantity,
    AdditionalPrice,
    AdditionalCost,
    Available,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum MenuItemAddOns {
    Table,
    Id,
    MenuItemId,
    AddOnId,
    CreatedAt,
}
