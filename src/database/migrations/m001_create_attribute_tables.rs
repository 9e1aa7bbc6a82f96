use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create locales table
        manager
            .create_table(
                Table::create()
                    .table(Locales::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Locales::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Locales::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Locales::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Create store_views table
        manager
            .create_table(
                Table::create()
                    .table(StoreViews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StoreViews::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StoreViews::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(StoreViews::Name).string().not_null())
                    .col(ColumnDef::new(StoreViews::LocaleId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_store_views_locale_id")
                            .from(StoreViews::Table, StoreViews::LocaleId)
                            .to(Locales::Table, Locales::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Create attributes table
        manager
            .create_table(
                Table::create()
                    .table(Attributes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attributes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Attributes::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Attributes::Label).string().not_null())
                    .col(ColumnDef::new(Attributes::DataType).string().not_null())
                    .col(ColumnDef::new(Attributes::InputType).string().not_null())
                    .col(
                        ColumnDef::new(Attributes::IsFilterable)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Attributes::IsGlobal)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Attributes::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Attributes::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // Create attribute_sets table
        manager
            .create_table(
                Table::create()
                    .table(AttributeSets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AttributeSets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AttributeSets::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(AttributeSets::Label).string().not_null())
                    .col(ColumnDef::new(AttributeSets::ProductType).string())
                    .col(
                        ColumnDef::new(AttributeSets::IsDefault)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        // Create attribute_groups table
        manager
            .create_table(
                Table::create()
                    .table(AttributeGroups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AttributeGroups::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AttributeGroups::Code).string().not_null())
                    .col(ColumnDef::new(AttributeGroups::Label).string().not_null())
                    .col(
                        ColumnDef::new(AttributeGroups::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AttributeGroups::AttributeSetId)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attribute_groups_attribute_set_id")
                            .from(AttributeGroups::Table, AttributeGroups::AttributeSetId)
                            .to(AttributeSets::Table, AttributeSets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .index(
                        Index::create()
                            .name("idx_attribute_groups_set_code")
                            .table(AttributeGroups::Table)
                            .col(AttributeGroups::AttributeSetId)
                            .col(AttributeGroups::Code)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create attribute_set_attributes table (ungrouped members)
        manager
            .create_table(
                Table::create()
                    .table(AttributeSetAttributes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AttributeSetAttributes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AttributeSetAttributes::AttributeSetId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttributeSetAttributes::AttributeId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttributeSetAttributes::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attribute_set_attributes_set_id")
                            .from(
                                AttributeSetAttributes::Table,
                                AttributeSetAttributes::AttributeSetId,
                            )
                            .to(AttributeSets::Table, AttributeSets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attribute_set_attributes_attribute_id")
                            .from(
                                AttributeSetAttributes::Table,
                                AttributeSetAttributes::AttributeId,
                            )
                            .to(Attributes::Table, Attributes::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .index(
                        Index::create()
                            .name("idx_attribute_set_attributes_unique")
                            .table(AttributeSetAttributes::Table)
                            .col(AttributeSetAttributes::AttributeSetId)
                            .col(AttributeSetAttributes::AttributeId)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create attribute_group_attributes table
        manager
            .create_table(
                Table::create()
                    .table(AttributeGroupAttributes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AttributeGroupAttributes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AttributeGroupAttributes::AttributeGroupId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttributeGroupAttributes::AttributeId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttributeGroupAttributes::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attribute_group_attributes_group_id")
                            .from(
                                AttributeGroupAttributes::Table,
                                AttributeGroupAttributes::AttributeGroupId,
                            )
                            .to(AttributeGroups::Table, AttributeGroups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attribute_group_attributes_attribute_id")
                            .from(
                                AttributeGroupAttributes::Table,
                                AttributeGroupAttributes::AttributeId,
                            )
                            .to(Attributes::Table, Attributes::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .index(
                        Index::create()
                            .name("idx_attribute_group_attributes_unique")
                            .table(AttributeGroupAttributes::Table)
                            .col(AttributeGroupAttributes::AttributeGroupId)
                            .col(AttributeGroupAttributes::AttributeId)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AttributeGroupAttributes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AttributeSetAttributes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AttributeGroups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AttributeSets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Attributes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StoreViews::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Locales::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Locales {
    Table,
    Id,
    Code,
    Name,
}

#[derive(Iden)]
enum StoreViews {
    Table,
    Id,
    Code,
    Name,
    LocaleId,
}

#[derive(Iden)]
enum Attributes {
    Table,
    Id,
    Code,
    Label,
    DataType,
    InputType,
    IsFilterable,
    IsGlobal,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum AttributeSets {
    Table,
    Id,
    Code,
    Label,
    ProductType,
    IsDefault,
}

#[derive(Iden)]
enum AttributeGroups {
    Table,
    Id,
    Code,
    Label,
    SortOrder,
    AttributeSetId,
}

#[derive(Iden)]
enum AttributeSetAttributes {
    Table,
    Id,
    AttributeSetId,
    AttributeId,
    SortOrder,
}

#[derive(Iden)]
enum AttributeGroupAttributes {
    Table,
    Id,
    AttributeGroupId,
    AttributeId,
    SortOrder,
}
