use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create categories table
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Categories::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .col(ColumnDef::new(Categories::ParentId).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_categories_parent_id")
                            .from(Categories::Table, Categories::ParentId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create products table
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Products::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Products::Sku)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Products::ProductType).string().not_null())
                    .col(
                        ColumnDef::new(Products::Status)
                            .string()
                            .not_null()
                            .default("DRAFT"),
                    )
                    .col(ColumnDef::new(Products::AttributeSetId).integer())
                    .col(ColumnDef::new(Products::AssignedTo).integer())
                    .col(ColumnDef::new(Products::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Products::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_attribute_set_id")
                            .from(Products::Table, Products::AttributeSetId)
                            .to(AttributeSets::Table, AttributeSets::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create product_categories table
        manager
            .create_table(
                Table::create()
                    .table(ProductCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductCategories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProductCategories::ProductId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductCategories::CategoryId)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_categories_product_id")
                            .from(ProductCategories::Table, ProductCategories::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_categories_category_id")
                            .from(ProductCategories::Table, ProductCategories::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .index(
                        Index::create()
                            .name("idx_product_categories_unique")
                            .table(ProductCategories::Table)
                            .col(ProductCategories::ProductId)
                            .col(ProductCategories::CategoryId)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create product_attribute_values table
        manager
            .create_table(
                Table::create()
                    .table(ProductAttributeValues::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductAttributeValues::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProductAttributeValues::ProductId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductAttributeValues::AttributeId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductAttributeValues::StoreViewId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProductAttributeValues::ValueString).string())
                    .col(ColumnDef::new(ProductAttributeValues::ValueText).text())
                    .col(ColumnDef::new(ProductAttributeValues::ValueInt).big_integer())
                    .col(ColumnDef::new(ProductAttributeValues::ValueDecimal).string())
                    .col(ColumnDef::new(ProductAttributeValues::ValueBoolean).boolean())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_attribute_values_product_id")
                            .from(
                                ProductAttributeValues::Table,
                                ProductAttributeValues::ProductId,
                            )
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_attribute_values_attribute_id")
                            .from(
                                ProductAttributeValues::Table,
                                ProductAttributeValues::AttributeId,
                            )
                            .to(Attributes::Table, Attributes::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_attribute_values_store_view_id")
                            .from(
                                ProductAttributeValues::Table,
                                ProductAttributeValues::StoreViewId,
                            )
                            .to(StoreViews::Table, StoreViews::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .index(
                        Index::create()
                            .name("idx_product_attribute_values_scope")
                            .table(ProductAttributeValues::Table)
                            .col(ProductAttributeValues::ProductId)
                            .col(ProductAttributeValues::AttributeId)
                            .col(ProductAttributeValues::StoreViewId)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create workflow_history table
        manager
            .create_table(
                Table::create()
                    .table(WorkflowHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WorkflowHistory::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WorkflowHistory::ProductId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WorkflowHistory::FromStatus).string())
                    .col(ColumnDef::new(WorkflowHistory::ToStatus).string().not_null())
                    .col(ColumnDef::new(WorkflowHistory::ChangedById).integer())
                    .col(ColumnDef::new(WorkflowHistory::Notes).text())
                    .col(
                        ColumnDef::new(WorkflowHistory::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workflow_history_product_id")
                            .from(WorkflowHistory::Table, WorkflowHistory::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_workflow_history_product_id")
                    .table(WorkflowHistory::Table)
                    .col(WorkflowHistory::ProductId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WorkflowHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProductAttributeValues::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProductCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    Code,
    Name,
    ParentId,
}

#[derive(Iden)]
enum Products {
    Table,
    Id,
    Sku,
    #[iden = "type"]
    ProductType,
    Status,
    AttributeSetId,
    AssignedTo,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ProductCategories {
    Table,
    Id,
    ProductId,
    CategoryId,
}

#[derive(Iden)]
enum ProductAttributeValues {
    Table,
    Id,
    ProductId,
    AttributeId,
    StoreViewId,
    ValueString,
    ValueText,
    ValueInt,
    ValueDecimal,
    ValueBoolean,
}

#[derive(Iden)]
enum WorkflowHistory {
    Table,
    Id,
    ProductId,
    FromStatus,
    ToStatus,
    ChangedById,
    Notes,
    CreatedAt,
}

#[derive(Iden)]
enum Attributes {
    Table,
    Id,
}

#[derive(Iden)]
enum AttributeSets {
    Table,
    Id,
}

#[derive(Iden)]
enum StoreViews {
    Table,
    Id,
}
