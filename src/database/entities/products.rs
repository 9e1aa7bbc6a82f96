use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub use super::common_types::ProductStatus;

/// Product entity
///
/// Products are matched on `sku` during import. Attribute values,
/// category links and workflow history are owned by the product and
/// removed with it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub sku: String,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub product_type: String,
    pub status: String, // 'DRAFT', 'ENRICHMENT', 'VALIDATION', 'APPROVAL', 'PUBLISHING'
    pub attribute_set_id: Option<i32>,
    pub assigned_to: Option<i32>,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::attribute_sets::Entity",
        from = "Column::AttributeSetId",
        to = "super::attribute_sets::Column::Id"
    )]
    AttributeSets,
    #[sea_orm(has_many = "super::product_attribute_values::Entity")]
    ProductAttributeValues,
    #[sea_orm(has_many = "super::product_categories::Entity")]
    ProductCategories,
    #[sea_orm(has_many = "super::workflow_history::Entity")]
    WorkflowHistory,
}

impl Related<super::attribute_sets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttributeSets.def()
    }
}

impl Related<super::product_attribute_values::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductAttributeValues.def()
    }
}

impl Related<super::product_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductCategories.def()
    }
}

impl Related<super::workflow_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkflowHistory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn status(&self) -> Option<ProductStatus> {
        ProductStatus::from_str(&self.status)
    }
}
