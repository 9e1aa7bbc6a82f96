use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub use super::common_types::DataType;

/// Admin-defined attribute definition.
///
/// `code` is the stable identifier used by imports and exports and never
/// changes once created. `data_type` decides which value column a
/// `product_attribute_values` row populates.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attributes")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub code: String,
    pub label: String,
    pub data_type: String, // 'string', 'text', 'int', 'decimal', 'boolean'
    pub input_type: String,
    pub is_filterable: bool,
    pub is_global: bool,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product_attribute_values::Entity")]
    ProductAttributeValues,
    #[sea_orm(has_many = "super::attribute_set_attributes::Entity")]
    AttributeSetAttributes,
    #[sea_orm(has_many = "super::attribute_group_attributes::Entity")]
    AttributeGroupAttributes,
}

impl Related<super::product_attribute_values::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductAttributeValues.def()
    }
}

impl Related<super::attribute_set_attributes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttributeSetAttributes.def()
    }
}

impl Related<super::attribute_group_attributes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttributeGroupAttributes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Typed view of the stored `data_type` column.
    pub fn data_type(&self) -> Option<DataType> {
        DataType::from_str(&self.data_type)
    }
}
