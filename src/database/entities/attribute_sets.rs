use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attribute_sets")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub code: String,
    pub label: String,
    pub product_type: Option<String>,
    pub is_default: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::attribute_groups::Entity")]
    AttributeGroups,
    #[sea_orm(has_many = "super::attribute_set_attributes::Entity")]
    AttributeSetAttributes,
    #[sea_orm(has_many = "super::products::Entity")]
    Products,
}

impl Related<super::attribute_groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttributeGroups.def()
    }
}

impl Related<super::attribute_set_attributes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttributeSetAttributes.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
