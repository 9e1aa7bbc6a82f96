use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attribute_groups")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub code: String,
    pub label: String,
    pub sort_order: i32,
    pub attribute_set_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::attribute_sets::Entity",
        from = "Column::AttributeSetId",
        to = "super::attribute_sets::Column::Id"
    )]
    AttributeSets,
    #[sea_orm(has_many = "super::attribute_group_attributes::Entity")]
    AttributeGroupAttributes,
}

impl Related<super::attribute_sets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttributeSets.def()
    }
}

impl Related<super::attribute_group_attributes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttributeGroupAttributes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
