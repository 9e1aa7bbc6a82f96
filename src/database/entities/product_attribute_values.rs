use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One typed value of one attribute, for one product, in one store view.
///
/// Exactly one `value_*` column is populated and it matches the
/// attribute's data type. Rows are written only through
/// `crate::values::ValueColumns`, which enforces that.
/// `value_decimal` holds the canonical decimal text.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_attribute_values")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub product_id: i32,
    pub attribute_id: i32,
    pub store_view_id: i32,
    pub value_string: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub value_text: Option<String>,
    pub value_int: Option<i64>,
    pub value_decimal: Option<String>,
    pub value_boolean: Option<bool>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id"
    )]
    Products,
    #[sea_orm(
        belongs_to = "super::attributes::Entity",
        from = "Column::AttributeId",
        to = "super::attributes::Column::Id"
    )]
    Attributes,
    #[sea_orm(
        belongs_to = "super::store_views::Entity",
        from = "Column::StoreViewId",
        to = "super::store_views::Column::Id"
    )]
    StoreViews,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::attributes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attributes.def()
    }
}

impl Related<super::store_views::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StoreViews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
