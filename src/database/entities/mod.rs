pub mod attribute_group_attributes;
pub mod attribute_groups;
pub mod attribute_set_attributes;
pub mod attribute_sets;
pub mod attributes;
pub mod categories;
pub mod common_types;
pub mod locales;
pub mod product_attribute_values;
pub mod product_categories;
pub mod products;
pub mod store_views;
pub mod workflow_history;

pub use common_types::{DataType, ProductStatus};
