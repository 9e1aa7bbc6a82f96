pub mod attribute_sets;
pub mod attributes;
pub mod health;
pub mod products;
pub mod scopes;
pub mod transfer;
