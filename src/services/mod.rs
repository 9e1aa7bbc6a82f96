pub mod attribute_service;
pub mod attribute_set_service;
pub mod attribute_value_service;
pub mod export_service;
pub mod import_service;
pub mod product_service;
pub mod store_view_service;
pub mod validation;

pub use attribute_service::{AttributeService, AttributeUpdate, NewAttribute};
pub use attribute_set_service::{
    AttributeSetLayout, AttributeSetService, GroupLayout, LayoutAttribute, NewAttributeGroup,
    NewAttributeSet,
};
pub use attribute_value_service::{AttributeValueService, ResolvedValue};
pub use export_service::ExportService;
pub use import_service::{
    ImportOptions, ImportResult, ImportRowError, ImportService, ImportSummary, RowOutcome,
    ValidationIssue,
};
pub use product_service::{NewProduct, ProductFilters, ProductService, ProductUpdate};
pub use store_view_service::StoreViewService;
pub use validation::ValidationService;
