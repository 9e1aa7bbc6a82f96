//! Domain-specific error types
//!
//! - **CatalogError**: attributes, attribute sets, store views, products
//!   and attribute values
//! - **ImportExportError**: document-level failures of the transfer
//!   pipeline
//!
//! Both expose `error_code()` with the stable machine-readable kind the
//! HTTP layer and the import summary report.

pub mod catalog;
pub mod import_export;

pub use catalog::CatalogError;
pub use import_export::ImportExportError;

/// Result type alias for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Result type alias for import/export operations
pub type ImportExportResult<T> = Result<T, ImportExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_result_alias() {
        let result: CatalogResult<i32> = Err(CatalogError::Validation("bad".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_import_export_result_alias() {
        let result: ImportExportResult<()> =
            Err(ImportExportError::UnsupportedFormat("ods".to_string()));
        assert!(result.is_err());
    }
}
