//! Import and export error types
//!
//! Document-level failures of the transfer pipeline. Problems confined to
//! a single row never surface here; they are reported in the import
//! summary instead.
//!
//! # Examples
//!
//! ```rust
//! use pim::errors::ImportExportError;
//!
//! let err = ImportExportError::FileTooLarge { size: 11, limit: 10 };
//! assert_eq!(err.error_code(), "FILE_TOO_LARGE");
//!
//! let err = ImportExportError::UnsupportedFormat("ods".to_string());
//! assert!(err.is_client_error());
//! ```

use thiserror::Error;

use super::CatalogError;

/// Import and export operation errors
#[derive(Error, Debug)]
pub enum ImportExportError {
    /// Upload exceeds the configured import cap
    #[error("File of {size} bytes exceeds the import limit of {limit} bytes")]
    FileTooLarge { size: usize, limit: usize },

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Whole-document parsing error
    #[error("Parsing error: {0}")]
    ParseError(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV parsing/writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(String),

    /// XML parsing/writing error
    #[error("XML error: {0}")]
    Xml(String),

    /// Catalog lookup failed outside of row processing
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ImportExportError {
    /// Check if this is a client error (400-series)
    pub fn is_client_error(&self) -> bool {
        match self {
            ImportExportError::FileTooLarge { .. }
            | ImportExportError::UnsupportedFormat(_)
            | ImportExportError::ParseError(_)
            | ImportExportError::Yaml(_)
            | ImportExportError::Xml(_) => true,
            ImportExportError::Catalog(err) => err.is_client_error(),
            _ => false,
        }
    }

    /// Check if this is a not found error (404)
    pub fn is_not_found(&self) -> bool {
        matches!(self, ImportExportError::Catalog(err) if err.is_not_found())
    }

    /// Check if this is a server error (500-series)
    pub fn is_server_error(&self) -> bool {
        match self {
            ImportExportError::Database(_)
            | ImportExportError::Io(_)
            | ImportExportError::Serialization(_)
            | ImportExportError::Csv(_) => true,
            ImportExportError::Catalog(err) => err.is_server_error(),
            _ => false,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            ImportExportError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            ImportExportError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            ImportExportError::ParseError(_) => "PARSE_ERROR",
            ImportExportError::Serialization(_) => "SERIALIZATION_ERROR",
            ImportExportError::Csv(_) => "CSV_ERROR",
            ImportExportError::Yaml(_) => "YAML_ERROR",
            ImportExportError::Xml(_) => "XML_ERROR",
            ImportExportError::Catalog(err) => err.error_code(),
            ImportExportError::Database(_) => "DATABASE_ERROR",
            ImportExportError::Io(_) => "IO_ERROR",
        }
    }
}

impl From<serde_yaml::Error> for ImportExportError {
    fn from(err: serde_yaml::Error) -> Self {
        ImportExportError::Yaml(err.to_string())
    }
}

impl From<quick_xml::Error> for ImportExportError {
    fn from(err: quick_xml::Error) -> Self {
        ImportExportError::Xml(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_too_large() {
        let err = ImportExportError::FileTooLarge {
            size: 2048,
            limit: 1024,
        };
        assert_eq!(
            err.to_string(),
            "File of 2048 bytes exceeds the import limit of 1024 bytes"
        );
        assert!(err.is_client_error());
        assert_eq!(err.error_code(), "FILE_TOO_LARGE");
    }

    #[test]
    fn test_parse_error() {
        let err = ImportExportError::ParseError("expected a JSON array".to_string());
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
        assert_eq!(err.error_code(), "PARSE_ERROR");
    }

    #[test]
    fn test_catalog_error_passes_through() {
        let err = ImportExportError::from(CatalogError::not_found("StoreView", "fr"));
        assert!(err.is_not_found());
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert_eq!(err.to_string(), "StoreView 'fr' not found");
    }

    #[test]
    fn test_yaml_error() {
        let yaml_err = serde_yaml::from_str::<Vec<i32>>("{ not: [a list").unwrap_err();
        let err = ImportExportError::from(yaml_err);
        assert_eq!(err.error_code(), "YAML_ERROR");
    }
}
