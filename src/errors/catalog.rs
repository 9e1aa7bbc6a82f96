//! Catalog error types
//!
//! Errors raised by the attribute registry, attribute set composer,
//! store view scope, product catalogue and attribute value store.
//!
//! # Examples
//!
//! ```rust
//! use pim::errors::CatalogError;
//!
//! let err = CatalogError::not_found("Attribute", 42);
//! assert!(err.is_not_found());
//!
//! let err = CatalogError::TypeMismatch {
//!     attribute: "weight".to_string(),
//!     data_type: "decimal".to_string(),
//!     value: "\"heavy\"".to_string(),
//! };
//! assert_eq!(err.error_code(), "TYPE_MISMATCH");
//! ```

use thiserror::Error;

/// Catalog-related errors
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Entity not found by id or code
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// Unique code already taken
    #[error("{entity} with code '{code}' already exists")]
    DuplicateCode { entity: &'static str, code: String },

    /// Attribute already assigned to the set, grouped or flat
    #[error("Attribute {attribute_id} is already assigned to attribute set {set_id}")]
    DuplicateAssignment { attribute_id: i32, set_id: i32 },

    /// Raw value does not coerce to the attribute's data type
    #[error("Value {value} is not a valid {data_type} for attribute '{attribute}'")]
    TypeMismatch {
        attribute: String,
        data_type: String,
        value: String,
    },

    /// Entity is still referenced and cannot be deleted
    #[error("{entity} '{id}' is still referenced: {reason}")]
    Referenced {
        entity: &'static str,
        id: String,
        reason: String,
    },

    /// Reorder list omits existing assignments
    #[error("Reorder list is missing assigned attributes: {missing:?}")]
    IncompleteSet { missing: Vec<i32> },

    /// Validation failed
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl CatalogError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        CatalogError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn duplicate_code(entity: &'static str, code: impl Into<String>) -> Self {
        CatalogError::DuplicateCode {
            entity,
            code: code.into(),
        }
    }

    /// Check if this is a client error (400-series)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CatalogError::DuplicateCode { .. }
                | CatalogError::DuplicateAssignment { .. }
                | CatalogError::TypeMismatch { .. }
                | CatalogError::Referenced { .. }
                | CatalogError::IncompleteSet { .. }
                | CatalogError::Validation(_)
        )
    }

    /// Check if this is a not found error (404)
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }

    /// Check if this is a conflict with existing state (409)
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            CatalogError::DuplicateCode { .. }
                | CatalogError::DuplicateAssignment { .. }
                | CatalogError::Referenced { .. }
        )
    }

    /// Check if this is a server error (500-series)
    pub fn is_server_error(&self) -> bool {
        matches!(self, CatalogError::Database(_))
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            CatalogError::NotFound { .. } => "NOT_FOUND",
            CatalogError::DuplicateCode { .. } => "DUPLICATE_CODE",
            CatalogError::DuplicateAssignment { .. } => "DUPLICATE_ASSIGNMENT",
            CatalogError::TypeMismatch { .. } => "TYPE_MISMATCH",
            CatalogError::Referenced { .. } => "REFERENCED",
            CatalogError::IncompleteSet { .. } => "INCOMPLETE_SET",
            CatalogError::Validation(_) => "VALIDATION_ERROR",
            CatalogError::Database(_) => "DATABASE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = CatalogError::not_found("Product", 7);
        assert_eq!(err.to_string(), "Product '7' not found");
        assert!(err.is_not_found());
        assert!(!err.is_client_error());
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_duplicate_code() {
        let err = CatalogError::duplicate_code("Attribute", "color");
        assert_eq!(err.to_string(), "Attribute with code 'color' already exists");
        assert!(err.is_client_error());
        assert!(err.is_conflict());
        assert_eq!(err.error_code(), "DUPLICATE_CODE");
    }

    #[test]
    fn test_type_mismatch() {
        let err = CatalogError::TypeMismatch {
            attribute: "qty".to_string(),
            data_type: "int".to_string(),
            value: "\"abc\"".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Value \"abc\" is not a valid int for attribute 'qty'"
        );
        assert!(err.is_client_error());
        assert!(!err.is_conflict());
    }

    #[test]
    fn test_incomplete_set() {
        let err = CatalogError::IncompleteSet { missing: vec![3, 9] };
        assert_eq!(
            err.to_string(),
            "Reorder list is missing assigned attributes: [3, 9]"
        );
        assert_eq!(err.error_code(), "INCOMPLETE_SET");
    }

    #[test]
    fn test_database_error_is_server_error() {
        let err = CatalogError::from(sea_orm::DbErr::Custom("boom".to_string()));
        assert!(err.is_server_error());
        assert_eq!(err.error_code(), "DATABASE_ERROR");
    }
}
