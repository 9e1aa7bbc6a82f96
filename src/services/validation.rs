use regex::Regex;

use crate::errors::{CatalogError, CatalogResult};

/// Input validation shared by the catalog services and the importer.
pub struct ValidationService;

impl ValidationService {
    /// Validate an admin-facing code (attributes, sets, groups, store views,
    /// locales, categories): lowercase, starts with a letter, max 64 chars.
    pub fn validate_code(kind: &str, code: &str) -> CatalogResult<String> {
        let trimmed = code.trim();

        if trimmed.is_empty() {
            return Err(CatalogError::Validation(format!("{} code cannot be empty", kind)));
        }

        let regex = Regex::new(r"^[a-z][a-z0-9_]{0,63}$")
            .map_err(|e| CatalogError::Validation(format!("Failed to compile code regex: {}", e)))?;
        if !regex.is_match(trimmed) {
            return Err(CatalogError::Validation(format!(
                "{} code '{}' must start with a lowercase letter and contain only lowercase letters, digits and underscores (max 64)",
                kind, trimmed
            )));
        }

        Ok(trimmed.to_string())
    }

    /// Validate a locale code such as `en` or `en_US`.
    pub fn validate_locale_code(code: &str) -> CatalogResult<String> {
        let trimmed = code.trim();

        let regex = Regex::new(r"^[a-z]{2,3}(_[A-Z]{2})?$").map_err(|e| {
            CatalogError::Validation(format!("Failed to compile locale regex: {}", e))
        })?;
        if !regex.is_match(trimmed) {
            return Err(CatalogError::Validation(format!(
                "Locale code '{}' must look like 'en' or 'en_US'",
                trimmed
            )));
        }

        Ok(trimmed.to_string())
    }

    /// Validate a product SKU.
    pub fn validate_sku(sku: &str) -> CatalogResult<String> {
        let trimmed = sku.trim();

        if trimmed.is_empty() {
            return Err(CatalogError::Validation("SKU cannot be empty".to_string()));
        }

        if trimmed.len() > 64 {
            return Err(CatalogError::Validation(
                "SKU is too long (max 64 characters)".to_string(),
            ));
        }

        let regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._/-]*$")
            .map_err(|e| CatalogError::Validation(format!("Failed to compile SKU regex: {}", e)))?;
        if !regex.is_match(trimmed) {
            return Err(CatalogError::Validation(format!(
                "SKU '{}' may only contain letters, digits, '.', '_', '-' and '/'",
                trimmed
            )));
        }

        Ok(trimmed.to_string())
    }

    /// Validate a human readable label or name.
    pub fn validate_label(field: &str, label: &str) -> CatalogResult<String> {
        let trimmed = label.trim();

        if trimmed.is_empty() {
            return Err(CatalogError::Validation(format!("{} cannot be empty", field)));
        }

        if trimmed.len() > 255 {
            return Err(CatalogError::Validation(format!(
                "{} is too long (max 255 characters)",
                field
            )));
        }

        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_code() {
        assert_eq!(
            ValidationService::validate_code("Attribute", " color ").unwrap(),
            "color"
        );
        assert!(ValidationService::validate_code("Attribute", "net_weight_2").is_ok());
        assert!(ValidationService::validate_code("Attribute", "").is_err());
        assert!(ValidationService::validate_code("Attribute", "Color").is_err());
        assert!(ValidationService::validate_code("Attribute", "2color").is_err());
        assert!(ValidationService::validate_code("Attribute", "color-name").is_err());
        assert!(ValidationService::validate_code("Attribute", &"a".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_locale_code() {
        assert_eq!(ValidationService::validate_locale_code("en_US").unwrap(), "en_US");
        assert!(ValidationService::validate_locale_code("fr").is_ok());
        assert!(ValidationService::validate_locale_code("english").is_err());
        assert!(ValidationService::validate_locale_code("en-us").is_err());
    }

    #[test]
    fn test_validate_sku() {
        assert_eq!(ValidationService::validate_sku(" TS-001 ").unwrap(), "TS-001");
        assert!(ValidationService::validate_sku("shoe/42.blue_v2").is_ok());
        assert!(ValidationService::validate_sku("").is_err());
        assert!(ValidationService::validate_sku("has space").is_err());
        assert!(ValidationService::validate_sku(&"X".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_label() {
        assert_eq!(
            ValidationService::validate_label("Label", "  Colour ").unwrap(),
            "Colour"
        );
        assert!(ValidationService::validate_label("Label", "   ").is_err());
    }
}
