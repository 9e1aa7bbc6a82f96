use serde::{Deserialize, Serialize};

/// Storage type of an attribute.
///
/// Each variant selects exactly one value column on
/// `product_attribute_values`. Persisted as its lowercase string form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Text,
    Int,
    Decimal,
    Boolean,
}

impl DataType {
    pub const ALL: [DataType; 5] = [
        DataType::String,
        DataType::Text,
        DataType::Int,
        DataType::Decimal,
        DataType::Boolean,
    ];

    /// Convert DataType to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Text => "text",
            DataType::Int => "int",
            DataType::Decimal => "decimal",
            DataType::Boolean => "boolean",
        }
    }

    /// Parse DataType from database string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" => Some(DataType::String),
            "text" => Some(DataType::Text),
            "int" | "integer" => Some(DataType::Int),
            "decimal" => Some(DataType::Decimal),
            "boolean" | "bool" => Some(DataType::Boolean),
            _ => None,
        }
    }

    /// Input widget used when the admin does not pick one.
    pub fn default_input_type(&self) -> &'static str {
        match self {
            DataType::String => "text",
            DataType::Text => "textarea",
            DataType::Int | DataType::Decimal => "number",
            DataType::Boolean => "boolean",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product workflow status, in pipeline order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    Draft,
    Enrichment,
    Validation,
    Approval,
    Publishing,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Draft => "DRAFT",
            ProductStatus::Enrichment => "ENRICHMENT",
            ProductStatus::Validation => "VALIDATION",
            ProductStatus::Approval => "APPROVAL",
            ProductStatus::Publishing => "PUBLISHING",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DRAFT" => Some(ProductStatus::Draft),
            "ENRICHMENT" => Some(ProductStatus::Enrichment),
            "VALIDATION" => Some(ProductStatus::Validation),
            "APPROVAL" => Some(ProductStatus::Approval),
            "PUBLISHING" => Some(ProductStatus::Publishing),
            _ => None,
        }
    }
}

impl Default for ProductStatus {
    fn default() -> Self {
        ProductStatus::Draft
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_conversion() {
        assert_eq!(DataType::Decimal.as_str(), "decimal");
        assert_eq!(DataType::from_str("INT"), Some(DataType::Int));
        assert_eq!(DataType::from_str("bool"), Some(DataType::Boolean));
        assert_eq!(DataType::from_str("float"), None);
    }

    #[test]
    fn test_all_data_types_roundtrip() {
        for data_type in DataType::ALL {
            assert_eq!(DataType::from_str(data_type.as_str()), Some(data_type));
        }
    }

    #[test]
    fn test_product_status_parsing_is_case_insensitive() {
        assert_eq!(
            ProductStatus::from_str("enrichment"),
            Some(ProductStatus::Enrichment)
        );
        assert_eq!(ProductStatus::from_str(" APPROVAL "), Some(ProductStatus::Approval));
        assert_eq!(ProductStatus::from_str("archived"), None);
        assert_eq!(ProductStatus::default(), ProductStatus::Draft);
    }
}
