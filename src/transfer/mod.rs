//! Product transfer formats
//!
//! Every format maps a document to and from a list of `ProductRecord`s.
//! Decoding is row-tolerant: a document that is syntactically broken as a
//! whole fails with `ImportExportError::ParseError`, while a single
//! malformed row comes back as a failed `DecodedRow` and the rest of the
//! document still decodes.

pub mod csv_io;
pub mod json_io;
pub mod xml_io;
pub mod yaml_io;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ImportExportResult;

/// Supported transfer formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransferFormat {
    Json,
    Xml,
    Csv,
    Yaml,
}

impl TransferFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferFormat::Json => "json",
            TransferFormat::Xml => "xml",
            TransferFormat::Csv => "csv",
            TransferFormat::Yaml => "yaml",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Some(TransferFormat::Json),
            "xml" => Some(TransferFormat::Xml),
            "csv" => Some(TransferFormat::Csv),
            "yaml" | "yml" => Some(TransferFormat::Yaml),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            TransferFormat::Json => "application/json",
            TransferFormat::Xml => "application/xml",
            TransferFormat::Csv => "text/csv",
            TransferFormat::Yaml => "application/yaml",
        }
    }

    pub fn codec(&self) -> Box<dyn RecordCodec> {
        match self {
            TransferFormat::Json => Box::new(json_io::JsonCodec),
            TransferFormat::Xml => Box::new(xml_io::XmlCodec),
            TransferFormat::Csv => Box::new(csv_io::CsvCodec),
            TransferFormat::Yaml => Box::new(yaml_io::YamlCodec),
        }
    }
}

impl std::fmt::Display for TransferFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One product as it travels through an export or import.
///
/// Omitted optional fields mean "not provided": the importer leaves the
/// stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    #[serde(default)]
    pub sku: String,
    #[serde(default, rename = "type")]
    pub product_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_set: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<i32>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeRecord>,
}

/// A value for one attribute in one store view. No store view means the
/// configured default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeRecord {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_view: Option<String>,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowParseError {
    pub sku: Option<String>,
    pub message: String,
}

impl RowParseError {
    pub fn new(sku: Option<String>, message: impl Into<String>) -> Self {
        Self {
            sku,
            message: message.into(),
        }
    }
}

/// A decoded row. `row` is 1-based in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRow {
    pub row: usize,
    pub outcome: Result<ProductRecord, RowParseError>,
}

/// Encoder/decoder for one transfer format.
pub trait RecordCodec: Send + Sync {
    fn encode(&self, records: &[ProductRecord]) -> ImportExportResult<Vec<u8>>;

    fn decode(&self, bytes: &[u8]) -> ImportExportResult<Vec<DecodedRow>>;
}

/// Text form of a record value for the text-only formats.
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_parsing() {
        assert_eq!(TransferFormat::from_str("JSON"), Some(TransferFormat::Json));
        assert_eq!(TransferFormat::from_str("yml"), Some(TransferFormat::Yaml));
        assert_eq!(TransferFormat::from_str("xlsx"), None);
        assert_eq!(TransferFormat::Csv.content_type(), "text/csv");
    }

    #[test]
    fn test_record_wire_shape() {
        let record = ProductRecord {
            sku: "TS-001".to_string(),
            product_type: "simple".to_string(),
            status: Some("DRAFT".to_string()),
            attribute_set: None,
            assigned_to: None,
            categories: vec!["shirts".to_string()],
            attributes: vec![AttributeRecord {
                code: "color".to_string(),
                store_view: Some("default".to_string()),
                value: json!("red"),
            }],
        };

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "sku": "TS-001",
                "type": "simple",
                "status": "DRAFT",
                "categories": ["shirts"],
                "attributes": [{"code": "color", "storeView": "default", "value": "red"}]
            })
        );
    }

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&json!("red")), "red");
        assert_eq!(value_text(&json!(12)), "12");
        assert_eq!(value_text(&json!(true)), "true");
        assert_eq!(value_text(&json!(null)), "");
    }
}
