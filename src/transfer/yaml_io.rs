//! YAML transfer format: a top-level sequence of product records.

use tracing::debug;

use super::{DecodedRow, ProductRecord, RecordCodec, RowParseError};
use crate::errors::{ImportExportError, ImportExportResult};

pub struct YamlCodec;

impl RecordCodec for YamlCodec {
    fn encode(&self, records: &[ProductRecord]) -> ImportExportResult<Vec<u8>> {
        Ok(serde_yaml::to_string(records)?.into_bytes())
    }

    fn decode(&self, bytes: &[u8]) -> ImportExportResult<Vec<DecodedRow>> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let document: serde_yaml::Value = serde_yaml::from_slice(bytes)
            .map_err(|e| ImportExportError::ParseError(format!("Invalid YAML document: {}", e)))?;

        let items = match document {
            serde_yaml::Value::Sequence(items) => items,
            serde_yaml::Value::Null => Vec::new(),
            _ => {
                return Err(ImportExportError::ParseError(
                    "YAML import must be a sequence of products".to_string(),
                ))
            }
        };

        debug!("Decoding {} YAML record(s)", items.len());
        Ok(items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let sku = item
                    .get("sku")
                    .and_then(serde_yaml::Value::as_str)
                    .map(str::to_string);
                DecodedRow {
                    row: index + 1,
                    outcome: serde_yaml::from_value::<ProductRecord>(item)
                        .map_err(|e| RowParseError::new(sku, e.to_string())),
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_sequence() {
        let document = "
- sku: B-1
  type: simple
  status: ENRICHMENT
  categories: [shoes]
  attributes:
    - code: price
      storeView: default
      value: '19.90'
- sku: B-2
  type: simple
  assignedTo: not-a-number
";
        let rows = YamlCodec.decode(document.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);

        let first = rows[0].outcome.as_ref().unwrap();
        assert_eq!(first.status.as_deref(), Some("ENRICHMENT"));
        assert_eq!(first.categories, vec!["shoes".to_string()]);
        assert_eq!(first.attributes[0].value, json!("19.90"));

        let failed = rows[1].outcome.as_ref().unwrap_err();
        assert_eq!(failed.sku.as_deref(), Some("B-2"));
    }

    #[test]
    fn test_decode_rejects_mapping() {
        let err = YamlCodec.decode(b"sku: B-1\n").unwrap_err();
        assert_eq!(err.error_code(), "PARSE_ERROR");
    }

    #[test]
    fn test_empty_document_has_no_rows() {
        assert!(YamlCodec.decode(b"").unwrap().is_empty());
    }

    #[test]
    fn test_encode_keeps_decimal_text() {
        let record = ProductRecord {
            sku: "B-1".to_string(),
            product_type: "simple".to_string(),
            attributes: vec![crate::transfer::AttributeRecord {
                code: "price".to_string(),
                store_view: None,
                value: json!("19.90"),
            }],
            ..Default::default()
        };
        let bytes = YamlCodec.encode(&[record.clone()]).unwrap();
        let rows = YamlCodec.decode(&bytes).unwrap();
        assert_eq!(rows[0].outcome.as_ref().unwrap(), &record);
    }
}
