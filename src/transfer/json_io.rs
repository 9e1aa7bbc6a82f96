//! JSON transfer format: a top-level array of product records.

use serde_json::Value;
use tracing::debug;

use super::{DecodedRow, ProductRecord, RecordCodec, RowParseError};
use crate::errors::{ImportExportError, ImportExportResult};

pub struct JsonCodec;

impl RecordCodec for JsonCodec {
    fn encode(&self, records: &[ProductRecord]) -> ImportExportResult<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(records)?)
    }

    fn decode(&self, bytes: &[u8]) -> ImportExportResult<Vec<DecodedRow>> {
        let document: Value = serde_json::from_slice(bytes)
            .map_err(|e| ImportExportError::ParseError(format!("Invalid JSON document: {}", e)))?;

        let Value::Array(items) = document else {
            return Err(ImportExportError::ParseError(
                "JSON import must be an array of products".to_string(),
            ));
        };

        debug!("Decoding {} JSON record(s)", items.len());
        Ok(items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let sku = item.get("sku").and_then(Value::as_str).map(str::to_string);
                DecodedRow {
                    row: index + 1,
                    outcome: serde_json::from_value::<ProductRecord>(item)
                        .map_err(|e| RowParseError::new(sku, e.to_string())),
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::AttributeRecord;
    use serde_json::json;

    #[test]
    fn test_decode_rows_independently() {
        let document = json!([
            {"sku": "A-1", "type": "simple", "attributes": [{"code": "qty", "value": 3}]},
            {"sku": "A-2", "type": "simple", "categories": "not-a-list"},
            {"sku": "A-3", "type": "simple"}
        ]);
        let rows = JsonCodec.decode(document.to_string().as_bytes()).unwrap();

        assert_eq!(rows.len(), 3);
        let first = rows[0].outcome.as_ref().unwrap();
        assert_eq!(
            first.attributes,
            vec![AttributeRecord {
                code: "qty".to_string(),
                store_view: None,
                value: json!(3),
            }]
        );

        let failed = rows[1].outcome.as_ref().unwrap_err();
        assert_eq!(rows[1].row, 2);
        assert_eq!(failed.sku.as_deref(), Some("A-2"));
        assert!(rows[2].outcome.is_ok());
    }

    #[test]
    fn test_decode_rejects_non_array() {
        let err = JsonCodec.decode(br#"{"sku": "A-1"}"#).unwrap_err();
        assert_eq!(err.error_code(), "PARSE_ERROR");

        let err = JsonCodec.decode(b"[{").unwrap_err();
        assert_eq!(err.error_code(), "PARSE_ERROR");
    }

    #[test]
    fn test_encode_omits_unset_fields() {
        let record = ProductRecord {
            sku: "A-1".to_string(),
            product_type: "simple".to_string(),
            ..Default::default()
        };
        let bytes = JsonCodec.encode(&[record]).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            value,
            json!([{"sku": "A-1", "type": "simple", "categories": [], "attributes": []}])
        );
    }
}
