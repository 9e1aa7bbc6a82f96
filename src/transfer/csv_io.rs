//! CSV transfer format
//!
//! One product per line. Fixed columns come first, then one column per
//! attribute and store view named `<code>@<storeView>` (a bare `<code>`
//! column targets the default store view). Categories are `|`-separated.
//! An empty cell means the field is not provided.

use std::collections::{BTreeSet, HashMap};

use csv::{ReaderBuilder, StringRecord, Writer};
use serde_json::Value;
use tracing::debug;

use super::{value_text, AttributeRecord, DecodedRow, ProductRecord, RecordCodec, RowParseError};
use crate::errors::{ImportExportError, ImportExportResult};

const FIXED_COLUMNS: [&str; 6] = [
    "sku",
    "type",
    "status",
    "attributeSet",
    "assignedTo",
    "categories",
];

const CATEGORY_SEPARATOR: char = '|';

#[derive(Debug, Clone, PartialEq)]
enum Column {
    Sku,
    Type,
    Status,
    AttributeSet,
    AssignedTo,
    Categories,
    Attribute {
        code: String,
        store_view: Option<String>,
    },
}

impl Column {
    fn from_header(header: &str) -> Self {
        match header.trim() {
            "sku" => Column::Sku,
            "type" => Column::Type,
            "status" => Column::Status,
            "attributeSet" => Column::AttributeSet,
            "assignedTo" => Column::AssignedTo,
            "categories" => Column::Categories,
            other => match other.split_once('@') {
                Some((code, store_view)) => Column::Attribute {
                    code: code.to_string(),
                    store_view: Some(store_view.to_string()),
                },
                None => Column::Attribute {
                    code: other.to_string(),
                    store_view: None,
                },
            },
        }
    }
}

fn attribute_column(attribute: &AttributeRecord) -> String {
    match &attribute.store_view {
        Some(store_view) => format!("{}@{}", attribute.code, store_view),
        None => attribute.code.clone(),
    }
}

pub struct CsvCodec;

impl RecordCodec for CsvCodec {
    fn encode(&self, records: &[ProductRecord]) -> ImportExportResult<Vec<u8>> {
        let attribute_columns: BTreeSet<String> = records
            .iter()
            .flat_map(|record| record.attributes.iter().map(attribute_column))
            .collect();

        let mut writer = Writer::from_writer(Vec::new());
        writer.write_record(
            FIXED_COLUMNS
                .iter()
                .copied()
                .chain(attribute_columns.iter().map(String::as_str)),
        )?;

        for record in records {
            let values: HashMap<String, String> = record
                .attributes
                .iter()
                .map(|attribute| (attribute_column(attribute), value_text(&attribute.value)))
                .collect();

            let mut line = vec![
                record.sku.clone(),
                record.product_type.clone(),
                record.status.clone().unwrap_or_default(),
                record.attribute_set.clone().unwrap_or_default(),
                record
                    .assigned_to
                    .map(|id| id.to_string())
                    .unwrap_or_default(),
                record.categories.join(&CATEGORY_SEPARATOR.to_string()),
            ];
            line.extend(
                attribute_columns
                    .iter()
                    .map(|column| values.get(column).cloned().unwrap_or_default()),
            );
            writer.write_record(&line)?;
        }

        writer
            .into_inner()
            .map_err(|e| ImportExportError::Io(e.into_error()))
    }

    fn decode(&self, bytes: &[u8]) -> ImportExportResult<Vec<DecodedRow>> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let mut reader = ReaderBuilder::new().flexible(true).from_reader(bytes);

        let headers = reader
            .headers()
            .map_err(|e| ImportExportError::ParseError(format!("Invalid CSV header: {}", e)))?
            .clone();
        let columns: Vec<Column> = headers.iter().map(Column::from_header).collect();
        if !columns.contains(&Column::Sku) {
            return Err(ImportExportError::ParseError(
                "CSV import requires a header row with a 'sku' column".to_string(),
            ));
        }
        let sku_index = columns.iter().position(|column| *column == Column::Sku);

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let row = index + 1;
            let outcome = match result {
                Ok(line) => {
                    let sku = sku_index
                        .and_then(|i| line.get(i))
                        .map(str::trim)
                        .filter(|sku| !sku.is_empty())
                        .map(str::to_string);
                    if line.len() != columns.len() {
                        Err(RowParseError::new(
                            sku,
                            format!(
                                "expected {} fields, found {}",
                                columns.len(),
                                line.len()
                            ),
                        ))
                    } else {
                        parse_line(&columns, &line)
                            .map_err(|message| RowParseError::new(sku, message))
                    }
                }
                Err(e) => Err(RowParseError::new(None, e.to_string())),
            };
            rows.push(DecodedRow { row, outcome });
        }

        debug!("Decoded {} CSV row(s)", rows.len());
        Ok(rows)
    }
}

fn parse_line(columns: &[Column], line: &StringRecord) -> Result<ProductRecord, String> {
    let mut record = ProductRecord::default();

    for (column, cell) in columns.iter().zip(line.iter()) {
        if cell.is_empty() {
            continue;
        }
        match column {
            Column::Sku => record.sku = cell.trim().to_string(),
            Column::Type => record.product_type = cell.trim().to_string(),
            Column::Status => record.status = Some(cell.trim().to_string()),
            Column::AttributeSet => record.attribute_set = Some(cell.trim().to_string()),
            Column::AssignedTo => {
                let id = cell
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| format!("assignedTo '{}' is not a user id", cell))?;
                record.assigned_to = Some(id);
            }
            Column::Categories => {
                record.categories = cell
                    .split(CATEGORY_SEPARATOR)
                    .map(str::trim)
                    .filter(|code| !code.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            Column::Attribute { code, store_view } => record.attributes.push(AttributeRecord {
                code: code.clone(),
                store_view: store_view.clone(),
                value: Value::String(cell.to_string()),
            }),
        }
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_header_and_columns() {
        let records = vec![ProductRecord {
            sku: "C-1".to_string(),
            product_type: "simple".to_string(),
            status: Some("DRAFT".to_string()),
            categories: vec!["men".to_string(), "shirts".to_string()],
            attributes: vec![
                AttributeRecord {
                    code: "weight".to_string(),
                    store_view: Some("default".to_string()),
                    value: json!("1.50"),
                },
                AttributeRecord {
                    code: "color".to_string(),
                    store_view: Some("default".to_string()),
                    value: json!("red"),
                },
            ],
            ..Default::default()
        }];

        let text = String::from_utf8(CsvCodec.encode(&records).unwrap()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "sku,type,status,attributeSet,assignedTo,categories,color@default,weight@default"
        );
        assert_eq!(lines.next().unwrap(), "C-1,simple,DRAFT,,,men|shirts,red,1.50");
    }

    #[test]
    fn test_decode_skips_empty_cells() {
        let text = "sku,type,status,categories,color@default,qty\nC-1,simple,,a|b,blue,\n";
        let rows = CsvCodec.decode(text.as_bytes()).unwrap();

        let record = rows[0].outcome.as_ref().unwrap();
        assert_eq!(record.status, None);
        assert_eq!(record.categories, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(
            record.attributes,
            vec![AttributeRecord {
                code: "color".to_string(),
                store_view: Some("default".to_string()),
                value: json!("blue"),
            }]
        );
    }

    #[test]
    fn test_decode_wrong_field_count_fails_only_that_row() {
        let text = "sku,type,qty@default\nC-1,simple,1\nC-2,simple\nC-3,simple,3\n";
        let rows = CsvCodec.decode(text.as_bytes()).unwrap();

        assert_eq!(rows.len(), 3);
        assert!(rows[0].outcome.is_ok());
        let failed = rows[1].outcome.as_ref().unwrap_err();
        assert_eq!(rows[1].row, 2);
        assert_eq!(failed.sku.as_deref(), Some("C-2"));
        assert_eq!(failed.message, "expected 3 fields, found 2");
        assert!(rows[2].outcome.is_ok());
    }

    #[test]
    fn test_decode_rejects_bad_assigned_to() {
        let text = "sku,type,assignedTo\nC-1,simple,bob\n";
        let rows = CsvCodec.decode(text.as_bytes()).unwrap();
        assert!(rows[0].outcome.is_err());
    }

    #[test]
    fn test_decode_requires_sku_header() {
        let err = CsvCodec.decode(b"name,type\nshirt,simple\n").unwrap_err();
        assert_eq!(err.error_code(), "PARSE_ERROR");

        let err = CsvCodec.decode(b"").unwrap_err();
        assert_eq!(err.error_code(), "PARSE_ERROR");
    }
}
