//! XML transfer format
//!
//! ```xml
//! <products>
//!   <product sku="TS-001" type="simple" status="DRAFT" attributeSet="apparel">
//!     <category>shirts</category>
//!     <attribute code="color" storeView="default">red</attribute>
//!   </product>
//! </products>
//! ```

use std::collections::HashMap;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde_json::Value;
use tracing::debug;

use super::{value_text, AttributeRecord, DecodedRow, ProductRecord, RecordCodec, RowParseError};
use crate::errors::{ImportExportError, ImportExportResult};

const ROOT: &str = "products";
const PRODUCT: &str = "product";
const CATEGORY: &str = "category";
const ATTRIBUTE: &str = "attribute";

pub struct XmlCodec;

impl RecordCodec for XmlCodec {
    fn encode(&self, records: &[ProductRecord]) -> ImportExportResult<Vec<u8>> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer.write_event(Event::Start(BytesStart::new(ROOT)))?;

        for record in records {
            let assigned_to = record.assigned_to.map(|id| id.to_string());
            let mut product = BytesStart::new(PRODUCT);
            product.push_attribute(("sku", record.sku.as_str()));
            product.push_attribute(("type", record.product_type.as_str()));
            if let Some(status) = &record.status {
                product.push_attribute(("status", status.as_str()));
            }
            if let Some(attribute_set) = &record.attribute_set {
                product.push_attribute(("attributeSet", attribute_set.as_str()));
            }
            if let Some(assigned_to) = &assigned_to {
                product.push_attribute(("assignedTo", assigned_to.as_str()));
            }

            if record.categories.is_empty() && record.attributes.is_empty() {
                writer.write_event(Event::Empty(product))?;
                continue;
            }

            writer.write_event(Event::Start(product))?;
            for category in &record.categories {
                writer.write_event(Event::Start(BytesStart::new(CATEGORY)))?;
                writer.write_event(Event::Text(BytesText::new(category)))?;
                writer.write_event(Event::End(BytesEnd::new(CATEGORY)))?;
            }
            for attribute in &record.attributes {
                let mut element = BytesStart::new(ATTRIBUTE);
                element.push_attribute(("code", attribute.code.as_str()));
                if let Some(store_view) = &attribute.store_view {
                    element.push_attribute(("storeView", store_view.as_str()));
                }
                let text = value_text(&attribute.value);
                writer.write_event(Event::Start(element))?;
                writer.write_event(Event::Text(BytesText::new(&text)))?;
                writer.write_event(Event::End(BytesEnd::new(ATTRIBUTE)))?;
            }
            writer.write_event(Event::End(BytesEnd::new(PRODUCT)))?;
        }

        writer.write_event(Event::End(BytesEnd::new(ROOT)))?;
        Ok(writer.into_inner())
    }

    fn decode(&self, bytes: &[u8]) -> ImportExportResult<Vec<DecodedRow>> {
        let mut reader = Reader::from_reader(bytes);
        let mut rows = Vec::new();

        // Root element
        loop {
            match next_event(&mut reader)? {
                Event::Start(e) if e.name().as_ref() == ROOT.as_bytes() => break,
                Event::Empty(e) if e.name().as_ref() == ROOT.as_bytes() => return Ok(rows),
                Event::Start(e) | Event::Empty(e) => {
                    return Err(ImportExportError::ParseError(format!(
                        "Expected <{}> root element, found <{}>",
                        ROOT,
                        String::from_utf8_lossy(e.name().as_ref())
                    )))
                }
                Event::Eof => {
                    return Err(ImportExportError::ParseError(format!(
                        "Missing <{}> root element",
                        ROOT
                    )))
                }
                _ => {}
            }
        }

        // Products
        loop {
            match next_event(&mut reader)? {
                Event::Start(e) if e.name().as_ref() == PRODUCT.as_bytes() => {
                    let row = rows.len() + 1;
                    let outcome = read_product(&mut reader, &e, true)?;
                    rows.push(DecodedRow { row, outcome });
                }
                Event::Empty(e) if e.name().as_ref() == PRODUCT.as_bytes() => {
                    let row = rows.len() + 1;
                    let outcome = read_product(&mut reader, &e, false)?;
                    rows.push(DecodedRow { row, outcome });
                }
                Event::Start(e) | Event::Empty(e) => {
                    return Err(ImportExportError::ParseError(format!(
                        "Unexpected <{}> inside <{}>",
                        String::from_utf8_lossy(e.name().as_ref()),
                        ROOT
                    )))
                }
                Event::End(_) => break,
                Event::Eof => {
                    return Err(ImportExportError::ParseError(format!(
                        "Unexpected end of document inside <{}>",
                        ROOT
                    )))
                }
                _ => {}
            }
        }

        debug!("Decoded {} XML product(s)", rows.len());
        Ok(rows)
    }
}

fn next_event<'a>(reader: &mut Reader<&'a [u8]>) -> ImportExportResult<Event<'a>> {
    reader.read_event().map_err(|e| {
        ImportExportError::ParseError(format!(
            "Invalid XML at position {}: {}",
            reader.buffer_position(),
            e
        ))
    })
}

fn attributes_of(element: &BytesStart) -> Result<HashMap<String, String>, String> {
    let mut attributes = HashMap::new();
    for attribute in element.attributes() {
        let attribute = attribute.map_err(|e| e.to_string())?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| e.to_string())?
            .into_owned();
        attributes.insert(key, value);
    }
    Ok(attributes)
}

/// Read one `<product>`. Document-level syntax errors propagate; shape
/// problems become the row's parse error once the element is consumed.
fn read_product(
    reader: &mut Reader<&[u8]>,
    element: &BytesStart,
    has_children: bool,
) -> ImportExportResult<Result<ProductRecord, RowParseError>> {
    let mut record = ProductRecord::default();
    let mut problem: Option<String> = None;

    match attributes_of(element) {
        Ok(mut attributes) => {
            record.sku = attributes.remove("sku").unwrap_or_default();
            record.product_type = attributes.remove("type").unwrap_or_default();
            record.status = attributes.remove("status");
            record.attribute_set = attributes.remove("attributeSet");
            if let Some(assigned_to) = attributes.remove("assignedTo") {
                match assigned_to.trim().parse::<i32>() {
                    Ok(id) => record.assigned_to = Some(id),
                    Err(_) => {
                        problem = Some(format!("assignedTo '{}' is not a user id", assigned_to))
                    }
                }
            }
        }
        Err(message) => problem = Some(message),
    }

    if has_children {
        loop {
            match next_event(reader)? {
                Event::Start(child) => {
                    let name = child.name().as_ref().to_vec();
                    let text = read_text(reader)?;
                    let result = match (name.as_slice(), text) {
                        (b"category", Ok(code)) => {
                            record.categories.push(code.trim().to_string());
                            Ok(())
                        }
                        (b"attribute", Ok(text)) => push_attribute(&mut record, &child, text),
                        (b"category", Err(message)) | (b"attribute", Err(message)) => Err(message),
                        (other, _) => Err(format!(
                            "unexpected <{}> element",
                            String::from_utf8_lossy(other)
                        )),
                    };
                    if let Err(message) = result {
                        problem.get_or_insert(message);
                    }
                }
                Event::Empty(child) => {
                    let result = match child.name().as_ref() {
                        b"attribute" => push_attribute(&mut record, &child, String::new()),
                        other => Err(format!(
                            "unexpected empty <{}> element",
                            String::from_utf8_lossy(other)
                        )),
                    };
                    if let Err(message) = result {
                        problem.get_or_insert(message);
                    }
                }
                Event::End(_) => break,
                Event::Eof => {
                    return Err(ImportExportError::ParseError(format!(
                        "Unexpected end of document inside <{}>",
                        PRODUCT
                    )))
                }
                _ => {}
            }
        }
    }

    Ok(match problem {
        Some(message) => {
            let sku = Some(record.sku).filter(|sku| !sku.is_empty());
            Err(RowParseError::new(sku, message))
        }
        None => Ok(record),
    })
}

fn push_attribute(
    record: &mut ProductRecord,
    element: &BytesStart,
    text: String,
) -> Result<(), String> {
    let mut attributes = attributes_of(element)?;
    let code = attributes
        .remove("code")
        .filter(|code| !code.trim().is_empty())
        .ok_or_else(|| "attribute element without a code".to_string())?;

    record.attributes.push(AttributeRecord {
        code,
        store_view: attributes.remove("storeView"),
        value: Value::String(text),
    });
    Ok(())
}

/// Collect the text of a leaf element up to its end tag. Nested elements
/// are consumed and reported as the row's problem.
fn read_text(reader: &mut Reader<&[u8]>) -> ImportExportResult<Result<String, String>> {
    let mut text = String::new();
    let mut problem = None;
    let mut depth = 0usize;

    loop {
        match next_event(reader)? {
            Event::Text(t) => match t.unescape() {
                Ok(unescaped) if depth == 0 => text.push_str(&unescaped),
                Ok(_) => {}
                Err(e) => {
                    problem.get_or_insert(e.to_string());
                }
            },
            Event::CData(data) if depth == 0 => {
                text.push_str(&String::from_utf8_lossy(&data.into_inner()));
            }
            Event::Start(child) => {
                problem.get_or_insert(format!(
                    "unexpected <{}> inside a value",
                    String::from_utf8_lossy(child.name().as_ref())
                ));
                depth += 1;
            }
            Event::End(_) if depth > 0 => depth -= 1,
            Event::End(_) => break,
            Event::Eof => {
                return Err(ImportExportError::ParseError(
                    "Unexpected end of document inside a value".to_string(),
                ))
            }
            _ => {}
        }
    }

    Ok(match problem {
        Some(message) => Err(message),
        None => Ok(text),
    })
}
