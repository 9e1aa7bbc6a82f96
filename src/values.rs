//! Typed attribute values.
//!
//! Raw input arrives as `serde_json::Value` (HTTP bodies, JSON/YAML
//! imports) or as plain text wrapped in a JSON string (CSV/XML imports)
//! and is coerced against the attribute's data type before anything is
//! persisted.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::database::entities::{product_attribute_values, DataType};
use crate::errors::{CatalogError, CatalogResult};

#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    String(String),
    Text(String),
    Int(i64),
    Decimal(Decimal),
    Boolean(bool),
}

impl AttributeValue {
    /// Coerce a raw value into the typed value for `data_type`.
    ///
    /// `attribute` is the attribute code reported in a `TypeMismatch`.
    pub fn coerce(attribute: &str, data_type: DataType, raw: &Value) -> CatalogResult<Self> {
        let coerced = match data_type {
            DataType::String => coerce_textual(raw).map(AttributeValue::String),
            DataType::Text => coerce_textual(raw).map(AttributeValue::Text),
            DataType::Int => coerce_int(raw).map(AttributeValue::Int),
            DataType::Decimal => coerce_decimal(raw).map(AttributeValue::Decimal),
            DataType::Boolean => coerce_boolean(raw).map(AttributeValue::Boolean),
        };

        coerced.ok_or_else(|| CatalogError::TypeMismatch {
            attribute: attribute.to_string(),
            data_type: data_type.to_string(),
            value: raw.to_string(),
        })
    }

    pub fn data_type(&self) -> DataType {
        match self {
            AttributeValue::String(_) => DataType::String,
            AttributeValue::Text(_) => DataType::Text,
            AttributeValue::Int(_) => DataType::Int,
            AttributeValue::Decimal(_) => DataType::Decimal,
            AttributeValue::Boolean(_) => DataType::Boolean,
        }
    }

    /// Typed JSON rendering. Decimals stay strings so their scale survives.
    pub fn to_json(&self) -> Value {
        match self {
            AttributeValue::String(s) | AttributeValue::Text(s) => Value::String(s.clone()),
            AttributeValue::Int(i) => Value::from(*i),
            AttributeValue::Decimal(d) => Value::String(d.to_string()),
            AttributeValue::Boolean(b) => Value::Bool(*b),
        }
    }

    /// Plain text rendering used by the CSV and XML codecs.
    pub fn to_text(&self) -> String {
        match self {
            AttributeValue::String(s) | AttributeValue::Text(s) => s.clone(),
            AttributeValue::Int(i) => i.to_string(),
            AttributeValue::Decimal(d) => d.to_string(),
            AttributeValue::Boolean(b) => b.to_string(),
        }
    }
}

impl Serialize for AttributeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

fn coerce_textual(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn coerce_int(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => n.as_i64().or_else(|| {
            let f = n.as_f64()?;
            if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
                Some(f as i64)
            } else {
                None
            }
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// JSON numbers arrive already normalised by serde_json (`1.10` reads as
/// `1.1`); only string input keeps its scale.
fn coerce_decimal(raw: &Value) -> Option<Decimal> {
    let text = match raw {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    parse_decimal(&text)
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

fn coerce_boolean(raw: &Value) -> Option<bool> {
    match raw {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// The five value columns of a `product_attribute_values` row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueColumns {
    pub value_string: Option<String>,
    pub value_text: Option<String>,
    pub value_int: Option<i64>,
    pub value_decimal: Option<String>,
    pub value_boolean: Option<bool>,
}

impl From<&AttributeValue> for ValueColumns {
    fn from(value: &AttributeValue) -> Self {
        let mut columns = ValueColumns::default();
        match value {
            AttributeValue::String(s) => columns.value_string = Some(s.clone()),
            AttributeValue::Text(s) => columns.value_text = Some(s.clone()),
            AttributeValue::Int(i) => columns.value_int = Some(*i),
            AttributeValue::Decimal(d) => columns.value_decimal = Some(d.to_string()),
            AttributeValue::Boolean(b) => columns.value_boolean = Some(*b),
        }
        columns
    }
}

impl From<&product_attribute_values::Model> for ValueColumns {
    fn from(model: &product_attribute_values::Model) -> Self {
        ValueColumns {
            value_string: model.value_string.clone(),
            value_text: model.value_text.clone(),
            value_int: model.value_int,
            value_decimal: model.value_decimal.clone(),
            value_boolean: model.value_boolean,
        }
    }
}

impl ValueColumns {
    fn populated(&self) -> usize {
        [
            self.value_string.is_some(),
            self.value_text.is_some(),
            self.value_int.is_some(),
            self.value_decimal.is_some(),
            self.value_boolean.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }

    /// Read back the typed value. The row must have exactly one populated
    /// column and it must be the one `data_type` selects.
    pub fn into_value(self, attribute: &str, data_type: DataType) -> CatalogResult<AttributeValue> {
        let corrupt = |columns: &ValueColumns| CatalogError::TypeMismatch {
            attribute: attribute.to_string(),
            data_type: data_type.to_string(),
            value: format!("{:?}", columns),
        };

        if self.populated() != 1 {
            return Err(corrupt(&self));
        }

        let value = match data_type {
            DataType::String => self.value_string.clone().map(AttributeValue::String),
            DataType::Text => self.value_text.clone().map(AttributeValue::Text),
            DataType::Int => self.value_int.map(AttributeValue::Int),
            DataType::Decimal => self
                .value_decimal
                .as_deref()
                .and_then(parse_decimal)
                .map(AttributeValue::Decimal),
            DataType::Boolean => self.value_boolean.map(AttributeValue::Boolean),
        };

        value.ok_or_else(|| corrupt(&self))
    }

    pub fn apply(self, model: &mut product_attribute_values::ActiveModel) {
        use sea_orm::ActiveValue::Set;

        model.value_string = Set(self.value_string);
        model.value_text = Set(self.value_text);
        model.value_int = Set(self.value_int);
        model.value_decimal = Set(self.value_decimal);
        model.value_boolean = Set(self.value_boolean);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn coerce(data_type: DataType, raw: Value) -> CatalogResult<AttributeValue> {
        AttributeValue::coerce("attr", data_type, &raw)
    }

    #[test]
    fn test_int_coercion() {
        assert_eq!(coerce(DataType::Int, json!(42)).unwrap(), AttributeValue::Int(42));
        assert_eq!(coerce(DataType::Int, json!(" -7 ")).unwrap(), AttributeValue::Int(-7));
        assert_eq!(coerce(DataType::Int, json!(3.0)).unwrap(), AttributeValue::Int(3));
        assert!(coerce(DataType::Int, json!(3.5)).is_err());
        assert!(coerce(DataType::Int, json!("abc")).is_err());
        assert!(coerce(DataType::Int, json!("")).is_err());
        assert!(coerce(DataType::Int, json!(null)).is_err());
        // 2^63 is one past i64::MAX
        assert!(coerce(DataType::Int, json!(9223372036854775808u64)).is_err());
        assert!(coerce(DataType::Int, json!(9.3e18)).is_err());
    }

    #[test]
    fn test_int_mismatch_reports_attribute_and_value() {
        let err = AttributeValue::coerce("qty", DataType::Int, &json!("abc")).unwrap_err();
        match err {
            CatalogError::TypeMismatch {
                attribute,
                data_type,
                value,
            } => {
                assert_eq!(attribute, "qty");
                assert_eq!(data_type, "int");
                assert_eq!(value, "\"abc\"");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decimal_coercion_keeps_scale() {
        let value = coerce(DataType::Decimal, json!("19.90")).unwrap();
        assert_eq!(value.to_text(), "19.90");
        assert_eq!(value.to_json(), json!("19.90"));

        assert_eq!(
            coerce(DataType::Decimal, json!(2.5)).unwrap(),
            AttributeValue::Decimal(Decimal::new(25, 1))
        );
        assert_eq!(
            coerce(DataType::Decimal, json!("1e3")).unwrap(),
            AttributeValue::Decimal(Decimal::new(1000, 0))
        );
        // serde_json has already dropped the trailing zero of a number
        assert_eq!(coerce(DataType::Decimal, json!(1.10)).unwrap().to_text(), "1.1");
        assert!(coerce(DataType::Decimal, json!("heavy")).is_err());
        assert!(coerce(DataType::Decimal, json!(" ")).is_err());
        assert!(coerce(DataType::Decimal, json!(true)).is_err());
    }

    #[test]
    fn test_boolean_literals() {
        for raw in [json!(true), json!("TRUE"), json!("yes"), json!("1"), json!(1)] {
            assert_eq!(coerce(DataType::Boolean, raw).unwrap(), AttributeValue::Boolean(true));
        }
        for raw in [json!(false), json!("False"), json!("no"), json!("0"), json!(0)] {
            assert_eq!(coerce(DataType::Boolean, raw).unwrap(), AttributeValue::Boolean(false));
        }
        assert!(coerce(DataType::Boolean, json!("maybe")).is_err());
        assert!(coerce(DataType::Boolean, json!(2)).is_err());
        assert!(coerce(DataType::Boolean, json!("")).is_err());
    }

    #[test]
    fn test_textual_coercion() {
        assert_eq!(
            coerce(DataType::String, json!(12)).unwrap(),
            AttributeValue::String("12".to_string())
        );
        assert_eq!(
            coerce(DataType::Text, json!("long copy")).unwrap(),
            AttributeValue::Text("long copy".to_string())
        );
        assert_eq!(
            coerce(DataType::String, json!("")).unwrap(),
            AttributeValue::String(String::new())
        );
        assert!(coerce(DataType::String, json!(null)).is_err());
        assert!(coerce(DataType::Text, json!(["a"])).is_err());
        assert!(coerce(DataType::String, json!({"a": 1})).is_err());
    }

    #[test]
    fn test_serialize_uses_typed_json() {
        let values = vec![
            AttributeValue::Int(3),
            AttributeValue::Boolean(false),
            AttributeValue::Decimal(Decimal::new(500, 2)),
        ];
        assert_eq!(serde_json::to_value(&values).unwrap(), json!([3, false, "5.00"]));
    }

    #[test]
    fn test_value_columns_fill_exactly_one() {
        let value = AttributeValue::Decimal(Decimal::new(1990, 2));
        let columns = ValueColumns::from(&value);
        assert_eq!(columns.value_decimal.as_deref(), Some("19.90"));
        assert_eq!(columns.populated(), 1);
        assert_eq!(columns.into_value("price", DataType::Decimal).unwrap(), value);
    }

    #[test]
    fn test_value_columns_reject_corrupt_rows() {
        let wrong_column = ValueColumns::from(&AttributeValue::Int(5));
        assert!(wrong_column.into_value("price", DataType::Decimal).is_err());

        assert!(ValueColumns::default()
            .into_value("price", DataType::Decimal)
            .is_err());

        let two_columns = ValueColumns {
            value_int: Some(1),
            value_boolean: Some(true),
            ..Default::default()
        };
        assert!(two_columns.into_value("flag", DataType::Boolean).is_err());
    }
}
