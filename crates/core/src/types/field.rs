//! Custom-field schema definitions.
//!
//! A [`CustomField`] describes a user-defined key/value entry attachable to
//! any product. Definitions live independently of products: creating,
//! editing or deleting a definition never cascades into existing product
//! data.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::FieldId;

/// Input widget/validation type of a custom field.
///
/// The wire form keeps the front-end vocabulary (`text`, `number`,
/// `textarea`) so stored definitions keep deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Single-line text input.
    #[serde(rename = "text")]
    ShortText,
    /// Numeric input.
    Number,
    /// Multi-line text input.
    #[serde(rename = "textarea")]
    LongText,
}

/// Error returned when a stored field-type tag is not recognised.
#[derive(Debug, Error)]
#[error("unknown field type: {0}")]
pub struct UnknownFieldType(pub String);

impl FieldType {
    /// Parse the stored wire form (`text`, `number`, `textarea`).
    ///
    /// # Errors
    ///
    /// Returns [`UnknownFieldType`] for any other tag.
    pub fn parse(s: &str) -> Result<Self, UnknownFieldType> {
        match s {
            "text" => Ok(Self::ShortText),
            "number" => Ok(Self::Number),
            "textarea" => Ok(Self::LongText),
            other => Err(UnknownFieldType(other.to_string())),
        }
    }

    /// The stored wire form of this type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ShortText => "text",
            Self::Number => "number",
            Self::LongText => "textarea",
        }
    }
}

/// A custom-field schema definition (not a per-product value).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomField {
    pub id: FieldId,
    /// Machine key used to index `Product::custom_fields`.
    pub name: String,
    /// Display label.
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Enforced only at entry-form validation, never re-validated against
    /// existing products.
    pub required: bool,
    /// Marks a field pre-seeded by the system. Informational only.
    #[serde(default)]
    pub is_default: bool,
}

/// Validate a submitted value against a field definition.
///
/// This is the single entry-form validation site: `required` means a
/// non-blank value must be present, and [`FieldType::Number`] values must
/// parse as a number. All other types accept any string.
pub fn validate_value(field: &CustomField, value: Option<&str>) -> Result<(), ValueError> {
    let value = value.map(str::trim).filter(|v| !v.is_empty());

    match value {
        None if field.required => Err(ValueError::Missing {
            name: field.name.clone(),
        }),
        None => Ok(()),
        Some(v) => match field.field_type {
            FieldType::ShortText | FieldType::LongText => Ok(()),
            FieldType::Number => {
                if v.parse::<f64>().is_ok() {
                    Ok(())
                } else {
                    Err(ValueError::NotANumber {
                        name: field.name.clone(),
                        value: v.to_string(),
                    })
                }
            }
        },
    }
}

/// Entry-form validation failure for a single custom-field value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValueError {
    #[error("required field '{name}' is missing")]
    Missing { name: String },
    #[error("field '{name}' expects a number, got '{value}'")]
    NotANumber { name: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(field_type: FieldType, required: bool) -> CustomField {
        CustomField {
            id: FieldId::generate(),
            name: "weight".to_string(),
            label: "Weight".to_string(),
            field_type,
            required,
            is_default: false,
        }
    }

    #[test]
    fn wire_form_round_trips() {
        for ty in [FieldType::ShortText, FieldType::Number, FieldType::LongText] {
            assert_eq!(FieldType::parse(ty.as_str()).expect("known tag"), ty);
        }
        assert!(FieldType::parse("date").is_err());
    }

    #[test]
    fn serde_uses_front_end_vocabulary() {
        let json = serde_json::to_string(&FieldType::LongText).expect("serializes");
        assert_eq!(json, "\"textarea\"");
        let parsed: FieldType = serde_json::from_str("\"text\"").expect("parses");
        assert_eq!(parsed, FieldType::ShortText);
    }

    #[test]
    fn required_field_rejects_blank() {
        let f = field(FieldType::ShortText, true);
        assert_eq!(
            validate_value(&f, None),
            Err(ValueError::Missing {
                name: "weight".to_string()
            })
        );
        assert_eq!(validate_value(&f, Some("  ")), Err(ValueError::Missing {
            name: "weight".to_string()
        }));
        assert_eq!(validate_value(&f, Some("1kg")), Ok(()));
    }

    #[test]
    fn optional_field_accepts_blank() {
        let f = field(FieldType::Number, false);
        assert_eq!(validate_value(&f, None), Ok(()));
        assert_eq!(validate_value(&f, Some("")), Ok(()));
    }

    #[test]
    fn number_field_requires_numeric_value() {
        let f = field(FieldType::Number, true);
        assert_eq!(validate_value(&f, Some("12.5")), Ok(()));
        assert!(matches!(
            validate_value(&f, Some("heavy")),
            Err(ValueError::NotANumber { .. })
        ));
    }
}
