//! Product records and their image references.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// Optional image references attached to a product.
///
/// At most three images are carried: front, back and a supporting shot.
/// Values are opaque references (URLs or storage keys) owned by the
/// backing store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImages {
    pub front: Option<String>,
    pub back: Option<String>,
    pub support: Option<String>,
}

impl ProductImages {
    /// Whether any of the three image slots is populated.
    #[must_use]
    pub const fn has_any(&self) -> bool {
        self.front.is_some() || self.back.is_some() || self.support.is_some()
    }
}

/// A product record.
///
/// `category` is a plain string: categories are implicit, derived from the
/// set of values in use, with no entity of their own. `custom_fields` keys
/// are expected to correspond to known [`super::CustomField`] names, but
/// stale keys left behind by deleted definitions are tolerated and shown
/// as opaque key/value pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// System-assigned unique identifier. Never mutated.
    pub id: ProductId,
    /// Optional human-assigned reference code. Unique by convention only.
    pub reference_id: Option<String>,
    /// Display name. Required, non-empty.
    pub name: String,
    /// Category label. Required; may be blank in legacy data.
    pub category: String,
    #[serde(default)]
    pub images: ProductImages,
    #[serde(default)]
    pub custom_fields: HashMap<String, String>,
    /// Creation timestamp. Set once at add-time, never mutated.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// The canonical identifier value encoded into this product's QR code.
    ///
    /// `id` is the stable choice: `reference_id` is optional and its
    /// uniqueness is not enforced.
    #[must_use]
    pub fn qr_payload(&self) -> String {
        self.id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn images_has_any() {
        let mut images = ProductImages::default();
        assert!(!images.has_any());
        images.support = Some("shelf.jpg".to_string());
        assert!(images.has_any());
    }

    #[test]
    fn serializes_camel_case() {
        let product = Product {
            id: ProductId::generate(),
            reference_id: Some("REF1".to_string()),
            name: "Teapot".to_string(),
            category: "Kitchen".to_string(),
            images: ProductImages::default(),
            custom_fields: HashMap::new(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&product).expect("serializes");
        assert!(json.get("referenceId").is_some());
        assert!(json.get("customFields").is_some());
        assert!(json.get("createdAt").is_some());
    }
}
