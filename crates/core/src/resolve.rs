//! Product resolution: mapping a decoded payload to a product record.

use crate::types::Product;

/// Resolve a decoded payload against a product set.
///
/// A product matches if the payload equals its `id` in canonical string
/// form, or its `reference_id`. The first match in the set's iteration
/// order wins; a collision between the two forms cannot raise an error.
/// A miss returns `None` so callers present a "no matching product"
/// outcome rather than a failure.
#[must_use]
pub fn resolve<'a>(payload: &str, products: &'a [Product]) -> Option<&'a Product> {
    products.iter().find(|p| {
        p.id.to_string() == payload || p.reference_id.as_deref() == Some(payload)
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::Utc;

    use super::*;
    use crate::types::{ProductId, ProductImages};

    fn product(name: &str, reference_id: Option<&str>) -> Product {
        Product {
            id: ProductId::generate(),
            reference_id: reference_id.map(String::from),
            name: name.to_string(),
            category: "Kitchen".to_string(),
            images: ProductImages::default(),
            custom_fields: HashMap::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn resolves_by_id_for_every_product() {
        let products = vec![
            product("Teapot", Some("REF1")),
            product("Kettle", None),
            product("Tray", Some("REF3")),
        ];

        for p in &products {
            let found = resolve(&p.id.to_string(), &products).expect("id resolves");
            assert_eq!(found.id, p.id);
        }
    }

    #[test]
    fn resolves_by_reference_id() {
        let products = vec![product("Teapot", Some("REF1")), product("Kettle", None)];
        let found = resolve("REF1", &products).expect("reference resolves");
        assert_eq!(found.name, "Teapot");
    }

    #[test]
    fn unrelated_payload_is_a_miss() {
        let products = vec![product("Teapot", Some("REF1")), product("Kettle", Some("REF2"))];
        assert!(resolve("no-such-product", &products).is_none());
    }

    #[test]
    fn empty_set_is_a_miss() {
        assert!(resolve("anything", &[]).is_none());
    }

    #[test]
    fn first_match_in_iteration_order_wins() {
        // reference_id uniqueness is convention only, so a duplicate must
        // resolve deterministically to the earlier entry.
        let products = vec![product("First", Some("DUP")), product("Second", Some("DUP"))];
        let found = resolve("DUP", &products).expect("resolves");
        assert_eq!(found.name, "First");
    }
}
