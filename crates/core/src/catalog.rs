//! Catalog filtering and category facet aggregation.

use std::collections::HashMap;

use crate::types::Product;

/// Category facet data derived from a product set.
///
/// `categories` holds the distinct values in first-seen order, so the
/// facet list is stable for a fixed input. Products with a blank category
/// appear in neither the list nor the counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFacets {
    pub categories: Vec<String>,
    pub counts: HashMap<String, usize>,
}

impl CategoryFacets {
    /// Total number of products carrying a non-blank category.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

/// Select the visible product subset for a search term and category facet.
///
/// A product is kept when both hold:
/// - *text match*: the case-folded term is a substring of the name,
///   category, reference code, or any custom-field key or value. A blank
///   or whitespace-only term matches everything; surrounding whitespace
///   in a non-blank term is matched literally. Substring containment
///   only; no tokenisation, no fuzziness.
/// - *category match*: `category` is `None`, or equals the product's
///   category exactly (case-sensitive; the facet comes from the closed
///   set of existing values, not free text).
///
/// The relative order of the input is preserved.
#[must_use]
pub fn filter<'a>(
    products: &'a [Product],
    search_term: &str,
    category: Option<&str>,
) -> Vec<&'a Product> {
    let term = search_term.to_lowercase();

    products
        .iter()
        .filter(|p| term.trim().is_empty() || matches_term(p, &term))
        .filter(|p| category.is_none_or(|c| p.category == c))
        .collect()
}

/// Derive the category facet list and per-category counts.
#[must_use]
pub fn aggregate(products: &[Product]) -> CategoryFacets {
    let mut facets = CategoryFacets::default();

    for product in products {
        let category = product.category.trim();
        if category.is_empty() {
            continue;
        }
        if !facets.counts.contains_key(&product.category) {
            facets.categories.push(product.category.clone());
        }
        *facets.counts.entry(product.category.clone()).or_insert(0) += 1;
    }

    facets
}

/// Substring containment of an already case-folded, non-blank term.
fn matches_term(product: &Product, folded_term: &str) -> bool {
    let contains = |s: &str| s.to_lowercase().contains(folded_term);

    contains(&product.name)
        || contains(&product.category)
        || product.reference_id.as_deref().is_some_and(contains)
        || product
            .custom_fields
            .iter()
            .any(|(key, value)| contains(key) || contains(value))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::types::{ProductId, ProductImages};

    fn product(name: &str, category: &str, reference_id: Option<&str>) -> Product {
        Product {
            id: ProductId::generate(),
            reference_id: reference_id.map(String::from),
            name: name.to_string(),
            category: category.to_string(),
            images: ProductImages::default(),
            custom_fields: HashMap::new(),
            created_at: Utc::now(),
        }
    }

    fn sample_set() -> Vec<Product> {
        let mut teapot = product("Teapot", "Kitchen", Some("REF1"));
        teapot
            .custom_fields
            .insert("material".to_string(), "Ceramic".to_string());
        vec![
            teapot,
            product("Towel", "Bath", None),
            product("Kettle", "Kitchen", Some("REF2")),
        ]
    }

    #[test]
    fn substring_match_on_name() {
        let products = sample_set();
        let visible = filter(&products, "pot", None);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Teapot");
    }

    #[test]
    fn blank_term_matches_everything_in_order() {
        let products = sample_set();
        let visible = filter(&products, "", None);
        assert_eq!(visible.len(), products.len());
        let names: Vec<_> = visible.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Teapot", "Towel", "Kettle"]);

        // Whitespace-only behaves the same.
        assert_eq!(filter(&products, "   ", None).len(), products.len());
    }

    #[test]
    fn surrounding_whitespace_is_part_of_the_term() {
        let products = sample_set();
        // " pot " is not a substring of "Teapot"; padding is not stripped.
        assert!(filter(&products, " pot ", None).is_empty());
        assert_eq!(filter(&products, " pot", None).len(), 0);
        assert_eq!(filter(&products, "pot", None).len(), 1);
    }

    #[test]
    fn category_restriction_is_exact() {
        let products = sample_set();
        let kitchen = filter(&products, "", Some("Kitchen"));
        assert_eq!(kitchen.len(), 2);

        // Case-sensitive: the facet comes from existing values.
        assert!(filter(&products, "", Some("kitchen")).is_empty());
        assert!(filter(&products, "", Some("Garage")).is_empty());
    }

    #[test]
    fn text_and_category_are_both_required() {
        let products = sample_set();
        let visible = filter(&products, "towel", Some("Kitchen"));
        assert!(visible.is_empty());
    }

    #[test]
    fn matches_reference_id_and_custom_fields() {
        let products = sample_set();
        assert_eq!(filter(&products, "ref1", None).len(), 1);
        // Custom-field key and value both participate.
        assert_eq!(filter(&products, "material", None).len(), 1);
        assert_eq!(filter(&products, "ceramic", None).len(), 1);
    }

    #[test]
    fn search_is_case_insensitive() {
        let products = sample_set();
        assert_eq!(filter(&products, "TEAPOT", None).len(), 1);
        assert_eq!(filter(&products, "kItChEn", None).len(), 2);
    }

    #[test]
    fn filter_is_idempotent() {
        let products = sample_set();
        let once = filter(&products, "kitchen", Some("Kitchen"));
        let once_owned: Vec<Product> = once.iter().map(|p| (*p).clone()).collect();
        let twice = filter(&once_owned, "kitchen", Some("Kitchen"));
        assert_eq!(
            once.iter().map(|p| p.id).collect::<Vec<_>>(),
            twice.iter().map(|p| p.id).collect::<Vec<_>>()
        );
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(filter(&[], "anything", Some("Kitchen")).is_empty());
    }

    #[test]
    fn aggregate_counts_and_first_seen_order() {
        let products = sample_set();
        let facets = aggregate(&products);
        assert_eq!(facets.categories, ["Kitchen", "Bath"]);
        assert_eq!(facets.counts["Kitchen"], 2);
        assert_eq!(facets.counts["Bath"], 1);
        assert_eq!(facets.total(), products.len());
    }

    #[test]
    fn blank_categories_are_excluded() {
        let mut products = sample_set();
        products.push(product("Mystery", "", None));
        products.push(product("Also mystery", "  ", None));

        let facets = aggregate(&products);
        assert_eq!(facets.categories, ["Kitchen", "Bath"]);
        assert_eq!(facets.total(), 3);
    }

    #[test]
    fn aggregate_of_empty_set_is_empty() {
        let facets = aggregate(&[]);
        assert!(facets.categories.is_empty());
        assert_eq!(facets.total(), 0);
    }
}
