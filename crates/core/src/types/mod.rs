//! Core domain types.

pub mod field;
pub mod id;
pub mod product;

pub use field::{CustomField, FieldType, ValueError, validate_value};
pub use id::{FieldId, ProductId};
pub use product::{Product, ProductImages};
