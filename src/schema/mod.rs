//! External vMR document model, as produced and consumed by the document
//! codec. Every field is optional; nothing here is validated.

use std::collections::BTreeMap;

mod datatypes;
mod document;
mod entities;
mod statements;

pub use datatypes::*;
pub use document::*;
pub use entities::*;
pub use statements::*;

/// Elements of the exchange document that have no counterpart in this model.
pub type UnmappedFields = BTreeMap<String, serde_json::Value>;

/// Keys of `fields` carrying a value; explicit `null`s count as absent.
fn populated_keys(fields: &UnmappedFields) -> Vec<&str> {
    fields
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, _)| key.as_str())
        .collect()
}
