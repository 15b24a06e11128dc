use serde::{Deserialize, Serialize};

use super::Cd;

/// Links a nested statement (`target_id`) to the statement it was found in.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalStatementRelationship {
    pub source_id: String,
    pub target_id: String,
    pub target_relationship_to_source: Cd,
}

/// Links an entity to the statement or entity that references it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EntityRelationship {
    pub source_id: String,
    pub target_entity_id: String,
    pub target_role: Cd,
}
