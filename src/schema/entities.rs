use serde::{Deserialize, Serialize};

use super::{Cd, Ii, Ts, UnmappedFields};

/// Fields shared by every entity of the exchange schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EntityBase {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub template_id: Vec<Ii>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Ii>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<Cd>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_entity: Vec<RelatedEntity>,
}

/// A nested entity together with the role it plays for its source.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RelatedEntity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_role: Option<Cd>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person: Option<Person>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<Organization>,
    /// Elements this model has no mapper for. Kept so the mapping layer can
    /// reject them instead of losing them.
    #[serde(flatten)]
    pub unmapped: UnmappedFields,
}

impl RelatedEntity {
    pub fn new(target_role: Cd) -> Self {
        Self {
            target_role: Some(target_role),
            ..Default::default()
        }
    }

    /// Number of entity alternatives that are set, unmapped ones included.
    pub fn populated_alternatives(&self) -> usize {
        usize::from(self.person.is_some())
            + usize::from(self.organization.is_some())
            + self.unmapped_keys().len()
    }

    pub fn unmapped_keys(&self) -> Vec<&str> {
        super::populated_keys(&self.unmapped)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(flatten)]
    pub entity: EntityBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_time: Option<Ts>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    #[serde(flatten)]
    pub entity: EntityBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
