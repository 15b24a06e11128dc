use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Cd;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EntityBase {
    pub id: String,
    pub evaluated_person_id: String,
    pub template_id: Vec<String>,
    pub entity_type: Option<Cd>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub entity: EntityBase,
    pub name: Option<String>,
    pub birth_time: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub entity: EntityBase,
    pub name: Option<String>,
}

/// The subject of the evaluation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EvaluatedPerson {
    pub id: String,
    pub template_id: Vec<String>,
    pub birth_time: Option<NaiveDateTime>,
    pub gender: Option<Cd>,
}
