use serde::{Deserialize, Serialize};

use super::{Bl, Cd, Ii, Int, IvlTs, RelatedEntity, UnmappedFields};

/// Fields shared by every clinical statement of the exchange schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalStatement {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub template_id: Vec<Ii>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Ii>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_source_type: Option<Cd>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluated_person_id: Option<Ii>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_entity: Vec<RelatedEntity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_clinical_statement: Vec<RelatedClinicalStatement>,
}

/// A nested statement together with its relationship to the enclosing one.
///
/// The schema allows exactly one statement per element; the fields below are
/// the alternatives of that choice.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RelatedClinicalStatement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_relationship_to_source: Option<Cd>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_request: Option<AppointmentRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_proposal: Option<AppointmentProposal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encounter_event: Option<EncounterEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_appointment: Option<ScheduledAppointment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missed_appointment: Option<MissedAppointment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation_result: Option<ObservationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation_proposal: Option<ObservationProposal>,
    /// Elements this model has no mapper for. Kept so the mapping layer can
    /// reject them instead of losing them.
    #[serde(flatten)]
    pub unmapped: UnmappedFields,
}

impl RelatedClinicalStatement {
    pub fn new(target_relationship_to_source: Cd) -> Self {
        Self {
            target_relationship_to_source: Some(target_relationship_to_source),
            ..Default::default()
        }
    }

    /// Number of statement alternatives that are set, unmapped ones included.
    pub fn populated_alternatives(&self) -> usize {
        let mapped = [
            self.appointment_request.is_some(),
            self.appointment_proposal.is_some(),
            self.encounter_event.is_some(),
            self.scheduled_appointment.is_some(),
            self.missed_appointment.is_some(),
            self.observation_result.is_some(),
            self.observation_proposal.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count();
        mapped + self.unmapped_keys().len()
    }

    pub fn unmapped_keys(&self) -> Vec<&str> {
        super::populated_keys(&self.unmapped)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EncounterBase {
    #[serde(flatten)]
    pub statement: ClinicalStatement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encounter_type: Option<Cd>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    #[serde(flatten)]
    pub encounter: EncounterBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criticality: Option<Cd>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_appointment_time: Option<IvlTs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_issuance_time: Option<IvlTs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_number: Option<Int>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentProposal {
    #[serde(flatten)]
    pub encounter: EncounterBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criticality: Option<Cd>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposed_appointment_time: Option<IvlTs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposal_issuance_time: Option<IvlTs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_number: Option<Int>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EncounterEvent {
    #[serde(flatten)]
    pub encounter: EncounterBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encounter_event_time: Option<IvlTs>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledAppointment {
    #[serde(flatten)]
    pub encounter: EncounterBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_time: Option<IvlTs>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MissedAppointment {
    #[serde(flatten)]
    pub encounter: EncounterBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_time: Option<IvlTs>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObservationBase {
    #[serde(flatten)]
    pub statement: ClinicalStatement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation_focus: Option<Cd>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation_method: Option<Cd>,
}

/// Value of an observation result; one alternative is expected to be set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObservationValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concept: Option<Cd>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integer: Option<Int>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boolean: Option<Bl>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObservationResult {
    #[serde(flatten)]
    pub observation: ObservationBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation_event_time: Option<IvlTs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation_value: Option<ObservationValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interpretation: Vec<Cd>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObservationProposal {
    #[serde(flatten)]
    pub observation: ObservationBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criticality: Option<Cd>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposed_observation_time: Option<IvlTs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_number: Option<Int>,
}
