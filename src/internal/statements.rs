use serde::{Deserialize, Serialize};

use super::{Cd, IvlDate, ObservationValue};

/// Fields every internal clinical statement carries.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalStatement {
    /// `root` or `root^extension` of the external identifier.
    pub id: String,
    pub evaluated_person_id: String,
    pub subject_is_focal_person: bool,
    pub template_id: Vec<String>,
    pub data_source_type: Option<Cd>,
    /// Forces the statement to the top level of the output document even when
    /// it is also nested under another statement.
    pub clinical_statement_to_be_root: bool,
    /// Set by the rules on statements that belong in the output.
    pub to_be_returned: bool,
}

impl ClinicalStatement {
    pub fn new(id: impl Into<String>, evaluated_person_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            evaluated_person_id: evaluated_person_id.into(),
            ..Default::default()
        }
    }
}

/// Access to the shared statement fields of any concrete statement type.
pub trait InternalStatement {
    fn statement(&self) -> &ClinicalStatement;
    fn statement_mut(&mut self) -> &mut ClinicalStatement;

    fn id(&self) -> &str {
        &self.statement().id
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EncounterBase {
    pub statement: ClinicalStatement,
    pub encounter_type: Option<Cd>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    pub encounter: EncounterBase,
    pub criticality: Option<Cd>,
    pub requested_appointment_time: Option<IvlDate>,
    pub request_issuance_time: Option<IvlDate>,
    pub repeat_number: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentProposal {
    pub encounter: EncounterBase,
    pub criticality: Option<Cd>,
    pub proposed_appointment_time: Option<IvlDate>,
    pub proposal_issuance_time: Option<IvlDate>,
    pub repeat_number: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EncounterEvent {
    pub encounter: EncounterBase,
    pub encounter_event_time: Option<IvlDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledAppointment {
    pub encounter: EncounterBase,
    pub appointment_time: Option<IvlDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MissedAppointment {
    pub encounter: EncounterBase,
    pub appointment_time: Option<IvlDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObservationBase {
    pub statement: ClinicalStatement,
    pub observation_focus: Option<Cd>,
    pub observation_method: Option<Cd>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObservationResult {
    pub observation: ObservationBase,
    pub observation_event_time: Option<IvlDate>,
    pub observation_value: Option<ObservationValue>,
    pub interpretation: Vec<Cd>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObservationProposal {
    pub observation: ObservationBase,
    pub criticality: Option<Cd>,
    pub proposed_observation_time: Option<IvlDate>,
    pub repeat_number: Option<i32>,
}

impl InternalStatement for AppointmentRequest {
    fn statement(&self) -> &ClinicalStatement {
        &self.encounter.statement
    }

    fn statement_mut(&mut self) -> &mut ClinicalStatement {
        &mut self.encounter.statement
    }
}

impl InternalStatement for AppointmentProposal {
    fn statement(&self) -> &ClinicalStatement {
        &self.encounter.statement
    }

    fn statement_mut(&mut self) -> &mut ClinicalStatement {
        &mut self.encounter.statement
    }
}

impl InternalStatement for EncounterEvent {
    fn statement(&self) -> &ClinicalStatement {
        &self.encounter.statement
    }

    fn statement_mut(&mut self) -> &mut ClinicalStatement {
        &mut self.encounter.statement
    }
}

impl InternalStatement for ScheduledAppointment {
    fn statement(&self) -> &ClinicalStatement {
        &self.encounter.statement
    }

    fn statement_mut(&mut self) -> &mut ClinicalStatement {
        &mut self.encounter.statement
    }
}

impl InternalStatement for MissedAppointment {
    fn statement(&self) -> &ClinicalStatement {
        &self.encounter.statement
    }

    fn statement_mut(&mut self) -> &mut ClinicalStatement {
        &mut self.encounter.statement
    }
}

impl InternalStatement for ObservationResult {
    fn statement(&self) -> &ClinicalStatement {
        &self.observation.statement
    }

    fn statement_mut(&mut self) -> &mut ClinicalStatement {
        &mut self.observation.statement
    }
}

impl InternalStatement for ObservationProposal {
    fn statement(&self) -> &ClinicalStatement {
        &self.observation.statement
    }

    fn statement_mut(&mut self) -> &mut ClinicalStatement {
        &mut self.observation.statement
    }
}
