use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    AppointmentProposal, AppointmentRequest, Cd, EncounterEvent, Ii, MissedAppointment,
    ObservationProposal, ObservationResult, ScheduledAppointment, Ts, UnmappedFields,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CdsInput {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub template_id: Vec<Ii>,
    pub vmr_input: VmrInput,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VmrInput {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub template_id: Vec<Ii>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<EvaluatedPerson>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CdsOutput {
    pub vmr_output: VmrOutput,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VmrOutput {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub template_id: Vec<Ii>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<EvaluatedPerson>,
}

/// The person the document is about, and the root of its statement tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EvaluatedPerson {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub template_id: Vec<Ii>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Ii>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demographics: Option<Demographics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinical_statements: Option<ClinicalStatements>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Demographics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_time: Option<Ts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Cd>,
}

/// Per-category statement containers. A container is `None` until a
/// statement of its category is attached.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalStatements {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_requests: Option<Vec<AppointmentRequest>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_proposals: Option<Vec<AppointmentProposal>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encounter_events: Option<Vec<EncounterEvent>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_appointments: Option<Vec<ScheduledAppointment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missed_appointments: Option<Vec<MissedAppointment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation_results: Option<Vec<ObservationResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation_proposals: Option<Vec<ObservationProposal>>,
    /// Containers this model has no mapper for. Kept so the mapping layer can
    /// reject them instead of losing them.
    #[serde(flatten)]
    pub unmapped: UnmappedFields,
}

impl ClinicalStatements {
    pub fn unmapped_keys(&self) -> Vec<&str> {
        super::populated_keys(&self.unmapped)
    }

    /// Number of statements in the container for `category`, `None` when the
    /// container was never created.
    pub fn container_len(&self, category: StatementCategory) -> Option<usize> {
        match category {
            StatementCategory::AppointmentRequests => {
                self.appointment_requests.as_ref().map(Vec::len)
            }
            StatementCategory::AppointmentProposals => {
                self.appointment_proposals.as_ref().map(Vec::len)
            }
            StatementCategory::EncounterEvents => self.encounter_events.as_ref().map(Vec::len),
            StatementCategory::ScheduledAppointments => {
                self.scheduled_appointments.as_ref().map(Vec::len)
            }
            StatementCategory::MissedAppointments => {
                self.missed_appointments.as_ref().map(Vec::len)
            }
            StatementCategory::ObservationResults => {
                self.observation_results.as_ref().map(Vec::len)
            }
            StatementCategory::ObservationProposals => {
                self.observation_proposals.as_ref().map(Vec::len)
            }
        }
    }

    pub fn has_container(&self, category: StatementCategory) -> bool {
        self.container_len(category).is_some()
    }
}

/// Output container category of a top-level clinical statement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum StatementCategory {
    AppointmentRequests,
    AppointmentProposals,
    EncounterEvents,
    ScheduledAppointments,
    MissedAppointments,
    ObservationResults,
    ObservationProposals,
}

impl StatementCategory {
    pub fn all() -> &'static [StatementCategory] {
        &[
            StatementCategory::AppointmentRequests,
            StatementCategory::AppointmentProposals,
            StatementCategory::EncounterEvents,
            StatementCategory::ScheduledAppointments,
            StatementCategory::MissedAppointments,
            StatementCategory::ObservationResults,
            StatementCategory::ObservationProposals,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatementCategory::AppointmentRequests => "appointmentRequests",
            StatementCategory::AppointmentProposals => "appointmentProposals",
            StatementCategory::EncounterEvents => "encounterEvents",
            StatementCategory::ScheduledAppointments => "scheduledAppointments",
            StatementCategory::MissedAppointments => "missedAppointments",
            StatementCategory::ObservationResults => "observationResults",
            StatementCategory::ObservationProposals => "observationProposals",
        }
    }
}

impl fmt::Display for StatementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An external statement type that lives in one category container.
pub trait Categorized: Sized {
    const CATEGORY: StatementCategory;

    fn container(statements: &mut ClinicalStatements) -> &mut Option<Vec<Self>>;
}

impl Categorized for AppointmentRequest {
    const CATEGORY: StatementCategory = StatementCategory::AppointmentRequests;

    fn container(statements: &mut ClinicalStatements) -> &mut Option<Vec<Self>> {
        &mut statements.appointment_requests
    }
}

impl Categorized for AppointmentProposal {
    const CATEGORY: StatementCategory = StatementCategory::AppointmentProposals;

    fn container(statements: &mut ClinicalStatements) -> &mut Option<Vec<Self>> {
        &mut statements.appointment_proposals
    }
}

impl Categorized for EncounterEvent {
    const CATEGORY: StatementCategory = StatementCategory::EncounterEvents;

    fn container(statements: &mut ClinicalStatements) -> &mut Option<Vec<Self>> {
        &mut statements.encounter_events
    }
}

impl Categorized for ScheduledAppointment {
    const CATEGORY: StatementCategory = StatementCategory::ScheduledAppointments;

    fn container(statements: &mut ClinicalStatements) -> &mut Option<Vec<Self>> {
        &mut statements.scheduled_appointments
    }
}

impl Categorized for MissedAppointment {
    const CATEGORY: StatementCategory = StatementCategory::MissedAppointments;

    fn container(statements: &mut ClinicalStatements) -> &mut Option<Vec<Self>> {
        &mut statements.missed_appointments
    }
}

impl Categorized for ObservationResult {
    const CATEGORY: StatementCategory = StatementCategory::ObservationResults;

    fn container(statements: &mut ClinicalStatements) -> &mut Option<Vec<Self>> {
        &mut statements.observation_results
    }
}

impl Categorized for ObservationProposal {
    const CATEGORY: StatementCategory = StatementCategory::ObservationProposals;

    fn container(statements: &mut ClinicalStatements) -> &mut Option<Vec<Self>> {
        &mut statements.observation_proposals
    }
}
