use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    AppointmentProposal, AppointmentRequest, ClinicalStatement, ClinicalStatementRelationship,
    EncounterEvent, EntityBase, EntityRelationship, EvaluatedPerson, InternalStatement,
    MissedAppointment, ObservationProposal, ObservationResult, Organization, Person,
    ScheduledAppointment,
};
use crate::schema::StatementCategory;

/// Tag identifying the concrete type of a registered fact.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FactType {
    EvaluatedPerson,
    AppointmentRequest,
    AppointmentProposal,
    EncounterEvent,
    ScheduledAppointment,
    MissedAppointment,
    ObservationResult,
    ObservationProposal,
    Person,
    Organization,
    ClinicalStatementRelationship,
    EntityRelationship,
}

impl FactType {
    /// Clinical statement fact types in the order the mappers visit them.
    pub fn statements() -> &'static [FactType] {
        &[
            FactType::AppointmentRequest,
            FactType::AppointmentProposal,
            FactType::EncounterEvent,
            FactType::ScheduledAppointment,
            FactType::MissedAppointment,
            FactType::ObservationResult,
            FactType::ObservationProposal,
        ]
    }

    /// Output container a top-level fact of this type is attached to.
    pub fn output_category(&self) -> Option<StatementCategory> {
        match self {
            FactType::AppointmentRequest => Some(StatementCategory::AppointmentRequests),
            FactType::AppointmentProposal => Some(StatementCategory::AppointmentProposals),
            FactType::EncounterEvent => Some(StatementCategory::EncounterEvents),
            FactType::ScheduledAppointment => Some(StatementCategory::ScheduledAppointments),
            FactType::MissedAppointment => Some(StatementCategory::MissedAppointments),
            FactType::ObservationResult => Some(StatementCategory::ObservationResults),
            FactType::ObservationProposal => Some(StatementCategory::ObservationProposals),
            FactType::EvaluatedPerson
            | FactType::Person
            | FactType::Organization
            | FactType::ClinicalStatementRelationship
            | FactType::EntityRelationship => None,
        }
    }

    pub fn is_statement(&self) -> bool {
        self.output_category().is_some()
    }
}

impl fmt::Display for FactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A registered internal fact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "factType", content = "fact")]
pub enum Fact {
    EvaluatedPerson(EvaluatedPerson),
    AppointmentRequest(AppointmentRequest),
    AppointmentProposal(AppointmentProposal),
    EncounterEvent(EncounterEvent),
    ScheduledAppointment(ScheduledAppointment),
    MissedAppointment(MissedAppointment),
    ObservationResult(ObservationResult),
    ObservationProposal(ObservationProposal),
    Person(Person),
    Organization(Organization),
    ClinicalStatementRelationship(ClinicalStatementRelationship),
    EntityRelationship(EntityRelationship),
}

impl Fact {
    pub fn fact_type(&self) -> FactType {
        match self {
            Fact::EvaluatedPerson(_) => FactType::EvaluatedPerson,
            Fact::AppointmentRequest(_) => FactType::AppointmentRequest,
            Fact::AppointmentProposal(_) => FactType::AppointmentProposal,
            Fact::EncounterEvent(_) => FactType::EncounterEvent,
            Fact::ScheduledAppointment(_) => FactType::ScheduledAppointment,
            Fact::MissedAppointment(_) => FactType::MissedAppointment,
            Fact::ObservationResult(_) => FactType::ObservationResult,
            Fact::ObservationProposal(_) => FactType::ObservationProposal,
            Fact::Person(_) => FactType::Person,
            Fact::Organization(_) => FactType::Organization,
            Fact::ClinicalStatementRelationship(_) => FactType::ClinicalStatementRelationship,
            Fact::EntityRelationship(_) => FactType::EntityRelationship,
        }
    }

    pub fn as_statement(&self) -> Option<&ClinicalStatement> {
        match self {
            Fact::AppointmentRequest(fact) => Some(fact.statement()),
            Fact::AppointmentProposal(fact) => Some(fact.statement()),
            Fact::EncounterEvent(fact) => Some(fact.statement()),
            Fact::ScheduledAppointment(fact) => Some(fact.statement()),
            Fact::MissedAppointment(fact) => Some(fact.statement()),
            Fact::ObservationResult(fact) => Some(fact.statement()),
            Fact::ObservationProposal(fact) => Some(fact.statement()),
            _ => None,
        }
    }

    pub fn as_statement_mut(&mut self) -> Option<&mut ClinicalStatement> {
        match self {
            Fact::AppointmentRequest(fact) => Some(fact.statement_mut()),
            Fact::AppointmentProposal(fact) => Some(fact.statement_mut()),
            Fact::EncounterEvent(fact) => Some(fact.statement_mut()),
            Fact::ScheduledAppointment(fact) => Some(fact.statement_mut()),
            Fact::MissedAppointment(fact) => Some(fact.statement_mut()),
            Fact::ObservationResult(fact) => Some(fact.statement_mut()),
            Fact::ObservationProposal(fact) => Some(fact.statement_mut()),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&EntityBase> {
        match self {
            Fact::Person(person) => Some(&person.entity),
            Fact::Organization(organization) => Some(&organization.entity),
            _ => None,
        }
    }

    /// Identifier of identifiable facts; relationships have none.
    pub fn id(&self) -> Option<&str> {
        match self {
            Fact::EvaluatedPerson(person) => Some(&person.id),
            _ => self
                .as_statement()
                .map(|statement| statement.id.as_str())
                .or_else(|| self.as_entity().map(|entity| entity.id.as_str())),
        }
    }
}

/// Conversion between a concrete internal type and the [`Fact`] variant that
/// stores it.
pub trait FactKind: Sized + 'static {
    const FACT_TYPE: FactType;

    fn into_fact(self) -> Fact;
    fn from_fact(fact: &Fact) -> Option<&Self>;
    fn from_fact_mut(fact: &mut Fact) -> Option<&mut Self>;
}

macro_rules! impl_fact_kind {
    ($($variant:ident),* $(,)?) => {
        $(
            impl FactKind for $variant {
                const FACT_TYPE: FactType = FactType::$variant;

                fn into_fact(self) -> Fact {
                    Fact::$variant(self)
                }

                fn from_fact(fact: &Fact) -> Option<&Self> {
                    match fact {
                        Fact::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }

                fn from_fact_mut(fact: &mut Fact) -> Option<&mut Self> {
                    match fact {
                        Fact::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_fact_kind!(
    EvaluatedPerson,
    AppointmentRequest,
    AppointmentProposal,
    EncounterEvent,
    ScheduledAppointment,
    MissedAppointment,
    ObservationResult,
    ObservationProposal,
    Person,
    Organization,
    ClinicalStatementRelationship,
    EntityRelationship,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fact_type_round_trips_through_fact() {
        let request = AppointmentRequest::default();
        let fact = request.into_fact();
        assert_eq!(fact.fact_type(), FactType::AppointmentRequest);
        assert!(AppointmentRequest::from_fact(&fact).is_some());
        assert!(EncounterEvent::from_fact(&fact).is_none());
    }

    #[test]
    fn only_statements_have_output_categories() {
        for fact_type in FactType::statements() {
            assert!(fact_type.is_statement());
        }
        assert!(FactType::Person.output_category().is_none());
        assert!(FactType::ClinicalStatementRelationship.output_category().is_none());
    }

    #[test]
    fn relationships_have_no_id() {
        let fact = Fact::ClinicalStatementRelationship(ClinicalStatementRelationship::default());
        assert!(fact.id().is_none());

        let mut person = Person::default();
        person.entity.id = "p1".to_string();
        assert_eq!(person.into_fact().id(), Some("p1"));
    }
}
