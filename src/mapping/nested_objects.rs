use super::{
    AppointmentProposalMapper, AppointmentRequestMapper, EncounterEventMapper, FactMapper,
    MappingContext, MissedAppointmentMapper, ObservationProposalMapper, ObservationResultMapper,
    OrganizationMapper, OrganizedResults, PersonMapper, ScheduledAppointmentMapper, utility,
};
use crate::error::{Result, VmrMappingError};
use crate::internal::{self, Fact};
use crate::schema::{self, Categorized};

/// Routes related entities and related clinical statements to the mapper of
/// their concrete type, in both directions.
///
/// Inbound, every nested child is registered as its own fact and linked to its
/// parent by a relationship fact. Outbound, children are found through those
/// relationship facts and rebuilt inside the parent node.
pub struct NestedObjectsMapper;

impl NestedObjectsMapper {
    pub fn pull_in_clinical_statement_nested_objects(
        source: &schema::ClinicalStatement,
        source_id: &str,
        subject_person_id: &str,
        focal_person_id: &str,
        context: &mut MappingContext,
    ) -> Result<()> {
        if source.related_entity.is_empty() && source.related_clinical_statement.is_empty() {
            return Ok(());
        }

        context.enter(source_id)?;
        for related in &source.related_entity {
            Self::pull_in_related_entity(
                related,
                source_id,
                subject_person_id,
                focal_person_id,
                context,
            )?;
        }
        for related in &source.related_clinical_statement {
            Self::pull_in_related_clinical_statement(
                related,
                source_id,
                subject_person_id,
                focal_person_id,
                context,
            )?;
        }
        context.leave();
        Ok(())
    }

    pub fn pull_in_entity_nested_objects(
        source: &schema::EntityBase,
        source_id: &str,
        subject_person_id: &str,
        focal_person_id: &str,
        context: &mut MappingContext,
    ) -> Result<()> {
        if source.related_entity.is_empty() {
            return Ok(());
        }

        context.enter(source_id)?;
        for related in &source.related_entity {
            Self::pull_in_related_entity(
                related,
                source_id,
                subject_person_id,
                focal_person_id,
                context,
            )?;
        }
        context.leave();
        Ok(())
    }

    fn pull_in_related_entity(
        related: &schema::RelatedEntity,
        source_id: &str,
        subject_person_id: &str,
        focal_person_id: &str,
        context: &mut MappingContext,
    ) -> Result<()> {
        let unmapped = related.unmapped_keys();
        if !unmapped.is_empty() {
            return Err(VmrMappingError::fatal(format!(
                "RelatedEntity under '{source_id}' carries entity types with no mapper: {}",
                unmapped.join(", ")
            )));
        }
        let target_role = related.target_role.as_ref().ok_or_else(|| {
            VmrMappingError::invalid_data(format!(
                "RelatedEntity under '{source_id}' has no targetRole"
            ))
        })?;
        let target_role = utility::cd_to_cd_internal(target_role, "RelatedEntity.targetRole")?;
        Self::expect_single_alternative(
            "RelatedEntity",
            source_id,
            related.populated_alternatives(),
        )?;

        let target_entity_id = if let Some(person) = &related.person {
            tracing::trace!(source_id, "routing related Person");
            PersonMapper::new().pull_in(
                Some(person),
                Default::default(),
                subject_person_id,
                focal_person_id,
                context,
            )?
        } else {
            tracing::trace!(source_id, "routing related Organization");
            OrganizationMapper::new().pull_in(
                related.organization.as_ref(),
                Default::default(),
                subject_person_id,
                focal_person_id,
                context,
            )?
        };

        if let Some(target_entity_id) = target_entity_id {
            context.register_relationship(internal::EntityRelationship {
                source_id: source_id.to_string(),
                target_entity_id,
                target_role,
            })?;
        }
        Ok(())
    }

    fn pull_in_related_clinical_statement(
        related: &schema::RelatedClinicalStatement,
        source_id: &str,
        subject_person_id: &str,
        focal_person_id: &str,
        context: &mut MappingContext,
    ) -> Result<()> {
        let unmapped = related.unmapped_keys();
        if !unmapped.is_empty() {
            return Err(VmrMappingError::fatal(format!(
                "RelatedClinicalStatement under '{source_id}' carries statement types with no mapper: {}",
                unmapped.join(", ")
            )));
        }
        let relationship = related.target_relationship_to_source.as_ref().ok_or_else(|| {
            VmrMappingError::invalid_data(format!(
                "RelatedClinicalStatement under '{source_id}' has no targetRelationshipToSource"
            ))
        })?;
        let relationship = utility::cd_to_cd_internal(
            relationship,
            "RelatedClinicalStatement.targetRelationshipToSource",
        )?;
        Self::expect_single_alternative(
            "RelatedClinicalStatement",
            source_id,
            related.populated_alternatives(),
        )?;

        // Exactly one of these is set.
        let mut target_ids = Vec::with_capacity(1);
        target_ids.extend(AppointmentRequestMapper::new().pull_in(
            related.appointment_request.as_ref(),
            Default::default(),
            subject_person_id,
            focal_person_id,
            context,
        )?);
        target_ids.extend(AppointmentProposalMapper::new().pull_in(
            related.appointment_proposal.as_ref(),
            Default::default(),
            subject_person_id,
            focal_person_id,
            context,
        )?);
        target_ids.extend(EncounterEventMapper::new().pull_in(
            related.encounter_event.as_ref(),
            Default::default(),
            subject_person_id,
            focal_person_id,
            context,
        )?);
        target_ids.extend(ScheduledAppointmentMapper::new().pull_in(
            related.scheduled_appointment.as_ref(),
            Default::default(),
            subject_person_id,
            focal_person_id,
            context,
        )?);
        target_ids.extend(MissedAppointmentMapper::new().pull_in(
            related.missed_appointment.as_ref(),
            Default::default(),
            subject_person_id,
            focal_person_id,
            context,
        )?);
        target_ids.extend(ObservationResultMapper::new().pull_in(
            related.observation_result.as_ref(),
            Default::default(),
            subject_person_id,
            focal_person_id,
            context,
        )?);
        target_ids.extend(ObservationProposalMapper::new().pull_in(
            related.observation_proposal.as_ref(),
            Default::default(),
            subject_person_id,
            focal_person_id,
            context,
        )?);

        for target_id in target_ids {
            context.register_relationship(internal::ClinicalStatementRelationship {
                source_id: source_id.to_string(),
                target_id,
                target_relationship_to_source: relationship.clone(),
            })?;
        }
        Ok(())
    }

    fn expect_single_alternative(element: &str, source_id: &str, populated: usize) -> Result<()> {
        match populated {
            1 => Ok(()),
            0 => Err(VmrMappingError::invalid_data(format!(
                "{element} under '{source_id}' carries no child"
            ))),
            count => Err(VmrMappingError::invalid_data(format!(
                "{element} under '{source_id}' carries {count} children, expected one"
            ))),
        }
    }

    pub fn push_out_clinical_statement_nested_objects(
        source: &internal::ClinicalStatement,
        target: &mut schema::ClinicalStatement,
        results: &mut OrganizedResults<'_>,
    ) -> Result<()> {
        let entity_relationships = results.entity_relationships_from(&source.id);
        let statement_relationships = results.statement_relationships_from(&source.id);
        if entity_relationships.is_empty() && statement_relationships.is_empty() {
            return Ok(());
        }

        results.enter(&source.id)?;
        for relationship in entity_relationships {
            target
                .related_entity
                .push(Self::push_out_related_entity(relationship, results)?);
        }
        for relationship in statement_relationships {
            target
                .related_clinical_statement
                .push(Self::push_out_related_clinical_statement(relationship, results)?);
        }
        results.leave();
        Ok(())
    }

    pub fn push_out_entity_nested_objects(
        source: &internal::EntityBase,
        target: &mut schema::EntityBase,
        results: &mut OrganizedResults<'_>,
    ) -> Result<()> {
        let entity_relationships = results.entity_relationships_from(&source.id);
        if entity_relationships.is_empty() {
            return Ok(());
        }

        results.enter(&source.id)?;
        for relationship in entity_relationships {
            target
                .related_entity
                .push(Self::push_out_related_entity(relationship, results)?);
        }
        results.leave();
        Ok(())
    }

    fn push_out_related_entity(
        relationship: &internal::EntityRelationship,
        results: &mut OrganizedResults<'_>,
    ) -> Result<schema::RelatedEntity> {
        let fact = results
            .facts()
            .find_by_id(&relationship.target_entity_id)
            .ok_or_else(|| {
                VmrMappingError::invalid_data(format!(
                    "Entity '{}' related to '{}' is not registered",
                    relationship.target_entity_id, relationship.source_id
                ))
            })?;

        let mut related = schema::RelatedEntity::new(utility::cd_internal_to_cd(
            &relationship.target_role,
        ));
        match fact {
            Fact::Person(person) => {
                related.person = PersonMapper::new().push_out(Some(person), results)?;
            }
            Fact::Organization(organization) => {
                related.organization =
                    OrganizationMapper::new().push_out(Some(organization), results)?;
            }
            other => {
                return Err(VmrMappingError::fatal(format!(
                    "No entity mapper for fact type {} (target '{}' of '{}')",
                    other.fact_type(),
                    relationship.target_entity_id,
                    relationship.source_id
                )));
            }
        }
        Ok(related)
    }

    fn push_out_related_clinical_statement(
        relationship: &internal::ClinicalStatementRelationship,
        results: &mut OrganizedResults<'_>,
    ) -> Result<schema::RelatedClinicalStatement> {
        let fact = results
            .facts()
            .find_by_id(&relationship.target_id)
            .ok_or_else(|| {
                VmrMappingError::invalid_data(format!(
                    "Clinical statement '{}' related to '{}' is not registered",
                    relationship.target_id, relationship.source_id
                ))
            })?;

        let mut related = schema::RelatedClinicalStatement::new(utility::cd_internal_to_cd(
            &relationship.target_relationship_to_source,
        ));
        match fact {
            Fact::AppointmentRequest(statement) => {
                related.appointment_request =
                    AppointmentRequestMapper::new().push_out(Some(statement), results)?;
            }
            Fact::AppointmentProposal(statement) => {
                related.appointment_proposal =
                    AppointmentProposalMapper::new().push_out(Some(statement), results)?;
            }
            Fact::EncounterEvent(statement) => {
                related.encounter_event =
                    EncounterEventMapper::new().push_out(Some(statement), results)?;
            }
            Fact::ScheduledAppointment(statement) => {
                related.scheduled_appointment =
                    ScheduledAppointmentMapper::new().push_out(Some(statement), results)?;
            }
            Fact::MissedAppointment(statement) => {
                related.missed_appointment =
                    MissedAppointmentMapper::new().push_out(Some(statement), results)?;
            }
            Fact::ObservationResult(statement) => {
                related.observation_result =
                    ObservationResultMapper::new().push_out(Some(statement), results)?;
            }
            Fact::ObservationProposal(statement) => {
                related.observation_proposal =
                    ObservationProposalMapper::new().push_out(Some(statement), results)?;
            }
            other => {
                return Err(VmrMappingError::fatal(format!(
                    "No clinical statement mapper for fact type {} (target '{}' of '{}')",
                    other.fact_type(),
                    relationship.target_id,
                    relationship.source_id
                )));
            }
        }
        Ok(related)
    }

    /// Maps a top-level statement fact and attaches it to its category
    /// container.
    pub fn push_out_root_statement(fact: &Fact, results: &mut OrganizedResults<'_>) -> Result<()> {
        let category = results.category_for(fact.fact_type())?;
        tracing::trace!(
            %category,
            id = fact.id().unwrap_or_default(),
            "pushing out root statement"
        );

        match fact {
            Fact::AppointmentRequest(statement) => {
                Self::attach_root(&AppointmentRequestMapper::new(), statement, results)
            }
            Fact::AppointmentProposal(statement) => {
                Self::attach_root(&AppointmentProposalMapper::new(), statement, results)
            }
            Fact::EncounterEvent(statement) => {
                Self::attach_root(&EncounterEventMapper::new(), statement, results)
            }
            Fact::ScheduledAppointment(statement) => {
                Self::attach_root(&ScheduledAppointmentMapper::new(), statement, results)
            }
            Fact::MissedAppointment(statement) => {
                Self::attach_root(&MissedAppointmentMapper::new(), statement, results)
            }
            Fact::ObservationResult(statement) => {
                Self::attach_root(&ObservationResultMapper::new(), statement, results)
            }
            Fact::ObservationProposal(statement) => {
                Self::attach_root(&ObservationProposalMapper::new(), statement, results)
            }
            other => Err(VmrMappingError::fatal(format!(
                "Fact type {} mapped to category {category} but has no statement mapper",
                other.fact_type()
            ))),
        }
    }

    fn attach_root<M>(
        mapper: &M,
        statement: &M::Internal,
        results: &mut OrganizedResults<'_>,
    ) -> Result<()>
    where
        M: FactMapper,
        M::External: Categorized,
    {
        if let Some(node) = mapper.push_out(Some(statement), results)? {
            results.attach(node);
        }
        Ok(())
    }
}
