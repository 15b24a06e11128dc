use super::{
    AppointmentProposalMapper, AppointmentRequestMapper, EncounterEventMapper, FactMapper,
    MappingContext, MissedAppointmentMapper, ObservationProposalMapper, ObservationResultMapper,
    ScheduledAppointmentMapper, utility,
};
use crate::error::{Result, VmrMappingError};
use crate::internal;
use crate::schema;

/// Maps the evaluated person and, inbound, the statement containers it owns.
///
/// The person's id becomes both the subject and the focal person id of every
/// top-level statement.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvaluatedPersonMapper;

impl EvaluatedPersonMapper {
    pub fn new() -> Self {
        Self
    }

    pub fn pull_in(
        &self,
        source: Option<&schema::EvaluatedPerson>,
        context: &mut MappingContext,
    ) -> Result<Option<String>> {
        let Some(source) = source else {
            return Ok(None);
        };

        let mut target = internal::EvaluatedPerson {
            id: context.resolve_id(source.id.as_ref(), "EvaluatedPerson.id")?,
            ..Default::default()
        };
        if !source.template_id.is_empty() {
            target.template_id =
                utility::iis_to_ids(&source.template_id, "EvaluatedPerson.templateId")?;
        }
        if let Some(demographics) = &source.demographics {
            if let Some(birth_time) = &demographics.birth_time {
                target.birth_time = Some(utility::ts_to_date_internal(
                    birth_time,
                    "EvaluatedPerson.demographics.birthTime",
                )?);
            }
            if let Some(gender) = &demographics.gender {
                target.gender = Some(utility::cd_to_cd_internal(
                    gender,
                    "EvaluatedPerson.demographics.gender",
                )?);
            }
        }

        let person_id = target.id.clone();
        context.register(target)?;

        if let Some(statements) = &source.clinical_statements {
            Self::pull_in_clinical_statements(statements, &person_id, context)?;
        }

        Ok(Some(person_id))
    }

    fn pull_in_clinical_statements(
        statements: &schema::ClinicalStatements,
        person_id: &str,
        context: &mut MappingContext,
    ) -> Result<()> {
        let unmapped = statements.unmapped_keys();
        if !unmapped.is_empty() {
            return Err(VmrMappingError::fatal(format!(
                "EvaluatedPerson '{person_id}' carries statement containers with no mapper: {}",
                unmapped.join(", ")
            )));
        }

        for statement in statements.appointment_requests.iter().flatten() {
            AppointmentRequestMapper::new().pull_in(
                Some(statement),
                Default::default(),
                person_id,
                person_id,
                context,
            )?;
        }
        for statement in statements.appointment_proposals.iter().flatten() {
            AppointmentProposalMapper::new().pull_in(
                Some(statement),
                Default::default(),
                person_id,
                person_id,
                context,
            )?;
        }
        for statement in statements.encounter_events.iter().flatten() {
            EncounterEventMapper::new().pull_in(
                Some(statement),
                Default::default(),
                person_id,
                person_id,
                context,
            )?;
        }
        for statement in statements.scheduled_appointments.iter().flatten() {
            ScheduledAppointmentMapper::new().pull_in(
                Some(statement),
                Default::default(),
                person_id,
                person_id,
                context,
            )?;
        }
        for statement in statements.missed_appointments.iter().flatten() {
            MissedAppointmentMapper::new().pull_in(
                Some(statement),
                Default::default(),
                person_id,
                person_id,
                context,
            )?;
        }
        for statement in statements.observation_results.iter().flatten() {
            ObservationResultMapper::new().pull_in(
                Some(statement),
                Default::default(),
                person_id,
                person_id,
                context,
            )?;
        }
        for statement in statements.observation_proposals.iter().flatten() {
            ObservationProposalMapper::new().pull_in(
                Some(statement),
                Default::default(),
                person_id,
                person_id,
                context,
            )?;
        }
        Ok(())
    }

    /// Builds the output patient without statements; those are attached
    /// separately through [`super::OrganizedResults::attach`].
    pub fn push_out(
        &self,
        source: Option<&internal::EvaluatedPerson>,
    ) -> Result<Option<schema::EvaluatedPerson>> {
        let Some(source) = source else {
            return Ok(None);
        };

        if source.id.is_empty() {
            return Err(VmrMappingError::improper_usage(
                "EvaluatedPerson: internal person has no id",
            ));
        }

        let mut target = schema::EvaluatedPerson {
            id: Some(utility::id_to_ii(&source.id)),
            template_id: utility::ids_to_iis(&source.template_id),
            ..Default::default()
        };

        if source.birth_time.is_some() || source.gender.is_some() {
            target.demographics = Some(schema::Demographics {
                birth_time: source
                    .birth_time
                    .as_ref()
                    .map(utility::date_internal_to_ts)
                    .transpose()?,
                gender: source.gender.as_ref().map(utility::cd_internal_to_cd),
            });
        }

        Ok(Some(target))
    }
}
