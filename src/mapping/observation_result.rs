use super::{
    FactMapper, FieldMapper, MappingContext, NestedObjectsMapper, ObservationBaseMapper,
    OrganizedResults, delegate_to_ancestor, utility,
};
use crate::error::{Result, VmrMappingError};
use crate::internal::{self, InternalStatement};
use crate::schema;

#[derive(Debug, Clone, Default)]
pub struct ObservationResultMapper<A = ObservationBaseMapper> {
    ancestor: A,
}

impl ObservationResultMapper {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A> ObservationResultMapper<A> {
    pub fn with_ancestor(ancestor: A) -> Self {
        Self { ancestor }
    }
}

fn observation_value_to_internal(
    source: &schema::ObservationValue,
) -> Result<Option<internal::ObservationValue>> {
    const FIELD: &str = "ObservationResult.observationValue";

    let present = [
        source.concept.is_some(),
        source.integer.is_some(),
        source.boolean.is_some(),
    ]
    .iter()
    .filter(|present| **present)
    .count();
    if present > 1 {
        return Err(VmrMappingError::invalid_data(format!(
            "{FIELD} carries {present} alternatives, expected one"
        )));
    }

    if let Some(concept) = &source.concept {
        let concept = utility::cd_to_cd_internal(concept, &format!("{FIELD}.concept"))?;
        return Ok(Some(internal::ObservationValue::Concept(concept)));
    }
    if let Some(integer) = &source.integer {
        let integer = utility::int_to_int_internal(integer, &format!("{FIELD}.integer"))?;
        return Ok(Some(internal::ObservationValue::Integer(integer)));
    }
    if let Some(boolean) = &source.boolean {
        let boolean = utility::bl_to_bool_internal(boolean, &format!("{FIELD}.boolean"))?;
        return Ok(Some(internal::ObservationValue::Boolean(boolean)));
    }
    Ok(None)
}

fn observation_value_to_external(source: &internal::ObservationValue) -> schema::ObservationValue {
    let mut target = schema::ObservationValue::default();
    match source {
        internal::ObservationValue::Concept(concept) => {
            target.concept = Some(utility::cd_internal_to_cd(concept));
        }
        internal::ObservationValue::Integer(integer) => {
            target.integer = Some(utility::int_internal_to_int(*integer));
        }
        internal::ObservationValue::Boolean(boolean) => {
            target.boolean = Some(utility::bool_internal_to_bl(*boolean));
        }
    }
    target
}

impl<A> FieldMapper for ObservationResultMapper<A>
where
    A: FieldMapper<External = schema::ObservationBase, Internal = internal::ObservationBase>,
{
    type External = schema::ObservationResult;
    type Internal = internal::ObservationResult;

    fn pull_in_fields(
        &self,
        source: &Self::External,
        target: &mut Self::Internal,
        subject_person_id: &str,
        focal_person_id: &str,
        context: &mut MappingContext,
    ) -> Result<()> {
        delegate_to_ancestor(
            "ObservationResultMapper::pull_in",
            self.ancestor.pull_in_fields(
                &source.observation,
                &mut target.observation,
                subject_person_id,
                focal_person_id,
                context,
            ),
        )?;

        if let Some(time) = &source.observation_event_time {
            target.observation_event_time = Some(utility::ivl_ts_to_ivl_date_internal(
                time,
                "ObservationResult.observationEventTime",
            )?);
        }
        if let Some(value) = &source.observation_value {
            target.observation_value = observation_value_to_internal(value)?;
        }
        if !source.interpretation.is_empty() {
            target.interpretation = utility::cds_to_cds_internal(
                &source.interpretation,
                "ObservationResult.interpretation",
            )?;
        }

        Ok(())
    }

    fn push_out_fields(&self, source: &Self::Internal, target: &mut Self::External) -> Result<()> {
        delegate_to_ancestor(
            "ObservationResultMapper::push_out",
            self.ancestor
                .push_out_fields(&source.observation, &mut target.observation),
        )?;

        target.observation_event_time = source
            .observation_event_time
            .as_ref()
            .map(utility::ivl_date_internal_to_ivl_ts)
            .transpose()?;
        target.observation_value = source
            .observation_value
            .as_ref()
            .map(observation_value_to_external);
        target.interpretation = utility::cds_internal_to_cds(&source.interpretation);

        Ok(())
    }
}

impl<A> FactMapper for ObservationResultMapper<A>
where
    A: FieldMapper<External = schema::ObservationBase, Internal = internal::ObservationBase>,
{
    fn id_of(target: &Self::Internal) -> &str {
        target.id()
    }

    fn pull_in_nested(
        &self,
        source: &Self::External,
        source_id: &str,
        subject_person_id: &str,
        focal_person_id: &str,
        context: &mut MappingContext,
    ) -> Result<()> {
        NestedObjectsMapper::pull_in_clinical_statement_nested_objects(
            &source.observation.statement,
            source_id,
            subject_person_id,
            focal_person_id,
            context,
        )
    }

    fn push_out_nested(
        &self,
        source: &Self::Internal,
        target: &mut Self::External,
        results: &mut OrganizedResults<'_>,
    ) -> Result<()> {
        NestedObjectsMapper::push_out_clinical_statement_nested_objects(
            source.statement(),
            &mut target.observation.statement,
            results,
        )
    }
}
