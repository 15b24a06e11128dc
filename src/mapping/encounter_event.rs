use super::{
    EncounterBaseMapper, FactMapper, FieldMapper, MappingContext, NestedObjectsMapper,
    OrganizedResults, delegate_to_ancestor, utility,
};
use crate::error::Result;
use crate::internal::{self, InternalStatement};
use crate::schema;

/// Encounters that actually took place.
#[derive(Debug, Clone, Default)]
pub struct EncounterEventMapper<A = EncounterBaseMapper> {
    ancestor: A,
}

impl EncounterEventMapper {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A> EncounterEventMapper<A> {
    pub fn with_ancestor(ancestor: A) -> Self {
        Self { ancestor }
    }
}

impl<A> FieldMapper for EncounterEventMapper<A>
where
    A: FieldMapper<External = schema::EncounterBase, Internal = internal::EncounterBase>,
{
    type External = schema::EncounterEvent;
    type Internal = internal::EncounterEvent;

    fn pull_in_fields(
        &self,
        source: &Self::External,
        target: &mut Self::Internal,
        subject_person_id: &str,
        focal_person_id: &str,
        context: &mut MappingContext,
    ) -> Result<()> {
        delegate_to_ancestor(
            "EncounterEventMapper::pull_in",
            self.ancestor.pull_in_fields(
                &source.encounter,
                &mut target.encounter,
                subject_person_id,
                focal_person_id,
                context,
            ),
        )?;

        if let Some(time) = &source.encounter_event_time {
            target.encounter_event_time = Some(utility::ivl_ts_to_ivl_date_internal(
                time,
                "EncounterEvent.encounterEventTime",
            )?);
        }

        Ok(())
    }

    fn push_out_fields(&self, source: &Self::Internal, target: &mut Self::External) -> Result<()> {
        delegate_to_ancestor(
            "EncounterEventMapper::push_out",
            self.ancestor
                .push_out_fields(&source.encounter, &mut target.encounter),
        )?;

        if let Some(time) = &source.encounter_event_time {
            target.encounter_event_time = Some(utility::ivl_date_internal_to_ivl_ts(time)?);
        }

        Ok(())
    }
}

impl<A> FactMapper for EncounterEventMapper<A>
where
    A: FieldMapper<External = schema::EncounterBase, Internal = internal::EncounterBase>,
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
            &source.encounter.statement,
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
            &mut target.encounter.statement,
            results,
        )
    }
}
