use super::{
    FactMapper, FieldMapper, MappingContext, NestedObjectsMapper, ObservationBaseMapper,
    OrganizedResults, delegate_to_ancestor, utility,
};
use crate::error::Result;
use crate::internal::{self, InternalStatement};
use crate::schema;

/// Observations the rules recommend be performed.
#[derive(Debug, Clone, Default)]
pub struct ObservationProposalMapper<A = ObservationBaseMapper> {
    ancestor: A,
}

impl ObservationProposalMapper {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A> ObservationProposalMapper<A> {
    pub fn with_ancestor(ancestor: A) -> Self {
        Self { ancestor }
    }
}

impl<A> FieldMapper for ObservationProposalMapper<A>
where
    A: FieldMapper<External = schema::ObservationBase, Internal = internal::ObservationBase>,
{
    type External = schema::ObservationProposal;
    type Internal = internal::ObservationProposal;

    fn pull_in_fields(
        &self,
        source: &Self::External,
        target: &mut Self::Internal,
        subject_person_id: &str,
        focal_person_id: &str,
        context: &mut MappingContext,
    ) -> Result<()> {
        delegate_to_ancestor(
            "ObservationProposalMapper::pull_in",
            self.ancestor.pull_in_fields(
                &source.observation,
                &mut target.observation,
                subject_person_id,
                focal_person_id,
                context,
            ),
        )?;

        if let Some(criticality) = &source.criticality {
            target.criticality = Some(utility::cd_to_cd_internal(
                criticality,
                "ObservationProposal.criticality",
            )?);
        }
        if let Some(time) = &source.proposed_observation_time {
            target.proposed_observation_time = Some(utility::ivl_ts_to_ivl_date_internal(
                time,
                "ObservationProposal.proposedObservationTime",
            )?);
        }
        if let Some(repeat_number) = &source.repeat_number {
            target.repeat_number = Some(utility::int_to_int_internal(
                repeat_number,
                "ObservationProposal.repeatNumber",
            )?);
        }

        Ok(())
    }

    fn push_out_fields(&self, source: &Self::Internal, target: &mut Self::External) -> Result<()> {
        delegate_to_ancestor(
            "ObservationProposalMapper::push_out",
            self.ancestor
                .push_out_fields(&source.observation, &mut target.observation),
        )?;

        target.criticality = source.criticality.as_ref().map(utility::cd_internal_to_cd);
        target.proposed_observation_time = source
            .proposed_observation_time
            .as_ref()
            .map(utility::ivl_date_internal_to_ivl_ts)
            .transpose()?;
        target.repeat_number = source.repeat_number.map(utility::int_internal_to_int);

        Ok(())
    }
}

impl<A> FactMapper for ObservationProposalMapper<A>
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
