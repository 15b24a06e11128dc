use super::{
    EncounterBaseMapper, FactMapper, FieldMapper, MappingContext, NestedObjectsMapper,
    OrganizedResults, delegate_to_ancestor, utility,
};
use crate::error::Result;
use crate::internal::{self, InternalStatement};
use crate::schema;

#[derive(Debug, Clone, Default)]
pub struct AppointmentProposalMapper<A = EncounterBaseMapper> {
    ancestor: A,
}

impl AppointmentProposalMapper {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A> AppointmentProposalMapper<A> {
    pub fn with_ancestor(ancestor: A) -> Self {
        Self { ancestor }
    }
}

impl<A> FieldMapper for AppointmentProposalMapper<A>
where
    A: FieldMapper<External = schema::EncounterBase, Internal = internal::EncounterBase>,
{
    type External = schema::AppointmentProposal;
    type Internal = internal::AppointmentProposal;

    fn pull_in_fields(
        &self,
        source: &Self::External,
        target: &mut Self::Internal,
        subject_person_id: &str,
        focal_person_id: &str,
        context: &mut MappingContext,
    ) -> Result<()> {
        delegate_to_ancestor(
            "AppointmentProposalMapper::pull_in",
            self.ancestor.pull_in_fields(
                &source.encounter,
                &mut target.encounter,
                subject_person_id,
                focal_person_id,
                context,
            ),
        )?;

        if let Some(criticality) = &source.criticality {
            target.criticality = Some(utility::cd_to_cd_internal(
                criticality,
                "AppointmentProposal.criticality",
            )?);
        }
        if let Some(time) = &source.proposed_appointment_time {
            target.proposed_appointment_time = Some(utility::ivl_ts_to_ivl_date_internal(
                time,
                "AppointmentProposal.proposedAppointmentTime",
            )?);
        }
        if let Some(time) = &source.proposal_issuance_time {
            target.proposal_issuance_time = Some(utility::ivl_ts_to_ivl_date_internal(
                time,
                "AppointmentProposal.proposalIssuanceTime",
            )?);
        }
        if let Some(repeat_number) = &source.repeat_number {
            target.repeat_number = Some(utility::int_to_int_internal(
                repeat_number,
                "AppointmentProposal.repeatNumber",
            )?);
        }

        Ok(())
    }

    fn push_out_fields(&self, source: &Self::Internal, target: &mut Self::External) -> Result<()> {
        delegate_to_ancestor(
            "AppointmentProposalMapper::push_out",
            self.ancestor
                .push_out_fields(&source.encounter, &mut target.encounter),
        )?;

        target.criticality = source.criticality.as_ref().map(utility::cd_internal_to_cd);
        target.proposed_appointment_time = source
            .proposed_appointment_time
            .as_ref()
            .map(utility::ivl_date_internal_to_ivl_ts)
            .transpose()?;
        target.proposal_issuance_time = source
            .proposal_issuance_time
            .as_ref()
            .map(utility::ivl_date_internal_to_ivl_ts)
            .transpose()?;
        target.repeat_number = source.repeat_number.map(utility::int_internal_to_int);

        Ok(())
    }
}

impl<A> FactMapper for AppointmentProposalMapper<A>
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
