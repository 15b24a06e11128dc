use super::{
    EncounterBaseMapper, FactMapper, FieldMapper, MappingContext, NestedObjectsMapper,
    OrganizedResults, delegate_to_ancestor, utility,
};
use crate::error::Result;
use crate::internal::{self, InternalStatement};
use crate::schema;

/// Maps appointment requests in both directions between the exchange schema
/// and the rule facts.
#[derive(Debug, Clone, Default)]
pub struct AppointmentRequestMapper<A = EncounterBaseMapper> {
    ancestor: A,
}

impl AppointmentRequestMapper {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A> AppointmentRequestMapper<A> {
    pub fn with_ancestor(ancestor: A) -> Self {
        Self { ancestor }
    }
}

impl<A> FieldMapper for AppointmentRequestMapper<A>
where
    A: FieldMapper<External = schema::EncounterBase, Internal = internal::EncounterBase>,
{
    type External = schema::AppointmentRequest;
    type Internal = internal::AppointmentRequest;

    fn pull_in_fields(
        &self,
        source: &Self::External,
        target: &mut Self::Internal,
        subject_person_id: &str,
        focal_person_id: &str,
        context: &mut MappingContext,
    ) -> Result<()> {
        delegate_to_ancestor(
            "AppointmentRequestMapper::pull_in",
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
                "AppointmentRequest.criticality",
            )?);
        }
        if let Some(time) = &source.requested_appointment_time {
            target.requested_appointment_time = Some(utility::ivl_ts_to_ivl_date_internal(
                time,
                "AppointmentRequest.requestedAppointmentTime",
            )?);
        }
        if let Some(time) = &source.request_issuance_time {
            target.request_issuance_time = Some(utility::ivl_ts_to_ivl_date_internal(
                time,
                "AppointmentRequest.requestIssuanceTime",
            )?);
        }
        if let Some(repeat_number) = &source.repeat_number {
            target.repeat_number = Some(utility::int_to_int_internal(
                repeat_number,
                "AppointmentRequest.repeatNumber",
            )?);
        }

        Ok(())
    }

    fn push_out_fields(&self, source: &Self::Internal, target: &mut Self::External) -> Result<()> {
        delegate_to_ancestor(
            "AppointmentRequestMapper::push_out",
            self.ancestor
                .push_out_fields(&source.encounter, &mut target.encounter),
        )?;

        if let Some(criticality) = &source.criticality {
            target.criticality = Some(utility::cd_internal_to_cd(criticality));
        }
        if let Some(time) = &source.requested_appointment_time {
            target.requested_appointment_time =
                Some(utility::ivl_date_internal_to_ivl_ts(time)?);
        }
        if let Some(time) = &source.request_issuance_time {
            target.request_issuance_time = Some(utility::ivl_date_internal_to_ivl_ts(time)?);
        }
        if let Some(repeat_number) = source.repeat_number {
            target.repeat_number = Some(utility::int_internal_to_int(repeat_number));
        }

        Ok(())
    }
}

impl<A> FactMapper for AppointmentRequestMapper<A>
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
