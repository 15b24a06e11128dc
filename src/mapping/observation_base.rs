use super::{ClinicalStatementMapper, FieldMapper, MappingContext, utility};
use crate::error::Result;
use crate::internal;
use crate::schema;

/// Shared fields of observation-family statements.
#[derive(Debug, Clone, Default)]
pub struct ObservationBaseMapper<A = ClinicalStatementMapper> {
    ancestor: A,
}

impl ObservationBaseMapper {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A> ObservationBaseMapper<A> {
    pub fn with_ancestor(ancestor: A) -> Self {
        Self { ancestor }
    }
}

impl<A> FieldMapper for ObservationBaseMapper<A>
where
    A: FieldMapper<External = schema::ClinicalStatement, Internal = internal::ClinicalStatement>,
{
    type External = schema::ObservationBase;
    type Internal = internal::ObservationBase;

    fn pull_in_fields(
        &self,
        source: &Self::External,
        target: &mut Self::Internal,
        subject_person_id: &str,
        focal_person_id: &str,
        context: &mut MappingContext,
    ) -> Result<()> {
        self.ancestor.pull_in_fields(
            &source.statement,
            &mut target.statement,
            subject_person_id,
            focal_person_id,
            context,
        )?;

        if let Some(focus) = &source.observation_focus {
            target.observation_focus = Some(utility::cd_to_cd_internal(
                focus,
                "ObservationBase.observationFocus",
            )?);
        }
        if let Some(method) = &source.observation_method {
            target.observation_method = Some(utility::cd_to_cd_internal(
                method,
                "ObservationBase.observationMethod",
            )?);
        }

        Ok(())
    }

    fn push_out_fields(&self, source: &Self::Internal, target: &mut Self::External) -> Result<()> {
        self.ancestor
            .push_out_fields(&source.statement, &mut target.statement)?;

        target.observation_focus = source
            .observation_focus
            .as_ref()
            .map(utility::cd_internal_to_cd);
        target.observation_method = source
            .observation_method
            .as_ref()
            .map(utility::cd_internal_to_cd);

        Ok(())
    }
}
