use super::{ClinicalStatementMapper, FieldMapper, MappingContext, utility};
use crate::error::Result;
use crate::internal;
use crate::schema;

/// Shared fields of encounter-family statements.
#[derive(Debug, Clone, Default)]
pub struct EncounterBaseMapper<A = ClinicalStatementMapper> {
    ancestor: A,
}

impl EncounterBaseMapper {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A> EncounterBaseMapper<A> {
    pub fn with_ancestor(ancestor: A) -> Self {
        Self { ancestor }
    }
}

impl<A> FieldMapper for EncounterBaseMapper<A>
where
    A: FieldMapper<External = schema::ClinicalStatement, Internal = internal::ClinicalStatement>,
{
    type External = schema::EncounterBase;
    type Internal = internal::EncounterBase;

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

        if let Some(encounter_type) = &source.encounter_type {
            target.encounter_type = Some(utility::cd_to_cd_internal(
                encounter_type,
                "EncounterBase.encounterType",
            )?);
        }

        Ok(())
    }

    fn push_out_fields(&self, source: &Self::Internal, target: &mut Self::External) -> Result<()> {
        self.ancestor
            .push_out_fields(&source.statement, &mut target.statement)?;

        if let Some(encounter_type) = &source.encounter_type {
            target.encounter_type = Some(utility::cd_internal_to_cd(encounter_type));
        }

        Ok(())
    }
}
