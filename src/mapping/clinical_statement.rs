use super::{FieldMapper, MappingContext, utility};
use crate::error::{Result, VmrMappingError};
use crate::internal;
use crate::schema;

/// Root of the statement hierarchy: identity, provenance and the person the
/// statement is about.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClinicalStatementMapper;

impl ClinicalStatementMapper {
    pub fn new() -> Self {
        Self
    }
}

impl FieldMapper for ClinicalStatementMapper {
    type External = schema::ClinicalStatement;
    type Internal = internal::ClinicalStatement;

    fn pull_in_fields(
        &self,
        source: &Self::External,
        target: &mut Self::Internal,
        subject_person_id: &str,
        focal_person_id: &str,
        context: &mut MappingContext,
    ) -> Result<()> {
        if subject_person_id.is_empty() {
            return Err(VmrMappingError::improper_usage(
                "ClinicalStatement: subjectPersonId must be provided by the caller",
            ));
        }

        target.id = context.resolve_id(source.id.as_ref(), "ClinicalStatement.id")?;
        target.evaluated_person_id = match &source.evaluated_person_id {
            Some(ii) => utility::ii_to_id(ii, "ClinicalStatement.evaluatedPersonId")?,
            None => subject_person_id.to_string(),
        };
        target.subject_is_focal_person = target.evaluated_person_id == focal_person_id;

        if !source.template_id.is_empty() {
            target.template_id =
                utility::iis_to_ids(&source.template_id, "ClinicalStatement.templateId")?;
        }
        if let Some(data_source_type) = &source.data_source_type {
            target.data_source_type = Some(utility::cd_to_cd_internal(
                data_source_type,
                "ClinicalStatement.dataSourceType",
            )?);
        }

        Ok(())
    }

    fn push_out_fields(&self, source: &Self::Internal, target: &mut Self::External) -> Result<()> {
        if source.id.is_empty() {
            return Err(VmrMappingError::improper_usage(
                "ClinicalStatement: internal statement has no id",
            ));
        }

        target.id = Some(utility::id_to_ii(&source.id));
        if !source.evaluated_person_id.is_empty() {
            target.evaluated_person_id = Some(utility::id_to_ii(&source.evaluated_person_id));
        }
        target.template_id = utility::ids_to_iis(&source.template_id);
        target.data_source_type = source
            .data_source_type
            .as_ref()
            .map(utility::cd_internal_to_cd);

        Ok(())
    }
}
