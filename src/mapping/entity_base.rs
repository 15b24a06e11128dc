use super::{FieldMapper, MappingContext, utility};
use crate::error::{Result, VmrMappingError};
use crate::internal;
use crate::schema;

/// Root of the entity hierarchy.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityBaseMapper;

impl EntityBaseMapper {
    pub fn new() -> Self {
        Self
    }
}

impl FieldMapper for EntityBaseMapper {
    type External = schema::EntityBase;
    type Internal = internal::EntityBase;

    fn pull_in_fields(
        &self,
        source: &Self::External,
        target: &mut Self::Internal,
        subject_person_id: &str,
        _focal_person_id: &str,
        context: &mut MappingContext,
    ) -> Result<()> {
        if subject_person_id.is_empty() {
            return Err(VmrMappingError::improper_usage(
                "EntityBase: subjectPersonId must be provided by the caller",
            ));
        }

        target.id = context.resolve_id(source.id.as_ref(), "EntityBase.id")?;
        target.evaluated_person_id = subject_person_id.to_string();

        if !source.template_id.is_empty() {
            target.template_id = utility::iis_to_ids(&source.template_id, "EntityBase.templateId")?;
        }
        if let Some(entity_type) = &source.entity_type {
            target.entity_type = Some(utility::cd_to_cd_internal(
                entity_type,
                "EntityBase.entityType",
            )?);
        }
        if let Some(description) = &source.description {
            target.description = Some(description.clone());
        }

        Ok(())
    }

    fn push_out_fields(&self, source: &Self::Internal, target: &mut Self::External) -> Result<()> {
        if source.id.is_empty() {
            return Err(VmrMappingError::improper_usage(
                "EntityBase: internal entity has no id",
            ));
        }

        target.id = Some(utility::id_to_ii(&source.id));
        target.template_id = utility::ids_to_iis(&source.template_id);
        target.entity_type = source.entity_type.as_ref().map(utility::cd_internal_to_cd);
        target.description = source.description.clone();

        Ok(())
    }
}
