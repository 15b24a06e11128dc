use super::{
    EntityBaseMapper, FactMapper, FieldMapper, MappingContext, NestedObjectsMapper,
    OrganizedResults, delegate_to_ancestor,
};
use crate::error::Result;
use crate::internal;
use crate::schema;

#[derive(Debug, Clone, Default)]
pub struct OrganizationMapper<A = EntityBaseMapper> {
    ancestor: A,
}

impl OrganizationMapper {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A> OrganizationMapper<A> {
    pub fn with_ancestor(ancestor: A) -> Self {
        Self { ancestor }
    }
}

impl<A> FieldMapper for OrganizationMapper<A>
where
    A: FieldMapper<External = schema::EntityBase, Internal = internal::EntityBase>,
{
    type External = schema::Organization;
    type Internal = internal::Organization;

    fn pull_in_fields(
        &self,
        source: &Self::External,
        target: &mut Self::Internal,
        subject_person_id: &str,
        focal_person_id: &str,
        context: &mut MappingContext,
    ) -> Result<()> {
        delegate_to_ancestor(
            "OrganizationMapper::pull_in",
            self.ancestor.pull_in_fields(
                &source.entity,
                &mut target.entity,
                subject_person_id,
                focal_person_id,
                context,
            ),
        )?;

        if let Some(name) = &source.name {
            target.name = Some(name.clone());
        }

        Ok(())
    }

    fn push_out_fields(&self, source: &Self::Internal, target: &mut Self::External) -> Result<()> {
        delegate_to_ancestor(
            "OrganizationMapper::push_out",
            self.ancestor
                .push_out_fields(&source.entity, &mut target.entity),
        )?;

        target.name = source.name.clone();
        Ok(())
    }
}

impl<A> FactMapper for OrganizationMapper<A>
where
    A: FieldMapper<External = schema::EntityBase, Internal = internal::EntityBase>,
{
    fn id_of(target: &Self::Internal) -> &str {
        &target.entity.id
    }

    fn pull_in_nested(
        &self,
        source: &Self::External,
        source_id: &str,
        subject_person_id: &str,
        focal_person_id: &str,
        context: &mut MappingContext,
    ) -> Result<()> {
        NestedObjectsMapper::pull_in_entity_nested_objects(
            &source.entity,
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
        NestedObjectsMapper::push_out_entity_nested_objects(
            &source.entity,
            &mut target.entity,
            results,
        )
    }
}
