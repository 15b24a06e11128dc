mod appointment_proposal;
mod appointment_request;
mod clinical_statement;
mod context;
mod encounter_base;
mod encounter_event;
mod entity_base;
mod evaluated_person;
mod fact_lists;
mod missed_appointment;
mod nested_objects;
mod observation_base;
mod observation_proposal;
mod observation_result;
mod organization;
mod organized_results;
mod person;
mod scheduled_appointment;
pub mod utility;

pub use appointment_proposal::*;
pub use appointment_request::*;
pub use clinical_statement::*;
pub use context::*;
pub use encounter_base::*;
pub use encounter_event::*;
pub use entity_base::*;
pub use evaluated_person::*;
pub use fact_lists::*;
pub use missed_appointment::*;
pub use nested_objects::*;
pub use observation_base::*;
pub use observation_proposal::*;
pub use observation_result::*;
pub use organization::*;
pub use organized_results::*;
pub use person::*;
pub use scheduled_appointment::*;

use crate::core::MappingConfig;
use crate::error::{Result, VmrMappingError};
use crate::internal::{self, FactKind};
use crate::schema::{CdsInput, CdsOutput};

/// Maps the fields one level of the type hierarchy contributes.
///
/// Every mapper implements this, so any mapper can serve as the ancestor of a
/// more specific one.
pub trait FieldMapper {
    type External;
    type Internal;

    fn pull_in_fields(
        &self,
        source: &Self::External,
        target: &mut Self::Internal,
        subject_person_id: &str,
        focal_person_id: &str,
        context: &mut MappingContext,
    ) -> Result<()>;

    fn push_out_fields(&self, source: &Self::Internal, target: &mut Self::External)
    -> Result<()>;
}

/// Full two-way mapping of a concrete, registrable type.
pub trait FactMapper: FieldMapper<External: Default, Internal: FactKind> {
    fn id_of(target: &Self::Internal) -> &str;

    fn pull_in_nested(
        &self,
        source: &Self::External,
        source_id: &str,
        subject_person_id: &str,
        focal_person_id: &str,
        context: &mut MappingContext,
    ) -> Result<()>;

    fn push_out_nested(
        &self,
        source: &Self::Internal,
        target: &mut Self::External,
        results: &mut OrganizedResults<'_>,
    ) -> Result<()>;

    /// Populates `target` from `source`, registers it, then maps the nested
    /// children. Returns the id of the registered fact, `None` when there is
    /// no source.
    fn pull_in(
        &self,
        source: Option<&Self::External>,
        mut target: Self::Internal,
        subject_person_id: &str,
        focal_person_id: &str,
        context: &mut MappingContext,
    ) -> Result<Option<String>> {
        let Some(source) = source else {
            return Ok(None);
        };

        self.pull_in_fields(source, &mut target, subject_person_id, focal_person_id, context)?;

        let id = Self::id_of(&target).to_string();
        context.register(target)?;

        self.pull_in_nested(source, &id, subject_person_id, focal_person_id, context)?;
        Ok(Some(id))
    }

    /// Builds a new external node from `source`, including its nested
    /// children. Placement of the node is up to the caller.
    fn push_out(
        &self,
        source: Option<&Self::Internal>,
        results: &mut OrganizedResults<'_>,
    ) -> Result<Option<Self::External>> {
        let Some(source) = source else {
            return Ok(None);
        };

        let mut target = Self::External::default();
        self.push_out_fields(source, &mut target)?;
        self.push_out_nested(source, &mut target, results)?;
        Ok(Some(target))
    }
}

/// Runs an ancestor mapper whose preconditions the caller has already
/// established. An `ImproperUsage` from it is a bug in this crate and is
/// escalated to `Fatal`.
pub(crate) fn delegate_to_ancestor(method: &str, result: Result<()>) -> Result<()> {
    match result {
        Err(VmrMappingError::ImproperUsage { message }) => {
            let err_str = format!("{method}: Caught unexpected ImproperUsage error: {message}");
            tracing::error!(method, %message, "ancestor mapper reported improper usage");
            Err(VmrMappingError::fatal(err_str))
        }
        other => other,
    }
}

/// Entry point for whole-document mapping in both directions.
#[derive(Debug, Clone, Default)]
pub struct VmrMapper {
    config: MappingConfig,
}

impl VmrMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MappingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MappingConfig {
        &self.config
    }

    /// Maps an input document into facts. Any error invalidates the whole
    /// pass; nothing partial is returned.
    pub fn pull_in(&self, input: &CdsInput) -> Result<FactLists> {
        self.config.validate()?;

        let patient = input.vmr_input.patient.as_ref().ok_or_else(|| {
            VmrMappingError::invalid_data("CDSInput.vmrInput.patient is required")
        })?;

        let mut context = MappingContext::new(&self.config);
        EvaluatedPersonMapper::new().pull_in(Some(patient), &mut context)?;

        tracing::debug!(
            facts = context.mapping_stats.facts_registered,
            relationships = context.mapping_stats.relationships_registered,
            ids_generated = context.mapping_stats.ids_generated,
            "inbound mapping completed"
        );
        Ok(context.into_facts())
    }

    pub fn pull_in_json(&self, input: &str) -> Result<FactLists> {
        let input: CdsInput = serde_json::from_str(input)?;
        self.pull_in(&input)
    }

    /// Rebuilds an output document from facts, typically after rule
    /// evaluation has flagged or added some of them.
    pub fn push_out(&self, facts: &FactLists) -> Result<CdsOutput> {
        self.config.validate()?;
        if let Some(id) = facts.duplicate_ids().first() {
            return Err(VmrMappingError::invalid_data(format!(
                "Fact id '{id}' is registered more than once; relationships to it are ambiguous"
            )));
        }

        let mut results = OrganizedResults::new(facts, &self.config);

        let mut people = facts.get_as::<internal::EvaluatedPerson>();
        let person = people
            .next()
            .ok_or_else(|| VmrMappingError::invalid_data("No EvaluatedPerson fact to push out"))?;
        if people.next().is_some() {
            tracing::warn!(
                person_id = %person.id,
                "more than one EvaluatedPerson fact; using the first"
            );
        }

        if let Some(patient) = EvaluatedPersonMapper::new().push_out(Some(person))? {
            results.set_patient(patient);
        }

        for fact_type in internal::FactType::statements() {
            for fact in facts.get(*fact_type) {
                let is_root = fact
                    .as_statement()
                    .is_some_and(|statement| results.is_root(statement));
                if is_root {
                    NestedObjectsMapper::push_out_root_statement(fact, &mut results)?;
                }
            }
        }

        Ok(results.into_output())
    }

    pub fn push_out_json(&self, facts: &FactLists) -> Result<String> {
        let output = self.push_out(facts)?;
        Ok(serde_json::to_string(&output)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delegate_escalates_only_improper_usage() {
        let err = delegate_to_ancestor(
            "push_out",
            Err(VmrMappingError::improper_usage("missing id")),
        )
        .unwrap_err();
        assert!(!err.is_recoverable());
        assert!(err.to_string().contains("missing id"));

        let err =
            delegate_to_ancestor("push_out", Err(VmrMappingError::data_format("bad TS")))
                .unwrap_err();
        assert!(matches!(err, VmrMappingError::DataFormat { .. }));

        assert!(delegate_to_ancestor("push_out", Ok(())).is_ok());
    }

    #[test]
    fn pull_in_requires_a_patient() {
        let err = VmrMapper::new().pull_in(&CdsInput::default()).unwrap_err();
        assert!(matches!(err, VmrMappingError::InvalidData { .. }));
    }

    #[test]
    fn push_out_requires_an_evaluated_person() {
        let err = VmrMapper::new().push_out(&FactLists::new()).unwrap_err();
        assert!(matches!(err, VmrMappingError::InvalidData { .. }));
    }
}
