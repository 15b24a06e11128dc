use std::collections::{HashMap, HashSet};

use super::FactLists;
use crate::core::MappingConfig;
use crate::error::{Result, VmrMappingError};
use crate::internal::{
    ClinicalStatement, ClinicalStatementRelationship, EntityRelationship, FactType,
};
use crate::schema::{
    Categorized, CdsOutput, ClinicalStatements, EvaluatedPerson, StatementCategory,
};

/// The output document under construction, plus lookups over the facts it
/// is built from.
///
/// Category containers are created on first attach and reused afterwards.
pub struct OrganizedResults<'a> {
    config: MappingConfig,
    facts: &'a FactLists,
    output: CdsOutput,
    statement_relationships: HashMap<&'a str, Vec<&'a ClinicalStatementRelationship>>,
    entity_relationships: HashMap<&'a str, Vec<&'a EntityRelationship>>,
    nested_statement_ids: HashSet<&'a str>,
    path: Vec<String>,
}

impl<'a> OrganizedResults<'a> {
    pub fn new(facts: &'a FactLists, config: &MappingConfig) -> Self {
        let mut statement_relationships: HashMap<&str, Vec<&ClinicalStatementRelationship>> =
            HashMap::new();
        let mut nested_statement_ids = HashSet::new();
        for relationship in facts.get_as::<ClinicalStatementRelationship>() {
            statement_relationships
                .entry(relationship.source_id.as_str())
                .or_default()
                .push(relationship);
            nested_statement_ids.insert(relationship.target_id.as_str());
        }

        let mut entity_relationships: HashMap<&str, Vec<&EntityRelationship>> = HashMap::new();
        for relationship in facts.get_as::<EntityRelationship>() {
            entity_relationships
                .entry(relationship.source_id.as_str())
                .or_default()
                .push(relationship);
        }

        Self {
            config: config.clone(),
            facts,
            output: CdsOutput::default(),
            statement_relationships,
            entity_relationships,
            nested_statement_ids,
            path: Vec::new(),
        }
    }

    pub fn facts(&self) -> &'a FactLists {
        self.facts
    }

    pub fn output(&self) -> &CdsOutput {
        &self.output
    }

    pub fn into_output(self) -> CdsOutput {
        self.output
    }

    pub fn set_patient(&mut self, patient: EvaluatedPerson) {
        self.output.vmr_output.patient = Some(patient);
    }

    fn statements_mut(&mut self) -> &mut ClinicalStatements {
        self.output
            .vmr_output
            .patient
            .get_or_insert_with(EvaluatedPerson::default)
            .clinical_statements
            .get_or_insert_with(ClinicalStatements::default)
    }

    /// Returns the container for `T`'s category, creating it on first use.
    pub fn ensure_container<T: Categorized>(&mut self) -> &mut Vec<T> {
        let container = T::container(self.statements_mut());
        if container.is_none() {
            tracing::debug!(category = %T::CATEGORY, "creating output container");
        }
        container.get_or_insert_with(Vec::new)
    }

    /// Appends a top-level statement to its category container.
    pub fn attach<T: Categorized>(&mut self, child: T) {
        self.ensure_container::<T>().push(child);
    }

    pub fn has_container(&self, category: StatementCategory) -> bool {
        self.output
            .vmr_output
            .patient
            .as_ref()
            .and_then(|patient| patient.clinical_statements.as_ref())
            .is_some_and(|statements| statements.has_container(category))
    }

    /// Output category for facts of `fact_type`. Fact types without one
    /// cannot be placed in the document, which is a mapping configuration
    /// error rather than bad input.
    pub fn category_for(&self, fact_type: FactType) -> Result<StatementCategory> {
        fact_type.output_category().ok_or_else(|| {
            VmrMappingError::fatal(format!(
                "Fact type {fact_type} has no output container category"
            ))
        })
    }

    pub fn statement_relationships_from(
        &self,
        source_id: &str,
    ) -> Vec<&'a ClinicalStatementRelationship> {
        self.statement_relationships
            .get(source_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn entity_relationships_from(&self, source_id: &str) -> Vec<&'a EntityRelationship> {
        self.entity_relationships
            .get(source_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn is_nested(&self, statement_id: &str) -> bool {
        self.nested_statement_ids.contains(statement_id)
    }

    /// Whether `statement` belongs at the top level of the output document.
    pub fn is_root(&self, statement: &ClinicalStatement) -> bool {
        let placed_at_top =
            statement.clinical_statement_to_be_root || !self.is_nested(&statement.id);
        placed_at_top && (!self.config.return_only_flagged || statement.to_be_returned)
    }

    /// Descends into the children of `id`; re-entering an id already on the
    /// current path is a cycle.
    pub fn enter(&mut self, id: &str) -> Result<()> {
        if self.path.iter().any(|ancestor| ancestor == id) {
            return Err(VmrMappingError::invalid_data(format!(
                "Relationship cycle through '{id}' (path: {})",
                self.path.join(" -> ")
            )));
        }
        if self.path.len() >= self.config.max_nesting_depth {
            return Err(VmrMappingError::invalid_data(format!(
                "Nesting below '{id}' exceeds the maximum depth of {}",
                self.config.max_nesting_depth
            )));
        }
        self.path.push(id.to_string());
        Ok(())
    }

    pub fn leave(&mut self) {
        self.path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::Cd;
    use crate::schema::{AppointmentRequest, EncounterEvent};

    fn empty_results(facts: &FactLists) -> OrganizedResults<'_> {
        OrganizedResults::new(facts, &MappingConfig::default())
    }

    #[test]
    fn no_attach_leaves_category_absent() {
        let facts = FactLists::new();
        let results = empty_results(&facts);
        for category in StatementCategory::all() {
            assert!(!results.has_container(*category));
        }
        assert!(results.output().vmr_output.patient.is_none());
    }

    #[test]
    fn attach_creates_one_container_in_call_order() {
        let facts = FactLists::new();
        let mut results = empty_results(&facts);

        let mut first = AppointmentRequest::default();
        first.criticality = Some(crate::schema::Cd::new("1", "sys"));
        results.attach(first);
        results.attach(AppointmentRequest::default());

        assert!(results.has_container(StatementCategory::AppointmentRequests));
        assert!(!results.has_container(StatementCategory::EncounterEvents));

        let output = results.into_output();
        let statements = output
            .vmr_output
            .patient
            .and_then(|p| p.clinical_statements)
            .unwrap();
        let requests = statements.appointment_requests.unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].criticality.is_some());
        assert!(requests[1].criticality.is_none());
    }

    #[test]
    fn ensure_container_is_idempotent() {
        let facts = FactLists::new();
        let mut results = empty_results(&facts);
        results.ensure_container::<EncounterEvent>();
        results.attach(EncounterEvent::default());
        results.ensure_container::<EncounterEvent>();
        assert_eq!(results.ensure_container::<EncounterEvent>().len(), 1);
    }

    #[test]
    fn category_for_non_statement_is_fatal() {
        let facts = FactLists::new();
        let results = empty_results(&facts);
        let err = results.category_for(FactType::Person).unwrap_err();
        assert!(!err.is_recoverable());
        assert_eq!(
            results.category_for(FactType::MissedAppointment).unwrap(),
            StatementCategory::MissedAppointments
        );
    }

    #[test]
    fn relationships_are_indexed_by_source() {
        let mut facts = FactLists::new();
        facts.put(ClinicalStatementRelationship {
            source_id: "parent".to_string(),
            target_id: "child".to_string(),
            target_relationship_to_source: Cd::new("COMP", "2.16.840.1.113883.5.1002"),
        });
        let results = empty_results(&facts);

        assert_eq!(results.statement_relationships_from("parent").len(), 1);
        assert!(results.statement_relationships_from("child").is_empty());
        assert!(results.is_nested("child"));
        assert!(!results.is_nested("parent"));
    }

    #[test]
    fn enter_detects_cycles() {
        let facts = FactLists::new();
        let mut results = empty_results(&facts);
        results.enter("a").unwrap();
        results.enter("b").unwrap();
        let err = results.enter("a").unwrap_err();
        assert!(err.to_string().contains("cycle"));
    }
}
