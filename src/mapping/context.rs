use uuid::Uuid;

use super::{FactLists, utility};
use crate::core::MappingConfig;
use crate::error::{Result, VmrMappingError};
use crate::internal::FactKind;
use crate::schema::Ii;

/// State shared by every mapper during one inbound pass.
pub struct MappingContext {
    pub config: MappingConfig,
    pub facts: FactLists,
    pub mapping_stats: MappingStats,
    path: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MappingStats {
    pub facts_registered: usize,
    pub relationships_registered: usize,
    pub ids_generated: usize,
    pub max_depth_reached: usize,
}

impl MappingContext {
    pub fn new(config: &MappingConfig) -> Self {
        Self {
            config: config.clone(),
            facts: FactLists::new(),
            mapping_stats: MappingStats::default(),
            path: Vec::new(),
        }
    }

    /// Registers a fully populated fact. Relationship facts refer to their
    /// ends by id, so an id may be registered only once per pass.
    pub fn register<T: FactKind>(&mut self, fact: T) -> Result<()> {
        let fact = fact.into_fact();
        if let Some(id) = fact.id() {
            if let Some(existing) = self.facts.find_by_id(id) {
                return Err(VmrMappingError::invalid_data(format!(
                    "{} id '{id}' is already registered for a {}",
                    T::FACT_TYPE,
                    existing.fact_type()
                )));
            }
        }

        tracing::debug!(fact_type = %T::FACT_TYPE, "registering fact");
        self.facts.put_fact(fact);
        self.mapping_stats.facts_registered += 1;
        Ok(())
    }

    pub fn register_relationship<T: FactKind>(&mut self, relationship: T) -> Result<()> {
        self.register(relationship)?;
        self.mapping_stats.relationships_registered += 1;
        Ok(())
    }

    /// Internal id for an external identifier, generating one when the source
    /// has none and the configuration allows it.
    pub fn resolve_id(&mut self, source: Option<&Ii>, field: &str) -> Result<String> {
        match source {
            Some(ii) => utility::ii_to_id(ii, field),
            None if self.config.generate_missing_ids => {
                self.mapping_stats.ids_generated += 1;
                let id = Uuid::new_v4().to_string();
                tracing::debug!(field, id = %id, "generated missing id");
                Ok(id)
            }
            None => Err(VmrMappingError::invalid_data(format!(
                "{field} is required when id generation is disabled"
            ))),
        }
    }

    /// Descends into the children of `id`.
    pub fn enter(&mut self, id: &str) -> Result<()> {
        if self.path.len() >= self.config.max_nesting_depth {
            return Err(VmrMappingError::invalid_data(format!(
                "Nesting below '{id}' exceeds the maximum depth of {}",
                self.config.max_nesting_depth
            )));
        }
        self.path.push(id.to_string());
        self.mapping_stats.max_depth_reached =
            self.mapping_stats.max_depth_reached.max(self.path.len());
        Ok(())
    }

    pub fn leave(&mut self) {
        self.path.pop();
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    pub fn into_facts(self) -> FactLists {
        self.facts
    }
}
