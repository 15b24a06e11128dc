use std::collections::HashMap;

use crate::internal::{ClinicalStatement, Fact, FactKind, FactType};

/// Facts produced by one inbound pass, grouped by type in insertion order.
///
/// There is no removal: a pass either registers everything or the caller
/// discards the whole instance.
#[derive(Debug, Clone, Default)]
pub struct FactLists {
    facts: HashMap<FactType, Vec<Fact>>,
    ids: HashMap<String, (FactType, usize)>,
    duplicate_ids: Vec<String>,
    len: usize,
}

impl FactLists {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fact to the list of its type.
    pub fn put<T: FactKind>(&mut self, fact: T) {
        self.put_fact(fact.into_fact());
    }

    pub fn put_fact(&mut self, fact: Fact) {
        let fact_type = fact.fact_type();
        let list = self.facts.entry(fact_type).or_default();
        let index = list.len();

        if let Some(id) = fact.id() {
            if self.ids.contains_key(id) {
                tracing::warn!(
                    fact_type = %fact_type,
                    id,
                    "fact id registered more than once; lookups return the first"
                );
                self.duplicate_ids.push(id.to_string());
            } else {
                self.ids.insert(id.to_string(), (fact_type, index));
            }
        }

        list.push(fact);
        self.len += 1;
    }

    /// All facts of `fact_type`, in registration order.
    pub fn get(&self, fact_type: FactType) -> &[Fact] {
        self.facts
            .get(&fact_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn get_as<T: FactKind>(&self) -> impl Iterator<Item = &T> {
        self.get(T::FACT_TYPE).iter().filter_map(T::from_fact)
    }

    pub fn get_as_mut<T: FactKind>(&mut self) -> impl Iterator<Item = &mut T> {
        self.facts
            .get_mut(&T::FACT_TYPE)
            .into_iter()
            .flatten()
            .filter_map(T::from_fact_mut)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Fact> {
        let (fact_type, index) = self.ids.get(id)?;
        self.facts.get(fact_type)?.get(*index)
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Fact> {
        let (fact_type, index) = self.ids.get(id)?;
        self.facts.get_mut(fact_type)?.get_mut(*index)
    }

    /// Shared statement fields of the statement registered under `id`.
    pub fn statement_mut(&mut self, id: &str) -> Option<&mut ClinicalStatement> {
        self.find_by_id_mut(id)?.as_statement_mut()
    }

    /// Ids that were put more than once, in the order the repeats arrived.
    pub fn duplicate_ids(&self) -> &[String] {
        &self.duplicate_ids
    }

    pub fn contains_type(&self, fact_type: FactType) -> bool {
        !self.get(fact_type).is_empty()
    }

    /// Fact types that have at least one fact, in declaration order.
    pub fn fact_types(&self) -> Vec<FactType> {
        let mut types: Vec<FactType> = self
            .facts
            .iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(fact_type, _)| *fact_type)
            .collect();
        types.sort();
        types
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fact> {
        self.fact_types()
            .into_iter()
            .flat_map(move |fact_type| self.get(fact_type).iter())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
