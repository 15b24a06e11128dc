use serde::{Deserialize, Serialize};

use crate::error::{Result, VmrMappingError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct MappingConfig {
    /// Assign a generated identifier to statements and entities that arrive
    /// without one. When disabled a missing id is rejected as invalid data.
    pub generate_missing_ids: bool,
    /// Deepest nesting of related statements/entities accepted in either
    /// direction.
    pub max_nesting_depth: usize,
    /// Only statements flagged `to_be_returned` become outbound roots.
    pub return_only_flagged: bool,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            generate_missing_ids: true,
            max_nesting_depth: 64,
            return_only_flagged: true,
        }
    }
}

impl MappingConfig {
    /// Configuration that never invents data: ids must be present and every
    /// root statement is returned.
    pub fn strict() -> Self {
        Self {
            generate_missing_ids: false,
            return_only_flagged: false,
            ..Default::default()
        }
    }

    pub fn with_generate_missing_ids(mut self, enabled: bool) -> Self {
        self.generate_missing_ids = enabled;
        self
    }

    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    pub fn with_return_only_flagged(mut self, enabled: bool) -> Self {
        self.return_only_flagged = enabled;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_nesting_depth == 0 {
            return Err(VmrMappingError::improper_usage(
                "MappingConfig.maxNestingDepth must be at least 1",
            ));
        }
        Ok(())
    }
}
