use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coded concept as seen by the rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Cd {
    pub code: String,
    pub code_system: String,
    pub code_system_name: Option<String>,
    pub display_name: Option<String>,
    pub original_text: Option<String>,
}

impl Cd {
    pub fn new(code: impl Into<String>, code_system: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            code_system: code_system.into(),
            ..Default::default()
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn matches(&self, code: &str, code_system: &str) -> bool {
        self.code == code && self.code_system == code_system
    }
}

impl fmt::Display for Cd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.code_system, self.code)?;
        if let Some(display_name) = &self.display_name {
            write!(f, " ({display_name})")?;
        }
        Ok(())
    }
}

/// Closed or half-open interval of date-times. Timezone offsets are
/// normalised to UTC before they reach this type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IvlDate {
    pub low: Option<NaiveDateTime>,
    pub high: Option<NaiveDateTime>,
}

impl IvlDate {
    pub fn new(low: NaiveDateTime, high: NaiveDateTime) -> Self {
        Self {
            low: Some(low),
            high: Some(high),
        }
    }

    pub fn at(instant: NaiveDateTime) -> Self {
        Self::new(instant, instant)
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.low.is_none_or(|low| low <= instant) && self.high.is_none_or(|high| instant <= high)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ObservationValue {
    Concept(Cd),
    Integer(i32),
    Boolean(bool),
}
