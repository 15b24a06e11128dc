use serde::{Deserialize, Serialize};

/// Instance identifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Ii {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
}

impl Ii {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: Some(root.into()),
            extension: None,
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }
}

/// Concept descriptor.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Cd {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_system_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,
}

impl Cd {
    pub fn new(code: impl Into<String>, code_system: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            code_system: Some(code_system.into()),
            ..Default::default()
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }
}

/// Point in time, `YYYYMMDDHHmmss[.ffff][+ZZZZ]` with trailing precision optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Ts {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }
}

/// Interval of timestamps.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IvlTs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<Ts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<Ts>,
}

impl IvlTs {
    pub fn new(low: impl Into<String>, high: impl Into<String>) -> Self {
        Self {
            low: Some(Ts::new(low)),
            high: Some(Ts::new(high)),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Int {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
}

impl Int {
    pub fn new(value: i64) -> Self {
        Self { value: Some(value) }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bl {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<bool>,
}
