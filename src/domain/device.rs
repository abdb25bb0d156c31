// Sensor (device) domain model
use super::status::{StatusDisplay, StatusTier};
use serde::{Deserialize, Deserializer, Serialize};

/// A discharge sensor attached to exactly one monitored equipment unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceStatus {
    pub entity_id: Option<String>,
    pub entity_name: Option<String>,
    pub entity_description: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub monitored_equipment_id: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub monitored_equipment_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub monitored_equipment_description: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub ipc_id: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub ipc_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub ipc_description: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub device_id: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub device_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub device_description: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub device_firmware_version: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub device_status: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub device_voltage: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl DeviceStatus {
    pub fn condition(&self) -> DeviceCondition {
        DeviceCondition::parse(&self.device_status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCondition {
    Normal,
    Abnormal,
    Unknown(String),
}

impl DeviceCondition {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "normal" | "正常" => DeviceCondition::Normal,
            "abnormal" | "异常" => DeviceCondition::Abnormal,
            other => DeviceCondition::Unknown(other.to_string()),
        }
    }
}

impl StatusDisplay for DeviceCondition {
    /// Unrecognised values are shown verbatim; an empty value reads "Unknown".
    fn label(&self) -> String {
        match self {
            DeviceCondition::Normal => "Normal".to_string(),
            DeviceCondition::Abnormal => "Abnormal".to_string(),
            DeviceCondition::Unknown(raw) if raw.is_empty() => "Unknown".to_string(),
            DeviceCondition::Unknown(raw) => raw.clone(),
        }
    }

    fn tier(&self) -> StatusTier {
        match self {
            DeviceCondition::Normal => StatusTier::Good,
            DeviceCondition::Abnormal => StatusTier::Warning,
            DeviceCondition::Unknown(_) => StatusTier::Neutral,
        }
    }
}

/// A sensor as offered in the detail view's collector picker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collector {
    pub kind: String,
    pub id: String,
    pub location: String,
}

impl From<&DeviceStatus> for Collector {
    fn from(device: &DeviceStatus) -> Self {
        Self {
            kind: device.device_name.clone(),
            id: device.device_id.clone(),
            location: device.device_description.clone(),
        }
    }
}
