// Monitored equipment domain model
use super::status::{StatusDisplay, StatusTier};
use serde::{Deserialize, Serialize};

/// Snapshot of one monitored switchgear unit as reported by `/equipment_status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquipmentStatus {
    #[serde(default)]
    pub entity_id: Option<String>,
    #[serde(default)]
    pub entity_name: Option<String>,
    #[serde(default)]
    pub entity_description: Option<String>,
    #[serde(default)]
    pub monitored_equipment_id: Option<String>,
    #[serde(default)]
    pub monitored_equipment_name: Option<String>,
    #[serde(default)]
    pub monitored_equipment_description: Option<String>,
    #[serde(default)]
    pub monitored_equipment_status: Option<String>,
    #[serde(default)]
    pub discharge_type: Option<String>,
    #[serde(default)]
    pub discharge_severity: Option<String>,
    #[serde(default)]
    pub discharge_frequency: Option<String>,
    #[serde(default)]
    pub diagnosis_time: Option<String>,
    #[serde(default)]
    pub report_query: Option<String>,
}

impl EquipmentStatus {
    pub fn id(&self) -> &str {
        self.monitored_equipment_id.as_deref().unwrap_or("")
    }

    pub fn name(&self) -> &str {
        self.monitored_equipment_name.as_deref().unwrap_or("")
    }

    /// A missing status is shown as normal, matching the list table.
    pub fn condition(&self) -> EquipmentCondition {
        EquipmentCondition::parse(self.monitored_equipment_status.as_deref().unwrap_or("normal"))
    }

    pub fn severity_text(&self) -> String {
        match non_empty(&self.discharge_severity) {
            Some(severity) => format!("{}%", severity),
            None => "-".to_string(),
        }
    }

    pub fn frequency_text(&self) -> String {
        match non_empty(&self.discharge_frequency) {
            Some(frequency) => format!("{}/s", frequency),
            None => "-".to_string(),
        }
    }

    pub fn discharge_type_text(&self) -> String {
        non_empty(&self.discharge_type).unwrap_or("None").to_string()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EquipmentCondition {
    Normal,
    Level1,
    Level2,
    Level3,
    Unknown(String),
}

impl EquipmentCondition {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "normal" => EquipmentCondition::Normal,
            "level1" => EquipmentCondition::Level1,
            "level2" => EquipmentCondition::Level2,
            "level3" => EquipmentCondition::Level3,
            other => EquipmentCondition::Unknown(other.to_string()),
        }
    }
}

impl StatusDisplay for EquipmentCondition {
    fn label(&self) -> String {
        match self {
            EquipmentCondition::Normal => "Normal",
            EquipmentCondition::Level1 => "Level 1",
            EquipmentCondition::Level2 => "Level 2",
            EquipmentCondition::Level3 => "Level 3",
            EquipmentCondition::Unknown(_) => "Unknown",
        }
        .to_string()
    }

    fn tier(&self) -> StatusTier {
        match self {
            EquipmentCondition::Normal => StatusTier::Good,
            EquipmentCondition::Level1 => StatusTier::Caution,
            EquipmentCondition::Level2 => StatusTier::Warning,
            EquipmentCondition::Level3 => StatusTier::Critical,
            EquipmentCondition::Unknown(_) => StatusTier::Neutral,
        }
    }
}
