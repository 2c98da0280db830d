use serde::{Deserialize, Serialize};
use std::fmt;

/// Domain collections a pending write can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Patient,
    Appointment,
    VitalSign,
    Document,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Patient => "patient",
            EntityKind::Appointment => "appointment",
            EntityKind::VitalSign => "vital_sign",
            EntityKind::Document => "document",
        }
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "patient" => Ok(EntityKind::Patient),
            "appointment" => Ok(EntityKind::Appointment),
            "vital_sign" => Ok(EntityKind::VitalSign),
            "document" => Ok(EntityKind::Document),
            other => Err(format!("Unknown entity kind: {other}")),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
