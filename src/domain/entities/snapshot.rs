use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Last-known-good domain state, kept so the client can render while the
/// backend is unreachable. One JSON document per entity collection.
///
/// Snapshot reads do not reflect not-yet-synced pending writes; the snapshot
/// is the last state the backend confirmed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CareSnapshot {
    pub patients: Value,
    pub appointments: Value,
    pub vital_signs: Value,
    pub documents: Value,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl Default for CareSnapshot {
    fn default() -> Self {
        Self {
            patients: Value::Array(Vec::new()),
            appointments: Value::Array(Vec::new()),
            vital_signs: Value::Array(Vec::new()),
            documents: Value::Array(Vec::new()),
            refreshed_at: None,
        }
    }
}

impl CareSnapshot {
    /// Section-wise merge: sections absent from the patch are left untouched,
    /// the refresh timestamp always advances.
    pub fn apply(&mut self, patch: SnapshotPatch, at: DateTime<Utc>) {
        if let Some(patients) = patch.patients {
            self.patients = patients;
        }
        if let Some(appointments) = patch.appointments {
            self.appointments = appointments;
        }
        if let Some(vital_signs) = patch.vital_signs {
            self.vital_signs = vital_signs;
        }
        if let Some(documents) = patch.documents {
            self.documents = documents;
        }
        self.refreshed_at = Some(at);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SnapshotPatch {
    pub patients: Option<Value>,
    pub appointments: Option<Value>,
    pub vital_signs: Option<Value>,
    pub documents: Option<Value>,
}
