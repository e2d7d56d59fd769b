use crate::features::resource::Resource;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A prisoner record. Only the id is known; every other field is kept as-is
/// so records round-trip through the API without loss.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Prisoner {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Prisoner {
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { id: None, fields }
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Copy without the id, as sent on create and update.
    #[must_use]
    pub fn without_id(&self) -> Self {
        Self::new(self.fields.clone())
    }
}

impl Resource for Prisoner {
    const COLLECTION: &'static str = "prisoners";
}
