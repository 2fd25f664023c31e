//! Locally minted content identifiers (idempotency keys presented to the remote service).

use uuid::Uuid;

use crate::utils::config::CONTENT_TYPE_TAG;

/// Mints `<tag>-<uuid v4>` identifiers. The suffix is random, never derived from file content.
#[derive(Clone, Debug)]
pub struct ContentIdGenerator {
    type_tag: String,
}

impl Default for ContentIdGenerator {
    fn default() -> Self {
        Self::new(CONTENT_TYPE_TAG)
    }
}

impl ContentIdGenerator {
    pub fn new(type_tag: impl Into<String>) -> Self {
        Self {
            type_tag: type_tag.into(),
        }
    }

    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    /// A fresh identifier. Unique per call.
    pub fn next_id(&self) -> String {
        format!("{}-{}", self.type_tag, Uuid::new_v4())
    }
}
