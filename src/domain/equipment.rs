use serde::{Deserialize, Serialize};

/// A free-text description of the brewer's hardware.
///
/// Only used as context when asking the model for a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Equipment {
    /// What the brewer has available, e.g. "30 L all-in-one system".
    pub description: String,
}

impl Equipment {
    /// Create an equipment description.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }

    /// Whether nothing has been described yet.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.description.trim().is_empty()
    }
}
