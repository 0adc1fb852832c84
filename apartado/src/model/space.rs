//! Bookable spaces.

use serde::{Deserialize, Serialize};

use crate::model::id::SpaceId;

/// A bookable physical location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    /// Backend identifier.
    pub id: SpaceId,
    /// Display name.
    pub name: String,
    /// Description shown on the space card.
    #[serde(default)]
    pub description: String,
    /// Where the space is.
    #[serde(default)]
    pub location: String,
    /// Inactive spaces are hidden from the selection control.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

/// Raw state of the admin space form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceDraft {
    /// Name field.
    pub name: String,
    /// Description field.
    pub description: String,
    /// Location field.
    pub location: String,
    /// Active checkbox.
    pub is_active: bool,
}

impl Default for SpaceDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            location: String::new(),
            is_active: true,
        }
    }
}

impl SpaceDraft {
    /// Pre-fills the form from an existing space.
    #[must_use]
    pub fn from_space(space: &Space) -> Self {
        Self {
            name: space.name.clone(),
            description: space.description.clone(),
            location: space.location.clone(),
            is_active: space.is_active,
        }
    }
}

/// Validated space payload sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpaceRequest {
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Location.
    pub location: String,
    /// Active flag.
    pub is_active: bool,
}
