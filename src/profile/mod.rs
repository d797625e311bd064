//! Player profile lookup, used only to decorate reports for display.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::bracket::models::PlayerId;

/// Display data for one player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileCard {
    pub player_id: PlayerId,
    pub display_name: String,
}

/// Read-only id-to-display lookup. The bracket engine never depends on this
/// for decisions; it exists so standings can carry names.
pub trait ProfileDirectory: Send + Sync {
    fn profile(&self, player_id: PlayerId) -> Option<ProfileCard>;
}

/// Directory backed by a fixed map, for tests and simple callers
#[derive(Debug, Clone, Default)]
pub struct MapDirectory {
    profiles: HashMap<PlayerId, String>,
}

impl MapDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_profile(mut self, player_id: PlayerId, display_name: impl Into<String>) -> Self {
        self.profiles.insert(player_id, display_name.into());
        self
    }
}

impl ProfileDirectory for MapDirectory {
    fn profile(&self, player_id: PlayerId) -> Option<ProfileCard> {
        self.profiles.get(&player_id).map(|name| ProfileCard {
            player_id,
            display_name: name.clone(),
        })
    }
}
