use chrono::Utc;
use room_types::{MAX_PLAYER_NAME_LENGTH, Player, PlayerId};

/// The current player's identity, supplied by the caller at session
/// construction. The id is an opaque stable token persisted elsewhere; the
/// name is a display string, trimmed and capped on the way in.
#[derive(Debug, Clone)]
pub struct PlayerIdentity {
    pub id: PlayerId,
    pub name: String,
}

impl PlayerIdentity {
    pub fn new(id: impl Into<PlayerId>, name: &str) -> Self {
        let name: String = name.trim().chars().take(MAX_PLAYER_NAME_LENGTH).collect();
        Self {
            id: id.into(),
            name,
        }
    }

    /// Presence record announced to peers when subscribing to a room.
    pub fn as_player(&self) -> Player {
        Player {
            id: self.id.clone(),
            name: self.name.clone(),
            joined_at: Utc::now(),
        }
    }
}
