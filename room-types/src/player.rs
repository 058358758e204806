use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::PlayerId;

/// Longest display name accepted from the caller.
pub const MAX_PLAYER_NAME_LENGTH: usize = 32;

/// Names longer than this are truncated for display.
pub const DISPLAY_NAME_LENGTH: usize = 15;

/// An actively connected session, not a guess author: a player may be
/// present with zero guesses, or have guesses but no longer be present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub joined_at: DateTime<Utc>,
}

impl Player {
    pub fn display_name(&self) -> String {
        if self.name.chars().count() > DISPLAY_NAME_LENGTH {
            let truncated: String = self.name.chars().take(DISPLAY_NAME_LENGTH).collect();
            format!("{}...", truncated)
        } else {
            self.name.clone()
        }
    }

    pub fn is_current(&self, current_player_id: &PlayerId) -> bool {
        &self.id == current_player_id
    }
}

/// Per-player aggregate row. Computed, never stored; recomputed from the
/// guess ledger and presence roster on every relevant change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlayerStats {
    pub id: PlayerId,
    pub name: String,
    pub best_score: i32,
    pub best_temperature: f32,
    pub guess_count: usize,
    pub is_current: bool,
}
