use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::RoomId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum RoomMode {
    /// Shared guess pool; any player's win reveals the word for everyone.
    Coop,
    /// Players guess independently; foreign words stay masked until the round ends.
    Pvp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum RoomStatus {
    Active,
    Finished,
}

/// The authoritative room record. `status == Finished` if and only if
/// `revealed_word` is set; the transition is one-way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Room {
    pub id: RoomId,
    /// Human-shareable join key, immutable for the room's lifetime.
    pub code: String,
    pub mode: RoomMode,
    pub status: RoomStatus,
    pub revealed_word: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Room {
    pub fn is_active(&self) -> bool {
        self.status == RoomStatus::Active
    }

    pub fn is_finished(&self) -> bool {
        self.status == RoomStatus::Finished
    }

    pub fn is_won(&self) -> bool {
        self.revealed_word.is_some()
    }

    pub fn is_coop(&self) -> bool {
        self.mode == RoomMode::Coop
    }

    pub fn share_url(&self, base_url: &str) -> String {
        format!("{}?room={}", base_url, self.code)
    }
}
