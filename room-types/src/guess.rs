use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{GuessId, PlayerId, RoomId};

/// Score of the winning guess, as reported by the scoring oracle.
pub const WINNING_SCORE: i32 = 100;

/// Shortest word the game accepts.
pub const MIN_WORD_LENGTH: usize = 3;

/// One scored guess. Immutable once created; uniquely identified by `id`
/// (the event stream may redeliver the same guess any number of times).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Guess {
    pub id: GuessId,
    pub room_id: RoomId,
    pub player_id: PlayerId,
    pub player_name: String,
    pub word: String,
    /// Closeness to the target word, 0-100.
    pub score: i32,
    /// Ordinal position among all possible words, when the oracle computed one.
    #[serde(default)]
    pub rank: Option<u32>,
    pub temperature: f32,
    pub created_at: DateTime<Utc>,
}

impl Guess {
    pub fn is_winning(&self) -> bool {
        self.score == WINNING_SCORE
    }

    pub fn belongs_to(&self, player_id: &PlayerId) -> bool {
        &self.player_id == player_id
    }

    /// Lower-cased form used for duplicate and block-list checks.
    pub fn normalized_word(&self) -> String {
        self.word.to_lowercase()
    }
}
