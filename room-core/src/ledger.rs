use std::collections::HashSet;

use room_types::{Guess, GuessId, PlayerId};
use tracing::debug;

/// Client-local record of every guess seen for the current room.
///
/// The realtime stream delivers guesses at least once and in no particular
/// order: a resubscription after a reconnect replays history, and a guess
/// may arrive both as a command response and as a stream event. Ingestion
/// is therefore keyed by guess id, and none of these operations can fail.
#[derive(Debug, Default)]
pub struct GuessLedger {
    entries: Vec<Guess>,
    seen: HashSet<GuessId>,
    best_score: i32,
    best_temperature: f32,
}

impl GuessLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a guess unless one with the same id is already recorded.
    /// Returns whether the guess was newly inserted.
    pub fn insert(&mut self, guess: Guess) -> bool {
        if !self.seen.insert(guess.id) {
            return false;
        }
        self.best_score = self.best_score.max(guess.score);
        self.best_temperature = self.best_temperature.max(guess.temperature);
        self.entries.push(guess);
        true
    }

    /// Replaces the entire contents with a freshly loaded history snapshot.
    /// A full overwrite, never a merge: the snapshot is the server's truth.
    pub fn replace_all(&mut self, guesses: Vec<Guess>) {
        self.clear();
        let total = guesses.len();
        for guess in guesses {
            self.insert(guess);
        }
        debug!("guess history replaced: {} of {} entries kept", self.entries.len(), total);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.seen.clear();
        self.best_score = 0;
        self.best_temperature = 0.0;
    }

    /// Highest score recorded, 0 when empty. Never decreases while the
    /// ledger is not cleared, since entries are never removed.
    pub fn best_score(&self) -> i32 {
        self.best_score
    }

    pub fn best_temperature(&self) -> f32 {
        self.best_temperature
    }

    /// Normalized words guessed by one player, for the "already tried" block list.
    pub fn words_by_player(&self, player_id: &PlayerId) -> HashSet<String> {
        self.entries
            .iter()
            .filter(|guess| guess.belongs_to(player_id))
            .map(|guess| guess.normalized_word())
            .collect()
    }

    /// Normalized words guessed by anyone, for the cooperative block list.
    pub fn all_words(&self) -> HashSet<String> {
        self.entries.iter().map(|guess| guess.normalized_word()).collect()
    }

    pub fn guesses(&self) -> &[Guess] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
