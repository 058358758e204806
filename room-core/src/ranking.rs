use std::collections::{HashMap, HashSet};

use room_types::{Guess, Player, PlayerId, PlayerStats, RoomMode};

use crate::{GuessLedger, PresenceRegistry, RoomState};

/// Everything the presentation layer is allowed to read, derived on demand
/// from the session-owned state. Holds no state of its own and never
/// outlives a single projection pass, so there is no cache to invalidate.
pub struct RankingView<'a> {
    ledger: &'a GuessLedger,
    presence: &'a PresenceRegistry,
    room: &'a RoomState,
    current_player: &'a PlayerId,
}

impl<'a> RankingView<'a> {
    pub fn new(
        ledger: &'a GuessLedger,
        presence: &'a PresenceRegistry,
        room: &'a RoomState,
        current_player: &'a PlayerId,
    ) -> Self {
        Self {
            ledger,
            presence,
            room,
            current_player,
        }
    }

    fn mode(&self) -> RoomMode {
        self.room.room().mode
    }

    /// Whether every word in the room may be shown in clear text.
    pub fn reveal_all(&self) -> bool {
        self.mode() == RoomMode::Coop || self.room.room().is_won()
    }

    /// Guesses ordered for the board: hottest first, most recent among
    /// equals, id as the final tie-break so the order is total.
    pub fn board(&self) -> Vec<&'a Guess> {
        let mut board: Vec<&Guess> = self.ledger.guesses().iter().collect();
        board.sort_by(|a, b| {
            b.temperature
                .total_cmp(&a.temperature)
                .then_with(|| b.score.cmp(&a.score))
                .then_with(|| b.created_at.cmp(&a.created_at))
                .then_with(|| b.id.cmp(&a.id))
        });
        board
    }

    /// The `n` most recent guesses, newest first.
    pub fn latest(&self, n: usize) -> Vec<&'a Guess> {
        let mut recent: Vec<&Guess> = self.ledger.guesses().iter().collect();
        recent.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        recent.truncate(n);
        recent
    }

    /// One row per player known through presence or guesses. Present
    /// players with no guesses keep a zeroed row rather than disappearing.
    pub fn player_stats(&self) -> Vec<PlayerStats> {
        let mut rows: HashMap<PlayerId, PlayerStats> = HashMap::new();

        for player in self.presence.snapshot() {
            rows.insert(player.id.clone(), self.empty_row(&player));
        }

        for guess in self.ledger.guesses() {
            let row = rows.entry(guess.player_id.clone()).or_insert_with(|| {
                PlayerStats {
                    id: guess.player_id.clone(),
                    name: guess.player_name.clone(),
                    best_score: 0,
                    best_temperature: 0.0,
                    guess_count: 0,
                    is_current: &guess.player_id == self.current_player,
                }
            });
            row.best_score = row.best_score.max(guess.score);
            row.best_temperature = row.best_temperature.max(guess.temperature);
            row.guess_count += 1;
        }

        let mut stats: Vec<PlayerStats> = rows.into_values().collect();
        stats.sort_by(|a, b| {
            b.best_score
                .cmp(&a.best_score)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });
        stats
    }

    fn empty_row(&self, player: &Player) -> PlayerStats {
        PlayerStats {
            id: player.id.clone(),
            name: player.name.clone(),
            best_score: 0,
            best_temperature: 0.0,
            guess_count: 0,
            is_current: player.is_current(self.current_player),
        }
    }

    /// Words no longer available to the current player. One player's guess
    /// blocks the word for everyone in cooperative mode; in competitive
    /// mode each player only blocks themselves.
    pub fn blocked_words(&self) -> HashSet<String> {
        match self.mode() {
            RoomMode::Coop => self.ledger.all_words(),
            RoomMode::Pvp => self.ledger.words_by_player(self.current_player),
        }
    }

    /// The word as the current player may see it. Competitive mode masks
    /// foreign words until the round ends; cooperative mode never masks.
    pub fn visible_word(&self, guess: &Guess) -> String {
        if guess.belongs_to(self.current_player) || self.reveal_all() {
            guess.word.clone()
        } else {
            "*".repeat(guess.word.chars().count())
        }
    }

    /// Best score shown to the current player: their own in competitive
    /// mode, the room-wide best in cooperative mode.
    pub fn displayed_best_score(&self) -> i32 {
        match self.mode() {
            RoomMode::Coop => self.ledger.best_score(),
            RoomMode::Pvp => self.own_best().0,
        }
    }

    pub fn displayed_best_temperature(&self) -> f32 {
        match self.mode() {
            RoomMode::Coop => self.ledger.best_temperature(),
            RoomMode::Pvp => self.own_best().1,
        }
    }

    fn own_best(&self) -> (i32, f32) {
        self.ledger
            .guesses()
            .iter()
            .filter(|guess| guess.belongs_to(self.current_player))
            .fold((0, 0.0_f32), |(score, temperature), guess| {
                (score.max(guess.score), temperature.max(guess.temperature))
            })
    }
}
