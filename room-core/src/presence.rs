use std::collections::HashMap;

use chrono::{DateTime, Utc};
use room_types::{Player, PlayerId};
use tracing::debug;

#[derive(Debug, Clone)]
struct PresenceRecord {
    name: String,
    joined_at: DateTime<Utc>,
}

/// Roster of currently connected players, reconciled from the presence
/// triad: `sync` (full truth after (re)connecting), `join` and `leave`
/// (deltas layered on top between syncs). Sync must win over any stale
/// delta ordering, so it fully overwrites instead of merging.
#[derive(Debug, Default)]
pub struct PresenceRegistry {
    players: HashMap<PlayerId, PresenceRecord>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the entire roster with the transport's reconciled view.
    pub fn apply_sync(&mut self, roster: Vec<Player>) {
        self.players.clear();
        for player in roster {
            self.players.insert(
                player.id,
                PresenceRecord {
                    name: player.name,
                    joined_at: player.joined_at,
                },
            );
        }
        debug!("presence roster synced: {} players", self.players.len());
    }

    /// Upserts each entry. Safe to apply for players already present.
    /// Returns the players that were not previously in the roster, so the
    /// caller can decide which arrivals deserve a notification.
    pub fn apply_join(&mut self, players: Vec<Player>) -> Vec<Player> {
        let mut newly_present = Vec::new();
        for player in players {
            let was_absent = self
                .players
                .insert(
                    player.id.clone(),
                    PresenceRecord {
                        name: player.name.clone(),
                        joined_at: player.joined_at,
                    },
                )
                .is_none();
            if was_absent {
                newly_present.push(player);
            }
        }
        newly_present
    }

    /// Removes each entry by id. Safe to apply for players already absent.
    /// Returns the players that were actually removed.
    pub fn apply_leave(&mut self, players: Vec<Player>) -> Vec<Player> {
        players
            .into_iter()
            .filter(|player| self.players.remove(&player.id).is_some())
            .collect()
    }

    /// Current roster, ordered by join time then id. Order is for display
    /// stability only.
    pub fn snapshot(&self) -> Vec<Player> {
        let mut roster: Vec<Player> = self
            .players
            .iter()
            .map(|(id, record)| Player {
                id: id.clone(),
                name: record.name.clone(),
                joined_at: record.joined_at,
            })
            .collect();
        roster.sort_by(|a, b| a.joined_at.cmp(&b.joined_at).then_with(|| a.id.cmp(&b.id)));
        roster
    }

    pub fn contains(&self, player_id: &PlayerId) -> bool {
        self.players.contains_key(player_id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn clear(&mut self) {
        self.players.clear();
    }
}
