use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{Guess, Player, Room};

/// Inbound events delivered on a room's realtime stream. Delivery is
/// at-least-once and may replay after a reconnect; every handler applying
/// one of these must be idempotent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
#[ts(export)]
pub enum RoomEvent {
    GuessInserted(Guess),
    RoomUpdated(Room),
    /// Full roster replacement, fired after (re)connecting to the channel.
    PresenceSync(Vec<Player>),
    PresenceJoin(Vec<Player>),
    PresenceLeave(Vec<Player>),
}

/// Transient, user-facing signals emitted by the session. None of these is
/// an error state: a rejected word shakes the input and clears on edit,
/// join/leave notices are toasts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "camelCase")]
#[ts(export)]
pub enum SessionNotice {
    PlayerJoined { player: Player },
    PlayerLeft { player: Player },
    GuessRejected { word: String },
}
