use room_types::{Room, RoomStatus};
use tracing::debug;

/// Canonical room record plus the one-way reveal transition.
///
/// A winning guess and the authoritative room update race each other on
/// separate delivery paths, so the client may learn "this guess won" before
/// or after it learns "the room is finished". Both paths funnel into
/// `apply_reveal`, which fires at most once.
#[derive(Debug)]
pub struct RoomState {
    room: Room,
}

impl RoomState {
    pub fn new(room: Room) -> Self {
        Self { room }
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    /// Replaces the record wholesale with an externally sourced copy.
    /// Always accepted: the server's record is the truth.
    pub fn replace(&mut self, room: Room) {
        self.room = room;
    }

    /// Transitions the room to finished with the given word, unless it is
    /// already finished. Returns whether the transition fired.
    pub fn apply_reveal(&mut self, word: &str) -> bool {
        if self.room.is_finished() {
            return false;
        }
        self.room.status = RoomStatus::Finished;
        self.room.revealed_word = Some(word.to_string());
        debug!("room {} revealed: {}", self.room.code, word);
        true
    }

    pub fn is_finished(&self) -> bool {
        self.room.is_finished()
    }

    pub fn revealed_word(&self) -> Option<&str> {
        self.room.revealed_word.as_deref()
    }
}
