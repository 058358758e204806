pub mod events;
pub mod guess;
pub mod player;
pub mod room;

// Re-export all types
pub use events::*;
pub use guess::*;
pub use player::*;
pub use room::*;

use uuid::Uuid;

pub type RoomId = Uuid;
pub type GuessId = Uuid;

/// Opaque, caller-supplied identity token. Stable across sessions but never
/// generated or interpreted by this crate.
pub type PlayerId = String;
