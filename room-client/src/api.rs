use async_trait::async_trait;
use thiserror::Error;

use room_types::{Guess, PlayerId, Room, RoomId, RoomMode};

#[derive(Debug, Error)]
pub enum ApiError {
    /// The scoring oracle does not recognize the submitted word. Distinct
    /// from generic failure so the session can treat it as transient input
    /// rejection instead of a sticky error.
    #[error("unknown word: {word}")]
    UnknownWord { word: String },
    #[error("game already finished")]
    GameFinished,
    #[error(transparent)]
    Service(#[from] anyhow::Error),
}

#[derive(Debug, Clone)]
pub struct SubmitGuessRequest {
    pub room_code: String,
    pub player_id: PlayerId,
    pub player_name: String,
    pub word: String,
}

/// What the service returns for an accepted guess. `revealed_word` is set
/// when this guess ended the round.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub guess: Guess,
    pub revealed_word: Option<String>,
}

/// Request/response surface of the external room service. Rooms and guess
/// history are durable behind this boundary; the engine never persists.
#[async_trait]
pub trait RoomApi: Send + Sync {
    async fn create_room(&self, player_name: &str, mode: RoomMode) -> Result<Room, ApiError>;

    /// Resolves a room by its human-shareable code. `None` when the code
    /// does not exist.
    async fn fetch_room_by_code(&self, code: &str) -> Result<Option<Room>, ApiError>;

    async fn fetch_guess_history(&self, room_id: RoomId) -> Result<Vec<Guess>, ApiError>;

    async fn submit_guess(&self, request: SubmitGuessRequest) -> Result<SubmitOutcome, ApiError>;
}
