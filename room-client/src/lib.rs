pub mod api;
pub mod bridge;
pub mod config;
pub mod http;
pub mod identity;
pub mod session;

pub use api::{ApiError, RoomApi, SubmitGuessRequest, SubmitOutcome};
pub use bridge::{EventStream, RealtimeBridge, decode_event};
pub use config::Config;
pub use http::HttpApi;
pub use identity::PlayerIdentity;
pub use session::{CommandError, RoomSession, RoomSnapshot};
