use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use room_types::{Guess, Room, RoomId, RoomMode};

use crate::api::{ApiError, RoomApi, SubmitGuessRequest, SubmitOutcome};
use crate::config::Config;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateRoomBody<'a> {
    player_name: &'a str,
    mode: RoomMode,
}

#[derive(Deserialize)]
struct CreateRoomResponse {
    room: Room,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitGuessBody<'a> {
    room_code: &'a str,
    player_id: &'a str,
    player_name: &'a str,
    word: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitGuessResponse {
    guess: Guess,
    #[serde(default)]
    revealed_word: Option<String>,
}

/// `RoomApi` over the service's REST endpoints.
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Extracts the service's error message from a failed response body
    /// (`detail` or `message`), falling back to the status code.
    async fn error_detail(response: reqwest::Response) -> String {
        let status = response.status();
        match response.json::<serde_json::Value>().await {
            Ok(body) => body
                .get("detail")
                .or_else(|| body.get("message"))
                .and_then(|value| value.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| format!("request failed with status {status}")),
            Err(_) => format!("request failed with status {status}"),
        }
    }
}

#[async_trait]
impl RoomApi for HttpApi {
    async fn create_room(&self, player_name: &str, mode: RoomMode) -> Result<Room, ApiError> {
        let response = self
            .client
            .post(self.url("/api/rooms"))
            .json(&CreateRoomBody { player_name, mode })
            .send()
            .await
            .map_err(anyhow::Error::from)?;

        if !response.status().is_success() {
            return Err(ApiError::Service(anyhow!(Self::error_detail(response).await)));
        }

        let body: CreateRoomResponse = response.json().await.map_err(anyhow::Error::from)?;
        debug!("created room {} ({:?})", body.room.code, body.room.mode);
        Ok(body.room)
    }

    async fn fetch_room_by_code(&self, code: &str) -> Result<Option<Room>, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/api/rooms/{code}")))
            .send()
            .await
            .map_err(anyhow::Error::from)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(ApiError::Service(anyhow!(Self::error_detail(response).await)));
        }

        let room: Room = response.json().await.map_err(anyhow::Error::from)?;
        Ok(Some(room))
    }

    async fn fetch_guess_history(&self, room_id: RoomId) -> Result<Vec<Guess>, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/api/rooms/{room_id}/guesses")))
            .send()
            .await
            .map_err(anyhow::Error::from)?;

        if !response.status().is_success() {
            return Err(ApiError::Service(anyhow!(Self::error_detail(response).await)));
        }

        let guesses: Vec<Guess> = response.json().await.map_err(anyhow::Error::from)?;
        debug!("loaded {} guesses for room {}", guesses.len(), room_id);
        Ok(guesses)
    }

    async fn submit_guess(&self, request: SubmitGuessRequest) -> Result<SubmitOutcome, ApiError> {
        let response = self
            .client
            .post(self.url("/api/guesses"))
            .json(&SubmitGuessBody {
                room_code: &request.room_code,
                player_id: &request.player_id,
                player_name: &request.player_name,
                word: &request.word,
            })
            .send()
            .await
            .map_err(anyhow::Error::from)?;

        let status = response.status();
        if !status.is_success() {
            let detail = Self::error_detail(response).await;
            return Err(match status {
                StatusCode::UNPROCESSABLE_ENTITY => ApiError::UnknownWord { word: request.word },
                StatusCode::BAD_REQUEST if detail.contains("finished") => ApiError::GameFinished,
                _ => ApiError::Service(anyhow!(detail)),
            });
        }

        let body: SubmitGuessResponse = response.json().await.map_err(anyhow::Error::from)?;
        Ok(SubmitOutcome {
            guess: body.guess,
            revealed_word: body.revealed_word,
        })
    }
}
