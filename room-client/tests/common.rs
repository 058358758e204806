use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use futures_util::StreamExt;
use tokio::sync::{Mutex, Notify, mpsc};
use uuid::Uuid;

use room_client::api::{ApiError, RoomApi, SubmitGuessRequest, SubmitOutcome};
use room_client::bridge::{EventStream, RealtimeBridge};
use room_client::{Config, PlayerIdentity, RoomSession};
use room_types::{Guess, Player, Room, RoomEvent, RoomId, RoomMode, RoomStatus, SessionNotice};

/// Scripted oracle behavior for one word.
#[derive(Clone)]
pub enum ScriptedScore {
    Accept {
        score: i32,
        revealed_word: Option<String>,
    },
    Unknown,
}

/// In-memory `RoomApi` with scripted word outcomes. `gate_submissions`
/// holds every submit response until notified, to exercise commands that
/// are overtaken while in flight.
pub struct FakeApi {
    rooms: Mutex<HashMap<String, Room>>,
    history: Mutex<HashMap<RoomId, Vec<Guess>>>,
    scores: Mutex<HashMap<String, ScriptedScore>>,
    submit_gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            rooms: Mutex::new(HashMap::new()),
            history: Mutex::new(HashMap::new()),
            scores: Mutex::new(HashMap::new()),
            submit_gate: Mutex::new(None),
        })
    }

    pub async fn add_room(&self, room: Room) {
        self.rooms.lock().await.insert(room.code.clone(), room);
    }

    pub async fn add_history(&self, room_id: RoomId, guesses: Vec<Guess>) {
        self.history.lock().await.insert(room_id, guesses);
    }

    pub async fn script_word(&self, word: &str, outcome: ScriptedScore) {
        self.scores.lock().await.insert(word.to_string(), outcome);
    }

    pub async fn gate_submissions(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.submit_gate.lock().await = Some(gate.clone());
        gate
    }
}

#[async_trait]
impl RoomApi for FakeApi {
    async fn create_room(&self, _player_name: &str, mode: RoomMode) -> Result<Room, ApiError> {
        let room = make_room("ROOM01", mode);
        self.add_room(room.clone()).await;
        Ok(room)
    }

    async fn fetch_room_by_code(&self, code: &str) -> Result<Option<Room>, ApiError> {
        Ok(self.rooms.lock().await.get(code).cloned())
    }

    async fn fetch_guess_history(&self, room_id: RoomId) -> Result<Vec<Guess>, ApiError> {
        Ok(self
            .history
            .lock()
            .await
            .get(&room_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn submit_guess(&self, request: SubmitGuessRequest) -> Result<SubmitOutcome, ApiError> {
        let gate = self.submit_gate.lock().await.clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let room = self
            .rooms
            .lock()
            .await
            .get(&request.room_code)
            .cloned()
            .ok_or_else(|| ApiError::Service(anyhow::anyhow!("room not found")))?;

        let script = self
            .scores
            .lock()
            .await
            .get(&request.word)
            .cloned()
            .unwrap_or(ScriptedScore::Accept {
                score: 10,
                revealed_word: None,
            });

        match script {
            ScriptedScore::Unknown => Err(ApiError::UnknownWord { word: request.word }),
            ScriptedScore::Accept {
                score,
                revealed_word,
            } => Ok(SubmitOutcome {
                guess: Guess {
                    id: Uuid::new_v4(),
                    room_id: room.id,
                    player_id: request.player_id,
                    player_name: request.player_name,
                    word: request.word,
                    score,
                    rank: None,
                    temperature: score as f32,
                    created_at: Utc::now(),
                },
                revealed_word,
            }),
        }
    }
}

/// In-memory `RealtimeBridge`: tests push events straight into the
/// subscribed room's channel.
pub struct FakeBridge {
    senders: Mutex<HashMap<RoomId, mpsc::UnboundedSender<RoomEvent>>>,
    pub announced: Mutex<Vec<Player>>,
    pub unsubscribed: Mutex<Vec<RoomId>>,
}

impl FakeBridge {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            senders: Mutex::new(HashMap::new()),
            announced: Mutex::new(Vec::new()),
            unsubscribed: Mutex::new(Vec::new()),
        })
    }

    pub async fn push(&self, room_id: RoomId, event: RoomEvent) {
        self.senders
            .lock()
            .await
            .get(&room_id)
            .expect("no subscription for room")
            .send(event)
            .expect("event stream closed");
    }
}

#[async_trait]
impl RealtimeBridge for FakeBridge {
    async fn subscribe(&self, room_id: RoomId, announce: Player) -> anyhow::Result<EventStream> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.senders.lock().await.insert(room_id, sender);
        self.announced.lock().await.push(announce);

        let stream = futures_util::stream::unfold(receiver, |mut receiver| async move {
            receiver.recv().await.map(|event| (event, receiver))
        });
        Ok(stream.boxed())
    }

    async fn unsubscribe(&self, room_id: RoomId) {
        self.senders.lock().await.remove(&room_id);
        self.unsubscribed.lock().await.push(room_id);
    }
}

pub struct TestHarness {
    pub session: Arc<RoomSession>,
    pub notices: mpsc::UnboundedReceiver<SessionNotice>,
    pub api: Arc<FakeApi>,
    pub bridge: Arc<FakeBridge>,
}

pub fn harness() -> TestHarness {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let api = FakeApi::new();
    let bridge = FakeBridge::new();
    let identity = PlayerIdentity::new("me", "Me");
    let config = Config {
        api_url: "http://localhost:8081".to_string(),
        request_timeout_seconds: 10,
        latest_guesses_count: 20,
    };

    let api_dyn: Arc<dyn RoomApi> = api.clone();
    let bridge_dyn: Arc<dyn RealtimeBridge> = bridge.clone();
    let (session, notices) = RoomSession::new(identity, api_dyn, bridge_dyn, &config);

    TestHarness {
        session,
        notices,
        api,
        bridge,
    }
}

/// Lets the event pump drain everything pushed so far.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(20)).await;
}

pub fn drain_notices(receiver: &mut mpsc::UnboundedReceiver<SessionNotice>) -> Vec<SessionNotice> {
    let mut notices = Vec::new();
    while let Ok(notice) = receiver.try_recv() {
        notices.push(notice);
    }
    notices
}

pub fn make_room(code: &str, mode: RoomMode) -> Room {
    Room {
        id: RoomId::new_v4(),
        code: code.to_string(),
        mode,
        status: RoomStatus::Active,
        revealed_word: None,
        created_at: Utc::now(),
    }
}

pub fn make_guess(room_id: RoomId, player: &str, word: &str, score: i32) -> Guess {
    Guess {
        id: Uuid::new_v4(),
        room_id,
        player_id: player.to_string(),
        player_name: player.to_string(),
        word: word.to_string(),
        score,
        rank: None,
        temperature: score as f32,
        created_at: Utc::now(),
    }
}

pub fn make_player(id: &str, name: &str) -> Player {
    Player {
        id: id.to_string(),
        name: name.to_string(),
        joined_at: Utc::now(),
    }
}
