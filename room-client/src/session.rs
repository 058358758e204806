use std::collections::HashSet;
use std::sync::{Arc, Weak};

use futures_util::StreamExt;
use thiserror::Error;
use tokio::sync::{RwLock, mpsc};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use room_core::{GuessLedger, PresenceRegistry, RankingView, RoomState};
use room_types::{
    Guess, MIN_WORD_LENGTH, PlayerStats, Room, RoomEvent, RoomId, RoomMode, SessionNotice,
};

use crate::api::{ApiError, RoomApi, SubmitGuessRequest};
use crate::bridge::{EventStream, RealtimeBridge};
use crate::config::Config;
use crate::identity::PlayerIdentity;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("not in a room")]
    NotInRoom,
    #[error("room not found: {code}")]
    RoomNotFound { code: String },
    /// The session left the room or started another join while this
    /// command's response was in flight. Nothing was applied.
    #[error("command superseded")]
    Superseded,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Per-room state, torn down as one unit on leave. Exclusively owned by
/// the session; nothing else mutates these.
struct ActiveRoom {
    room: RoomState,
    ledger: GuessLedger,
    presence: PresenceRegistry,
    pump: Option<JoinHandle<()>>,
}

struct SessionState {
    active: Option<ActiveRoom>,
    is_loading: bool,
    error: Option<String>,
    /// Bumped by every room switch and leave. Command responses and pumped
    /// events carry the epoch they were issued under and are discarded when
    /// it no longer matches, so nothing stale leaks into a newer room.
    epoch: u64,
}

/// The single stateful coordinator: applies inbound room events, runs the
/// outbound commands, and projects everything the presentation layer reads.
///
/// The lock is held only while mutating state, never across a network
/// round trip, so events keep flowing while a command is in flight.
pub struct RoomSession {
    identity: PlayerIdentity,
    api: Arc<dyn RoomApi>,
    bridge: Arc<dyn RealtimeBridge>,
    latest_guesses_count: usize,
    state: RwLock<SessionState>,
    notices: mpsc::UnboundedSender<SessionNotice>,
    weak_self: Weak<RoomSession>,
}

/// What the presentation layer reads. Words are already masked according
/// to the room mode and the current player's perspective.
#[derive(Debug, Clone)]
pub struct RoomSnapshot {
    pub room: Option<Room>,
    pub board: Vec<Guess>,
    pub latest: Vec<Guess>,
    pub players: Vec<PlayerStats>,
    pub blocked_words: HashSet<String>,
    pub best_score: i32,
    pub best_temperature: f32,
    pub revealed_word: Option<String>,
    pub is_loading: bool,
    pub error: Option<String>,
}

fn masked(view: &RankingView<'_>, guess: &Guess) -> Guess {
    let mut shown = guess.clone();
    shown.word = view.visible_word(guess);
    shown
}

impl RoomSession {
    pub fn new(
        identity: PlayerIdentity,
        api: Arc<dyn RoomApi>,
        bridge: Arc<dyn RealtimeBridge>,
        config: &Config,
    ) -> (Arc<Self>, mpsc::UnboundedReceiver<SessionNotice>) {
        let (notices, receiver) = mpsc::unbounded_channel();
        let session = Arc::new_cyclic(|weak| Self {
            identity,
            api,
            bridge,
            latest_guesses_count: config.latest_guesses_count,
            state: RwLock::new(SessionState {
                active: None,
                is_loading: false,
                error: None,
                epoch: 0,
            }),
            notices,
            weak_self: weak.clone(),
        });
        (session, receiver)
    }

    pub fn identity(&self) -> &PlayerIdentity {
        &self.identity
    }

    /// Requests a new room in the given mode and enters it. The ledger
    /// starts empty: nothing has happened in a fresh room.
    pub async fn create_room(&self, mode: RoomMode) -> Result<Room, CommandError> {
        let epoch = self.begin_switch().await;
        info!("creating {:?} room as {}", mode, self.identity.name);

        match self.api.create_room(&self.identity.name, mode).await {
            Ok(room) => self.enter_room(epoch, room, Vec::new()).await,
            Err(err) => Err(self.surface_error(epoch, err.into()).await),
        }
    }

    /// Resolves a room by its code and enters it with its guess history.
    /// Presence starts empty: history does not imply current presence.
    pub async fn join_room(&self, code: &str) -> Result<Room, CommandError> {
        let code = code.trim().to_uppercase();
        let epoch = self.begin_switch().await;
        info!("joining room {}", code);

        let room = match self.api.fetch_room_by_code(&code).await {
            Ok(Some(room)) => room,
            Ok(None) => {
                return Err(self
                    .surface_error(epoch, CommandError::RoomNotFound { code })
                    .await);
            }
            Err(err) => return Err(self.surface_error(epoch, err.into()).await),
        };

        let history = match self.api.fetch_guess_history(room.id).await {
            Ok(history) => history,
            Err(err) => return Err(self.surface_error(epoch, err.into()).await),
        };

        self.enter_room(epoch, room, history).await
    }

    /// Submits a word to the scoring oracle. `Ok(None)` means the word was
    /// rejected as input, locally or by the oracle; a `GuessRejected`
    /// notice fires instead of a sticky error.
    pub async fn submit_guess(&self, word: &str) -> Result<Option<Guess>, CommandError> {
        let normalized = word.trim().to_lowercase();

        let (epoch, room_code) = {
            let mut state = self.state.write().await;
            let (epoch, room_code) = match state.active.as_ref() {
                Some(active) => {
                    let view = RankingView::new(
                        &active.ledger,
                        &active.presence,
                        &active.room,
                        &self.identity.id,
                    );
                    if !Self::acceptable_word(&normalized)
                        || view.blocked_words().contains(&normalized)
                    {
                        drop(state);
                        self.notify(SessionNotice::GuessRejected { word: normalized });
                        return Ok(None);
                    }
                    (state.epoch, active.room.room().code.clone())
                }
                None => {
                    state.error = Some("not in a room".to_string());
                    return Err(CommandError::NotInRoom);
                }
            };
            state.is_loading = true;
            state.error = None;
            (epoch, room_code)
        };

        let request = SubmitGuessRequest {
            room_code,
            player_id: self.identity.id.clone(),
            player_name: self.identity.name.clone(),
            word: normalized,
        };

        match self.api.submit_guess(request).await {
            Ok(outcome) => {
                let mut state = self.state.write().await;
                if state.epoch != epoch {
                    return Err(CommandError::Superseded);
                }
                let Some(active) = state.active.as_mut() else {
                    return Err(CommandError::Superseded);
                };

                let guess = outcome.guess;
                // The realtime echo of this guess deduplicates by id.
                active.ledger.insert(guess.clone());

                if let Some(word) = outcome.revealed_word {
                    // Server-authoritative end of round, any mode.
                    active.room.apply_reveal(&word);
                } else if guess.is_winning() && active.room.room().is_coop() {
                    // Optimistic local reveal; the room-updated event that
                    // follows lands on the same idempotent transition.
                    active.room.apply_reveal(&guess.word);
                }

                state.is_loading = false;
                Ok(Some(guess))
            }
            Err(ApiError::UnknownWord { word }) => {
                let mut state = self.state.write().await;
                if state.epoch != epoch {
                    return Err(CommandError::Superseded);
                }
                state.is_loading = false;
                drop(state);
                self.notify(SessionNotice::GuessRejected { word });
                Ok(None)
            }
            Err(err) => Err(self.surface_error(epoch, err.into()).await),
        }
    }

    /// Tears down all per-room state and unsubscribes from the stream.
    /// Safe from any state.
    pub async fn leave_room(&self) {
        let retired = {
            let mut state = self.state.write().await;
            state.epoch += 1;
            state.is_loading = false;
            state.error = None;
            state.active.take()
        };
        if retired.is_some() {
            info!("left room");
        }
        self.retire(retired).await;
    }

    /// Presentation-facing projection of the current state, rebuilt from
    /// scratch on every call.
    pub async fn snapshot(&self) -> RoomSnapshot {
        let state = self.state.read().await;
        match state.active.as_ref() {
            Some(active) => {
                let view = RankingView::new(
                    &active.ledger,
                    &active.presence,
                    &active.room,
                    &self.identity.id,
                );
                RoomSnapshot {
                    room: Some(active.room.room().clone()),
                    board: view
                        .board()
                        .into_iter()
                        .map(|guess| masked(&view, guess))
                        .collect(),
                    latest: view
                        .latest(self.latest_guesses_count)
                        .into_iter()
                        .map(|guess| masked(&view, guess))
                        .collect(),
                    players: view.player_stats(),
                    blocked_words: view.blocked_words(),
                    best_score: view.displayed_best_score(),
                    best_temperature: view.displayed_best_temperature(),
                    revealed_word: active.room.revealed_word().map(str::to_string),
                    is_loading: state.is_loading,
                    error: state.error.clone(),
                }
            }
            None => RoomSnapshot {
                room: None,
                board: Vec::new(),
                latest: Vec::new(),
                players: Vec::new(),
                blocked_words: HashSet::new(),
                best_score: 0,
                best_temperature: 0.0,
                revealed_word: None,
                is_loading: state.is_loading,
                error: state.error.clone(),
            },
        }
    }

    fn acceptable_word(word: &str) -> bool {
        word.chars().count() >= MIN_WORD_LENGTH && word.chars().all(|c| c.is_alphabetic())
    }

    /// Claims a new epoch for a room switch: the previous room (if any) is
    /// retired and anything still in flight for it will be discarded.
    async fn begin_switch(&self) -> u64 {
        let (epoch, retired) = {
            let mut state = self.state.write().await;
            state.epoch += 1;
            state.is_loading = true;
            state.error = None;
            (state.epoch, state.active.take())
        };
        self.retire(retired).await;
        epoch
    }

    async fn retire(&self, active: Option<ActiveRoom>) {
        if let Some(active) = active {
            if let Some(pump) = active.pump {
                pump.abort();
            }
            self.bridge.unsubscribe(active.room.room().id).await;
        }
    }

    /// Records a command failure as the single current error, unless the
    /// command was superseded while its response was in flight.
    async fn surface_error(&self, epoch: u64, err: CommandError) -> CommandError {
        let mut state = self.state.write().await;
        if state.epoch != epoch {
            return CommandError::Superseded;
        }
        state.is_loading = false;
        state.error = Some(err.to_string());
        err
    }

    async fn enter_room(
        &self,
        epoch: u64,
        room: Room,
        history: Vec<Guess>,
    ) -> Result<Room, CommandError> {
        {
            let mut state = self.state.write().await;
            if state.epoch != epoch {
                return Err(CommandError::Superseded);
            }
            let mut ledger = GuessLedger::new();
            ledger.replace_all(history);
            state.active = Some(ActiveRoom {
                room: RoomState::new(room.clone()),
                ledger,
                presence: PresenceRegistry::new(),
                pump: None,
            });
        }

        let stream = match self.bridge.subscribe(room.id, self.identity.as_player()).await {
            Ok(stream) => stream,
            Err(err) => {
                let failure = self
                    .surface_error(epoch, CommandError::Api(ApiError::Service(err)))
                    .await;
                // No live room without its event stream
                let mut state = self.state.write().await;
                if state.epoch == epoch {
                    state.active = None;
                }
                return Err(failure);
            }
        };

        let pump = self.spawn_pump(epoch, room.id, stream);
        let mut state = self.state.write().await;
        if state.epoch != epoch {
            pump.abort();
            drop(state);
            self.bridge.unsubscribe(room.id).await;
            return Err(CommandError::Superseded);
        }
        if let Some(active) = state.active.as_mut() {
            active.pump = Some(pump);
        }
        state.is_loading = false;
        info!("entered room {} ({:?})", room.code, room.mode);
        Ok(room)
    }

    fn spawn_pump(&self, epoch: u64, room_id: RoomId, mut stream: EventStream) -> JoinHandle<()> {
        let weak = self.weak_self.clone();
        tokio::spawn(async move {
            while let Some(event) = stream.next().await {
                let Some(session) = weak.upgrade() else {
                    break;
                };
                session.apply_event(epoch, room_id, event).await;
            }
        })
    }

    async fn apply_event(&self, epoch: u64, room_id: RoomId, event: RoomEvent) {
        let mut notices = Vec::new();
        {
            let mut state = self.state.write().await;
            if state.epoch != epoch {
                // Stream of a room we already left
                return;
            }
            let Some(active) = state.active.as_mut() else {
                return;
            };

            match event {
                RoomEvent::GuessInserted(guess) => {
                    if guess.room_id != room_id {
                        warn!("dropping guess scoped to foreign room {}", guess.room_id);
                        return;
                    }
                    let reveal = guess.is_winning() && active.room.room().is_coop();
                    let word = guess.word.clone();
                    active.ledger.insert(guess);
                    if reveal {
                        active.room.apply_reveal(&word);
                    }
                }
                RoomEvent::RoomUpdated(room) => {
                    if room.id != room_id {
                        warn!("dropping update scoped to foreign room {}", room.id);
                        return;
                    }
                    active.room.replace(room);
                }
                RoomEvent::PresenceSync(roster) => {
                    active.presence.apply_sync(roster);
                }
                RoomEvent::PresenceJoin(players) => {
                    for player in active.presence.apply_join(players) {
                        if !player.is_current(&self.identity.id) {
                            notices.push(SessionNotice::PlayerJoined { player });
                        }
                    }
                }
                RoomEvent::PresenceLeave(players) => {
                    for player in active.presence.apply_leave(players) {
                        if !player.is_current(&self.identity.id) {
                            notices.push(SessionNotice::PlayerLeft { player });
                        }
                    }
                }
            }
        }
        for notice in notices {
            self.notify(notice);
        }
    }

    fn notify(&self, notice: SessionNotice) {
        // The receiver side may already be gone; notices are best-effort
        let _ = self.notices.send(notice);
    }
}
