//! HTTP + WebSocket API for the scoring core
//!
//! Endpoints:
//! - GET    /health                 - Health check
//! - POST   /session/new            - Create session (starts its poller)
//! - GET    /session/:id            - Inspect session
//! - DELETE /session/:id            - Drop session
//! - POST   /session/:id/score      - Score messages now
//! - POST   /session/:id/messages   - Queue messages for the poller
//! - POST   /session/:id/prompt     - Analyze an outgoing prompt
//! - POST   /session/:id/dismiss    - Dismiss coaching (snooze)
//! - POST   /session/:id/settings   - Coaching / debug switches
//! - POST   /session/:id/drift      - Smooth a value on one surface
//! - POST   /session/:id/reset      - Navigation reset
//! - POST   /normalize              - Normalize a legacy payload
//! - WS     /ws/:id                 - Live scored messages
//!
//! Sessions with no request for `session_idle_ttl_ms` are dropped; their
//! pollers stop on the next tick.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use axum::{
    extract::{ws::{Message, WebSocket}, Path, State, WebSocketUpgrade},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::config::ScoringConfig;
use crate::core::analyzer::{AnalyzerChain, KeywordAnalyzer};
use crate::core::drift::DriftSurface;
use crate::core::guard::InFlight;
use crate::core::lexicon::LexiconTable;
use crate::core::normalizer;
use crate::core::session::{ScoringSession, SessionSnapshot};
use crate::error::HugoResult;
use crate::types::{CoachingOutput, ExtractedMessage, OutputMessage, PromptHistory};

/// One live session plus its queue and pass guard
pub struct SessionHandle {
    pub session: Mutex<ScoringSession>,
    pub pending: Mutex<Vec<ExtractedMessage>>,
    pub in_flight: InFlight,
    pub update_tx: broadcast::Sender<OutputMessage>,
    /// ms since epoch of the last request naming this session
    last_seen: AtomicI64,
}

impl SessionHandle {
    fn touch(&self, now_ms: i64) {
        self.last_seen.fetch_max(now_ms, Ordering::Relaxed);
    }

    fn idle_for(&self, now_ms: i64) -> i64 {
        now_ms.saturating_sub(self.last_seen.load(Ordering::Relaxed))
    }
}

/// App state
pub struct AppState {
    pub sessions: RwLock<HashMap<String, Arc<SessionHandle>>>,
    pub config: ScoringConfig,
    pub table: Arc<LexiconTable>,
    next_seq: AtomicU64,
}

impl AppState {
    /// Validate the config and compile its lexicon override
    pub fn new(config: ScoringConfig) -> HugoResult<Arc<Self>> {
        config.validate()?;
        let table = match &config.lexicon {
            Some(lexicon) => Arc::new(LexiconTable::from_config(lexicon)?),
            None => LexiconTable::shared(),
        };

        Ok(Arc::new(Self {
            sessions: RwLock::new(HashMap::new()),
            config,
            table,
            next_seq: AtomicU64::new(0),
        }))
    }

    /// Live session by id; a lookup counts as activity
    pub async fn session(&self, id: &str) -> Option<Arc<SessionHandle>> {
        let handle = self.sessions.read().await.get(id).cloned()?;
        handle.touch(Utc::now().timestamp_millis());
        Some(handle)
    }

    async fn handle(&self, id: &str) -> Result<Arc<SessionHandle>, StatusCode> {
        self.session(id).await.ok_or(StatusCode::NOT_FOUND)
    }

    /// Drop sessions idle longer than `session_idle_ttl_ms`; returns how many went
    pub async fn sweep_idle(&self, now_ms: i64) -> usize {
        let ttl_ms = i64::try_from(self.config.session_idle_ttl_ms).unwrap_or(i64::MAX);
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, handle| {
            let live = handle.idle_for(now_ms) <= ttl_ms;
            if !live {
                info!("session {} expired after {} ms idle", id, handle.idle_for(now_ms));
            }
            live
        });
        before - sessions.len()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NewSessionRequest {
    pub debug: Option<bool>,
    /// History persisted by the host from an earlier page load
    pub history: Option<PromptHistory>,
}

#[derive(Debug, Serialize)]
pub struct NewSessionResponse {
    pub session_id: String,
    pub websocket_url: String,
}

#[derive(Debug, Deserialize)]
pub struct MessagesRequest {
    pub messages: Vec<ExtractedMessage>,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    /// true when another pass was running and this one was skipped
    pub skipped: bool,
    pub results: Vec<OutputMessage>,
}

#[derive(Debug, Serialize)]
pub struct QueuedResponse {
    pub queued: usize,
}

#[derive(Debug, Deserialize)]
pub struct PromptRequest {
    pub text: String,
    pub timestamp: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DismissRequest {
    pub timestamp: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SettingsRequest {
    pub coaching_enabled: Option<bool>,
    pub debug: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct DriftRequest {
    pub surface: DriftSurface,
    pub value: f64,
}

#[derive(Debug, Serialize)]
pub struct DriftResponse {
    pub surface: DriftSurface,
    pub drifted: f64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sessions_active: usize,
}

/// Create the API router; fails on invalid settings or a bad lexicon override
pub fn create_router(config: ScoringConfig) -> HugoResult<Router> {
    Ok(router(AppState::new(config)?))
}

/// Router over existing state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/normalize", post(normalize_payload))
        .route("/session/new", post(create_session))
        .route("/session/:id", get(get_session).delete(delete_session))
        .route("/session/:id/score", post(score_now))
        .route("/session/:id/messages", post(queue_messages))
        .route("/session/:id/prompt", post(analyze_prompt))
        .route("/session/:id/dismiss", post(dismiss))
        .route("/session/:id/settings", post(update_settings))
        .route("/session/:id/drift", post(drift))
        .route("/session/:id/reset", post(reset_session))
        .route("/ws/:id", get(websocket_handler))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    state.sweep_idle(Utc::now().timestamp_millis()).await;
    let sessions = state.sessions.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        sessions_active: sessions.len(),
    })
}

async fn normalize_payload(Json(payload): Json<Value>) -> Json<Value> {
    Json(normalizer::normalize(&payload))
}

async fn create_session(
    State(state): State<Arc<AppState>>,
    body: Option<Json<NewSessionRequest>>,
) -> Json<NewSessionResponse> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let now = Utc::now().timestamp_millis();
    state.sweep_idle(now).await;
    let seq = state.next_seq.fetch_add(1, Ordering::Relaxed);
    let session_id = format!("session_{:x}_{}", now, seq);

    let analyzers = AnalyzerChain::new(KeywordAnalyzer::new(Arc::clone(&state.table)));
    let mut session = ScoringSession::with_analyzers(&session_id, state.config.clone(), analyzers);
    session.set_debug(req.debug.unwrap_or(false));
    if let Some(history) = req.history {
        session.restore_history(history);
    }

    let (tx, _) = broadcast::channel(100);
    let handle = Arc::new(SessionHandle {
        session: Mutex::new(session),
        pending: Mutex::new(Vec::new()),
        in_flight: InFlight::new(),
        update_tx: tx,
        last_seen: AtomicI64::new(now),
    });

    spawn_poller(Arc::downgrade(&handle), state.config.poll_interval_ms);
    state.sessions.write().await.insert(session_id.clone(), handle);

    Json(NewSessionResponse {
        websocket_url: format!("/ws/{}", session_id),
        session_id,
    })
}

async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>, StatusCode> {
    let handle = state.handle(&id).await?;
    let session = handle.session.lock().await;
    Ok(Json(session.inspect()))
}

async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> StatusCode {
    match state.sessions.write().await.remove(&id) {
        Some(_) => {
            info!("session {} closed", id);
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

/// Score immediately, unless a pass is already running
async fn score_now(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<MessagesRequest>,
) -> Result<Json<ScoreResponse>, StatusCode> {
    let handle = state.handle(&id).await?;

    let Some(_ticket) = handle.in_flight.try_begin() else {
        debug!("session {}: scoring pass in flight, skipping request", id);
        return Ok(Json(ScoreResponse { skipped: true, results: Vec::new() }));
    };

    let results = score_and_broadcast(&handle, &req.messages).await;
    Ok(Json(ScoreResponse { skipped: false, results }))
}

async fn queue_messages(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<MessagesRequest>,
) -> Result<(StatusCode, Json<QueuedResponse>), StatusCode> {
    let handle = state.handle(&id).await?;
    let mut pending = handle.pending.lock().await;
    pending.extend(req.messages);
    Ok((StatusCode::ACCEPTED, Json(QueuedResponse { queued: pending.len() })))
}

async fn analyze_prompt(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<PromptRequest>,
) -> Result<Json<CoachingOutput>, StatusCode> {
    let handle = state.handle(&id).await?;
    let now = req.timestamp.unwrap_or_else(|| Utc::now().timestamp_millis());
    let mut session = handle.session.lock().await;
    Ok(Json(session.analyze_prompt(&req.text, now)))
}

async fn dismiss(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Option<Json<DismissRequest>>,
) -> Result<StatusCode, StatusCode> {
    let handle = state.handle(&id).await?;
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let now = req.timestamp.unwrap_or_else(|| Utc::now().timestamp_millis());
    handle.session.lock().await.dismiss_coaching(now);
    Ok(StatusCode::NO_CONTENT)
}

async fn update_settings(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<SettingsRequest>,
) -> Result<StatusCode, StatusCode> {
    let handle = state.handle(&id).await?;
    let mut session = handle.session.lock().await;
    if let Some(enabled) = req.coaching_enabled {
        session.set_coaching_enabled(enabled);
    }
    if let Some(debug) = req.debug {
        session.set_debug(debug);
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn drift(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<DriftRequest>,
) -> Result<Json<DriftResponse>, StatusCode> {
    let handle = state.handle(&id).await?;
    let drifted = handle.session.lock().await.drift(req.surface, req.value);
    Ok(Json(DriftResponse { surface: req.surface, drifted }))
}

async fn reset_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    let handle = state.handle(&id).await?;
    handle.pending.lock().await.clear();
    handle.session.lock().await.reset();
    Ok(StatusCode::NO_CONTENT)
}

/// WebSocket handler for live updates
async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, StatusCode> {
    let handle = state.handle(&id).await?;
    let rx = handle.update_tx.subscribe();
    drop(handle);

    Ok(ws.on_upgrade(move |socket| handle_websocket(socket, rx)))
}

/// Forward scored messages until either side goes away
async fn handle_websocket(socket: WebSocket, mut rx: broadcast::Receiver<OutputMessage>) {
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            update = rx.recv() => match update {
                Ok(update) => {
                    let json = serde_json::to_string(&update).unwrap_or_default();
                    if sender.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("websocket client lagged, {} updates dropped", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }
}

async fn score_and_broadcast(handle: &SessionHandle, messages: &[ExtractedMessage]) -> Vec<OutputMessage> {
    let results = handle.session.lock().await.score_batch(messages);
    for output in &results {
        // no subscribers is fine
        let _ = handle.update_tx.send(output.clone());
    }
    results
}

/// Drain the queue at a fixed cadence; overlapping passes are skipped
fn spawn_poller(weak: Weak<SessionHandle>, interval_ms: u64) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms));
        loop {
            ticker.tick().await;
            let Some(handle) = weak.upgrade() else {
                break;
            };
            let Some(ticket) = handle.in_flight.try_begin() else {
                debug!("scoring pass still in flight; skipping tick");
                continue;
            };
            tokio::spawn(async move {
                let _ticket = ticket;
                let batch = std::mem::take(&mut *handle.pending.lock().await);
                if !batch.is_empty() {
                    score_and_broadcast(&handle, &batch).await;
                }
            });
        }
    });
}

/// Expire idle sessions even when no request arrives
fn spawn_sweeper(weak: Weak<AppState>, interval_ms: u64) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms.max(1)));
        loop {
            ticker.tick().await;
            let Some(state) = weak.upgrade() else {
                break;
            };
            state.sweep_idle(Utc::now().timestamp_millis()).await;
        }
    });
}

/// Run the API server
pub async fn run_server(addr: &str, config: ScoringConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(config)?;
    spawn_sweeper(Arc::downgrade(&state), state.config.session_idle_ttl_ms);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Hugo resonance API running on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
