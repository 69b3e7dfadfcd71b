use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::agent::{Agent, AgentConfig, DecisionRequest};
use crate::error::EngineError;
use crate::game::Decision;

#[derive(Clone)]
struct AppState {
    defaults: AgentConfig,
    agents: Arc<RwLock<HashMap<Uuid, Arc<Mutex<Agent>>>>>,
}

impl AppState {
    fn new(defaults: AgentConfig) -> Self {
        Self {
            defaults,
            agents: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn insert_agent(&self, agent: Agent) -> Uuid {
        let id = Uuid::new_v4();
        self.agents.write().insert(id, Arc::new(Mutex::new(agent)));
        id
    }

    fn get_agent(&self, id: &Uuid) -> Option<Arc<Mutex<Agent>>> {
        self.agents.read().get(id).cloned()
    }
}

#[derive(Debug, Deserialize)]
struct RegisterAgentRequest {
    player_id: String,
    seed: Option<u64>,
    config: Option<AgentConfig>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AgentInfo {
    pub agent_id: Uuid,
    pub player_id: String,
    pub config: AgentConfig,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, thiserror::Error)]
enum ApiError {
    #[error("agent not found")]
    NotFound,
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Engine(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

pub async fn serve(addr: SocketAddr, defaults: AgentConfig) -> Result<()> {
    let app = router(defaults);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "decision service listening");
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn router(defaults: AgentConfig) -> Router {
    let api = Router::new()
        .route("/agents", post(register_agent))
        .route("/agents/:id", get(fetch_agent))
        .route("/agents/:id/actions", post(declare_action));

    Router::new()
        .route("/healthz", get(health))
        .nest("/api", api)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(defaults))
}

async fn health() -> &'static str {
    "ok"
}

fn describe(id: Uuid, agent: &Agent) -> AgentInfo {
    AgentInfo {
        agent_id: id,
        player_id: agent.player_id().to_string(),
        config: agent.config().clone(),
    }
}

async fn register_agent(
    State(state): State<AppState>,
    Json(req): Json<RegisterAgentRequest>,
) -> Result<Json<AgentInfo>, ApiError> {
    let mut config = req.config.unwrap_or_else(|| state.defaults.clone());
    if req.seed.is_some() {
        config.seed = req.seed;
    }

    let player_id = req.player_id;
    let id = state.insert_agent(Agent::new(player_id.clone(), config.clone()));
    info!(agent_id = %id, player = %player_id, "agent registered");
    Ok(Json(AgentInfo {
        agent_id: id,
        player_id,
        config,
    }))
}

async fn fetch_agent(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AgentInfo>, ApiError> {
    let agent_arc = state.get_agent(&id).ok_or(ApiError::NotFound)?;
    let agent = agent_arc.lock();
    Ok(Json(describe(id, &agent)))
}

async fn declare_action(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<DecisionRequest>,
) -> Result<Json<Decision>, ApiError> {
    let agent_arc = state.get_agent(&id).ok_or(ApiError::NotFound)?;
    let mut agent = agent_arc.lock();
    let decision = agent.respond(&req)?;
    Ok(Json(decision))
}
