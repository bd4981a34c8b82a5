//! HTTP API handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rps_core::{Game, GameError, GameId, Player};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::state::AppState;

// ============ Errors ============

/// Application error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Game(#[from] GameError),

    /// Status lookups report a missing game as 404; every other route keeps 400
    #[error(transparent)]
    NotFound(GameError),

    #[error("Missing parameters: {}", .0.join(", "))]
    MissingParameters(Vec<&'static str>),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Game(_) | ApiError::MissingParameters(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(%status, error = %self, "Request rejected");
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

// ============ Request/Response types ============

/// Raw body fields. A field counts as present whenever its key is, whatever
/// the value; non-string values are carried as their JSON text.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct RequestBody(Map<String, Value>);

impl RequestBody {
    pub fn field(&self, key: &str) -> Option<String> {
        self.0.get(key).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CreateGameResponse {
    pub message: String,
    pub id: GameId,
}

/// Check that every named field is present, reporting all absent ones at once
fn require<const N: usize>(
    fields: [(&'static str, Option<String>); N],
) -> Result<[String; N], ApiError> {
    let missing: Vec<_> = fields
        .iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| *name)
        .collect();

    if !missing.is_empty() {
        return Err(ApiError::MissingParameters(missing));
    }
    Ok(fields.map(|(_, value)| value.unwrap_or_default()))
}

/// A missing or malformed body counts as one with no fields
fn body_or_default<T: Default>(body: Option<Json<T>>) -> T {
    body.map(|Json(req)| req).unwrap_or_default()
}

// ============ Game handlers ============

pub async fn create_game(
    State(state): State<AppState>,
    body: Option<Json<RequestBody>>,
) -> Result<(StatusCode, Json<CreateGameResponse>), ApiError> {
    let req = body_or_default(body);
    let [name] = require([("name", req.field("name"))])?;

    let registry = state.registry();
    let id = registry.create_game();
    registry.join_game(&id.to_string(), Player::new(name))?;

    Ok((
        StatusCode::CREATED,
        Json(CreateGameResponse {
            message: "New game successfully created.".to_string(),
            id,
        }),
    ))
}

pub async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Game>, ApiError> {
    let game = state.registry().get_game(&id).map_err(|e| match e {
        GameError::GameNotFound(_) => ApiError::NotFound(e),
        other => ApiError::Game(other),
    })?;
    Ok(Json(game))
}

pub async fn join_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<RequestBody>>,
) -> Result<Json<MessageResponse>, ApiError> {
    let req = body_or_default(body);
    let [name] = require([("name", req.field("name"))])?;

    state.registry().join_game(&id, Player::new(name))?;
    Ok(MessageResponse::new("Successfully joined the game."))
}

pub async fn submit_move(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<RequestBody>>,
) -> Result<Json<MessageResponse>, ApiError> {
    let req = body_or_default(body);
    let [name, mv] = require([
        ("name", req.field("name")),
        ("move", req.field("move")),
    ])?;

    state.registry().submit_move(&id, &name, &mv)?;
    Ok(MessageResponse::new(format!("Successfully selected {}.", mv)))
}
