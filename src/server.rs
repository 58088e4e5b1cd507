//! HTTP API server: axum router and request handlers.
//!
//! The server runs on the tokio runtime next to the player task. Reads
//! come from the [`SharedSnapshot`] the player keeps up to date; changes
//! are sent to the player as [`PlayerCommand`]s over a tokio channel.
//!
//! ## Rust concepts
//! - `async fn` and `.await` for non-blocking I/O
//! - axum extractors: `State`, `Json`
//! - `Arc` for sharing state across async tasks
//! - Serde `Deserialize` for parsing JSON request bodies
//! - `tower-http` middleware for CORS and request tracing

use crate::player::PlayerCommand;
use crate::snapshot::{self, DisplayStatus, MatrixSnapshot, SharedSnapshot};
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, Json};
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc::Sender;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// ── App State ────────────────────────────────────────────────────────

/// Shared application state, passed to every handler via axum's `State` extractor.
///
/// Rust concept: CLONE for Arc
/// axum clones the state for each request, so everything inside is either
/// an `Arc` or a channel handle, both cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Channel to the player task
    pub commands: Sender<PlayerCommand>,
    /// Latest frame and status (player writes, handlers read)
    pub snapshot: SharedSnapshot,
    /// Scene names in play order; fixed at startup
    pub scenes: Arc<[String]>,
}

// ── OpenAPI Documentation ────────────────────────────────────────────

#[derive(OpenApi)]
#[openapi(
    paths(
        get_status,
        get_scenes,
        get_matrix,
        get_matrix_html,
        post_select_scene,
        post_animation_start,
        post_animation_stop,
        post_animation_reset,
        post_animation_cycling,
    ),
    components(schemas(
        DisplayStatus,
        MatrixSnapshot,
        snapshot::CellSnapshot,
        crate::geometry::Dimensions,
        SceneEntry,
        SelectSceneRequest,
        CyclingRequest,
    )),
    tags(
        (name = "scenes", description = "Scene selection endpoints"),
        (name = "animation", description = "Frame clock control endpoints"),
        (name = "display", description = "Current frame endpoints"),
        (name = "system", description = "System status endpoints"),
    ),
    info(
        title = "LED Imager API",
        version = env!("CARGO_PKG_VERSION"),
        description = "HTTP API for watching and steering the LED matrix scene player"
    )
)]
pub struct ApiDoc;

// ── Request/Response types ───────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct SceneEntry {
    pub index: usize,
    #[schema(example = "TetrisScene")]
    pub name: String,
    /// Whether this scene is on the display right now
    pub current: bool,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct SelectSceneRequest {
    /// Zero-based position in the scene list. Use GET /api/v1/scenes to list scenes.
    #[schema(example = 2)]
    index: usize,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CyclingRequest {
    /// Move to the next scene each time the frame counter wraps
    #[schema(example = true)]
    enabled: bool,
}

type ApiResult = Result<StatusCode, (StatusCode, String)>;

// ── Router ───────────────────────────────────────────────────────────

/// Build the axum router with all API endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(
            SwaggerUi::new("/docs")
                .url("/api-docs/openapi.json", ApiDoc::openapi())
                .config(
                    utoipa_swagger_ui::Config::new(["/api-docs/openapi.json"]).validator_url("none"),
                ),
        )
        .route("/api/v1/status", get(get_status))
        .route("/api/v1/scenes", get(get_scenes))
        .route("/api/v1/scenes/select", post(post_select_scene))
        .route("/api/v1/matrix", get(get_matrix))
        .route("/api/v1/matrix/html", get(get_matrix_html))
        .route("/api/v1/animation/start", post(post_animation_start))
        .route("/api/v1/animation/stop", post(post_animation_stop))
        .route("/api/v1/animation/reset", post(post_animation_reset))
        .route("/api/v1/animation/cycling", post(post_animation_cycling))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Forward a command to the player, mapping a closed channel to 503.
async fn send_command(state: &AppState, command: PlayerCommand) -> ApiResult {
    state.commands.send(command).await.map_err(|_| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "Scene player is not running".to_string(),
        )
    })?;
    Ok(StatusCode::OK)
}

// ── Handlers ─────────────────────────────────────────────────────────

/// GET /api/v1/status: what is on the display right now
#[utoipa::path(
    get,
    path = "/api/v1/status",
    tag = "system",
    responses(
        (status = 200, description = "Current display status", body = DisplayStatus)
    )
)]
async fn get_status(State(state): State<AppState>) -> Json<DisplayStatus> {
    Json(state.snapshot.status())
}

/// GET /api/v1/scenes: list scenes in play order
#[utoipa::path(
    get,
    path = "/api/v1/scenes",
    tag = "scenes",
    responses(
        (status = 200, description = "Scenes in play order", body = Vec<SceneEntry>)
    )
)]
async fn get_scenes(State(state): State<AppState>) -> Json<Vec<SceneEntry>> {
    let current = state.snapshot.status().scene_index;
    let scenes = state
        .scenes
        .iter()
        .enumerate()
        .map(|(index, name)| SceneEntry {
            index,
            name: name.clone(),
            current: index == current,
        })
        .collect();
    Json(scenes)
}

/// GET /api/v1/matrix: the latest frame as JSON
#[utoipa::path(
    get,
    path = "/api/v1/matrix",
    tag = "display",
    responses(
        (status = 200, description = "Latest rendered frame", body = MatrixSnapshot)
    )
)]
async fn get_matrix(State(state): State<AppState>) -> Json<MatrixSnapshot> {
    Json(MatrixSnapshot::from(&state.snapshot.matrix()))
}

/// GET /api/v1/matrix/html: the latest frame as an HTML page
#[utoipa::path(
    get,
    path = "/api/v1/matrix/html",
    tag = "display",
    responses(
        (status = 200, description = "Latest rendered frame as a grid of colored cells", body = String, content_type = "text/html")
    )
)]
async fn get_matrix_html(State(state): State<AppState>) -> Html<String> {
    Html(snapshot::render_html(&state.snapshot.matrix()))
}

/// POST /api/v1/scenes/select: jump to a scene and restart it
#[utoipa::path(
    post,
    path = "/api/v1/scenes/select",
    tag = "scenes",
    request_body = SelectSceneRequest,
    responses(
        (status = 200, description = "Scene selected"),
        (status = 400, description = "Scene index out of range"),
        (status = 503, description = "Scene player is not running")
    )
)]
async fn post_select_scene(
    State(state): State<AppState>,
    Json(req): Json<SelectSceneRequest>,
) -> ApiResult {
    if req.index >= state.scenes.len() {
        return Err((
            StatusCode::BAD_REQUEST,
            format!(
                "Scene index {} out of range (0..{})",
                req.index,
                state.scenes.len()
            ),
        ));
    }
    send_command(&state, PlayerCommand::SelectScene(req.index)).await
}

/// POST /api/v1/animation/start: start the frame clock
#[utoipa::path(
    post,
    path = "/api/v1/animation/start",
    tag = "animation",
    responses(
        (status = 200, description = "Animation running"),
        (status = 503, description = "Scene player is not running")
    )
)]
async fn post_animation_start(State(state): State<AppState>) -> ApiResult {
    send_command(&state, PlayerCommand::Start).await
}

/// POST /api/v1/animation/stop: freeze on the current frame
#[utoipa::path(
    post,
    path = "/api/v1/animation/stop",
    tag = "animation",
    responses(
        (status = 200, description = "Animation stopped"),
        (status = 503, description = "Scene player is not running")
    )
)]
async fn post_animation_stop(State(state): State<AppState>) -> ApiResult {
    send_command(&state, PlayerCommand::Stop).await
}

/// POST /api/v1/animation/reset: back to frame 0 of the current scene
#[utoipa::path(
    post,
    path = "/api/v1/animation/reset",
    tag = "animation",
    responses(
        (status = 200, description = "Frame counter reset"),
        (status = 503, description = "Scene player is not running")
    )
)]
async fn post_animation_reset(State(state): State<AppState>) -> ApiResult {
    send_command(&state, PlayerCommand::Reset).await
}

/// POST /api/v1/animation/cycling: turn automatic scene cycling on or off
#[utoipa::path(
    post,
    path = "/api/v1/animation/cycling",
    tag = "animation",
    request_body = CyclingRequest,
    responses(
        (status = 200, description = "Cycling updated"),
        (status = 503, description = "Scene player is not running")
    )
)]
async fn post_animation_cycling(
    State(state): State<AppState>,
    Json(req): Json<CyclingRequest>,
) -> ApiResult {
    send_command(&state, PlayerCommand::SetCycling(req.enabled)).await
}
