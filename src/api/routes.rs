//! HTTP route handlers.

use std::sync::Arc;

use axum::middleware;
use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{Credentials, JwtCredentials};
use crate::config::Config;
use crate::pipeline::{self, PlanContext, PlanError, PlanRecord, StepResponse};
use crate::store::{Database, TaskStore};

use super::auth::{self, AuthUser};
use super::types::*;

/// Shared application state.
pub struct AppState {
    /// Plan pipeline (holds the LLM client, if configured)
    pub planner: PlanContext,
    /// Saved task text per user
    pub tasks: Arc<dyn TaskStore>,
    /// Registration, login and token checks
    pub credentials: Arc<dyn Credentials>,
}

impl AppState {
    /// Open the database and build the LLM client described by `config`.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let db = Arc::new(Database::open(&config.database_path)?);
        tracing::info!("Opened database at {}", config.database_path.display());

        let planner = PlanContext::from_config(&config)?;

        let credentials = Arc::new(JwtCredentials::new(
            db.clone(),
            config.auth.jwt_secret.clone(),
            config.auth.jwt_ttl_hours,
        ));

        Ok(Self {
            planner,
            tasks: db,
            credentials,
        })
    }
}

/// Build the router for `state`.
pub fn router(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/generate-plan", post(generate_plan))
        .route("/next-step", post(next_step))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let protected_routes = Router::new()
        .route("/save-task", post(save_task))
        .route("/user-tasks", get(user_tasks))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::from_config(config)?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        llm_configured: state.planner.is_available(),
    })
}

/// Run synchronous store or hashing work off the async worker threads.
pub(super) async fn run_blocking<T, F>(f: F) -> Result<T, (StatusCode, String)>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        tracing::error!("Blocking task failed: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal error".to_string(),
        )
    })
}

/// POST /generate-plan
async fn generate_plan(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TaskRequest>,
) -> Result<Json<Vec<PlanRecord>>, (StatusCode, String)> {
    match state.planner.generate_plan(&req.tasks).await {
        Ok(records) => Ok(Json(records)),
        Err(PlanError::ServiceUnavailable) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            "AI Service unavailable (Missing API Key)".to_string(),
        )),
        Err(PlanError::InputRejected(_)) => Err((
            StatusCode::BAD_REQUEST,
            "Invalid input. Please provide simple actionable tasks.".to_string(),
        )),
    }
}

/// POST /next-step
async fn next_step(Json(req): Json<ContinueRequest>) -> Json<StepResponse> {
    Json(pipeline::advance_step(&req.task, &req.steps, req.step_index))
}

/// POST /save-task
async fn save_task(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<SaveTaskRequest>,
) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    let tasks = Arc::clone(&state.tasks);
    let email = user.email.clone();
    run_blocking(move || tasks.save(&email, &req.content))
        .await?
        .map_err(|e| {
            tracing::error!("Failed to save task for {}: {}", user.email, e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;
    Ok(Json(MessageResponse::new("Task saved")))
}

/// GET /user-tasks
async fn user_tasks(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<String>>, (StatusCode, String)> {
    let tasks = Arc::clone(&state.tasks);
    run_blocking(move || tasks.list(&user.email))
        .await?
        .map(Json)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}
