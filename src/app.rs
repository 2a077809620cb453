use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::auth::TokenService;
use crate::config::AppConfig;
use crate::database::{CockpitRepository, Database};
use crate::handlers::{pages, protected, public};
use crate::list::ListService;
use crate::media::{ImageKitClient, MediaHost};
use crate::middleware::{bearer_auth_middleware, cors_layer, origin_guard_middleware, session_cookie_middleware};
use crate::services::{SqlConsoleClient, StatsService};

/// Process-wide dependencies, built once at startup and shared by handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Database,
    pub repo: CockpitRepository,
    pub lists: ListService,
    pub stats: StatsService,
    pub sql: SqlConsoleClient,
    pub tokens: TokenService,
}

impl AppState {
    /// Wire everything from configuration, talking to the real media host.
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let db = Database::connect(&config.database)?;
        let media: Arc<dyn MediaHost> = Arc::new(ImageKitClient::new(&config.media)?);
        Self::new(config, db, media)
    }

    pub fn new(config: AppConfig, db: Database, media: Arc<dyn MediaHost>) -> anyhow::Result<Self> {
        let repo = CockpitRepository::new(db.clone());
        let lists = ListService::new(
            db.clone(),
            media.clone(),
            &config.list,
            &config.media,
            config.database.enable_query_logging,
        );
        let stats = StatsService::new(repo.clone(), media, &config.media);
        let sql = SqlConsoleClient::new(&config.sql_service)?;
        let tokens = TokenService::new(&config.security)?;

        Ok(Self {
            config: Arc::new(config),
            db,
            repo,
            lists,
            stats,
            sql,
            tokens,
        })
    }
}

/// Full router: public, bearer-protected and cookie-protected routes behind
/// the origin guard, CORS and request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .merge(page_routes(state.clone()))
        .layer(cors_layer(&state.config.security.cors_origins))
        .layer(from_fn_with_state(state.clone(), origin_guard_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::health::root))
        .route("/health", get(public::health::health))
        .route("/login", post(public::auth::login))
        .route("/logout", post(public::auth::logout))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/lists/:resource", post(protected::lists::list_post))
        .route("/users/:id/toggle-pro", post(protected::users::toggle_pro))
        .route("/messages/:id", delete(protected::messages::message_delete))
        .route("/wines/:id", get(protected::wines::wine_get))
        .route("/wines/:id/photos", get(protected::wines::photos_get))
        .route("/stats", get(protected::stats::stats_get))
        .route("/stats/images", get(protected::stats::image_stats_get))
        .route("/sql/generate", post(protected::sql::generate_post))
        .route("/sql/execute", post(protected::sql::execute_post))
        .route_layer(from_fn_with_state(state, bearer_auth_middleware))
}

fn page_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(pages::dashboard))
        .route_layer(from_fn_with_state(state, session_cookie_middleware))
}
