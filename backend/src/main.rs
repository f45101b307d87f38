mod calendar;
mod config;
mod error;
mod gcal;
mod handlers;
mod ledger;
mod notify;
mod prefs;
mod recurrence;
mod roster;
mod routes;
mod schema;
mod store;

use anyhow::Result;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;
use crate::gcal::GcalConfig;
use crate::prefs::PrefStore;
use crate::roster::Roster;
use crate::routes::api_routes;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub roster: Arc<Roster>,
    pub prefs: Arc<PrefStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Google credentials are optional; sync endpoints reject requests when
    /// they are absent instead of the server refusing to start.
    pub fn gcal(&self) -> Option<GcalConfig> {
        GcalConfig::from_app(&self.config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "famboard_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    tracing::info!("Starting famboard backend server");

    // Initialize the document store; a missing DATABASE_URL degrades to an
    // uninitialized store (writes fail fast, reads come back empty).
    let store = match config.database_url.as_deref() {
        Some(url) => {
            let store = Store::connect(url)?;
            tracing::info!("Document store pool initialized");
            store
        }
        None => {
            tracing::warn!("DATABASE_URL not set; running with an uninitialized store");
            Store::unconfigured()
        }
    };

    let roster = Roster::load(config.roster_path.as_deref());
    let prefs = PrefStore::open(&config.prefs_path)?;

    let state = AppState {
        store: Arc::new(store),
        roster: Arc::new(roster),
        prefs: Arc::new(prefs),
        config: Arc::new(config.clone()),
    };

    let app = create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
