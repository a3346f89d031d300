use crate::accounts::{self, UserStore};
use crate::config::ServerConfig;
use crate::session::SessionManager;
use crate::signaling::{SignalingService, ws_handler};
use anyhow::{Context, Result};
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use ladder_core::ServerStatus;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub struct AppState {
    pub signaling: SignalingService,
    pub sessions: SessionManager,
    pub accounts: UserStore,
}

impl AppState {
    pub fn new(config: &ServerConfig, accounts: UserStore) -> Self {
        let signaling = SignalingService::new(config.ice_servers.clone());
        let sessions = SessionManager::new(Arc::new(signaling.clone()), config.ready_delay);
        Self {
            signaling,
            sessions,
            accounts,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(ws_handler))
        .route("/ws", get(ws_handler))
        .route("/status", get(status))
        .route("/register", post(accounts::register))
        .route("/login", post(accounts::login))
        .route("/update_stats", post(accounts::update_stats))
        .route("/user_stats/{username}", get(accounts::user_stats))
        .route("/leaderboard", get(accounts::leaderboard))
        .layer(cors)
        .with_state(state)
}

async fn status(State(state): State<Arc<AppState>>) -> Json<ServerStatus> {
    Json(ServerStatus {
        server: "active".into(),
        sessions: state.sessions.session_count(),
        clients: state.signaling.client_count(),
        users: state.accounts.len(),
    })
}

/// A bound, not yet running relay.
pub struct Relay {
    listener: TcpListener,
    app: Router,
}

impl Relay {
    pub async fn bind(config: &ServerConfig) -> Result<Self> {
        let addr = config.socket_addr().await?;
        let accounts = match &config.users_file {
            Some(path) => UserStore::open(path.clone())
                .await
                .with_context(|| format!("Failed to load accounts from {}", path.display()))?,
            None => UserStore::in_memory(),
        };
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        let state = Arc::new(AppState::new(config, accounts));

        Ok(Self {
            listener,
            app: router(state),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub async fn run(self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Signaling server listening on ws://{}", self.local_addr()?);
        axum::serve(self.listener, self.app)
            .with_graceful_shutdown(shutdown)
            .await
            .context("Signaling server stopped unexpectedly")?;
        info!("Signaling server stopped");
        Ok(())
    }
}
