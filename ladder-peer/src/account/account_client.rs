use crate::config::ClientConfig;
use crate::error::PeerError;
use ladder_core::stats::PlayerStats;
use ladder_core::{
    Credentials, Leaderboard, LoginReply, RegisterReply, ServerStatus, StatsReply, StatsUpdate,
    UserProfile,
};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// HTTP side of the relay: server status, accounts and the leaderboard.
pub struct AccountClient {
    base: String,
    http: Client,
}

impl AccountClient {
    /// Talks to the relay behind `config.server_url`; requests give up after
    /// `signal_timeout`.
    pub fn new(config: &ClientConfig) -> Result<Self, PeerError> {
        let http = Client::builder().timeout(config.signal_timeout).build()?;
        Ok(Self {
            base: http_base(&config.server_url),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    pub async fn status(&self) -> Result<ServerStatus, PeerError> {
        self.get("/status").await
    }

    pub async fn register(&self, credentials: &Credentials) -> Result<RegisterReply, PeerError> {
        self.post("/register", credentials).await
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<LoginReply, PeerError> {
        self.post("/login", credentials).await
    }

    /// Sends our stats and returns what the server holds after merging them.
    pub async fn update_stats(
        &self,
        credentials: &Credentials,
        stats: &PlayerStats,
    ) -> Result<PlayerStats, PeerError> {
        let update = StatsUpdate {
            username: credentials.username.clone(),
            password: credentials.password.clone(),
            user_data: stats.clone(),
        };
        let reply: StatsReply = self.post("/update_stats", &update).await?;
        Ok(reply.updated_stats)
    }

    pub async fn user_stats(&self, username: &str) -> Result<UserProfile, PeerError> {
        self.get(&format!("/user_stats/{username}")).await
    }

    pub async fn leaderboard(&self) -> Result<Leaderboard, PeerError> {
        self.get("/leaderboard").await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, PeerError> {
        debug!("GET {}{}", self.base, path);
        let response = self.http.get(format!("{}{}", self.base, path)).send().await?;
        read(response).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, PeerError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("POST {}{}", self.base, path);
        let response = self
            .http
            .post(format!("{}{}", self.base, path))
            .json(body)
            .send()
            .await?;
        read(response).await
    }
}

/// Non-2xx answers become [`PeerError::Rejected`] with the server's `detail`.
async fn read<T: DeserializeOwned>(response: Response) -> Result<T, PeerError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let detail = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body.get("detail").and_then(Value::as_str).map(str::to_owned))
        .unwrap_or_else(|| status.to_string());
    Err(PeerError::Rejected {
        status: status.as_u16(),
        detail,
    })
}

/// HTTP base url of the relay at a `ws://` / `wss://` signaling url.
pub fn http_base(server_url: &str) -> String {
    let url = server_url.trim_end_matches('/');
    let url = url.strip_suffix("/ws").unwrap_or(url);

    if let Some(rest) = url.strip_prefix("wss://") {
        format!("https://{rest}")
    } else if let Some(rest) = url.strip_prefix("ws://") {
        format!("http://{rest}")
    } else if url.contains("://") {
        url.to_owned()
    } else {
        format!("http://{url}")
    }
}
