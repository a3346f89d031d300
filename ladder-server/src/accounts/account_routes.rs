use crate::accounts::account_error::AccountError;
use crate::app::AppState;
use axum::Json;
use axum::extract::{Path, State};
use chrono::Utc;
use ladder_core::{
    Credentials, Leaderboard, LoginReply, RegisterReply, StatsReply, StatsUpdate, UserProfile,
};
use std::sync::Arc;

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<RegisterReply>, AccountError> {
    let username = state
        .accounts
        .register(&credentials.username, &credentials.password, Utc::now())
        .await?;

    Ok(Json(RegisterReply {
        success: true,
        message: "User registered successfully".into(),
        username,
    }))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<LoginReply>, AccountError> {
    let (username, stats) = state
        .accounts
        .login(&credentials.username, &credentials.password, Utc::now())
        .await?;

    Ok(Json(LoginReply {
        success: true,
        message: "Login successful".into(),
        username,
        user_data: stats,
    }))
}

pub async fn update_stats(
    State(state): State<Arc<AppState>>,
    Json(update): Json<StatsUpdate>,
) -> Result<Json<StatsReply>, AccountError> {
    let merged = state
        .accounts
        .update_stats(&update.username, &update.password, &update.user_data)
        .await?;

    Ok(Json(StatsReply {
        success: true,
        message: "Statistics updated successfully".into(),
        updated_stats: merged,
    }))
}

pub async fn user_stats(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<UserProfile>, AccountError> {
    Ok(Json(state.accounts.profile(&username)?))
}

pub async fn leaderboard(State(state): State<Arc<AppState>>) -> Json<Leaderboard> {
    Json(state.accounts.leaderboard())
}
