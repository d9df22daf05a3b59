#![allow(dead_code)]

use tempfile::TempDir;
use workshop_hub::{
    config::AppConfig,
    middleware::auth::AuthUser,
    models::Role,
    state::AppState,
};

pub const TEST_SECRET: &str = "test-session-secret";

/// State backed by a throwaway data directory; keep the `TempDir` alive for the test.
pub async fn setup_state() -> anyhow::Result<(TempDir, AppState)> {
    let dir = tempfile::tempdir()?;
    let config = AppConfig {
        data_dir: dir.path().join("data"),
        upload_dir: dir.path().join("uploads"),
        host: "127.0.0.1".into(),
        port: 0,
        session_secret: TEST_SECRET.into(),
        session_ttl_hours: 24,
        delivery_fee: 5.0,
        face_registration_required: false,
        face_api: None,
    };
    let state = AppState::new(config).await?;
    Ok((dir, state))
}

pub fn user(user_id: u64) -> AuthUser {
    AuthUser {
        user_id,
        username: format!("user{user_id}"),
        role: Role::User,
        face_verified: false,
    }
}

pub fn admin() -> AuthUser {
    AuthUser {
        user_id: 1,
        username: "admin".into(),
        role: Role::Admin,
        face_verified: false,
    }
}
