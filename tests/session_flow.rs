mod common;

use axum::{
    Json,
    extract::{FromRequestParts, State},
    http::{Request, header, request::Parts},
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use workshop_hub::{
    config::AppConfig,
    dto::auth::{LoginRequest, RegisterRequest},
    error::AppError,
    middleware::auth::AuthUser,
    models::User,
    routes,
    services::auth_service,
    state::AppState,
};

fn parts(headers: &[(header::HeaderName, &str)]) -> anyhow::Result<Parts> {
    let mut builder = Request::builder().uri("/api/auth/profile");
    for (name, value) in headers {
        builder = builder.header(name, *value);
    }
    Ok(builder.body(())?.into_parts().0)
}

async fn extract(
    state: &AppState,
    headers: &[(header::HeaderName, &str)],
) -> Result<AuthUser, AppError> {
    let mut parts = parts(headers).map_err(AppError::Internal)?;
    AuthUser::from_request_parts(&mut parts, state).await
}

async fn register(state: &AppState, username: &str) -> anyhow::Result<()> {
    auth_service::register_user(
        state,
        RegisterRequest {
            username: username.into(),
            email: format!("{username}@example.com"),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
            face_image_data: None,
        },
    )
    .await?;
    Ok(())
}

fn login(username: &str) -> LoginRequest {
    LoginRequest {
        username: username.into(),
        password: Some("secret1".into()),
        face_image_data: None,
    }
}

async fn token(state: &AppState, username: &str) -> anyhow::Result<String> {
    let data = auth_service::login_user(state, login(username))
        .await?
        .data
        .expect("login");
    Ok(data.token)
}

#[tokio::test]
async fn bearer_token_wins_over_cookie() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;
    register(&state, "aisyah").await?;
    register(&state, "bala").await?;
    let bearer = token(&state, "aisyah").await?;
    let cookie = format!("session={}", token(&state, "bala").await?);

    let bearer = format!("Bearer {bearer}");
    let user = extract(
        &state,
        &[
            (header::AUTHORIZATION, bearer.as_str()),
            (header::COOKIE, cookie.as_str()),
        ],
    )
    .await?;
    assert_eq!(user.username, "aisyah");
    assert_eq!(user.user_id, 1);
    Ok(())
}

#[tokio::test]
async fn session_cookie_alone_authenticates() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;
    register(&state, "bala").await?;
    let cookie = format!("theme=dark; session={}", token(&state, "bala").await?);

    let user = extract(&state, &[(header::COOKIE, cookie.as_str())]).await?;
    assert_eq!(user.username, "bala");

    let quoted = format!("session=\"{}\"", token(&state, "bala").await?);
    let user = extract(&state, &[(header::COOKIE, quoted.as_str())]).await?;
    assert_eq!(user.username, "bala");
    Ok(())
}

#[tokio::test]
async fn missing_or_malformed_credentials_are_unauthorized() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;

    let err = extract(&state, &[]).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(msg) if msg == "Please login first"));

    let err = extract(&state, &[(header::COOKIE, "theme=dark; session=")])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(msg) if msg == "Please login first"));

    let err = extract(&state, &[(header::AUTHORIZATION, "Basic YWRtaW46YWRtaW4=")])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(msg) if msg == "Invalid Authorization scheme"));

    let err = extract(&state, &[(header::AUTHORIZATION, "Bearer not-a-token")])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(msg) if msg == "Invalid or expired session"));
    Ok(())
}

#[tokio::test]
async fn expired_session_is_rejected() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;
    register(&state, "chen").await?;
    let user = state.store.find::<User>("chen").await?.expect("user");

    let expired_config = AppConfig {
        session_ttl_hours: -2,
        ..(*state.config).clone()
    };
    let expired = auth_service::issue_session(&expired_config, &user, false)?;

    let bearer = format!("Bearer {expired}");
    let err = extract(&state, &[(header::AUTHORIZATION, bearer.as_str())])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(msg) if msg == "Invalid or expired session"));

    let cookie = format!("session={expired}");
    let err = extract(&state, &[(header::COOKIE, cookie.as_str())])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
    Ok(())
}

#[tokio::test]
async fn login_sets_and_logout_clears_the_session_cookie() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;
    register(&state, "devi").await?;

    let response =
        routes::auth::login(State(state.clone()), CookieJar::default(), Json(login("devi")))
            .await?
            .into_response();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("set-cookie")
        .to_str()?
        .to_string();
    assert!(set_cookie.starts_with("session="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Path=/"));
    assert!(set_cookie.contains("Max-Age=86400"));

    // the issued cookie authenticates on its own
    let pair = set_cookie.split(';').next().unwrap_or_default();
    let user = extract(&state, &[(header::COOKIE, pair)]).await?;
    assert_eq!(user.username, "devi");

    let request = parts(&[(header::COOKIE, pair)])?;
    let jar = CookieJar::from_headers(&request.headers);
    let response = routes::auth::logout(jar).await.into_response();
    let cleared = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("set-cookie")
        .to_str()?;
    assert!(cleared.starts_with("session=;"));
    assert!(cleared.contains("Max-Age=0"));
    Ok(())
}
