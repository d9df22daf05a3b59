use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::{
    dto::auth::{
        LoginRequest, LoginResponse, ProfileResponse, RegisterRequest, RegisterResponse,
        UpdateFaceRequest, UpdatePasswordRequest,
    },
    error::AppResult,
    middleware::auth::{AuthUser, SESSION_COOKIE},
    models::UserProfile,
    response::{ApiResponse, Meta},
    services::auth_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/profile", get(profile))
        .route("/profile/password", put(update_password))
        .route("/profile/face", put(update_face))
}

fn session_cookie(token: String, ttl_hours: i64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::hours(ttl_hours))
        .build()
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Register user", body = ApiResponse<RegisterResponse>),
        (status = 400, description = "Validation failed")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<RegisterResponse>>)> {
    let resp = auth_service::register_user(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login user, also sets the session cookie", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid credentials or face not recognized")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<ApiResponse<LoginResponse>>)> {
    let resp = auth_service::login_user(&state, payload).await?;
    let jar = match resp.data.as_ref() {
        Some(data) => jar.add(session_cookie(
            data.token.clone(),
            state.config.session_ttl_hours,
        )),
        None => jar,
    };
    Ok((jar, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Clears the session cookie", body = ApiResponse<serde_json::Value>)
    ),
    tag = "Auth"
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<ApiResponse<serde_json::Value>>) {
    let body = ApiResponse::success(
        "You have been logged out",
        serde_json::json!({}),
        Some(Meta::empty()),
    );
    (
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        Json(body),
    )
}

#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserProfile>),
        (status = 401, description = "Not logged in")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<UserProfile>>> {
    let resp = auth_service::profile(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/auth/profile/password",
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = ApiResponse<UserProfile>),
        (status = 400, description = "Validation failed")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn update_password(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdatePasswordRequest>,
) -> AppResult<Json<ApiResponse<UserProfile>>> {
    let resp = auth_service::update_password(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/auth/profile/face",
    request_body = UpdateFaceRequest,
    responses(
        (status = 200, description = "Face capture stored and enrolled", body = ApiResponse<ProfileResponse>),
        (status = 400, description = "Invalid capture or enrollment failed")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn update_face(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateFaceRequest>,
) -> AppResult<Json<ApiResponse<ProfileResponse>>> {
    let resp = auth_service::update_face(&state, &user, payload).await?;
    Ok(Json(resp))
}
