use std::path::Path;

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    domain::capture::{FaceCapture, decode_data_url},
    dto::auth::{
        Claims, LoginRequest, LoginResponse, ProfileResponse, RegisterRequest, RegisterResponse,
        UpdateFaceRequest, UpdatePasswordRequest,
    },
    error::{AppError, AppResult},
    face::{self, FaceRecognizer},
    middleware::auth::AuthUser,
    models::{Role, User, UserProfile},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const MIN_PASSWORD_LEN: usize = 6;

const NO_CLEAR_FACE: &str = "No clear face detected. Please capture again.";
const INVALID_CREDENTIALS: &str = "Invalid username or password";

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password_hash: &str, password: &str) -> bool {
    let parsed_hash = match PasswordHash::new(password_hash) {
        Ok(hash) => hash,
        Err(err) => {
            tracing::warn!(error = %err, "stored password hash unreadable");
            return false;
        }
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

pub fn issue_session(config: &AppConfig, user: &User, face_verified: bool) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(config.session_ttl_hours))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user.id.to_string(),
        username: user.username.clone(),
        role: user.role,
        face_verified,
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.session_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Keeps only characters that are safe in a file name.
fn safe_file_stem(username: &str) -> String {
    let stem: String = username
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .collect();
    if stem.is_empty() { "user".to_string() } else { stem }
}

/// Writes a capture to the upload directory; `None` when the write fails.
async fn save_face_image(dir: &Path, username: &str, capture: &FaceCapture) -> Option<String> {
    let file_name = format!(
        "{}_{}.{}",
        safe_file_stem(username),
        Uuid::new_v4().simple(),
        capture.extension
    );
    let path = dir.join(file_name);
    if let Err(err) = tokio::fs::create_dir_all(dir).await {
        tracing::warn!(dir = %dir.display(), error = %err, "upload directory unavailable");
        return None;
    }
    match tokio::fs::write(&path, &capture.bytes).await {
        Ok(()) => Some(path.to_string_lossy().replace('\\', "/")),
        Err(err) => {
            tracing::warn!(file = %path.display(), error = %err, "face image not saved");
            None
        }
    }
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<RegisterResponse>> {
    let username = payload.username.trim();
    let email = payload.email.trim();
    let password = payload.password.trim();
    let confirm_password = payload.confirm_password.trim();
    let face_data = payload
        .face_image_data
        .as_deref()
        .map(str::trim)
        .filter(|data| !data.is_empty());

    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AppError::bad_request("Please fill in all fields"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::bad_request(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if password != confirm_password {
        return Err(AppError::bad_request("Passwords do not match"));
    }

    check_unique(&state.store.load::<User>().await?, username, email)?;

    if face_data.is_none() && state.config.face_registration_required {
        return Err(AppError::bad_request("Face scan is required to register"));
    }

    let mut warnings = Vec::new();
    let mut face_image = None;
    let mut person_id = None;

    if let Some(data) = face_data {
        let capture = decode_data_url(data).ok_or_else(|| AppError::bad_request(NO_CLEAR_FACE))?;
        let path = save_face_image(&state.config.upload_dir, username, &capture)
            .await
            .ok_or_else(|| AppError::bad_request("Face scan failed. Please try again."))?;
        face_image = Some(path);

        match state.face.as_deref() {
            Some(recognizer) => match face::enroll(recognizer, username, &capture.bytes).await {
                Ok(id) => person_id = Some(id),
                Err(err) => {
                    tracing::warn!(username = %username, error = %err, "face enrollment failed");
                    warnings.push(format!("Face service enrollment failed: {err}"));
                }
            },
            None => warnings
                .push("Face service not configured. Face login will be unavailable.".to_string()),
        }
    }

    let password_hash = hash_password(password)?;

    let user = state
        .store
        .update(|users: &mut Vec<User>| {
            // enrollment may have taken a while; re-check under the lock
            check_unique(users, username, email)?;
            let user = User {
                id: users.iter().map(|u| u.id).max().unwrap_or(0) + 1,
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
                role: Role::User,
                face_image,
                person_id,
                created_at: Utc::now(),
            };
            users.push(user.clone());
            Ok(user)
        })
        .await?;

    tracing::info!(user_id = user.id, face_enrolled = user.person_id.is_some(), "user registered");

    Ok(ApiResponse::success(
        "Registration successful! Please login",
        RegisterResponse {
            user: UserProfile::from(&user),
            warnings,
        },
        Some(Meta::empty()),
    ))
}

fn check_unique(users: &[User], username: &str, email: &str) -> AppResult<()> {
    if users.iter().any(|u| same_name(&u.username, username)) {
        return Err(AppError::bad_request("Username already exists"));
    }
    if users.iter().any(|u| same_name(&u.email, email)) {
        return Err(AppError::bad_request("Email already registered"));
    }
    Ok(())
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let username = payload.username.trim();
    let password = payload.password.as_deref().map(str::trim).unwrap_or_default();
    let face_data = payload
        .face_image_data
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();

    if username.is_empty() {
        return Err(AppError::bad_request("Please enter your username"));
    }

    let user = state
        .store
        .load::<User>()
        .await?
        .into_iter()
        .find(|u| same_name(&u.username, username))
        .ok_or_else(|| AppError::bad_request(INVALID_CREDENTIALS))?;

    let recognizer: Option<&dyn FaceRecognizer> = state.face.as_deref();
    let has_face_image = user.face_image.is_some();
    let face_required = has_face_image && user.person_id.is_some() && recognizer.is_some();

    if recognizer.is_some() && has_face_image && user.person_id.is_none() && password.is_empty() {
        return Err(AppError::bad_request(
            "Face login is not enrolled yet. Update your face in profile or use your password.",
        ));
    }
    if face_required && face_data.is_empty() {
        return Err(AppError::bad_request(
            "Face scan required. Please capture your face to continue.",
        ));
    }

    let mut face_match = false;
    if let (Some(recognizer), Some(person_id)) = (recognizer, user.person_id.as_deref()) {
        if !face_data.is_empty() {
            let capture =
                decode_data_url(face_data).ok_or_else(|| AppError::bad_request(NO_CLEAR_FACE))?;
            let outcome = face::identify_capture(recognizer, &capture.bytes)
                .await
                .ok_or_else(|| AppError::bad_request(NO_CLEAR_FACE))?;
            face_match = outcome.person_id.as_deref() == Some(person_id);
        }
    }

    let mut warnings = Vec::new();
    let face_verified = if face_match {
        true
    } else if !password.is_empty() && verify_password(&user.password_hash, password) {
        if !has_face_image {
            warnings.push(
                "No face scan enrolled. Please register with a face scan next time.".to_string(),
            );
        }
        false
    } else if face_required {
        return Err(AppError::bad_request(
            "Face not recognized. Please use your password.",
        ));
    } else {
        return Err(AppError::bad_request(INVALID_CREDENTIALS));
    };

    let token = issue_session(&state.config, &user, face_verified)?;
    tracing::info!(user_id = user.id, face_verified, "user login");

    Ok(ApiResponse::success(
        format!("Welcome back, {}!", user.username),
        LoginResponse {
            token,
            user: UserProfile::from(&user),
            face_verified,
            warnings,
        },
        Some(Meta::empty()),
    ))
}

async fn current_user(state: &AppState, auth: &AuthUser) -> AppResult<User> {
    state
        .store
        .load::<User>()
        .await?
        .into_iter()
        .find(|u| u.id == auth.user_id)
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))
}

pub async fn profile(state: &AppState, auth: &AuthUser) -> AppResult<ApiResponse<UserProfile>> {
    let user = current_user(state, auth).await?;
    Ok(ApiResponse::success("Profile", UserProfile::from(&user), None))
}

pub async fn update_password(
    state: &AppState,
    auth: &AuthUser,
    payload: UpdatePasswordRequest,
) -> AppResult<ApiResponse<UserProfile>> {
    let current_password = payload.current_password.trim();
    let new_password = payload.new_password.trim();
    let confirm_password = payload.confirm_password.trim();

    if current_password.is_empty() || new_password.is_empty() || confirm_password.is_empty() {
        return Err(AppError::bad_request("Please fill in all password fields"));
    }
    if new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::bad_request(format!(
            "New password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if new_password != confirm_password {
        return Err(AppError::bad_request("New passwords do not match"));
    }

    let new_hash = hash_password(new_password)?;
    let user = state
        .store
        .update(|users: &mut Vec<User>| {
            let user = users
                .iter_mut()
                .find(|u| u.id == auth.user_id)
                .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;
            if !verify_password(&user.password_hash, current_password) {
                return Err(AppError::bad_request("Current password is incorrect"));
            }
            user.password_hash = new_hash;
            Ok(user.clone())
        })
        .await?;

    tracing::info!(user_id = user.id, "password updated");
    Ok(ApiResponse::success(
        "Password updated successfully.",
        UserProfile::from(&user),
        Some(Meta::empty()),
    ))
}

pub async fn update_face(
    state: &AppState,
    auth: &AuthUser,
    payload: UpdateFaceRequest,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let data = payload.face_image_data.trim();
    if data.is_empty() {
        return Err(AppError::bad_request(
            "Face scan is required to update your face.",
        ));
    }
    let capture = decode_data_url(data).ok_or_else(|| AppError::bad_request(NO_CLEAR_FACE))?;

    let user = current_user(state, auth).await?;
    let path = save_face_image(&state.config.upload_dir, &user.username, &capture)
        .await
        .ok_or_else(|| AppError::bad_request("Face scan failed. Please try again."))?;

    let mut warnings = Vec::new();
    let (message, person_id) = match state.face.as_deref() {
        Some(recognizer) => {
            let enrolled = match user.person_id.clone() {
                Some(person_id) => face::add_face_and_train(recognizer, &person_id, &capture.bytes)
                    .await
                    .map(|_| person_id),
                None => face::enroll(recognizer, &user.username, &capture.bytes).await,
            };
            let person_id = enrolled.map_err(|err| {
                tracing::warn!(user_id = user.id, error = %err, "face update failed");
                AppError::bad_request(format!("Face service enrollment failed: {err}"))
            })?;
            ("Face scan updated successfully.", Some(person_id))
        }
        None => {
            warnings.push("Face scan saved, but face service is not configured.".to_string());
            ("Face scan saved.", user.person_id.clone())
        }
    };

    let user = state
        .store
        .update(|users: &mut Vec<User>| {
            let user = users
                .iter_mut()
                .find(|u| u.id == auth.user_id)
                .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;
            user.face_image = Some(path);
            user.person_id = person_id;
            Ok(user.clone())
        })
        .await?;

    tracing::info!(user_id = user.id, face_enrolled = user.person_id.is_some(), "face updated");
    Ok(ApiResponse::success(
        message,
        ProfileResponse {
            user: UserProfile::from(&user),
            warnings,
        },
        Some(Meta::empty()),
    ))
}
