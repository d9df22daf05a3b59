mod common;

use std::sync::Arc;

use async_trait::async_trait;
use workshop_hub::{
    dto::auth::{LoginRequest, RegisterRequest, UpdatePasswordRequest},
    error::AppError,
    face::{FaceError, FaceRecognizer},
    middleware::auth::decode_session,
    services::auth_service,
    state::AppState,
};

// base64 of "fake-image-bytes"
const CAPTURE: &str = "data:image/jpeg;base64,ZmFrZS1pbWFnZS1ieXRlcw==";

/// Enrolls everyone as `person-1` and recognises every face as `identifies_as`.
struct StubFace {
    identifies_as: Option<&'static str>,
    fail_enrollment: bool,
}

#[async_trait]
impl FaceRecognizer for StubFace {
    async fn ensure_person_group(&self) -> Result<(), FaceError> {
        if self.fail_enrollment {
            return Err(FaceError::Api("quota exceeded".into()));
        }
        Ok(())
    }

    async fn detect_face(&self, _image: &[u8]) -> Result<Option<String>, FaceError> {
        Ok(Some("face-1".into()))
    }

    async fn create_person(&self, _name: &str) -> Result<String, FaceError> {
        Ok("person-1".into())
    }

    async fn add_face(&self, _person_id: &str, _image: &[u8]) -> Result<(), FaceError> {
        Ok(())
    }

    async fn train(&self) -> Result<(), FaceError> {
        Ok(())
    }

    async fn identify(&self, _face_id: &str) -> Result<Option<String>, FaceError> {
        Ok(self.identifies_as.map(str::to_string))
    }
}

fn with_stub(state: AppState, identifies_as: Option<&'static str>, fail: bool) -> AppState {
    state.with_face(Arc::new(StubFace {
        identifies_as,
        fail_enrollment: fail,
    }))
}

fn registration(username: &str, face: Option<&str>) -> RegisterRequest {
    RegisterRequest {
        username: username.into(),
        email: format!("{username}@example.com"),
        password: "secret1".into(),
        confirm_password: "secret1".into(),
        face_image_data: face.map(str::to_string),
    }
}

fn login(username: &str, password: Option<&str>, face: Option<&str>) -> LoginRequest {
    LoginRequest {
        username: username.into(),
        password: password.map(str::to_string),
        face_image_data: face.map(str::to_string),
    }
}

#[tokio::test]
async fn password_registration_and_login() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;

    let resp = auth_service::register_user(&state, registration("aisyah", None)).await?;
    let registered = resp.data.expect("registered");
    assert_eq!(registered.user.id, 1);
    assert!(registered.warnings.is_empty());

    let resp = auth_service::login_user(&state, login("AISYAH", Some("secret1"), None)).await?;
    assert_eq!(resp.message, "Welcome back, aisyah!");
    let data = resp.data.expect("login");
    assert!(!data.face_verified);
    assert_eq!(data.warnings.len(), 1);

    let session = decode_session(&data.token, common::TEST_SECRET)?;
    assert_eq!(session.user_id, 1);
    assert_eq!(session.username, "aisyah");
    assert!(!session.face_verified);

    let err = auth_service::login_user(&state, login("aisyah", Some("wrong!"), None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(msg) if msg == "Invalid username or password"));

    let err = auth_service::login_user(&state, login("nobody", Some("secret1"), None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(msg) if msg == "Invalid username or password"));
    Ok(())
}

#[tokio::test]
async fn registration_validation() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;
    auth_service::register_user(&state, registration("aisyah", None)).await?;

    let mut short = registration("bala", None);
    short.password = "abc".into();
    short.confirm_password = "abc".into();
    let err = auth_service::register_user(&state, short).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let mut mismatch = registration("bala", None);
    mismatch.confirm_password = "secret2".into();
    let err = auth_service::register_user(&state, mismatch).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(msg) if msg == "Passwords do not match"));

    let err = auth_service::register_user(&state, registration("Aisyah", None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(msg) if msg == "Username already exists"));

    let err = auth_service::register_user(&state, registration("chen", Some("not-a-data-url")))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    Ok(())
}

#[tokio::test]
async fn face_enrolled_user_logs_in_with_face() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;
    let state = with_stub(state, Some("person-1"), false);

    let registered = auth_service::register_user(&state, registration("devi", Some(CAPTURE)))
        .await?
        .data
        .expect("registered");
    assert!(registered.user.face_enrolled);
    assert!(registered.warnings.is_empty());
    let image = registered.user.face_image.expect("face image");
    assert!(image.ends_with(".jpg"));
    assert!(tokio::fs::metadata(&image).await.is_ok());

    let err = auth_service::login_user(&state, login("devi", Some("secret1"), None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(msg) if msg.starts_with("Face scan required")));

    let data = auth_service::login_user(&state, login("devi", None, Some(CAPTURE)))
        .await?
        .data
        .expect("login");
    assert!(data.face_verified);
    assert!(decode_session(&data.token, common::TEST_SECRET)?.face_verified);
    Ok(())
}

#[tokio::test]
async fn unrecognised_face_falls_back_to_password() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;
    let state = with_stub(state, Some("someone-else"), false);
    auth_service::register_user(&state, registration("devi", Some(CAPTURE))).await?;

    let data = auth_service::login_user(&state, login("devi", Some("secret1"), Some(CAPTURE)))
        .await?
        .data
        .expect("login");
    assert!(!data.face_verified);

    let err = auth_service::login_user(&state, login("devi", None, Some(CAPTURE)))
        .await
        .unwrap_err();
    assert!(
        matches!(err, AppError::BadRequest(msg) if msg == "Face not recognized. Please use your password.")
    );
    Ok(())
}

#[tokio::test]
async fn failed_enrollment_degrades_to_password_account() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;
    let state = with_stub(state, None, true);

    let registered = auth_service::register_user(&state, registration("eng", Some(CAPTURE)))
        .await?
        .data
        .expect("registered");
    assert!(!registered.user.face_enrolled);
    assert!(registered.user.face_image.is_some());
    assert_eq!(registered.warnings.len(), 1);
    assert!(registered.warnings[0].contains("Person group not available"));

    let err = auth_service::login_user(&state, login("eng", None, None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(msg) if msg.starts_with("Face login is not enrolled")));

    let data = auth_service::login_user(&state, login("eng", Some("secret1"), None))
        .await?
        .data
        .expect("login");
    assert!(!data.face_verified);
    Ok(())
}

#[tokio::test]
async fn registration_without_provider_warns() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;
    let registered = auth_service::register_user(&state, registration("fatimah", Some(CAPTURE)))
        .await?
        .data
        .expect("registered");
    assert!(!registered.user.face_enrolled);
    assert_eq!(registered.warnings.len(), 1);
    Ok(())
}

#[tokio::test]
async fn password_change_requires_current_password() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;
    auth_service::register_user(&state, registration("gopal", None)).await?;
    let session = decode_session(
        &auth_service::login_user(&state, login("gopal", Some("secret1"), None))
            .await?
            .data
            .expect("login")
            .token,
        common::TEST_SECRET,
    )?;

    let err = auth_service::update_password(
        &state,
        &session,
        UpdatePasswordRequest {
            current_password: "wrong1".into(),
            new_password: "newpass".into(),
            confirm_password: "newpass".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(msg) if msg == "Current password is incorrect"));

    auth_service::update_password(
        &state,
        &session,
        UpdatePasswordRequest {
            current_password: "secret1".into(),
            new_password: "newpass".into(),
            confirm_password: "newpass".into(),
        },
    )
    .await?;
    auth_service::login_user(&state, login("gopal", Some("newpass"), None)).await?;
    Ok(())
}
