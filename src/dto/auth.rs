use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Role, UserProfile};

#[derive(Deserialize, Debug, Default, ToSchema)]
#[serde(default)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    /// `data:image/...;base64,...` capture from the browser camera.
    pub face_image_data: Option<String>,
}

#[derive(Deserialize, Debug, Default, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: Option<String>,
    pub face_image_data: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub user: UserProfile,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
    pub face_verified: bool,
    pub warnings: Vec<String>,
}

#[derive(Deserialize, Debug, Default, ToSchema)]
#[serde(default)]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Deserialize, Debug, Default, ToSchema)]
#[serde(default)]
pub struct UpdateFaceRequest {
    pub face_image_data: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub user: UserProfile,
    pub warnings: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub role: Role,
    pub face_verified: bool,
    pub exp: usize,
}
