use std::{env, path::PathBuf};

#[derive(Debug, Clone)]
pub struct FaceApiConfig {
    pub endpoint: String,
    pub key: String,
    pub person_group: String,
    pub recognition_model: String,
    pub detection_model: String,
}

impl FaceApiConfig {
    /// Returns `None` unless both endpoint and key are set.
    pub fn from_env() -> Option<Self> {
        let endpoint = env::var("FACE_API_ENDPOINT")
            .unwrap_or_default()
            .trim_end_matches('/')
            .to_string();
        let key = env::var("FACE_API_KEY").unwrap_or_default();
        if endpoint.is_empty() || key.is_empty() {
            return None;
        }
        Some(Self {
            endpoint,
            key,
            person_group: env::var("FACE_API_PERSON_GROUP")
                .unwrap_or_else(|_| "wdp-users".to_string()),
            recognition_model: env::var("FACE_API_RECOGNITION_MODEL")
                .unwrap_or_else(|_| "recognition_03".to_string()),
            detection_model: env::var("FACE_API_DETECTION_MODEL")
                .unwrap_or_else(|_| "detection_03".to_string()),
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub upload_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub session_secret: String,
    pub session_ttl_hours: i64,
    pub delivery_fee: f64,
    pub face_registration_required: bool,
    pub face_api: Option<FaceApiConfig>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let session_secret = env::var("SESSION_SECRET")?;
        let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());
        let upload_dir =
            env::var("UPLOAD_DIR").unwrap_or_else(|_| "static/uploads/faces".to_string());
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let session_ttl_hours = env::var("SESSION_TTL_HOURS")
            .ok()
            .and_then(|h| h.parse::<i64>().ok())
            .filter(|h| *h > 0)
            .unwrap_or(24);
        let delivery_fee = env::var("DELIVERY_FEE")
            .ok()
            .and_then(|f| f.parse::<f64>().ok())
            .filter(|f| f.is_finite() && *f >= 0.0)
            .unwrap_or(5.0);
        let face_registration_required = env::var("FACE_REGISTRATION_REQUIRED")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            data_dir: data_dir.into(),
            upload_dir: upload_dir.into(),
            host,
            port,
            session_secret,
            session_ttl_hours,
            delivery_fee,
            face_registration_required,
            face_api: FaceApiConfig::from_env(),
        })
    }
}
