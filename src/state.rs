use std::sync::Arc;

use crate::{
    config::AppConfig,
    face::{FaceApiClient, FaceRecognizer},
    reference::SupportReference,
    store::JsonStore,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<JsonStore>,
    pub config: Arc<AppConfig>,
    /// `None` when no face service is configured.
    pub face: Option<Arc<dyn FaceRecognizer>>,
    pub support: Arc<SupportReference>,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let store = JsonStore::open(&config.data_dir).await?;
        tokio::fs::create_dir_all(&config.upload_dir).await?;
        let support = SupportReference::load(store.dir()).await;

        let face: Option<Arc<dyn FaceRecognizer>> = match config.face_api.clone() {
            Some(face_config) => Some(Arc::new(FaceApiClient::new(face_config)?)),
            None => {
                tracing::warn!("face service not configured, face login disabled");
                None
            }
        };

        Ok(Self {
            store: Arc::new(store),
            config: Arc::new(config),
            face,
            support: Arc::new(support),
        })
    }

    pub fn with_face(mut self, face: Arc<dyn FaceRecognizer>) -> Self {
        self.face = Some(face);
        self
    }
}
