//! External face-recognition provider.
//!
//! The HTTP client speaks the Face API v1.0 person-group protocol. Every call is independently
//! fallible and bounded by a short timeout; callers decide how to degrade.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode, header::CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::config::FaceApiConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const IDENTIFY_CONFIDENCE: f64 = 0.65;
const PERSON_GROUP_NAME: &str = "WDP Users";

#[derive(Debug, Error)]
pub enum FaceError {
    #[error("face service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Api(String),
}

#[async_trait]
pub trait FaceRecognizer: Send + Sync {
    /// Creates the person group when it does not exist yet.
    async fn ensure_person_group(&self) -> Result<(), FaceError>;

    /// Face id of the first face detected in the image, if any.
    async fn detect_face(&self, image: &[u8]) -> Result<Option<String>, FaceError>;

    async fn create_person(&self, name: &str) -> Result<String, FaceError>;

    async fn add_face(&self, person_id: &str, image: &[u8]) -> Result<(), FaceError>;

    async fn train(&self) -> Result<(), FaceError>;

    /// Best candidate person for a detected face, if one clears the confidence threshold.
    async fn identify(&self, face_id: &str) -> Result<Option<String>, FaceError>;
}

/// Enrolls a new person with one face and retrains the group.
/// A failed training run is logged, not returned.
pub async fn enroll(
    face: &dyn FaceRecognizer,
    name: &str,
    image: &[u8],
) -> Result<String, FaceError> {
    face.ensure_person_group()
        .await
        .map_err(|e| FaceError::Api(format!("Person group not available: {e}")))?;
    let person_id = face.create_person(name).await?;
    add_face_and_train(face, &person_id, image).await?;
    Ok(person_id)
}

pub async fn add_face_and_train(
    face: &dyn FaceRecognizer,
    person_id: &str,
    image: &[u8],
) -> Result<(), FaceError> {
    face.add_face(person_id, image).await?;
    if let Err(err) = face.train().await {
        tracing::warn!(error = %err, "person group training failed");
    }
    Ok(())
}

/// Runs detection then identification. No detected face, or a failed detection call, gives
/// `None`; a failed identification call gives an outcome with no person.
pub async fn identify_capture(face: &dyn FaceRecognizer, image: &[u8]) -> Option<IdentifyOutcome> {
    let face_id = match face.detect_face(image).await {
        Ok(Some(id)) => id,
        Ok(None) => return None,
        Err(err) => {
            tracing::warn!(error = %err, "face detection failed");
            return None;
        }
    };
    match face.identify(&face_id).await {
        Ok(person) => Some(IdentifyOutcome { person_id: person }),
        Err(err) => {
            tracing::warn!(error = %err, "face identification failed");
            Some(IdentifyOutcome { person_id: None })
        }
    }
}

/// A face was detected; `person_id` is the identified person, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifyOutcome {
    pub person_id: Option<String>,
}

pub struct FaceApiClient {
    http: reqwest::Client,
    config: FaceApiConfig,
}

impl FaceApiClient {
    pub fn new(config: FaceApiConfig) -> Result<Self, FaceError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { http, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/face/v1.0/{}", self.config.endpoint, path)
    }

    fn group_url(&self, suffix: &str) -> String {
        self.url(&format!("persongroups/{}{}", self.config.person_group, suffix))
    }

    fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.http
            .post(url)
            .header("Ocp-Apim-Subscription-Key", &self.config.key)
    }
}

#[derive(Deserialize)]
struct DetectedFace {
    #[serde(rename = "faceId")]
    face_id: Option<String>,
}

#[derive(Deserialize)]
struct CreatedPerson {
    #[serde(rename = "personId")]
    person_id: Option<String>,
}

#[derive(Deserialize)]
struct IdentifyResult {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(rename = "personId")]
    person_id: Option<String>,
}

/// Prefers the service's `error.message`, then the raw body, then the status.
async fn api_error(response: Response) -> FaceError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
    FaceError::Api(message)
}

#[async_trait]
impl FaceRecognizer for FaceApiClient {
    async fn ensure_person_group(&self) -> Result<(), FaceError> {
        let url = self.group_url("");
        let response = self
            .http
            .get(&url)
            .header("Ocp-Apim-Subscription-Key", &self.config.key)
            .send()
            .await?;
        if response.status().is_success() {
            return Ok(());
        }
        if response.status() != StatusCode::NOT_FOUND {
            return Err(api_error(response).await);
        }

        let create = self
            .http
            .put(&url)
            .header("Ocp-Apim-Subscription-Key", &self.config.key)
            .json(&json!({
                "name": PERSON_GROUP_NAME,
                "recognitionModel": self.config.recognition_model,
            }))
            .send()
            .await?;
        if create.status().is_success() {
            tracing::info!(group = %self.config.person_group, "person group created");
            return Ok(());
        }

        // Some deployments reject recognitionModel on creation.
        let fallback = self
            .http
            .put(&url)
            .header("Ocp-Apim-Subscription-Key", &self.config.key)
            .json(&json!({ "name": PERSON_GROUP_NAME }))
            .send()
            .await?;
        if fallback.status().is_success() {
            tracing::info!(group = %self.config.person_group, "person group created without recognition model");
            return Ok(());
        }
        Err(api_error(fallback).await)
    }

    async fn detect_face(&self, image: &[u8]) -> Result<Option<String>, FaceError> {
        let response = self
            .post(&self.url("detect"))
            .query(&[
                ("returnFaceId", "true"),
                ("recognitionModel", self.config.recognition_model.as_str()),
                ("detectionModel", self.config.detection_model.as_str()),
            ])
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        let faces: Vec<DetectedFace> = response.json().await?;
        Ok(faces.into_iter().next().and_then(|face| face.face_id))
    }

    async fn create_person(&self, name: &str) -> Result<String, FaceError> {
        let response = self
            .post(&self.group_url("/persons"))
            .json(&json!({ "name": name }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        let person: CreatedPerson = response.json().await?;
        person
            .person_id
            .ok_or_else(|| FaceError::Api("person id missing from response".to_string()))
    }

    async fn add_face(&self, person_id: &str, image: &[u8]) -> Result<(), FaceError> {
        let response = self
            .post(&self.group_url(&format!("/persons/{person_id}/persistedFaces")))
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(())
    }

    async fn train(&self) -> Result<(), FaceError> {
        let response = self.post(&self.group_url("/train")).send().await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(())
    }

    async fn identify(&self, face_id: &str) -> Result<Option<String>, FaceError> {
        let response = self
            .post(&self.url("identify"))
            .json(&json!({
                "personGroupId": self.config.person_group,
                "faceIds": [face_id],
                "maxNumOfCandidatesReturned": 1,
                "confidenceThreshold": IDENTIFY_CONFIDENCE,
            }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        let results: Vec<IdentifyResult> = response.json().await?;
        Ok(results
            .into_iter()
            .next()
            .and_then(|result| result.candidates.into_iter().next())
            .and_then(|candidate| candidate.person_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Detection answers with `detected`; identification fails unless `identified` is set.
    struct Scripted {
        detected: Result<Option<&'static str>, &'static str>,
        identified: Option<&'static str>,
    }

    #[async_trait]
    impl FaceRecognizer for Scripted {
        async fn ensure_person_group(&self) -> Result<(), FaceError> {
            Ok(())
        }

        async fn detect_face(&self, _image: &[u8]) -> Result<Option<String>, FaceError> {
            self.detected
                .map(|id| id.map(str::to_string))
                .map_err(|msg| FaceError::Api(msg.into()))
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
            match self.identified {
                Some(person) => Ok(Some(person.into())),
                None => Err(FaceError::Api("identify unavailable".into())),
            }
        }
    }

    #[tokio::test]
    async fn detection_failure_reads_as_no_face() {
        let face = Scripted {
            detected: Err("detect unavailable"),
            identified: Some("person-1"),
        };
        assert_eq!(identify_capture(&face, b"img").await, None);

        let face = Scripted {
            detected: Ok(None),
            identified: Some("person-1"),
        };
        assert_eq!(identify_capture(&face, b"img").await, None);
    }

    #[tokio::test]
    async fn identification_failure_reads_as_unknown_person() {
        let face = Scripted {
            detected: Ok(Some("face-1")),
            identified: None,
        };
        assert_eq!(
            identify_capture(&face, b"img").await,
            Some(IdentifyOutcome { person_id: None })
        );

        let face = Scripted {
            detected: Ok(Some("face-1")),
            identified: Some("person-1"),
        };
        assert_eq!(
            identify_capture(&face, b"img").await,
            Some(IdentifyOutcome {
                person_id: Some("person-1".into())
            })
        );
    }
}
