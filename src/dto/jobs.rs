use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::JobCard;

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateJobRequest {
    pub job_id: String,
    pub status: String,
    pub remarks: String,
    pub assigned_to: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateJobRequest {
    pub status: Option<String>,
    pub remarks: Option<String>,
    pub assigned_to: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct JobList {
    #[schema(value_type = Vec<JobCard>)]
    pub items: Vec<JobCard>,
}
