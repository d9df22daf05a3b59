use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::jobs::{CreateJobRequest, JobList, UpdateJobRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::JobCard,
    response::ApiResponse,
    services::job_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_jobs).post(create_job))
        .route("/{job_id}", get(get_job).put(update_job).delete(delete_job))
}

#[utoipa::path(
    get,
    path = "/api/jobs",
    responses(
        (status = 200, description = "All job cards", body = ApiResponse<JobList>),
        (status = 401, description = "Not logged in")
    ),
    security(("bearer_auth" = [])),
    tag = "Jobs"
)]
pub async fn list_jobs(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<ApiResponse<JobList>>> {
    let resp = job_service::list_jobs(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{job_id}",
    params(("job_id" = String, Path, description = "Job card ID")),
    responses(
        (status = 200, description = "Job card", body = ApiResponse<JobCard>),
        (status = 404, description = "Job card not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Jobs"
)]
pub async fn get_job(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(job_id): Path<String>,
) -> AppResult<Json<ApiResponse<JobCard>>> {
    let resp = job_service::get_job(&state, &job_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = CreateJobRequest,
    responses(
        (status = 201, description = "Job card created", body = ApiResponse<JobCard>),
        (status = 400, description = "Missing fields or duplicate id")
    ),
    security(("bearer_auth" = [])),
    tag = "Jobs"
)]
pub async fn create_job(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateJobRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<JobCard>>)> {
    let resp = job_service::create_job(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/jobs/{job_id}",
    params(("job_id" = String, Path, description = "Job card ID")),
    request_body = UpdateJobRequest,
    responses(
        (status = 200, description = "Job card updated", body = ApiResponse<JobCard>),
        (status = 404, description = "Job card not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Jobs"
)]
pub async fn update_job(
    State(state): State<AppState>,
    user: AuthUser,
    Path(job_id): Path<String>,
    Json(payload): Json<UpdateJobRequest>,
) -> AppResult<Json<ApiResponse<JobCard>>> {
    let resp = job_service::update_job(&state, &user, &job_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{job_id}",
    params(("job_id" = String, Path, description = "Job card ID")),
    responses(
        (status = 200, description = "Job card deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Job card not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Jobs"
)]
pub async fn delete_job(
    State(state): State<AppState>,
    user: AuthUser,
    Path(job_id): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = job_service::delete_job(&state, &user, &job_id).await?;
    Ok(Json(resp))
}
