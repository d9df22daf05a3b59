use chrono::Utc;

use crate::{
    dto::jobs::{CreateJobRequest, JobList, UpdateJobRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::JobCard,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_jobs(state: &AppState) -> AppResult<ApiResponse<JobList>> {
    let items = state.store.load::<JobCard>().await?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Job cards", JobList { items }, Some(meta)))
}

pub async fn get_job(state: &AppState, job_id: &str) -> AppResult<ApiResponse<JobCard>> {
    let job = state
        .store
        .find::<JobCard>(job_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Job card", job, None))
}

pub async fn create_job(
    state: &AppState,
    user: &AuthUser,
    payload: CreateJobRequest,
) -> AppResult<ApiResponse<JobCard>> {
    let job_id = payload.job_id.trim();
    let status = payload.status.trim();
    if job_id.is_empty() || status.is_empty() {
        return Err(AppError::bad_request("Job ID and status are required"));
    }

    let job = JobCard {
        job_id: job_id.to_string(),
        status: status.to_string(),
        remarks: payload.remarks.trim().to_string(),
        assigned_to: payload.assigned_to.trim().to_string(),
        created_at: Utc::now(),
    };

    let mut jobs = state.store.lock::<JobCard>().await?;
    if jobs.contains(&job.job_id) {
        return Err(AppError::bad_request(format!(
            "Job card {} already exists",
            job.job_id
        )));
    }
    jobs.items.push(job.clone());
    jobs.commit().await?;

    tracing::info!(user_id = user.user_id, job_id = %job.job_id, "job card created");
    Ok(ApiResponse::success("Job card created", job, Some(Meta::empty())))
}

pub async fn update_job(
    state: &AppState,
    user: &AuthUser,
    job_id: &str,
    payload: UpdateJobRequest,
) -> AppResult<ApiResponse<JobCard>> {
    if let Some(status) = payload.status.as_deref() {
        if status.trim().is_empty() {
            return Err(AppError::bad_request("Status cannot be empty"));
        }
    }

    let mut jobs = state.store.lock::<JobCard>().await?;
    let job = jobs.get_mut(job_id).ok_or(AppError::NotFound)?;
    if let Some(status) = payload.status {
        job.status = status.trim().to_string();
    }
    if let Some(remarks) = payload.remarks {
        job.remarks = remarks.trim().to_string();
    }
    if let Some(assigned_to) = payload.assigned_to {
        job.assigned_to = assigned_to.trim().to_string();
    }
    let job = job.clone();
    jobs.commit().await?;

    tracing::info!(user_id = user.user_id, job_id = %job.job_id, status = %job.status, "job card updated");
    Ok(ApiResponse::success("Updated", job, Some(Meta::empty())))
}

pub async fn delete_job(
    state: &AppState,
    user: &AuthUser,
    job_id: &str,
) -> AppResult<ApiResponse<serde_json::Value>> {
    if !state.store.remove::<JobCard>(job_id).await? {
        return Err(AppError::NotFound);
    }

    tracing::info!(user_id = user.user_id, job_id = %job_id, "job card deleted");
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
