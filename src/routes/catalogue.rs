use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};

use crate::{
    domain::catalogue::CatalogueView,
    dto::catalogue::{CreateCatalogueItemRequest, ImportSummary, UpdateCatalogueItemRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::CatalogueItem,
    response::ApiResponse,
    routes::params::CatalogueQuery,
    services::catalogue_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(query_catalogue).post(create_item))
        .route("/export", get(export_catalogue))
        .route("/import", post(import_catalogue))
        .route(
            "/{part_id}",
            get(get_item).put(update_item).delete(delete_item),
        )
}

#[utoipa::path(
    get,
    path = "/api/catalogue",
    params(CatalogueQuery),
    responses(
        (status = 200, description = "Filtered parts with analytics and recommendations", body = ApiResponse<CatalogueView>)
    ),
    tag = "Catalogue"
)]
pub async fn query_catalogue(
    State(state): State<AppState>,
    Query(query): Query<CatalogueQuery>,
) -> AppResult<Json<ApiResponse<CatalogueView>>> {
    let resp = catalogue_service::query_catalogue(
        &state,
        query.q.as_deref(),
        query.category.as_deref(),
        query.sort.unwrap_or_default(),
    )
    .await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/catalogue/{part_id}",
    params(("part_id" = String, Path, description = "Part ID")),
    responses(
        (status = 200, description = "Part", body = ApiResponse<CatalogueItem>),
        (status = 404, description = "Part not found")
    ),
    tag = "Catalogue"
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path(part_id): Path<String>,
) -> AppResult<Json<ApiResponse<CatalogueItem>>> {
    let resp = catalogue_service::get_item(&state, &part_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/catalogue",
    request_body = CreateCatalogueItemRequest,
    responses(
        (status = 201, description = "Part created", body = ApiResponse<CatalogueItem>),
        (status = 400, description = "Invalid part or duplicate id"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Catalogue"
)]
pub async fn create_item(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateCatalogueItemRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CatalogueItem>>)> {
    let resp = catalogue_service::create_item(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/catalogue/{part_id}",
    params(("part_id" = String, Path, description = "Part ID")),
    request_body = UpdateCatalogueItemRequest,
    responses(
        (status = 200, description = "Part updated", body = ApiResponse<CatalogueItem>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Part not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Catalogue"
)]
pub async fn update_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(part_id): Path<String>,
    Json(payload): Json<UpdateCatalogueItemRequest>,
) -> AppResult<Json<ApiResponse<CatalogueItem>>> {
    let resp = catalogue_service::update_item(&state, &user, &part_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/catalogue/{part_id}",
    params(("part_id" = String, Path, description = "Part ID")),
    responses(
        (status = 200, description = "Part deleted", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Part not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Catalogue"
)]
pub async fn delete_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(part_id): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = catalogue_service::delete_item(&state, &user, &part_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/catalogue/export",
    responses(
        (status = 200, description = "Catalogue as CSV", content_type = "text/csv", body = String),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Catalogue"
)]
pub async fn export_catalogue(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let csv = catalogue_service::export_catalogue(&state, &user).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"catalogue.csv\"",
            ),
        ],
        csv,
    ))
}

#[utoipa::path(
    post,
    path = "/api/catalogue/import",
    request_body(content = String, content_type = "text/csv", description = "CSV rows: id, name, category, price, stock, description, image"),
    responses(
        (status = 200, description = "Rows upserted by part id", body = ApiResponse<ImportSummary>),
        (status = 400, description = "Empty body, non-UTF-8 body or spreadsheet upload"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Catalogue"
)]
pub async fn import_catalogue(
    State(state): State<AppState>,
    user: AuthUser,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<ApiResponse<ImportSummary>>> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    let resp = catalogue_service::import_catalogue(&state, &user, content_type, &body).await?;
    Ok(Json(resp))
}
