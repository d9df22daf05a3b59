use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
};

use crate::{
    dto::support::{
        ArticleList, CreateTicketRequest, FaqList, StatusList, TicketList,
        UpdateTicketStatusRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::SupportTicket,
    response::ApiResponse,
    routes::params::{ArticleQuery, FaqQuery, TicketQuery},
    services::support_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/faqs", get(list_faqs))
        .route("/articles", get(list_articles))
        .route("/status", get(list_status))
        .route("/tickets", get(list_tickets).post(create_ticket))
        .route("/tickets/{ticket_id}", get(get_ticket))
        .route("/tickets/{ticket_id}/status", put(update_ticket_status))
}

#[utoipa::path(
    get,
    path = "/api/support/faqs",
    params(FaqQuery),
    responses((status = 200, description = "FAQs", body = ApiResponse<FaqList>)),
    tag = "Support"
)]
pub async fn list_faqs(
    State(state): State<AppState>,
    Query(query): Query<FaqQuery>,
) -> Json<ApiResponse<FaqList>> {
    Json(support_service::list_faqs(&state, &query))
}

#[utoipa::path(
    get,
    path = "/api/support/articles",
    params(ArticleQuery),
    responses((status = 200, description = "Knowledge-base articles", body = ApiResponse<ArticleList>)),
    tag = "Support"
)]
pub async fn list_articles(
    State(state): State<AppState>,
    Query(query): Query<ArticleQuery>,
) -> Json<ApiResponse<ArticleList>> {
    Json(support_service::list_articles(&state, &query))
}

#[utoipa::path(
    get,
    path = "/api/support/status",
    responses((status = 200, description = "Service status updates, newest first", body = ApiResponse<StatusList>)),
    tag = "Support"
)]
pub async fn list_status(State(state): State<AppState>) -> Json<ApiResponse<StatusList>> {
    Json(support_service::list_status(&state))
}

#[utoipa::path(
    post,
    path = "/api/support/tickets",
    request_body = CreateTicketRequest,
    responses(
        (status = 201, description = "Ticket submitted", body = ApiResponse<SupportTicket>),
        (status = 400, description = "Missing fields or invalid email")
    ),
    tag = "Support"
)]
pub async fn create_ticket(
    State(state): State<AppState>,
    Json(payload): Json<CreateTicketRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<SupportTicket>>)> {
    let resp = support_service::create_ticket(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/support/tickets",
    params(TicketQuery),
    responses(
        (status = 200, description = "Tickets, newest first", body = ApiResponse<TicketList>),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Support"
)]
pub async fn list_tickets(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<TicketQuery>,
) -> AppResult<Json<ApiResponse<TicketList>>> {
    let resp = support_service::list_tickets(&state, &user, &query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/support/tickets/{ticket_id}",
    params(("ticket_id" = String, Path, description = "Ticket ID")),
    responses(
        (status = 200, description = "Ticket", body = ApiResponse<SupportTicket>),
        (status = 404, description = "Ticket not found")
    ),
    tag = "Support"
)]
pub async fn get_ticket(
    State(state): State<AppState>,
    Path(ticket_id): Path<String>,
) -> AppResult<Json<ApiResponse<SupportTicket>>> {
    let resp = support_service::get_ticket(&state, &ticket_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/support/tickets/{ticket_id}/status",
    params(("ticket_id" = String, Path, description = "Ticket ID")),
    request_body = UpdateTicketStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<SupportTicket>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Ticket not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Support"
)]
pub async fn update_ticket_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(ticket_id): Path<String>,
    Json(payload): Json<UpdateTicketStatusRequest>,
) -> AppResult<Json<ApiResponse<SupportTicket>>> {
    let resp = support_service::update_ticket_status(&state, &user, &ticket_id, payload).await?;
    Ok(Json(resp))
}
