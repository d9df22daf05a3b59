use chrono::Utc;
use uuid::Uuid;

use crate::{
    dto::support::{
        ArticleList, CreateTicketRequest, FaqList, StatusList, TicketList,
        UpdateTicketStatusRequest,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Difficulty, IssueType, SupportTicket, TicketStatus},
    response::{ApiResponse, Meta},
    routes::params::{ArticleQuery, FaqQuery, TicketQuery},
    state::AppState,
};

fn matches_category(category: &str, wanted: Option<&str>) -> bool {
    match wanted.map(str::trim).filter(|w| !w.is_empty()) {
        Some(wanted) => category.eq_ignore_ascii_case(wanted),
        None => true,
    }
}

fn matches_text(fields: [&str; 2], q: Option<&str>) -> bool {
    let needle = q.map(|q| q.trim().to_lowercase()).unwrap_or_default();
    needle.is_empty() || fields.iter().any(|f| f.to_lowercase().contains(&needle))
}

pub fn list_faqs(state: &AppState, query: &FaqQuery) -> ApiResponse<FaqList> {
    let items: Vec<_> = state
        .support
        .faqs
        .iter()
        .filter(|faq| matches_category(&faq.category, query.category.as_deref()))
        .filter(|faq| matches_text([&faq.question, &faq.answer], query.q.as_deref()))
        .cloned()
        .collect();
    let meta = Meta::total(items.len());
    ApiResponse::success("FAQs", FaqList { items }, Some(meta))
}

pub fn list_articles(state: &AppState, query: &ArticleQuery) -> ApiResponse<ArticleList> {
    let difficulty: Option<Difficulty> = query.difficulty;
    let items: Vec<_> = state
        .support
        .articles
        .iter()
        .filter(|a| matches_category(&a.category, query.category.as_deref()))
        .filter(|a| difficulty.is_none_or(|d| a.difficulty == d))
        .filter(|a| matches_text([&a.title, &a.content], query.q.as_deref()))
        .cloned()
        .collect();
    let meta = Meta::total(items.len());
    ApiResponse::success("Articles", ArticleList { items }, Some(meta))
}

pub fn list_status(state: &AppState) -> ApiResponse<StatusList> {
    let mut items = state.support.status_updates.clone();
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let meta = Meta::total(items.len());
    ApiResponse::success("Service status", StatusList { items }, Some(meta))
}

fn new_ticket_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_uppercase()
}

pub async fn create_ticket(
    state: &AppState,
    payload: CreateTicketRequest,
) -> AppResult<ApiResponse<SupportTicket>> {
    let name = payload.name.trim();
    let email = payload.email.trim();
    let description = payload.description.trim();
    if name.is_empty() || email.is_empty() || description.is_empty() {
        return Err(AppError::bad_request(
            "Name, email and description are required",
        ));
    }
    if !email.contains('@') {
        return Err(AppError::bad_request("Please enter a valid email address"));
    }

    let mut tickets = state.store.lock::<SupportTicket>().await?;
    let mut ticket_id = new_ticket_id();
    while tickets.contains(&ticket_id) {
        ticket_id = new_ticket_id();
    }
    let ticket = SupportTicket {
        ticket_id,
        name: name.to_string(),
        email: email.to_string(),
        phone: payload.phone.trim().to_string(),
        issue_type: payload.issue_type.unwrap_or(IssueType::General),
        description: description.to_string(),
        status: TicketStatus::Open,
        created_at: Utc::now(),
    };
    tickets.items.push(ticket.clone());
    tickets.commit().await?;

    tracing::info!(ticket_id = %ticket.ticket_id, issue_type = ?ticket.issue_type, "support ticket created");
    Ok(ApiResponse::success(
        format!("Ticket {} submitted", ticket.ticket_id),
        ticket,
        Some(Meta::empty()),
    ))
}

pub async fn list_tickets(
    state: &AppState,
    user: &AuthUser,
    query: &TicketQuery,
) -> AppResult<ApiResponse<TicketList>> {
    ensure_admin(user)?;
    let mut items = state.store.load::<SupportTicket>().await?;
    if let Some(status) = query.status {
        items.retain(|t| t.status == status);
    }
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Tickets", TicketList { items }, Some(meta)))
}

pub async fn get_ticket(
    state: &AppState,
    ticket_id: &str,
) -> AppResult<ApiResponse<SupportTicket>> {
    let ticket = state
        .store
        .find::<SupportTicket>(ticket_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Ticket", ticket, None))
}

pub async fn update_ticket_status(
    state: &AppState,
    user: &AuthUser,
    ticket_id: &str,
    payload: UpdateTicketStatusRequest,
) -> AppResult<ApiResponse<SupportTicket>> {
    ensure_admin(user)?;

    let mut tickets = state.store.lock::<SupportTicket>().await?;
    let ticket = tickets.get_mut(ticket_id).ok_or(AppError::NotFound)?;
    ticket.status = payload.status;
    let ticket = ticket.clone();
    tickets.commit().await?;

    tracing::info!(user_id = user.user_id, ticket_id = %ticket_id, status = ?ticket.status, "ticket status updated");
    Ok(ApiResponse::success(
        "Ticket status updated",
        ticket,
        Some(Meta::empty()),
    ))
}
