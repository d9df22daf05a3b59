use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Faq, IssueType, KbArticle, StatusUpdate, SupportTicket, TicketStatus};

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateTicketRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Defaults to `general`.
    pub issue_type: Option<IssueType>,
    pub description: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTicketStatusRequest {
    pub status: TicketStatus,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct TicketList {
    #[schema(value_type = Vec<SupportTicket>)]
    pub items: Vec<SupportTicket>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct FaqList {
    #[schema(value_type = Vec<Faq>)]
    pub items: Vec<Faq>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ArticleList {
    #[schema(value_type = Vec<KbArticle>)]
    pub items: Vec<KbArticle>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct StatusList {
    #[schema(value_type = Vec<StatusUpdate>)]
    pub items: Vec<StatusUpdate>,
}
