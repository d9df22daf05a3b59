//! Read-only support content (FAQs, knowledge-base articles, service status).
//!
//! Loaded once at start-up and shared immutably; there is no API to change it.

use std::path::Path;

use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Difficulty, Faq, KbArticle, Severity, StatusType, StatusUpdate};

pub const REFERENCE_FILE: &str = "support_reference.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportReference {
    #[serde(default)]
    pub faqs: Vec<Faq>,
    #[serde(default)]
    pub articles: Vec<KbArticle>,
    #[serde(default)]
    pub status_updates: Vec<StatusUpdate>,
}

impl SupportReference {
    /// Reads `support_reference.json` from `dir`, falling back to the built-in set when the
    /// file is absent or unreadable.
    pub async fn load(dir: &Path) -> Self {
        let path = dir.join(REFERENCE_FILE);
        match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(reference) => {
                    tracing::info!(file = %path.display(), "support reference loaded");
                    reference
                }
                Err(err) => {
                    tracing::warn!(file = %path.display(), error = %err, "support reference malformed, using built-in set");
                    Self::builtin()
                }
            },
            Err(_) => Self::builtin(),
        }
    }

    pub fn builtin() -> Self {
        let faq = |faq_id, question: &str, answer: &str, category: &str| Faq {
            faq_id,
            question: question.to_string(),
            answer: answer.to_string(),
            category: category.to_string(),
        };
        let article = |article_id, title: &str, content: &str, category: &str, difficulty| KbArticle {
            article_id,
            title: title.to_string(),
            content: content.to_string(),
            category: category.to_string(),
            difficulty,
        };

        Self {
            faqs: vec![
                faq(
                    1,
                    "How do I reset my password?",
                    "Open your profile and use the change password form. You need your current password.",
                    "account",
                ),
                faq(
                    2,
                    "When will I be charged for my order?",
                    "Orders are charged at checkout. Delivery adds a fixed fee.",
                    "billing",
                ),
                faq(
                    3,
                    "How do reward points work?",
                    "Every three purchases earn one discount you can redeem on a later visit.",
                    "billing",
                ),
                faq(
                    4,
                    "Can I log in with my face?",
                    "Yes, once a face scan is enrolled on your profile. Password login always remains available.",
                    "technical",
                ),
                faq(
                    5,
                    "How do I know a part fits my vehicle?",
                    "Each part lists compatible models in its description. Contact support if unsure.",
                    "product",
                ),
            ],
            articles: vec![
                article(
                    1,
                    "Face scan not recognised",
                    "Use even lighting, face the camera directly and remove sunglasses. Re-enrol from your profile if it keeps failing.",
                    "troubleshooting",
                    Difficulty::Beginner,
                ),
                article(
                    2,
                    "Importing a parts catalogue",
                    "Export the current catalogue as CSV, edit it in a spreadsheet keeping the column order, then import it. Rows are matched by part id.",
                    "tutorial",
                    Difficulty::Intermediate,
                ),
                article(
                    3,
                    "Tracking a job card through the workshop",
                    "Job cards move from Open to In Progress to Closed. Remarks record what was done and the assignee owns the next step.",
                    "guide",
                    Difficulty::Beginner,
                ),
            ],
            status_updates: vec![
                StatusUpdate {
                    update_id: 1,
                    title: "All systems operational".to_string(),
                    message: "Ordering, rewards and support are running normally.".to_string(),
                    status_type: StatusType::Operational,
                    severity: Severity::Low,
                    created_at: Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).single().unwrap_or_default(),
                },
                StatusUpdate {
                    update_id: 2,
                    title: "Scheduled maintenance".to_string(),
                    message: "Face login may be unavailable for up to 30 minutes. Password login is unaffected.".to_string(),
                    status_type: StatusType::Maintenance,
                    severity: Severity::Medium,
                    created_at: Utc.with_ymd_and_hms(2025, 1, 4, 22, 0, 0).single().unwrap_or_default(),
                },
            ],
        }
    }
}
