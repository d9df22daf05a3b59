mod common;

use workshop_hub::{
    dto::{
        jobs::{CreateJobRequest, UpdateJobRequest},
        support::{CreateTicketRequest, UpdateTicketStatusRequest},
    },
    error::AppError,
    models::{Difficulty, IssueType, TicketStatus},
    routes::params::{ArticleQuery, FaqQuery, TicketQuery},
    services::{job_service, support_service},
};

fn ticket(email: &str) -> CreateTicketRequest {
    CreateTicketRequest {
        name: "Kumar".into(),
        email: email.into(),
        phone: String::new(),
        issue_type: None,
        description: "Invoice shows the wrong amount".into(),
    }
}

#[tokio::test]
async fn tickets_are_public_to_create_and_admin_to_manage() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;

    let created = support_service::create_ticket(&state, ticket("kumar@example.com"))
        .await?
        .data
        .expect("ticket");
    assert_eq!(created.ticket_id.len(), 8);
    assert_eq!(created.issue_type, IssueType::General);
    assert_eq!(created.status, TicketStatus::Open);

    let err = support_service::create_ticket(&state, ticket("not-an-email"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = support_service::list_tickets(&state, &common::user(2), &TicketQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let updated = support_service::update_ticket_status(
        &state,
        &common::admin(),
        &created.ticket_id,
        UpdateTicketStatusRequest {
            status: TicketStatus::InProgress,
        },
    )
    .await?
    .data
    .expect("ticket");
    assert_eq!(updated.status, TicketStatus::InProgress);

    let open = support_service::list_tickets(
        &state,
        &common::admin(),
        &TicketQuery {
            status: Some(TicketStatus::Open),
        },
    )
    .await?
    .data
    .expect("tickets");
    assert!(open.items.is_empty());

    let fetched = support_service::get_ticket(&state, &created.ticket_id)
        .await?
        .data
        .expect("ticket");
    assert_eq!(fetched.status, TicketStatus::InProgress);
    Ok(())
}

#[tokio::test]
async fn reference_content_filters() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;

    let all = support_service::list_faqs(&state, &FaqQuery::default())
        .data
        .expect("faqs");
    assert!(!all.items.is_empty());

    let category = all.items[0].category.to_uppercase();
    let filtered = support_service::list_faqs(
        &state,
        &FaqQuery {
            category: Some(category),
            q: None,
        },
    )
    .data
    .expect("faqs");
    assert!(!filtered.items.is_empty());
    assert!(filtered.items.len() <= all.items.len());

    let none = support_service::list_faqs(
        &state,
        &FaqQuery {
            category: None,
            q: Some("zzzz-no-such-text".into()),
        },
    )
    .data
    .expect("faqs");
    assert!(none.items.is_empty());

    let beginner = support_service::list_articles(
        &state,
        &ArticleQuery {
            difficulty: Some(Difficulty::Beginner),
            ..Default::default()
        },
    )
    .data
    .expect("articles");
    assert!(beginner.items.iter().all(|a| a.difficulty == Difficulty::Beginner));

    let status = support_service::list_status(&state).data.expect("status");
    assert!(status.items.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    Ok(())
}

#[tokio::test]
async fn job_cards_crud() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;
    let user = common::user(2);

    let job = job_service::create_job(
        &state,
        &user,
        CreateJobRequest {
            job_id: " JC1234 ".into(),
            status: "In Progress".into(),
            remarks: "Brake pads".into(),
            assigned_to: "Ali".into(),
        },
    )
    .await?
    .data
    .expect("job");
    assert_eq!(job.job_id, "JC1234");

    let err = job_service::create_job(
        &state,
        &user,
        CreateJobRequest {
            job_id: "JC1234".into(),
            status: "Open".into(),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = job_service::create_job(
        &state,
        &user,
        CreateJobRequest {
            job_id: "JC9999".into(),
            status: "   ".into(),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let updated = job_service::update_job(
        &state,
        &user,
        "JC1234",
        UpdateJobRequest {
            status: Some("Completed".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("job");
    assert_eq!(updated.status, "Completed");
    assert_eq!(updated.assigned_to, "Ali");

    job_service::delete_job(&state, &user, "JC1234").await?;
    let err = job_service::delete_job(&state, &user, "JC1234").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    assert!(job_service::list_jobs(&state).await?.data.expect("jobs").items.is_empty());
    Ok(())
}
