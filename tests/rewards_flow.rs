mod common;

use std::sync::Arc;

use serde_json::json;
use workshop_hub::{
    dto::rewards::{AddPurchaseRequest, CreateCustomerRequest},
    error::AppError,
    models::Customer,
    services::reward_service,
};

async fn create(state: &workshop_hub::state::AppState, id: &str) -> anyhow::Result<()> {
    reward_service::create_customer(
        state,
        &common::admin(),
        CreateCustomerRequest {
            customer_id: id.into(),
            name: "Ahmad".into(),
        },
    )
    .await?;
    Ok(())
}

fn purchases(count: serde_json::Value) -> AddPurchaseRequest {
    AddPurchaseRequest { count: Some(count) }
}

#[tokio::test]
async fn purchases_earn_and_redeem_rewards() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;
    let admin = common::admin();
    create(&state, "C001").await?;

    let rewards = reward_service::add_purchase(&state, &admin, "C001", purchases(json!(7)))
        .await?
        .data
        .expect("rewards");
    assert_eq!(rewards.purchases, 7);
    assert_eq!(rewards.balance, 2);
    assert_eq!(rewards.next_threshold, 9);

    let resp = reward_service::redeem(&state, &admin, "C001").await?;
    assert_eq!(resp.message, "Reward redeemed");
    let rewards = resp.data.expect("rewards");
    assert_eq!(rewards.redeemed, 1);
    assert_eq!(rewards.balance, 1);

    reward_service::redeem(&state, &admin, "C001").await?;
    let resp = reward_service::redeem(&state, &admin, "C001").await?;
    assert_eq!(resp.message, "No rewards available to redeem");
    let rewards = resp.data.expect("rewards");
    assert_eq!(rewards.redeemed, 2);
    assert_eq!(rewards.balance, 0);

    let stored = state.store.find::<Customer>("C001").await?.expect("customer");
    assert_eq!(stored.redeemed, 2);
    Ok(())
}

#[tokio::test]
async fn odd_purchase_counts_coerce_to_one() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;
    let admin = common::admin();
    create(&state, "C001").await?;

    reward_service::add_purchase(&state, &admin, "C001", purchases(json!("abc"))).await?;
    reward_service::add_purchase(&state, &admin, "C001", purchases(json!(-4))).await?;
    reward_service::add_purchase(&state, &admin, "C001", AddPurchaseRequest::default()).await?;
    let rewards = reward_service::add_purchase(&state, &admin, "C001", purchases(json!("2")))
        .await?
        .data
        .expect("rewards");
    assert_eq!(rewards.purchases, 5);
    Ok(())
}

#[tokio::test]
async fn purchase_counter_limit_is_enforced() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;
    let admin = common::admin();
    create(&state, "C001").await?;

    let err = reward_service::add_purchase(&state, &admin, "C001", purchases(json!("4294967296")))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(msg) if msg == "Purchase count is too large"));

    let rewards =
        reward_service::add_purchase(&state, &admin, "C001", purchases(json!("4294967295")))
            .await?
            .data
            .expect("rewards");
    assert_eq!(rewards.purchases, u32::MAX);
    assert_eq!(rewards.balance, 1_431_655_765);
    assert_eq!(rewards.next_threshold, 4_294_967_298);

    let err = reward_service::add_purchase(&state, &admin, "C001", purchases(json!(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    let stored = state.store.find::<Customer>("C001").await?.expect("customer");
    assert_eq!(stored.purchases, u32::MAX);
    Ok(())
}

#[tokio::test]
async fn ledger_operations_need_admin_and_known_customer() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;
    create(&state, "C001").await?;

    let err = reward_service::redeem(&state, &common::user(2), "C001")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let err = reward_service::add_purchase(&state, &common::admin(), "C404", purchases(json!(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let err = reward_service::create_customer(
        &state,
        &common::admin(),
        CreateCustomerRequest {
            customer_id: "C001".into(),
            name: "Again".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    Ok(())
}

#[tokio::test]
async fn concurrent_redemptions_cannot_overspend() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;
    let admin = common::admin();
    create(&state, "C001").await?;
    reward_service::add_purchase(&state, &admin, "C001", purchases(json!(3))).await?;

    let state = Arc::new(state);
    let mut handles = Vec::new();
    for _ in 0..8 {
        let state = state.clone();
        let admin = admin.clone();
        handles.push(tokio::spawn(async move {
            reward_service::redeem(&state, &admin, "C001").await
        }));
    }
    let mut redeemed = 0;
    for handle in handles {
        if handle.await??.message == "Reward redeemed" {
            redeemed += 1;
        }
    }
    assert_eq!(redeemed, 1);

    let stored = state.store.find::<Customer>("C001").await?.expect("customer");
    assert_eq!(stored.redeemed, 1);
    Ok(())
}
