mod common;

use assert_matches::assert_matches;
use common::TestApp;
use plantation_api::{
    entities::inventory_transaction::MovementDirection,
    errors::ServiceError,
    services::inventory::MovementRequest,
};
use rust_decimal::Decimal;

#[tokio::test]
async fn movement_updates_quantity_and_logs_transaction() {
    let app = TestApp::new().await;
    let item_id = app.seed_item("SUGAR-50KG", 20, Decimal::new(1500, 2)).await;

    let outcome = app
        .services()
        .inventory
        .record_movement(MovementRequest::new(item_id, MovementDirection::Out, 5))
        .await
        .expect("movement should succeed");

    assert_eq!(outcome.item.quantity, 15);
    assert_eq!(outcome.transaction.previous_quantity, 20);
    assert_eq!(outcome.transaction.new_quantity, 15);
    assert_eq!(outcome.transaction.direction, "out");

    let (transactions, total) = app
        .services()
        .inventory
        .list_transactions(Some(item_id), 1, 20)
        .await
        .expect("listing transactions should succeed");
    assert_eq!(total, 1);
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].quantity, 5);
}

#[tokio::test]
async fn movement_below_zero_is_rejected_and_leaves_no_trace() {
    let app = TestApp::new().await;
    let item_id = app.seed_item("SUGAR-50KG", 3, Decimal::new(1500, 2)).await;

    let err = app
        .services()
        .inventory
        .record_movement(MovementRequest::new(item_id, MovementDirection::Out, 5))
        .await
        .expect_err("movement past zero must fail");
    assert_matches!(err, ServiceError::InsufficientStock(_));

    // Quantity untouched and no log row written.
    let item = app
        .services()
        .inventory
        .get_item(item_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(item.quantity, 3);

    let (_, total) = app
        .services()
        .inventory
        .list_transactions(Some(item_id), 1, 20)
        .await
        .unwrap();
    assert_eq!(total, 0);
}

#[tokio::test]
async fn negative_stock_allowed_when_configured() {
    let app = TestApp::allowing_negative_stock().await;
    let item_id = app.seed_item("SUGAR-50KG", 3, Decimal::new(1500, 2)).await;

    let outcome = app
        .services()
        .inventory
        .record_movement(MovementRequest::new(item_id, MovementDirection::Out, 5))
        .await
        .expect("back-order mode accepts the movement");
    assert_eq!(outcome.item.quantity, -2);
}

#[tokio::test]
async fn non_positive_quantity_is_rejected() {
    let app = TestApp::new().await;
    let item_id = app.seed_item("SUGAR-50KG", 10, Decimal::new(1500, 2)).await;

    let err = app
        .services()
        .inventory
        .record_movement(MovementRequest::new(item_id, MovementDirection::In, 0))
        .await
        .expect_err("zero quantity must fail");
    assert_matches!(err, ServiceError::InvalidInput(_));
}

#[tokio::test]
async fn movement_against_unknown_item_fails() {
    let app = TestApp::new().await;

    let err = app
        .services()
        .inventory
        .record_movement(MovementRequest::new(
            uuid::Uuid::new_v4(),
            MovementDirection::In,
            1,
        ))
        .await
        .expect_err("unknown item must fail");
    assert_matches!(err, ServiceError::NotFound(_));
}
