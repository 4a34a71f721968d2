mod common;

use assert_matches::assert_matches;
use common::TestApp;
use plantation_api::{
    errors::ServiceError,
    services::sales::{CreateSaleRequest, SaleItemRequest},
};
use rust_decimal::Decimal;
use uuid::Uuid;

fn sale_request(items: Vec<SaleItemRequest>, status: Option<&str>) -> CreateSaleRequest {
    CreateSaleRequest {
        customer_name: "Mill & Sons".to_string(),
        status: status.map(str::to_string),
        sale_date: None,
        notes: None,
        items,
    }
}

#[tokio::test]
async fn completed_sale_writes_header_lines_and_decrements_in_one_unit() {
    let app = TestApp::new().await;
    let jaggery = app.seed_item("JAG-1KG", 50, Decimal::new(1000, 2)).await;
    let syrup = app.seed_item("SYR-1L", 20, Decimal::new(500, 2)).await;

    let sale = app
        .services()
        .sales
        .create_sale_with_items(sale_request(
            vec![
                SaleItemRequest {
                    item_id: jaggery,
                    quantity: 2,
                    unit_price: None,
                },
                SaleItemRequest {
                    item_id: syrup,
                    quantity: 2,
                    unit_price: Some(Decimal::new(500, 2)),
                },
            ],
            Some("completed"),
        ))
        .await
        .expect("sale should commit");

    assert_eq!(sale.items.len(), 2);
    // 2 * 10.00 + 2 * 5.00
    assert_eq!(sale.sale.total_amount, Decimal::new(3000, 2));
    assert!(sale.sale.order_number.starts_with("SAL"));

    let jaggery_after = app
        .services()
        .inventory
        .get_item(jaggery)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(jaggery_after.quantity, 48);
    let syrup_after = app
        .services()
        .inventory
        .get_item(syrup)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(syrup_after.quantity, 18);

    // One log row per line, referencing the sale.
    let (transactions, _) = app
        .services()
        .inventory
        .list_transactions(None, 1, 20)
        .await
        .unwrap();
    assert_eq!(transactions.len(), 2);
    assert!(transactions
        .iter()
        .all(|t| t.reference_id == Some(sale.sale.id)));
}

#[tokio::test]
async fn failing_line_rolls_back_the_whole_sale() {
    let app = TestApp::new().await;
    let jaggery = app.seed_item("JAG-1KG", 50, Decimal::new(1000, 2)).await;

    let err = app
        .services()
        .sales
        .create_sale_with_items(sale_request(
            vec![
                SaleItemRequest {
                    item_id: jaggery,
                    quantity: 2,
                    unit_price: None,
                },
                SaleItemRequest {
                    item_id: Uuid::new_v4(),
                    quantity: 1,
                    unit_price: None,
                },
            ],
            Some("completed"),
        ))
        .await
        .expect_err("unknown item must sink the sale");
    assert_matches!(err, ServiceError::NotFound(_));

    // No header, no orphan lines, no decrement.
    let (sales, total) = app.services().sales.list_sales(None, 1, 20).await.unwrap();
    assert_eq!(total, 0);
    assert!(sales.is_empty());

    let jaggery_after = app
        .services()
        .inventory
        .get_item(jaggery)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(jaggery_after.quantity, 50);

    let (_, log_total) = app
        .services()
        .inventory
        .list_transactions(None, 1, 20)
        .await
        .unwrap();
    assert_eq!(log_total, 0);
}

#[tokio::test]
async fn insufficient_stock_blocks_completion_entirely() {
    let app = TestApp::new().await;
    let jaggery = app.seed_item("JAG-1KG", 10, Decimal::new(1000, 2)).await;
    let syrup = app.seed_item("SYR-1L", 1, Decimal::new(500, 2)).await;

    let err = app
        .services()
        .sales
        .create_sale_with_items(sale_request(
            vec![
                SaleItemRequest {
                    item_id: jaggery,
                    quantity: 5,
                    unit_price: None,
                },
                SaleItemRequest {
                    item_id: syrup,
                    quantity: 3,
                    unit_price: None,
                },
            ],
            Some("completed"),
        ))
        .await
        .expect_err("second line exceeds stock");
    assert_matches!(err, ServiceError::InsufficientStock(_));

    // First line's decrement must have rolled back too.
    let jaggery_after = app
        .services()
        .inventory
        .get_item(jaggery)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(jaggery_after.quantity, 10);
}

#[tokio::test]
async fn draft_sale_touches_no_stock_until_completed() {
    let app = TestApp::new().await;
    let jaggery = app.seed_item("JAG-1KG", 50, Decimal::new(1000, 2)).await;

    let sale = app
        .services()
        .sales
        .create_sale_with_items(sale_request(
            vec![SaleItemRequest {
                item_id: jaggery,
                quantity: 4,
                unit_price: None,
            }],
            None,
        ))
        .await
        .expect("draft sale should commit");
    assert_eq!(sale.sale.status, "draft");

    let before = app
        .services()
        .inventory
        .get_item(jaggery)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(before.quantity, 50);

    let completed = app
        .services()
        .sales
        .complete_sale(sale.sale.id)
        .await
        .expect("completion should commit");
    assert_eq!(completed.sale.status, "completed");

    let after = app
        .services()
        .inventory
        .get_item(jaggery)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.quantity, 46);

    // Completing twice is rejected.
    let err = app
        .services()
        .sales
        .complete_sale(sale.sale.id)
        .await
        .expect_err("double completion must fail");
    assert_matches!(err, ServiceError::InvalidOperation(_));
}

#[tokio::test]
async fn resubmitting_a_sale_creates_a_second_sale() {
    let app = TestApp::new().await;
    let jaggery = app.seed_item("JAG-1KG", 50, Decimal::new(1000, 2)).await;
    let request = sale_request(
        vec![SaleItemRequest {
            item_id: jaggery,
            quantity: 1,
            unit_price: None,
        }],
        None,
    );

    let first = app
        .services()
        .sales
        .create_sale_with_items(request.clone())
        .await
        .unwrap();
    let second = app
        .services()
        .sales
        .create_sale_with_items(request)
        .await
        .unwrap();

    assert_ne!(first.sale.id, second.sale.id);
    assert_ne!(first.sale.order_number, second.sale.order_number);

    let (_, total) = app.services().sales.list_sales(None, 1, 20).await.unwrap();
    assert_eq!(total, 2);
}

#[tokio::test]
async fn cancelled_status_cannot_be_requested_at_creation() {
    let app = TestApp::new().await;
    let jaggery = app.seed_item("JAG-1KG", 50, Decimal::new(1000, 2)).await;

    let err = app
        .services()
        .sales
        .create_sale_with_items(sale_request(
            vec![SaleItemRequest {
                item_id: jaggery,
                quantity: 1,
                unit_price: None,
            }],
            Some("cancelled"),
        ))
        .await
        .expect_err("cancelled at creation must fail");
    assert_matches!(err, ServiceError::InvalidOperation(_));
}
