mod common;

use chrono::{Datelike, Utc};
use common::TestApp;
use plantation_api::services::payroll::RecordAdvanceRequest;
use rust_decimal::Decimal;

#[tokio::test]
async fn consecutive_receipts_get_distinct_sequential_numbers() {
    let app = TestApp::new().await;
    let employee_id = app.seed_employee("R. Perera", Decimal::new(2500, 2)).await;

    let mut numbers = Vec::new();
    for _ in 0..3 {
        let advance = app
            .services()
            .payroll
            .record_advance(RecordAdvanceRequest {
                employee_id,
                amount: Decimal::new(5000, 2),
                paid_at: None,
                notes: None,
                recorded_by: None,
            })
            .await
            .expect("advance should commit");
        numbers.push(advance.receipt_number);
    }

    let now = Utc::now();
    let period = format!("{:02}{:02}", now.year() % 100, now.month());
    assert_eq!(numbers[0], format!("ADV{}0001", period));
    assert_eq!(numbers[1], format!("ADV{}0002", period));
    assert_eq!(numbers[2], format!("ADV{}0003", period));

    // All distinct even when drawn back to back.
    let mut deduped = numbers.clone();
    deduped.dedup();
    assert_eq!(deduped.len(), numbers.len());
}

#[tokio::test]
async fn concurrent_draws_yield_distinct_numbers() {
    let app = TestApp::new().await;
    let employee_id = app.seed_employee("R. Perera", Decimal::new(2500, 2)).await;

    // The counter read locks the row, so overlapping transactions must line
    // up behind each other rather than both formatting the same sequence.
    let mut handles = Vec::new();
    for _ in 0..4 {
        let payroll = app.services().payroll.clone();
        handles.push(tokio::spawn(async move {
            payroll
                .record_advance(RecordAdvanceRequest {
                    employee_id,
                    amount: Decimal::new(5000, 2),
                    paid_at: None,
                    notes: None,
                    recorded_by: None,
                })
                .await
                .expect("advance should commit")
                .receipt_number
        }));
    }

    let mut numbers = Vec::new();
    for handle in handles {
        numbers.push(handle.await.expect("task should not panic"));
    }
    numbers.sort();
    numbers.dedup();
    assert_eq!(numbers.len(), 4);
}

#[tokio::test]
async fn each_prefix_counts_independently() {
    let app = TestApp::new().await;
    let employee_id = app.seed_employee("R. Perera", Decimal::new(2500, 2)).await;

    let advance = app
        .services()
        .payroll
        .record_advance(RecordAdvanceRequest {
            employee_id,
            amount: Decimal::new(5000, 2),
            paid_at: None,
            notes: None,
            recorded_by: None,
        })
        .await
        .unwrap();

    let loan = app
        .services()
        .loans
        .issue_loan(plantation_api::services::loans::IssueLoanRequest {
            employee_id,
            principal: Decimal::new(100_000, 2),
            issued_at: None,
            notes: None,
        })
        .await
        .unwrap();

    // The loan draws from its own counter, unaffected by the advance.
    assert!(advance.receipt_number.starts_with("ADV"));
    assert!(loan.receipt_number.starts_with("LON"));
    assert!(advance.receipt_number.ends_with("0001"));
    assert!(loan.receipt_number.ends_with("0001"));
}

#[tokio::test]
async fn failed_write_does_not_consume_a_number() {
    let app = TestApp::new().await;
    let employee_id = app.seed_employee("R. Perera", Decimal::new(2500, 2)).await;

    // Invalid amount fails after validation, before any write.
    let _ = app
        .services()
        .payroll
        .record_advance(RecordAdvanceRequest {
            employee_id,
            amount: Decimal::ZERO,
            paid_at: None,
            notes: None,
            recorded_by: None,
        })
        .await
        .expect_err("zero advance must fail");

    // A payment against a missing employee rolls the drawn number back with
    // the transaction.
    let _ = app
        .services()
        .payroll
        .record_advance(RecordAdvanceRequest {
            employee_id: uuid::Uuid::new_v4(),
            amount: Decimal::new(5000, 2),
            paid_at: None,
            notes: None,
            recorded_by: None,
        })
        .await
        .expect_err("unknown employee must fail");

    let advance = app
        .services()
        .payroll
        .record_advance(RecordAdvanceRequest {
            employee_id,
            amount: Decimal::new(5000, 2),
            paid_at: None,
            notes: None,
            recorded_by: None,
        })
        .await
        .unwrap();
    assert!(advance.receipt_number.ends_with("0001"));
}
