mod common;

use assert_matches::assert_matches;
use common::TestApp;
use plantation_api::{
    errors::ServiceError,
    services::accounting::PostEntryRequest,
    services::cutting::RecordCuttingPaymentRequest,
    services::loans::{IssueLoanRequest, RecordLoanPaymentRequest},
    services::manufacturing::CreateBatchRequest,
};
use rust_decimal::Decimal;

#[tokio::test]
async fn loan_payment_decrements_balance_and_flips_status_at_zero() {
    let app = TestApp::new().await;
    let employee_id = app.seed_employee("K. Silva", Decimal::new(2500, 2)).await;

    let loan = app
        .services()
        .loans
        .issue_loan(IssueLoanRequest {
            employee_id,
            principal: Decimal::new(100_000, 2),
            issued_at: None,
            notes: None,
        })
        .await
        .unwrap();
    assert_eq!(loan.balance, loan.principal);
    assert_eq!(loan.status, "active");

    let outcome = app
        .services()
        .loans
        .record_payment(RecordLoanPaymentRequest {
            loan_id: loan.id,
            amount: Decimal::new(40_000, 2),
            paid_at: None,
            notes: None,
        })
        .await
        .unwrap();
    assert_eq!(outcome.loan.balance, Decimal::new(60_000, 2));
    assert_eq!(outcome.loan.status, "active");

    let outcome = app
        .services()
        .loans
        .record_payment(RecordLoanPaymentRequest {
            loan_id: loan.id,
            amount: Decimal::new(60_000, 2),
            paid_at: None,
            notes: None,
        })
        .await
        .unwrap();
    assert_eq!(outcome.loan.balance, Decimal::ZERO);
    assert_eq!(outcome.loan.status, "repaid");

    let payments = app.services().loans.list_payments(loan.id).await.unwrap();
    assert_eq!(payments.len(), 2);
}

#[tokio::test]
async fn overpayment_is_rejected_without_writing_anything() {
    let app = TestApp::new().await;
    let employee_id = app.seed_employee("K. Silva", Decimal::new(2500, 2)).await;

    let loan = app
        .services()
        .loans
        .issue_loan(IssueLoanRequest {
            employee_id,
            principal: Decimal::new(10_000, 2),
            issued_at: None,
            notes: None,
        })
        .await
        .unwrap();

    let err = app
        .services()
        .loans
        .record_payment(RecordLoanPaymentRequest {
            loan_id: loan.id,
            amount: Decimal::new(10_001, 2),
            paid_at: None,
            notes: None,
        })
        .await
        .expect_err("overpayment must fail");
    assert_matches!(err, ServiceError::InvalidOperation(_));

    let loan = app.services().loans.get_loan(loan.id).await.unwrap().unwrap();
    assert_eq!(loan.balance, loan.principal);
    assert!(app
        .services()
        .loans
        .list_payments(loan.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn cutting_payment_requires_finished_job_and_marks_it_paid() {
    let app = TestApp::new().await;
    let (land_id, contractor_id) = app.seed_land_with_contractor().await;

    let job = app
        .services()
        .cutting
        .create_job(plantation_api::services::cutting::CreateCuttingJobRequest {
            land_id,
            contractor_id,
            scheduled_date: chrono::Utc::now(),
            notes: None,
        })
        .await
        .unwrap();

    // Scheduled jobs cannot be paid.
    let err = app
        .services()
        .cutting
        .record_payment(RecordCuttingPaymentRequest {
            cutting_job_id: job.id,
            amount: Decimal::new(50_000, 2),
            paid_at: None,
            notes: None,
        })
        .await
        .expect_err("unfinished job cannot be paid");
    assert_matches!(err, ServiceError::InvalidOperation(_));

    app.services()
        .cutting
        .finish_job(job.id, Decimal::new(42, 0))
        .await
        .unwrap();

    let payment = app
        .services()
        .cutting
        .record_payment(RecordCuttingPaymentRequest {
            cutting_job_id: job.id,
            amount: Decimal::new(50_000, 2),
            paid_at: None,
            notes: None,
        })
        .await
        .unwrap();
    assert!(payment.receipt_number.starts_with("CUT"));
    assert_eq!(payment.contractor_id, contractor_id);

    let job = app.services().cutting.get_job(job.id).await.unwrap().unwrap();
    assert_eq!(job.status, "paid");
}

#[tokio::test]
async fn completed_batch_books_output_into_stock() {
    let app = TestApp::new().await;
    let item_id = app.seed_item("JAG-1KG", 5, Decimal::new(1000, 2)).await;

    let batch = app
        .services()
        .manufacturing
        .create_batch(CreateBatchRequest {
            output_item_id: item_id,
            quantity: 30,
            notes: None,
        })
        .await
        .unwrap();
    assert!(batch.batch_number.starts_with("MFG"));
    assert_eq!(batch.status, "planned");

    // Must pass through in_progress first.
    let err = app
        .services()
        .manufacturing
        .complete_batch(batch.id)
        .await
        .expect_err("planned batch cannot complete");
    assert_matches!(err, ServiceError::InvalidOperation(_));

    app.services()
        .manufacturing
        .start_batch(batch.id)
        .await
        .unwrap();
    let batch = app
        .services()
        .manufacturing
        .complete_batch(batch.id)
        .await
        .unwrap();
    assert_eq!(batch.status, "completed");

    let item = app
        .services()
        .inventory
        .get_item(item_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(item.quantity, 35);

    // The increment left its log row referencing the batch.
    let (transactions, _) = app
        .services()
        .inventory
        .list_transactions(Some(item_id), 1, 20)
        .await
        .unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(
        transactions[0].reference_type.as_deref(),
        Some("production_batch")
    );
}

#[tokio::test]
async fn ledger_postings_stay_balanced() {
    let app = TestApp::new().await;

    app.services()
        .accounting
        .post_entry(PostEntryRequest {
            debit_account: "cash".to_string(),
            credit_account: "sales_revenue".to_string(),
            amount: Decimal::new(30_000, 2),
            reference_type: None,
            reference_id: None,
            description: Some("jaggery sale".to_string()),
            occurred_at: None,
        })
        .await
        .unwrap();
    app.services()
        .accounting
        .post_entry(PostEntryRequest {
            debit_account: "wages_expense".to_string(),
            credit_account: "cash".to_string(),
            amount: Decimal::new(12_500, 2),
            reference_type: None,
            reference_id: None,
            description: None,
            occurred_at: None,
        })
        .await
        .unwrap();

    let rows = app.services().accounting.trial_balance().await.unwrap();
    let debits: Decimal = rows.iter().map(|r| r.debit_total).sum();
    let credits: Decimal = rows.iter().map(|r| r.credit_total).sum();
    assert_eq!(debits, credits);

    let cash = rows.iter().find(|r| r.account == "cash").unwrap();
    assert_eq!(cash.debit_total, Decimal::new(30_000, 2));
    assert_eq!(cash.credit_total, Decimal::new(12_500, 2));
}

#[tokio::test]
async fn self_posting_is_rejected() {
    let app = TestApp::new().await;

    let err = app
        .services()
        .accounting
        .post_entry(PostEntryRequest {
            debit_account: "cash".to_string(),
            credit_account: "cash".to_string(),
            amount: Decimal::new(100, 2),
            reference_type: None,
            reference_id: None,
            description: None,
            occurred_at: None,
        })
        .await
        .expect_err("debit and credit must differ");
    assert_matches!(err, ServiceError::InvalidInput(_));
}
