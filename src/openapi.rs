use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Plantation API",
        version = "0.1.0",
        description = r#"
Backend for plantation and estate management.

Covers lands, contractors, cutting jobs, manufacturing batches, inventory,
payroll advances, employee loans, double-entry accounting, and sales.

Every receipt-bearing write (advances, cutting payments, loans, sales,
batches) draws its number from a per-prefix monthly counter inside the same
transaction as the write itself, so numbers are unique and never orphaned.
        "#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "inventory", description = "Inventory items and stock movements"),
        (name = "sales", description = "Sales with line items"),
        (name = "cutting", description = "Cutting jobs and contractor payments"),
        (name = "manufacturing", description = "Production batches"),
        (name = "payroll", description = "Employees and wage advances"),
        (name = "loans", description = "Employee loans and repayments"),
        (name = "accounting", description = "Double-entry ledger")
    ),
    paths(
        crate::handlers::inventory::list_items,
        crate::handlers::inventory::create_item,
        crate::handlers::inventory::get_item,
        crate::handlers::inventory::record_movement,
        crate::handlers::sales::create_sale,
        crate::handlers::sales::get_sale,
        crate::handlers::sales::complete_sale,
        crate::handlers::cutting::record_payment,
        crate::handlers::manufacturing::complete_batch,
        crate::handlers::payroll::record_advance,
        crate::handlers::loans::record_payment,
        crate::handlers::accounting::post_entry,
    ),
    components(schemas(
        crate::handlers::inventory::CreateItemBody,
        crate::handlers::inventory::UpdateItemBody,
        crate::handlers::inventory::RecordMovementBody,
        crate::handlers::lands::CreateLandBody,
        crate::handlers::lands::UpdateLandBody,
        crate::handlers::contractors::CreateContractorBody,
        crate::handlers::contractors::UpdateContractorBody,
        crate::handlers::cutting::CreateCuttingJobBody,
        crate::handlers::cutting::FinishJobBody,
        crate::handlers::cutting::RecordCuttingPaymentBody,
        crate::handlers::manufacturing::CreateBatchBody,
        crate::handlers::payroll::CreateEmployeeBody,
        crate::handlers::payroll::UpdateEmployeeBody,
        crate::handlers::payroll::RecordAdvanceBody,
        crate::handlers::loans::IssueLoanBody,
        crate::handlers::loans::RecordLoanPaymentBody,
        crate::handlers::accounting::PostEntryBody,
    ))
)]
pub struct ApiDoc;

/// Swagger UI mounted at /docs, serving the generated document.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
