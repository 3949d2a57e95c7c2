use crate::handlers::{
    cities::{create_city, delete_city, get_cities, get_city, update_city},
    employees::{create_employee, delete_employee, get_employee, get_employees, update_employee},
    expense_types::{
        create_expense_type, delete_expense_type, get_expense_type, get_expense_types,
        update_expense_type,
    },
    general_expenses::{
        create_general_expense, delete_general_expense, get_general_expense,
        get_general_expenses, update_general_expense,
    },
    health::health_check,
    investors::{create_investor, delete_investor, get_investor, get_investors, update_investor},
    reports::{
        get_dashboard, get_expense_report, get_investor_report, get_sales_summary,
        get_stock_report,
    },
    sales::{create_sale, delete_sale, get_sale, get_sales, update_sale},
    stock_items::{
        create_stock_item, delete_stock_item, get_stock_item, get_stock_items, update_stock_item,
    },
};
use crate::schemas::{ApiDoc, AppState};
use axum::{routing::get, Router};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Lookup tables
        .route("/api/v1/cities", get(get_cities).post(create_city))
        .route(
            "/api/v1/cities/:city_id",
            get(get_city).put(update_city).delete(delete_city),
        )
        .route("/api/v1/employees", get(get_employees).post(create_employee))
        .route(
            "/api/v1/employees/:employee_id",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
        .route("/api/v1/investors", get(get_investors).post(create_investor))
        .route(
            "/api/v1/investors/:investor_id",
            get(get_investor).put(update_investor).delete(delete_investor),
        )
        .route(
            "/api/v1/expense-types",
            get(get_expense_types).post(create_expense_type),
        )
        .route(
            "/api/v1/expense-types/:expense_type_id",
            get(get_expense_type)
                .put(update_expense_type)
                .delete(delete_expense_type),
        )
        // Business records
        .route("/api/v1/sales", get(get_sales).post(create_sale))
        .route(
            "/api/v1/sales/:sale_id",
            get(get_sale).put(update_sale).delete(delete_sale),
        )
        .route("/api/v1/stock", get(get_stock_items).post(create_stock_item))
        .route(
            "/api/v1/stock/:stock_item_id",
            get(get_stock_item)
                .put(update_stock_item)
                .delete(delete_stock_item),
        )
        .route(
            "/api/v1/general-expenses",
            get(get_general_expenses).post(create_general_expense),
        )
        .route(
            "/api/v1/general-expenses/:expense_id",
            get(get_general_expense)
                .put(update_general_expense)
                .delete(delete_general_expense),
        )
        // Reports
        .route("/api/v1/reports/dashboard", get(get_dashboard))
        .route("/api/v1/reports/expenses", get(get_expense_report))
        .route("/api/v1/reports/sales-summary", get(get_sales_summary))
        .route("/api/v1/reports/stock", get(get_stock_report))
        .route("/api/v1/reports/investors", get(get_investor_report))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(request_timeout))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
