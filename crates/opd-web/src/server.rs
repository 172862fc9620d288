//! Web服务器

use axum::{
    routing::{get, post, put},
    Router,
};
use opd_core::Result;
use opd_database::DatabasePool;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::handlers::{
    api_root, doctors, expenses, health, mr_data, payments, receipts, reports, services,
    shift_cash, shifts,
};

/// 全局共享状态
pub struct AppState {
    pub db: DatabasePool,
}

pub struct WebServer {
    addr: SocketAddr,
    app: Router,
}

impl WebServer {
    pub fn new(addr: SocketAddr, db: DatabasePool) -> Self {
        let state = Arc::new(AppState { db });
        let app = create_app(state);
        Self { addr, app }
    }

    pub async fn run(self) -> Result<()> {
        info!("Starting web server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(listener, self.app)
            .await
            .map_err(opd_core::OpdError::Network)?;

        Ok(())
    }
}

pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        // 根路径
        .route("/", get(api_root))
        // 健康检查
        .route("/health", get(health))
        .route("/api/health", get(health))
        // API路由
        .nest("/api/shifts", shift_routes())
        .nest("/api/opd-patient-data", receipt_routes())
        .nest("/api/expenses", expense_routes())
        .nest("/api/consultant-payments", payment_routes())
        .nest("/api/doctors", doctor_routes())
        .nest("/api/opd-services", service_routes())
        .nest("/api/mr-data", mr_routes())
        .nest("/api/opd-shift-cash", shift_cash_routes())
        .nest("/api/reports", report_routes())
        .with_state(state)
        // 全局中间件
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
}

/// 班次路由
fn shift_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(shifts::list))
        .route("/open", post(shifts::open))
        .route("/current", get(shifts::current))
        .route("/date/:date", get(shifts::by_date))
        .route("/:id", get(shifts::by_id))
        .route("/:id/close", put(shifts::close))
}

/// OPD票据路由
fn receipt_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(receipts::list).post(receipts::create))
        .route("/:id", get(receipts::by_id).put(receipts::update))
        .route("/:id/cancel", put(receipts::cancel))
        .route("/:id/refund", put(receipts::refund))
        .route("/:id/paid-to-doctor", put(receipts::mark_paid_to_doctor))
        .route("/mr/:mr_number", get(receipts::by_mr_number))
        .route("/shift/:shift_id", get(receipts::by_shift))
        .route("/shift/:shift_id/summary", get(receipts::shift_summary))
}

/// 支出路由
fn expense_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(expenses::list).post(expenses::create))
        .route("/summary/:date", get(expenses::summary_by_date))
        .route("/shift/:shift_id", get(expenses::by_shift))
        .route(
            "/:id",
            get(expenses::by_id)
                .put(expenses::update)
                .delete(expenses::delete),
        )
}

/// 会诊付款路由
fn payment_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(payments::list).post(payments::create))
        .route("/pending", get(payments::pending))
        .route("/summary", get(payments::doctor_summary))
        .route("/doctor/:name", get(payments::by_doctor))
        .route(
            "/:id",
            get(payments::by_id)
                .put(payments::update)
                .delete(payments::delete),
        )
}

/// 医生档案路由
fn doctor_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(doctors::list).post(doctors::create))
        .route("/departments", get(doctors::departments))
        .route("/department/:department", get(doctors::by_department))
        .route(
            "/:id",
            get(doctors::by_id)
                .put(doctors::update)
                .delete(doctors::soft_delete),
        )
}

/// 服务项目路由
fn service_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(services::list).post(services::create))
        .route("/heads", get(services::heads))
        .route("/head/:head", get(services::by_head))
        .route(
            "/:id",
            get(services::by_id)
                .put(services::update)
                .delete(services::soft_delete),
        )
}

/// 患者主索引路由
fn mr_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(mr_data::search).post(mr_data::create))
        .route("/:mr", get(mr_data::profile).put(mr_data::update))
}

/// 班次现金结算路由
fn shift_cash_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(shift_cash::list))
        .route("/close", post(shift_cash::close))
        .route("/daily/:date", get(shift_cash::daily))
        .route("/shift/:shift_id", get(shift_cash::by_shift_id))
        .route("/:id", get(shift_cash::by_id).put(shift_cash::correct))
}

/// 报表路由
fn report_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/daily", get(reports::daily))
        .route("/shift", get(reports::shift))
        .route("/monthly", get(reports::monthly))
        .route("/yearly", get(reports::yearly))
        .route("/services", get(reports::services))
}
