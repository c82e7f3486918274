use actix_web::{get, post, web, HttpResponse};

use crate::errors::Result;
use crate::middleware::AuthUser;
use crate::routes::sessions::parse_date;
use crate::services::reconciliation_service::ReconciliationService;
use crate::state::AppState;

/// POST /api/reconciliation/sync - Recalcul et correction des sessions ouvertes (PROTÉGÉE)
#[post("/sync")]
pub async fn sync_sessions(auth_user: AuthUser, state: web::Data<AppState>) -> HttpResponse {
    tracing::info!(username = %auth_user.username, "Reconciliation requested");
    let report = ReconciliationService::verify_and_sync(state.gateway.as_ref()).await;
    HttpResponse::Ok().json(report)
}

/// GET /api/reconciliation/transactions/{date} - Opérations du jour et totaux par mode
#[get("/transactions/{date}")]
pub async fn get_transactions(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let date = parse_date(&path)?;
    let detail = ReconciliationService::transactions_detail(state.gateway.as_ref(), date).await;
    Ok(HttpResponse::Ok().json(detail))
}

pub fn reconciliation_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reconciliation")
            .service(sync_sessions)
            .service(get_transactions),
    );
}
