use actix_web::{post, web, HttpResponse};

use crate::middleware::AdminUser;
use crate::services::sweeper::SessionSweeper;
use crate::state::AppState;

/// POST /api/admin/sweep - Fermeture immédiate des sessions des jours précédents
#[post("/sweep")]
pub async fn sweep_sessions(
    AdminUser(admin): AdminUser,
    state: web::Data<AppState>,
) -> HttpResponse {
    tracing::info!(username = %admin.username, "Manual sweep requested");
    let report = SessionSweeper::sweep_expired(state.gateway.as_ref(), state.clock.today()).await;

    HttpResponse::Ok().json(serde_json::json!({
        "success": report.failed == 0,
        "message": format!("{} session(s) fermée(s)", report.closed),
        "report": report
    }))
}

pub fn admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/admin").service(sweep_sessions));
}
