pub mod admin;
pub mod auth;
pub mod health;
pub mod reconciliation;
pub mod sessions;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(health::health_check)
            .configure(auth::auth_routes)
            .configure(sessions::sessions_routes)
            .configure(reconciliation::reconciliation_routes)
            .configure(admin::admin_routes)
    );
}
