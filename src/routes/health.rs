use actix_web::{get, web, HttpResponse};
use crate::models::health::HealthResponse;
use crate::state::AppState;

#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        today: state.clock.today(),
        time: state.clock.now(),
    };

    HttpResponse::Ok().json(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::{test, App};
    use chrono::NaiveDate;

    use crate::gateway::memory::InMemoryGateway;
    use crate::models::users::UserDirectory;
    use crate::utils::clock::FixedClock;
    use crate::utils::storage::MemoryStorage;

    #[actix_web::test]
    async fn test_health_reports_business_date() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap();
        let state = AppState::new(
            Arc::new(InMemoryGateway::new()),
            UserDirectory::default(),
            Arc::new(FixedClock::at(now)),
            Arc::new(MemoryStorage::new()),
        );
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(health_check),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["today"], "2024-03-10");
    }
}
