use actix_web::{get, post, web, HttpResponse};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::errors::{AppError, Result};
use crate::middleware::AuthUser;
use crate::services::reconciliation_service::ReconciliationService;
use crate::services::session_service::{DepositOutcome, SessionService, DEFAULT_RECENT_LIMIT};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RecentQuery {
    pub limit: Option<u64>,
}

#[derive(Deserialize)]
pub struct RangeQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Deserialize)]
pub struct StatsQuery {
    pub month: u32,
    pub year: i32,
}

#[derive(Deserialize)]
pub struct VerifyQuery {
    pub date: NaiveDate,
}

// DTO pour le versement bancaire
#[derive(Debug, Deserialize, Validate)]
pub struct DepositRequest {
    #[validate(custom(function = "non_negative"))]
    pub versement: Decimal,
    pub date_versement: NaiveDate,
    #[validate(length(min = 1, message = "La banque est obligatoire"))]
    pub banque: String,
    #[validate(custom(function = "non_negative"))]
    pub charges: Decimal,
}

fn non_negative(value: &Decimal) -> std::result::Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("negative_amount"));
    }
    Ok(())
}

/// Date au format YYYY-MM-DD
pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("Invalid date '{}', expected YYYY-MM-DD", raw)))
}

/// GET /api/sessions/today - Session du jour
#[get("/today")]
pub async fn get_today(state: web::Data<AppState>) -> HttpResponse {
    let today = state.clock.today();
    let session = SessionService::today_session(state.gateway.as_ref(), today).await;
    let is_open = session.as_ref().is_some_and(|s| !s.session_fermee);

    HttpResponse::Ok().json(serde_json::json!({
        "date": today,
        "is_open": is_open,
        "session": session
    }))
}

/// GET /api/sessions/status/{date} - Statut d'une journée (fermée par défaut)
#[get("/status/{date}")]
pub async fn get_status(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let date = parse_date(&path)?;
    let status = SessionService::check_status(state.gateway.as_ref(), date).await;
    Ok(HttpResponse::Ok().json(status))
}

/// GET /api/sessions/recent?limit=10 - Dernières sessions
#[get("/recent")]
pub async fn get_recent(
    query: web::Query<RecentQuery>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    let sessions = SessionService::recent(state.gateway.as_ref(), limit).await;
    HttpResponse::Ok().json(sessions)
}

/// GET /api/sessions?from=...&to=... - Sessions sur une période
#[get("")]
pub async fn get_range(
    query: web::Query<RangeQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if query.from > query.to {
        return Err(AppError::BadRequest("'from' must not be after 'to'".to_string()));
    }
    let sessions = SessionService::by_date_range(state.gateway.as_ref(), query.from, query.to).await;
    Ok(HttpResponse::Ok().json(sessions))
}

/// GET /api/sessions/stats?month=3&year=2024 - Statistiques du mois
#[get("/stats")]
pub async fn get_stats(
    query: web::Query<StatsQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if !(1..=12).contains(&query.month) {
        return Err(AppError::BadRequest(format!("Invalid month: {}", query.month)));
    }

    match SessionService::monthly_stats(state.gateway.as_ref(), query.month, query.year).await {
        Some(stats) => Ok(HttpResponse::Ok().json(stats)),
        None => Ok(HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": "Failed to compute monthly statistics"
        }))),
    }
}

/// POST /api/sessions/{id}/versement - Versement bancaire (PROTÉGÉE)
#[post("/{id}/versement")]
pub async fn record_deposit(
    _auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<DepositRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    body.validate()?;

    let id = path.into_inner();
    let outcome = SessionService::record_deposit(
        state.gateway.as_ref(),
        id,
        body.versement,
        body.date_versement,
        &body.banque,
        body.charges,
    )
    .await;

    match outcome {
        DepositOutcome::Updated => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Versement enregistré"
        }))),
        DepositOutcome::NotFound => Err(AppError::NotFound(format!("Session {} introuvable", id))),
        DepositOutcome::Failed => Ok(HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "message": format!("Versement non enregistré pour la session {}", id)
        }))),
    }
}

/// POST /api/sessions/close - Fermeture avec total espèces final (PROTÉGÉE)
#[post("/close")]
pub async fn close_session(auth_user: AuthUser, state: web::Data<AppState>) -> HttpResponse {
    let date = state.local_session.session_date(&auth_user.token);
    let closed =
        SessionService::close_with_final_total(state.gateway.as_ref(), &auth_user.username, date)
            .await;

    if closed {
        HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "date": date
        }))
    } else {
        HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "date": date,
            "message": "Erreur lors de la fermeture de la session"
        }))
    }
}

/// GET /api/sessions/{id}/verify?date=... - Écart sans correction
#[get("/{id}/verify")]
pub async fn verify_session(
    path: web::Path<i32>,
    query: web::Query<VerifyQuery>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let discrepancy =
        ReconciliationService::verify_single(state.gateway.as_ref(), path.into_inner(), query.date)
            .await;

    HttpResponse::Ok().json(serde_json::json!({
        "has_discrepancy": discrepancy.is_some(),
        "discrepancy": discrepancy
    }))
}

pub fn sessions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/sessions")
            .service(get_today)
            .service(get_status)
            .service(get_recent)
            .service(get_stats)
            .service(get_range)
            .service(close_session)
            .service(record_deposit)
            .service(verify_session),
    );
}
