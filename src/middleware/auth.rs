use actix_web::{dev::Payload, web, Error, FromRequest, HttpRequest};
use chrono::NaiveDateTime;
use futures::future::{ready, Ready};
use serde::Serialize;

use crate::errors::AppError;
use crate::state::AppState;

/// Utilisateur connecté sur le poste appelant, retrouvé par son jeton
/// Utilisée comme extracteur dans les routes protégées
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    pub username: String,
    pub is_admin: bool,
    pub login_time: NaiveDateTime,
    #[serde(skip_serializing)]
    pub token: String,
}

/// Variante réservée à l'administrateur
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

/// Jeton du header `Authorization: Bearer <token>`
pub fn bearer_token(req: &HttpRequest) -> Result<&str, AppError> {
    // 1. Extraire le header Authorization
    let header = req
        .headers()
        .get("Authorization")
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    // 2. Convertir le header en string
    let value = header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header".to_string()))?;

    // 3. Format "Bearer <token>"
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            AppError::Unauthorized(
                "Invalid Authorization format (expected: Bearer <token>)".to_string(),
            )
        })
}

fn extract_auth_user(req: &HttpRequest) -> Result<AuthUser, AppError> {
    let token = bearer_token(req)?;

    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Config("Application state not configured".to_string()))?;

    // 4. Session du poste (expirée à minuit pour les non-admins)
    let record = state
        .local_session
        .get(token)
        .ok_or_else(|| AppError::Unauthorized("No active session".to_string()))?;

    Ok(AuthUser {
        is_admin: state.users.is_admin(&record.username),
        username: record.username,
        login_time: record.login_time,
        token: token.to_string(),
    })
}

/// Implémentation de FromRequest pour AuthUser
impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_auth_user(req).map_err(Error::from))
    }
}

impl FromRequest for AdminUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = extract_auth_user(req).and_then(|user| {
            if user.is_admin {
                Ok(AdminUser(user))
            } else {
                Err(AppError::Forbidden("Admin access required".to_string()))
            }
        });
        ready(result.map_err(Error::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_bearer_token_parsing() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc-123"))
            .to_http_request();
        assert_eq!(bearer_token(&req).unwrap(), "abc-123");

        let missing = TestRequest::default().to_http_request();
        assert!(matches!(bearer_token(&missing), Err(AppError::Unauthorized(_))));

        let basic = TestRequest::default()
            .insert_header(("Authorization", "Basic abc"))
            .to_http_request();
        assert!(matches!(bearer_token(&basic), Err(AppError::Unauthorized(_))));

        let empty = TestRequest::default()
            .insert_header(("Authorization", "Bearer "))
            .to_http_request();
        assert!(bearer_token(&empty).is_err());
    }
}
