use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::middleware::auth::bearer_token;
use crate::middleware::AuthUser;
use crate::services::auth_service::{AuthError, AuthService};
use crate::state::AppState;

// DTO pour la connexion
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// Réponse après login réussi
#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub username: String,
    pub is_admin: bool,
    pub session_exists: bool,
}

/// POST /auth/login - Se connecter (PUBLIC)
/// Le jeton renvoyé identifie le poste : `Authorization: Bearer <token>`
#[post("/login")]
pub async fn login(body: web::Json<LoginRequest>, state: web::Data<AppState>) -> HttpResponse {
    match AuthService::authenticate(&state, &body.username, &body.password).await {
        Ok(success) => HttpResponse::Ok().json(LoginResponse {
            success: true,
            message: success.message,
            token: success.token,
            username: success.username,
            is_admin: success.is_admin,
            session_exists: success.session_exists,
        }),
        Err(e) => {
            let mut response = match e {
                AuthError::InvalidCredentials => HttpResponse::Unauthorized(),
                AuthError::SessionClosed => HttpResponse::Forbidden(),
                AuthError::SessionCreation => HttpResponse::InternalServerError(),
            };
            response.json(serde_json::json!({
                "success": false,
                "message": e.to_string()
            }))
        }
    }
}

/// GET /auth/restore - Reprise de la session du poste au démarrage (PUBLIC)
/// Sans jeton valide : {"status": "no_session"}
#[get("/restore")]
pub async fn restore(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let token = bearer_token(&req).ok();
    HttpResponse::Ok().json(AuthService::restore(&state, token).await)
}

/// GET /auth/me - Session du poste en cours (PROTÉGÉE)
#[get("/me")]
pub async fn me(auth_user: AuthUser) -> HttpResponse {
    HttpResponse::Ok().json(auth_user)
}

/// POST /auth/logout - Fermeture de la session (PROTÉGÉE)
#[post("/logout")]
pub async fn logout(auth_user: AuthUser, state: web::Data<AppState>) -> HttpResponse {
    let session_closed =
        AuthService::logout(&state, &auth_user.token, &auth_user.username).await;

    let message = if auth_user.is_admin {
        "Déconnexion réussie - Session admin maintenue"
    } else if session_closed {
        "Déconnexion réussie - Session fermée"
    } else {
        "Déconnexion effectuée - Erreur lors de la fermeture de la session"
    };

    HttpResponse::Ok().json(serde_json::json!({
        "success": session_closed,
        "message": message
    }))
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(login)
            .service(restore)
            .service(me)
            .service(logout),
    );
}
