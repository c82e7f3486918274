use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::models::local_session::LocalSessionRecord;
use crate::services::session_service::{CreateOutcome, SessionService};
use crate::services::sweeper::SessionSweeper;
use crate::state::AppState;

/// Échecs de connexion, avec le message affiché à l'utilisateur
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Nom d'utilisateur ou mot de passe incorrect")]
    InvalidCredentials,

    #[error("Session fermée pour aujourd'hui. Veuillez réessayer demain.")]
    SessionClosed,

    #[error("Erreur lors de la création de la session")]
    SessionCreation,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginSuccess {
    pub username: String,
    pub is_admin: bool,
    pub message: String,
    pub session_exists: bool,
    pub token: String,
    pub record: LocalSessionRecord,
}

/// Issue de la reprise de session au démarrage
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RestoreOutcome {
    NoSession,
    Expired { username: String },
    SessionClosed { username: String },
    Restored { username: String, is_admin: bool, message: String },
}

pub struct AuthService;

impl AuthService {
    /// Connexion : identifiants, balayage des sessions expirées, porte journalière,
    /// création de la session du jour si besoin, puis écriture de la session locale.
    pub async fn authenticate(
        state: &AppState,
        username: &str,
        password: &str,
    ) -> Result<LoginSuccess, AuthError> {
        // 1. Vérifier les identifiants
        let user = match state.users.authenticate(username, password) {
            Some(user) => user.clone(),
            None => {
                info!(username, "Login refused: invalid credentials");
                return Err(AuthError::InvalidCredentials);
            }
        };

        // 2. Fermer les sessions des jours précédents
        let today = state.clock.today();
        SessionSweeper::sweep_expired(state.gateway.as_ref(), today).await;

        // 3. L'administrateur passe toujours, sans session journalière
        if user.is_admin {
            let session = state.local_session.save(&user.username);
            info!(username = %user.username, "Admin login");
            return Ok(LoginSuccess {
                message: format!("Bienvenue {} (Admin)", user.username),
                username: user.username,
                is_admin: true,
                session_exists: false,
                token: session.token,
                record: session.record,
            });
        }

        // 4. Porte journalière
        let session_exists = Self::open_daily_session(state, &user.username).await?;

        // 5. Session du poste
        let session = state.local_session.save(&user.username);
        let message = if session_exists {
            "Bienvenue - Session déjà ouverte"
        } else {
            "Bienvenue - Nouvelle session créée"
        };

        info!(username = %user.username, %today, session_exists, "Login accepted");
        Ok(LoginSuccess {
            username: user.username,
            is_admin: false,
            message: message.to_string(),
            session_exists,
            token: session.token,
            record: session.record,
        })
    }

    /// Retourne si la session du jour existait déjà
    async fn open_daily_session(state: &AppState, username: &str) -> Result<bool, AuthError> {
        let gateway = state.gateway.as_ref();
        let today = state.clock.today();

        let status = SessionService::check_status(gateway, today).await;

        // Lecture impossible => fermée par défaut
        if status.lookup_failed {
            warn!(username, %today, "Session status unavailable, refusing login");
            return Err(AuthError::SessionClosed);
        }

        if status.exists {
            if status.is_closed {
                info!(username, %today, "Login refused: session closed for today");
                return Err(AuthError::SessionClosed);
            }
            return Ok(true);
        }

        match SessionService::create_if_absent(gateway, today, username).await {
            Ok(CreateOutcome::Created(_)) => Ok(false),

            // Création concurrente : relire le statut de la ligne gagnante
            Ok(CreateOutcome::AlreadyExists) => {
                let status = SessionService::check_status(gateway, today).await;
                match (status.exists, status.is_closed) {
                    (true, false) => Ok(true),
                    (true, true) => Err(AuthError::SessionClosed),
                    _ => Err(AuthError::SessionCreation),
                }
            }

            Err(e) => {
                error!(username, %today, error = %e, "Failed to create daily session");
                Err(AuthError::SessionCreation)
            }
        }
    }

    /// Reprise automatique de la session du poste au démarrage.
    /// Sans jeton, il n'y a rien à reprendre.
    pub async fn restore(state: &AppState, token: Option<&str>) -> RestoreOutcome {
        let today = state.clock.today();
        SessionSweeper::sweep_expired(state.gateway.as_ref(), today).await;

        let Some(token) = token else {
            return RestoreOutcome::NoSession;
        };

        let record = match state.local_session.peek(token) {
            Some(record) if record.is_active => record,
            Some(_) => {
                state.local_session.clear(token);
                return RestoreOutcome::NoSession;
            }
            None => return RestoreOutcome::NoSession,
        };

        let username = record.username.clone();
        // Seul l'admin se reconnecte sans condition
        if state.users.can_reconnect(&username) {
            return RestoreOutcome::Restored {
                message: format!("Bienvenue {} (Admin) - Session réactivée", username),
                username,
                is_admin: true,
            };
        }

        // Session locale d'un autre jour : fermeture comptable de ce jour-là
        if !record.is_valid_on(today, false) {
            info!(username = %username, date = %record.login_date(), "Local session expired at midnight");
            SessionService::close_with_final_total(
                state.gateway.as_ref(),
                &username,
                record.login_date(),
            )
            .await;
            state.local_session.clear(token);
            return RestoreOutcome::Expired { username };
        }

        let status = SessionService::check_status(state.gateway.as_ref(), today).await;
        if status.exists && !status.is_closed {
            RestoreOutcome::Restored {
                username,
                is_admin: false,
                message: "Bienvenue - Session réactivée".to_string(),
            }
        } else {
            state.local_session.clear(token);
            RestoreOutcome::SessionClosed { username }
        }
    }

    /// Déconnexion. L'admin garde la session globale ; les autres ferment la
    /// session du jour avec le total espèces final.
    pub async fn logout(state: &AppState, token: &str, username: &str) -> bool {
        if state.users.is_admin(username) {
            info!(username, "Admin logout, daily session kept");
            state.local_session.clear(token);
            return true;
        }

        let date = state.local_session.session_date(token);
        let closed =
            SessionService::close_with_final_total(state.gateway.as_ref(), username, date).await;
        state.local_session.clear(token);

        if !closed {
            warn!(username, %date, "Logout completed but session could not be closed");
        }
        closed
    }
}
