use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tracing::{error, info, warn};

use crate::gateway::{SessionGateway, SessionQuery};
use crate::models::dto::{MonthlyStats, SessionStatus};
use crate::models::sessions::{self, NewSession, SessionPatch, STATUT_NON_VERSE, STATUT_VERSE};
use crate::services::reconciliation_service::ReconciliationService;

pub const DEFAULT_RECENT_LIMIT: u64 = 10;

/// Résultat d'une création protégée par la contrainte UNIQUE
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    Created(sessions::Model),
    AlreadyExists,
}

/// Résultat de l'enregistrement d'un versement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepositOutcome {
    Updated,
    NotFound,
    Failed,
}

/// Propriétaire de la ligne sessions du jour : lecture, ouverture, fermeture,
/// versement bancaire. Aucune erreur de persistance ne sort d'ici.
pub struct SessionService;

impl SessionService {
    /// Statut de la session pour une date.
    /// Pas de ligne ou erreur de lecture => considérée fermée.
    pub async fn check_status(gateway: &dyn SessionGateway, date: NaiveDate) -> SessionStatus {
        match gateway.find_session_by_date(date).await {
            Ok(Some(record)) => SessionStatus::from_record(record),
            Ok(None) => SessionStatus::absent(),
            Err(e) => {
                error!(%date, error = %e, "Failed to check session status, treating as closed");
                SessionStatus::unavailable()
            }
        }
    }

    /// Crée la session ouverte du jour. Échoue si une ligne existe déjà pour la date.
    pub async fn create(gateway: &dyn SessionGateway, date: NaiveDate, username: &str) -> bool {
        match gateway.insert_session(NewSession::opened(date, username)).await {
            Ok(session) => {
                info!(%date, username, id = session.id, "Nouvelle session créée");
                true
            }
            Err(e) => {
                error!(%date, username, error = %e, "Failed to create session");
                false
            }
        }
    }

    /// Création "compare-and-swap" : INSERT ... ON CONFLICT DO NOTHING
    pub async fn create_if_absent(
        gateway: &dyn SessionGateway,
        date: NaiveDate,
        username: &str,
    ) -> Result<CreateOutcome, sea_orm::DbErr> {
        match gateway
            .insert_session_if_absent(NewSession::opened(date, username))
            .await?
        {
            Some(session) => {
                info!(%date, username, id = session.id, "Nouvelle session créée");
                Ok(CreateOutcome::Created(session))
            }
            None => {
                warn!(%date, username, "Session already created concurrently");
                Ok(CreateOutcome::AlreadyExists)
            }
        }
    }

    /// Ferme la session de la date (session_fermee = true)
    pub async fn close(gateway: &dyn SessionGateway, date: NaiveDate) -> bool {
        match gateway.close_session_by_date(date).await {
            Ok(0) => {
                warn!(%date, "No session to close");
                false
            }
            Ok(_) => {
                info!(%date, "Session fermée");
                true
            }
            Err(e) => {
                error!(%date, error = %e, "Failed to close session");
                false
            }
        }
    }

    /// Enregistre le versement bancaire et passe le statut à "Versé".
    /// Ne touche ni session_fermee ni total_espece.
    pub async fn record_deposit(
        gateway: &dyn SessionGateway,
        id: i32,
        versement: Decimal,
        date_versement: NaiveDate,
        banque: &str,
        charges: Decimal,
    ) -> DepositOutcome {
        let patch = SessionPatch {
            versement: Some(versement),
            date_versement: Some(Some(date_versement)),
            banque: Some(Some(banque.to_string())),
            charges: Some(charges),
            statut: Some(STATUT_VERSE.to_string()),
            ..Default::default()
        };

        match gateway.update_session(id, patch).await {
            Ok(0) => {
                warn!(id, "No session found for deposit");
                DepositOutcome::NotFound
            }
            Ok(_) => {
                info!(id, %versement, banque, "Versement mis à jour");
                DepositOutcome::Updated
            }
            Err(e) => {
                error!(id, error = %e, "Failed to record deposit");
                DepositOutcome::Failed
            }
        }
    }

    /// Fermeture de fin de journée (déconnexion) : recalcule le total espèces
    /// puis met à jour la ligne existante ou insère une ligne déjà fermée.
    /// Idempotent.
    pub async fn close_with_final_total(
        gateway: &dyn SessionGateway,
        username: &str,
        date: NaiveDate,
    ) -> bool {
        let total_espece = ReconciliationService::compute_cash_total(gateway, date).await;

        // 1. Chercher la session existante pour cette date
        let existing = match gateway.find_session_by_date(date).await {
            Ok(existing) => existing,
            Err(e) => {
                error!(%date, error = %e, "Failed to load session before closing");
                return false;
            }
        };

        match existing {
            // 2a. Si existe → UPDATE et fermeture
            Some(session) => {
                let patch = SessionPatch {
                    total_espece: Some(total_espece),
                    session_fermee: Some(true),
                    cree_par: Some(username.to_string()),
                    ..Default::default()
                };

                match gateway.update_session(session.id, patch).await {
                    Ok(0) => {
                        warn!(%date, id = session.id, "Session disappeared before closing");
                        false
                    }
                    Ok(_) => {
                        info!(%date, username, %total_espece, "Session mise à jour et fermée");
                        true
                    }
                    Err(e) => {
                        error!(%date, error = %e, "Failed to update session on close");
                        false
                    }
                }
            }

            // 2b. Si n'existe pas → INSERT d'une session fermée
            None => {
                let new_session = NewSession::closed(date, username, total_espece);
                match gateway.insert_session(new_session).await {
                    Ok(_) => {
                        info!(%date, username, %total_espece, "Nouvelle session créée et fermée");
                        true
                    }
                    Err(e) => {
                        error!(%date, error = %e, "Failed to insert closed session");
                        false
                    }
                }
            }
        }
    }

    pub async fn today_session(
        gateway: &dyn SessionGateway,
        today: NaiveDate,
    ) -> Option<sessions::Model> {
        match gateway.find_session_by_date(today).await {
            Ok(session) => session,
            Err(e) => {
                error!(%today, error = %e, "Failed to load today's session");
                None
            }
        }
    }

    /// Ouverte = la ligne existe et n'est pas fermée. Erreur => pas ouverte.
    pub async fn is_today_open(gateway: &dyn SessionGateway, today: NaiveDate) -> bool {
        Self::today_session(gateway, today)
            .await
            .is_some_and(|s| !s.session_fermee)
    }

    pub async fn recent(gateway: &dyn SessionGateway, limit: u64) -> Vec<sessions::Model> {
        let query = SessionQuery {
            limit: Some(limit),
            ..Default::default()
        };
        gateway.list_sessions(query).await.unwrap_or_else(|e| {
            error!(limit, error = %e, "Failed to load recent sessions");
            Vec::new()
        })
    }

    pub async fn by_date_range(
        gateway: &dyn SessionGateway,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Vec<sessions::Model> {
        let query = SessionQuery {
            from: Some(from),
            to: Some(to),
            limit: None,
        };
        gateway.list_sessions(query).await.unwrap_or_else(|e| {
            error!(%from, %to, error = %e, "Failed to load sessions by date range");
            Vec::new()
        })
    }

    /// Statistiques du mois : non versées (total espèces), versées (versements),
    /// charges totales et par quinzaine. None si le mois est invalide ou en cas d'erreur.
    pub async fn monthly_stats(
        gateway: &dyn SessionGateway,
        month: u32,
        year: i32,
    ) -> Option<MonthlyStats> {
        let (from, to) = month_bounds(month, year)?;

        let query = SessionQuery {
            from: Some(from),
            to: Some(to),
            limit: None,
        };
        let sessions = match gateway.list_sessions(query).await {
            Ok(sessions) => sessions,
            Err(e) => {
                error!(month, year, error = %e, "Failed to load monthly stats");
                return None;
            }
        };

        Some(compute_monthly_stats(&sessions))
    }
}

/// Premier et dernier jour du mois
fn month_bounds(month: u32, year: i32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next_month.pred_opt()?))
}

fn compute_monthly_stats(sessions: &[sessions::Model]) -> MonthlyStats {
    let mut stats = MonthlyStats::default();

    for session in sessions {
        if session.is_verse() {
            stats.versees.count += 1;
            stats.versees.total += session.versement;
        } else if session.statut == STATUT_NON_VERSE {
            stats.non_versees.count += 1;
            stats.non_versees.total += session.total_espece;
        }

        stats.total_charges += session.charges;
        if session.date_session.day() <= 15 {
            stats.charges_premiere_quinzaine += session.charges;
        } else {
            stats.charges_deuxieme_quinzaine += session.charges;
        }
    }

    stats
}
