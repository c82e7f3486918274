use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::gateway::SessionGateway;
use crate::models::dto::SweepReport;
use crate::services::session_service::SessionService;
use crate::utils::clock::Clock;

/// Fermeture automatique des sessions restées ouvertes après minuit
pub struct SessionSweeper;

impl SessionSweeper {
    /// Ferme une à une les sessions ouvertes dont la date est passée.
    /// Un échec n'arrête pas le balayage des lignes suivantes.
    pub async fn sweep_expired(gateway: &dyn SessionGateway, today: NaiveDate) -> SweepReport {
        let mut report = SweepReport::default();

        let open_sessions = match gateway.list_open_sessions_before(today).await {
            Ok(sessions) => sessions,
            Err(e) => {
                error!(%today, error = %e, "Failed to load open sessions");
                return report;
            }
        };

        if open_sessions.is_empty() {
            return report;
        }

        report.found = open_sessions.len();
        info!(count = report.found, "Sessions à fermer automatiquement");

        for session in open_sessions {
            if SessionService::close(gateway, session.date_session).await {
                report.closed += 1;
            } else {
                report.failed += 1;
            }
        }

        info!(closed = report.closed, failed = report.failed, "Fermeture automatique des sessions terminée");
        report
    }

    /// Balayage périodique. Le premier tick immédiat est consommé :
    /// le balayage de démarrage est fait par l'appelant.
    pub fn spawn(
        gateway: Arc<dyn SessionGateway>,
        clock: Arc<dyn Clock>,
        every: Duration,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.tick().await;

            loop {
                interval.tick().await;
                Self::sweep_expired(gateway.as_ref(), clock.today()).await;
            }
        })
    }
}
