use chrono::{Days, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sea_orm::DbErr;
use tracing::{debug, error, info};

use crate::gateway::{SessionGateway, SessionQuery};
use crate::models::dto::{Discrepancy, PaymentTotals, SyncReport, TransactionsDetail};
use crate::models::rapport::ModePaiement;
use crate::models::sessions::SessionPatch;

pub struct ReconciliationService;

impl ReconciliationService {
    /// Écart au-delà duquel le total enregistré est corrigé (arrondi monétaire)
    pub fn tolerance() -> Decimal {
        Decimal::new(1, 2)
    }

    /// Total espèces de la journée depuis le rapport.
    /// Retourne 0 en cas d'erreur (purement informatif).
    pub async fn compute_cash_total(gateway: &dyn SessionGateway, date: NaiveDate) -> Decimal {
        match Self::try_compute_cash_total(gateway, date).await {
            Ok(total) => total,
            Err(e) => {
                error!(%date, error = %e, "Failed to compute cash total, using 0");
                Decimal::ZERO
            }
        }
    }

    async fn try_compute_cash_total(
        gateway: &dyn SessionGateway,
        date: NaiveDate,
    ) -> Result<Decimal, DbErr> {
        let (start, end) = day_bounds(date)?;

        let transactions = gateway
            .list_transactions(start, end, Some(ModePaiement::Espece))
            .await?;

        let total: Decimal = transactions.iter().map(|t| t.montant).sum();

        debug!(%date, %total, count = transactions.len(), "Total espèces calculé");
        Ok(total)
    }

    /// Recalcule le total espèces de chaque session et corrige les écarts.
    /// Ne touche jamais session_fermee, versement ni statut.
    pub async fn verify_and_sync(gateway: &dyn SessionGateway) -> SyncReport {
        let mut report = SyncReport::default();

        // 1. Récupérer toutes les sessions
        let sessions = match gateway.list_sessions(SessionQuery::default()).await {
            Ok(sessions) => sessions,
            Err(e) => {
                error!(error = %e, "Failed to load sessions for reconciliation");
                return report;
            }
        };

        info!(count = sessions.len(), "Vérification des totaux espèce");

        for session in sessions {
            report.checked += 1;

            // 2. Recalculer depuis le rapport; en cas d'erreur on saute ce cycle
            let calculated = match Self::try_compute_cash_total(gateway, session.date_session).await {
                Ok(total) => total,
                Err(e) => {
                    error!(id = session.id, date = %session.date_session, error = %e, "Skipping session, cash total unavailable");
                    report.failed += 1;
                    continue;
                }
            };

            if (calculated - session.total_espece).abs() <= Self::tolerance() {
                continue;
            }

            // 3. Corriger le total enregistré
            info!(id = session.id, from = %session.total_espece, to = %calculated, "Correction du total espèces");
            let patch = SessionPatch {
                total_espece: Some(calculated),
                ..Default::default()
            };
            match gateway.update_session(session.id, patch).await {
                Ok(_) => report.corrected += 1,
                Err(e) => {
                    error!(id = session.id, error = %e, "Failed to correct session total");
                    report.failed += 1;
                }
            }
        }

        info!(
            checked = report.checked,
            corrected = report.corrected,
            failed = report.failed,
            "Synchronisation des totaux espèce terminée"
        );
        report
    }

    /// Même comparaison pour une seule session, sans écriture
    pub async fn verify_single(
        gateway: &dyn SessionGateway,
        session_id: i32,
        date: NaiveDate,
    ) -> Option<Discrepancy> {
        let session = match gateway.find_session_by_id(session_id).await {
            Ok(Some(session)) => session,
            Ok(None) => {
                debug!(session_id, "No session to verify");
                return None;
            }
            Err(e) => {
                error!(session_id, error = %e, "Failed to load session for verification");
                return None;
            }
        };

        let calculated = match Self::try_compute_cash_total(gateway, date).await {
            Ok(total) => total,
            Err(e) => {
                error!(session_id, %date, error = %e, "Failed to compute cash total for verification");
                return None;
            }
        };

        let difference = calculated - session.total_espece;
        if difference.abs() <= Self::tolerance() {
            return None;
        }

        Some(Discrepancy {
            current_total: session.total_espece,
            calculated_total: calculated,
            difference,
        })
    }

    /// Détail des opérations du jour et totaux par mode de paiement
    pub async fn transactions_detail(gateway: &dyn SessionGateway, date: NaiveDate) -> TransactionsDetail {
        let transactions = match day_bounds(date) {
            Ok((start, end)) => gateway.list_transactions(start, end, None).await,
            Err(e) => Err(e),
        };

        let transactions = match transactions {
            Ok(transactions) => transactions,
            Err(e) => {
                error!(%date, error = %e, "Failed to load transactions detail");
                return TransactionsDetail::default();
            }
        };

        let mut totals = PaymentTotals::default();
        for t in &transactions {
            match t.mode() {
                Some(ModePaiement::Espece) => totals.espece += t.montant,
                Some(ModePaiement::Cheque) => totals.cheque += t.montant,
                Some(ModePaiement::CarteBancaire) => totals.carte += t.montant,
                Some(ModePaiement::Virement) => totals.virement += t.montant,
                None => {}
            }
            totals.total_general += t.montant;
        }

        TransactionsDetail { transactions, totals }
    }
}

/// [date 00:00:00, date+1 00:00:00)
fn day_bounds(date: NaiveDate) -> Result<(NaiveDateTime, NaiveDateTime), DbErr> {
    let next = date
        .checked_add_days(Days::new(1))
        .ok_or_else(|| DbErr::Custom(format!("Date out of range: {}", date)))?;

    Ok((
        date.and_time(chrono::NaiveTime::MIN),
        next.and_time(chrono::NaiveTime::MIN),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::memory::InMemoryGateway;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        day(d).and_hms_opt(h, m, 0).unwrap()
    }

    fn seeded() -> InMemoryGateway {
        let gateway = InMemoryGateway::new();
        gateway.seed_transaction(at(10, 0, 0), Decimal::new(20000, 2), ModePaiement::Espece);
        gateway.seed_transaction(at(10, 12, 30), Decimal::new(32340, 2), ModePaiement::Espece);
        gateway.seed_transaction(at(10, 14, 0), Decimal::new(1000, 0), ModePaiement::Cheque);
        gateway.seed_transaction(at(10, 16, 0), Decimal::new(80, 0), ModePaiement::CarteBancaire);
        gateway.seed_transaction(at(10, 17, 0), Decimal::new(40, 0), ModePaiement::Virement);
        // Hors journée
        gateway.seed_transaction(at(11, 0, 0), Decimal::new(999, 0), ModePaiement::Espece);
        gateway.seed_transaction(at(9, 23, 59), Decimal::new(111, 0), ModePaiement::Espece);
        gateway
    }

    #[tokio::test]
    async fn test_compute_cash_total_day_window() {
        let gateway = seeded();

        let total = ReconciliationService::compute_cash_total(&gateway, day(10)).await;

        assert_eq!(total, Decimal::new(52340, 2));
    }

    #[tokio::test]
    async fn test_compute_cash_total_error_is_zero() {
        let gateway = seeded();
        gateway.fail_transactions(true);

        let total = ReconciliationService::compute_cash_total(&gateway, day(10)).await;

        assert_eq!(total, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_verify_single_reports_discrepancy() {
        let gateway = seeded();
        let session = gateway.seed_session(day(10), "Ahlem", true, Decimal::new(500, 0));

        let discrepancy = ReconciliationService::verify_single(&gateway, session.id, day(10))
            .await
            .unwrap();

        assert_eq!(discrepancy.current_total, Decimal::new(500, 0));
        assert_eq!(discrepancy.calculated_total, Decimal::new(52340, 2));
        assert_eq!(discrepancy.difference, Decimal::new(2340, 2));
        // Lecture seule
        assert_eq!(
            gateway.session_on(day(10)).unwrap().total_espece,
            Decimal::new(500, 0)
        );
    }

    #[tokio::test]
    async fn test_verify_single_within_tolerance() {
        let gateway = seeded();
        let session = gateway.seed_session(day(10), "Ahlem", true, Decimal::new(52339, 2));

        assert_eq!(
            ReconciliationService::verify_single(&gateway, session.id, day(10)).await,
            None
        );
        assert_eq!(ReconciliationService::verify_single(&gateway, 404, day(10)).await, None);
    }

    #[tokio::test]
    async fn test_verify_and_sync_corrects_and_is_idempotent() {
        let gateway = seeded();
        gateway.seed_session(day(10), "Ahlem", true, Decimal::new(500, 0));
        gateway.seed_session(day(11), "Islem", false, Decimal::new(999, 0));

        let first = ReconciliationService::verify_and_sync(&gateway).await;
        assert_eq!(first.checked, 2);
        assert_eq!(first.corrected, 1);
        assert_eq!(
            gateway.session_on(day(10)).unwrap().total_espece,
            Decimal::new(52340, 2)
        );

        let before: Vec<_> = gateway.sessions().iter().map(|s| s.total_espece).collect();
        let second = ReconciliationService::verify_and_sync(&gateway).await;
        let after: Vec<_> = gateway.sessions().iter().map(|s| s.total_espece).collect();

        assert_eq!(second.corrected, 0);
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_verify_and_sync_never_touches_other_fields() {
        let gateway = seeded();
        let session = gateway.seed_session(day(10), "Ahlem", false, Decimal::ZERO);

        ReconciliationService::verify_and_sync(&gateway).await;

        let synced = gateway.session_on(day(10)).unwrap();
        assert_eq!(synced.total_espece, Decimal::new(52340, 2));
        assert_eq!(synced.session_fermee, session.session_fermee);
        assert_eq!(synced.versement, session.versement);
        assert_eq!(synced.statut, session.statut);
    }

    #[tokio::test]
    async fn test_new_cash_transaction_moves_total_by_its_amount() {
        let gateway = seeded();
        gateway.seed_session(day(10), "Ahlem", true, Decimal::ZERO);
        ReconciliationService::verify_and_sync(&gateway).await;
        let before = gateway.session_on(day(10)).unwrap().total_espece;

        gateway.seed_transaction(at(10, 18, 0), Decimal::new(4560, 2), ModePaiement::Espece);
        ReconciliationService::verify_and_sync(&gateway).await;
        let after = gateway.session_on(day(10)).unwrap().total_espece;

        assert_eq!(after - before, Decimal::new(4560, 2));
    }

    #[tokio::test]
    async fn test_verify_and_sync_skips_on_fetch_error() {
        let gateway = seeded();
        gateway.seed_session(day(10), "Ahlem", true, Decimal::new(500, 0));
        gateway.fail_transactions(true);

        let report = ReconciliationService::verify_and_sync(&gateway).await;

        assert_eq!(report.failed, 1);
        assert_eq!(report.corrected, 0);
        assert_eq!(
            gateway.session_on(day(10)).unwrap().total_espece,
            Decimal::new(500, 0)
        );
    }

    #[tokio::test]
    async fn test_transactions_detail_totals() {
        let gateway = seeded();

        let detail = ReconciliationService::transactions_detail(&gateway, day(10)).await;

        assert_eq!(detail.transactions.len(), 5);
        assert_eq!(detail.totals.espece, Decimal::new(52340, 2));
        assert_eq!(detail.totals.cheque, Decimal::new(1000, 0));
        assert_eq!(detail.totals.carte, Decimal::new(80, 0));
        assert_eq!(detail.totals.virement, Decimal::new(40, 0));
        assert_eq!(detail.totals.total_general, Decimal::new(164340, 2));
        assert!(
            detail
                .transactions
                .windows(2)
                .all(|w| w[0].created_at <= w[1].created_at)
        );
    }
}
