//pour les réponses structurées des services
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{rapport, sessions};

/// Résultat de la vérification du statut d'une session pour une date.
/// Absence de ligne ou erreur de lecture => is_closed = true (fermée par défaut)
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub exists: bool,
    pub is_closed: bool,
    pub opened_by: Option<String>,
    pub record: Option<sessions::Model>,
    #[serde(skip_serializing)]
    pub lookup_failed: bool,
}

impl SessionStatus {
    pub fn absent() -> Self {
        Self {
            exists: false,
            is_closed: true,
            opened_by: None,
            record: None,
            lookup_failed: false,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            lookup_failed: true,
            ..Self::absent()
        }
    }

    pub fn from_record(record: sessions::Model) -> Self {
        Self {
            exists: true,
            is_closed: record.session_fermee,
            opened_by: Some(record.cree_par.clone()),
            record: Some(record),
            lookup_failed: false,
        }
    }
}

/// Écart entre le total espèces enregistré et le total recalculé
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Discrepancy {
    pub current_total: Decimal,
    pub calculated_total: Decimal,
    pub difference: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncReport {
    pub checked: usize,
    pub corrected: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SweepReport {
    pub found: usize,
    pub closed: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatutStats {
    pub count: usize,
    pub total: Decimal,
}

/// Statistiques mensuelles de la page versement bancaire
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlyStats {
    pub non_versees: StatutStats,
    pub versees: StatutStats,
    pub total_charges: Decimal,
    pub charges_premiere_quinzaine: Decimal,
    pub charges_deuxieme_quinzaine: Decimal,
}

/// Totaux par mode de paiement pour une journée
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PaymentTotals {
    pub espece: Decimal,
    pub cheque: Decimal,
    pub carte: Decimal,
    pub virement: Decimal,
    pub total_general: Decimal,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TransactionsDetail {
    pub transactions: Vec<rapport::Model>,
    pub totals: PaymentTotals,
}
