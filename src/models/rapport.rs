// ============================================================================
// MODÈLE : RAPPORT (journal des opérations encaissées)
// ============================================================================
//
// Description:
//   Journal append-only de toutes les opérations (encaissements de termes,
//   crédits, recettes exceptionnelles...). Source de vérité pour le calcul
//   du total espèces d'une journée. Ce backend ne fait que LIRE cette table.
//
// Colonnes utilisées:
//   - montant (NUMERIC)
//   - mode_paiement (VARCHAR) - 'Espece', 'Cheque', 'Carte Bancaire', 'Virement'
//   - type (VARCHAR) - nature de l'opération
//   - date_operation (DATE, NULL)
//   - created_at (TIMESTAMP) - horodatage utilisé pour le rapprochement
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rapport")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[serde(rename = "type")]
    #[sea_orm(column_name = "type")]
    pub type_operation: Option<String>,
    pub montant: Decimal,
    pub mode_paiement: String,
    pub numero_contrat: Option<String>,
    pub assure: Option<String>,
    pub date_operation: Option<Date>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Modes de paiement tels qu'écrits dans la colonne `mode_paiement`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModePaiement {
    #[serde(rename = "Espece")]
    Espece,
    #[serde(rename = "Cheque")]
    Cheque,
    #[serde(rename = "Carte Bancaire")]
    CarteBancaire,
    #[serde(rename = "Virement")]
    Virement,
}

impl ModePaiement {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModePaiement::Espece => "Espece",
            ModePaiement::Cheque => "Cheque",
            ModePaiement::CarteBancaire => "Carte Bancaire",
            ModePaiement::Virement => "Virement",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Espece" => Some(ModePaiement::Espece),
            "Cheque" => Some(ModePaiement::Cheque),
            "Carte Bancaire" => Some(ModePaiement::CarteBancaire),
            "Virement" => Some(ModePaiement::Virement),
            _ => None,
        }
    }
}

impl Model {
    pub fn mode(&self) -> Option<ModePaiement> {
        ModePaiement::parse(&self.mode_paiement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_paiement_strings() {
        for mode in [
            ModePaiement::Espece,
            ModePaiement::Cheque,
            ModePaiement::CarteBancaire,
            ModePaiement::Virement,
        ] {
            assert_eq!(ModePaiement::parse(mode.as_str()), Some(mode));
        }
        assert_eq!(ModePaiement::parse("espece"), None);
        assert_eq!(
            serde_json::to_string(&ModePaiement::CarteBancaire).unwrap(),
            "\"Carte Bancaire\""
        );
    }
}
