// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//
// Liste des modules:
//   - health : Health check API
//   - sessions : Session de caisse journalière (table sessions, SeaORM)
//   - rapport : Journal des opérations encaissées (table rapport, lecture seule)
//   - users : Annuaire statique des utilisateurs (pas de table)
//   - local_session : Enregistrement local de la connexion en cours
//   - dto : Structures de réponse des services
//
// Points d'attention:
//   - Une seule ligne sessions par date (contrainte UNIQUE sur date_session)
//   - Les montants sont des Decimal, jamais des f64
//
// ============================================================================

pub mod dto;
pub mod health;
pub mod local_session;
pub mod rapport;
pub mod sessions;
pub mod users;
