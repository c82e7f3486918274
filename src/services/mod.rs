/*
services/
├─ session_service.rs          ← session de caisse du jour (statut, ouverture, fermeture, versement)
├─ reconciliation_service.rs   ← total espèces recalculé depuis rapport
├─ sweeper.rs                  ← fermeture automatique après minuit
├─ local_session.rs            ← session locale du poste (une clé par jeton)
└─ auth_service.rs             ← connexion / reprise / déconnexion
*/
pub mod auth_service;
pub mod local_session;
pub mod reconciliation_service;
pub mod session_service;
pub mod sweeper;
