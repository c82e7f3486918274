use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::local_session::LocalSessionRecord;
use crate::models::users::UserDirectory;
use crate::utils::clock::Clock;
use crate::utils::storage::SessionStorage;

pub const SESSION_KEY: &str = "session";

/// Connexion ouverte sur un poste : le jeton renvoyé au client et son enregistrement
#[derive(Debug, Clone)]
pub struct LocalSession {
    pub token: String,
    pub record: LocalSessionRecord,
}

/// Clé de stockage d'un poste : `session_<uuid>`.
/// Un jeton qui n'est pas un UUID ne correspond à aucune clé.
fn storage_key(token: &str) -> Option<String> {
    let token = Uuid::parse_str(token).ok()?;
    Some(format!("{}_{}", SESSION_KEY, token.hyphenated()))
}

/// Cache des connexions par poste, une entrée par jeton
#[derive(Clone)]
pub struct LocalSessionCache {
    storage: Arc<dyn SessionStorage>,
    users: Arc<UserDirectory>,
    clock: Arc<dyn Clock>,
}

impl LocalSessionCache {
    pub fn new(
        storage: Arc<dyn SessionStorage>,
        users: Arc<UserDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            storage,
            users,
            clock,
        }
    }

    /// Nouvelle connexion : jeton UUID v4 et enregistrement actif
    pub fn save(&self, username: &str) -> LocalSession {
        let token = Uuid::new_v4().hyphenated().to_string();
        let record = LocalSessionRecord::new(username, self.clock.now());

        match (storage_key(&token), serde_json::to_string(&record)) {
            (Some(key), Ok(json)) => self.storage.set(&key, &json),
            (_, Err(e)) => warn!(username, error = %e, "Failed to serialize local session"),
            (None, _) => warn!(username, "Generated token is not a valid key"),
        }

        LocalSession { token, record }
    }

    /// Enregistrement brut du poste, sans contrôle de date ni d'activité
    pub fn peek(&self, token: &str) -> Option<LocalSessionRecord> {
        let key = storage_key(token)?;
        let raw = self.storage.get(&key)?;
        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "Unreadable local session, clearing");
                self.storage.clear(&key);
                None
            }
        }
    }

    /// Session valide du poste : un enregistrement non-admin d'un autre jour
    /// est supprimé et considéré absent.
    pub fn get(&self, token: &str) -> Option<LocalSessionRecord> {
        let record = self.peek(token)?;

        let is_admin = self.users.is_admin(&record.username);
        if !record.is_valid_on(self.clock.today(), is_admin) {
            debug!(username = %record.username, "Local session expired at midnight");
            self.clear(token);
            return None;
        }

        record.is_active.then_some(record)
    }

    /// Date de la session du poste, aujourd'hui à défaut
    pub fn session_date(&self, token: &str) -> NaiveDate {
        self.get(token)
            .map(|record| record.login_date())
            .unwrap_or_else(|| self.clock.today())
    }

    pub fn clear(&self, token: &str) {
        if let Some(key) = storage_key(token) {
            self.storage.clear(&key);
        }
    }
}
