use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Enregistrement local "qui est connecté", indépendant de la table sessions.
/// Sérialisé en JSON sous la clé `session_<jeton>`: {username, loginTime, isActive}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalSessionRecord {
    pub username: String,
    pub login_time: NaiveDateTime,
    pub is_active: bool,
}

impl LocalSessionRecord {
    pub fn new(username: &str, login_time: NaiveDateTime) -> Self {
        Self {
            username: username.to_string(),
            login_time,
            is_active: true,
        }
    }

    pub fn login_date(&self) -> NaiveDate {
        self.login_time.date()
    }

    /// Un enregistrement non-admin n'est valable que le jour de la connexion.
    /// L'enregistrement admin n'expire jamais.
    pub fn is_valid_on(&self, today: NaiveDate, is_admin: bool) -> bool {
        is_admin || self.login_date() == today
    }
}
