//! Accès aux tables `sessions` et `rapport`.
//!
//! Les services ne connaissent que ce trait : l'implémentation SeaORM parle à
//! Postgres, l'implémentation mémoire sert aux tests.

pub mod postgres;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::DbErr;

use crate::models::rapport::{self, ModePaiement};
use crate::models::sessions::{self, NewSession, SessionPatch};

pub use postgres::SeaOrmGateway;

/// Filtre de lecture des sessions, toujours triées par date décroissante
#[derive(Debug, Clone, Default)]
pub struct SessionQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<u64>,
}

#[async_trait]
pub trait SessionGateway: Send + Sync {
    async fn find_session_by_date(&self, date: NaiveDate) -> Result<Option<sessions::Model>, DbErr>;

    async fn find_session_by_id(&self, id: i32) -> Result<Option<sessions::Model>, DbErr>;

    /// INSERT simple : échoue sur la contrainte UNIQUE si la date existe déjà
    async fn insert_session(&self, new_session: NewSession) -> Result<sessions::Model, DbErr>;

    /// INSERT ... ON CONFLICT (date_session) DO NOTHING.
    /// Retourne None si une ligne existait déjà pour cette date.
    async fn insert_session_if_absent(
        &self,
        new_session: NewSession,
    ) -> Result<Option<sessions::Model>, DbErr>;

    /// Passe session_fermee à true pour la date. Retourne le nombre de lignes touchées.
    async fn close_session_by_date(&self, date: NaiveDate) -> Result<u64, DbErr>;

    async fn update_session(&self, id: i32, patch: SessionPatch) -> Result<u64, DbErr>;

    /// Sessions encore ouvertes dont la date est strictement antérieure à `date`
    async fn list_open_sessions_before(&self, date: NaiveDate) -> Result<Vec<sessions::Model>, DbErr>;

    async fn list_sessions(&self, query: SessionQuery) -> Result<Vec<sessions::Model>, DbErr>;

    /// Opérations du rapport dont created_at est dans [start, end), triées par heure
    async fn list_transactions(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        mode: Option<ModePaiement>,
    ) -> Result<Vec<rapport::Model>, DbErr>;
}
