//! Passerelle en mémoire pour les tests : respecte la contrainte UNIQUE sur
//! date_session et permet d'injecter des pannes.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sea_orm::DbErr;

use super::{SessionGateway, SessionQuery};
use crate::models::rapport::{self, ModePaiement};
use crate::models::sessions::{self, NewSession, SessionPatch, STATUT_NON_VERSE};

#[derive(Default)]
struct State {
    sessions: Vec<sessions::Model>,
    transactions: Vec<rapport::Model>,
    next_session_id: i32,
    next_transaction_id: i32,
    fail_session_reads: bool,
    fail_session_writes: bool,
    fail_transactions: bool,
    fail_close_dates: HashSet<NaiveDate>,
    lost_race: Option<Option<NewSession>>,
    delete_before_update: bool,
    insert_calls: usize,
}

#[derive(Default)]
pub struct InMemoryGateway {
    state: Mutex<State>,
}

fn unavailable(what: &str) -> DbErr {
    DbErr::Custom(format!("connection refused while {}", what))
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_session(
        &self,
        date: NaiveDate,
        cree_par: &str,
        session_fermee: bool,
        total_espece: Decimal,
    ) -> sessions::Model {
        let mut state = self.state.lock().unwrap();
        state.next_session_id += 1;
        let model = sessions::Model {
            id: state.next_session_id,
            date_session: date,
            total_espece,
            versement: Decimal::ZERO,
            date_versement: None,
            charges: Decimal::ZERO,
            banque: None,
            statut: STATUT_NON_VERSE.to_string(),
            cree_par: cree_par.to_string(),
            session_fermee,
            created_at: None,
        };
        state.sessions.push(model.clone());
        model
    }

    pub fn seed_transaction(&self, created_at: NaiveDateTime, montant: Decimal, mode: ModePaiement) {
        let mut state = self.state.lock().unwrap();
        state.next_transaction_id += 1;
        let model = rapport::Model {
            id: state.next_transaction_id,
            type_operation: Some("Terme".to_string()),
            montant,
            mode_paiement: mode.as_str().to_string(),
            numero_contrat: None,
            assure: None,
            date_operation: Some(created_at.date()),
            created_at,
        };
        state.transactions.push(model);
    }

    pub fn sessions(&self) -> Vec<sessions::Model> {
        self.state.lock().unwrap().sessions.clone()
    }

    pub fn session_on(&self, date: NaiveDate) -> Option<sessions::Model> {
        self.sessions().into_iter().find(|s| s.date_session == date)
    }

    pub fn insert_calls(&self) -> usize {
        self.state.lock().unwrap().insert_calls
    }

    pub fn fail_session_reads(&self, fail: bool) {
        self.state.lock().unwrap().fail_session_reads = fail;
    }

    pub fn fail_session_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_session_writes = fail;
    }

    pub fn fail_transactions(&self, fail: bool) {
        self.state.lock().unwrap().fail_transactions = fail;
    }

    pub fn fail_close_on(&self, date: NaiveDate) {
        self.state.lock().unwrap().fail_close_dates.insert(date);
    }

    /// Le prochain `insert_session_if_absent` perd la course : la ligne gagnante
    /// (si `Some`) apparaît juste avant l'insertion, qui ne fait alors rien.
    pub fn simulate_lost_race(&self, winner: Option<NewSession>) {
        self.state.lock().unwrap().lost_race = Some(winner);
    }

    /// La ligne visée par le prochain `update_session` est supprimée avant l'écriture
    pub fn delete_before_next_update(&self) {
        self.state.lock().unwrap().delete_before_update = true;
    }

    fn insert_locked(state: &mut State, new_session: NewSession) -> sessions::Model {
        state.next_session_id += 1;
        let mut model = sessions::Model {
            id: state.next_session_id,
            date_session: new_session.date_session,
            total_espece: new_session.total_espece,
            versement: Decimal::ZERO,
            date_versement: None,
            charges: Decimal::ZERO,
            banque: None,
            statut: STATUT_NON_VERSE.to_string(),
            cree_par: new_session.cree_par,
            session_fermee: new_session.session_fermee,
            created_at: None,
        };
        model.created_at = Some(model.date_session.and_hms_opt(8, 0, 0).unwrap());
        state.sessions.push(model.clone());
        model
    }
}

#[async_trait]
impl SessionGateway for InMemoryGateway {
    async fn find_session_by_date(&self, date: NaiveDate) -> Result<Option<sessions::Model>, DbErr> {
        let state = self.state.lock().unwrap();
        if state.fail_session_reads {
            return Err(unavailable("reading sessions"));
        }
        Ok(state.sessions.iter().find(|s| s.date_session == date).cloned())
    }

    async fn find_session_by_id(&self, id: i32) -> Result<Option<sessions::Model>, DbErr> {
        let state = self.state.lock().unwrap();
        if state.fail_session_reads {
            return Err(unavailable("reading sessions"));
        }
        Ok(state.sessions.iter().find(|s| s.id == id).cloned())
    }

    async fn insert_session(&self, new_session: NewSession) -> Result<sessions::Model, DbErr> {
        let mut state = self.state.lock().unwrap();
        state.insert_calls += 1;
        if state.fail_session_writes {
            return Err(unavailable("inserting session"));
        }
        if state
            .sessions
            .iter()
            .any(|s| s.date_session == new_session.date_session)
        {
            return Err(DbErr::Custom(
                "duplicate key value violates unique constraint \"sessions_date_session_key\""
                    .to_string(),
            ));
        }
        Ok(Self::insert_locked(&mut state, new_session))
    }

    async fn insert_session_if_absent(
        &self,
        new_session: NewSession,
    ) -> Result<Option<sessions::Model>, DbErr> {
        let mut state = self.state.lock().unwrap();
        state.insert_calls += 1;
        if state.fail_session_writes {
            return Err(unavailable("inserting session"));
        }
        if let Some(winner) = state.lost_race.take() {
            if let Some(winner) = winner {
                Self::insert_locked(&mut state, winner);
            }
            return Ok(None);
        }
        if state
            .sessions
            .iter()
            .any(|s| s.date_session == new_session.date_session)
        {
            return Ok(None);
        }
        Ok(Some(Self::insert_locked(&mut state, new_session)))
    }

    async fn close_session_by_date(&self, date: NaiveDate) -> Result<u64, DbErr> {
        let mut state = self.state.lock().unwrap();
        if state.fail_session_writes || state.fail_close_dates.contains(&date) {
            return Err(unavailable("closing session"));
        }
        let mut affected = 0;
        for session in state.sessions.iter_mut().filter(|s| s.date_session == date) {
            session.session_fermee = true;
            affected += 1;
        }
        Ok(affected)
    }

    async fn update_session(&self, id: i32, patch: SessionPatch) -> Result<u64, DbErr> {
        let mut state = self.state.lock().unwrap();
        if state.fail_session_writes {
            return Err(unavailable("updating session"));
        }
        if std::mem::take(&mut state.delete_before_update) {
            state.sessions.retain(|s| s.id != id);
        }
        match state.sessions.iter_mut().find(|s| s.id == id) {
            Some(session) => {
                patch.apply_to(session);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn list_open_sessions_before(&self, date: NaiveDate) -> Result<Vec<sessions::Model>, DbErr> {
        let state = self.state.lock().unwrap();
        if state.fail_session_reads {
            return Err(unavailable("reading sessions"));
        }
        let mut open: Vec<_> = state
            .sessions
            .iter()
            .filter(|s| !s.session_fermee && s.date_session < date)
            .cloned()
            .collect();
        open.sort_by_key(|s| s.date_session);
        Ok(open)
    }

    async fn list_sessions(&self, query: SessionQuery) -> Result<Vec<sessions::Model>, DbErr> {
        let state = self.state.lock().unwrap();
        if state.fail_session_reads {
            return Err(unavailable("reading sessions"));
        }
        let mut rows: Vec<_> = state
            .sessions
            .iter()
            .filter(|s| query.from.is_none_or(|from| s.date_session >= from))
            .filter(|s| query.to.is_none_or(|to| s.date_session <= to))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date_session.cmp(&a.date_session));
        if let Some(limit) = query.limit {
            rows.truncate(limit as usize);
        }
        Ok(rows)
    }

    async fn list_transactions(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        mode: Option<ModePaiement>,
    ) -> Result<Vec<rapport::Model>, DbErr> {
        let state = self.state.lock().unwrap();
        if state.fail_transactions {
            return Err(unavailable("reading rapport"));
        }
        let mut rows: Vec<_> = state
            .transactions
            .iter()
            .filter(|t| t.created_at >= start && t.created_at < end)
            .filter(|t| mode.is_none_or(|m| t.mode_paiement == m.as_str()))
            .cloned()
            .collect();
        rows.sort_by_key(|t| t.created_at);
        Ok(rows)
    }
}
