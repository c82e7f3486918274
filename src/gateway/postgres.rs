use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, TryInsertResult,
};

use super::{SessionGateway, SessionQuery};
use crate::models::rapport::{self, Column as RapportColumn, Entity as Rapport, ModePaiement};
use crate::models::sessions::{
    self, Column as SessionColumn, Entity as Sessions, NewSession, SessionPatch,
};

/// Passerelle Postgres via SeaORM
#[derive(Clone)]
pub struct SeaOrmGateway {
    db: DatabaseConnection,
}

impl SeaOrmGateway {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionGateway for SeaOrmGateway {
    async fn find_session_by_date(&self, date: NaiveDate) -> Result<Option<sessions::Model>, DbErr> {
        Sessions::find()
            .filter(SessionColumn::DateSession.eq(date))
            .one(&self.db)
            .await
    }

    async fn find_session_by_id(&self, id: i32) -> Result<Option<sessions::Model>, DbErr> {
        Sessions::find_by_id(id).one(&self.db).await
    }

    async fn insert_session(&self, new_session: NewSession) -> Result<sessions::Model, DbErr> {
        new_session.into_active_model().insert(&self.db).await
    }

    async fn insert_session_if_absent(
        &self,
        new_session: NewSession,
    ) -> Result<Option<sessions::Model>, DbErr> {
        let date = new_session.date_session;

        let result = Sessions::insert(new_session.into_active_model())
            .on_conflict(
                OnConflict::column(SessionColumn::DateSession)
                    .do_nothing()
                    .to_owned(),
            )
            .do_nothing()
            .exec(&self.db)
            .await?;

        match result {
            TryInsertResult::Inserted(_) => self.find_session_by_date(date).await,
            TryInsertResult::Conflicted | TryInsertResult::Empty => Ok(None),
        }
    }

    async fn close_session_by_date(&self, date: NaiveDate) -> Result<u64, DbErr> {
        let result = Sessions::update_many()
            .col_expr(SessionColumn::SessionFermee, Expr::value(true))
            .filter(SessionColumn::DateSession.eq(date))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn update_session(&self, id: i32, patch: SessionPatch) -> Result<u64, DbErr> {
        if patch.is_empty() {
            return Ok(0);
        }

        let result = Sessions::update_many()
            .set(patch.into_active_model())
            .filter(SessionColumn::Id.eq(id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn list_open_sessions_before(&self, date: NaiveDate) -> Result<Vec<sessions::Model>, DbErr> {
        Sessions::find()
            .filter(SessionColumn::SessionFermee.eq(false))
            .filter(SessionColumn::DateSession.lt(date))
            .order_by_asc(SessionColumn::DateSession)
            .all(&self.db)
            .await
    }

    async fn list_sessions(&self, query: SessionQuery) -> Result<Vec<sessions::Model>, DbErr> {
        let mut select = Sessions::find();

        if let Some(from) = query.from {
            select = select.filter(SessionColumn::DateSession.gte(from));
        }
        if let Some(to) = query.to {
            select = select.filter(SessionColumn::DateSession.lte(to));
        }

        select
            .order_by_desc(SessionColumn::DateSession)
            .limit(query.limit)
            .all(&self.db)
            .await
    }

    async fn list_transactions(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        mode: Option<ModePaiement>,
    ) -> Result<Vec<rapport::Model>, DbErr> {
        let mut select = Rapport::find()
            .filter(RapportColumn::CreatedAt.gte(start))
            .filter(RapportColumn::CreatedAt.lt(end));

        if let Some(mode) = mode {
            select = select.filter(RapportColumn::ModePaiement.eq(mode.as_str()));
        }

        select
            .order_by_asc(RapportColumn::CreatedAt)
            .all(&self.db)
            .await
    }
}
