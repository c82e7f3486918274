// ============================================================================
// MODÈLE : SESSIONS (session de caisse journalière)
// ============================================================================
//
// Description:
//   Une ligne par jour calendaire. La session est partagée par tous les
//   caissiers connectés ce jour-là.
//
// Colonnes de la table sessions:
//   - id (INTEGER, PRIMARY KEY, SERIAL)
//   - date_session (DATE, UNIQUE, NOT NULL)
//   - total_espece (NUMERIC) - cache du total espèces, recalculé depuis rapport
//   - versement (NUMERIC) - montant versé à la banque
//   - date_versement (DATE, NULL)
//   - charges (NUMERIC)
//   - banque (VARCHAR, NULL)
//   - statut (VARCHAR) - 'Non versé' | 'Versé'
//   - cree_par (VARCHAR) - utilisateur qui a ouvert / fermé la session
//   - session_fermee (BOOLEAN) - true = terminal pour cette date
//   - created_at (TIMESTAMP, DEFAULT CURRENT_TIMESTAMP)
//
// Cycle de vie:
//   Absente → Ouverte (session_fermee = false) → Fermée (session_fermee = true)
//   Absente → Fermée directement possible via la fermeture de fin de journée.
//
// ============================================================================

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

pub const STATUT_NON_VERSE: &str = "Non versé";
pub const STATUT_VERSE: &str = "Versé";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub date_session: Date,

    pub total_espece: Decimal,
    pub versement: Decimal,
    pub date_versement: Option<Date>,
    pub charges: Decimal,
    pub banque: Option<String>,
    pub statut: String,
    pub cree_par: String,
    pub session_fermee: bool,

    pub created_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_verse(&self) -> bool {
        self.statut == STATUT_VERSE
    }
}

/// Ligne à insérer dans `sessions` (l'id et created_at sont assignés par la BD)
#[derive(Debug, Clone, PartialEq)]
pub struct NewSession {
    pub date_session: NaiveDate,
    pub total_espece: Decimal,
    pub cree_par: String,
    pub session_fermee: bool,
}

impl NewSession {
    /// Session ouverte à la première connexion du jour
    pub fn opened(date_session: NaiveDate, cree_par: &str) -> Self {
        Self {
            date_session,
            total_espece: Decimal::ZERO,
            cree_par: cree_par.to_string(),
            session_fermee: false,
        }
    }

    /// Session créée directement fermée (fermeture sans connexion préalable)
    pub fn closed(date_session: NaiveDate, cree_par: &str, total_espece: Decimal) -> Self {
        Self {
            date_session,
            total_espece,
            cree_par: cree_par.to_string(),
            session_fermee: true,
        }
    }

    pub fn into_active_model(self) -> ActiveModel {
        ActiveModel {
            date_session: Set(self.date_session),
            total_espece: Set(self.total_espece),
            versement: Set(Decimal::ZERO),
            date_versement: Set(None),
            charges: Set(Decimal::ZERO),
            banque: Set(None),
            statut: Set(STATUT_NON_VERSE.to_string()),
            cree_par: Set(self.cree_par),
            session_fermee: Set(self.session_fermee),
            ..Default::default()
        }
    }
}

/// Mise à jour partielle d'une session : seuls les champs `Some` sont écrits
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionPatch {
    pub total_espece: Option<Decimal>,
    pub versement: Option<Decimal>,
    pub date_versement: Option<Option<NaiveDate>>,
    pub charges: Option<Decimal>,
    pub banque: Option<Option<String>>,
    pub statut: Option<String>,
    pub cree_par: Option<String>,
    pub session_fermee: Option<bool>,
}

impl SessionPatch {
    pub fn is_empty(&self) -> bool {
        *self == SessionPatch::default()
    }

    /// Convertit le patch en ActiveModel où seuls les champs présents sont `Set`
    pub fn into_active_model(self) -> ActiveModel {
        let mut model = <ActiveModel as Default>::default();
        if let Some(v) = self.total_espece {
            model.total_espece = Set(v);
        }
        if let Some(v) = self.versement {
            model.versement = Set(v);
        }
        if let Some(v) = self.date_versement {
            model.date_versement = Set(v);
        }
        if let Some(v) = self.charges {
            model.charges = Set(v);
        }
        if let Some(v) = self.banque {
            model.banque = Set(v);
        }
        if let Some(v) = self.statut {
            model.statut = Set(v);
        }
        if let Some(v) = self.cree_par {
            model.cree_par = Set(v);
        }
        if let Some(v) = self.session_fermee {
            model.session_fermee = Set(v);
        }
        model
    }

    /// Applique le patch sur un modèle déjà chargé
    pub fn apply_to(&self, model: &mut Model) {
        if let Some(v) = self.total_espece {
            model.total_espece = v;
        }
        if let Some(v) = self.versement {
            model.versement = v;
        }
        if let Some(v) = self.date_versement {
            model.date_versement = v;
        }
        if let Some(v) = self.charges {
            model.charges = v;
        }
        if let Some(v) = &self.banque {
            model.banque = v.clone();
        }
        if let Some(v) = &self.statut {
            model.statut = v.clone();
        }
        if let Some(v) = &self.cree_par {
            model.cree_par = v.clone();
        }
        if let Some(v) = self.session_fermee {
            model.session_fermee = v;
        }
    }
}
