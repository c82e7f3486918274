// connexion BD

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

use crate::config::AppConfig;

pub async fn establish_connection(config: &AppConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.database_url.clone());
    // Les requêtes sqlx sont trop bavardes au niveau info
    options.sqlx_logging(false);

    Database::connect(options).await
}
