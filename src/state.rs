use std::sync::Arc;

use crate::gateway::SessionGateway;
use crate::models::users::UserDirectory;
use crate::services::local_session::LocalSessionCache;
use crate::utils::clock::Clock;
use crate::utils::storage::SessionStorage;

/// Dépendances partagées par les routes (web::Data<AppState>)
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn SessionGateway>,
    pub users: Arc<UserDirectory>,
    pub clock: Arc<dyn Clock>,
    pub local_session: LocalSessionCache,
}

impl AppState {
    pub fn new(
        gateway: Arc<dyn SessionGateway>,
        users: UserDirectory,
        clock: Arc<dyn Clock>,
        storage: Arc<dyn SessionStorage>,
    ) -> Self {
        let users = Arc::new(users);
        let local_session = LocalSessionCache::new(storage, users.clone(), clock.clone());

        Self {
            gateway,
            users,
            clock,
            local_session,
        }
    }
}
