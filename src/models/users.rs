use serde::Serialize;

/// Utilisateur de l'agence. Les identifiants sont en clair et figés :
/// il n'y a pas de table users, la liste est injectée au démarrage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub is_admin: bool,
}

impl User {
    pub fn new(username: &str, password: &str, is_admin: bool) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            is_admin,
        }
    }
}

/// Annuaire des utilisateurs autorisés (un seul administrateur)
#[derive(Debug, Clone)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    /// Correspondance exacte nom + mot de passe.
    /// Aucune distinction entre utilisateur inconnu et mauvais mot de passe.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<&User> {
        self.users
            .iter()
            .find(|u| u.username == username && u.password == password)
    }

    pub fn is_admin(&self, username: &str) -> bool {
        self.users
            .iter()
            .any(|u| u.username == username && u.is_admin)
    }

    /// Seul l'administrateur peut se reconnecter après fermeture de la session
    pub fn can_reconnect(&self, username: &str) -> bool {
        self.is_admin(username)
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new(vec![
            User::new("Hamza", "007H", true),
            User::new("Ahlem", "123", false),
            User::new("Islem", "456", false),
        ])
    }
}
