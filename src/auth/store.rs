use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

use super::model::User;

/// In-memory user store keyed by id, with username lookups for login.
#[derive(Default)]
pub struct UserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl UserStore {
    pub fn insert(&self, user: User) {
        self.users.write().insert(user.id, user);
    }

    pub fn get_by_id(&self, id: &Uuid) -> Option<User> {
        self.users.read().get(id).cloned()
    }

    pub fn find_by_username(&self, username: &str) -> Option<User> {
        self.users
            .read()
            .values()
            .find(|user| user.username == username)
            .cloned()
    }
}
