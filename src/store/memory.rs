//! In-memory store adapter. Backs the router in tests and anywhere a real
//! database is unwanted; semantics mirror the SQLite adapter, including
//! monotonic ids that survive deletions.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{Item, ItemPatch, ItemStore, NewUser, User, UserStore};
use crate::error::ApiError;

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    items: BTreeMap<i64, Item>,
    users: BTreeMap<i64, User>,
    last_item_id: i64,
    last_user_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, ApiError> {
        self.inner
            .lock()
            .map_err(|_| ApiError::Internal("memory store lock poisoned".to_owned()))
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn create(&self, name: &str, price: f64) -> Result<Item, ApiError> {
        let mut inner = self.lock()?;
        inner.last_item_id += 1;
        let item = Item {
            id: inner.last_item_id,
            name: name.to_owned(),
            price,
        };
        inner.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn list(&self) -> Result<Vec<Item>, ApiError> {
        Ok(self.lock()?.items.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Item>, ApiError> {
        Ok(self.lock()?.items.get(&id).cloned())
    }

    async fn update(&self, id: i64, patch: ItemPatch) -> Result<Option<Item>, ApiError> {
        let mut inner = self.lock()?;
        let Some(item) = inner.items.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            item.name = name;
        }
        if let Some(price) = patch.price {
            item.price = price;
        }
        Ok(Some(item.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, ApiError> {
        Ok(self.lock()?.items.remove(&id).is_some())
    }

    async fn count(&self) -> Result<i64, ApiError> {
        Ok(self.lock()?.items.len() as i64)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, ApiError> {
        let mut inner = self.lock()?;
        if inner.users.values().any(|u| u.username == user.username) {
            return Err(ApiError::Validation(format!(
                "username '{}' is already taken",
                user.username
            )));
        }
        inner.last_user_id += 1;
        let user = User {
            id: inner.last_user_id,
            username: user.username,
            password_hash: user.password_hash,
            full_name: user.full_name,
            email: user.email,
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .lock()?
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn set_email(&self, username: &str, email: Option<&str>) -> Result<bool, ApiError> {
        let mut inner = self.lock()?;
        let Some(user) = inner.users.values_mut().find(|u| u.username == username) else {
            return Ok(false);
        };
        user.email = email.map(str::to_owned);
        Ok(true)
    }

    async fn delete(&self, username: &str) -> Result<bool, ApiError> {
        let mut inner = self.lock()?;
        let Some(id) = inner
            .users
            .values()
            .find(|u| u.username == username)
            .map(|u| u.id)
        else {
            return Ok(false);
        };
        Ok(inner.users.remove(&id).is_some())
    }

    async fn count(&self) -> Result<i64, ApiError> {
        Ok(self.lock()?.users.len() as i64)
    }
}
