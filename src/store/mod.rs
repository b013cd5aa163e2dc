//! Store ports: the interfaces the handlers depend on, with the SQLite
//! adapter in `crate::db` and an in-memory adapter in [`memory`]. Swapping
//! adapters is a wiring change, not a handler change.

pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// A priced catalog item. The id is assigned by the store on creation and is
/// never reused within a table instance, deletions included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub price: f64,
}

/// Partial field replacement for an item; omitted fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
}

/// A named principal able to authenticate. `password_hash` stays inside the
/// store and auth layers; handlers only ever see the identity view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn create(&self, name: &str, price: f64) -> Result<Item, ApiError>;
    /// Store-defined order; unpaginated.
    async fn list(&self) -> Result<Vec<Item>, ApiError>;
    async fn get(&self, id: i64) -> Result<Option<Item>, ApiError>;
    /// Applies only the supplied fields; `None` when the id is unknown.
    async fn update(&self, id: i64, patch: ItemPatch) -> Result<Option<Item>, ApiError>;
    /// `true` when a row was removed.
    async fn delete(&self, id: i64) -> Result<bool, ApiError>;
    async fn count(&self) -> Result<i64, ApiError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Usernames are unique; creating a duplicate is an error.
    async fn create(&self, user: NewUser) -> Result<User, ApiError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError>;
    /// `true` when the user existed.
    async fn set_email(&self, username: &str, email: Option<&str>) -> Result<bool, ApiError>;
    async fn delete(&self, username: &str) -> Result<bool, ApiError>;
    async fn count(&self) -> Result<i64, ApiError>;
}
