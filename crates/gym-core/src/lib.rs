//! # Gym management core
//!
//! Class scheduling and member roster management over a pluggable key-value store.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────┐   ┌──────────────────────────┐
//! │        ClassApi          │   │        MemberApi         │
//! │ (capacity, day filter)   │   │ (roster, search)         │
//! └──────────────────────────┘   └──────────────────────────┘
//!               │                             │
//!               └──────────────┬──────────────┘
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     CollectionStore                          │
//! │  (async CRUD over JSON arrays, one key per collection)      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   dyn KeyValueStore                          │
//! │  (InMemoryKeyValueStore, FileKeyValueStore)                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use gym_core::{Gym, InMemoryKeyValueStore};
//!
//! let gym = Gym::new(Arc::new(InMemoryKeyValueStore::new()));
//! let _classes = gym.classes();
//! ```

pub mod auth;
pub mod class_api;
pub mod config;
pub mod entities;
pub mod error;
pub mod forms;
pub mod kv;
pub mod member_api;
pub mod seed;
pub mod store;

use std::sync::Arc;

pub use auth::{LoginCredentials, Session};
pub use class_api::ClassApi;
pub use config::GymConfig;
pub use entities::{generate_id, Address, Class, ClassStatus, Member, Record};
pub use error::{FieldError, GymError, Result, ValidationErrors};
pub use forms::{ClassDraft, MemberDraft};
pub use kv::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore};
pub use member_api::MemberApi;
pub use seed::{SampleData, Seeder};
pub use store::{CollectionKey, CollectionStore};

/// Domain APIs wired to one shared store
///
/// Construct once per process and hand out the APIs; nothing reaches the
/// store any other way.
#[derive(Clone)]
pub struct Gym {
    store: CollectionStore,
    classes: ClassApi,
    members: MemberApi,
}

impl Gym {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        let store = CollectionStore::new(kv);
        Self {
            classes: ClassApi::new(store.clone()),
            members: MemberApi::new(store.clone()),
            store,
        }
    }

    pub fn classes(&self) -> &ClassApi {
        &self.classes
    }

    pub fn members(&self) -> &MemberApi {
        &self.members
    }

    /// Raw facade, for lookup lists and bootstrap
    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    pub fn seeder(&self) -> Seeder {
        Seeder::new(self.store.clone())
    }
}
