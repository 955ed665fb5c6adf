// Member roster API
//
// Thin pass-through over the storage facade plus the roster search.

use crate::entities::Member;
use crate::error::{GymError, Result};
use crate::store::{CollectionKey, CollectionStore};

const KEY: CollectionKey = CollectionKey::Members;

#[derive(Clone)]
pub struct MemberApi {
    store: CollectionStore,
}

impl MemberApi {
    pub fn new(store: CollectionStore) -> Self {
        Self { store }
    }

    pub async fn get_all(&self) -> Result<Vec<Member>> {
        self.store.get_all(KEY).await
    }

    pub async fn get(&self, id: i64) -> Result<Option<Member>> {
        self.store.get(KEY, id).await
    }

    pub async fn create(&self, member: &Member) -> Result<()> {
        self.store.create(KEY, member).await?;
        tracing::info!(member_id = member.id, "Member created");
        Ok(())
    }

    pub async fn update(&self, member: &Member) -> Result<()> {
        self.store.update(KEY, member).await
    }

    /// Remove a member from the roster; class enrollments keep their own copy
    pub async fn delete(&self, member_id: i64) -> Result<()> {
        if !self.store.delete(KEY, member_id).await? {
            return Err(GymError::not_found(KEY.as_str(), member_id));
        }
        tracing::info!(member_id, "Member deleted");
        Ok(())
    }

    /// Members whose name contains `term` (case-insensitive) or whose document contains it
    pub async fn search(&self, term: &str) -> Result<Vec<Member>> {
        let members = self.get_all().await?;
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Ok(members);
        }

        Ok(members
            .into_iter()
            .filter(|m| {
                m.name.to_lowercase().contains(&term)
                    || m.document.as_deref().is_some_and(|d| d.contains(&term))
            })
            .collect())
    }
}
