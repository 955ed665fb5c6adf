// Class scheduling API
//
// Wraps the storage facade with class-specific operations. Every write that can
// grow a class checks members <= maxCapacity before persisting.

use chrono::{DateTime, Utc};

use crate::entities::{Class, Member};
use crate::error::{GymError, Result};
use crate::store::{CollectionKey, CollectionStore};

const KEY: CollectionKey = CollectionKey::Classes;

#[derive(Clone)]
pub struct ClassApi {
    store: CollectionStore,
}

impl ClassApi {
    pub fn new(store: CollectionStore) -> Self {
        Self { store }
    }

    pub async fn get_all(&self) -> Result<Vec<Class>> {
        self.store.get_all(KEY).await
    }

    pub async fn get(&self, id: i64) -> Result<Option<Class>> {
        self.store.get(KEY, id).await
    }

    /// Store a new class; its initial members must fit its capacity
    pub async fn create(&self, class: &Class) -> Result<()> {
        ensure_within_capacity(class, 0)?;
        self.store.create(KEY, class).await?;
        tracing::info!(class_id = class.id, "Class created");
        Ok(())
    }

    /// Replace a stored class; lowering capacity below the enrollment is rejected
    pub async fn update(&self, class: &Class) -> Result<()> {
        ensure_within_capacity(class, 0)?;
        self.store.update(KEY, class).await
    }

    pub async fn delete(&self, class_id: i64) -> Result<()> {
        if !self.store.delete(KEY, class_id).await? {
            return Err(GymError::not_found(KEY.as_str(), class_id));
        }
        tracing::info!(class_id, "Class deleted");
        Ok(())
    }

    /// Classes on the same calendar day (UTC) as `date`, or every class when `None`
    pub async fn get_by_date(&self, date: Option<DateTime<Utc>>) -> Result<Vec<Class>> {
        let classes = self.get_all().await?;
        let Some(date) = date else {
            return Ok(classes);
        };

        let day = date.date_naive();
        Ok(classes
            .into_iter()
            .filter(|c| c.date.date_naive() == day)
            .collect())
    }

    /// Enroll `members` in a class, rejecting the whole batch if it would not fit
    ///
    /// Members are appended as given; duplicates are not filtered out.
    pub async fn add_members(&self, class_id: i64, members: Vec<Member>) -> Result<()> {
        let mut class = self.require(class_id).await?;

        ensure_within_capacity(&class, members.len())?;

        let added = members.len();
        class.members.extend(members);
        self.store.update(KEY, &class).await?;

        tracing::info!(
            class_id,
            added,
            enrolled = class.members.len(),
            max_capacity = class.max_capacity,
            "Members added to class"
        );
        Ok(())
    }

    /// Drop a member from a class; removing someone not enrolled changes nothing
    pub async fn remove_member(&self, class_id: i64, member_id: i64) -> Result<()> {
        let mut class = self.require(class_id).await?;

        let before = class.members.len();
        class.members.retain(|m| m.id != member_id);
        if class.members.len() == before {
            tracing::debug!(class_id, member_id, "Member not enrolled, nothing to remove");
            return Ok(());
        }

        self.store.update(KEY, &class).await?;
        tracing::info!(class_id, member_id, "Member removed from class");
        Ok(())
    }

    /// Roster members not yet enrolled in the class
    pub async fn enrollable_members(&self, class_id: i64) -> Result<Vec<Member>> {
        let class = self.require(class_id).await?;
        let roster: Vec<Member> = self.store.get_all(CollectionKey::Members).await?;
        Ok(roster
            .into_iter()
            .filter(|m| !class.has_member(m.id))
            .collect())
    }

    async fn require(&self, class_id: i64) -> Result<Class> {
        self.get(class_id).await?.ok_or_else(|| {
            tracing::warn!(class_id, "Class not found");
            GymError::not_found(KEY.as_str(), class_id)
        })
    }
}

fn ensure_within_capacity(class: &Class, requested: usize) -> Result<()> {
    let current = class.members.len();
    if current + requested > class.max_capacity as usize {
        tracing::warn!(
            class_id = class.id,
            current,
            requested,
            max_capacity = class.max_capacity,
            "Class capacity exceeded"
        );
        return Err(GymError::CapacityExceeded {
            class_id: class.id,
            max_capacity: class.max_capacity,
            current,
            requested,
        });
    }
    Ok(())
}
