// Integration tests for the class and member APIs over the storage facade
//
// Everything runs against InMemoryKeyValueStore through the public API only.
//
// Run with: cargo test -p gym-core --test class_membership_test

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use gym_core::{
    Address, Class, ClassDraft, CollectionKey, FileKeyValueStore, Gym, GymError,
    InMemoryKeyValueStore, KeyValueStore, Member, MemberDraft,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 1, 8, 0, 0).unwrap()
}

fn setup() -> (Arc<InMemoryKeyValueStore>, Gym) {
    let kv = Arc::new(InMemoryKeyValueStore::new());
    let gym = Gym::new(kv.clone());
    (kv, gym)
}

fn member_draft(name: &str) -> MemberDraft {
    MemberDraft {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        birth_date: Utc.with_ymd_and_hms(1992, 6, 15, 0, 0, 0).unwrap(),
        document: None,
        address: None,
        payment_plan: "Monthly".to_string(),
    }
}

async fn create_member(gym: &Gym, id: i64, name: &str) -> Member {
    let member = member_draft(name).into_member(id, now()).unwrap();
    gym.members().create(&member).await.unwrap();
    member
}

async fn create_class(gym: &Gym, id: i64, capacity: u32, date: DateTime<Utc>) -> Class {
    let class = ClassDraft::new(format!("Class {id}"), "Yoga", date)
        .with_max_capacity(capacity)
        .into_class(id, now())
        .unwrap();
    gym.classes().create(&class).await.unwrap();
    class
}

#[tokio::test]
async fn test_created_class_round_trips_unchanged() {
    let (_, gym) = setup();
    let class = create_class(&gym, 1, 12, now() + Duration::days(3)).await;

    let all = gym.classes().get_all().await.unwrap();
    assert_eq!(all, vec![class]);
}

#[tokio::test]
async fn test_edit_through_draft_then_get_returns_new_fields() {
    let (_, gym) = setup();
    let mut class = create_class(&gym, 1, 12, now() + Duration::days(3)).await;

    let edited_at = now() + Duration::hours(1);
    ClassDraft::from(&class)
        .with_max_capacity(20)
        .with_late_registration(false)
        .apply_to(&mut class, edited_at)
        .unwrap();
    gym.classes().update(&class).await.unwrap();

    let stored = gym.classes().get(1).await.unwrap().unwrap();
    assert_eq!(stored.max_capacity, 20);
    assert!(!stored.allow_late_registration);
    assert_eq!(stored.updated_at, edited_at);
    assert_eq!(stored, class);
}

#[tokio::test]
async fn test_update_unknown_class_leaves_collection_unchanged() {
    let (kv, gym) = setup();
    let class = create_class(&gym, 1, 12, now() + Duration::days(3)).await;
    let before = kv.get(CollectionKey::Classes.as_str()).unwrap();

    let mut stranger = class.clone();
    stranger.id = 2;
    let err = gym.classes().update(&stranger).await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(kv.get(CollectionKey::Classes.as_str()).unwrap(), before);
}

#[tokio::test]
async fn test_get_by_date_uses_calendar_day() {
    let (_, gym) = setup();
    let day = |h, m| Utc.with_ymd_and_hms(2025, 8, 4, h, m, 0).unwrap();
    create_class(&gym, 1, 10, day(9, 0)).await;
    create_class(&gym, 2, 10, day(22, 0)).await;
    create_class(
        &gym,
        3,
        10,
        Utc.with_ymd_and_hms(2025, 8, 5, 0, 1, 0).unwrap(),
    )
    .await;

    let matching = gym.classes().get_by_date(Some(day(0, 0))).await.unwrap();
    let ids: Vec<i64> = matching.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 2]);

    assert_eq!(gym.classes().get_by_date(None).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_full_class_rejects_one_more_member() {
    let (_, gym) = setup();
    create_class(&gym, 1, 2, now() + Duration::days(1)).await;
    let ana = create_member(&gym, 10, "Ana").await;
    let bia = create_member(&gym, 11, "Bia").await;
    let caio = create_member(&gym, 12, "Caio").await;

    gym.classes().add_members(1, vec![ana, bia]).await.unwrap();
    let class = gym.classes().get(1).await.unwrap().unwrap();
    assert!(class.is_full());

    let err = gym.classes().add_members(1, vec![caio]).await.unwrap_err();
    assert!(matches!(
        err,
        GymError::CapacityExceeded {
            current: 2,
            requested: 1,
            ..
        }
    ));

    let class = gym.classes().get(1).await.unwrap().unwrap();
    assert_eq!(class.members.len(), 2);
}

#[tokio::test]
async fn test_add_members_to_unknown_class_is_not_found() {
    let (_, gym) = setup();
    let ana = create_member(&gym, 10, "Ana").await;

    let err = gym.classes().add_members(404, vec![ana]).await.unwrap_err();
    assert!(matches!(err, GymError::NotFound { id: 404, .. }));
}

#[tokio::test]
async fn test_remove_member_not_enrolled_is_a_no_op() {
    let (_, gym) = setup();
    create_class(&gym, 1, 5, now() + Duration::days(1)).await;
    let ana = create_member(&gym, 10, "Ana").await;
    gym.classes().add_members(1, vec![ana.clone()]).await.unwrap();

    gym.classes().remove_member(1, 99).await.unwrap();

    let class = gym.classes().get(1).await.unwrap().unwrap();
    assert_eq!(class.members, vec![ana]);
}

#[tokio::test]
async fn test_enrollable_members_excludes_enrolled() {
    let (_, gym) = setup();
    create_class(&gym, 1, 5, now() + Duration::days(1)).await;
    let ana = create_member(&gym, 10, "Ana").await;
    create_member(&gym, 11, "Bia").await;
    gym.classes().add_members(1, vec![ana]).await.unwrap();

    let candidates = gym.classes().enrollable_members(1).await.unwrap();
    let ids: Vec<i64> = candidates.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![11]);
}

#[tokio::test]
async fn test_seeding_is_idempotent() {
    let (_, gym) = setup();
    let seeder = gym.seeder().with_rng_seed(Some(3));

    let first = seeder.seed_if_empty(now()).await.unwrap();
    assert_eq!(first.len(), CollectionKey::ALL.len());

    let mut lengths = Vec::new();
    for key in CollectionKey::ALL {
        lengths.push(gym.store().len(key).await.unwrap());
    }

    let second = seeder.seed_if_empty(now()).await.unwrap();
    assert!(second.is_empty());
    for (key, expected) in CollectionKey::ALL.into_iter().zip(lengths) {
        assert_eq!(gym.store().len(key).await.unwrap(), expected);
    }

    for class in gym.classes().get_all().await.unwrap() {
        assert!(class.members.len() <= class.max_capacity as usize);
    }
}

#[tokio::test]
async fn test_seeding_never_overwrites_existing_collection() {
    let (_, gym) = setup();
    let ana = create_member(&gym, 10, "Ana").await;

    let seeded = gym.seeder().seed_if_empty(now()).await.unwrap();

    assert!(!seeded.contains(&CollectionKey::Members));
    assert!(seeded.contains(&CollectionKey::Classes));
    assert_eq!(gym.members().get_all().await.unwrap(), vec![ana]);

    let statuses: Vec<String> = gym
        .store()
        .get_all(CollectionKey::ClassStatuses)
        .await
        .unwrap();
    assert_eq!(
        statuses,
        vec!["ON_GOING", "OPEN", "FULL", "FINISHED", "CANCELED"]
    );
}

#[tokio::test]
async fn test_file_store_keeps_data_between_opens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gym.json");

    {
        let gym = Gym::new(Arc::new(FileKeyValueStore::open(&path).unwrap()));
        create_class(&gym, 1, 5, now() + Duration::days(1)).await;
        let ana = create_member(&gym, 10, "Ana").await;
        gym.classes().add_members(1, vec![ana]).await.unwrap();
    }

    let gym = Gym::new(Arc::new(FileKeyValueStore::open(&path).unwrap()));
    let class = gym.classes().get(1).await.unwrap().unwrap();
    assert_eq!(class.members.len(), 1);
    assert_eq!(gym.members().search("ana").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_member_edit_persists_new_fields_and_keeps_identity() {
    let (_, gym) = setup();
    let ana = create_member(&gym, 10, "Ana").await;

    let mut edited = ana.clone();
    let mut draft = MemberDraft::from(&edited);
    draft.name = "Ana Souza".to_string();
    draft.address = Some(Address {
        street: "Street 3".to_string(),
        number: "3".to_string(),
        district: "District 3".to_string(),
        city: "City 3".to_string(),
        state: "State 3".to_string(),
        zip_code: "12345-6783".to_string(),
    });
    let edited_at = now() + Duration::hours(2);
    draft.apply_to(&mut edited, edited_at).unwrap();
    gym.members().update(&edited).await.unwrap();

    let stored = gym.members().get(10).await.unwrap().unwrap();
    assert_eq!(stored.id, ana.id);
    assert_eq!(stored.created_at, ana.created_at);
    assert_eq!(stored.updated_at, edited_at);
    assert_eq!(stored.name, "Ana Souza");
    assert_eq!(stored.address.as_ref().map(|a| a.city.as_str()), Some("City 3"));
    assert_eq!(gym.members().get_all().await.unwrap().len(), 1);
}
