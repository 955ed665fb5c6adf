//! First-run bootstrap with sample data
//!
//! [`Seeder::seed_if_empty`] fills only the collections it finds empty, so running
//! it on every start never duplicates or overwrites existing data.

use chrono::{DateTime, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::entities::{Address, Class, ClassStatus, Member};
use crate::error::Result;
use crate::store::{CollectionKey, CollectionStore};

const ADDRESS_COUNT: usize = 20;
const MEMBER_COUNT: usize = 100;
const CLASS_COUNT: usize = 20;

pub const PAYMENT_PLANS: [&str; 3] = ["Monthly", "Quarterly", "Yearly"];
pub const CLASS_TYPES: [&str; 5] = ["Yoga", "Pilates", "Weight Training", "Zumba", "Crossfit"];

/// Everything written on first run
#[derive(Debug, Clone)]
pub struct SampleData {
    pub members: Vec<Member>,
    pub classes: Vec<Class>,
    pub states: Vec<String>,
    pub cities: Vec<String>,
    pub districts: Vec<String>,
    pub payment_plans: Vec<String>,
    pub class_types: Vec<String>,
    pub class_statuses: Vec<ClassStatus>,
}

impl SampleData {
    pub fn generate(rng: &mut impl Rng, now: DateTime<Utc>) -> Self {
        let addresses: Vec<Address> = (0..ADDRESS_COUNT).map(sample_address).collect();

        let members: Vec<Member> = (0..MEMBER_COUNT)
            .map(|i| Member {
                id: i as i64 + 1,
                name: format!("Member {}", i + 1),
                email: format!("member{}@example.com", i + 1),
                birth_date: Utc
                    .with_ymd_and_hms(2000 + i as i32, 1, 1, 0, 0, 0)
                    .single()
                    .unwrap_or(now),
                document: Some(random_document(rng)),
                address: Some(addresses[i % addresses.len()].clone()),
                payment_plan: PAYMENT_PLANS[i % PAYMENT_PLANS.len()].to_string(),
                created_at: now,
                updated_at: now,
            })
            .collect();

        let class_date = Utc
            .with_ymd_and_hms(2025, 8, 4, 0, 0, 0)
            .single()
            .unwrap_or(now);
        let classes: Vec<Class> = (0..CLASS_COUNT)
            .map(|i| {
                let max_capacity: u32 = rng.gen_range(20..50);
                let enrolled: usize = rng.gen_range(1..=20);
                Class {
                    id: i as i64 + 1,
                    description: format!("Class {}", i + 1),
                    max_capacity,
                    allow_late_registration: i % 2 == 0,
                    date: class_date,
                    status: ClassStatus::ALL[i % ClassStatus::ALL.len()],
                    class_type: CLASS_TYPES[i % CLASS_TYPES.len()].to_string(),
                    members: members[..enrolled].to_vec(),
                    created_at: now,
                    updated_at: now,
                }
            })
            .collect();

        Self {
            states: distinct(addresses.iter().map(|a| a.state.clone())),
            cities: distinct(addresses.iter().map(|a| a.city.clone())),
            districts: distinct(addresses.iter().map(|a| a.district.clone())),
            payment_plans: PAYMENT_PLANS.iter().map(|p| p.to_string()).collect(),
            class_types: CLASS_TYPES.iter().map(|t| t.to_string()).collect(),
            class_statuses: ClassStatus::ALL.to_vec(),
            members,
            classes,
        }
    }
}

fn sample_address(i: usize) -> Address {
    Address {
        street: format!("Street {}", i + 1),
        number: format!("{}", i + 1),
        district: format!("District {}", i + 1),
        city: format!("City {}", i + 1),
        state: format!("State {}", i + 1),
        zip_code: format!("12345-678{i}"),
    }
}

/// Random document number shaped `ddd.ddd.ddd-dd`
fn random_document(rng: &mut impl Rng) -> String {
    let digits: String = (0..11)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect();
    format!(
        "{}.{}.{}-{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..11]
    )
}

fn distinct(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

/// Populates empty collections with [`SampleData`]
pub struct Seeder {
    store: CollectionStore,
    rng_seed: Option<u64>,
}

impl Seeder {
    pub fn new(store: CollectionStore) -> Self {
        Self {
            store,
            rng_seed: None,
        }
    }

    /// Fix the RNG seed so generated data is reproducible
    pub fn with_rng_seed(mut self, seed: Option<u64>) -> Self {
        self.rng_seed = seed;
        self
    }

    /// Seed every empty collection; returns the keys that were written
    pub async fn seed_if_empty(&self, now: DateTime<Utc>) -> Result<Vec<CollectionKey>> {
        let mut empty = Vec::new();
        for key in CollectionKey::ALL {
            if self.store.is_empty(key).await? {
                empty.push(key);
            }
        }

        if empty.is_empty() {
            tracing::debug!("All collections populated, skipping seed");
            return Ok(empty);
        }

        let mut rng = match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let data = SampleData::generate(&mut rng, now);

        for key in &empty {
            match key {
                CollectionKey::Members => self.store.save_all(*key, &data.members).await?,
                CollectionKey::Classes => self.store.save_all(*key, &data.classes).await?,
                CollectionKey::States => self.store.save_all(*key, &data.states).await?,
                CollectionKey::Cities => self.store.save_all(*key, &data.cities).await?,
                CollectionKey::Districts => self.store.save_all(*key, &data.districts).await?,
                CollectionKey::PaymentPlans => {
                    self.store.save_all(*key, &data.payment_plans).await?
                }
                CollectionKey::ClassTypes => self.store.save_all(*key, &data.class_types).await?,
                CollectionKey::ClassStatuses => {
                    self.store.save_all(*key, &data.class_statuses).await?
                }
            }
            tracing::info!(collection = %key, "Seeded collection");
        }

        Ok(empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_data_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let data = SampleData::generate(&mut rng, Utc::now());

        assert_eq!(data.members.len(), MEMBER_COUNT);
        assert_eq!(data.classes.len(), CLASS_COUNT);
        assert_eq!(data.states.len(), ADDRESS_COUNT);
        assert_eq!(data.payment_plans, vec!["Monthly", "Quarterly", "Yearly"]);
        assert_eq!(data.members[4].payment_plan, "Quarterly");
        assert_eq!(data.classes[0].status, ClassStatus::OnGoing);
        assert!(data.classes[0].allow_late_registration);
        assert!(!data.classes[1].allow_late_registration);

        for class in &data.classes {
            assert!((20..50).contains(&class.max_capacity));
            assert!(!class.members.is_empty());
            assert!(class.members.len() <= class.max_capacity as usize);
        }
    }

    #[test]
    fn test_random_document_format() {
        let mut rng = StdRng::seed_from_u64(1);
        let doc = random_document(&mut rng);
        assert_eq!(doc.len(), 14);
        assert_eq!(&doc[3..4], ".");
        assert_eq!(&doc[7..8], ".");
        assert_eq!(&doc[11..12], "-");
    }

    #[test]
    fn test_same_seed_same_data() {
        let now = Utc::now();
        let a = SampleData::generate(&mut StdRng::seed_from_u64(42), now);
        let b = SampleData::generate(&mut StdRng::seed_from_u64(42), now);
        assert_eq!(a.classes, b.classes);
    }
}
