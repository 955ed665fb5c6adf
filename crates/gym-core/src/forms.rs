// Form payloads and their validation rules
//
// A draft is what an operator fills in; it becomes a full record only after
// every field passes. All failures are collected, not just the first.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::entities::{Address, Class, ClassStatus, Member};
use crate::error::{Result, ValidationErrors};

pub const DESCRIPTION_MAX_CHARS: usize = 25;
pub const MIN_CAPACITY: u32 = 1;
pub const MAX_CAPACITY: u32 = 60;
pub const DEFAULT_CAPACITY: u32 = 10;

pub(crate) fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL
        .get_or_init(|| {
            Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
        })
        .is_match(email.trim())
}

// ============================================================================
// ClassDraft
// ============================================================================

/// Class form
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDraft {
    pub description: String,
    pub max_capacity: u32,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub class_type: String,
    pub status: ClassStatus,
    pub allow_late_registration: bool,
}

impl ClassDraft {
    /// New draft with form defaults: capacity 10, open, late registration allowed
    pub fn new(
        description: impl Into<String>,
        class_type: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            description: description.into(),
            max_capacity: DEFAULT_CAPACITY,
            date,
            class_type: class_type.into(),
            status: ClassStatus::Open,
            allow_late_registration: true,
        }
    }

    pub fn with_max_capacity(mut self, max_capacity: u32) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    pub fn with_status(mut self, status: ClassStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_late_registration(mut self, allow: bool) -> Self {
        self.allow_late_registration = allow;
        self
    }

    /// Check every field against the class form rules
    pub fn validate(&self, now: DateTime<Utc>) -> Result<()> {
        let mut errors = ValidationErrors::new();

        let description = self.description.trim();
        if description.is_empty() {
            errors.push("description", "description is required");
        } else if description.chars().count() > DESCRIPTION_MAX_CHARS {
            errors.push(
                "description",
                format!("description must be at most {DESCRIPTION_MAX_CHARS} characters"),
            );
        }

        if self.max_capacity < MIN_CAPACITY {
            errors.push("maxCapacity", "max capacity must be greater than 0");
        } else if self.max_capacity > MAX_CAPACITY {
            errors.push(
                "maxCapacity",
                format!("max capacity must be at most {MAX_CAPACITY}"),
            );
        }

        if self.date <= now {
            errors.push("date", "class must start in the future");
        }

        if self.class_type.trim().is_empty() {
            errors.push("type", "class type is required");
        }

        errors.into_result()
    }

    /// Build a new class with no members
    pub fn into_class(self, id: i64, now: DateTime<Utc>) -> Result<Class> {
        self.validate(now)?;
        Ok(Class {
            id,
            description: self.description.trim().to_string(),
            max_capacity: self.max_capacity,
            allow_late_registration: self.allow_late_registration,
            date: self.date,
            status: self.status,
            class_type: self.class_type,
            members: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Overwrite the editable fields of `class`, keeping its id, members and creation time
    pub fn apply_to(self, class: &mut Class, now: DateTime<Utc>) -> Result<()> {
        self.validate(now)?;
        class.description = self.description.trim().to_string();
        class.max_capacity = self.max_capacity;
        class.date = self.date;
        class.class_type = self.class_type;
        class.status = self.status;
        class.allow_late_registration = self.allow_late_registration;
        class.updated_at = now;
        Ok(())
    }
}

impl From<&Class> for ClassDraft {
    fn from(class: &Class) -> Self {
        Self {
            description: class.description.clone(),
            max_capacity: class.max_capacity,
            date: class.date,
            class_type: class.class_type.clone(),
            status: class.status,
            allow_late_registration: class.allow_late_registration,
        }
    }
}

// ============================================================================
// MemberDraft
// ============================================================================

/// Member form
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDraft {
    pub name: String,
    pub email: String,
    pub birth_date: DateTime<Utc>,
    #[serde(default)]
    pub document: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
    pub payment_plan: String,
}

impl MemberDraft {
    pub fn validate(&self, now: DateTime<Utc>) -> Result<()> {
        let mut errors = ValidationErrors::new();

        if self.name.trim().is_empty() {
            errors.push("name", "name is required");
        }

        if self.email.trim().is_empty() {
            errors.push("email", "email is required");
        } else if !is_valid_email(&self.email) {
            errors.push("email", "invalid email");
        }

        if self.birth_date >= now {
            errors.push("birthDate", "birth date must be in the past");
        }

        if self.payment_plan.trim().is_empty() {
            errors.push("paymentPlan", "payment plan is required");
        }

        if let Some(address) = &self.address {
            validate_address(address, &mut errors);
        }

        errors.into_result()
    }

    pub fn into_member(self, id: i64, now: DateTime<Utc>) -> Result<Member> {
        self.validate(now)?;
        Ok(Member {
            id,
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            birth_date: self.birth_date,
            document: normalize_optional(self.document),
            address: self.address,
            payment_plan: self.payment_plan,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply_to(self, member: &mut Member, now: DateTime<Utc>) -> Result<()> {
        self.validate(now)?;
        member.name = self.name.trim().to_string();
        member.email = self.email.trim().to_string();
        member.birth_date = self.birth_date;
        member.document = normalize_optional(self.document);
        member.address = self.address;
        member.payment_plan = self.payment_plan;
        member.updated_at = now;
        Ok(())
    }
}

/// An address is optional, but when given every part of it is required
fn validate_address(address: &Address, errors: &mut ValidationErrors) {
    let parts = [
        ("address.street", &address.street),
        ("address.number", &address.number),
        ("address.district", &address.district),
        ("address.city", &address.city),
        ("address.state", &address.state),
        ("address.zipCode", &address.zip_code),
    ];
    for (field, value) in parts {
        if value.trim().is_empty() {
            errors.push(field, format!("{} is required", &field["address.".len()..]));
        }
    }
}

impl From<&Member> for MemberDraft {
    fn from(member: &Member) -> Self {
        Self {
            name: member.name.clone(),
            email: member.email.clone(),
            birth_date: member.birth_date,
            document: member.document.clone(),
            address: member.address.clone(),
            payment_plan: member.payment_plan.clone(),
        }
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GymError;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 1, 12, 0, 0).unwrap()
    }

    fn validation_errors(result: Result<()>) -> ValidationErrors {
        match result {
            Err(GymError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_class_draft_defaults() {
        let draft = ClassDraft::new("Spin", "Cycling", now() + Duration::days(1));
        assert_eq!(draft.max_capacity, DEFAULT_CAPACITY);
        assert_eq!(draft.status, ClassStatus::Open);
        assert!(draft.allow_late_registration);
        assert!(draft.validate(now()).is_ok());
    }

    #[test]
    fn test_class_draft_collects_every_failure() {
        let draft = ClassDraft::new("   ", "", now() - Duration::minutes(1)).with_max_capacity(0);

        let errors = validation_errors(draft.validate(now()));
        assert_eq!(errors.len(), 4);
        assert!(errors.has("description"));
        assert!(errors.has("maxCapacity"));
        assert!(errors.has("date"));
        assert!(errors.has("type"));
    }

    #[test]
    fn test_class_draft_bounds() {
        let future = now() + Duration::hours(2);
        let long = "x".repeat(DESCRIPTION_MAX_CHARS + 1);

        let errors = validation_errors(ClassDraft::new(long, "Yoga", future).validate(now()));
        assert!(errors.has("description"));

        let exact = "x".repeat(DESCRIPTION_MAX_CHARS);
        assert!(ClassDraft::new(exact, "Yoga", future)
            .with_max_capacity(MAX_CAPACITY)
            .validate(now())
            .is_ok());

        let errors = validation_errors(
            ClassDraft::new("Yoga", "Yoga", future)
                .with_max_capacity(MAX_CAPACITY + 1)
                .validate(now()),
        );
        assert!(errors.has("maxCapacity"));
    }

    #[test]
    fn test_class_draft_apply_keeps_members_and_created_at() {
        let created = now() - Duration::days(3);
        let mut class = ClassDraft::new("Old", "Yoga", now() + Duration::days(1))
            .into_class(1, created - Duration::days(1))
            .unwrap();
        class.created_at = created;

        ClassDraft::new("  New name ", "Pilates", now() + Duration::days(2))
            .with_max_capacity(30)
            .apply_to(&mut class, now())
            .unwrap();

        assert_eq!(class.id, 1);
        assert_eq!(class.description, "New name");
        assert_eq!(class.class_type, "Pilates");
        assert_eq!(class.max_capacity, 30);
        assert_eq!(class.created_at, created);
        assert_eq!(class.updated_at, now());
    }

    #[test]
    fn test_member_draft_validation() {
        let draft = MemberDraft {
            name: "".to_string(),
            email: "not-an-email".to_string(),
            birth_date: now() + Duration::days(1),
            document: None,
            address: None,
            payment_plan: "Monthly".to_string(),
        };

        let errors = validation_errors(draft.validate(now()));
        assert!(errors.has("name"));
        assert!(errors.has("email"));
        assert!(errors.has("birthDate"));
        assert!(!errors.has("paymentPlan"));
    }

    #[test]
    fn test_member_draft_into_member_trims_and_drops_blank_document() {
        let draft = MemberDraft {
            name: " Ana ".to_string(),
            email: "ana@example.com".to_string(),
            birth_date: Utc.with_ymd_and_hms(1990, 5, 1, 0, 0, 0).unwrap(),
            document: Some("  ".to_string()),
            address: None,
            payment_plan: "Yearly".to_string(),
        };

        let member = draft.into_member(42, now()).unwrap();
        assert_eq!(member.id, 42);
        assert_eq!(member.name, "Ana");
        assert_eq!(member.document, None);
        assert_eq!(member.created_at, now());
    }

    fn address() -> Address {
        Address {
            street: "Rua das Flores".to_string(),
            number: "12".to_string(),
            district: "District 1".to_string(),
            city: "City 1".to_string(),
            state: "State 1".to_string(),
            zip_code: "12345-678".to_string(),
        }
    }

    #[test]
    fn test_member_draft_partial_address_is_invalid() {
        let mut partial = address();
        partial.city = String::new();
        partial.zip_code = " ".to_string();
        let draft = MemberDraft {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            birth_date: Utc.with_ymd_and_hms(1990, 5, 1, 0, 0, 0).unwrap(),
            document: None,
            address: Some(partial),
            payment_plan: "Monthly".to_string(),
        };

        let errors = validation_errors(draft.validate(now()));
        assert_eq!(errors.len(), 2);
        assert!(errors.has("address.city"));
        assert!(errors.has("address.zipCode"));
        assert_eq!(errors.errors()[0].message, "city is required");
    }

    #[test]
    fn test_member_draft_apply_keeps_identity_and_bumps_updated_at() {
        let created = now() - Duration::days(30);
        let mut member = MemberDraft {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            birth_date: Utc.with_ymd_and_hms(1990, 5, 1, 0, 0, 0).unwrap(),
            document: Some("123.456.789-00".to_string()),
            address: None,
            payment_plan: "Monthly".to_string(),
        }
        .into_member(7, created)
        .unwrap();

        let mut draft = MemberDraft::from(&member);
        draft.email = "ana.souza@example.com".to_string();
        draft.payment_plan = "Yearly".to_string();
        draft.address = Some(address());
        draft.apply_to(&mut member, now()).unwrap();

        assert_eq!(member.id, 7);
        assert_eq!(member.created_at, created);
        assert_eq!(member.updated_at, now());
        assert_eq!(member.email, "ana.souza@example.com");
        assert_eq!(member.payment_plan, "Yearly");
        assert_eq!(member.document.as_deref(), Some("123.456.789-00"));
        assert_eq!(member.address, Some(address()));
    }

    #[test]
    fn test_member_draft_apply_rejects_invalid_edit_unchanged() {
        let mut member = MemberDraft {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            birth_date: Utc.with_ymd_and_hms(1990, 5, 1, 0, 0, 0).unwrap(),
            document: None,
            address: None,
            payment_plan: "Monthly".to_string(),
        }
        .into_member(7, now())
        .unwrap();
        let before = member.clone();

        let mut draft = MemberDraft::from(&member);
        draft.email = "broken".to_string();
        assert!(draft.apply_to(&mut member, now()).is_err());
        assert_eq!(member, before);
    }

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("member1@example.com"));
        assert!(!is_valid_email("member1@example"));
        assert!(!is_valid_email("with space@example.com"));
    }
}
