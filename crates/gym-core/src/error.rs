// Error types for the gym domain

use std::fmt;

use thiserror::Error;

/// Result type alias for gym operations
pub type Result<T> = std::result::Result<T, GymError>;

/// Errors that can occur in storage and domain operations
#[derive(Debug, Error)]
pub enum GymError {
    /// Referenced record does not exist in its collection
    #[error("{collection} record not found: {id}")]
    NotFound { collection: String, id: i64 },

    /// Adding members would break the class capacity invariant
    #[error(
        "class {class_id} is over capacity: {current} enrolled + {requested} requested > {max_capacity}"
    )]
    CapacityExceeded {
        class_id: i64,
        max_capacity: u32,
        current: usize,
        requested: usize,
    },

    /// One or more form fields are invalid
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// Stored blob could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Key-value store error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl GymError {
    /// Create a not found error for a collection
    pub fn not_found(collection: impl Into<String>, id: i64) -> Self {
        GymError::NotFound {
            collection: collection.into(),
            id,
        }
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        GymError::Storage(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        GymError::Configuration(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, GymError::NotFound { .. })
    }

    /// Number of members that must be dropped to fit a capacity-exceeded request
    pub fn excess(&self) -> Option<usize> {
        match self {
            GymError::CapacityExceeded {
                max_capacity,
                current,
                requested,
                ..
            } => Some((current + requested).saturating_sub(*max_capacity as usize)),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for GymError {
    fn from(errors: ValidationErrors) -> Self {
        GymError::Validation(errors)
    }
}

/// A single invalid form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every failing field of a form, in check order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Whether the given field failed
    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Ok when nothing failed, otherwise the collected errors
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(GymError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}
