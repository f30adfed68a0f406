//! Patient domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Administrative gender recorded on the patient card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Patient record. Every field is visible to callers.
#[derive(Debug, Clone, PartialEq)]
pub struct Patient {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub phone: String,
    pub email: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Gender::Female).unwrap(), "\"female\"");
        let g: Gender = serde_json::from_str("\"male\"").unwrap();
        assert_eq!(g, Gender::Male);
    }

    #[test]
    fn full_name_joins_parts() {
        let now = Utc::now();
        let p = Patient {
            id: "p1".into(),
            first_name: "Aziza".into(),
            last_name: "Karimova".into(),
            gender: Gender::Female,
            phone: "+998901234567".into(),
            email: "aziza@example.com".into(),
            notes: None,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(p.full_name(), "Aziza Karimova");
    }
}
