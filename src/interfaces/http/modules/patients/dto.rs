//! Patient DTOs

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

use crate::domain::{
    CreatePatientDto, Gender, ListPatientsQuery, Patient, PatientSort, UpdatePatientDto,
};
use crate::shared::Patch;

const NAME_MAX: usize = 100;
const PHONE_MAX: usize = 32;
const NOTES_MAX: usize = 4000;

/// Patient API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PatientDto {
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

impl From<Patient> for PatientDto {
    fn from(p: Patient) -> Self {
        Self {
            id: p.id,
            first_name: p.first_name,
            last_name: p.last_name,
            gender: p.gender,
            phone: p.phone,
            email: p.email,
            notes: p.notes,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePatientRequest {
    #[validate(length(min = 1, max = 100, message = "first name must be 1-100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "last name must be 1-100 characters"))]
    pub last_name: String,
    pub gender: Gender,
    #[validate(length(min = 1, max = 32, message = "phone must be 1-32 characters"))]
    pub phone: String,
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(max = 4000, message = "notes are limited to 4000 characters"))]
    pub notes: Option<String>,
}

impl From<CreatePatientRequest> for CreatePatientDto {
    fn from(r: CreatePatientRequest) -> Self {
        Self {
            first_name: r.first_name,
            last_name: r.last_name,
            gender: r.gender,
            phone: r.phone,
            email: r.email,
            notes: r.notes,
        }
    }
}

/// Partial update. Omitted keys are left unchanged; `"notes": null` clears
/// the notes.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdatePatientRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub first_name: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub last_name: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<Gender>)]
    pub gender: Patch<Gender>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub phone: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub email: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub notes: Patch<Option<String>>,
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn check_len(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &Patch<String>,
    max: usize,
    message: &'static str,
) {
    if let Patch::Set(v) = value {
        let len = v.chars().count();
        if len == 0 || len > max {
            errors.add(field, invalid("length", message));
        }
    }
}

impl Validate for UpdatePatientRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        check_len(
            &mut errors,
            "first_name",
            &self.first_name,
            NAME_MAX,
            "first name must be 1-100 characters",
        );
        check_len(
            &mut errors,
            "last_name",
            &self.last_name,
            NAME_MAX,
            "last name must be 1-100 characters",
        );
        check_len(
            &mut errors,
            "phone",
            &self.phone,
            PHONE_MAX,
            "phone must be 1-32 characters",
        );
        if let Patch::Set(email) = &self.email {
            if !email.validate_email() {
                errors.add("email", invalid("email", "invalid email format"));
            }
        }
        if let Patch::Set(Some(notes)) = &self.notes {
            if notes.chars().count() > NOTES_MAX {
                errors.add(
                    "notes",
                    invalid("length", "notes are limited to 4000 characters"),
                );
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl From<UpdatePatientRequest> for UpdatePatientDto {
    fn from(r: UpdatePatientRequest) -> Self {
        Self {
            first_name: r.first_name,
            last_name: r.last_name,
            gender: r.gender,
            phone: r.phone,
            email: r.email,
            notes: r.notes,
        }
    }
}

/// List patients query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListPatientsParams {
    /// Case-insensitive substring over first name, last name, phone, email
    pub q: Option<String>,
    pub gender: Option<Gender>,
    /// `newest` (default) or `oldest`
    pub sort: Option<PatientSort>,
    pub offset: Option<u64>,
    /// Page size, 20 when absent or zero
    pub limit: Option<u64>,
}

impl From<ListPatientsParams> for ListPatientsQuery {
    fn from(p: ListPatientsParams) -> Self {
        ListPatientsQuery::new(p.q, p.gender, p.sort, p.offset, p.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_request_distinguishes_missing_and_null() {
        let req: UpdatePatientRequest =
            serde_json::from_str(r#"{"phone": "555", "notes": null}"#).unwrap();
        assert_eq!(req.first_name, Patch::Keep);
        assert_eq!(req.phone, Patch::Set("555".to_string()));
        assert_eq!(req.notes, Patch::Set(None));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn update_request_rejects_blank_and_bad_email() {
        let req: UpdatePatientRequest =
            serde_json::from_str(r#"{"first_name": "", "email": "nope"}"#).unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("first_name"));
        assert!(fields.contains_key("email"));
    }

    #[test]
    fn empty_update_is_valid() {
        assert!(UpdatePatientRequest::default().validate().is_ok());
    }

    #[test]
    fn create_request_validation() {
        let req: CreatePatientRequest = serde_json::from_str(
            r#"{"first_name":"A","last_name":"B","gender":"male","phone":"1","email":"a@b.uz"}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
        assert!(req.notes.is_none());

        let bad: CreatePatientRequest = serde_json::from_str(
            r#"{"first_name":"","last_name":"B","gender":"female","phone":"1","email":"x"}"#,
        )
        .unwrap();
        assert!(bad.validate().is_err());
    }
}
