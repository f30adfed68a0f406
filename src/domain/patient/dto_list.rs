use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Gender;
use crate::shared::validations::{search_term, validate_pagination};

/// Order of the patient list by creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PatientSort {
    Oldest,
    #[default]
    Newest,
}

#[derive(Debug, Clone)]
pub struct ListPatientsQuery {
    /// Case-insensitive substring over first name, last name, phone and email
    pub q: Option<String>,
    pub gender: Option<Gender>,
    pub sort: PatientSort,
    pub offset: u64,
    pub limit: u64,
}

impl ListPatientsQuery {
    pub fn new(
        q: Option<String>,
        gender: Option<Gender>,
        sort: Option<PatientSort>,
        offset: Option<u64>,
        limit: Option<u64>,
    ) -> Self {
        let (offset, limit) = validate_pagination(offset, limit);
        Self {
            q: search_term(q),
            gender,
            sort: sort.unwrap_or_default(),
            offset,
            limit,
        }
    }
}

impl Default for ListPatientsQuery {
    fn default() -> Self {
        Self::new(None, None, None, None, None)
    }
}
