use crate::shared::validations::{search_term, validate_pagination};

/// Users are always listed newest first.
#[derive(Debug, Clone)]
pub struct ListUsersQuery {
    /// Case-insensitive substring over email, first name and last name
    pub q: Option<String>,
    pub offset: u64,
    pub limit: u64,
}

impl ListUsersQuery {
    pub fn new(q: Option<String>, offset: Option<u64>, limit: Option<u64>) -> Self {
        let (offset, limit) = validate_pagination(offset, limit);
        Self {
            q: search_term(q),
            offset,
            limit,
        }
    }
}

impl Default for ListUsersQuery {
    fn default() -> Self {
        Self::new(None, None, None)
    }
}
