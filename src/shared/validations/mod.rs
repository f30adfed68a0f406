/// Default page size when the caller gives none (or zero).
pub const DEFAULT_LIMIT: u64 = 20;

pub fn validate_pagination(offset: Option<u64>, limit: Option<u64>) -> (u64, u64) {
    let offset = offset.unwrap_or(0);
    let limit = limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT);
    (offset, limit)
}

/// An empty search string means "no search".
pub fn search_term(q: Option<String>) -> Option<String> {
    q.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults() {
        assert_eq!(validate_pagination(None, None), (0, 20));
        assert_eq!(validate_pagination(Some(40), Some(0)), (40, 20));
        assert_eq!(validate_pagination(Some(5), Some(7)), (5, 7));
    }

    #[test]
    fn empty_search_is_absent() {
        assert_eq!(search_term(Some(String::new())), None);
        assert_eq!(search_term(None), None);
        assert_eq!(search_term(Some(" ".into())).as_deref(), Some(" "));
    }
}
