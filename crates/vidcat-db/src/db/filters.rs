use vidcat_core::models::VideoFilter;

/// `%term%` with LIKE wildcards in `term` escaped, so filters match literally.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Listing filters as bound query parameters; blank terms are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterParams {
    pub duration: Option<String>,
    pub name: Option<String>,
    pub user: Option<String>,
    pub user_id: Option<i64>,
}

fn term(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(like_pattern)
}

impl From<&VideoFilter> for FilterParams {
    fn from(filter: &VideoFilter) -> Self {
        FilterParams {
            duration: term(&filter.duration),
            name: term(&filter.name),
            user: term(&filter.user),
            user_id: filter.user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("cat"), "%cat%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c:\\x"), "%c:\\\\x%");
    }

    #[test]
    fn test_blank_terms_are_dropped() {
        let filter = VideoFilter {
            duration: Some("  ".to_string()),
            name: Some(" trip ".to_string()),
            user: None,
            user_id: Some(4),
        };
        let params = FilterParams::from(&filter);
        assert_eq!(params.duration, None);
        assert_eq!(params.name.as_deref(), Some("%trip%"));
        assert_eq!(params.user, None);
        assert_eq!(params.user_id, Some(4));
    }
}
