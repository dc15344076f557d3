//! Identity resolution.
//!
//! The caller names itself with a `user` query parameter or an
//! `x-current-user` header. Nothing is authenticated: whoever supplies the
//! hint is trusted. The hint is resolved to a [`User`](crate::model::User)
//! once per request and then passed explicitly to every operation.

/// Query parameter carrying the username.
pub const USER_QUERY_PARAM: &str = "user";

/// Header carrying the username when the query parameter is absent.
pub const CURRENT_USER_HEADER: &str = "x-current-user";

/// Username used when the request names nobody.
pub const DEFAULT_USERNAME: &str = "john_doe";

/// The raw identity hints found on a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityHint {
    /// Value of the `user` query parameter
    pub query: Option<String>,
    /// Value of the `x-current-user` header
    pub header: Option<String>,
}

impl IdentityHint {
    /// Create a hint from its two sources.
    #[must_use]
    pub const fn new(query: Option<String>, header: Option<String>) -> Self {
        Self { query, header }
    }

    /// The username to look up: query parameter, then header, then
    /// `default`. Blank values count as absent; anything else is returned
    /// as given, since lookup is by exact username.
    #[must_use]
    pub fn username<'a>(&'a self, default: &'a str) -> &'a str {
        [self.query.as_deref(), self.header.as_deref()]
            .into_iter()
            .flatten()
            .find(|name| !name.trim().is_empty())
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_wins_over_header() {
        let hint = IdentityHint::new(Some("alice".into()), Some("bob".into()));
        assert_eq!(hint.username(DEFAULT_USERNAME), "alice");
    }

    #[test]
    fn header_used_without_query() {
        let hint = IdentityHint::new(None, Some("bob".into()));
        assert_eq!(hint.username(DEFAULT_USERNAME), "bob");
    }

    #[test]
    fn blank_query_falls_through() {
        let hint = IdentityHint::new(Some("  ".into()), Some("bob".into()));
        assert_eq!(hint.username(DEFAULT_USERNAME), "bob");
    }

    #[test]
    fn padded_name_is_not_trimmed() {
        let hint = IdentityHint::new(Some(" alice ".into()), Some("bob".into()));
        assert_eq!(hint.username(DEFAULT_USERNAME), " alice ");
    }

    #[test]
    fn default_when_nothing_given() {
        assert_eq!(IdentityHint::default().username(DEFAULT_USERNAME), "john_doe");
        assert_eq!(IdentityHint::default().username("carol"), "carol");
    }
}
