use chrono::{DateTime, TimeZone, Utc};
use reqwest::StatusCode;
use thiserror::Error;

/// Raw value of the `x-ratelimit-reset` header attached to a rate-limit failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitReset(pub String);

impl RateLimitReset {
    /// Interprets the header as Unix seconds.
    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        let secs = self.0.trim().parse::<i64>().ok()?;
        Utc.timestamp_opt(secs, 0).single()
    }
}

/// Failures produced by the GitHub API client.
///
/// The `Display` text of each variant is what gets shown to the user when the
/// error lands in the session error slot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GitHubError {
    /// The request never produced a usable response (DNS, connect, reset, bad body).
    #[error("Network error. Please check your internet connection.")]
    Network { reason: String },

    /// `x-ratelimit-remaining` was `0`.
    #[error("GitHub API rate limit exceeded. Please try again later.")]
    RateLimited { reset: Option<RateLimitReset> },

    #[error("Invalid search query. Please try a different search term.")]
    InvalidQuery,

    #[error("User '{login}' not found.")]
    NotFound { login: String },

    #[error("No users found for this search query.")]
    NoResults,

    /// Any other non-2xx response.
    #[error("Failed to fetch {resource}: {}", describe_status(.status))]
    Api { status: u16, resource: String },
}

fn describe_status(status: &u16) -> String {
    match StatusCode::from_u16(*status) {
        Ok(code) => code.to_string(),
        Err(_) => status.to_string(),
    }
}

impl GitHubError {
    pub(crate) fn api(status: StatusCode, resource: &str) -> Self {
        GitHubError::Api {
            status: status.as_u16(),
            resource: resource.to_string(),
        }
    }

    /// The reset time carried by a rate-limit failure, if GitHub sent one we can parse.
    pub fn rate_limit_reset(&self) -> Option<DateTime<Utc>> {
        match self {
            GitHubError::RateLimited { reset: Some(reset) } => reset.reset_at(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GitHubError {
    fn from(err: reqwest::Error) -> Self {
        GitHubError::Network {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_header_parses_as_unix_seconds() {
        let reset = RateLimitReset("1700000000".to_string());
        let at = reset.reset_at().unwrap();
        assert_eq!(at.timestamp(), 1_700_000_000);
    }

    #[test]
    fn garbage_reset_header_has_no_timestamp() {
        let err = GitHubError::RateLimited {
            reset: Some(RateLimitReset("soon".to_string())),
        };
        assert_eq!(err.rate_limit_reset(), None);
        assert_eq!(GitHubError::NoResults.rate_limit_reset(), None);
    }

    #[test]
    fn messages_are_user_facing() {
        let err = GitHubError::NotFound {
            login: "ghost".to_string(),
        };
        assert_eq!(err.to_string(), "User 'ghost' not found.");

        let err = GitHubError::api(StatusCode::INTERNAL_SERVER_ERROR, "followers");
        assert_eq!(
            err.to_string(),
            "Failed to fetch followers: 500 Internal Server Error"
        );
    }
}
