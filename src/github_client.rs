use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::{GitHubError, RateLimitReset};
use crate::models::{
    Gist, Organization, RateLimitStatus, Repository, SearchResponse, UserSummary,
};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_USER_AGENT: &str = concat!("github-user-explorer/", env!("CARGO_PKG_VERSION"));

const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";
const RATE_LIMIT_RESET: &str = "x-ratelimit-reset";

const SEARCH_PAGE_SIZE: &str = "5";
const REPOS_PAGE_SIZE: &str = "20";
const SECTION_PAGE_SIZE: &str = "10";

/// Where and how the client talks to GitHub.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root; requests are built by appending path segments to it.
    pub base_url: Url,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// The GitHub operations the explorer needs.
///
/// Every call takes a trimmed, non-empty query or login and issues exactly one
/// request.
#[async_trait]
pub trait UserApi: Send + Sync {
    async fn search_users(&self, query: &str) -> Result<SearchResponse, GitHubError>;
    async fn get_user_detail(&self, login: &str) -> Result<UserSummary, GitHubError>;
    async fn get_user_repos(&self, login: &str) -> Result<Vec<Repository>, GitHubError>;
    async fn get_user_followers(&self, login: &str) -> Result<Vec<UserSummary>, GitHubError>;
    async fn get_user_following(&self, login: &str) -> Result<Vec<UserSummary>, GitHubError>;
    async fn get_user_organizations(&self, login: &str)
        -> Result<Vec<Organization>, GitHubError>;
    async fn get_user_starred(&self, login: &str) -> Result<Vec<Repository>, GitHubError>;
}

/// Which endpoint a response came from; decides how error statuses are read.
#[derive(Debug, Clone, Copy)]
enum Resource<'a> {
    Search,
    Detail,
    Repos(&'a str),
    Followers,
    Following,
    Organizations,
    Starred,
    Gists,
}

impl Resource<'_> {
    fn label(&self) -> &'static str {
        match self {
            Resource::Search => "users",
            Resource::Detail => "user detail",
            Resource::Repos(_) => "repositories",
            Resource::Followers => "followers",
            Resource::Following => "following",
            Resource::Organizations => "organizations",
            Resource::Starred => "starred repositories",
            Resource::Gists => "gists",
        }
    }
}

pub struct GitHubClient {
    client: Client,
    config: ClientConfig,
}

impl GitHubClient {
    /// Create a new anonymous client
    pub fn new(config: ClientConfig) -> reqwest::Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(GitHubClient { client, config })
    }

    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    /// Fetch up to ten public gists of a user.
    pub async fn get_user_gists(&self, login: &str) -> Result<Vec<Gist>, GitHubError> {
        let url = self.endpoint(
            &["users", login, "gists"],
            &[("per_page", SECTION_PAGE_SIZE)],
        );
        self.get_json(url, Resource::Gists).await
    }

    /// Current quota as reported by `/rate_limit`.
    ///
    /// Purely informational: failures are logged and reported as `None`.
    pub async fn get_rate_limit_status(&self) -> Option<RateLimitStatus> {
        let url = self.endpoint(&["rate_limit"], &[]);
        debug!("Requesting URL: {}", url);

        let response = match self.request(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Could not fetch rate limit status: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            warn!("Could not fetch rate limit status: {}", response.status());
            return None;
        }

        match response.json::<RateLimitStatus>().await {
            Ok(status) => Some(status),
            Err(e) => {
                warn!("Could not parse rate limit status: {}", e);
                None
            }
        }
    }

    /// Build an endpoint URL from path segments and query pairs, percent-encoding both
    fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Url {
        let mut url = self.config.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }

    fn request(&self, url: Url) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        resource: Resource<'_>,
    ) -> Result<T, GitHubError> {
        debug!("Requesting URL: {}", url);

        let response = self.request(url).send().await.map_err(|e| {
            warn!("Request for {} failed: {}", resource.label(), e);
            GitHubError::from(e)
        })?;

        check_response(response.status(), response.headers(), resource).map_err(|e| {
            warn!("GitHub rejected request for {}: {:?}", resource.label(), e);
            e
        })?;

        response.json::<T>().await.map_err(|e| {
            warn!("Could not decode {} response: {}", resource.label(), e);
            GitHubError::from(e)
        })
    }
}

#[async_trait]
impl UserApi for GitHubClient {
    async fn search_users(&self, query: &str) -> Result<SearchResponse, GitHubError> {
        let url = self.endpoint(
            &["search", "users"],
            &[
                ("q", query),
                ("per_page", SEARCH_PAGE_SIZE),
                ("sort", "followers"),
            ],
        );

        let page: SearchResponse = self.get_json(url, Resource::Search).await?;
        if page.items.is_empty() {
            debug!("No users found for '{}'", query);
            return Err(GitHubError::NoResults);
        }

        debug!(
            "Found {} of {} users for '{}'",
            page.items.len(),
            page.total_count,
            query
        );
        Ok(page)
    }

    async fn get_user_detail(&self, login: &str) -> Result<UserSummary, GitHubError> {
        let url = self.endpoint(&["users", login], &[]);
        self.get_json(url, Resource::Detail).await
    }

    async fn get_user_repos(&self, login: &str) -> Result<Vec<Repository>, GitHubError> {
        let url = self.endpoint(
            &["users", login, "repos"],
            &[("sort", "stars"), ("per_page", REPOS_PAGE_SIZE)],
        );

        let mut repos: Vec<Repository> = self.get_json(url, Resource::Repos(login)).await?;
        sort_repositories(&mut repos);
        Ok(repos)
    }

    async fn get_user_followers(&self, login: &str) -> Result<Vec<UserSummary>, GitHubError> {
        let url = self.endpoint(
            &["users", login, "followers"],
            &[("per_page", SECTION_PAGE_SIZE)],
        );
        self.get_json(url, Resource::Followers).await
    }

    async fn get_user_following(&self, login: &str) -> Result<Vec<UserSummary>, GitHubError> {
        let url = self.endpoint(
            &["users", login, "following"],
            &[("per_page", SECTION_PAGE_SIZE)],
        );
        self.get_json(url, Resource::Following).await
    }

    async fn get_user_organizations(
        &self,
        login: &str,
    ) -> Result<Vec<Organization>, GitHubError> {
        let url = self.endpoint(
            &["users", login, "orgs"],
            &[("per_page", SECTION_PAGE_SIZE)],
        );
        self.get_json(url, Resource::Organizations).await
    }

    async fn get_user_starred(&self, login: &str) -> Result<Vec<Repository>, GitHubError> {
        let url = self.endpoint(
            &["users", login, "starred"],
            &[("per_page", SECTION_PAGE_SIZE), ("sort", "updated")],
        );
        self.get_json(url, Resource::Starred).await
    }
}

/// Order repositories by stars (most first), ties broken by name.
///
/// GitHub's `sort=stars` leaves the order of equally starred repositories
/// unspecified, so the listing is re-sorted into a total order here.
pub fn sort_repositories(repos: &mut [Repository]) {
    repos.sort_by(|a, b| {
        b.stargazers_count
            .cmp(&a.stargazers_count)
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Classify a response before its body is read.
///
/// An exhausted quota wins over whatever the status says.
fn check_response(
    status: StatusCode,
    headers: &HeaderMap,
    resource: Resource<'_>,
) -> Result<(), GitHubError> {
    check_rate_limit(headers)?;

    if status.is_success() {
        return Ok(());
    }

    Err(match (resource, status) {
        (Resource::Search, StatusCode::UNPROCESSABLE_ENTITY) => GitHubError::InvalidQuery,
        (Resource::Repos(login), StatusCode::NOT_FOUND) => GitHubError::NotFound {
            login: login.to_string(),
        },
        (Resource::Repos(_), StatusCode::FORBIDDEN) => GitHubError::RateLimited {
            reset: reset_header(headers),
        },
        _ => GitHubError::api(status, resource.label()),
    })
}

fn check_rate_limit(headers: &HeaderMap) -> Result<(), GitHubError> {
    let remaining = headers
        .get(RATE_LIMIT_REMAINING)
        .and_then(|value| value.to_str().ok());

    if remaining == Some("0") {
        let reset = reset_header(headers);
        warn!(
            "Rate limit reached, resets at {:?}",
            reset.as_ref().and_then(RateLimitReset::reset_at)
        );
        return Err(GitHubError::RateLimited { reset });
    }

    Ok(())
}

fn reset_header(headers: &HeaderMap) -> Option<RateLimitReset> {
    headers
        .get(RATE_LIMIT_RESET)
        .and_then(|value| value.to_str().ok())
        .map(|value| RateLimitReset(value.to_string()))
}
