use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A GitHub user as returned by `/search/users`, optionally enriched by `/users/{login}`.
///
/// Search items only carry the identity fields; everything else stays `None`
/// until a detail fetch has been merged in with [`UserSummary::merge_detail`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: u64,
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
    #[serde(rename = "type", default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub site_admin: bool,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub blog: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub twitter_username: Option<String>,
    #[serde(default)]
    pub followers: Option<u32>,
    #[serde(default)]
    pub following: Option<u32>,
    #[serde(default)]
    pub public_repos: Option<u32>,
    #[serde(default)]
    pub public_gists: Option<u32>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl UserSummary {
    /// Overlays the profile fields of a detail response onto this record.
    ///
    /// Identity (`id`, `login`) and the search score are kept; a field the
    /// detail payload left empty never erases what is already known.
    pub fn merge_detail(&mut self, detail: UserSummary) {
        fn overlay<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        if !detail.avatar_url.is_empty() {
            self.avatar_url = detail.avatar_url;
        }
        if !detail.html_url.is_empty() {
            self.html_url = detail.html_url;
        }
        self.site_admin = detail.site_admin;
        overlay(&mut self.account_type, detail.account_type);
        overlay(&mut self.name, detail.name);
        overlay(&mut self.bio, detail.bio);
        overlay(&mut self.company, detail.company);
        overlay(&mut self.location, detail.location);
        overlay(&mut self.blog, detail.blog);
        overlay(&mut self.email, detail.email);
        overlay(&mut self.twitter_username, detail.twitter_username);
        overlay(&mut self.followers, detail.followers);
        overlay(&mut self.following, detail.following);
        overlay(&mut self.public_repos, detail.public_repos);
        overlay(&mut self.public_gists, detail.public_gists);
        overlay(&mut self.created_at, detail.created_at);
        overlay(&mut self.updated_at, detail.updated_at);
    }
}

/// Response body of `/search/users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    #[serde(default)]
    pub items: Vec<UserSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    #[serde(default)]
    pub watchers_count: u32,
    #[serde(default)]
    pub open_issues_count: u32,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub pushed_at: Option<String>,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub license: Option<License>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: u64,
    pub login: String,
    pub avatar_url: String,
    /// `/users/{login}/orgs` does not include this; the full org payload does.
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GistFile {
    pub filename: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gist {
    pub id: String,
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub comments: u32,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub files: BTreeMap<String, GistFile>,
}

/// One bucket of `/rate_limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitInfo {
    pub limit: u32,
    pub remaining: u32,
    pub reset: i64,
    #[serde(default)]
    pub used: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitResources {
    pub core: RateLimitInfo,
    pub search: RateLimitInfo,
}

/// Response body of `/rate_limit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitStatus {
    pub resources: RateLimitResources,
}
