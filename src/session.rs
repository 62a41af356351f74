use std::fmt;

use clap::ValueEnum;
use serde::Serialize;

use crate::models::{Organization, Repository, UserSummary};

/// The lazily loaded lists attached to every user card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    #[value(alias = "repos")]
    Repositories,
    Followers,
    Following,
    #[value(alias = "orgs")]
    Organizations,
    Starred,
}

impl SectionKind {
    pub const ALL: [SectionKind; 5] = [
        SectionKind::Repositories,
        SectionKind::Followers,
        SectionKind::Following,
        SectionKind::Organizations,
        SectionKind::Starred,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::Repositories => "Repositories",
            SectionKind::Followers => "Followers",
            SectionKind::Following => "Following",
            SectionKind::Organizations => "Organizations",
            SectionKind::Starred => "Starred",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title().to_lowercase())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "items", rename_all = "snake_case")]
pub enum SectionState<T> {
    Unloaded,
    Loading,
    Loaded(Vec<T>),
    /// The first load failed; the section stays empty for the rest of the session.
    Failed(String),
}

/// One collapsible list on a user card.
///
/// The first expansion starts the only fetch this section will ever make.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpandableSection<T> {
    pub expanded: bool,
    pub state: SectionState<T>,
}

impl<T> Default for ExpandableSection<T> {
    fn default() -> Self {
        ExpandableSection {
            expanded: false,
            state: SectionState::Unloaded,
        }
    }
}

impl<T> ExpandableSection<T> {
    /// Whether a fetch has ever been issued for this section.
    pub fn loaded_once(&self) -> bool {
        !matches!(self.state, SectionState::Unloaded)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SectionState::Loading)
    }

    pub fn items(&self) -> Option<&[T]> {
        match &self.state {
            SectionState::Loaded(items) => Some(items),
            _ => None,
        }
    }

    /// Flip `expanded`. Returns true when the caller has to fetch the items.
    fn toggle(&mut self) -> bool {
        self.expanded = !self.expanded;
        if self.expanded && !self.loaded_once() {
            self.state = SectionState::Loading;
            return true;
        }
        false
    }

    fn finish(&mut self, items: Vec<T>) {
        self.state = SectionState::Loaded(items);
    }

    fn fail(&mut self, message: String) {
        self.state = SectionState::Failed(message);
    }
}

/// Freshly fetched items for one section, tagged with the section they belong to.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionItems {
    Repositories(Vec<Repository>),
    Followers(Vec<UserSummary>),
    Following(Vec<UserSummary>),
    Organizations(Vec<Organization>),
    Starred(Vec<Repository>),
}

impl SectionItems {
    pub fn kind(&self) -> SectionKind {
        match self {
            SectionItems::Repositories(_) => SectionKind::Repositories,
            SectionItems::Followers(_) => SectionKind::Followers,
            SectionItems::Following(_) => SectionKind::Following,
            SectionItems::Organizations(_) => SectionKind::Organizations,
            SectionItems::Starred(_) => SectionKind::Starred,
        }
    }
}

/// A search result together with everything loaded for it so far.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRecord {
    pub user: UserSummary,
    /// Card-level disclosure; never triggers a fetch by itself.
    pub expanded: bool,
    pub repositories: ExpandableSection<Repository>,
    pub followers: ExpandableSection<UserSummary>,
    pub following: ExpandableSection<UserSummary>,
    pub organizations: ExpandableSection<Organization>,
    pub starred: ExpandableSection<Repository>,
}

impl UserRecord {
    pub fn new(user: UserSummary) -> Self {
        UserRecord {
            user,
            expanded: false,
            repositories: ExpandableSection::default(),
            followers: ExpandableSection::default(),
            following: ExpandableSection::default(),
            organizations: ExpandableSection::default(),
            starred: ExpandableSection::default(),
        }
    }

    pub fn id(&self) -> u64 {
        self.user.id
    }

    pub fn is_section_expanded(&self, kind: SectionKind) -> bool {
        match kind {
            SectionKind::Repositories => self.repositories.expanded,
            SectionKind::Followers => self.followers.expanded,
            SectionKind::Following => self.following.expanded,
            SectionKind::Organizations => self.organizations.expanded,
            SectionKind::Starred => self.starred.expanded,
        }
    }

    pub fn section_loaded_once(&self, kind: SectionKind) -> bool {
        match kind {
            SectionKind::Repositories => self.repositories.loaded_once(),
            SectionKind::Followers => self.followers.loaded_once(),
            SectionKind::Following => self.following.loaded_once(),
            SectionKind::Organizations => self.organizations.loaded_once(),
            SectionKind::Starred => self.starred.loaded_once(),
        }
    }

    /// Flip a section open or closed. Returns true when its items must be fetched now.
    pub fn toggle_section(&mut self, kind: SectionKind) -> bool {
        match kind {
            SectionKind::Repositories => self.repositories.toggle(),
            SectionKind::Followers => self.followers.toggle(),
            SectionKind::Following => self.following.toggle(),
            SectionKind::Organizations => self.organizations.toggle(),
            SectionKind::Starred => self.starred.toggle(),
        }
    }

    pub fn finish_section(&mut self, items: SectionItems) {
        match items {
            SectionItems::Repositories(items) => self.repositories.finish(items),
            SectionItems::Followers(items) => self.followers.finish(items),
            SectionItems::Following(items) => self.following.finish(items),
            SectionItems::Organizations(items) => self.organizations.finish(items),
            SectionItems::Starred(items) => self.starred.finish(items),
        }
    }

    pub fn fail_section(&mut self, kind: SectionKind, message: String) {
        match kind {
            SectionKind::Repositories => self.repositories.fail(message),
            SectionKind::Followers => self.followers.fail(message),
            SectionKind::Following => self.following.fail(message),
            SectionKind::Organizations => self.organizations.fail(message),
            SectionKind::Starred => self.starred.fail(message),
        }
    }
}

/// Everything produced by one search submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchSession {
    pub query: String,
    /// Incremented on every submission; responses tagged with an older value are stale.
    pub generation: u64,
    /// In the order GitHub ranked them.
    pub users: Vec<UserRecord>,
    pub total_count: u64,
    pub loading: bool,
    pub error: Option<String>,
}

impl SearchSession {
    /// A fresh, loading session replacing `previous`.
    pub fn started(query: &str, previous: &SearchSession) -> Self {
        SearchSession {
            query: query.to_string(),
            generation: previous.generation + 1,
            users: Vec::new(),
            total_count: 0,
            loading: true,
            error: None,
        }
    }

    pub fn user(&self, id: u64) -> Option<&UserRecord> {
        self.users.iter().find(|record| record.id() == id)
    }

    pub fn user_mut(&mut self, id: u64) -> Option<&mut UserRecord> {
        self.users.iter_mut().find(|record| record.id() == id)
    }

    /// Look up a user only if the response that wants it still belongs to this session.
    pub fn current_user_mut(&mut self, generation: u64, id: u64) -> Option<&mut UserRecord> {
        if self.generation != generation {
            return None;
        }
        self.user_mut(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: u64, login: &str) -> UserSummary {
        UserSummary {
            id,
            login: login.to_string(),
            avatar_url: String::new(),
            html_url: format!("https://github.com/{login}"),
            account_type: None,
            site_admin: false,
            score: None,
            name: None,
            bio: None,
            company: None,
            location: None,
            blog: None,
            email: None,
            twitter_username: None,
            followers: None,
            following: None,
            public_repos: None,
            public_gists: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn first_expand_requests_a_fetch_once() {
        let mut section: ExpandableSection<u32> = ExpandableSection::default();
        assert!(!section.loaded_once());

        assert!(section.toggle());
        assert!(section.expanded);
        assert!(section.is_loading());

        section.finish(vec![1, 2]);
        assert!(!section.toggle());
        assert!(!section.expanded);
        assert!(!section.toggle());
        assert!(section.expanded);
        assert_eq!(section.items(), Some(&[1, 2][..]));
    }

    #[test]
    fn failed_section_never_refetches() {
        let mut section: ExpandableSection<u32> = ExpandableSection::default();
        assert!(section.toggle());
        section.fail("boom".to_string());

        assert!(section.expanded);
        assert!(section.loaded_once());
        assert!(!section.toggle());
        assert!(!section.toggle());
        assert_eq!(section.items(), None);
    }

    #[test]
    fn collapsing_while_loading_does_not_refetch() {
        let mut section: ExpandableSection<u32> = ExpandableSection::default();
        assert!(section.toggle());
        assert!(!section.toggle());
        assert!(!section.toggle());
        assert!(section.is_loading());
    }

    #[test]
    fn section_items_land_in_their_own_section() {
        let mut record = UserRecord::new(user(1, "octocat"));
        assert!(record.toggle_section(SectionKind::Followers));
        record.finish_section(SectionItems::Followers(vec![user(2, "hubot")]));

        assert_eq!(record.followers.items().map(<[_]>::len), Some(1));
        assert!(!record.section_loaded_once(SectionKind::Following));
        assert!(record.is_section_expanded(SectionKind::Followers));
        assert!(!record.is_section_expanded(SectionKind::Repositories));
    }

    #[test]
    fn stale_generation_finds_no_user() {
        let mut session = SearchSession::started("octo", &SearchSession::default());
        session.users.push(UserRecord::new(user(7, "octo")));

        assert_eq!(session.generation, 1);
        assert!(session.current_user_mut(1, 7).is_some());
        assert!(session.current_user_mut(0, 7).is_none());
        assert!(session.current_user_mut(1, 8).is_none());
    }
}
