use futures::future::join_all;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::GitHubError;
use crate::github_client::UserApi;
use crate::session::{SearchSession, SectionItems, SectionKind, UserRecord};

/// Drives the API calls behind the user card list and owns its view-model.
///
/// Handlers take `&self` and never hold the session lock across a request, so
/// several of them may be in flight at once. Every result is merged by user id
/// and only if it still belongs to the current search.
pub struct Explorer<A> {
    api: A,
    session: Mutex<SearchSession>,
}

impl<A: UserApi> Explorer<A> {
    pub fn new(api: A) -> Self {
        Explorer {
            api,
            session: Mutex::new(SearchSession::default()),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Snapshot of the current view-model.
    pub async fn session(&self) -> SearchSession {
        self.session.lock().await.clone()
    }

    /// Start a new search, replacing the previous session wholesale.
    ///
    /// Returns once the search and every per-user detail fetch have settled.
    pub async fn on_search_submit(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            debug!("Ignoring blank search");
            return;
        }

        let generation = {
            let mut session = self.session.lock().await;
            let next = SearchSession::started(query, &session);
            *session = next;
            session.generation
        };
        info!("Searching users for '{}'", query);

        let page = match self.api.search_users(query).await {
            Ok(page) => page,
            Err(e) => {
                let mut session = self.session.lock().await;
                if session.generation == generation {
                    warn!("Search for '{}' failed: {}", query, e);
                    session.users.clear();
                    session.error = Some(e.to_string());
                    session.loading = false;
                } else {
                    debug!("Discarding failure of superseded search '{}'", query);
                }
                return;
            }
        };

        let users: Vec<(u64, String)> = {
            let mut session = self.session.lock().await;
            if session.generation != generation {
                debug!("Discarding results of superseded search '{}'", query);
                return;
            }
            session.total_count = page.total_count;
            session.users = page.items.into_iter().map(UserRecord::new).collect();
            session
                .users
                .iter()
                .map(|record| (record.id(), record.user.login.clone()))
                .collect()
        };

        join_all(
            users
                .into_iter()
                .map(|(id, login)| self.enrich_user(generation, id, login)),
        )
        .await;

        let mut session = self.session.lock().await;
        if session.generation == generation {
            session.loading = false;
            info!(
                "Loaded {} of {} users for '{}'",
                session.users.len(),
                session.total_count,
                query
            );
        }
    }

    /// Open or close a user card. Cards carry no data of their own, so this never fetches.
    pub async fn on_toggle_user(&self, user_id: u64) {
        let mut session = self.session.lock().await;
        match session.user_mut(user_id) {
            Some(record) => record.expanded = !record.expanded,
            None => debug!("Ignoring toggle for unknown user {}", user_id),
        }
    }

    /// Open or close one section of a user card.
    ///
    /// The first time a section opens its items are fetched; after that,
    /// success or failure, it is never fetched again for this session.
    pub async fn on_toggle_section(&self, user_id: u64, kind: SectionKind) {
        let (generation, login) = {
            let mut session = self.session.lock().await;
            let generation = session.generation;
            let Some(record) = session.user_mut(user_id) else {
                debug!("Ignoring {} toggle for unknown user {}", kind, user_id);
                return;
            };
            if !record.toggle_section(kind) {
                return;
            }
            (generation, record.user.login.clone())
        };

        debug!("Loading {} for '{}'", kind, login);
        let result = self.fetch_section(kind, &login).await;

        let mut session = self.session.lock().await;
        if session.generation != generation {
            debug!("Discarding {} of '{}' from a superseded search", kind, login);
            return;
        }

        match result {
            Ok(items) => {
                if let Some(record) = session.user_mut(user_id) {
                    record.finish_section(items);
                }
            }
            Err(e) => {
                warn!("Could not load {} for '{}': {}", kind, login, e);
                let message = e.to_string();
                if let Some(record) = session.user_mut(user_id) {
                    record.fail_section(kind, message.clone());
                }
                session.error = Some(message);
            }
        }
    }

    async fn enrich_user(&self, generation: u64, id: u64, login: String) {
        match self.api.get_user_detail(&login).await {
            Ok(detail) => {
                let mut session = self.session.lock().await;
                match session.current_user_mut(generation, id) {
                    Some(record) => record.user.merge_detail(detail),
                    None => debug!("Discarding stale detail for '{}'", login),
                }
            }
            // the card keeps the bare search fields
            Err(e) => warn!("Could not load details for '{}': {}", login, e),
        }
    }

    async fn fetch_section(
        &self,
        kind: SectionKind,
        login: &str,
    ) -> Result<SectionItems, GitHubError> {
        let items = match kind {
            SectionKind::Repositories => {
                SectionItems::Repositories(self.api.get_user_repos(login).await?)
            }
            SectionKind::Followers => {
                SectionItems::Followers(self.api.get_user_followers(login).await?)
            }
            SectionKind::Following => {
                SectionItems::Following(self.api.get_user_following(login).await?)
            }
            SectionKind::Organizations => {
                SectionItems::Organizations(self.api.get_user_organizations(login).await?)
            }
            SectionKind::Starred => SectionItems::Starred(self.api.get_user_starred(login).await?),
        };
        Ok(items)
    }
}
