//! # GitHub User Explorer
//!
//! A Rust library for searching GitHub users and progressively loading what
//! they have: profile details, repositories, followers, following,
//! organizations and starred repositories.
//!
//! ## Main Components
//!
//! - [`GitHubClient`]: anonymous REST client with rate-limit detection and error classification
//! - [`Explorer`]: owns the search session and decides which requests a user action needs
//! - [`SearchSession`]: the view-model, one [`UserRecord`] per search result
//! - [`Args`]: Command line argument structure for the bundled CLI
//!
//! ## Example
//!
//! ```no_run
//! use github_user_explorer_lib::{ClientConfig, Explorer, GitHubClient, SectionKind};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let client = GitHubClient::new(ClientConfig::default())?;
//!     let explorer = Explorer::new(client);
//!
//!     // Search, then open the repositories of the first hit
//!     explorer.on_search_submit("asruldev").await;
//!     let session = explorer.session().await;
//!     if let Some(first) = session.users.first() {
//!         explorer.on_toggle_section(first.id(), SectionKind::Repositories).await;
//!     }
//!
//!     Ok(())
//! }
//! ```

mod args;
mod error;
mod explorer;
mod github_client;
pub mod models;
pub mod render;
mod session;

// Re-export main components for documentation and external use
pub use crate::args::Args;
pub use crate::error::{GitHubError, RateLimitReset};
pub use crate::explorer::Explorer;
pub use crate::github_client::{
    sort_repositories, ClientConfig, GitHubClient, UserApi, DEFAULT_API_URL, DEFAULT_USER_AGENT,
};
pub use crate::session::{
    ExpandableSection, SearchSession, SectionItems, SectionKind, SectionState, UserRecord,
};
