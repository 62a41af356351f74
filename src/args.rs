use clap::Parser;
use url::Url;

use crate::github_client::{ClientConfig, DEFAULT_API_URL, DEFAULT_USER_AGENT};
use crate::session::SectionKind;

/// Search GitHub users and browse their profiles, repositories, followers,
/// following, organizations and starred repositories.
#[derive(Parser)]
#[clap(
    author,
    version,
    about,
    long_about = "Searches GitHub users (top 5 by followers), loads their profiles concurrently and lazily expands the requested sections for every result."
)]
pub struct Args {
    /// Username or user search query.
    pub query: String,

    /// Sections to expand for every result, comma separated.
    #[clap(short, long, value_enum, value_delimiter = ',', value_name = "SECTION")]
    pub expand: Vec<SectionKind>,

    /// Also list up to ten public gists of every result.
    #[clap(short, long)]
    pub gists: bool,

    /// Print the remaining API quota before searching.
    #[clap(short, long)]
    pub rate_limit: bool,

    /// Print the session as JSON instead of text.
    #[clap(long)]
    pub json: bool,

    /// Root of the GitHub REST API.
    #[clap(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: Url,

    /// User-Agent header sent with every request.
    #[clap(long, env = "GITHUB_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}

impl Args {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_url.clone(),
            user_agent: self.user_agent.clone(),
        }
    }
}
