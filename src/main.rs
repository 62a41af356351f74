use clap::Parser;
use dotenv::dotenv;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use std::error::Error;
use tokio::time::Duration;
use tracing::{error, info, warn};

use github_user_explorer_lib::models::Gist;
use github_user_explorer_lib::render::{render_gists, render_rate_limit, render_session};
use github_user_explorer_lib::{Args, Explorer, GitHubClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    dotenv().ok();

    // Initialize the tracing logger
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    if args.query.trim().is_empty() {
        warn!("Nothing to search for");
        return Ok(());
    }

    let client = GitHubClient::new(args.client_config())?;
    info!("Using GitHub API at {}", client.base_url());

    if args.rate_limit {
        match client.get_rate_limit_status().await {
            Some(status) => print!("{}", render_rate_limit(&status)),
            None => warn!("Rate limit status unavailable"),
        }
    }

    let explorer = Explorer::new(client);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {wide_msg}")?
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb.enable_steady_tick(Duration::from_millis(80));
    pb.set_message(format!("Searching for '{}'", args.query.trim()));

    explorer.on_search_submit(&args.query).await;
    let users: Vec<(u64, String)> = explorer
        .session()
        .await
        .users
        .iter()
        .map(|record| (record.id(), record.user.login.clone()))
        .collect();

    if !args.expand.is_empty() {
        pb.set_message(format!("Loading sections for {} users", users.len()));
        let explorer = &explorer;
        let expand = &args.expand;
        join_all(users.iter().map(|&(id, _)| async move {
            explorer.on_toggle_user(id).await;
            for kind in expand {
                explorer.on_toggle_section(id, *kind).await;
            }
        }))
        .await;
    }

    let mut gists: Vec<(String, Vec<Gist>)> = Vec::new();
    if args.gists {
        pb.set_message("Loading gists");
        let results = join_all(
            users
                .iter()
                .map(|(_, login)| explorer.api().get_user_gists(login)),
        )
        .await;
        for ((_, login), result) in users.iter().zip(results) {
            match result {
                Ok(list) => gists.push((login.clone(), list)),
                Err(e) => warn!("Could not load gists for '{}': {}", login, e),
            }
        }
    }

    pb.finish_and_clear();

    let session = explorer.session().await;
    if args.json {
        let output = if args.gists {
            let gists: serde_json::Map<String, serde_json::Value> = gists
                .into_iter()
                .map(|(login, list)| {
                    Ok::<_, serde_json::Error>((login, serde_json::to_value(list)?))
                })
                .collect::<Result<_, serde_json::Error>>()?;
            json!({ "session": session, "gists": gists })
        } else {
            serde_json::to_value(&session)?
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", render_session(&session));
        for (login, list) in &gists {
            print!("{}", render_gists(login, list));
        }
    }

    if let Some(message) = session.error {
        error!("{}", message);
        return Err(message.into());
    }

    Ok(())
}
