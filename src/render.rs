use std::fmt::Write;

use chrono::{TimeZone, Utc};

use crate::models::{
    Gist, Organization, RateLimitInfo, RateLimitStatus, Repository, UserSummary,
};
use crate::session::{ExpandableSection, SearchSession, SectionKind, SectionState, UserRecord};

const INDENT: &str = "    ";

/// Compact counter, e.g. `1.2k` for 1234.
pub fn format_count(n: u32) -> String {
    if n >= 1000 {
        format!("{:.1}k", f64::from(n) / 1000.0)
    } else {
        n.to_string()
    }
}

fn marker(expanded: bool) -> &'static str {
    if expanded {
        "▲"
    } else {
        "▼"
    }
}

/// Render the card list as plain text.
pub fn render_session(session: &SearchSession) -> String {
    let mut out = String::new();

    if let Some(error) = &session.error {
        let _ = writeln!(out, "Error: {}", error);
    }
    if session.loading {
        let _ = writeln!(out, "Loading...");
    }
    if session.users.is_empty() {
        return out;
    }

    let _ = writeln!(
        out,
        "Showing {} of {} users for \u{201c}{}\u{201d}",
        session.users.len(),
        session.total_count,
        session.query
    );
    for record in &session.users {
        render_user(&mut out, record);
    }
    out
}

fn render_user(out: &mut String, record: &UserRecord) {
    let user = &record.user;
    let marker = marker(record.expanded);
    let _ = match &user.name {
        Some(name) => writeln!(out, "{marker} {} ({}) {}", user.login, name, user.html_url),
        None => writeln!(out, "{marker} {} {}", user.login, user.html_url),
    };
    if !record.expanded {
        return;
    }

    render_profile(out, user);
    for kind in SectionKind::ALL {
        match kind {
            SectionKind::Repositories => {
                render_section(out, kind, &record.repositories, repo_line)
            }
            SectionKind::Followers => render_section(out, kind, &record.followers, user_line),
            SectionKind::Following => render_section(out, kind, &record.following, user_line),
            SectionKind::Organizations => {
                render_section(out, kind, &record.organizations, org_line)
            }
            SectionKind::Starred => render_section(out, kind, &record.starred, repo_line),
        }
    }
}

fn render_profile(out: &mut String, user: &UserSummary) {
    let counters: Vec<String> = [
        ("followers", user.followers),
        ("following", user.following),
        ("repos", user.public_repos),
        ("gists", user.public_gists),
    ]
    .into_iter()
    .filter_map(|(label, count)| count.map(|n| format!("{} {}", format_count(n), label)))
    .collect();
    if !counters.is_empty() {
        let _ = writeln!(out, "{INDENT}{}", counters.join(" · "));
    }

    for (label, value) in [
        ("bio", &user.bio),
        ("company", &user.company),
        ("location", &user.location),
        ("blog", &user.blog),
        ("twitter", &user.twitter_username),
    ] {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            let _ = writeln!(out, "{INDENT}{label}: {value}");
        }
    }
}

fn render_section<T>(
    out: &mut String,
    kind: SectionKind,
    section: &ExpandableSection<T>,
    line: fn(&T) -> String,
) {
    let _ = writeln!(out, "{INDENT}{} {}", marker(section.expanded), kind.title());
    if !section.expanded {
        return;
    }

    match &section.state {
        SectionState::Unloaded | SectionState::Loading => {
            let _ = writeln!(out, "{INDENT}{INDENT}Loading...");
        }
        SectionState::Failed(message) => {
            let _ = writeln!(out, "{INDENT}{INDENT}{}", message);
        }
        SectionState::Loaded(items) if items.is_empty() => {
            let _ = writeln!(out, "{INDENT}{INDENT}Nothing here yet");
        }
        SectionState::Loaded(items) => {
            for item in items {
                let _ = writeln!(out, "{INDENT}{INDENT}{}", line(item));
            }
        }
    }
}

fn repo_line(repo: &Repository) -> String {
    let description = repo
        .description
        .as_deref()
        .unwrap_or("No description available");
    format!(
        "{} ⭐ {}  {}",
        repo.full_name,
        format_count(repo.stargazers_count),
        description
    )
}

fn user_line(user: &UserSummary) -> String {
    format!("@{} {}", user.login, user.html_url)
}

fn org_line(org: &Organization) -> String {
    match &org.description {
        Some(description) if !description.is_empty() => format!("{}  {}", org.login, description),
        _ => org.login.clone(),
    }
}

pub fn render_gists(login: &str, gists: &[Gist]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Gists of {}", login);
    if gists.is_empty() {
        let _ = writeln!(out, "{INDENT}Nothing here yet");
    }
    for gist in gists {
        let files: Vec<&str> = gist.files.keys().map(String::as_str).collect();
        let _ = writeln!(
            out,
            "{INDENT}{} [{}] {}",
            gist.html_url,
            files.join(", "),
            gist.description.as_deref().unwrap_or("")
        );
    }
    out
}

pub fn render_rate_limit(status: &RateLimitStatus) -> String {
    fn bucket(label: &str, info: &RateLimitInfo) -> String {
        let reset = Utc
            .timestamp_opt(info.reset, 0)
            .single()
            .map(|at| at.format("%H:%M:%S UTC").to_string())
            .unwrap_or_else(|| info.reset.to_string());
        format!(
            "Rate limit ({}): {}/{} remaining, resets at {}",
            label, info.remaining, info.limit, reset
        )
    }

    format!(
        "{}\n{}\n",
        bucket("core", &status.resources.core),
        bucket("search", &status.resources.search)
    )
}
