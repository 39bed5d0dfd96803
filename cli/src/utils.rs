use std::fmt::Write;

use shared::{Category, Entry, Statistics};

pub fn entry_line(entry: &Entry, voted: bool) -> String {
    let marker = if voted { " (voted)" } else { "" };
    format!(
        "{}  [{}]  {} by {}  ❤ {}{}",
        entry.id,
        entry.category.display_name(),
        entry.title,
        entry.team_name,
        entry.votes,
        marker
    )
}

pub fn entry_details(entry: &Entry, voted: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", entry.title);
    let _ = writeln!(out, "  id:        {}", entry.id);
    let _ = writeln!(out, "  team:      {}", entry.team_name);
    let _ = writeln!(out, "  category:  {}", entry.category.display_name());
    let _ = writeln!(out, "  submitted: {}", entry.submitted_at.date());
    let _ = writeln!(out, "  votes:     {}{}", entry.votes, if voted { " (you voted)" } else { "" });
    for (label, url) in [("image", &entry.image_url), ("demo", &entry.demo_url), ("github", &entry.github_url)] {
        if let Some(url) = url {
            let _ = writeln!(out, "  {:<10} {url}", format!("{label}:"));
        }
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", entry.description);
    out
}

pub fn stats_summary(stats: &Statistics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total projects: {}", stats.total_entries);
    let _ = writeln!(out, "Total votes:    {}", stats.total_votes);
    let _ = writeln!(out, "Your votes:     {}", stats.device_vote_count);
    let _ = writeln!(out, "Most voted:     {} ({})", stats.leader_title(), stats.leader_votes());
    for category in Category::ALL {
        let _ = writeln!(
            out,
            "  {:<17} {}",
            category.display_name(),
            stats.category_breakdown.get(category)
        );
    }
    out
}
