//! Text rendering for the session

use colored::Colorize;

use crate::registry::{ClickRecord, ShortUrlEntry};
use crate::services::{LinkStats, StatsSummary};

pub fn created(entry: &ShortUrlEntry, short_url: &str) -> String {
    format!(
        "{} Created short URL\n  Original URL: {}\n  Short URL:    {}\n  Expires:      {}",
        "✓".bold().green(),
        entry.long_url.blue().underline(),
        short_url.cyan(),
        entry.expires_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

pub fn opened(long_url: &str, record: &ClickRecord) -> String {
    format!(
        "{} Opened {} (source: {}, location: {})",
        "→".bold().green(),
        long_url.blue().underline(),
        record.source,
        record.location
    )
}

pub fn list(stats: &[LinkStats]) -> String {
    if stats.is_empty() {
        return format!("{} No short URLs created yet.", "ℹ".bold().blue());
    }

    let mut lines = Vec::with_capacity(stats.len());
    for s in stats {
        let remaining = if s.expired {
            "expired".red().to_string()
        } else {
            format!("expires in: {}", s.remaining).dimmed().yellow().to_string()
        };
        lines.push(format!(
            "  {} -> {} ({})",
            s.short_url.cyan(),
            s.long_url.blue().underline(),
            remaining
        ));
    }
    lines.join("\n")
}

pub fn stats(stats: &[LinkStats], summary: &StatsSummary) -> String {
    if stats.is_empty() {
        return format!("{} No short URLs created yet.", "ℹ".bold().blue());
    }

    let mut out: Vec<String> = stats.iter().map(link_stats).collect();
    out.push(format!(
        "{} {} link(s), {} active, {} click(s) total",
        "ℹ".bold().blue(),
        summary.total_links,
        summary.active_links,
        summary.total_clicks
    ));
    out.join("\n\n")
}

pub fn link_stats(s: &LinkStats) -> String {
    let mut lines = vec![
        s.short_url.bold().cyan().to_string(),
        format!("  Original URL: {}", s.long_url.blue().underline()),
        format!("  Expiry:       {}", s.expires_at.format("%Y-%m-%d %H:%M:%S UTC")),
        format!("  Total clicks: {}", s.total_clicks),
    ];

    if s.clicks.is_empty() {
        lines.push(format!("  {}", "No clicks yet".italic()));
        return lines.join("\n");
    }

    lines.push("  Click details:".to_string());
    for click in &s.clicks {
        lines.push(format!(
            "    {}  source: {}  location: {}",
            click.timestamp.format("%Y-%m-%d %H:%M:%S"),
            click.source,
            click.location
        ));
    }

    let referrers: Vec<String> = s
        .top_referrers
        .iter()
        .map(|r| format!("{} {} ({}%)", r.referrer, r.count, r.percentage))
        .collect();
    lines.push(format!("  Referrers:    {}", referrers.join(", ")));

    let locations: Vec<String> = s
        .locations
        .iter()
        .map(|l| format!("{} ({})", l.location, l.count))
        .collect();
    lines.push(format!("  Locations:    {}", locations.join(", ")));

    lines.join("\n")
}
