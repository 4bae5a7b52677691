//! Status page and console report rendering
//!
//! Everything here is a pure function of its inputs; no I/O.

use std::fmt::Write;

use crate::models::LibraryStats;
use crate::services::gallery::{Gallery, RecentCard};

const PAGE_TEMPLATE: &str = include_str!("../templates/stats.html");

/// Largest delay `setTimeout` accepts; longer ones fire immediately
const MAX_RELOAD_MS: u64 = i32::MAX as u64;

/// Render the full status page
pub fn render_page(
    stats: &LibraryStats,
    gallery: &Gallery,
    connection: &str,
    last_updated: &str,
    refresh_interval_secs: u64,
) -> String {
    let replacements: [(&str, String); 17] = [
        ("connection", escape_html(connection)),
        ("last_updated", escape_html(last_updated)),
        ("total_movies", format_count(stats.total_movies)),
        ("watched_movies", format_count(stats.watched_movies)),
        ("unwatched_movies", format_count(stats.unwatched_movies())),
        (
            "movie_watch_percentage",
            format!("{:.1}", stats.movie_watch_percentage()),
        ),
        ("total_tv_shows", format_count(stats.total_tv_shows)),
        ("total_episodes", format_count(stats.total_episodes)),
        ("watched_episodes", format_count(stats.watched_episodes)),
        (
            "episode_watch_percentage",
            format!("{:.1}", stats.episode_watch_percentage()),
        ),
        ("total_artists", format_count(stats.total_artists)),
        ("total_albums", format_count(stats.total_albums)),
        ("total_songs", format_count(stats.total_songs)),
        ("recent_movies", render_cards(&gallery.movies, "movies")),
        ("recent_episodes", render_cards(&gallery.episodes, "episodes")),
        ("recent_albums", render_cards(&gallery.albums, "albums")),
        (
            "refresh_ms",
            reload_delay_ms(refresh_interval_secs).to_string(),
        ),
    ];

    fill_template(PAGE_TEMPLATE, &replacements)
}

fn reload_delay_ms(refresh_interval_secs: u64) -> u64 {
    refresh_interval_secs
        .saturating_mul(1000)
        .min(MAX_RELOAD_MS)
}

/// Substitute `{{key}}` placeholders in one pass over `template`.
///
/// Inserted values are never scanned again. Unknown placeholders are kept
/// verbatim.
fn fill_template(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let key = &after[..end];
        match values.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push_str("{{");
                out.push_str(key);
                out.push_str("}}");
            }
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

fn render_cards(cards: &[RecentCard], what: &str) -> String {
    if cards.is_empty() {
        return format!("<p class=\"empty\">No recently added {}</p>", what);
    }

    let mut html = String::new();
    for card in cards {
        let image = match &card.image {
            Some(src) => format!(
                "<img src=\"{}\" class=\"{}\" alt=\"{}\">",
                escape_html(src),
                card.kind.image_class(),
                escape_html(&card.title)
            ),
            None => format!("<div class=\"no-image\">{}</div>", card.icon),
        };

        let _ = write!(
            html,
            "<div class=\"recent-entry\">{}<div><strong>{}</strong>",
            image,
            escape_html(&card.title)
        );
        if !card.subtitle.is_empty() {
            let _ = write!(
                html,
                "<br><span class=\"subtitle\">{}</span>",
                escape_html(&card.subtitle)
            );
        }
        if !card.date.is_empty() {
            let _ = write!(
                html,
                "<br><span class=\"date\">Added {}</span>",
                escape_html(&card.date)
            );
        }
        html.push_str("</div></div>\n");
    }
    html
}

/// Page shown when Kodi cannot be reached
pub fn render_error_page(connection: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Kodi Library Statistics - Error</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 40px; background: #1b1d24; color: white; }}
        .error {{ max-width: 600px; margin: 0 auto; padding: 20px; background: rgba(220, 53, 69, 0.2); border: 1px solid #dc3545; border-radius: 8px; }}
    </style>
</head>
<body>
    <div class="error">
        <h1>Connection Error</h1>
        <p>Failed to connect to Kodi at {}</p>
        <p>Check that Kodi is running and that its web interface is enabled.</p>
    </div>
</body>
</html>
"#,
        escape_html(connection)
    )
}

/// Plain-text report printed by the CLI probe
pub fn render_report(stats: &LibraryStats) -> String {
    let rule = "=".repeat(50);
    let mut out = String::new();

    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "KODI LIBRARY STATISTICS");
    let _ = writeln!(out, "{}", rule);

    let _ = writeln!(out, "\nMOVIES:");
    let _ = writeln!(out, "  Total Movies:      {}", format_count(stats.total_movies));
    let _ = writeln!(
        out,
        "  Watched Movies:    {} ({:.1}%)",
        format_count(stats.watched_movies),
        stats.movie_watch_percentage()
    );
    let _ = writeln!(out, "  Unwatched Movies:  {}", format_count(stats.unwatched_movies()));

    let _ = writeln!(out, "\nTV SHOWS:");
    let _ = writeln!(out, "  Total TV Shows:    {}", format_count(stats.total_tv_shows));
    let _ = writeln!(out, "  Total Episodes:    {}", format_count(stats.total_episodes));
    let _ = writeln!(
        out,
        "  Watched Episodes:  {} ({:.1}%)",
        format_count(stats.watched_episodes),
        stats.episode_watch_percentage()
    );
    let _ = writeln!(
        out,
        "  Unwatched Episodes: {}",
        format_count(stats.unwatched_episodes())
    );

    let _ = writeln!(out, "\nMUSIC:");
    let _ = writeln!(out, "  Total Artists:     {}", format_count(stats.total_artists));
    let _ = writeln!(out, "  Total Albums:      {}", format_count(stats.total_albums));
    let _ = writeln!(out, "  Total Songs:       {}", format_count(stats.total_songs));

    if !stats.degraded.is_empty() {
        let groups: Vec<&str> = stats.degraded.iter().map(|g| g.as_str()).collect();
        let _ = writeln!(out, "\nIncomplete groups: {}", groups.join(", "));
    }

    let _ = write!(out, "{}", rule);
    out
}

/// `1234567` -> `1,234,567`
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
