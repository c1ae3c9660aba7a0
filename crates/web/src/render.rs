//! Server-side HTML for the search and watch pages.

use chrono::DateTime;
use domain::{SearchResultItem, VideoDetailRecord, VideoId};
use html_escape::{decode_html_entities, encode_double_quoted_attribute, encode_text};

const EMBED_BASE: &str = "https://www.youtube.com/embed";

const STYLE: &str = "\
body{margin:0;background:#09090b;color:#fafafa;font-family:system-ui,sans-serif}\
main{max-width:64rem;margin:0 auto;padding:2.5rem 1.5rem}\
a{color:inherit;text-decoration:none}\
form{display:flex;gap:.75rem;margin:1.5rem 0}\
input{flex:1;padding:.75rem 1rem;border-radius:.5rem;border:1px solid #27272a;background:#09090b;color:#fafafa}\
button{padding:.75rem 1rem;border:0;border-radius:.5rem;background:#10b981;font-weight:600}\
ul{list-style:none;padding:0}\
li a{display:flex;gap:1rem;padding:1rem;border:1px solid #27272a;border-radius:.5rem;margin-bottom:1rem}\
.thumb{width:320px;aspect-ratio:16/9;background:#18181b;display:flex;align-items:center;justify-content:center;color:#71717a;font-size:.75rem}\
.thumb img{width:100%;height:100%;object-fit:cover}\
.muted{color:#a1a1aa;font-size:.875rem}\
.error{color:#f87171;text-align:center}\
.player{aspect-ratio:16/9;width:100%;border:0;border-radius:.75rem;background:#000}\
.description{white-space:pre-line}";

/// What the results section of the search page shows
pub enum Listing<'a> {
    /// No query yet
    Prompt,
    Results(&'a [SearchResultItem]),
    Failed,
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<main>\n{body}\n</main>\n</body>\n</html>\n",
        encode_text(title)
    )
}

/// `Jan 5, 2024` for RFC 3339 timestamps; anything else is shown as is
pub fn format_date(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(date) => date.format("%b %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Search titles arrive HTML-encoded (`&#39;`, `&amp;`); decode then re-escape
fn search_text(raw: &str) -> String {
    encode_text(&decode_html_entities(raw)).into_owned()
}

fn result_card(item: &SearchResultItem) -> String {
    let title = search_text(&item.title);
    let thumbnail = match &item.thumbnail_url {
        Some(url) => format!(
            "<img src=\"{}\" alt=\"{}\" loading=\"lazy\">",
            encode_double_quoted_attribute(url),
            encode_double_quoted_attribute(&decode_html_entities(&item.title)),
        ),
        None => "No thumbnail".to_string(),
    };

    format!(
        "<li><a href=\"/watch/{}\"><div class=\"thumb\">{thumbnail}</div>\
         <div><h2>{title}</h2><p class=\"muted\">{}</p><p class=\"muted\">{}</p></div></a></li>",
        encode_double_quoted_attribute(item.id.as_str()),
        search_text(&item.channel_name),
        encode_text(&format_date(&item.published_at)),
    )
}

fn listing(query: &str, listing: &Listing<'_>) -> String {
    match listing {
        Listing::Prompt => "<p class=\"muted\">Search to find videos.</p>".to_string(),
        Listing::Failed => "<p class=\"error\">Search failed. Please try again.</p>".to_string(),
        Listing::Results([]) => "<p class=\"muted\">No videos found.</p>".to_string(),
        Listing::Results(items) => {
            let cards: String = items.iter().map(result_card).collect();
            format!(
                "<p class=\"muted\">Results for &ldquo;{}&rdquo;: {} videos</p>\n<ul>{cards}</ul>",
                encode_text(query),
                items.len(),
            )
        }
    }
}

pub fn search_page(query: &str, results: &Listing<'_>) -> String {
    let body = format!(
        "<p class=\"muted\">NalgoTube</p>\n<h1>Video search</h1>\n\
         <form method=\"get\" action=\"/\">\
         <label for=\"search\" hidden>Keyword</label>\
         <input id=\"search\" name=\"q\" value=\"{}\" placeholder=\"Enter a keyword\">\
         <button type=\"submit\">Search</button></form>\n<section>{}</section>",
        encode_double_quoted_attribute(query),
        listing(query, results),
    );
    let title = if query.is_empty() {
        "NalgoTube".to_string()
    } else {
        format!("{query} - NalgoTube")
    };
    layout(&title, &body)
}

pub fn watch_page(id: &VideoId, video: &VideoDetailRecord) -> String {
    let body = format!(
        "<a href=\"/\" class=\"muted\">&larr; Back</a>\n\
         <iframe class=\"player\" src=\"{EMBED_BASE}/{}\" title=\"{}\" \
         allow=\"accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture; web-share\" \
         allowfullscreen></iframe>\n\
         <h1>{}</h1>\n<p class=\"muted\">{} &middot; {}</p>\n<p class=\"description\">{}</p>",
        encode_double_quoted_attribute(id.as_str()),
        encode_double_quoted_attribute(&video.title),
        encode_text(&video.title),
        encode_text(&video.channel_name),
        encode_text(&format_date(&video.published_at)),
        encode_text(&video.description),
    );
    layout(&video.title, &body)
}

pub fn not_found_page() -> String {
    layout(
        "Video not found - NalgoTube",
        "<a href=\"/\" class=\"muted\">&larr; Back</a>\n<h1>Video not found</h1>\n\
         <p class=\"muted\">This video does not exist or is no longer available.</p>",
    )
}

pub fn watch_error_page() -> String {
    layout(
        "Could not load video - NalgoTube",
        "<a href=\"/\" class=\"muted\">&larr; Back</a>\n\
         <p class=\"error\">Could not load this video. Please try again later.</p>",
    )
}
