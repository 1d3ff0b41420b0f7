//! RSS and Atom feeds as sample text
//!
//! Only what the game needs is extracted: each `<item>` or `<entry>` gives a title and a summary.
//! Summaries are usually HTML, so paragraphs become blank lines and every other tag is dropped.

use scribe::{ContentItem, FetchError, OnPop, ResourceQueue};

use super::SourceError;

const TIMEOUT_SECS: u64 = 30;

const ITEM_TAGS: [&str; 2] = ["item", "entry"];
const SUMMARY_TAGS: [&str; 3] = ["description", "summary", "content"];

/// A feed entry, downloaded up front
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    title: String,
    body: String,
}

impl ContentItem for Article {
    fn title(&self) -> &str {
        &self.title
    }

    fn fetch_body(&self) -> Result<String, FetchError> {
        Ok(self.body.clone())
    }
}

/// Download the feed at `url` and queue its articles
pub fn queue(url: &str) -> Result<ResourceQueue, SourceError> {
    let response = minreq::get(url)
        .with_timeout(TIMEOUT_SECS)
        .send()
        .map_err(|error| SourceError::FeedUnreachable {
            url: url.to_string(),
            error,
        })?;

    if !(200..300).contains(&response.status_code) {
        return Err(SourceError::FeedStatus {
            url: url.to_string(),
            status: response.status_code,
        });
    }

    let document = response.as_str().map_err(SourceError::FeedEncoding)?;
    let articles = parse(document);
    if articles.is_empty() {
        return Err(SourceError::EmptyFeed);
    }

    tracing::info!(url, count = articles.len(), "Downloaded feed");
    let items = articles
        .into_iter()
        .map(|article| Box::new(article) as Box<dyn ContentItem>);
    Ok(ResourceQueue::new(items, OnPop::Remove))
}

/// Extract every article of an RSS or Atom document, in document order
pub fn parse(document: &str) -> Vec<Article> {
    let mut articles = Vec::new();
    let mut rest = document;

    while let Some((tag, start)) = ITEM_TAGS
        .iter()
        .filter_map(|tag| find_open_tag(rest, tag).map(|start| (*tag, start)))
        .min_by_key(|(_, start)| *start)
    {
        let Some((inner, after)) = element_content(&rest[start..], tag) else {
            break;
        };

        let title = element_text(inner, "title").unwrap_or_default();
        let summary = SUMMARY_TAGS
            .iter()
            .find_map(|tag| element_text(inner, tag))
            .unwrap_or_default();

        articles.push(Article {
            body: format!("# {title}\n{summary}"),
            title,
        });

        rest = &rest[start + after..];
    }

    articles
}

/// Byte offset of the first `<tag>` or `<tag ...>` in `text`
fn find_open_tag(text: &str, tag: &str) -> Option<usize> {
    let needle = format!("<{tag}");
    let mut offset = 0;

    while let Some(found) = text[offset..].find(&needle) {
        let start = offset + found;
        let next = text[start + needle.len()..].chars().next();
        if matches!(next, Some(c) if c == '>' || c == '/' || c.is_whitespace()) {
            return Some(start);
        }
        offset = start + needle.len();
    }

    None
}

/// Inner text of the element starting at `text[0]`, and the offset just past its end
fn element_content<'a>(text: &'a str, tag: &str) -> Option<(&'a str, usize)> {
    let open_end = text.find('>')? + 1;
    if text[..open_end].ends_with("/>") {
        return Some(("", open_end));
    }

    let close = format!("</{tag}>");
    let close_start = open_end + text[open_end..].find(&close)?;
    Some((&text[open_end..close_start], close_start + close.len()))
}

fn element_text(text: &str, tag: &str) -> Option<String> {
    let start = find_open_tag(text, tag)?;
    let (inner, _) = element_content(&text[start..], tag)?;
    Some(html_to_text(&unescape_markup(inner)).trim().to_string())
}

/// Undo the XML layer: either a CDATA section or entity escaping
fn unescape_markup(inner: &str) -> String {
    let trimmed = inner.trim();
    match trimmed
        .strip_prefix("<![CDATA[")
        .and_then(|cdata| cdata.strip_suffix("]]>"))
    {
        Some(cdata) => cdata.to_string(),
        None => decode_entities(trimmed),
    }
}

/// Drop tags; a paragraph boundary becomes a blank line
fn html_to_text(html: &str) -> String {
    let mut text = String::new();
    let mut rest = html;
    let mut paragraph_closed = false;

    while let Some(open) = rest.find('<') {
        let (before, after) = rest.split_at(open);
        let Some(close) = after.find('>') else {
            break;
        };
        let tag = after[1..close].trim().to_ascii_lowercase();

        if paragraph_closed && before.trim().is_empty() && is_paragraph_open(&tag) {
            let kept = text.trim_end().len();
            text.truncate(kept);
            text.push_str("\n\n");
            rest = after[close + 1..].trim_start();
            paragraph_closed = false;
            continue;
        }

        text.push_str(&decode_entities(before));
        paragraph_closed = tag.strip_prefix('/').map(str::trim) == Some("p");
        rest = &after[close + 1..];
    }

    text.push_str(&decode_entities(rest));
    text
}

fn is_paragraph_open(tag: &str) -> bool {
    tag == "p" || tag.starts_with("p ")
}

fn decode_entities(text: &str) -> String {
    let mut decoded = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        decoded.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let entity = rest
            .find(';')
            .filter(|end| *end <= 10)
            .and_then(|end| decode_entity(&rest[1..end]).map(|c| (c, end)));

        match entity {
            Some((c, end)) => {
                decoded.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                decoded.push('&');
                rest = &rest[1..];
            }
        }
    }

    decoded.push_str(rest);
    decoded
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let code = match name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => name.strip_prefix('#')?.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
