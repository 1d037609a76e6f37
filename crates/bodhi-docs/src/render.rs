use std::path::Path;

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};
use tracing::{debug, warn};

use crate::cache::RenderCache;
use crate::docs::{self, doc_file_path};
use crate::error::AppError;
use crate::frontmatter;
use crate::model::DocPage;

/// Reads a document, strips its front-matter and renders the body to HTML.
///
/// Rendering goes through `cache`; an unchanged source is served from it.
pub fn render_doc(root: &Path, slug: &str, cache: &RenderCache) -> Result<DocPage, AppError> {
    let path = doc_file_path(root, slug).ok_or_else(|| AppError::NotFound(slug.to_string()))?;
    let content = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => AppError::NotFound(slug.to_string()),
        _ => AppError::Io {
            path: path.display().to_string(),
            source: e,
        },
    })?;

    let body = match frontmatter::split(&content) {
        Ok((_, body)) => body,
        Err(e) => {
            warn!(error = %e, slug, "rendering document with unreadable front-matter as-is");
            content.as_str()
        }
    };

    let html = match cache.get_rendered(slug, body) {
        Some(html) => html,
        None => {
            let html = render_markdown(body);
            cache.set_rendered(slug, body, &html);
            debug!(slug, bytes = html.len(), "document rendered");
            html
        }
    };

    Ok(DocPage {
        details: docs::get_doc_details(root, slug),
        html,
    })
}

/// Renders markdown with tables, footnotes, strikethrough and task lists. Headings without an
/// explicit id get one derived from their text.
pub fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

    let mut events: Vec<Event> = Parser::new_ext(source, options).collect();
    assign_heading_ids(&mut events);

    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    out
}

fn assign_heading_ids(events: &mut [Event]) {
    let mut open: Option<(usize, String)> = None;
    for i in 0..events.len() {
        match &events[i] {
            Event::Start(Tag::Heading { id: None, .. }) => open = Some((i, String::new())),
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, buf)) = open.as_mut() {
                    buf.push_str(text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((start, text)) = open.take() {
                    let anchor = heading_anchor(&text);
                    if let Event::Start(Tag::Heading { id, .. }) = &mut events[start] {
                        if !anchor.is_empty() {
                            *id = Some(CowStr::from(anchor));
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

fn heading_anchor(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_dash = false;
    for ch in s.chars() {
        let lc = ch.to_ascii_lowercase();
        if lc.is_ascii_alphanumeric() {
            out.push(lc);
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    out.trim_matches('-').to_string()
}
