//! Story export: print-ready document, image gallery, share link.

use storyviz_core::story::{Scene, StoryRequest};

use crate::error::ClientError;

/// Page styling for the print document.
const PRINT_STYLE: &str = "body{font-family:Inter, system-ui, -apple-system; padding:24px;}\
h2{margin:0 0 8px;font-size:20px}\
img{max-width:100%;border-radius:8px;margin:8px 0}\
.scene{page-break-inside:avoid;border:1px solid #ddd;border-radius:12px;padding:16px;margin-bottom:16px}";

/// One image of the downloadable gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryEntry {
    /// `scene-{n}.png`, 1-based.
    pub file_name: String,
    /// The scene's image reference, as stored on the scene.
    pub url: String,
}

/// Render every scene into a standalone HTML document for print-to-PDF.
///
/// Server-relative image URLs are prefixed with `origin` so the document
/// works when opened outside the app.
pub fn render_print_document(scenes: &[Scene], origin: &str) -> String {
    let origin = origin.trim_end_matches('/');
    let body: String = scenes
        .iter()
        .map(|scene| {
            let src = if scene.image_url.starts_with('/') {
                format!("{origin}{}", scene.image_url)
            } else {
                scene.image_url.clone()
            };
            format!(
                "<div class='scene'><h2>{}</h2><img src='{}' alt='{}'/><p>{}</p></div>",
                escape_html(&scene.title),
                escape_html(&src),
                escape_html(&scene.title),
                escape_html(&scene.text),
            )
        })
        .collect();

    format!(
        "<!doctype html><html><head><meta charset='utf-8'><title>Story</title>\
         <style>{PRINT_STYLE}</style></head><body>{body}</body></html>"
    )
}

/// File names and sources for the image gallery download.
pub fn gallery_entries(scenes: &[Scene]) -> Vec<GalleryEntry> {
    scenes
        .iter()
        .enumerate()
        .map(|(i, scene)| GalleryEntry {
            file_name: format!("scene-{}.png", i + 1),
            url: scene.image_url.clone(),
        })
        .collect()
}

/// A link that reproduces the story: `{origin}/story?idea=..&genre=..`.
///
/// Generation is deterministic, so the request context is enough to rebuild
/// the same scenes. Local edits are not carried.
pub fn share_link(origin: &str, request: &StoryRequest) -> Result<String, ClientError> {
    let base = format!("{}/story", origin.trim_end_matches('/'));

    let mut params: Vec<(&str, String)> = Vec::new();
    if let Some(idea) = &request.idea {
        params.push(("idea", idea.clone()));
    }
    if let Some(genre) = &request.genre {
        params.push(("genre", genre.label().to_string()));
    }
    if let Some(tone) = &request.tone {
        params.push(("tone", tone.label().to_string()));
    }
    if let Some(audience) = &request.audience {
        params.push(("audience", audience.label().to_string()));
    }
    if let Some(style) = &request.style {
        params.push(("style", style.label().to_string()));
    }
    if let Some(scenes) = request.scenes {
        params.push(("scenes", scenes.to_string()));
    }

    let url = if params.is_empty() {
        reqwest::Url::parse(&base)
    } else {
        reqwest::Url::parse_with_params(&base, &params)
    }
    .map_err(|e| ClientError::InvalidOrigin(format!("{origin}: {e}")))?;

    Ok(url.into())
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
