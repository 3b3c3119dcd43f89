//! Handler for story generation.
//!
//! The body is decoded by hand rather than through the `Json` extractor so a
//! missing body or content type still yields a story: every field of the
//! request has a default and nothing is rejected except malformed JSON.

use axum::body::Bytes;
use axum::Json;
use serde_json::Value;

use storyviz_core::story::{GenerateStoryResponse, StoryRequest};

use crate::error::{AppError, AppResult};

// ---------------------------------------------------------------------------
// POST /api/generate-story
// ---------------------------------------------------------------------------

/// Synthesize a story from the request body.
///
/// Always 200 for well-formed (or empty) bodies; 400 for malformed JSON.
pub async fn generate_story(body: Bytes) -> AppResult<Json<GenerateStoryResponse>> {
    let request = parse_story_request(&body)?;
    let response = GenerateStoryResponse::from_request(&request);

    tracing::debug!(
        requested = ?request.scenes,
        scenes = response.scenes.len(),
        genre = request.genre.as_ref().map(|g| g.label()),
        "Generated story"
    );

    Ok(Json(response))
}

/// Decode a request body permissively.
///
/// Empty bodies and JSON values other than objects are treated as an empty
/// request.
fn parse_story_request(body: &[u8]) -> AppResult<StoryRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(StoryRequest::default());
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))?;

    match value {
        Value::Object(_) => serde_json::from_value(value)
            .map_err(|e| AppError::InternalError(format!("Lenient request decoding failed: {e}"))),
        _ => Ok(StoryRequest::default()),
    }
}
