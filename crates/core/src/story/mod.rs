//! Story generation domain.
//!
//! - [`options`] -- the genre/tone/audience/style pickers as permissive enums.
//! - [`request`] -- the wire request, lenient decoding and normalization.
//! - [`synthesis`] -- deterministic scene synthesis from a normalized request.

pub mod options;
pub mod request;
pub mod synthesis;

use serde::{Deserialize, Serialize};

pub use options::{ArtStyle, Audience, Genre, Tone};
pub use request::{validate_idea, StoryParams, StoryRequest};
pub use synthesis::generate_scenes;

/// One unit of a generated story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// 1-based position as a decimal string.
    pub id: String,
    pub title: String,
    pub text: String,
    /// Placeholder image reference, parameterized by position only.
    pub image_url: String,
}

/// Response body of `POST /api/generate-story`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateStoryResponse {
    pub scenes: Vec<Scene>,
}

impl GenerateStoryResponse {
    /// Normalize `request` and synthesize the full response.
    pub fn from_request(request: &StoryRequest) -> Self {
        let params = StoryParams::from_request(request);
        Self {
            scenes: generate_scenes(&params),
        }
    }
}
