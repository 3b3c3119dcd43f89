//! Story generation request: wire shape, lenient decoding, normalization.
//!
//! The server never rejects a well-formed JSON request. Missing fields take
//! defaults, unexpected scalar types are coerced, and the scene count is
//! clamped into [`MIN_SCENES`]..=[`MAX_SCENES`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::options::{ArtStyle, Audience, Genre, Tone};
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Idea substituted when the request carries none (or only whitespace).
pub const DEFAULT_IDEA: &str = "An untold idea";

/// Scene count used when the request does not specify one.
pub const DEFAULT_SCENES: u32 = 4;

/// Smallest story the generator produces.
pub const MIN_SCENES: u32 = 1;

/// Largest story the generator produces.
pub const MAX_SCENES: u32 = 10;

// ---------------------------------------------------------------------------
// Wire request
// ---------------------------------------------------------------------------

/// Body of `POST /api/generate-story`.
///
/// Every field is optional on the wire. Decoding is permissive: see the
/// [`lenient`] helpers for how each field coerces unexpected JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryRequest {
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub idea: Option<String>,
    #[serde(default, deserialize_with = "lenient::label", skip_serializing_if = "Option::is_none")]
    pub genre: Option<Genre>,
    #[serde(default, deserialize_with = "lenient::label", skip_serializing_if = "Option::is_none")]
    pub tone: Option<Tone>,
    #[serde(default, deserialize_with = "lenient::label", skip_serializing_if = "Option::is_none")]
    pub audience: Option<Audience>,
    #[serde(default, deserialize_with = "lenient::label", skip_serializing_if = "Option::is_none")]
    pub style: Option<ArtStyle>,
    #[serde(default, deserialize_with = "lenient::count", skip_serializing_if = "Option::is_none")]
    pub scenes: Option<u32>,
}

impl StoryRequest {
    /// A request for `idea` with every other field left to its default.
    pub fn new(idea: impl Into<String>) -> Self {
        Self {
            idea: Some(idea.into()),
            ..Self::default()
        }
    }

    /// Same request context, asking for a different number of scenes.
    pub fn with_scenes(&self, scenes: u32) -> Self {
        Self {
            scenes: Some(scenes),
            ..self.clone()
        }
    }
}

/// Client-side precondition: an idea must contain something besides
/// whitespace before a generation request is sent.
pub fn validate_idea(idea: &str) -> Result<(), CoreError> {
    if idea.trim().is_empty() {
        return Err(CoreError::Validation("Story idea required".to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Normalized parameters
// ---------------------------------------------------------------------------

/// A request after default substitution and clamping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryParams {
    /// Trimmed idea, never empty.
    pub idea: String,
    pub genre: Genre,
    pub tone: Tone,
    pub audience: Audience,
    pub style: Option<ArtStyle>,
    /// Always within `MIN_SCENES..=MAX_SCENES`.
    pub scene_count: u32,
}

impl StoryParams {
    pub fn from_request(request: &StoryRequest) -> Self {
        let idea = request
            .idea
            .as_deref()
            .map(str::trim)
            .filter(|idea| !idea.is_empty())
            .unwrap_or(DEFAULT_IDEA)
            .to_string();

        Self {
            idea,
            genre: request.genre.clone().unwrap_or_default(),
            tone: request.tone.clone().unwrap_or_default(),
            audience: request.audience.clone().unwrap_or_default(),
            style: request.style.clone(),
            scene_count: clamp_scene_count(request.scenes),
        }
    }
}

/// Apply the default and saturate into `MIN_SCENES..=MAX_SCENES`.
pub fn clamp_scene_count(requested: Option<u32>) -> u32 {
    requested
        .unwrap_or(DEFAULT_SCENES)
        .clamp(MIN_SCENES, MAX_SCENES)
}

// ---------------------------------------------------------------------------
// Lenient field decoding
// ---------------------------------------------------------------------------

/// `deserialize_with` helpers that never fail on a type mismatch.
mod lenient {
    use super::*;

    /// Strings pass through; numbers and booleans are stringified; `null`,
    /// arrays and objects count as absent.
    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(scalar_to_string(value))
    }

    /// Like [`text`], then parsed into a labeled option.
    pub fn label<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: From<String>,
    {
        text(deserializer).map(|raw| raw.map(T::from))
    }

    /// Numbers and numeric strings become a scene count. Fractions truncate
    /// toward zero, negatives (including `-Infinity`) saturate at 0 and huge
    /// values (including `Infinity` and overflowing literals like `1e999`) at
    /// `u32::MAX`; clamping into the allowed range happens during
    /// normalization. Anything non-numeric, and `NaN`, counts as absent.
    pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let number = match value {
            // Numbers keep their source text, so out-of-range literals parse
            // to infinity here instead of being lost.
            Value::Number(n) => n.to_string().parse::<f64>().ok(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        Ok(number.filter(|n| !n.is_nan()).map(|n| n as u32))
    }

    fn scalar_to_string(value: Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
