//! StoryVisualizer domain crate.
//!
//! Holds the story wire types, request normalization and the scene
//! synthesis shared by the API server and the client session.

pub mod error;
pub mod story;

pub use story::{GenerateStoryResponse, Scene, StoryParams, StoryRequest};
