//! StoryVisualizer client.
//!
//! - [`api`] -- [`StoryGenerator`] seam and its HTTP implementation.
//! - [`session`] -- the story being read: navigation, edits, regeneration.
//! - [`export`] -- print document, image gallery, share link.
//! - [`auth`] -- mock authentication over an injected key-value store.

pub mod api;
pub mod auth;
pub mod error;
pub mod export;
pub mod session;

pub use api::{StoryApi, StoryGenerator};
pub use auth::{AuthSession, FileStore, KeyValueStore, MemoryStore, User};
pub use error::ClientError;
pub use session::{Notice, StorySession};
