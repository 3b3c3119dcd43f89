//! The story a user is reading.
//!
//! A [`StorySession`] owns the generated scenes, the active scene index and
//! the request context the scenes came from. All edits are local; only
//! [`StorySession::regenerate_text`] goes back to the generator. Failed
//! operations never leave the scenes partially modified.
//!
//! Every user-visible outcome is queued as a [`Notice`] for the UI to show
//! and drain with [`StorySession::take_notices`].

use storyviz_core::story::{validate_idea, Scene, StoryRequest};

use crate::api::StoryGenerator;
use crate::error::ClientError;
use crate::export;

/// Query parameter carrying the image cache-buster.
const CACHE_BUSTER_PARAM: &str = "t";

/// A transient, user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: Option<String>,
}

impl Notice {
    pub fn new(title: impl Into<String>, description: Option<&str>) -> Self {
        Self {
            title: title.into(),
            description: description.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorySession {
    request: StoryRequest,
    scenes: Vec<Scene>,
    index: usize,
    notices: Vec<Notice>,
}

impl StorySession {
    /// Generate a new story and open it at the first scene.
    ///
    /// An idea that is blank after trimming fails before any request is sent.
    pub async fn generate<G>(generator: &G, request: StoryRequest) -> Result<Self, ClientError>
    where
        G: StoryGenerator + ?Sized,
    {
        validate_idea(request.idea.as_deref().unwrap_or_default())?;

        let scenes = generator.generate(&request).await?;
        tracing::info!(scenes = scenes.len(), "Story session started");

        Self::from_scenes(request, scenes).ok_or(ClientError::EmptyStory)
    }

    /// Open a session over scenes that were already generated.
    ///
    /// Returns `None` when `scenes` is empty: a session always has a current
    /// scene.
    pub fn from_scenes(request: StoryRequest, scenes: Vec<Scene>) -> Option<Self> {
        (!scenes.is_empty()).then(|| Self {
            request,
            scenes,
            index: 0,
            notices: Vec::new(),
        })
    }

    // -- accessors ------------------------------------------------------------

    pub fn request(&self) -> &StoryRequest {
        &self.request
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    pub fn current(&self) -> &Scene {
        &self.scenes[self.index]
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.scenes.len()
    }

    /// Reading progress in percent: `(index + 1) / len * 100`.
    pub fn progress_percent(&self) -> f64 {
        (self.index + 1) as f64 / self.scenes.len() as f64 * 100.0
    }

    /// `"2 / 4"`.
    pub fn position_label(&self) -> String {
        format!("{} / {}", self.index + 1, self.scenes.len())
    }

    // -- navigation -----------------------------------------------------------

    /// Step back one scene. Returns `false` at the first scene.
    pub fn previous(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Step forward one scene. Returns `false` at the last scene.
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.index += 1;
        true
    }

    /// Jump to `index`, saturating at the last scene.
    pub fn go_to(&mut self, index: usize) {
        self.index = index.min(self.scenes.len() - 1);
    }

    // -- editing --------------------------------------------------------------

    /// Overwrite the current scene's text.
    pub fn update_text(&mut self, text: impl Into<String>) {
        self.scenes[self.index].text = text.into();
        self.notify(Notice::new("Scene updated", None));
    }

    /// Ask the generator for a single scene with the same request context and
    /// take its text for the current scene. The current scene keeps its id,
    /// title and image.
    pub async fn regenerate_text<G>(&mut self, generator: &G) -> Result<(), ClientError>
    where
        G: StoryGenerator + ?Sized,
    {
        let request = self.request.with_scenes(1);

        let text = match generator.generate(&request).await {
            Ok(scenes) => match scenes.into_iter().next() {
                Some(scene) => scene.text,
                None => return Err(self.fail(ClientError::EmptyStory)),
            },
            Err(e) => return Err(self.fail(e)),
        };

        self.scenes[self.index].text = text;
        tracing::debug!(scene = self.index + 1, "Scene text regenerated");
        self.notify(Notice::new("Text regenerated", None));
        Ok(())
    }

    /// Refresh the current scene's image by stamping a new cache-buster.
    pub fn regenerate_image(&mut self) {
        self.regenerate_image_at(chrono::Utc::now().timestamp_millis());
    }

    /// [`regenerate_image`](Self::regenerate_image) with an explicit stamp.
    pub fn regenerate_image_at(&mut self, stamp_millis: i64) {
        let scene = &mut self.scenes[self.index];
        scene.image_url = with_cache_buster(&scene.image_url, stamp_millis);
        self.notify(Notice::new("Image regenerated", None));
    }

    // -- export ---------------------------------------------------------------

    /// Print-ready HTML for the whole story.
    pub fn print_document(&self, origin: &str) -> String {
        export::render_print_document(&self.scenes, origin)
    }

    /// Share link for this story; queues "Link copied".
    pub fn share_link(&mut self, origin: &str) -> Result<String, ClientError> {
        let link = export::share_link(origin, &self.request)?;
        self.notify(Notice::new("Link copied", None));
        Ok(link)
    }

    // -- notices --------------------------------------------------------------

    /// Drain queued notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    fn fail(&mut self, err: ClientError) -> ClientError {
        tracing::warn!(error = %err, "Story request failed");
        self.notify(err.notice());
        err
    }
}

/// Set the cache-buster parameter on `url`, replacing any earlier one.
fn with_cache_buster(url: &str, stamp_millis: i64) -> String {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));
    let prefix = format!("{CACHE_BUSTER_PARAM}=");
    let stamp = format!("{prefix}{stamp_millis}");

    let params: Vec<&str> = query
        .split('&')
        .filter(|p| !p.is_empty() && !p.starts_with(&prefix))
        .chain(std::iter::once(stamp.as_str()))
        .collect();

    format!("{path}?{}", params.join("&"))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use storyviz_core::error::CoreError;
    use storyviz_core::story::GenerateStoryResponse;

    use super::*;

    /// Generator backed by the real synthesis, recording what it was asked.
    #[derive(Default)]
    struct LocalGenerator {
        calls: AtomicUsize,
        last: Mutex<Option<StoryRequest>>,
    }

    #[async_trait]
    impl StoryGenerator for LocalGenerator {
        async fn generate(&self, request: &StoryRequest) -> Result<Vec<Scene>, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(request.clone());
            Ok(GenerateStoryResponse::from_request(request).scenes)
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl StoryGenerator for FailingGenerator {
        async fn generate(&self, _request: &StoryRequest) -> Result<Vec<Scene>, ClientError> {
            Err(ClientError::Api {
                status: 502,
                body: "bad gateway".to_string(),
            })
        }
    }

    struct EmptyGenerator;

    #[async_trait]
    impl StoryGenerator for EmptyGenerator {
        async fn generate(&self, _request: &StoryRequest) -> Result<Vec<Scene>, ClientError> {
            Ok(Vec::new())
        }
    }

    async fn session(scenes: u32) -> StorySession {
        let request = StoryRequest::new("a lonely robot finds a flower").with_scenes(scenes);
        StorySession::generate(&LocalGenerator::default(), request)
            .await
            .unwrap()
    }

    // -- generate -------------------------------------------------------------

    #[tokio::test]
    async fn generate_opens_at_first_scene() {
        let s = session(4).await;
        assert_eq!(s.scene_count(), 4);
        assert_eq!(s.index(), 0);
        assert_eq!(s.current().id, "1");
        assert_eq!(s.position_label(), "1 / 4");
        assert_eq!(s.progress_percent(), 25.0);
    }

    #[tokio::test]
    async fn blank_idea_fails_before_any_request() {
        let generator = LocalGenerator::default();
        let result = StorySession::generate(&generator, StoryRequest::new("   ")).await;

        let err = result.unwrap_err();
        assert_matches!(err, ClientError::Core(CoreError::Validation(_)));
        assert_eq!(err.notice().title, "Story idea required");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_idea_fails_before_any_request() {
        let generator = LocalGenerator::default();
        let result = StorySession::generate(&generator, StoryRequest::default()).await;
        assert_matches!(result, Err(ClientError::Core(_)));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn transport_failure_yields_generation_failed() {
        let err = StorySession::generate(&FailingGenerator, StoryRequest::new("x"))
            .await
            .unwrap_err();
        assert_matches!(err, ClientError::Api { status: 502, .. });
        assert_eq!(
            err.notice(),
            Notice::new("Generation failed", Some("Please try again."))
        );
    }

    #[tokio::test]
    async fn empty_story_is_an_error() {
        let result = StorySession::generate(&EmptyGenerator, StoryRequest::new("x")).await;
        assert_matches!(result, Err(ClientError::EmptyStory));
    }

    #[test]
    fn from_scenes_rejects_empty() {
        assert!(StorySession::from_scenes(StoryRequest::new("x"), Vec::new()).is_none());
    }

    // -- navigation -----------------------------------------------------------

    #[tokio::test]
    async fn navigation_saturates_at_bounds() {
        let mut s = session(3).await;

        assert!(!s.previous());
        assert_eq!(s.index(), 0);

        assert!(s.next());
        assert!(s.next());
        assert!(s.is_last());
        assert!(!s.next());
        assert_eq!(s.index(), 2);
        assert_eq!(s.progress_percent(), 100.0);

        assert!(s.previous());
        assert_eq!(s.current().id, "2");
    }

    #[tokio::test]
    async fn go_to_clamps_index() {
        let mut s = session(4).await;
        s.go_to(2);
        assert_eq!(s.index(), 2);
        s.go_to(40);
        assert_eq!(s.index(), 3);
    }

    #[tokio::test]
    async fn single_scene_story_is_first_and_last() {
        let s = session(1).await;
        assert!(s.is_first());
        assert!(s.is_last());
    }

    // -- editing --------------------------------------------------------------

    #[tokio::test]
    async fn update_text_overwrites_current_scene_only() {
        let mut s = session(3).await;
        s.next();
        s.update_text("The robot waters the flower.");

        assert_eq!(s.scenes()[1].text, "The robot waters the flower.");
        assert_ne!(s.scenes()[0].text, "The robot waters the flower.");
        assert_eq!(s.take_notices(), vec![Notice::new("Scene updated", None)]);
        assert!(s.take_notices().is_empty());
    }

    #[tokio::test]
    async fn regenerate_text_requests_one_scene_with_same_context() {
        let generator = LocalGenerator::default();
        let mut request = StoryRequest::new("a shy dragon");
        request.scenes = Some(3);
        let mut s = StorySession::generate(&generator, request).await.unwrap();
        s.next();
        s.next();
        s.update_text("edited");
        s.take_notices();

        s.regenerate_text(&generator).await.unwrap();

        let sent = generator.last.lock().unwrap().clone().unwrap();
        assert_eq!(sent.scenes, Some(1));
        assert_eq!(sent.idea.as_deref(), Some("a shy dragon"));

        let current = s.current();
        assert_eq!(current.id, "3");
        assert_eq!(current.title, "Scene 3 — The End");
        assert!(current.text.contains("The scene 1 unfolds"));
        assert_eq!(s.take_notices(), vec![Notice::new("Text regenerated", None)]);
    }

    #[tokio::test]
    async fn failed_regeneration_leaves_scenes_untouched() {
        let mut s = session(2).await;
        let before = s.scenes().to_vec();

        let err = s.regenerate_text(&FailingGenerator).await.unwrap_err();
        assert_matches!(err, ClientError::Api { .. });
        assert_eq!(s.scenes(), before.as_slice());
        assert_eq!(
            s.take_notices(),
            vec![Notice::new("Generation failed", Some("Please try again."))]
        );
    }

    #[tokio::test]
    async fn empty_regeneration_leaves_scenes_untouched() {
        let mut s = session(2).await;
        let before = s.scenes().to_vec();

        let result = s.regenerate_text(&EmptyGenerator).await;
        assert_matches!(result, Err(ClientError::EmptyStory));
        assert_eq!(s.scenes(), before.as_slice());
    }

    #[tokio::test]
    async fn regenerate_image_sets_cache_buster() {
        let mut s = session(2).await;
        s.regenerate_image_at(1_700_000_000_000);
        assert_eq!(s.current().image_url, "/placeholder.svg?scene=1&t=1700000000000");

        s.regenerate_image_at(1_700_000_000_500);
        assert_eq!(s.current().image_url, "/placeholder.svg?scene=1&t=1700000000500");
        assert_eq!(s.scenes()[1].image_url, "/placeholder.svg?scene=2");
        assert_eq!(s.take_notices().len(), 2);
    }

    #[tokio::test]
    async fn regenerate_image_uses_current_time() {
        let mut s = session(1).await;
        s.regenerate_image();
        assert!(s.current().image_url.contains("&t="));
    }

    // -- export ---------------------------------------------------------------

    #[tokio::test]
    async fn share_link_queues_notice() {
        let mut s = session(2).await;
        let link = s.share_link("https://storyviz.example").unwrap();
        assert!(link.starts_with("https://storyviz.example/story?idea="));
        assert_eq!(s.take_notices(), vec![Notice::new("Link copied", None)]);
    }

    #[tokio::test]
    async fn print_document_reflects_edits() {
        let mut s = session(2).await;
        s.update_text("A brand new opening.");
        assert!(s.print_document("http://localhost").contains("A brand new opening."));
    }

    // -- cache buster ---------------------------------------------------------

    #[test]
    fn cache_buster_added_without_query() {
        assert_eq!(with_cache_buster("/img.png", 5), "/img.png?t=5");
    }

    #[test]
    fn cache_buster_keeps_other_params() {
        assert_eq!(
            with_cache_buster("/img.png?scene=2&t=1&size=lg", 9),
            "/img.png?scene=2&size=lg&t=9"
        );
    }
}
