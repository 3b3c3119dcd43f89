//! Scene synthesis.
//!
//! Builds every scene of a story from string templates. The output depends
//! only on the normalized [`StoryParams`]: no randomness, no I/O.

use std::sync::LazyLock;

use regex::Regex;

use super::request::StoryParams;
use super::Scene;

/// Number of idea characters used to build the story's display title.
pub const BASE_TITLE_MAX_CHARS: usize = 60;

/// Static stand-in image served for every scene.
pub const PLACEHOLDER_IMAGE_PATH: &str = "/placeholder.svg";

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Synthesize `params.scene_count` scenes, ids `"1"..="N"` in order.
pub fn generate_scenes(params: &StoryParams) -> Vec<Scene> {
    let base_title = base_title(&params.idea);

    (1..=params.scene_count)
        .map(|n| Scene {
            id: n.to_string(),
            title: scene_title(n, params.scene_count),
            text: scene_text(params, n, &base_title),
            image_url: placeholder_image_url(n),
        })
        .collect()
}

/// `"Scene {n} — {label}"`.
///
/// The first scene is always "The Beginning", even in a one-scene story.
pub fn scene_title(n: u32, scene_count: u32) -> String {
    let label = if n == 1 {
        "The Beginning".to_string()
    } else if n == scene_count {
        "The End".to_string()
    } else {
        format!("Chapter {n}")
    };
    format!("Scene {n} \u{2014} {label}")
}

/// Narrative sentence for scene `n`.
pub fn scene_text(params: &StoryParams, n: u32, base_title: &str) -> String {
    format!(
        "In this {tone} {genre} tale for {audience}, {idea}. The scene {n} unfolds with vivid \
         detail as our characters progress through their journey in \"{base_title}\".",
        tone = params.tone.label().to_lowercase(),
        genre = params.genre.label().to_lowercase(),
        audience = params.audience.label().to_lowercase(),
        idea = params.idea,
    )
}

/// Placeholder image for scene `n`. Never depends on story content.
pub fn placeholder_image_url(n: u32) -> String {
    format!("{PLACEHOLDER_IMAGE_PATH}?scene={n}")
}

/// Title-cased first [`BASE_TITLE_MAX_CHARS`] characters of the idea.
pub fn base_title(idea: &str) -> String {
    let head: String = idea.chars().take(BASE_TITLE_MAX_CHARS).collect();
    title_case(&head)
}

/// Lower-case the text, then upper-case the first character of every
/// whitespace-separated word. Whitespace runs collapse to a single space.
pub fn title_case(text: &str) -> String {
    let lower = text.to_lowercase();
    WHITESPACE_RE
        .split(&lower)
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::story::{Audience, Genre, StoryRequest, Tone};

    fn params(idea: &str, scenes: Option<u32>) -> StoryParams {
        let mut req = StoryRequest::new(idea);
        req.scenes = scenes;
        StoryParams::from_request(&req)
    }

    // -- counts and ids -------------------------------------------------------

    #[test]
    fn default_request_yields_four_scenes() {
        let scenes = generate_scenes(&params("a robot", None));
        assert_eq!(scenes.len(), 4);
    }

    #[test]
    fn scene_count_matches_clamped_request() {
        for (requested, expected) in [(Some(0), 1), (Some(1), 1), (Some(7), 7), (Some(99), 10)] {
            let scenes = generate_scenes(&params("x", requested));
            assert_eq!(scenes.len(), expected, "requested {requested:?}");
        }
    }

    #[test]
    fn ids_are_sequential_decimal_strings() {
        let scenes = generate_scenes(&params("x", Some(10)));
        let ids: Vec<&str> = scenes.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3", "4", "5", "6", "7", "8", "9", "10"]);
    }

    // -- titles ---------------------------------------------------------------

    #[test]
    fn three_scene_titles() {
        let scenes = generate_scenes(&params("a robot finds a flower", Some(3)));
        assert_eq!(scenes[0].title, "Scene 1 — The Beginning");
        assert_eq!(scenes[1].title, "Scene 2 — Chapter 2");
        assert_eq!(scenes[2].title, "Scene 3 — The End");
    }

    #[test]
    fn single_scene_is_the_beginning() {
        assert_eq!(scene_title(1, 1), "Scene 1 — The Beginning");
    }

    #[test]
    fn interior_scenes_are_chapters() {
        let scenes = generate_scenes(&params("x", Some(6)));
        for (k, scene) in scenes.iter().enumerate().take(5).skip(1) {
            assert!(scene.title.contains(&format!("Chapter {}", k + 1)));
        }
        assert!(scenes[5].title.ends_with("The End"));
    }

    // -- text -----------------------------------------------------------------

    #[test]
    fn text_follows_template() {
        let mut req = StoryRequest::new("a robot finds a flower");
        req.genre = Some(Genre::SciFi);
        req.tone = Some(Tone::Epic);
        req.audience = Some(Audience::Kids);
        req.scenes = Some(3);
        let scenes = generate_scenes(&StoryParams::from_request(&req));

        assert_eq!(
            scenes[1].text,
            "In this epic sci-fi tale for kids, a robot finds a flower. The scene 2 unfolds \
             with vivid detail as our characters progress through their journey in \
             \"A Robot Finds A Flower\"."
        );
    }

    #[test]
    fn unknown_labels_are_lowercased_verbatim() {
        let mut req = StoryRequest::new("x");
        req.genre = Some(Genre::Other("Space OPERA".to_string()));
        let scenes = generate_scenes(&StoryParams::from_request(&req));
        assert!(scenes[0].text.starts_with("In this lighthearted space opera tale for kids, x."));
    }

    #[test]
    fn placeholder_idea_appears_in_text() {
        let scenes = generate_scenes(&params("", Some(0)));
        assert_eq!(scenes.len(), 1);
        assert!(scenes[0].title.ends_with("The Beginning"));
        assert!(scenes[0].text.contains("An untold idea."));
        assert!(scenes[0].text.contains("\"An Untold Idea\""));
    }

    #[test]
    fn generation_is_deterministic() {
        let p = params("two kids discover a portal", Some(5));
        assert_eq!(generate_scenes(&p), generate_scenes(&p));
    }

    // -- images ---------------------------------------------------------------

    #[test]
    fn image_url_encodes_only_the_index() {
        let scenes = generate_scenes(&params("a dragon", Some(2)));
        assert_eq!(scenes[0].image_url, "/placeholder.svg?scene=1");
        assert_eq!(scenes[1].image_url, "/placeholder.svg?scene=2");
        assert!(!scenes[0].image_url.contains("dragon"));
        assert!(!scenes[0].image_url.contains("fantasy"));
    }

    // -- title casing ---------------------------------------------------------

    #[test]
    fn title_case_normalizes_each_word() {
        assert_eq!(title_case("a LONELY robot"), "A Lonely Robot");
    }

    #[test]
    fn title_case_collapses_whitespace_runs() {
        assert_eq!(title_case("tea   shop\tin snow"), "Tea Shop In Snow");
    }

    #[test]
    fn title_case_handles_unicode() {
        assert_eq!(title_case("élan vital"), "Élan Vital");
    }

    #[test]
    fn base_title_takes_sixty_characters() {
        let idea = "a".repeat(59) + "bcdef";
        let title = base_title(&idea);
        assert_eq!(title.chars().count(), 60);
        assert!(title.ends_with('b'));
        assert!(title.starts_with('A'));
    }

    #[test]
    fn base_title_counts_characters_not_bytes() {
        let idea = "ü".repeat(70);
        assert_eq!(base_title(&idea).chars().count(), 60);
    }
}
