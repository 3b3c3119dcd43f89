//! Story option pickers (genre, tone, audience, art style).
//!
//! Each picker has a documented set of labels, but the generator accepts any
//! string: labels outside the set are carried verbatim in an `Other` variant
//! so decoding a request never fails on an unexpected value.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

macro_rules! labeled_option {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
            /// A label outside the documented set, kept verbatim.
            Other(String),
        }

        impl $name {
            /// The label shown in the UI and sent over the wire.
            pub fn label(&self) -> &str {
                match self {
                    $(Self::$variant => $label,)+
                    Self::Other(raw) => raw,
                }
            }

            /// Parse a label. Matching is exact; anything else becomes `Other`.
            pub fn parse(raw: &str) -> Self {
                match raw {
                    $($label => Self::$variant,)+
                    other => Self::Other(other.to_string()),
                }
            }

            /// The documented labels, in menu order.
            pub fn labels() -> &'static [&'static str] {
                &[$($label),+]
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::parse(raw)
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self::parse(&raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                String::deserialize(deserializer).map(Self::from)
            }
        }
    };
}

labeled_option! {
    /// Story genre.
    pub enum Genre {
        Fantasy => "Fantasy",
        SciFi => "Sci-fi",
        Mystery => "Mystery",
        Comedy => "Comedy",
    }
}

labeled_option! {
    /// Narrative tone.
    pub enum Tone {
        Dark => "Dark",
        Lighthearted => "Lighthearted",
        Epic => "Epic",
    }
}

labeled_option! {
    /// Intended audience.
    pub enum Audience {
        Kids => "Kids",
        Teens => "Teens",
        Adults => "Adults",
    }
}

labeled_option! {
    /// Illustration style. Carried through requests but not used by synthesis.
    pub enum ArtStyle {
        Realistic => "Realistic",
        Cartoon => "Cartoon",
        Anime => "Anime",
        Watercolor => "Watercolor",
    }
}

impl Default for Genre {
    fn default() -> Self {
        Self::Fantasy
    }
}

impl Default for Tone {
    fn default() -> Self {
        Self::Lighthearted
    }
}

impl Default for Audience {
    fn default() -> Self {
        Self::Kids
    }
}
