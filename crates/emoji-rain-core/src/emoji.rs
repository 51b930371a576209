//! Emoji extraction from annotated text and the spawn selection policy.
//!
//! The annotation service returns the user's text with emojis sprinkled
//! in. [`extract`] pulls every emoji character out in reading order and
//! [`select`] decides which of them become particles and how many times.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use rand::Rng;
use rand::seq::SliceRandom;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Above this many extracted emojis, selection switches to sampling.
pub const SAMPLE_THRESHOLD: usize = 5;

/// Number of distinct emojis kept when sampling.
pub const MAX_DISTINCT: usize = 5;

/// Particles spawned per selected emoji.
pub const COPIES_PER_GLYPH: usize = 3;

/// One emoji character per match, same classes as the browser's
/// `\p{Emoji_Presentation}` / `\p{Extended_Pictographic}`.
#[allow(clippy::expect_used)]
static EMOJI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{Emoji_Presentation}\p{Extended_Pictographic}]")
        .expect("emoji character class is a valid constant pattern")
});

/// Errors from [`Glyph::parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GlyphError {
    /// The input was not exactly one emoji character.
    #[error("not a single emoji: {0:?}")]
    NotAnEmoji(String),
}

/// A single emoji character suitable for a particle.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Glyph(String);

impl Glyph {
    /// Parse a string that must consist of exactly one emoji character.
    pub fn parse(s: &str) -> Result<Self, GlyphError> {
        let mut matches = EMOJI.find_iter(s);
        match (matches.next(), matches.next()) {
            (Some(m), None) if m.as_str() == s => Ok(Self(s.to_owned())),
            _ => Err(GlyphError::NotAnEmoji(s.to_owned())),
        }
    }

    /// The emoji as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Glyph {
    type Error = GlyphError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Glyph> for String {
    fn from(glyph: Glyph) -> Self {
        glyph.0
    }
}

/// Every emoji character in `text`, left to right, duplicates kept.
pub fn extract(text: &str) -> Vec<Glyph> {
    EMOJI
        .find_iter(text)
        .map(|m| Glyph(m.as_str().to_owned()))
        .collect()
}

/// Choose the glyphs to spawn from an extraction result.
///
/// With at most [`SAMPLE_THRESHOLD`] glyphs, every occurrence is spawned
/// [`COPIES_PER_GLYPH`] times, so a glyph that appears twice yields six
/// particles. With more, the distinct glyphs are shuffled and the first
/// [`MAX_DISTINCT`] are each spawned [`COPIES_PER_GLYPH`] times.
pub fn select<R: Rng + ?Sized>(glyphs: &[Glyph], rng: &mut R) -> Vec<Glyph> {
    if glyphs.len() <= SAMPLE_THRESHOLD {
        return triple(glyphs);
    }

    let mut seen = BTreeSet::new();
    let mut distinct: Vec<Glyph> = glyphs
        .iter()
        .filter(|g| seen.insert(*g))
        .cloned()
        .collect();
    distinct.shuffle(rng);
    distinct.truncate(MAX_DISTINCT);

    triple(&distinct)
}

fn triple(glyphs: &[Glyph]) -> Vec<Glyph> {
    glyphs
        .iter()
        .flat_map(|g| std::iter::repeat_n(g.clone(), COPIES_PER_GLYPH))
        .collect()
}
