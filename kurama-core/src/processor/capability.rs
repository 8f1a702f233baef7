//! Built-in processor capabilities.
//!
//! Each capability maps an input string to one fragment from a small fixed
//! table. The selectors are deliberately simple:
//!
//! | Capability  | Selector                                             |
//! |-------------|------------------------------------------------------|
//! | Personality | `(len(input) + unix_seconds(now)) mod 4`             |
//! | Emotion     | keyword classes in priority order, then length       |
//! | Creativity  | `(len(input) * 7) mod 4`                             |
//! | Learning    | keyword classes in priority order                    |
//! | Inert       | always `None`                                        |
//!
//! Personality is seeded by the wall clock, so the same input can produce a
//! different fragment from one second to the next. Feed it a
//! [`ManualClock`](crate::types::ManualClock) for reproducible output.
//! Lengths are UTF-8 byte lengths and keyword tests are case-sensitive.

use chrono::{DateTime, Utc};

use crate::types::ProcessorKind;

const PERSONALITY_RESPONSES: [&str; 4] = [
    "I analyze this with my unique perspective...",
    "My personality adapts to understand you better...",
    "Through my individual lens, I see...",
    "My character processing reveals...",
];

const EMOTION_CURIOUS: &str = "[Feeling curious about your words]";
const EMOTION_RESONANCE: &str = "[Emotional resonance detected]";
const EMOTION_EMPATHY: &str = "[Processing with empathy]";
const EMOTION_DEEPER: &str = "[Sensing deeper meaning]";
const EMOTION_UNDERSTOOD: &str = "[Emotional context understood]";

const CREATIVITY_RESPONSES: [&str; 4] = [
    "Creative pathways illuminate new possibilities...",
    "Innovative thinking sparks within my circuits...",
    "Artistic interpretation flows through my algorithms...",
    "Imaginative connections form...",
];

const LEARNING_RESPONSES: [&str; 4] = [
    "Absorbing new knowledge patterns...",
    "Educational value detected and stored...",
    "Learning algorithms activated...",
    "Knowledge integration in progress...",
];

/// Inputs longer than this many bytes read as carrying deeper meaning.
const LONG_INPUT_BYTES: usize = 100;

/// The processing function bound to a processor at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Time-seeded character flavour.
    Personality,
    /// Keyword-driven emotional reaction.
    Emotion,
    /// Length-driven creative flourish.
    Creativity,
    /// Keyword-driven knowledge reaction.
    Learning,
    /// Produces nothing. Bound to kinds without a built-in capability.
    Inert,
}

impl Capability {
    /// The capability registered for `kind`.
    #[must_use]
    pub fn for_kind(kind: ProcessorKind) -> Self {
        match kind {
            ProcessorKind::Personality => Self::Personality,
            ProcessorKind::Emotion => Self::Emotion,
            ProcessorKind::Creativity => Self::Creativity,
            ProcessorKind::Learning => Self::Learning,
            ProcessorKind::Language | ProcessorKind::Analysis => Self::Inert,
        }
    }

    /// Derive a fragment from `input`. `now` seeds the personality selector.
    #[must_use]
    pub fn process(self, input: &str, now: DateTime<Utc>) -> Option<String> {
        let fragment = match self {
            Self::Personality => personality(input, now),
            Self::Emotion => emotion(input),
            Self::Creativity => creativity(input),
            Self::Learning => learning(input),
            Self::Inert => return None,
        };
        Some(fragment.to_owned())
    }
}

#[allow(clippy::cast_sign_loss)]
fn personality(input: &str, now: DateTime<Utc>) -> &'static str {
    let seed = (input.len() as u64).wrapping_add(now.timestamp() as u64);
    PERSONALITY_RESPONSES[(seed % PERSONALITY_RESPONSES.len() as u64) as usize]
}

fn emotion(input: &str) -> &'static str {
    if contains_any(input, &["sad", "cry", "hurt"]) {
        EMOTION_EMPATHY
    } else if contains_any(input, &["happy", "joy", "love"]) {
        EMOTION_RESONANCE
    } else if input.contains('?') {
        EMOTION_CURIOUS
    } else if input.len() > LONG_INPUT_BYTES {
        EMOTION_DEEPER
    } else {
        EMOTION_UNDERSTOOD
    }
}

fn creativity(input: &str) -> &'static str {
    CREATIVITY_RESPONSES[input.len().wrapping_mul(7) % CREATIVITY_RESPONSES.len()]
}

fn learning(input: &str) -> &'static str {
    let index = if contains_any(input, &["learn", "teach", "know"]) {
        0
    } else if contains_any(input, &["fact", "information"]) {
        1
    } else if contains_any(input, &["how", "why", "what"]) {
        2
    } else {
        3
    };
    LEARNING_RESPONSES[index]
}

fn contains_any(input: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| input.contains(needle))
}
