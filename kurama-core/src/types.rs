//! Core type definitions shared by the record store and processor registry.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Identity Types
// ---------------------------------------------------------------------------

/// Unique identifier for a stored record.
///
/// Unlike a record's index, the id survives deletions of earlier records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub Uuid);

impl RecordId {
    /// Create a new random record ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// What kind of content a record holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecordType {
    /// A conversational turn (input or response).
    Conversation,
    /// Something the agent was told and kept.
    LearnedFact,
    /// A snapshot of the agent's mood.
    EmotionalState,
    /// A recognised recurring pattern.
    Pattern,
    /// A lifecycle or evolution event.
    Evolution,
}

impl RecordType {
    /// Every record type, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Conversation,
        Self::LearnedFact,
        Self::EmotionalState,
        Self::Pattern,
        Self::Evolution,
    ];
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conversation => write!(f, "Conversation"),
            Self::LearnedFact => write!(f, "Learned Fact"),
            Self::EmotionalState => write!(f, "Emotional State"),
            Self::Pattern => write!(f, "Pattern"),
            Self::Evolution => write!(f, "Evolution"),
        }
    }
}

/// Capability tag a processor is registered under and dispatched by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessorKind {
    /// Colours a thought with the agent's character.
    Personality,
    /// Language handling (no built-in capability).
    Language,
    /// Reacts to the emotional tone of the input.
    Emotion,
    /// Reacts to knowledge-seeking input.
    Learning,
    /// Adds a creative flourish.
    Creativity,
    /// Analysis (no built-in capability).
    Analysis,
}

impl fmt::Display for ProcessorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Personality => write!(f, "Personality"),
            Self::Language => write!(f, "Language"),
            Self::Emotion => write!(f, "Emotion"),
            Self::Learning => write!(f, "Learning"),
            Self::Creativity => write!(f, "Creativity"),
            Self::Analysis => write!(f, "Analysis"),
        }
    }
}

// ---------------------------------------------------------------------------
// Bounded text
// ---------------------------------------------------------------------------

/// Copy `text`, cutting it to at most `max_bytes` bytes.
///
/// The cut lands on the nearest UTF-8 character boundary at or below the
/// limit, so the result is always valid and never longer than the bound.
#[must_use]
pub fn truncate_to(text: &str, max_bytes: usize) -> String {
    if text.len() <= max_bytes {
        return text.to_owned();
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_owned()
}

/// Short form of `text` for log lines: first 50 characters, then `...`.
#[must_use]
pub fn preview(text: &str) -> String {
    const PREVIEW_CHARS: usize = 50;
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_owned(),
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// Source of wall-clock time for timestamps, expiry and time-seeded selection.
pub trait Clock: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> DateTime<Utc>;
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same instant, so a test can keep one handle and give
/// another to a store or registry.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Move the clock forward (or backward, for a negative delta).
    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock();
        *now += delta;
    }

    /// Jump to an absolute instant.
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock() = instant;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}
