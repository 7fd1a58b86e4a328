//! Fixture registry: canned input payloads per capability category.
//!
//! A fixture is the representative argument object sent to every model in a
//! category. Categories whose models need binary media (audio, images) carry
//! an explicit [`Fixture::Unavailable`] marker instead; the runner turns
//! those into `Skipped` results without touching the network.
//!
//! The registry is pure lookup. It performs no I/O and has exactly one
//! failure mode, "category not present", which the runner checks against the
//! catalog before any probe executes.

use std::collections::HashMap;

use serde_json::{json, Map, Value};

use crate::catalog::ModelCategory;

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

/// A canned input for one category, or a marker that none can be synthesized.
#[derive(Debug, Clone, PartialEq)]
pub enum Fixture {
    /// JSON argument object to send with `tools/call`.
    Payload(Map<String, Value>),
    /// The category requires input the harness cannot fabricate
    /// (e.g. base64 audio or image data).
    Unavailable,
}

impl Fixture {
    /// Build a payload fixture from a JSON object literal.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not a JSON object; fixtures are static
    /// configuration, so a non-object is a programming error.
    pub fn payload(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Payload(map),
            other => panic!("fixture payload must be a JSON object, got: {other}"),
        }
    }

    pub fn as_payload(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Payload(map) => Some(map),
            Self::Unavailable => None,
        }
    }
}

// ---------------------------------------------------------------------------
// FixtureRegistry
// ---------------------------------------------------------------------------

/// Explicit map from category to fixture.
#[derive(Debug, Clone, Default)]
pub struct FixtureRegistry {
    entries: HashMap<ModelCategory, Fixture>,
}

impl FixtureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the fixture for a category, replacing any existing one.
    /// Every category has at most one fixture by construction.
    pub fn with_fixture(mut self, category: ModelCategory, fixture: Fixture) -> Self {
        self.entries.insert(category, fixture);
        self
    }

    pub fn get(&self, category: ModelCategory) -> Option<&Fixture> {
        self.entries.get(&category)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The default fixture table covering every known category.
    pub fn defaults() -> Self {
        FixtureRegistry::new()
            .with_fixture(
                ModelCategory::TextGeneration,
                Fixture::payload(json!({"prompt": "What is 2+2? Answer in one word."})),
            )
            .with_fixture(
                ModelCategory::TextToImage,
                Fixture::payload(json!({"prompt": "A serene mountain landscape"})),
            )
            .with_fixture(
                ModelCategory::TextToSpeech,
                Fixture::payload(json!({"text": "Hello world"})),
            )
            .with_fixture(ModelCategory::SpeechRecognition, Fixture::Unavailable)
            .with_fixture(
                ModelCategory::TextEmbeddings,
                Fixture::payload(json!({"text": "The quick brown fox jumps over the lazy dog"})),
            )
            .with_fixture(
                ModelCategory::TextClassification,
                Fixture::payload(json!({"text": "I love this product, it's amazing!"})),
            )
            .with_fixture(
                ModelCategory::Translation,
                Fixture::payload(json!({
                    "text": "Hello, how are you?",
                    "source_lang": "en",
                    "target_lang": "es"
                })),
            )
            .with_fixture(ModelCategory::ImageToText, Fixture::Unavailable)
            .with_fixture(
                ModelCategory::Summarization,
                Fixture::payload(json!({
                    "text": "The Industrial Revolution was a period of major industrialization \
                             and innovation that took place during the late 1700s and early 1800s."
                })),
            )
            .with_fixture(ModelCategory::ObjectDetection, Fixture::Unavailable)
            .with_fixture(ModelCategory::ImageClassification, Fixture::Unavailable)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
