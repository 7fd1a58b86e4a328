//! Model catalog: capability categories and probe targets.
//!
//! The catalog is plain configuration data handed to the runner at
//! construction time. It is never process-global state; callers build one
//! (usually via [`Catalog::full`] or [`Catalog::quick`]) and pass it in.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ModelCategory
// ---------------------------------------------------------------------------

/// Coarse capability kind of a Workers AI model.
///
/// Used to select a fixture for a probe and to group results in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelCategory {
    TextGeneration,
    TextToImage,
    TextToSpeech,
    SpeechRecognition,
    TextEmbeddings,
    TextClassification,
    Translation,
    ImageToText,
    Summarization,
    ObjectDetection,
    ImageClassification,
}

impl ModelCategory {
    /// Every category, in canonical catalog order.
    pub const ALL: [ModelCategory; 11] = [
        Self::TextGeneration,
        Self::TextToImage,
        Self::TextToSpeech,
        Self::SpeechRecognition,
        Self::TextEmbeddings,
        Self::TextClassification,
        Self::Translation,
        Self::ImageToText,
        Self::Summarization,
        Self::ObjectDetection,
        Self::ImageClassification,
    ];

    /// The kebab-case tag used on the wire and in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextGeneration => "text-generation",
            Self::TextToImage => "text-to-image",
            Self::TextToSpeech => "text-to-speech",
            Self::SpeechRecognition => "speech-recognition",
            Self::TextEmbeddings => "text-embeddings",
            Self::TextClassification => "text-classification",
            Self::Translation => "translation",
            Self::ImageToText => "image-to-text",
            Self::Summarization => "summarization",
            Self::ObjectDetection => "object-detection",
            Self::ImageClassification => "image-classification",
        }
    }
}

impl fmt::Display for ModelCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ProbeTarget
// ---------------------------------------------------------------------------

/// One addressable model instance: a namespaced identifier plus its category.
///
/// Created once at catalog construction and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeTarget {
    /// Full namespaced model identifier, e.g. `@cf/meta/llama-3.1-8b-instruct`.
    pub model_id: String,
    /// Capability category the model belongs to.
    pub category: ModelCategory,
}

impl ProbeTarget {
    pub fn new(model_id: impl Into<String>, category: ModelCategory) -> Self {
        Self {
            model_id: model_id.into(),
            category,
        }
    }

    /// Short display name: the last path segment of the identifier.
    pub fn short_name(&self) -> &str {
        self.model_id.rsplit('/').next().unwrap_or(&self.model_id)
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// One category's worth of targets, in probe order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub category: ModelCategory,
    pub targets: Vec<ProbeTarget>,
}

/// An ordered list of categories, each with an ordered target list.
///
/// Iteration order is insertion order, and it is also the order in which raw
/// results come back from a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a category with its target identifiers, preserving order.
    pub fn with_category(mut self, category: ModelCategory, model_ids: &[&str]) -> Self {
        self.entries.push(CatalogEntry {
            category,
            targets: model_ids
                .iter()
                .map(|id| ProbeTarget::new(*id, category))
                .collect(),
        });
        self
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Total number of targets across all categories.
    pub fn target_count(&self) -> usize {
        self.entries.iter().map(|e| e.targets.len()).sum()
    }

    pub fn category_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The complete Workers AI sweep: every known model in every category.
    pub fn full() -> Self {
        Catalog::new()
            .with_category(
                ModelCategory::TextGeneration,
                &[
                    "@cf/openai/gpt-oss-120b",
                    "@cf/openai/gpt-oss-20b",
                    "@cf/meta/llama-4-scout-17b-16e-instruct",
                    "@cf/meta/llama-3.3-70b-instruct-fp8-fast",
                    "@cf/meta/llama-3.1-8b-instruct-fast",
                    "@cf/ibm/granite-4.0-h-micro",
                    "@cf/aisingapore/gemma-sea-lion-v4-27b-it",
                    "@cf/qwen/qwen3-30b-a3b-fp8",
                    "@cf/google/gemma-3-12b-it",
                    "@cf/mistralai/mistral-small-3.1-24b-instruct",
                    "@cf/qwen/qwq-32b",
                    "@cf/qwen/qwen2.5-coder-32b-instruct",
                    "@cf/meta/llama-guard-3-8b",
                    "@cf/deepseek/deepseek-r1-distill-qwen-32b",
                    "@cf/meta/llama-3.2-1b-instruct",
                    "@cf/meta/llama-3.2-3b-instruct",
                    "@cf/meta/llama-3.2-11b-vision-instruct",
                    "@cf/meta/llama-3.1-8b-instruct-awq",
                    "@cf/meta/llama-3.1-8b-instruct-fp8",
                    "@cf/meta/llama-3.1-8b-instruct",
                    "@cf/meta/llama-3.1-70b-instruct",
                    "@cf/meta/meta-llama-3-8b-instruct",
                    "@cf/meta/llama-3-8b-instruct-awq",
                    "@cf/meta/llama-3-8b-instruct",
                    "@cf/meta/llama-2-7b-chat-fp16",
                    "@cf/meta/llama-2-7b-chat-int8",
                    "@cf/mistral/mistral-7b-instruct-v0.1",
                    "@cf/mistralai/mistral-7b-instruct-v0.2",
                    "@cf/mistralai/mistral-7b-instruct-v0.1-awq",
                    "@cf/google/gemma-7b-it",
                    "@cf/nousresearch/hermes-2-pro-mistral-7b",
                    "@cf/microsoft/phi-2",
                    "@cf/fblgit/una-cybertron-7b-v2-bf16",
                ],
            )
            .with_category(
                ModelCategory::TextToImage,
                &[
                    "@cf/black-forest-labs/flux-1-schnell",
                    "@cf/bytedance/stable-diffusion-xl-lightning",
                    "@cf/lykon/dreamshaper-8-lcm",
                    "@cf/runwayml/stable-diffusion-v1-5-img2img",
                    "@cf/runwayml/stable-diffusion-v1-5-inpainting",
                    "@cf/stabilityai/stable-diffusion-xl-base-1.0",
                ],
            )
            .with_category(
                ModelCategory::TextToSpeech,
                &[
                    "@cf/deepgram/aura-2-es",
                    "@cf/deepgram/aura-2-en",
                    "@cf/deepgram/aura-1",
                ],
            )
            .with_category(
                ModelCategory::SpeechRecognition,
                &[
                    "@cf/deepgram/flux",
                    "@cf/deepgram/nova-3",
                    "@cf/openai/whisper-large-v3-turbo",
                    "@cf/openai/whisper-tiny-en",
                    "@cf/openai/whisper",
                ],
            )
            .with_category(
                ModelCategory::TextEmbeddings,
                &[
                    "@cf/pfnet/plamo-embedding-1b",
                    "@cf/google/embeddinggemma-300m",
                    "@cf/qwen/qwen3-embedding-0.6b",
                    "@cf/baai/bge-m3",
                    "@cf/baai/bge-large-en-v1.5",
                    "@cf/baai/bge-small-en-v1.5",
                    "@cf/baai/bge-base-en-v1.5",
                ],
            )
            .with_category(
                ModelCategory::TextClassification,
                &[
                    "@cf/baai/bge-reranker-base",
                    "@cf/huggingface/distilbert-sst-2-int8",
                ],
            )
            .with_category(
                ModelCategory::Translation,
                &[
                    "@cf/ai4bharat/indictrans2-en-indic-1B",
                    "@cf/meta/m2m100-1.2b",
                ],
            )
            .with_category(
                ModelCategory::ImageToText,
                &[
                    "@cf/llava-hf/llava-1.5-7b-hf",
                    "@cf/unum/uform-gen2-qwen-500m",
                ],
            )
            .with_category(ModelCategory::Summarization, &["@cf/facebook/bart-large-cnn"])
            .with_category(ModelCategory::ObjectDetection, &["@cf/facebook/detr-resnet-50"])
            .with_category(
                ModelCategory::ImageClassification,
                &["@cf/microsoft/resnet-50"],
            )
    }

    /// The small smoke suite: a handful of representative models.
    pub fn quick() -> Self {
        Catalog::new()
            .with_category(
                ModelCategory::TextGeneration,
                &[
                    "@cf/meta/llama-3.1-8b-instruct",
                    "@cf/meta/llama-3.1-70b-instruct",
                    "@cf/meta/llama-3.2-1b-instruct",
                    "@cf/mistral/mistral-7b-instruct-v0.1",
                    "@cf/qwen/qwen2.5-coder-32b-instruct",
                ],
            )
            .with_category(
                ModelCategory::TextEmbeddings,
                &[
                    "@cf/baai/bge-base-en-v1.5",
                    "@cf/baai/bge-large-en-v1.5",
                    "@cf/baai/bge-m3",
                ],
            )
            .with_category(
                ModelCategory::TextToImage,
                &[
                    "@cf/stabilityai/stable-diffusion-xl-base-1.0",
                    "@cf/black-forest-labs/flux-1-schnell",
                    "@cf/bytedance/stable-diffusion-xl-lightning",
                ],
            )
            .with_category(ModelCategory::SpeechRecognition, &["@cf/openai/whisper"])
            .with_category(
                ModelCategory::ImageClassification,
                &["@cf/microsoft/resnet-50"],
            )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_tags_round_trip() {
        for cat in ModelCategory::ALL {
            let json = serde_json::to_string(&cat).unwrap();
            assert_eq!(json, format!("\"{}\"", cat.as_str()));
            let back: ModelCategory = serde_json::from_str(&json).unwrap();
            assert_eq!(back, cat);
        }
    }

    #[test]
    fn test_short_name() {
        let t = ProbeTarget::new("@cf/meta/llama-3.1-8b-instruct", ModelCategory::TextGeneration);
        assert_eq!(t.short_name(), "llama-3.1-8b-instruct");

        let bare = ProbeTarget::new("resnet", ModelCategory::ImageClassification);
        assert_eq!(bare.short_name(), "resnet");
    }

    #[test]
    fn test_full_catalog_covers_all_categories() {
        let catalog = Catalog::full();
        assert_eq!(catalog.category_count(), ModelCategory::ALL.len());
        for (entry, expected) in catalog.entries().iter().zip(ModelCategory::ALL) {
            assert_eq!(entry.category, expected);
            assert!(!entry.targets.is_empty());
        }
    }

    #[test]
    fn test_full_catalog_target_counts() {
        let catalog = Catalog::full();
        assert_eq!(catalog.entries()[0].targets.len(), 33);
        assert_eq!(catalog.target_count(), 63);
    }

    #[test]
    fn test_quick_catalog_contents() {
        let catalog = Catalog::quick();
        assert_eq!(catalog.category_count(), 5);
        assert_eq!(catalog.target_count(), 13);
        assert_eq!(catalog.entries()[0].category, ModelCategory::TextGeneration);
        assert_eq!(catalog.entries()[0].targets.len(), 5);
    }

    #[test]
    fn test_targets_carry_their_category() {
        let catalog = Catalog::quick();
        for entry in catalog.entries() {
            for target in &entry.targets {
                assert_eq!(target.category, entry.category);
            }
        }
    }
}
