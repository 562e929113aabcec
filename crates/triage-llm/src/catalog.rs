//! Hosted model catalog.

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "llama3-70b-8192";

/// Details of a hosted chat model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelInfo {
    pub id: &'static str,
    pub name: &'static str,
    /// Context window, also used as the default completion budget
    pub tokens: u32,
    pub developer: &'static str,
}

pub const MODELS: &[ModelInfo] = &[
    ModelInfo {
        id: "llama3-70b-8192",
        name: "LLaMA3-70b-Instruct",
        tokens: 8192,
        developer: "Meta",
    },
    ModelInfo {
        id: "llama3-8b-8192",
        name: "LLaMA3-8b-Instruct",
        tokens: 8192,
        developer: "Meta",
    },
    ModelInfo {
        id: "mixtral-8x7b-32768",
        name: "Mixtral-8x7b-Instruct-v0.1",
        tokens: 32768,
        developer: "Mistral",
    },
    ModelInfo {
        id: "gemma-7b-it",
        name: "Gemma-7b-it",
        tokens: 8192,
        developer: "Google",
    },
];

/// Look up a model by id.
pub fn find_model(id: &str) -> Option<&'static ModelInfo> {
    MODELS.iter().find(|m| m.id == id)
}
