//! The model catalog offered to users. Pure configuration data.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelId {
    #[default]
    #[serde(rename = "llama-3.1-8b-instant")]
    Llama31Instant,
    #[serde(rename = "llama-3.3-70b-versatile")]
    Llama33Versatile,
    #[serde(rename = "gemma2-9b-it")]
    Gemma2,
    #[serde(rename = "mixtral-8x22b-instruct")]
    Mixtral8x22b,
}

/// Catalog entry as listed by `GET /api/v1/models`.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub id: &'static str,
    pub label: &'static str,
    pub is_default: bool,
}

impl ModelId {
    pub const ALL: [ModelId; 4] = [
        ModelId::Llama31Instant,
        ModelId::Llama33Versatile,
        ModelId::Gemma2,
        ModelId::Mixtral8x22b,
    ];

    /// Provider-side model identifier.
    pub fn id(&self) -> &'static str {
        match self {
            ModelId::Llama31Instant => "llama-3.1-8b-instant",
            ModelId::Llama33Versatile => "llama-3.3-70b-versatile",
            ModelId::Gemma2 => "gemma2-9b-it",
            ModelId::Mixtral8x22b => "mixtral-8x22b-instruct",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ModelId::Llama31Instant => "Llama 3.1 8B (Fast & Free)",
            ModelId::Llama33Versatile => "Llama 3.3 70B (Most Accurate)",
            ModelId::Gemma2 => "Gemma 2 9B (Balanced)",
            ModelId::Mixtral8x22b => "Mixtral 8x22B (Expert)",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.id() == id.trim())
    }
}

pub fn catalog(default_model: ModelId) -> Vec<ModelInfo> {
    ModelId::ALL
        .iter()
        .map(|m| ModelInfo {
            id: m.id(),
            label: m.label(),
            is_default: *m == default_model,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_four_models_and_one_default() {
        let entries = catalog(ModelId::Gemma2);
        assert_eq!(entries.len(), 4);
        let defaults: Vec<_> = entries.iter().filter(|m| m.is_default).collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].id, "gemma2-9b-it");
    }

    #[test]
    fn test_serde_uses_provider_ids() {
        for model in ModelId::ALL {
            let json = serde_json::to_string(&model).unwrap();
            assert_eq!(json, format!("\"{}\"", model.id()));
            assert_eq!(ModelId::from_id(model.id()), Some(model));
        }
        assert_eq!(ModelId::from_id("gpt-4"), None);
    }
}
