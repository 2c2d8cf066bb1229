//! Core data models.
//!
//! The serialized shape (camelCase) is the persisted layout of the model
//! cache, so field renames here are storage format changes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Capabilities
// =============================================================================

/// A model capability from the fixed capability set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelCapability {
    Vision,
    FunctionCalling,
    JsonMode,
    CodeInterpreter,
    WebSearch,
    Multimodal,
}

impl ModelCapability {
    /// All capabilities in display order.
    pub const ALL: &'static [Self] = &[
        Self::Vision,
        Self::FunctionCalling,
        Self::JsonMode,
        Self::CodeInterpreter,
        Self::WebSearch,
        Self::Multimodal,
    ];

    /// Wire/CLI name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vision => "vision",
            Self::FunctionCalling => "function_calling",
            Self::JsonMode => "json_mode",
            Self::CodeInterpreter => "code_interpreter",
            Self::WebSearch => "web_search",
            Self::Multimodal => "multimodal",
        }
    }
}

impl fmt::Display for ModelCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelCapability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .find(|c| c.as_str() == normalized)
            .copied()
            .ok_or_else(|| {
                let valid = Self::ALL
                    .iter()
                    .map(|c| c.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("unknown capability '{s}'. Valid capabilities: {valid}")
            })
    }
}

/// Where a model's capability list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilitySource {
    /// Curated list (built-in defaults).
    Explicit,
    /// Guessed from id/name substrings and raw API flags.
    Inferred,
}

// =============================================================================
// Model
// =============================================================================

/// An AI model offered by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Context window in tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_cost_per_million: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_cost_per_million: Option<f64>,
    /// Owning provider id (lookup only).
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Vec<ModelCapability>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capability_source: Option<CapabilitySource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_data_cutoff: Option<String>,
    /// Upstream creation time (epoch seconds), when the API reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    /// Set by enrichment. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enhanced: Option<bool>,
    /// Set by enrichment (ISO 8601). Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl Model {
    /// Minimal model with only identity fields set.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            context_length: None,
            input_cost_per_million: None,
            output_cost_per_million: None,
            provider: provider.into(),
            capabilities: None,
            capability_source: None,
            category: None,
            version: None,
            deprecated: None,
            max_output_tokens: None,
            training_data_cutoff: None,
            created: None,
            enhanced: None,
            last_updated: None,
        }
    }

    /// Whether the model carries the given capability.
    #[must_use]
    pub fn has_capability(&self, capability: ModelCapability) -> bool {
        self.capabilities
            .as_ref()
            .is_some_and(|caps| caps.contains(&capability))
    }

    #[must_use]
    pub fn is_deprecated(&self) -> bool {
        self.deprecated.unwrap_or(false)
    }
}

// =============================================================================
// Output Payloads
// =============================================================================

/// One registry entry with its key status, for the `providers` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub requires_api_key: bool,
    pub has_key: bool,
    pub key_verified: bool,
    pub custom: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs_url: Option<String>,
}

/// A stored key with the secret masked, for `keys list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeySummary {
    pub provider: String,
    pub masked_key: String,
    pub added_at: DateTime<Utc>,
    pub is_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_verified: Option<DateTime<Utc>>,
}

// =============================================================================
// Robot Output
// =============================================================================

/// JSON envelope for `--json` CLI output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotOutput<T> {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    pub command: String,
    pub data: T,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl<T> RobotOutput<T> {
    /// Create a new robot output envelope.
    pub fn new(command: impl Into<String>, data: T) -> Self {
        Self::with_errors(command, data, Vec::new())
    }

    /// Create with errors.
    pub fn with_errors(command: impl Into<String>, data: T, errors: Vec<String>) -> Self {
        Self {
            schema_version: "modelsync.v1".to_string(),
            generated_at: Utc::now(),
            command: command.into(),
            data,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_parses_cli_spellings() {
        assert_eq!(
            "function-calling".parse::<ModelCapability>().unwrap(),
            ModelCapability::FunctionCalling
        );
        assert_eq!(
            "Vision".parse::<ModelCapability>().unwrap(),
            ModelCapability::Vision
        );
        let err = "telepathy".parse::<ModelCapability>().unwrap_err();
        assert!(err.contains("web_search"));
    }

    #[test]
    fn model_serializes_camel_case_and_skips_none() {
        let mut model = Model::new("gpt-4o", "GPT-4o", "openai");
        model.context_length = Some(128_000);
        model.capabilities = Some(vec![ModelCapability::Vision, ModelCapability::JsonMode]);

        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["contextLength"], 128_000);
        assert_eq!(json["capabilities"][0], "vision");
        assert_eq!(json["capabilities"][1], "json_mode");
        assert!(json.get("description").is_none());
        assert!(json.get("enhanced").is_none());
    }

    #[test]
    fn model_deserializes_persisted_shape() {
        let json = r#"{
            "id": "claude-3-opus-20240229",
            "name": "Claude 3 Opus",
            "provider": "anthropic",
            "inputCostPerMillion": 15.0,
            "outputCostPerMillion": 75.0,
            "maxOutputTokens": 4096,
            "capabilities": ["vision"]
        }"#;
        let model: Model = serde_json::from_str(json).unwrap();
        assert_eq!(model.output_cost_per_million, Some(75.0));
        assert_eq!(model.max_output_tokens, Some(4096));
        assert!(model.has_capability(ModelCapability::Vision));
        assert!(!model.is_deprecated());
    }

    #[test]
    fn robot_output_envelope() {
        let out = RobotOutput::new("models", vec![1, 2]);
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["schemaVersion"], "modelsync.v1");
        assert_eq!(json["command"], "models");
        assert_eq!(json["errors"].as_array().unwrap().len(), 0);
    }
}
