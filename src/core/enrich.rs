//! Model enrichment.
//!
//! Raw API entries become [`Model`]s via [`to_model`], which also infers
//! capabilities from id/name substrings and raw flags. Inference is
//! best-effort and tagged [`CapabilitySource::Inferred`]; it never runs on
//! cached or default models.
//!
//! [`enrich`] overlays curated descriptions and stamps `enhanced` /
//! `last_updated` on every returned model. Those two fields are display
//! metadata and play no part in cache identity.

use chrono::{DateTime, SecondsFormat, Utc};

use super::models::{CapabilitySource, Model, ModelCapability};
use crate::providers::RawModel;

/// Context window assumed when the API reports none.
pub const DEFAULT_CONTEXT_LENGTH: u64 = 4096;

/// Curated description for `(provider, model id)`.
#[must_use]
pub fn custom_description(provider: &str, model_id: &str) -> Option<&'static str> {
    let description = match (provider, model_id) {
        ("xai", "grok-beta") => {
            "xAI's flagship conversational model with real-time information access and web search. Built for witty, engaging conversation."
        }
        ("xai", "grok-vision-beta") => {
            "Multimodal Grok with vision. Analyzes images and describes visual content in Grok's usual voice."
        }
        ("deepseek", "deepseek-chat") => {
            "DeepSeek's general-purpose conversational model tuned for natural dialogue and reasoning. Strong at analytical discussion."
        }
        ("deepseek", "deepseek-coder") => {
            "Coding model trained on a large code corpus. Good at generation, debugging, and technical documentation."
        }
        ("deepseek", "deepseek-reasoner") => {
            "Reasoning model for step-by-step logical work. Suited to mathematical, scientific, and analytical tasks."
        }
        ("openai", "gpt-4o") => {
            "OpenAI's most advanced multimodal model with vision, audio, and text. Strong reasoning and real-time conversation."
        }
        ("openai", "gpt-4o-mini") => {
            "Faster, cheaper GPT-4o that handles most tasks well. A good balance of capability and cost."
        }
        ("openai", "gpt-4-turbo") => {
            "GPT-4 with better instruction following, JSON mode, and reproducible outputs. Tuned for multi-step tasks."
        }
        ("openai", "gpt-4") => {
            "OpenAI's flagship large language model with strong reasoning. Suited to analysis, writing, and professional work."
        }
        ("openai", "gpt-3.5-turbo") => {
            "Fast, efficient model for chatbots, content generation, and general conversation."
        }
        ("openai", "o1-preview") => {
            "Reasoning model that works through hard problems step by step. Excels at mathematics, coding, and science."
        }
        ("openai", "o1-mini") => {
            "Faster o1 variant focused on coding and STEM reasoning."
        }
        ("anthropic", "claude-3-5-sonnet-20241022") => {
            "Anthropic's most capable model for reasoning, analysis, and creative work that needs nuanced understanding."
        }
        ("anthropic", "claude-3-5-haiku-20241022") => {
            "Fast Claude model for quick, high-quality responses in real-time applications."
        }
        ("anthropic", "claude-3-opus-20240229") => {
            "Anthropic's most powerful model for highly complex tasks and deep analysis."
        }
        ("anthropic", "claude-3-sonnet-20240229") => {
            "Balanced Claude model with a good speed-quality tradeoff across a wide range of tasks."
        }
        ("anthropic", "claude-3-haiku-20240307") => {
            "Fastest Claude model for applications that need quick responses."
        }
        ("groq", "llama-3.1-405b-reasoning") => {
            "Meta's largest Llama model with enhanced reasoning for complex problem-solving."
        }
        ("groq", "llama-3.1-70b-versatile") => {
            "Versatile Llama model for conversation, analysis, and creative tasks."
        }
        ("groq", "llama-3.1-8b-instant") => {
            "Small, fast Llama model for chatbots and real-time applications."
        }
        ("groq", "mixtral-8x7b-32768") => {
            "Mistral AI's mixture-of-experts model with extended context for long documents."
        }
        ("mistral", "mistral-large-latest") => {
            "Mistral AI's flagship model with advanced reasoning and multilingual support."
        }
        ("mistral", "mistral-small-latest") => {
            "Efficient Mistral model balancing performance and cost for everyday work."
        }
        ("mistral", "pixtral-12b-2409") => {
            "Multimodal Mistral model with vision for detailed image understanding."
        }
        ("mistral", "codestral-latest") => {
            "Mistral AI's coding model for generation, debugging, and software development."
        }
        _ => return None,
    };
    Some(description)
}

/// Best-effort capability guess for a freshly fetched model.
#[must_use]
pub fn infer_capabilities(raw: &RawModel) -> Vec<ModelCapability> {
    let id = raw.id.to_lowercase();
    let name = raw.name.as_deref().unwrap_or_default().to_lowercase();
    let mentions = |needle: &str| id.contains(needle) || name.contains(needle);

    let mut capabilities = Vec::new();
    if mentions("vision") {
        capabilities.push(ModelCapability::Vision);
    }
    if mentions("code") {
        capabilities.push(ModelCapability::CodeInterpreter);
    }
    if raw.multimodal == Some(true) {
        capabilities.push(ModelCapability::Multimodal);
    }
    if id.contains("function") || raw.function_calling == Some(true) {
        capabilities.push(ModelCapability::FunctionCalling);
    }
    if id.contains("json") || raw.json_mode == Some(true) {
        capabilities.push(ModelCapability::JsonMode);
    }
    capabilities
}

/// Convert a raw API entry into a [`Model`] owned by `provider`.
#[must_use]
pub fn to_model(provider: &str, raw: &RawModel) -> Model {
    let name = raw
        .name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(&raw.id);

    let mut model = Model::new(&raw.id, name, provider);
    model.description = raw.description.clone().filter(|d| !d.trim().is_empty());
    model.context_length = Some(
        raw.context_length
            .filter(|&n| n > 0)
            .or(raw.max_tokens.filter(|&n| n > 0))
            .unwrap_or(DEFAULT_CONTEXT_LENGTH),
    );
    model.capabilities = Some(infer_capabilities(raw));
    model.capability_source = Some(CapabilitySource::Inferred);
    model.created = raw.created;
    if let Some(pricing) = &raw.pricing {
        model.input_cost_per_million = pricing.prompt;
        model.output_cost_per_million = pricing.completion;
    }
    model
}

/// Overlay descriptions and stamp enrichment metadata.
#[must_use]
pub fn enrich(provider: &str, models: Vec<Model>, now: DateTime<Utc>) -> Vec<Model> {
    let stamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    models
        .into_iter()
        .map(|mut model| {
            let description = custom_description(provider, &model.id)
                .map(str::to_string)
                .or_else(|| model.description.take().filter(|d| !d.trim().is_empty()))
                .unwrap_or_else(|| format!("{} model from {provider}", model.name));
            model.description = Some(description);
            model.enhanced = Some(true);
            model.last_updated = Some(stamp.clone());
            model
        })
        .collect()
}
