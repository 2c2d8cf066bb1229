//! Built-in default model lists.
//!
//! Seeded into an empty cache so the catalog is browsable before any API key
//! is configured. Capability lists here are curated, not inferred.

use std::collections::BTreeMap;

use super::models::{CapabilitySource, Model, ModelCapability};

use ModelCapability::{CodeInterpreter, FunctionCalling, Vision, WebSearch};

struct Seed {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    capabilities: &'static [ModelCapability],
    context_length: u64,
    input_cost: f64,
    output_cost: f64,
    max_output_tokens: u64,
}

impl Seed {
    fn to_model(&self, provider: &str) -> Model {
        let mut model = Model::new(self.id, self.name, provider);
        model.description = Some(self.description.to_string());
        model.capabilities = Some(self.capabilities.to_vec());
        model.capability_source = Some(CapabilitySource::Explicit);
        model.context_length = Some(self.context_length);
        model.input_cost_per_million = Some(self.input_cost);
        model.output_cost_per_million = Some(self.output_cost);
        model.max_output_tokens = Some(self.max_output_tokens);
        model
    }
}

const OPENAI: &[Seed] = &[
    Seed {
        id: "gpt-4o",
        name: "GPT-4o",
        description: "Most advanced GPT-4 model optimized for chat, creative and technical writing",
        capabilities: &[FunctionCalling, Vision],
        context_length: 128_000,
        input_cost: 5.0,
        output_cost: 15.0,
        max_output_tokens: 16_384,
    },
    Seed {
        id: "gpt-4o-mini",
        name: "GPT-4o mini",
        description: "Affordable and intelligent small model for fast, lightweight tasks",
        capabilities: &[FunctionCalling, Vision],
        context_length: 128_000,
        input_cost: 0.15,
        output_cost: 0.6,
        max_output_tokens: 16_384,
    },
    Seed {
        id: "gpt-3.5-turbo",
        name: "GPT-3.5 Turbo",
        description: "Fast, inexpensive model for simple tasks",
        capabilities: &[FunctionCalling],
        context_length: 16_385,
        input_cost: 0.5,
        output_cost: 1.5,
        max_output_tokens: 4_096,
    },
];

const ANTHROPIC: &[Seed] = &[
    Seed {
        id: "claude-3-5-sonnet-20241022",
        name: "Claude 3.5 Sonnet",
        description: "Most intelligent model, combining top-tier performance with improved speed",
        capabilities: &[FunctionCalling, Vision],
        context_length: 200_000,
        input_cost: 3.0,
        output_cost: 15.0,
        max_output_tokens: 8_192,
    },
    Seed {
        id: "claude-3-5-haiku-20241022",
        name: "Claude 3.5 Haiku",
        description: "Fastest model for everyday tasks",
        capabilities: &[Vision],
        context_length: 200_000,
        input_cost: 1.0,
        output_cost: 5.0,
        max_output_tokens: 8_192,
    },
    Seed {
        id: "claude-3-opus-20240229",
        name: "Claude 3 Opus",
        description: "Most powerful model for highly complex tasks",
        capabilities: &[Vision],
        context_length: 200_000,
        input_cost: 15.0,
        output_cost: 75.0,
        max_output_tokens: 4_096,
    },
];

const XAI: &[Seed] = &[
    Seed {
        id: "grok-beta",
        name: "Grok Beta",
        description: "Grok is an AI assistant with a rebellious streak and real-time access to information",
        capabilities: &[WebSearch],
        context_length: 131_072,
        input_cost: 5.0,
        output_cost: 15.0,
        max_output_tokens: 4_096,
    },
    Seed {
        id: "grok-vision-beta",
        name: "Grok Vision Beta",
        description: "Grok with vision capabilities for image understanding and analysis",
        capabilities: &[Vision, WebSearch],
        context_length: 131_072,
        input_cost: 5.0,
        output_cost: 15.0,
        max_output_tokens: 4_096,
    },
];

const MISTRAL: &[Seed] = &[
    Seed {
        id: "mistral-large-latest",
        name: "Mistral Large",
        description: "Flagship model with state-of-the-art reasoning, knowledge and coding capabilities",
        capabilities: &[FunctionCalling],
        context_length: 131_072,
        input_cost: 2.0,
        output_cost: 6.0,
        max_output_tokens: 8_192,
    },
    Seed {
        id: "mistral-small-latest",
        name: "Mistral Small",
        description: "Cost-efficient model for translation, summarization, and sentiment analysis",
        capabilities: &[FunctionCalling],
        context_length: 131_072,
        input_cost: 0.2,
        output_cost: 0.6,
        max_output_tokens: 8_192,
    },
    Seed {
        id: "codestral-latest",
        name: "Codestral",
        description: "Cutting-edge generative model specifically designed and optimized for code generation",
        capabilities: &[CodeInterpreter],
        context_length: 32_768,
        input_cost: 1.0,
        output_cost: 3.0,
        max_output_tokens: 8_192,
    },
];

const DEEPSEEK: &[Seed] = &[
    Seed {
        id: "deepseek-chat",
        name: "DeepSeek Chat",
        description: "General-purpose conversational AI model with strong reasoning capabilities",
        capabilities: &[FunctionCalling],
        context_length: 64_000,
        input_cost: 0.14,
        output_cost: 0.28,
        max_output_tokens: 4_096,
    },
    Seed {
        id: "deepseek-coder",
        name: "DeepSeek Coder",
        description: "Specialized model for code generation, debugging, and programming assistance",
        capabilities: &[CodeInterpreter],
        context_length: 64_000,
        input_cost: 0.14,
        output_cost: 0.28,
        max_output_tokens: 4_096,
    },
    Seed {
        id: "deepseek-reasoner",
        name: "DeepSeek Reasoner",
        description: "Advanced reasoning model for complex problem-solving and analysis",
        capabilities: &[FunctionCalling],
        context_length: 64_000,
        input_cost: 0.55,
        output_cost: 1.9,
        max_output_tokens: 4_096,
    },
];

const GROQ: &[Seed] = &[
    Seed {
        id: "llama-3.3-70b-versatile",
        name: "Llama 3.3 70B Versatile",
        description: "Meta's latest Llama model optimized for versatile tasks and high performance",
        capabilities: &[FunctionCalling],
        context_length: 131_072,
        input_cost: 0.59,
        output_cost: 0.79,
        max_output_tokens: 32_768,
    },
    Seed {
        id: "llama-3.2-90b-vision-preview",
        name: "Llama 3.2 90B Vision",
        description: "Large multimodal model with vision capabilities for image understanding",
        capabilities: &[Vision],
        context_length: 131_072,
        input_cost: 0.9,
        output_cost: 0.9,
        max_output_tokens: 8_192,
    },
    Seed {
        id: "mixtral-8x7b-32768",
        name: "Mixtral 8x7B",
        description: "Mistral's mixture of experts model for efficient high-quality responses",
        capabilities: &[FunctionCalling],
        context_length: 32_768,
        input_cost: 0.24,
        output_cost: 0.24,
        max_output_tokens: 32_768,
    },
];

const OPENROUTER: &[Seed] = &[
    Seed {
        id: "anthropic/claude-3.5-sonnet",
        name: "Claude 3.5 Sonnet (via OpenRouter)",
        description: "Anthropic's Claude 3.5 Sonnet accessed through OpenRouter",
        capabilities: &[FunctionCalling, Vision],
        context_length: 200_000,
        input_cost: 3.0,
        output_cost: 15.0,
        max_output_tokens: 8_192,
    },
    Seed {
        id: "openai/gpt-4o",
        name: "GPT-4o (via OpenRouter)",
        description: "OpenAI's GPT-4o accessed through OpenRouter",
        capabilities: &[FunctionCalling, Vision],
        context_length: 128_000,
        input_cost: 5.0,
        output_cost: 15.0,
        max_output_tokens: 16_384,
    },
    Seed {
        id: "meta-llama/llama-3.2-90b-vision-instruct",
        name: "Llama 3.2 90B Vision (via OpenRouter)",
        description: "Meta's Llama 3.2 90B with vision capabilities through OpenRouter",
        capabilities: &[Vision],
        context_length: 131_072,
        input_cost: 0.9,
        output_cost: 0.9,
        max_output_tokens: 8_192,
    },
];

fn seeds_for(provider: &str) -> Option<&'static [Seed]> {
    match provider {
        "openai" => Some(OPENAI),
        "anthropic" => Some(ANTHROPIC),
        "xai" => Some(XAI),
        "mistral" => Some(MISTRAL),
        "deepseek" => Some(DEEPSEEK),
        "groq" => Some(GROQ),
        "openrouter" => Some(OPENROUTER),
        _ => None,
    }
}

/// Default models for one built-in provider.
#[must_use]
pub fn defaults_for(provider: &str) -> Option<Vec<Model>> {
    let seeds = seeds_for(provider)?;
    Some(seeds.iter().map(|seed| seed.to_model(provider)).collect())
}

/// Default models for every built-in provider.
#[must_use]
pub fn default_models() -> BTreeMap<String, Vec<Model>> {
    crate::core::provider::BUILTIN_PROVIDER_IDS
        .iter()
        .filter_map(|&id| defaults_for(id).map(|models| (id.to_string(), models)))
        .collect()
}
