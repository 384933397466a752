use serde::{Deserialize, Serialize};

/// Top-level client configuration, persisted to storage and restored
/// at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    pub generation: GenerationConfig,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            generation: GenerationConfig::default(),
        }
    }
}

/// Settings for the remote generation endpoint. The persona and sampling
/// temperature are fixed configuration, not caller-supplied per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub model: String,
    pub api_key: String,
    /// Override for the API origin; `None` uses the public endpoint.
    pub api_base: Option<String>,
    pub temperature: f32,
    pub system_instruction: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "gemini-3-flash-preview".to_string(),
            api_key: String::new(),
            api_base: None,
            temperature: 0.7,
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
        }
    }
}

const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are an expert AI assistant. \
Provide clear, accurate, and helpful responses in markdown format. \
Use code blocks for code snippets, bullet points for lists, and headings for structure.";
