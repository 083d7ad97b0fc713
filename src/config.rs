//! Runtime configuration for idea-stream.
//!
//! Configuration can be loaded from a JSON file or constructed
//! programmatically. Every field has a default, so a partial file (or no
//! file at all) still yields a runnable service. The prompt and model knobs
//! live here instead of being baked into the handler.

use std::path::PathBuf;

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::upstream::chunk::ChatMessage;

/// Command-line arguments.
#[derive(Parser, Debug, Clone)]
#[command(name = "idea-stream", about = "Streaming business-idea generator backend")]
pub struct Cli {
    /// Path to configuration file (JSON).
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// HTTP listen address (overrides the config file).
    #[arg(long)]
    pub listen: Option<String>,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,

    /// Upstream completion API configuration.
    pub upstream: UpstreamConfig,

    /// Prompt configuration.
    pub prompt: PromptConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            upstream: UpstreamConfig::default(),
            prompt: PromptConfig::default(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address (e.g. "0.0.0.0:8080"). The `--listen` flag wins.
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream chat-completion API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,

    /// Model identifier requested for every completion.
    pub model: String,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// TCP/TLS connect timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-5-nano".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            connect_timeout_secs: 10,
        }
    }
}

/// Which prompt preset to send upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptStyle {
    /// Bare idea request, no formatting instructions.
    Plain,
    /// Ask for headings, sub-headings and bullet points.
    Markdown,
}

/// Prompt settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Prompt preset. Ignored when `instruction` is set.
    pub style: PromptStyle,

    /// Custom prompt text overriding the preset.
    pub instruction: Option<String>,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            style: PromptStyle::Markdown,
            instruction: None,
        }
    }
}

const PLAIN_PROMPT: &str = "Reply with a new business idea for AI Agents.";
const MARKDOWN_PROMPT: &str = "Reply with a new business idea for AI Agents, \
    formatted with headings, sub-headings and bullet points.";

impl PromptConfig {
    /// The user-message text sent upstream.
    pub fn instruction_text(&self) -> &str {
        if let Some(custom) = &self.instruction {
            return custom;
        }
        match self.style {
            PromptStyle::Plain => PLAIN_PROMPT,
            PromptStyle::Markdown => MARKDOWN_PROMPT,
        }
    }

    /// The full prompt as `{role, content}` messages.
    pub fn messages(&self) -> Vec<ChatMessage> {
        vec![ChatMessage::user(self.instruction_text())]
    }
}

impl Config {
    /// Load configuration from a JSON file, falling back to defaults for missing fields.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if path.exists() {
            let data = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&data)?;
            Ok(config)
        } else {
            tracing::warn!("Config file not found at {:?}, using defaults", path);
            Ok(Config::default())
        }
    }
}
